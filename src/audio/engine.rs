use super::frame::StereoFrame;
use super::voice::Voice;
use crate::audio_api::{AudioCommand, TriggerParams};

const MAX_VOICES: usize = 24; // hard cap so we wont malloc in audio callback

pub struct Engine {
    voices: Vec<Voice>,
    noise_state: u64,
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            voices: (0..MAX_VOICES).map(|_| Voice::idle(sample_rate as f32)).collect(),
            noise_state: 0x5eed_cafe_f00d_d00d,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Trigger(t) => self.trigger_voice(t),
        }
    }

    fn trigger_voice(&mut self, t: TriggerParams) {
        // first free slot, or steal slot 0
        let slot = self.voices.iter().position(|v| !v.active).unwrap_or(0);
        self.voices[slot].trigger(t.kind, t.freq_hz, t.duration_secs, &mut self.noise_state);
    }

    pub fn next_frame(&mut self) -> StereoFrame {
        let mut out = StereoFrame::zero();
        for v in &mut self.voices {
            if v.active {
                out.accumulate(v.next_frame());
            }
        }
        // soft limit so a cauldron full of potions can't clip harshly
        out.left = out.left.tanh();
        out.right = out.right.tanh();
        out
    }
}
