use crate::audio_api::{AudioCommand, TriggerParams};
use crate::shared::{DEFAULT_BPM, DisplayState, InputEvent, SynthKind};

use super::melody::{Note, default_melody, random_melody};
use super::transport::Transport;

/// One allowed transition, Locked -> Unlocked, on the activation gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioGate {
    Locked,
    Unlocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing { next_tick: u64, step: usize },
}

/// The whole toy: the gate, the brew contents, the melody, and the loop.
pub struct Cauldron {
    gate: AudioGate,
    melody: Vec<Note>,
    active_sources: Vec<String>,
    playback: Playback,
    transport: Transport,
    status: String,
}

impl Cauldron {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            gate: AudioGate::Locked,
            melody: default_melody(),
            active_sources: Vec::new(),
            playback: Playback::Stopped,
            transport: Transport::new(sample_rate, DEFAULT_BPM),
            status: String::from("drop a potion in, then stir"),
        }
    }

    pub fn unlock_audio(&mut self) {
        if self.gate == AudioGate::Locked {
            self.gate = AudioGate::Unlocked;
            self.status = String::from("the cauldron stirs to life");
            log::info!("audio gate opened");
        }
    }

    pub fn handle_input(&mut self, event: InputEvent, now_frames: u64) {
        match event {
            InputEvent::DropPotion(kind) => self.add_potion(kind),
            InputEvent::Stir => self.stir(now_frames),
            InputEvent::Activate | InputEvent::Quit => {}
        }
    }

    pub fn add_potion(&mut self, kind: &str) {
        match kind {
            "random" => {
                self.melody = random_melody(&mut rand::thread_rng());
                self.status = String::from("the melody swirls into something new");
                log::debug!("melody randomized: {:?}", self.melody);
            }
            "reset" => self.reset(),
            _ => {
                // idempotent: a potion already in the brew does nothing
                if !self.active_sources.iter().any(|s| s == kind) {
                    self.active_sources.push(kind.to_string());
                }
                self.status = format!("{kind} dissolves into the brew");
                log::debug!("potion added: {kind}");
            }
        }
    }

    fn reset(&mut self) {
        self.playback = Playback::Stopped;
        self.active_sources.clear();
        self.melody = default_melody();
        self.status = String::from("the cauldron is emptied");
        log::debug!("cauldron reset");
    }

    /// Cauldron click. Toggles strictly between stopped and playing; the
    /// first tick of a fresh loop is due immediately.
    pub fn stir(&mut self, now_frames: u64) {
        if self.gate == AudioGate::Locked {
            return;
        }
        self.playback = match self.playback {
            Playback::Stopped => {
                self.status = String::from("the brew begins to sing");
                log::debug!("loop started at frame {now_frames}");
                Playback::Playing { next_tick: now_frames, step: 0 }
            }
            Playback::Playing { .. } => {
                self.status = String::from("the brew settles");
                log::debug!("loop stopped");
                Playback::Stopped
            }
        };
    }

    /// Drain every quarter-note tick that has come due on the engine clock.
    /// The melody and source set are read fresh each tick, so a mid-playback
    /// swap is picked up without restarting the loop.
    pub fn tick(&mut self, now_frames: u64) -> Vec<AudioCommand> {
        let mut cmds = Vec::new();
        let frames_per_quarter = self.transport.frames_per_quarter();
        let duration_secs = self.transport.eighth_secs();
        if let Playback::Playing { next_tick, step } = &mut self.playback {
            while *next_tick <= now_frames {
                let note = self.melody[*step % self.melody.len()];
                for label in &self.active_sources {
                    // labels with no matching synth are skipped, not an error
                    if let Some(kind) = SynthKind::from_label(label) {
                        cmds.push(AudioCommand::Trigger(TriggerParams {
                            kind,
                            freq_hz: note.freq_hz() as f32,
                            duration_secs,
                        }));
                    }
                }
                *step = step.wrapping_add(1);
                *next_tick += frames_per_quarter;
            }
        }
        cmds
    }

    pub fn display_state(&self) -> DisplayState {
        let (playing, step) = match self.playback {
            Playback::Stopped => (false, None),
            Playback::Playing { step, .. } => (true, Some(step % self.melody.len())),
        };
        DisplayState {
            overlay: self.gate == AudioGate::Locked,
            playing,
            step,
            active_sources: self.active_sources.clone(),
            melody: self.melody.iter().map(Note::to_string).collect(),
            bpm: self.transport.bpm(),
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brew::melody::RANDOM_MELODY_LEN;

    const SR: u32 = 44100;
    const QUARTER: u64 = 22050; // frames per quarter at 120 bpm

    fn unlocked() -> Cauldron {
        let mut c = Cauldron::new(SR);
        c.unlock_audio();
        c
    }

    fn trigger_freqs(cmds: &[AudioCommand]) -> Vec<f32> {
        cmds.iter()
            .map(|cmd| {
                let AudioCommand::Trigger(t) = cmd;
                t.freq_hz
            })
            .collect()
    }

    #[test]
    fn test_adding_potions_is_an_idempotent_union() {
        let mut c = unlocked();
        for kind in ["bass", "bass", "pad", "bass", "pad", "bell"] {
            c.add_potion(kind);
        }
        assert_eq!(c.active_sources, ["bass", "pad", "bell"]);
    }

    #[test]
    fn test_unknown_kind_joins_the_brew_but_stays_silent() {
        let mut c = unlocked();
        c.add_potion("slime");
        assert_eq!(c.active_sources, ["slime"]);
        c.stir(0);
        let cmds = c.tick(0);
        assert!(cmds.is_empty());
        // the loop still advanced past the silent tick
        assert_eq!(c.playback, Playback::Playing { next_tick: QUARTER, step: 1 });
    }

    #[test]
    fn test_reset_restores_defaults_from_any_state() {
        let mut c = unlocked();
        c.add_potion("bass");
        c.add_potion("random");
        c.stir(0);
        c.tick(0);
        c.add_potion("reset");
        assert_eq!(c.playback, Playback::Stopped);
        assert!(c.active_sources.is_empty());
        assert_eq!(c.melody, default_melody());
    }

    #[test]
    fn test_stir_requires_the_gate_open() {
        let mut c = Cauldron::new(SR);
        c.stir(0);
        assert_eq!(c.playback, Playback::Stopped);
        c.unlock_audio();
        c.stir(0);
        assert!(matches!(c.playback, Playback::Playing { .. }));
    }

    #[test]
    fn test_stir_twice_leaves_no_residual_ticks() {
        let mut c = unlocked();
        c.add_potion("bass");
        c.stir(0);
        c.stir(0);
        assert_eq!(c.playback, Playback::Stopped);
        assert!(c.tick(QUARTER * 10).is_empty());
    }

    #[test]
    fn test_first_tick_plays_melody_head_on_every_source() {
        let mut c = unlocked();
        c.add_potion("bass");
        c.add_potion("pad");
        c.stir(0);
        let cmds = c.tick(0);
        assert_eq!(cmds.len(), 2);
        let c4 = Note::new(crate::brew::melody::NoteName::C, 4).freq_hz() as f32;
        for freq in trigger_freqs(&cmds) {
            assert!((freq - c4).abs() < 0.01);
        }
        // eighth note at 120 bpm
        let AudioCommand::Trigger(t) = cmds[0];
        assert!((t.duration_secs - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_late_tick_drains_every_due_quarter() {
        let mut c = unlocked();
        c.add_potion("bass");
        c.stir(0);
        let cmds = c.tick(QUARTER * 2);
        // ticks at 0, QUARTER, 2*QUARTER
        assert_eq!(cmds.len(), 3);
        let melody = default_melody();
        let expect: Vec<f32> = melody[..3].iter().map(|n| n.freq_hz() as f32).collect();
        assert_eq!(trigger_freqs(&cmds), expect);
    }

    #[test]
    fn test_random_potion_mid_playback_is_picked_up_next_tick() {
        let mut c = unlocked();
        c.add_potion("bass");
        c.stir(0);
        c.tick(0); // step now 1
        c.add_potion("random");
        assert_eq!(c.melody.len(), RANDOM_MELODY_LEN);
        let expected = c.melody[1 % RANDOM_MELODY_LEN];
        let cmds = c.tick(QUARTER);
        assert_eq!(cmds.len(), 1);
        assert!((trigger_freqs(&cmds)[0] - expected.freq_hz() as f32).abs() < 0.01);
        // the loop never restarted
        assert_eq!(c.playback, Playback::Playing { next_tick: QUARTER * 2, step: 2 });
    }

    #[test]
    fn test_reset_while_playing_then_restart_begins_fresh() {
        let mut c = unlocked();
        c.add_potion("bass");
        c.stir(0);
        c.tick(QUARTER * 2);
        c.add_potion("reset");
        assert!(c.tick(QUARTER * 3).is_empty());
        c.add_potion("bass");
        c.stir(QUARTER * 4);
        let cmds = c.tick(QUARTER * 4);
        let c4 = default_melody()[0].freq_hz() as f32;
        assert_eq!(cmds.len(), 1);
        assert!((trigger_freqs(&cmds)[0] - c4).abs() < 0.01);
    }

    #[test]
    fn test_display_state_tracks_the_brew() {
        let mut c = Cauldron::new(SR);
        assert!(c.display_state().overlay);
        c.unlock_audio();
        let ds = c.display_state();
        assert!(!ds.overlay);
        assert!(!ds.playing);
        assert_eq!(ds.step, None);
        assert_eq!(ds.melody, ["C4", "D#4", "F4", "G4"]);
        c.add_potion("pluck");
        c.stir(0);
        c.tick(0);
        let ds = c.display_state();
        assert!(ds.playing);
        assert_eq!(ds.step, Some(1));
        assert_eq!(ds.active_sources, ["pluck"]);
    }
}
