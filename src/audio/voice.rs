use super::frame::StereoFrame;
use crate::shared::SynthKind;

const TAU: f32 = std::f32::consts::TAU;

// Big enough for the lowest pluck the melody can ask for (C3) at 96kHz.
pub const PLUCK_BUF_LEN: usize = 2048;

const KS_DAMP: f32 = 0.996;
const PAD_DETUNE: f32 = 1.007;
const BELL_RATIOS: [f32; 4] = [1.0, 2.01, 2.76, 5.40];
const BELL_AMPS: [f32; 4] = [1.0, 0.6, 0.4, 0.25];

/// Deterministic noise for the pluck excitation burst.
pub fn lcg_noise(state: &mut u64) -> f32 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*state >> 32) as u32 as f32 / u32::MAX as f32) * 2.0 - 1.0
}

// attack -> hold for the note duration -> exponential release
struct Envelope {
    level: f32,
    attack_inc: f32,
    release_mul: f32,
    hold: u64, // frames left before the release begins
    attacking: bool,
}

impl Envelope {
    fn new(attack_secs: f32, release_secs: f32, hold_secs: f32, sample_rate: f32) -> Self {
        let attacking = attack_secs > 0.0;
        Self {
            level: if attacking { 0.0 } else { 1.0 },
            attack_inc: if attacking { 1.0 / (attack_secs * sample_rate) } else { 0.0 },
            // reach -60dB over release_secs
            release_mul: 0.001f32.powf(1.0 / (release_secs * sample_rate)),
            hold: (hold_secs * sample_rate) as u64,
            attacking,
        }
    }

    fn next(&mut self) -> f32 {
        if self.attacking {
            self.level += self.attack_inc;
            if self.level >= 1.0 {
                self.level = 1.0;
                self.attacking = false;
            }
        } else if self.hold > 0 {
            self.hold -= 1;
        } else {
            self.level *= self.release_mul;
        }
        self.level
    }

    fn silent(&self) -> bool {
        !self.attacking && self.hold == 0 && self.level < 0.0005
    }
}

enum Timbre {
    // sine with a fast downward pitch sweep, kick-drum style
    Membrane { phase: f32, sweep: f32, sweep_decay: f32 },
    // two detuned saws
    Pad { phase_a: f32, phase_b: f32 },
    // Karplus-Strong damped delay line, walks the shared excitation buffer
    Pluck { len: usize, pos: usize },
    // inharmonic partial stack
    Bell { phases: [f32; 4] },
}

pub struct Voice {
    pub active: bool,
    freq: f32,
    gain: f32,
    pan: f32,
    sample_rate: f32,
    timbre: Timbre,
    env: Envelope,
    // preallocated so a trigger never allocates in the audio callback
    pluck_buf: Vec<f32>,
}

impl Voice {
    pub fn idle(sample_rate: f32) -> Self {
        Self {
            active: false,
            freq: 0.0,
            gain: 0.0,
            pan: 0.0,
            sample_rate,
            timbre: Timbre::Membrane { phase: 0.0, sweep: 0.0, sweep_decay: 0.0 },
            env: Envelope::new(0.0, 1.0, 0.0, sample_rate),
            pluck_buf: vec![0.0; PLUCK_BUF_LEN],
        }
    }

    pub fn trigger(
        &mut self,
        kind: SynthKind,
        freq_hz: f32,
        duration_secs: f32,
        noise_state: &mut u64,
    ) {
        let (attack, release, gain, pan) = match kind {
            SynthKind::Bass => (0.002, 0.25, 0.50, 0.0),
            SynthKind::Pad => (0.050, 0.60, 0.22, 0.0),
            SynthKind::Pluck => (0.0, 0.30, 0.60, -0.3),
            SynthKind::Bell => (0.001, 0.90, 0.35, 0.3),
        };
        self.freq = freq_hz;
        self.gain = gain;
        self.pan = pan;
        self.env = Envelope::new(attack, release, duration_secs, self.sample_rate);
        self.timbre = match kind {
            SynthKind::Bass => Timbre::Membrane {
                phase: 0.0,
                sweep: 1.0,
                sweep_decay: 0.001f32.powf(1.0 / (0.05 * self.sample_rate)),
            },
            SynthKind::Pad => Timbre::Pad { phase_a: 0.0, phase_b: 0.0 },
            SynthKind::Pluck => {
                let len = ((self.sample_rate / freq_hz).round() as usize).clamp(2, PLUCK_BUF_LEN);
                for s in self.pluck_buf[..len].iter_mut() {
                    *s = lcg_noise(noise_state);
                }
                Timbre::Pluck { len, pos: 0 }
            }
            SynthKind::Bell => Timbre::Bell { phases: [0.0; 4] },
        };
        self.active = true;
    }

    pub fn next_frame(&mut self) -> StereoFrame {
        let env = self.env.next();
        let frame = match &mut self.timbre {
            Timbre::Membrane { phase, sweep, sweep_decay } => {
                let freq = self.freq * (1.0 + 1.5 * *sweep);
                *sweep *= *sweep_decay;
                let s = (TAU * *phase).sin();
                *phase += freq / self.sample_rate;
                if *phase >= 1.0 {
                    *phase -= 1.0;
                }
                StereoFrame::panned(s * env * self.gain, self.pan)
            }
            Timbre::Pad { phase_a, phase_b } => {
                // one saw per channel for a little width
                let a = 2.0 * *phase_a - 1.0;
                let b = 2.0 * *phase_b - 1.0;
                *phase_a += self.freq / self.sample_rate;
                if *phase_a >= 1.0 {
                    *phase_a -= 1.0;
                }
                *phase_b += self.freq * PAD_DETUNE / self.sample_rate;
                if *phase_b >= 1.0 {
                    *phase_b -= 1.0;
                }
                StereoFrame {
                    left: a * env * self.gain,
                    right: b * env * self.gain,
                }
            }
            Timbre::Pluck { len, pos } => {
                let cur = self.pluck_buf[*pos];
                let next = self.pluck_buf[(*pos + 1) % *len];
                self.pluck_buf[*pos] = KS_DAMP * 0.5 * (cur + next);
                *pos = (*pos + 1) % *len;
                StereoFrame::panned(cur * env * self.gain, self.pan)
            }
            Timbre::Bell { phases } => {
                let mut s = 0.0;
                for (i, phase) in phases.iter_mut().enumerate() {
                    s += BELL_AMPS[i] * (TAU * *phase).sin();
                    *phase += self.freq * BELL_RATIOS[i] / self.sample_rate;
                    if *phase >= 1.0 {
                        *phase -= 1.0;
                    }
                }
                StereoFrame::panned(s * env * self.gain, self.pan)
            }
        };
        if self.env.silent() {
            self.active = false;
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_attacks_holds_and_releases() {
        let sr = 1000.0;
        let mut env = Envelope::new(0.01, 0.1, 0.05, sr);
        // 10 frames of attack
        for _ in 0..10 {
            env.next();
        }
        assert!((env.level - 1.0).abs() < 1e-3);
        // 50 frames of hold at full level
        for _ in 0..50 {
            assert!(env.next() > 0.99);
        }
        // then the release takes over and dies out
        for _ in 0..1000 {
            env.next();
        }
        assert!(env.silent());
    }

    #[test]
    fn test_zero_attack_starts_at_full_level() {
        let mut env = Envelope::new(0.0, 0.1, 0.0, 1000.0);
        assert!(env.next() > 0.9);
    }

    #[test]
    fn test_noise_stays_in_range() {
        let mut state = 1u64;
        for _ in 0..10_000 {
            let n = lcg_noise(&mut state);
            assert!((-1.0..=1.0).contains(&n));
        }
    }
}
