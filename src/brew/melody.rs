use std::fmt;

use rand::Rng;

pub const NOTES_PER_OCTAVE: u8 = 12;

const A4_FREQ_HZ: f64 = 440.0;
const A4_MIDI_INDEX: u8 = 57;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteName {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

use NoteName::*;

pub const CHROMATIC: [NoteName; NOTES_PER_OCTAVE as usize] =
    [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B];

impl NoteName {
    fn to_index(self) -> u8 {
        match self {
            C => 0,
            CSharp => 1,
            D => 2,
            DSharp => 3,
            E => 4,
            F => 5,
            FSharp => 6,
            G => 7,
            GSharp => 8,
            A => 9,
            ASharp => 10,
            B => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            C => "C",
            CSharp => "C#",
            D => "D",
            DSharp => "D#",
            E => "E",
            F => "F",
            FSharp => "F#",
            G => "G",
            GSharp => "G#",
            A => "A",
            ASharp => "A#",
            B => "B",
        }
    }
}

/// A pitch tuned to A440.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub name: NoteName,
    pub octave: u8,
}

impl Note {
    pub const fn new(name: NoteName, octave: u8) -> Self {
        Self { name, octave }
    }

    fn to_midi_index(self) -> u8 {
        self.octave * NOTES_PER_OCTAVE + self.name.to_index()
    }

    pub fn freq_hz(self) -> f64 {
        A4_FREQ_HZ
            * 2f64.powf(
                (self.to_midi_index() as f64 - A4_MIDI_INDEX as f64) / NOTES_PER_OCTAVE as f64,
            )
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name.label(), self.octave)
    }
}

/// The melody the cauldron starts with. Eb spelled as its enharmonic D#.
pub fn default_melody() -> Vec<Note> {
    vec![
        Note::new(C, 4),
        Note::new(DSharp, 4),
        Note::new(F, 4),
        Note::new(G, 4),
    ]
}

pub const RANDOM_MELODY_LEN: usize = 5;
const RANDOM_OCTAVES: [u8; 3] = [3, 4, 5];

/// What the chaos draught pours in: five independent uniform draws over the
/// chromatic names and the low/middle/high octaves.
pub fn random_melody<R: Rng>(rng: &mut R) -> Vec<Note> {
    (0..RANDOM_MELODY_LEN)
        .map(|_| {
            let name = CHROMATIC[rng.gen_range(0..CHROMATIC.len())];
            let octave = RANDOM_OCTAVES[rng.gen_range(0..RANDOM_OCTAVES.len())];
            Note::new(name, octave)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_melody_labels() {
        let labels: Vec<String> = default_melody().iter().map(Note::to_string).collect();
        assert_eq!(labels, ["C4", "D#4", "F4", "G4"]);
    }

    #[test]
    fn test_reference_frequencies() {
        assert!((Note::new(A, 4).freq_hz() - 440.0).abs() < 1e-9);
        assert!((Note::new(C, 4).freq_hz() - 261.625).abs() < 0.01);
        // octaves double
        let c3 = Note::new(C, 3).freq_hz();
        let c4 = Note::new(C, 4).freq_hz();
        assert!((c4 / c3 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_melody_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let melody = random_melody(&mut rng);
            assert_eq!(melody.len(), RANDOM_MELODY_LEN);
            for note in melody {
                assert!((3..=5).contains(&note.octave), "octave {}", note.octave);
                assert!(CHROMATIC.contains(&note.name));
            }
        }
    }

    #[test]
    fn test_random_melody_reaches_every_octave() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..100 {
            for note in random_melody(&mut rng) {
                seen[(note.octave - 3) as usize] = true;
            }
        }
        assert_eq!(seen, [true, true, true]);
    }
}
