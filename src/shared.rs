// Shared vocabulary between the tui, the cauldron controller, and the
// audio engine.
//
// The idea of the rendering process:
//   - Only the controller holds brew state; the TUI just renders the
//     display state object on every frame and resolves raw keys into
//     semantic InputEvents for the backend to handle.

pub const NUM_POTIONS: usize = 6;
pub const DEFAULT_BPM: f32 = 120.0;

/// The fixed set of synthesizer kinds the engine can voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthKind {
    Bass,
    Pad,
    Pluck,
    Bell,
}

impl SynthKind {
    // Potion payloads are plain strings. A label that matches no kind still
    // lands in the brew; it just never produces a trigger.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "bass" => Some(SynthKind::Bass),
            "pad" => Some(SynthKind::Pad),
            "pluck" => Some(SynthKind::Pluck),
            "bell" => Some(SynthKind::Bell),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SynthKind::Bass => "bass",
            SynthKind::Pad => "pad",
            SynthKind::Pluck => "pluck",
            SynthKind::Bell => "bell",
        }
    }
}

/// One bottle on the shelf.
#[derive(Clone, Copy, Debug)]
pub struct Potion {
    pub key: char,
    pub kind: &'static str,
    pub name: &'static str,
}

pub const POTIONS: [Potion; NUM_POTIONS] = [
    Potion { key: '1', kind: "bass", name: "Bog Bass" },
    Potion { key: '2', kind: "pad", name: "Misty Pad" },
    Potion { key: '3', kind: "pluck", name: "Nettle Pluck" },
    Potion { key: '4', kind: "bell", name: "Grave Bell" },
    Potion { key: '5', kind: "random", name: "Chaos Draught" },
    Potion { key: '6', kind: "reset", name: "Clear Water" },
];

/// Semantic input events resolved by the tui.
///
/// Both potion paths (a number key, or grab-and-drop with Enter) resolve to
/// the same `DropPotion` event, so their effect is identical by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    // first key press while the start overlay is up
    Activate,

    // a potion landed in the cauldron, payload is its kind label
    DropPotion(&'static str),

    // cauldron clicked: toggle the brew loop
    Stir,

    // quit button (esc)
    Quit,
}

/// Everything the TUI needs to draw a frame.
#[derive(Clone, Debug)]
pub struct DisplayState {
    pub overlay: bool,
    pub playing: bool,
    pub step: Option<usize>, // melody position of the next tick, when playing
    pub active_sources: Vec<String>,
    pub melody: Vec<String>,
    pub bpm: f32,
    pub status: String, // one line of flavor text for the screen segment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_round_trip() {
        for kind in [SynthKind::Bass, SynthKind::Pad, SynthKind::Pluck, SynthKind::Bell] {
            assert_eq!(SynthKind::from_label(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_label_is_no_kind() {
        assert_eq!(SynthKind::from_label("slime"), None);
        assert_eq!(SynthKind::from_label(""), None);
        assert_eq!(SynthKind::from_label("random"), None);
        assert_eq!(SynthKind::from_label("reset"), None);
    }

    #[test]
    fn test_shelf_keys_are_unique() {
        for (i, a) in POTIONS.iter().enumerate() {
            for b in POTIONS.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
                assert_ne!(a.kind, b.kind);
            }
        }
    }
}
