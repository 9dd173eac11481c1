use crate::shared::NUM_POTIONS;

// State local to the tui: which shelf slot the grab cursor holds, plus
// flags synced from DisplayState every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct TuiState {
    // the potion held for the grab-and-drop path; stays put after a drop
    pub grabbed: Option<usize>,
    // synced from DisplayState each frame
    pub overlay: bool,
}

impl TuiState {
    pub fn grab_next(&mut self) {
        self.grabbed = Some(match self.grabbed {
            None => 0,
            Some(i) => (i + 1) % NUM_POTIONS,
        });
    }

    pub fn grab_prev(&mut self) {
        self.grabbed = Some(match self.grabbed {
            None => NUM_POTIONS - 1,
            Some(i) => (i + NUM_POTIONS - 1) % NUM_POTIONS,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_cursor_wraps_both_ways() {
        let mut ts = TuiState::default();
        ts.grab_next();
        assert_eq!(ts.grabbed, Some(0));
        ts.grab_prev();
        assert_eq!(ts.grabbed, Some(NUM_POTIONS - 1));
        ts.grab_next();
        assert_eq!(ts.grabbed, Some(0));
    }
}
