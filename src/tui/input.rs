use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use super::mode::TuiState;
use crate::shared::{InputEvent, POTIONS};

// poll for input from the terminal, resolve raw keys against tui state into
// semantic input events for the backend to handle
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code, ts));
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode, ts: &mut TuiState) -> Vec<InputEvent> {
    // the start overlay swallows everything except quit
    if ts.overlay {
        return match code {
            KeyCode::Esc => vec![InputEvent::Quit],
            _ => vec![InputEvent::Activate],
        };
    }

    match code {
        KeyCode::Esc => vec![InputEvent::Quit],

        // stir the cauldron (play / stop)
        KeyCode::Char(' ') => vec![InputEvent::Stir],

        // direct path: each potion has its own key
        KeyCode::Char(c @ '1'..='6') => POTIONS
            .iter()
            .find(|p| p.key == c)
            .map(|p| vec![InputEvent::DropPotion(p.kind)])
            .unwrap_or_default(),

        // grab-and-drop path: move the cursor, then Enter tips the grabbed
        // bottle into the cauldron
        KeyCode::Left => {
            ts.grab_prev();
            vec![]
        }
        KeyCode::Right | KeyCode::Tab => {
            ts.grab_next();
            vec![]
        }
        KeyCode::Enter => match ts.grabbed {
            Some(i) => vec![InputEvent::DropPotion(POTIONS[i].kind)],
            None => vec![],
        },

        _ => vec![],
    }
}
