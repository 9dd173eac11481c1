mod audio;
mod audio_api;
mod brew;
mod shared;
mod tui;

use std::time::Instant;

use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use brew::cauldron::Cauldron;
use shared::InputEvent;
use tui::mode::TuiState;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let audio = audio::start_audio()?;
    let mut cauldron = Cauldron::new(audio.sample_rate());

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let blink_start = Instant::now();
    let mut tui_state = TuiState::default();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 250) % 2 == 0;
        let ds = cauldron.display_state();
        tui_state.overlay = ds.overlay;

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, tui_state.grabbed, blink_on);
        })?;

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            match event {
                InputEvent::Quit => {
                    drop(term);
                    drop(audio);
                    return Ok(());
                }
                InputEvent::Activate => {
                    // the one-time gesture audio backends demand before
                    // they will make noise
                    audio.resume()?;
                    cauldron.unlock_audio();
                }
                event => cauldron.handle_input(event, audio.frames_elapsed()),
            }
        }

        // drain any quarter-note ticks that came due on the engine clock
        for cmd in cauldron.tick(audio.frames_elapsed()) {
            audio.send(cmd);
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
