use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::shared::DisplayState;

const CAULDRON_IDLE: &str = "\
.     _________     .
  ___(_________)___
 (_________________)
  \\               /
   \\             /
    \\___________/
    _|_________|_";

const CAULDRON_BUBBLE_A: &str = "\
.  o  _________  O  .
  ___(_o_____O_)___
 (_________________)
  \\               /
   \\             /
    \\___________/
    _|_________|_";

const CAULDRON_BUBBLE_B: &str = "\
.  O  _________  o  .
  ___(_O__o____)___
 (_________________)
  \\               /
   \\             /
    \\___________/
    _|_________|_";

pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: &DisplayState,
    grabbed: Option<usize>,
    blink_on: bool,
) {
    if state.overlay {
        draw_overlay(frame, area);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // the cauldron itself
            Constraint::Length(3), // melody readout
            Constraint::Length(7), // potion shelf
            Constraint::Length(1), // key help
        ])
        .split(area);

    draw_cauldron(frame, sections[0], state, blink_on);
    draw_melody(frame, sections[1], state);
    super::shelf::draw_shelf(frame, sections[2], state, grabbed);
    draw_help(frame, sections[3]);
}

fn draw_overlay(frame: &mut Frame, area: Rect) {
    // rough vertical centering inside the bordered pane
    let pad = (area.height.saturating_sub(6) / 2) as usize;
    let text = format!(
        "{}a strange cauldron simmers in the dark\n\npress any key to begin brewing",
        "\n".repeat(pad),
    );
    let overlay = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::LightMagenta))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(overlay, area);
}

fn draw_cauldron(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let art = if state.playing {
        if blink_on { CAULDRON_BUBBLE_A } else { CAULDRON_BUBBLE_B }
    } else {
        CAULDRON_IDLE
    };
    let body = format!("\n{art}\n\n{}", state.status);
    let style = if state.playing {
        Style::default().fg(Color::LightGreen)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cauldron = Paragraph::new(body)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" the cauldron "));
    frame.render_widget(cauldron, area);
}

fn draw_melody(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let mut spans = Vec::with_capacity(state.melody.len());
    for (i, label) in state.melody.iter().enumerate() {
        let style = if state.playing && state.step == Some(i) {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {label} "), style));
    }
    let title = format!(" melody · {:.0} bpm ", state.bpm);
    let readout = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(readout, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("1-6 drop potion · \u{2190}/\u{2192} grab · enter drop · space stir · esc quit")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(help, area);
}
