use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::shared::{DisplayState, NUM_POTIONS, POTIONS};

const POTION_COLORS: [Color; NUM_POTIONS] = [
    Color::LightRed,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::Cyan,
];

const BOTTLE: &str = "  !  \n .-. \n |~| \n '-' ";

pub fn draw_shelf(frame: &mut Frame, area: Rect, state: &DisplayState, grabbed: Option<usize>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, NUM_POTIONS as u32); NUM_POTIONS])
        .split(area);

    for (idx, cell) in cols.iter().enumerate() {
        let potion = &POTIONS[idx];
        let dissolved = state.active_sources.iter().any(|s| s == potion.kind);

        let mut style = Style::default().fg(POTION_COLORS[idx]);
        if dissolved {
            style = style.add_modifier(Modifier::BOLD).bg(Color::DarkGray);
        }
        let border_style = if grabbed == Some(idx) {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = format!(" {} {} ", potion.key, potion.name);
        let bottle = Paragraph::new(BOTTLE)
            .style(style)
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            );
        frame.render_widget(bottle, *cell);
    }
}
