//! Landing screen.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::App;

pub fn render_home_tab(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = &app.palette;

    let vertical = Layout::vertical([
        Constraint::Percentage(25),
        Constraint::Length(12),
        Constraint::Min(0),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Percentage(15),
        Constraint::Percentage(70),
        Constraint::Percentage(15),
    ])
    .split(vertical[1]);
    let card = horizontal[1];

    let lines = vec![
        Line::from(Span::styled(
            "● SYSTEM ONLINE",
            Style::default().fg(palette.accent_primary),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            app.profile.name.to_uppercase(),
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "─".repeat(24),
            Style::default().fg(palette.border),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            app.profile.bio.clone(),
            Style::default().fg(palette.dim),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[2] ", Style::default().fg(palette.accent_primary)),
            Span::styled("ACCESS PROJECTS", Style::default().fg(palette.fg)),
        ]),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .padding(Padding::uniform(1)),
        );
    f.render_widget(panel, card);
}
