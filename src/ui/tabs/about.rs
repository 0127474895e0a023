//! About screen: profile data, skills grid, links.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::{App, profile};

pub fn render_about_tab(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = &app.palette;
    let accent = Style::default().fg(palette.accent_primary);
    let dim = Style::default().fg(palette.dim);
    let fg = Style::default().fg(palette.fg);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("01. ", accent),
            Span::styled("PROFILE_DATA", fg.add_modifier(Modifier::BOLD)),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("I'm ", fg),
            Span::styled(
                app.profile.name.clone(),
                fg.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                ", a developer engineered to build efficient software.",
                fg,
            ),
        ]),
        Line::from(Span::styled(
            "This interface talks directly to the GitHub API, so everything \
             shown is live repository data.",
            dim,
        )),
        Line::raw(""),
        Line::from(Span::styled("INSTALLED_MODULES", dim)),
    ];

    for (name, version, status) in profile::SKILLS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", name), fg),
            Span::styled(format!("{:<8}", version), accent),
            Span::styled(status.to_string(), dim),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("GITHUB   ", dim),
        Span::styled(app.profile.github_url(), accent.add_modifier(Modifier::UNDERLINED)),
    ]));
    if let Some(linkedin) = &app.profile.linkedin_url {
        lines.push(Line::from(vec![
            Span::styled("LINKEDIN ", dim),
            Span::styled(linkedin.clone(), accent.add_modifier(Modifier::UNDERLINED)),
        ]));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .padding(Padding::uniform(1)),
    );
    f.render_widget(panel, area);
}
