//! UI chrome: header tabs, footer status line, shared panels.

pub mod tabs;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{App, ProjectView, Tab, theme::Palette};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, app, chunks[0]);
    match app.section {
        Tab::Home => tabs::render_home_tab(app, f, chunks[1]),
        Tab::Projects => tabs::render_projects_tab(app, f, chunks[1]),
        Tab::About => tabs::render_about_tab(app, f, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let mut spans = vec![
        Span::styled(
            " ⌁ gitfolio ",
            Style::default()
                .fg(palette.accent_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(palette.border)),
    ];
    for (tab, label, key) in [
        (Tab::Home, "HOME", "1"),
        (Tab::Projects, "PROJECTS", "2"),
        (Tab::About, "ABOUT", "3"),
    ] {
        let style = if app.section == tab {
            Style::default()
                .fg(palette.accent_primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.dim)
        };
        spans.push(Span::styled(format!("{}:{}  ", key, label), style));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let chunks =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(34)]).split(area);

    let left = if let Some((msg, _)) = &app.status_message {
        Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(palette.accent_primary),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {}", footer_hint(app)),
            Style::default().fg(palette.dim),
        ))
    };
    f.render_widget(Paragraph::new(left), chunks[0]);

    // Most recent fetch, success or not, so log-only failures stay visible.
    if let Some(entry) = app.activity.front() {
        let (mark, color) = if entry.ok {
            ("✓", palette.ok_fg)
        } else {
            ("✗", palette.err_fg)
        };
        let label = match &entry.detail {
            Some(detail) if !entry.ok => format!("{}: {}", entry.what, detail),
            _ => entry.what.clone(),
        };
        let right = Line::from(vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::styled(
                format!(
                    " {} {}s ",
                    truncate_width(&label, 26),
                    entry.when.elapsed().as_secs()
                ),
                Style::default().fg(palette.dim),
            ),
        ]);
        f.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
    }
}

fn footer_hint(app: &App) -> &'static str {
    match app.section {
        Tab::Home => "2 projects · 3 about · q quit",
        Tab::About => "1 home · 2 projects · q quit",
        Tab::Projects => match app.view {
            ProjectView::List => "j/k select · enter open · / search · r reload · y copy url · q quit",
            ProjectView::Detail => "j/k select · enter open · h back · J/K readme · y copy url",
            ProjectView::Notebook | ProjectView::Markdown => "j/k scroll · d/u page · g/G ends · h back",
        },
    }
}

/// Error panel shown in place of a screen's content.
pub(crate) fn render_error_panel(f: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let line = Line::from(vec![
        Span::styled(
            "[ERROR] ",
            Style::default()
                .fg(palette.err_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.to_string(), Style::default().fg(palette.fg)),
    ]);
    let panel = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(palette.err_fg))
            .padding(ratatui::widgets::Padding::uniform(1)),
    );
    f.render_widget(panel, area);
}

pub(crate) fn render_loading(f: &mut Frame, area: Rect, palette: &Palette) {
    let loading = Paragraph::new(Line::from(Span::styled(
        "FETCHING DATA...",
        Style::default().fg(palette.dim).add_modifier(Modifier::SLOW_BLINK),
    )))
    .alignment(Alignment::Center);
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(area);
    f.render_widget(loading, chunks[1]);
}

/// Truncate to a display width, appending an ellipsis when cut.
pub(crate) fn truncate_width(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::truncate_width;

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_width("short", 10), "short");
        assert_eq!(truncate_width("a longer name", 8), "a longe…");
        // Wide CJK glyphs count double.
        assert_eq!(truncate_width("日本語のテキスト", 7), "日本語…");
    }
}
