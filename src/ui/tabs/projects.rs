//! Projects section: repository list, directory detail, document views.

use chrono::DateTime;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use ratatui_image::StatefulImage;

use crate::{
    App, ProjectView,
    classify::{self, ContentKind},
    format_size,
    ui::{render_error_panel, render_loading, truncate_width},
};

pub fn render_projects_tab(app: &mut App, f: &mut Frame, area: Rect) {
    match app.view {
        ProjectView::List => render_list(app, f, area),
        ProjectView::Detail => render_detail(app, f, area),
        ProjectView::Notebook | ProjectView::Markdown => render_document(app, f, area),
    }
}

fn render_list(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = app.palette;
    let dim = Style::default().fg(palette.dim);
    let accent = Style::default().fg(palette.accent_primary);

    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).split(area);

    let search = if app.search_edit {
        Span::styled(format!("QUERY: {}▌", app.search_query), accent)
    } else if !app.search_query.is_empty() {
        Span::styled(format!("QUERY: {}", app.search_query), accent)
    } else {
        Span::styled("press / to query", dim)
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("DETECTED REPOSITORIES: ", dim),
        Span::styled(
            app.filtered.len().to_string(),
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", dim),
        search,
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(header, chunks[0]);

    if app.loading {
        render_loading(f, chunks[1], &palette);
        return;
    }
    if let Some(error) = app.error.clone() {
        render_error_panel(f, chunks[1], &error, &palette);
        return;
    }
    if app.filtered.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("NO MATCHING DATA FOUND", dim)))
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(empty, chunks[1]);
        return;
    }

    let width = chunks[1].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .filter_map(|&idx| app.repos.get(idx))
        .map(|repo| {
            let date = DateTime::parse_from_rfc3339(&repo.updated_at)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let meta = format!(
                "● {}  ★ {}  ⑂ {}  {}",
                repo.language.as_deref().unwrap_or("N/A"),
                repo.stargazers_count,
                repo.forks_count,
                date
            );
            let title = Line::from(vec![
                Span::styled(format!("REP-{:04} ", repo.id % 10_000), dim),
                Span::styled(
                    repo.name.clone(),
                    Style::default()
                        .fg(palette.fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(meta, dim),
            ]);
            let description = Line::from(Span::styled(
                truncate_width(
                    repo.description.as_deref().unwrap_or("No description available."),
                    width,
                ),
                dim,
            ));
            ListItem::new(vec![title, description, Line::raw("")])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(palette.selection_bg))
        .highlight_symbol("▸ ");
    f.render_stateful_widget(list, chunks[1], &mut app.repo_state);
}

fn render_detail(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = app.palette;
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);
    render_breadcrumb(app, f, chunks[0]);

    if app.loading {
        render_loading(f, chunks[1], &palette);
        return;
    }
    if let Some(error) = app.error.clone() {
        render_error_panel(f, chunks[1], &error, &palette);
        return;
    }

    let has_side = app.readme.is_some() || app.cover_url.is_some();
    let body = if has_side {
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1])
    } else {
        Layout::horizontal([Constraint::Percentage(100)]).split(chunks[1])
    };

    render_entries(app, f, body[0]);
    if has_side {
        render_side_pane(app, f, body[1]);
    }
}

fn render_breadcrumb(app: &App, f: &mut Frame, area: Rect) {
    let palette = app.palette;
    let mut spans = vec![
        Span::styled(" root", Style::default().fg(palette.dim)),
        Span::styled(" / ", Style::default().fg(palette.border)),
        Span::styled(
            app.selected_repo
                .as_ref()
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if !app.current_path.is_empty() {
        spans.push(Span::styled(" / ", Style::default().fg(palette.border)));
        spans.push(Span::styled(
            app.current_path.clone(),
            Style::default().fg(palette.accent_primary),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_entries(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = app.palette;
    let name_width = area.width.saturating_sub(16) as usize;

    let items: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| {
            let (icon, color) = match classify::classify(entry) {
                ContentKind::Directory => ("", palette.dir_color),
                ContentKind::Notebook => ("󰠮", palette.accent_secondary),
                ContentKind::Image => ("󰋩", palette.accent_secondary),
                ContentKind::Markdown => ("", palette.fg),
                ContentKind::Code { .. } => ("󰈙", palette.dim),
            };
            let name = truncate_width(&entry.name, name_width);
            let pad = name_width.saturating_sub(name.chars().count());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(name, Style::default().fg(palette.fg)),
                Span::styled(
                    format!("{}{:>10}", " ".repeat(pad), format_size(entry.size)),
                    Style::default().fg(palette.dim),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" FILES "),
        )
        .highlight_style(Style::default().bg(palette.selection_bg))
        .highlight_symbol("▸");
    f.render_stateful_widget(list, area, &mut app.entry_state);
}

fn render_side_pane(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = app.palette;
    let has_cover = app.cover_url.is_some();
    let chunks = if has_cover {
        Layout::vertical([Constraint::Length(12), Constraint::Min(0)]).split(area)
    } else {
        Layout::vertical([Constraint::Percentage(100)]).split(area)
    };

    if has_cover {
        let cover_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" PREVIEW ");
        let inner = cover_block.inner(chunks[0]);
        f.render_widget(cover_block, chunks[0]);
        if let Some(state) = &mut app.cover_image {
            f.render_stateful_widget(StatefulImage::new(), inner, state);
        } else {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "loading preview…",
                Style::default().fg(palette.dim),
            )));
            f.render_widget(waiting, inner);
        }
    }

    if app.readme.is_some() {
        let readme_area = if has_cover { chunks[1] } else { chunks[0] };
        let readme = Paragraph::new(app.readme_lines.clone())
            .wrap(Wrap { trim: false })
            .scroll((app.readme_scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.border))
                    .title(" README.md ")
                    .padding(Padding::horizontal(1)),
            );
        f.render_widget(readme, readme_area);
    }
}

fn render_document(app: &mut App, f: &mut Frame, area: Rect) {
    let palette = app.palette;
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);

    let repo_name = app
        .selected_repo
        .as_ref()
        .map(|r| r.name.clone())
        .unwrap_or_default();
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ‹ ", Style::default().fg(palette.dim)),
        Span::styled(
            app.document_title.clone(),
            Style::default()
                .fg(palette.fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}/{}", repo_name, app.current_path),
            Style::default().fg(palette.dim),
        ),
    ]));
    f.render_widget(title, chunks[0]);

    if app.loading {
        render_loading(f, chunks[1], &palette);
        return;
    }
    if let Some(error) = app.error.clone() {
        render_error_panel(f, chunks[1], &error, &palette);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .padding(Padding::horizontal(1));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    if let Some(state) = &mut app.document_image {
        f.render_stateful_widget(StatefulImage::new(), inner, state);
        return;
    }
    if let Some(image_error) = &app.image_error {
        let note = Paragraph::new(Line::from(Span::styled(
            format!("[image unavailable] {}", image_error),
            Style::default().fg(palette.dim),
        )));
        f.render_widget(note, inner);
        return;
    }

    let document = Paragraph::new(app.document_lines.clone())
        .wrap(Wrap { trim: false })
        .scroll((app.document_scroll, 0));
    f.render_widget(document, inner);
}
