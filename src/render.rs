//! Renders documents (markdown, notebooks) into ratatui lines.
//!
//! Rendering happens once when a document arrives, producing owned lines the
//! views can slice and scroll without re-parsing per frame.

use base64::{Engine as _, engine::general_purpose};
use image::GenericImageView;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::highlight;
use crate::notebook::{Cell, Notebook, Output};
use crate::theme::Palette;

/// Render a markdown document.
pub fn markdown_lines(text: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut writer = MarkdownWriter::new(palette);
    for event in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH) {
        writer.event(event);
    }
    writer.finish()
}

/// Render a notebook cell by cell.
pub fn notebook_lines(notebook: &Notebook, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for cell in &notebook.cells {
        match cell {
            Cell::Markdown { source } => {
                lines.extend(markdown_lines(source, palette));
                lines.push(Line::raw(""));
            }
            Cell::Code {
                source,
                execution_count,
                outputs,
            } => {
                let ordinal = execution_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| " ".to_string());
                lines.push(Line::from(Span::styled(
                    format!("In [{}]:", ordinal),
                    Style::default()
                        .fg(palette.accent_primary)
                        .add_modifier(Modifier::BOLD),
                )));
                // Notebook kernels are overwhelmingly Python; highlight as such.
                lines.extend(highlight::highlight_code("py", source, palette.code_bg));
                for output in outputs {
                    lines.extend(output_lines(output, palette));
                }
                lines.push(Line::raw(""));
            }
            Cell::Raw { .. } => {}
        }
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "(empty notebook)",
            Style::default().fg(palette.dim),
        ));
    }
    lines
}

fn output_lines(output: &Output, palette: &Palette) -> Vec<Line<'static>> {
    let dim = Style::default().fg(palette.dim);
    match output {
        Output::Stream(text) | Output::Text(text) => text
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), dim)))
            .collect(),
        Output::Image { mime, data } => {
            let label = match image_dimensions(data) {
                Some((w, h)) => format!("[{} output, {}x{}]", mime, w, h),
                None => format!("[{} output]", mime),
            };
            vec![Line::from(Span::styled(
                label,
                Style::default().fg(palette.accent_secondary),
            ))]
        }
        Output::Html(html) => html
            .lines()
            .map(|line| {
                Line::from(Span::styled(
                    line.to_string(),
                    dim.add_modifier(Modifier::ITALIC),
                ))
            })
            .collect(),
        Output::Unsupported => Vec::new(),
    }
}

/// Dimensions of a base64-encoded image payload, if it decodes.
pub fn image_dimensions(data: &str) -> Option<(u32, u32)> {
    let bytes = general_purpose::STANDARD.decode(data).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    Some(img.dimensions())
}

struct MarkdownWriter {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    list_stack: Vec<Option<u64>>,
    quote_depth: usize,
    code: Option<(String, String)>,
    image_alt: Option<String>,
    base: Style,
    dim: Style,
    accent: Style,
    code_inline: Style,
    code_bg: ratatui::style::Color,
}

impl MarkdownWriter {
    fn new(palette: &Palette) -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![Style::default().fg(palette.fg)],
            list_stack: Vec::new(),
            quote_depth: 0,
            code: None,
            image_alt: None,
            base: Style::default().fg(palette.fg),
            dim: Style::default().fg(palette.dim),
            accent: Style::default().fg(palette.accent_primary),
            code_inline: Style::default().fg(palette.accent_secondary),
            code_bg: palette.code_bg,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(alt) = &mut self.image_alt {
                    alt.push_str(&text);
                } else if let Some((_, buffer)) = &mut self.code {
                    buffer.push_str(&text);
                } else {
                    self.push_span(text.to_string());
                }
            }
            Event::Code(text) => {
                let style = self.code_inline;
                self.spans.push(Span::styled(text.to_string(), style));
            }
            Event::SoftBreak => self.push_span(" ".to_string()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(40), self.dim)));
                self.lines.push(Line::raw(""));
            }
            Event::Html(html) => {
                if let Some((_, buffer)) = &mut self.code {
                    buffer.push_str(&html);
                }
            }
            Event::TaskListMarker(done) => {
                let mark = if done { "[x] " } else { "[ ] " };
                self.push_span(mark.to_string());
            }
            Event::FootnoteReference(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, _, _) => {
                self.flush();
                let style = self
                    .accent
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(if level == HeadingLevel::H1 {
                        Modifier::UNDERLINED
                    } else {
                        Modifier::empty()
                    });
                self.spans.push(Span::styled(
                    format!("{} ", "#".repeat(heading_rank(level))),
                    self.dim,
                ));
                self.styles.push(style);
            }
            Tag::Paragraph => {}
            Tag::BlockQuote => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}{}. ", indent, n);
                        *n += 1;
                        marker
                    }
                    _ => format!("{}• ", indent),
                };
                self.spans.push(Span::styled(marker, self.dim));
            }
            Tag::Emphasis => {
                self.styles.push(self.current().add_modifier(Modifier::ITALIC));
            }
            Tag::Strong => {
                self.styles.push(self.current().add_modifier(Modifier::BOLD));
            }
            Tag::Strikethrough => {
                self.styles
                    .push(self.current().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link(_, _, _) => {
                self.styles
                    .push(self.accent.add_modifier(Modifier::UNDERLINED));
            }
            Tag::Image(_, _, _) => {
                self.image_alt = Some(String::new());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(_, _, _) => {
                self.styles.pop();
                self.flush();
                self.lines.push(Line::raw(""));
            }
            Tag::Paragraph => {
                self.flush();
                self.lines.push(Line::raw(""));
            }
            Tag::BlockQuote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.lines.push(Line::raw(""));
            }
            Tag::CodeBlock(_) => {
                if let Some((lang, buffer)) = self.code.take() {
                    let tag = if lang.is_empty() { "text" } else { lang.as_str() };
                    self.lines
                        .extend(highlight::highlight_code(tag, &buffer, self.code_bg));
                    self.lines.push(Line::raw(""));
                }
            }
            Tag::List(_) => {
                self.flush();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::raw(""));
                }
            }
            Tag::Item => self.flush(),
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link(_, _, _) => {
                self.styles.pop();
            }
            Tag::Image(_, _, _) => {
                let alt = self.image_alt.take().unwrap_or_default();
                let label = if alt.is_empty() {
                    "[image]".to_string()
                } else {
                    format!("[image: {}]", alt)
                };
                self.spans.push(Span::styled(label, self.dim));
            }
            _ => {}
        }
    }

    fn current(&self) -> Style {
        *self.styles.last().unwrap_or(&self.base)
    }

    fn push_span(&mut self, text: String) {
        let style = self.current();
        self.spans.push(Span::styled(text, style));
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::new();
        if self.quote_depth > 0 {
            spans.push(Span::styled("▌ ".repeat(self.quote_depth), self.dim));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.is_empty() || line.to_string().is_empty())
        {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            self.lines.push(Line::raw(""));
        }
        self.lines
    }
}

fn heading_rank(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
