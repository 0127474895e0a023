//! Syntax highlighting for code blocks via syntect.
//!
//! Documents are highlighted once when they are loaded, not per frame, so
//! there is no line cache here.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::sync::OnceLock;
use syntect::{
    easy::HighlightLines,
    highlighting::{
        Color as SyntectColor, FontStyle, ScopeSelectors, StyleModifier, Theme, ThemeItem,
        ThemeSettings,
    },
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

fn syntax_set() -> &'static SyntaxSet {
    static SET: OnceLock<SyntaxSet> = OnceLock::new();
    SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(build_theme)
}

/// Dark theme tuned for readability on the code-block background.
fn build_theme() -> Theme {
    const KEYWORD: SyntectColor = rgb(255, 121, 198);
    const FUNCTION: SyntectColor = rgb(139, 233, 253);
    const STRING: SyntectColor = rgb(80, 250, 123);
    const TYPE: SyntectColor = rgb(241, 250, 140);
    const NUMBER: SyntectColor = rgb(255, 184, 108);
    const VARIABLE: SyntectColor = rgb(189, 147, 249);
    const COMMENT: SyntectColor = rgb(98, 114, 164);
    const FOREGROUND: SyntectColor = rgb(248, 248, 242);

    let scopes: [(&str, SyntectColor, FontStyle); 16] = [
        ("comment", COMMENT, FontStyle::ITALIC),
        ("string", STRING, FontStyle::empty()),
        ("constant.numeric", NUMBER, FontStyle::empty()),
        ("constant", NUMBER, FontStyle::empty()),
        ("keyword", KEYWORD, FontStyle::BOLD),
        ("storage", KEYWORD, FontStyle::BOLD),
        ("storage.type", FUNCTION, FontStyle::BOLD),
        ("entity.name.function", FUNCTION, FontStyle::empty()),
        ("support.function", FUNCTION, FontStyle::empty()),
        ("entity.name.type", TYPE, FontStyle::empty()),
        ("support.type", TYPE, FontStyle::empty()),
        ("variable", VARIABLE, FontStyle::empty()),
        ("variable.parameter", NUMBER, FontStyle::ITALIC),
        ("entity.name.tag", KEYWORD, FontStyle::empty()),
        ("markup.heading", VARIABLE, FontStyle::BOLD),
        ("punctuation", FOREGROUND, FontStyle::empty()),
    ];

    Theme {
        name: Some("gitfolio".to_string()),
        author: None,
        settings: ThemeSettings {
            foreground: Some(FOREGROUND),
            background: None,
            ..Default::default()
        },
        scopes: scopes
            .into_iter()
            .map(|(selector, fg, font_style)| ThemeItem {
                scope: selector.parse::<ScopeSelectors>().unwrap_or_default(),
                style: StyleModifier {
                    foreground: Some(fg),
                    background: None,
                    font_style: Some(font_style),
                },
            })
            .collect(),
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> SyntectColor {
    SyntectColor { r, g, b, a: 255 }
}

/// Highlight a code block, one styled `Line` per source line. Falls back to
/// unstyled lines when the language tag is unknown to syntect.
pub fn highlight_code(lang: &str, text: &str, bg: Color) -> Vec<Line<'static>> {
    let Some(syntax) = syntax_set()
        .find_syntax_by_token(lang)
        .or_else(|| syntax_set().find_syntax_by_extension(lang))
    else {
        return plain_lines(text, bg);
    };

    let mut highlighter = HighlightLines::new(syntax, theme());
    let mut out = Vec::new();
    for raw in LinesWithEndings::from(text) {
        let line = raw.trim_end_matches(['\n', '\r']);
        let Ok(ranges) = highlighter.highlight_line(raw, syntax_set()) else {
            out.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().bg(bg),
            )));
            continue;
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, chunk)| {
                let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                Span::styled(
                    chunk.trim_end_matches(['\n', '\r']).to_string(),
                    Style::default().fg(fg).bg(bg),
                )
            })
            .collect();
        out.push(Line::from(spans));
    }
    if out.is_empty() {
        out.push(Line::raw(""));
    }
    out
}

fn plain_lines(text: &str, bg: Color) -> Vec<Line<'static>> {
    let mut out: Vec<Line<'static>> = text
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().bg(bg))))
        .collect();
    if out.is_empty() {
        out.push(Line::raw(""));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_produces_one_line_per_source_line() {
        let lines = highlight_code("rs", "fn main() {\n    println!(\"hi\");\n}\n", Color::Black);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn unknown_language_falls_back_to_plain() {
        let lines = highlight_code("nosuchlang", "a\nb", Color::Black);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "a");
    }

    #[test]
    fn empty_block_still_renders_a_line() {
        assert_eq!(highlight_code("py", "", Color::Black).len(), 1);
    }
}
