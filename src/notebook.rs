//! Jupyter notebook document model.
//!
//! Only the parts the viewer needs: the ordered cell list, the
//! markdown/code split, and captured outputs. A document without a valid
//! `cells` array is rejected outright rather than partially rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::github::GitHubError;

#[derive(Debug, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(deserialize_with = "joined_text")]
        source: String,
    },
    Code {
        #[serde(deserialize_with = "joined_text")]
        source: String,
        #[serde(default)]
        execution_count: Option<u64>,
        #[serde(default)]
        outputs: Vec<Output>,
    },
    /// Present in real notebooks; the viewer shows nothing for them.
    Raw {
        #[serde(deserialize_with = "joined_text")]
        source: String,
    },
}

/// One captured output of a code cell. Exactly one payload shape applies;
/// which one is decided by key inspection in fixed priority order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOutput")]
pub enum Output {
    /// Streamed stdout/stderr text.
    Stream(String),
    /// Base64 image payload keyed by its MIME type.
    Image { mime: String, data: String },
    /// Inline HTML result data.
    Html(String),
    /// Plain-text result data.
    Text(String),
    /// Nothing the viewer can show.
    Unsupported,
}

/// Output as it appears on the wire, before shape classification.
#[derive(Deserialize)]
struct RawOutput {
    #[serde(default)]
    text: Option<Lines>,
    #[serde(default)]
    data: Option<BTreeMap<String, Value>>,
}

impl From<RawOutput> for Output {
    fn from(raw: RawOutput) -> Self {
        if let Some(text) = raw.text {
            return Output::Stream(text.join());
        }
        if let Some(data) = raw.data {
            if let Some((mime, value)) = data.iter().find(|(key, _)| key.starts_with("image/"))
                && let Some(payload) = value_text(value)
            {
                return Output::Image {
                    mime: mime.clone(),
                    data: payload.replace('\n', ""),
                };
            }
            if let Some(html) = data.get("text/html").and_then(value_text) {
                return Output::Html(html);
            }
            if let Some(text) = data.get("text/plain").and_then(value_text) {
                return Output::Text(text);
            }
        }
        Output::Unsupported
    }
}

/// Parse notebook JSON; any structural failure is a parse error.
pub fn parse(raw: &str) -> Result<Notebook, GitHubError> {
    serde_json::from_str(raw).map_err(|e| GitHubError::ParseFailed(e.to_string()))
}

/// Notebook text fields come as either a string or a list of line fragments.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lines {
    One(String),
    Many(Vec<String>),
}

impl Lines {
    fn join(self) -> String {
        match self {
            Lines::One(text) => text,
            Lines::Many(parts) => parts.concat(),
        }
    }
}

fn joined_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Lines::deserialize(deserializer)?.join())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .filter_map(|part| part.as_str())
                .collect::<String>(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markdown_and_code_cells_in_order() {
        let raw = r##"{
            "cells": [
                {"cell_type": "markdown", "source": ["# Title\n", "intro"]},
                {"cell_type": "code", "source": "print(1)", "execution_count": 3,
                 "outputs": [{"output_type": "stream", "text": ["1\n"]}]}
            ],
            "nbformat": 4, "nbformat_minor": 5, "metadata": {}
        }"##;
        let notebook = parse(raw).unwrap();
        assert_eq!(notebook.cells.len(), 2);
        match &notebook.cells[0] {
            Cell::Markdown { source } => assert_eq!(source, "# Title\nintro"),
            other => panic!("expected markdown cell, got {:?}", other),
        }
        match &notebook.cells[1] {
            Cell::Code {
                source,
                execution_count,
                outputs,
            } => {
                assert_eq!(source, "print(1)");
                assert_eq!(*execution_count, Some(3));
                assert_eq!(outputs[0], Output::Stream("1\n".to_string()));
            }
            other => panic!("expected code cell, got {:?}", other),
        }
    }

    #[test]
    fn rejects_document_without_cells() {
        assert!(parse(r#"{"nbformat": 4, "metadata": {}}"#).is_err());
        assert!(parse("not json at all").is_err());
    }

    #[test]
    fn accepts_raw_cells() {
        let raw = r#"{"cells": [{"cell_type": "raw", "source": "$$x$$"}]}"#;
        let notebook = parse(raw).unwrap();
        assert!(matches!(&notebook.cells[0], Cell::Raw { source } if source == "$$x$$"));
    }

    #[test]
    fn stream_text_beats_result_data() {
        let raw: RawOutput = serde_json::from_str(
            r#"{"text": "streamed", "data": {"text/plain": "ignored"}}"#,
        )
        .unwrap();
        assert_eq!(Output::from(raw), Output::Stream("streamed".to_string()));
    }

    #[test]
    fn image_beats_html_beats_plain() {
        let raw: RawOutput = serde_json::from_str(
            r#"{"data": {
                "image/png": ["aGVs\n", "bG8="],
                "text/html": "<b>x</b>",
                "text/plain": "x"
            }}"#,
        )
        .unwrap();
        assert_eq!(
            Output::from(raw),
            Output::Image {
                mime: "image/png".to_string(),
                data: "aGVsbG8=".to_string(),
            }
        );

        let raw: RawOutput =
            serde_json::from_str(r#"{"data": {"text/html": "<b>x</b>", "text/plain": "x"}}"#)
                .unwrap();
        assert_eq!(Output::from(raw), Output::Html("<b>x</b>".to_string()));

        let raw: RawOutput = serde_json::from_str(r#"{"data": {"text/plain": "x"}}"#).unwrap();
        assert_eq!(Output::from(raw), Output::Text("x".to_string()));
    }

    #[test]
    fn unknown_payload_shapes_are_unsupported() {
        let raw: RawOutput =
            serde_json::from_str(r#"{"data": {"application/json": {"a": 1}}}"#).unwrap();
        assert_eq!(Output::from(raw), Output::Unsupported);
        let raw: RawOutput = serde_json::from_str(r#"{"output_type": "display_data"}"#).unwrap();
        assert_eq!(Output::from(raw), Output::Unsupported);
    }

    #[test]
    fn execution_count_may_be_null() {
        let raw = r#"{"cells": [
            {"cell_type": "code", "source": "x", "execution_count": null, "outputs": []}
        ]}"#;
        let notebook = parse(raw).unwrap();
        assert!(matches!(
            &notebook.cells[0],
            Cell::Code {
                execution_count: None,
                ..
            }
        ));
    }
}
