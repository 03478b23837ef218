//! # Atlassian Document Format
//!
//! Converts free text into the minimal ADF tree Jira Cloud expects for rich
//! text fields. Each source line becomes one paragraph; a line that is
//! nothing but an `http(s)://` URL becomes a link. No other formatting is
//! recognised.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// ADF schema version emitted on every document.
pub const ADF_VERSION: u32 = 1;

static BARE_URL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("Failed to compile bare URL regex"));

/// Root node of an ADF document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "doc")]
pub struct Document {
  pub version: u32,
  pub content: Vec<Block>,
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
  Paragraph { content: Vec<Inline> },
}

/// Inline node inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
  Text {
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    marks: Vec<Mark>,
  },
}

/// Formatting applied to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
  Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAttrs {
  pub href: String,
}

impl Inline {
  pub fn text(text: impl Into<String>) -> Self {
    Self::Text {
      text: text.into(),
      marks: Vec::new(),
    }
  }

  /// A text node showing `url` and linking to it.
  pub fn link(url: &str) -> Self {
    Self::Text {
      text: url.to_string(),
      marks: vec![Mark::Link {
        attrs: LinkAttrs { href: url.to_string() },
      }],
    }
  }
}

/// Whether the trimmed line is a single bare `http://` or `https://` URL.
pub fn is_bare_url(line: &str) -> bool {
  BARE_URL.is_match(line.trim())
}

/// Build a document from free text.
///
/// Returns `None` for empty or whitespace-only input so callers omit the
/// field rather than sending an empty document. Blank lines are kept as
/// empty paragraphs; other lines keep their original spacing.
pub fn build_document(text: &str) -> Option<Document> {
  if text.trim().is_empty() {
    return None;
  }

  let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
  let content = normalized.split('\n').map(paragraph_for_line).collect();

  Some(Document {
    version: ADF_VERSION,
    content,
  })
}

fn paragraph_for_line(line: &str) -> Block {
  let trimmed = line.trim();
  let content = if trimmed.is_empty() {
    Vec::new()
  } else if is_bare_url(trimmed) {
    vec![Inline::link(trimmed)]
  } else {
    vec![Inline::text(line)]
  };
  Block::Paragraph { content }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_blank_input_is_absent() {
    assert!(build_document("").is_none());
    assert!(build_document("   \n\t\r\n ").is_none());
  }

  #[test]
  fn test_serializes_to_adf_shape() {
    let doc = build_document("Intro\n\nhttps://example.com/a?b=c").unwrap();

    assert_eq!(
      serde_json::to_value(&doc).unwrap(),
      json!({
        "type": "doc",
        "version": 1,
        "content": [
          { "type": "paragraph", "content": [{ "type": "text", "text": "Intro" }] },
          { "type": "paragraph", "content": [] },
          {
            "type": "paragraph",
            "content": [{
              "type": "text",
              "text": "https://example.com/a?b=c",
              "marks": [{ "type": "link", "attrs": { "href": "https://example.com/a?b=c" } }]
            }]
          }
        ]
      })
    );
  }

  #[test]
  fn test_plain_lines_keep_original_spacing() {
    let doc = build_document("  indented Line  \nsee https://example.com for more").unwrap();

    assert_eq!(
      doc.content,
      vec![
        Block::Paragraph {
          content: vec![Inline::text("  indented Line  ")]
        },
        Block::Paragraph {
          content: vec![Inline::text("see https://example.com for more")]
        },
      ]
    );
  }

  #[test]
  fn test_padded_url_line_becomes_link_of_trimmed_url() {
    let doc = build_document("   http://example.com/x   ").unwrap();
    assert_eq!(
      doc.content,
      vec![Block::Paragraph {
        content: vec![Inline::link("http://example.com/x")]
      }]
    );
  }

  #[test]
  fn test_line_endings_are_normalized() {
    let crlf = build_document("a\r\nb\rc").unwrap();
    let lf = build_document("a\nb\nc").unwrap();
    assert_eq!(crlf, lf);
    assert_eq!(lf.content.len(), 3);
  }

  #[test]
  fn test_is_bare_url() {
    assert!(is_bare_url("https://example.com"));
    assert!(is_bare_url("  http://example.com/path#frag  "));
    assert!(!is_bare_url("https://example.com and more"));
    assert!(!is_bare_url("ftp://example.com"));
    assert!(!is_bare_url("example.com"));
    assert!(!is_bare_url("https://"));
  }

  #[test]
  fn test_build_is_deterministic() {
    let text = "Line\n\nhttps://example.com\n  tail";
    assert_eq!(build_document(text), build_document(text));
  }
}
