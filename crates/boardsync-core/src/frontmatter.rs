//! Markdown record parsing: YAML frontmatter plus a free-text body.
//!
//! A record looks like:
//!
//! ```text
//! ---
//! title: Checkout flow
//! label: backend
//! role: shopper
//! action: pay with a saved card
//! benefit: checkout takes one click
//! ---
//! Free-text description follows the closing delimiter.
//! ```
//!
//! Every frontmatter field is optional at this layer; which fields are
//! required (and how the narrative triple renders) is decided by the
//! stages that consume the parsed record.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::model::Narrative;

const DELIMITER: &str = "---";

/// Frontmatter fields a record may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub benefit: Option<String>,
}

impl Fields {
    /// The narrative triple, present only when all three fields are set.
    #[must_use]
    pub fn narrative(&self) -> Option<Narrative> {
        match (&self.role, &self.action, &self.benefit) {
            (Some(role), Some(action), Some(benefit)) => Some(Narrative {
                role: role.clone(),
                action: action.clone(),
                benefit: benefit.clone(),
            }),
            _ => None,
        }
    }
}

/// A parsed record: frontmatter fields plus the description body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecord {
    pub fields: Fields,
    pub description: String,
}

/// Parse a markdown record into frontmatter fields and a description.
///
/// A record without a leading `---` block has empty fields and the whole
/// text as its description. An opened but unterminated block, or YAML
/// that does not decode, is a [`SyncError::Parse`] naming `file`.
pub fn parse(file: &Path, text: &str) -> Result<ParsedRecord> {
    let Some(rest) = strip_opening_delimiter(text) else {
        return Ok(ParsedRecord {
            fields: Fields::default(),
            description: text.trim().to_string(),
        });
    };

    let mut yaml_lines: Vec<&str> = Vec::new();
    let mut lines = rest.lines();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == DELIMITER {
            closed = true;
            break;
        }
        yaml_lines.push(line);
    }

    if !closed {
        return Err(SyncError::parse(file, "unterminated frontmatter block"));
    }

    let fields: Fields = serde_yaml::from_str(&yaml_lines.join("\n"))
        .map_err(|err| SyncError::parse(file, format!("invalid frontmatter: {err}")))?;

    let description = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    Ok(ParsedRecord {
        fields,
        description,
    })
}

/// Strip the opening `---` line, tolerating a UTF-8 BOM and trailing
/// whitespace on the delimiter line.
fn strip_opening_delimiter(text: &str) -> Option<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (first, rest) = text.split_once('\n')?;
    (first.trim_end() == DELIMITER).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file() -> PathBuf {
        PathBuf::from("epics/001-auth.md")
    }

    #[test]
    fn parses_full_frontmatter_and_description() {
        let text = "---\ntitle: Auth\nlabel: backend\nrole: user\naction: log in\nbenefit: my data is safe\n---\nLong-form description.\n";
        let record = parse(&file(), text).expect("should parse");
        assert_eq!(record.fields.title.as_deref(), Some("Auth"));
        assert_eq!(record.fields.label.as_deref(), Some("backend"));
        assert_eq!(record.description, "Long-form description.");

        let narrative = record.fields.narrative().expect("triple is complete");
        assert_eq!(narrative.role, "user");
    }

    #[test]
    fn narrative_requires_all_three_fields() {
        let text = "---\ntitle: Auth\nrole: user\naction: log in\n---\nbody\n";
        let record = parse(&file(), text).expect("should parse");
        assert!(record.fields.narrative().is_none());
    }

    #[test]
    fn missing_block_yields_empty_fields() {
        let record = parse(&file(), "Just a description.\n").expect("should parse");
        assert_eq!(record.fields, Fields::default());
        assert_eq!(record.description, "Just a description.");
    }

    #[test]
    fn unterminated_block_is_a_parse_error() {
        let err = parse(&file(), "---\ntitle: Auth\nno closing line\n")
            .expect_err("must fail");
        assert!(err.to_string().contains("unterminated"));
        assert!(err.to_string().contains("001-auth.md"));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = parse(&file(), "---\ntitle: Auth\nsprint: 4\n---\nbody\n")
            .expect_err("must fail");
        assert!(err.to_string().contains("invalid frontmatter"));
    }

    #[test]
    fn empty_description_after_block() {
        let record = parse(&file(), "---\ntitle: Auth\n---\n").expect("should parse");
        assert_eq!(record.description, "");
    }
}
