//! Parsing of the comment preamble that sampler output files carry.

use std::collections::HashMap;

use crate::error::ReadError;

/// Raw key/value attributes extracted from a file's comment preamble.
///
/// Values stay strings; use [`require_int`] for the counts the readers need.
pub type Attributes = HashMap<String, String>;

/// Splits `# key = value` comment lines into [`Attributes`].
///
/// The comment marker and the trailing `(Default)` suffix are held by the
/// parser value, so each read constructs its configuration once instead of
/// relying on shared state.
#[derive(Debug, Clone)]
pub struct MetadataParser {
    comment: &'static str,
    default_suffix: &'static str,
}

impl Default for MetadataParser {
    fn default() -> Self {
        Self {
            comment: "#",
            default_suffix: "(Default)",
        }
    }
}

impl MetadataParser {
    /// Whether `line` is part of the comment preamble.
    pub fn is_comment(&self, line: &str) -> bool {
        line.starts_with(self.comment)
    }

    /// Parses one preamble line.
    ///
    /// Returns `Ok(None)` for commentary that carries no `key = value` pair.
    /// A line that contains `=` but does not split into exactly one key and
    /// one value is malformed.
    pub fn parse_line(&self, line: &str) -> Result<Option<(String, String)>, ReadError> {
        if !line.contains('=') {
            return Ok(None);
        }
        let stripped = line.replace(self.comment, "").replace(self.default_suffix, "");
        let parts: Vec<&str> = stripped.split('=').collect();
        match parts[..] {
            [key, value] => Ok(Some((key.trim().to_string(), value.trim().to_string()))),
            _ => Err(ReadError::MalformedMetadataLine {
                line: line.trim_end().to_string(),
            }),
        }
    }
}

/// Looks up `key` in `attributes` and parses it as a count.
///
/// Absence and non-integer values are both fatal; the readers never fall
/// back to a default iteration count.
pub fn require_int(attributes: &Attributes, key: &str) -> Result<usize, ReadError> {
    let value = attributes
        .get(key)
        .ok_or_else(|| ReadError::MissingAttribute {
            key: key.to_string(),
        })?;
    value.parse::<usize>().map_err(|_| ReadError::InvalidAttribute {
        key: key.to_string(),
        value: value.clone(),
    })
}
