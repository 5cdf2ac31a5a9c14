//! Leading `key: value` metadata blocks delimited by `---` lines.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";
const ALT_CLOSING_DELIMITER: &str = "...";

/// Flat metadata parsed from a document header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Value for `key`, ignoring keys that were present but left blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Comma separated `tags` value, with optional surrounding brackets.
    pub fn tags(&self) -> Vec<String> {
        let Some(raw) = self.get("tags") else {
            return Vec::new();
        };

        let inner = raw
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(raw);

        inner
            .split(',')
            .map(|tag| strip_quotes(tag.trim()).trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a document into its frontmatter and the markdown body that follows.
///
/// A block exists only when the very first line is `---` and a later line is
/// `---` or `...`. Without a closing delimiter the input is returned untouched.
pub fn parse_frontmatter(source: &str) -> (Frontmatter, &str) {
    let mut lines = source.split_inclusive('\n');
    let opens_block = lines
        .next()
        .map(|first| first.trim_end() == DELIMITER)
        .unwrap_or(false);
    if !opens_block {
        return (Frontmatter::default(), source);
    }

    let mut offset = source.find('\n').map(|idx| idx + 1).unwrap_or(source.len());
    let mut fields = BTreeMap::new();

    for line in lines {
        offset += line.len();
        let trimmed = line.trim();

        if trimmed == DELIMITER || trimmed == ALT_CLOSING_DELIMITER {
            let body = source[offset..].trim_start();
            return (Frontmatter { fields }, body);
        }

        if let Some((key, value)) = trimmed.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                fields.insert(key.to_string(), strip_quotes(value.trim()).to_string());
            }
        }
    }

    (Frontmatter::default(), source)
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|ch| ch == '"' || ch == '\'')
}
