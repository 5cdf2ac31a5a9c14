use std::collections::{HashMap, HashSet};

/// Identifier used when a heading slugifies to nothing.
pub const FALLBACK_SLUG: &str = "section";

/// Convert heading text into an anchor-safe identifier.
///
/// Only ASCII letters and digits survive. Runs of whitespace and hyphens become
/// a single hyphen and the result never starts or ends with one.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_dash = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if (ch.is_whitespace() || ch == '-') && !slug.is_empty() && !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Per-document record of assigned anchor ids.
///
/// The first request for a base id returns it unchanged; later requests append
/// `-1`, `-2`, ... counted per base. Suffixed candidates that are already taken
/// (for example by a heading literally titled "Intro 1") are skipped.
#[derive(Debug, Default)]
pub struct IdRegistry {
    counts: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique id derived from `base`.
    pub fn assign(&mut self, base: &str) -> String {
        let base = if base.is_empty() { FALLBACK_SLUG } else { base };

        if !self.counts.contains_key(base) {
            self.counts.insert(base.to_string(), 0);
            if self.taken.insert(base.to_string()) {
                return base.to_string();
            }
        }

        let count = self.counts.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = format!("{base}-{count}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
