//! Ordered pattern lookup table: exact id, then base id, then prioritized predicates.

use std::collections::BTreeMap;

/// Variant suffixes stripped to obtain a pattern's base id.
const VARIANT_SUFFIXES: [&str; 11] = [
    "alt",
    "simple",
    "centered",
    "split",
    "asymmetric",
    "expandable",
    "tiered",
    "gateway",
    "spotlight",
    "narrative",
    "disclosure",
];

/// Strip one trailing variant suffix (`_v2`, `_split`, `_tiered`, ...) from a pattern id.
///
/// `hero_split` -> `hero`, `final_cta_v2` -> `final_cta`, `features` -> `features`.
pub fn base_pattern(pattern: &str) -> &str {
    let Some((head, tail)) = pattern.rsplit_once('_') else {
        return pattern;
    };
    if head.is_empty() {
        return pattern;
    }
    let versioned = tail.len() > 1
        && tail.starts_with('v')
        && tail[1..].chars().all(|c| c.is_ascii_digit());
    if versioned || VARIANT_SUFFIXES.iter().any(|s| tail.eq_ignore_ascii_case(s)) {
        head
    } else {
        pattern
    }
}

/// Fallback predicate over a normalized pattern id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Equals(String),
    Prefix(String),
    Contains(String),
}

impl Matcher {
    pub fn prefix(value: &str) -> Self {
        Matcher::Prefix(value.to_string())
    }

    pub fn equals(value: &str) -> Self {
        Matcher::Equals(value.to_string())
    }

    pub fn contains(value: &str) -> Self {
        Matcher::Contains(value.to_string())
    }

    pub fn matches(&self, pattern: &str) -> bool {
        match self {
            Matcher::Equals(v) => pattern == v,
            Matcher::Prefix(v) => pattern.starts_with(v.as_str()),
            Matcher::Contains(v) => pattern.contains(v.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable<T> {
    exact: BTreeMap<String, T>,
    rules: Vec<(Matcher, T)>,
    fallback: T,
}

impl<T: Copy> PatternTable<T> {
    pub fn new(fallback: T) -> Self {
        Self {
            exact: BTreeMap::new(),
            rules: Vec::new(),
            fallback,
        }
    }

    /// Map every listed pattern id to `value`.
    pub fn exact(mut self, patterns: &[&str], value: T) -> Self {
        for pattern in patterns {
            self.exact.insert(pattern.to_string(), value);
        }
        self
    }

    /// Append a fallback rule; earlier rules win.
    pub fn rule(mut self, matcher: Matcher, value: T) -> Self {
        self.rules.push((matcher, value));
        self
    }

    pub fn insert_exact(&mut self, pattern: &str, value: T) {
        self.exact.insert(normalize(pattern), value);
    }

    pub fn lookup(&self, pattern: &str) -> T {
        let normalized = normalize(pattern);
        if let Some(value) = self.exact.get(&normalized) {
            return *value;
        }
        if let Some(value) = self.exact.get(base_pattern(&normalized)) {
            return *value;
        }
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(&normalized))
            .map(|(_, value)| *value)
            .unwrap_or(self.fallback)
    }
}

fn normalize(pattern: &str) -> String {
    pattern.trim().to_ascii_lowercase()
}
