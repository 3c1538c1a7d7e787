use regex::Regex;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Ordered capture values identifying a group.
///
/// Values follow the lexicographic order of the capture names, so
/// `(?P<a_prefix>..)(?P<b_date>..)` always yields `[prefix, date]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File stem for this group's output, or `None` when the key has no
    /// captures or every captured value is empty.
    pub fn file_stem(&self) -> Option<String> {
        if self.0.iter().all(String::is_empty) {
            return None;
        }
        let stem = self
            .0
            .iter()
            .map(|value| sanitize(value))
            .collect::<Vec<_>>()
            .join("_");
        Some(stem)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<all>");
        }
        write!(f, "{}", self.0.join("_"))
    }
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '-' } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMatch {
    Matched(GroupKey),
    NoMatch,
}

/// A compiled grouping pattern, matched against file paths from the start.
#[derive(Debug, Clone)]
pub struct GroupPattern {
    source: String,
    regex: Regex,
    names: Vec<String>,
}

impl GroupPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern))?;
        let mut names: Vec<String> = regex.capture_names().flatten().map(str::to_string).collect();
        names.sort();

        Ok(Self {
            source: pattern.to_string(),
            regex,
            names,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Sorted names of the pattern's named captures.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn key_for(&self, path: &Path) -> GroupMatch {
        let haystack = path.to_string_lossy();
        match self.regex.captures(&haystack) {
            Some(caps) => {
                let values = self
                    .names
                    .iter()
                    .map(|name| {
                        caps.name(name)
                            .map(|m| m.as_str().to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                GroupMatch::Matched(GroupKey::new(values))
            }
            None => GroupMatch::NoMatch,
        }
    }
}
