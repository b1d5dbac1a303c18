//! Filtering module
//!
//! Decides which extracted values are worth keeping: excluded file extensions
//! and path segments that are identifiers rather than words.

use regex::Regex;
use std::sync::OnceLock;

/// Default comma-separated list of excluded file suffixes
pub const DEFAULT_EXCLUDED_EXTENSIONS: &str = ".png,.jpg,.svg,.woff,.ttf,.eot";

/// Suffix-based exclusion list for the file wordlist
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    suffixes: Vec<String>,
}

impl ExclusionFilter {
    /// Create a filter from individual suffixes (empty entries are ignored)
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for suffix in suffixes {
            let suffix = suffix.into();
            if !suffix.is_empty() && !list.contains(&suffix) {
                list.push(suffix);
            }
        }
        Self { suffixes: list }
    }

    /// Parse a comma-separated list such as `.png,.jpg`
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim))
    }

    /// Check whether a filename ends with any excluded suffix
    #[inline]
    pub fn is_excluded(&self, file: &str) -> bool {
        self.suffixes.iter().any(|suffix| file.ends_with(suffix.as_str()))
    }

    /// Configured suffixes
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

/// Common patterns for identifier-like path segments
pub mod patterns {
    /// GUID with optional braces, any case
    pub const GUID: &str =
        r"^\{?[0-9a-fA-F]{8}-([0-9a-fA-F]{4}-){3}[0-9a-fA-F]{12}\}?$";
}

fn guid_regex() -> &'static Regex {
    static GUID: OnceLock<Regex> = OnceLock::new();
    GUID.get_or_init(|| Regex::new(patterns::GUID).expect("GUID pattern is valid"))
}

/// Nonempty and made only of digits
#[inline]
pub fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Shaped like a GUID, e.g. `3fa85f64-5717-4562-b3fc-2c963f66afa6`
#[inline]
pub fn is_guid(segment: &str) -> bool {
    guid_regex().is_match(segment)
}
