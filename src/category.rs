//! Wordlist categories
//!
//! Every value extracted from a URL belongs to exactly one category, and each
//! category owns one dedup set and one output file.

use std::fmt;

/// Kind of wordlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Subdomain,
    Path,
    File,
    Parameter,
}

impl Category {
    /// All categories, in the order the aggregator handles them
    pub const ALL: [Category; 4] = [
        Category::File,
        Category::Path,
        Category::Subdomain,
        Category::Parameter,
    ];

    /// Output file name inside the output directory
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Subdomain => "subdomains.txt",
            Category::Path => "paths.txt",
            Category::File => "files.txt",
            Category::Parameter => "parameters.txt",
        }
    }

    /// Stable slot for per-category arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Category::Subdomain => 0,
            Category::Path => 1,
            Category::File => 2,
            Category::Parameter => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Subdomain => "subdomains",
            Category::Path => "paths",
            Category::File => "files",
            Category::Parameter => "parameters",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
