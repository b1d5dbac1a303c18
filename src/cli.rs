//! Command-line interface definition for maul
//!
//! Provides argument parsing for the wordlist extraction tool.

use crate::filter::{ExclusionFilter, DEFAULT_EXCLUDED_EXTENSIONS};
use crate::processor::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use clap::Parser;
use std::path::PathBuf;

/// Build fuzzing wordlists from lists of URLs
///
/// Extracts subdomains, paths, filenames and parameter names from URLs
/// (for example a Burp target export) and appends the unique ones to
/// separate wordlists.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "maul",
    author = "m0h1nd4",
    version,
    about = "Build fuzzing wordlists from lists of URLs",
    long_about = r#"
╔══════════════════════════════════════════════════════════════╗
║                          MAUL v1.0.0                         ║
║            Fuzzing Wordlists From Real-World URLs            ║
╚══════════════════════════════════════════════════════════════╝

Feed it URLs exported from a proxy or crawler and it builds subdomain, path,
file and parameter fuzzing lists from what targets actually use. Lists are
appended to, so they can be merged into master wordlists with a tool like
anew.

Input can be supplied with --file or piped in:
    cat urls.txt | maul
    maul < urls.txt
    maul -f urls.txt -o ./lists -t 100

OUTPUT FILES:
    files.txt      - any filenames found
    paths.txt      - any paths up to a depth of 2 (/path/here)
    subdomains.txt - any subdomains it can identify
    parameters.txt - names of any parameters it finds
"#
)]
pub struct Args {
    /// File to process (stdin is read first when piped)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory to write the wordlists to
    #[arg(short, long, value_name = "DIR", default_value = "./")]
    pub output: PathBuf,

    /// Exclude files with these extensions (comma-separated)
    #[arg(
        short = 'e',
        long,
        visible_alias = "ef",
        value_name = "EXT",
        default_value = DEFAULT_EXCLUDED_EXTENSIONS
    )]
    pub exclude_extensions: String,

    /// Number of extraction workers
    #[arg(short = 't', long, value_name = "NUM", default_value_t = DEFAULT_WORKERS)]
    pub threads: usize,

    /// Capacity of the internal queues
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_size: usize,

    /// Show what would be extracted without writing files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Show detailed statistics, even in quiet mode
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Parse the excluded extension list
    pub fn get_exclusions(&self) -> ExclusionFilter {
        ExclusionFilter::from_list(&self.exclude_extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["maul"]).unwrap();

        assert_eq!(args.input, None);
        assert_eq!(args.output, PathBuf::from("./"));
        assert_eq!(args.threads, 50);
        assert_eq!(args.queue_size, 1024);
        assert!(!args.dry_run);

        let exclusions = args.get_exclusions();
        assert_eq!(exclusions.suffixes().len(), 6);
        assert!(exclusions.is_excluded("font.ttf"));
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "maul", "-f", "urls.txt", "-o", "/tmp/lists", "-t", "8", "-e", ".css,.js", "-q",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("urls.txt")));
        assert_eq!(args.output, PathBuf::from("/tmp/lists"));
        assert_eq!(args.threads, 8);
        assert!(args.quiet);

        let exclusions = args.get_exclusions();
        assert!(exclusions.is_excluded("app.js"));
        assert!(!exclusions.is_excluded("logo.png"));
    }

    #[test]
    fn test_ef_alias() {
        let args = Args::try_parse_from(["maul", "--ef", ".css"]).unwrap();

        let exclusions = args.get_exclusions();
        assert_eq!(exclusions.suffixes().len(), 1);
        assert!(exclusions.is_excluded("site.css"));
        assert!(!exclusions.is_excluded("logo.png"));
    }

    #[test]
    fn test_invalid_thread_count() {
        assert!(Args::try_parse_from(["maul", "-t", "many"]).is_err());
    }
}
