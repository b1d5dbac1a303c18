//! # Maul
//!
//! Builds realistic fuzzing wordlists from URLs seen in the wild.
//!
//! ## Features
//!
//! - **Four wordlists**: subdomains, paths (depth 2), filenames and parameter names
//! - **Deduplication**: every value is written once per run, per list
//! - **Append mode**: lists grow across runs and merge well with `anew`
//! - **Noise filtering**: numeric and GUID segments are skipped, static asset
//!   extensions are excluded from the file list
//! - **Parallel processing**: a pool of extraction workers feeding one writer
//!
//! ## Usage
//!
//! ```bash
//! # Pipe in a Burp export
//! cat urls.txt | maul -o ./lists
//!
//! # Read a file with 100 workers, excluding more extensions
//! maul -f urls.txt -t 100 -e .png,.jpg,.gif,.css
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use maul::category::Category;
//! use maul::output::MemorySink;
//! use maul::processor::{Processor, ProcessorConfig};
//!
//! let urls = vec!["https://api.example.com/v1/users/me.json?fields=id".to_string()];
//!
//! let processor = Processor::new(ProcessorConfig::default());
//! let sink = processor.run(urls, MemorySink::new()).unwrap();
//! assert_eq!(sink.values(Category::Subdomain), &["api"]);
//! ```

pub mod aggregate;
pub mod category;
pub mod cli;
pub mod dedup;
pub mod extract;
pub mod filter;
pub mod output;
pub mod processor;
pub mod progress;
pub mod source;

pub use category::Category;
pub use cli::Args;
pub use extract::{extract, ExtractedRecord};
pub use processor::{Processor, ProcessorConfig};
