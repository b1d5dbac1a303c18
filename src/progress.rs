//! Progress display module
//!
//! Provides styled status output, a spinner while URLs stream in, and the
//! end-of-run statistics.

use crate::category::Category;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║                                                              ║
║   ███╗   ███╗ █████╗ ██╗   ██╗██╗                            ║
║   ████╗ ████║██╔══██╗██║   ██║██║                            ║
║   ██╔████╔██║███████║██║   ██║██║                            ║
║   ██║╚██╔╝██║██╔══██║██║   ██║██║                            ║
║   ██║ ╚═╝ ██║██║  ██║╚██████╔╝███████╗                       ║
║   ╚═╝     ╚═╝╚═╝  ╚═╝ ╚═════╝ ╚══════╝                       ║
║                                                              ║
║            Fuzzing Wordlists From Real-World URLs            ║
║                                                 v1.0.0       ║
╚══════════════════════════════════════════════════════════════╝
"#;

    eprintln!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    eprintln!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    eprintln!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    eprintln!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    eprintln!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    eprintln!("  {} {}", "•".green(), text);
}

/// Create a styled spinner for indeterminate progress
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} URLs ({per_sec}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Processing statistics
///
/// Counters are bumped from the reader, the workers and the aggregator, so
/// they are atomics even though most have a single writer.
#[derive(Debug)]
pub struct ProcessingStats {
    pub lines_read: AtomicU64,
    pub bytes_read: AtomicU64,
    pub urls_extracted: AtomicU64,
    pub empty_records: AtomicU64,
    pub written: [AtomicU64; 4],
    pub duplicates: [AtomicU64; 4],
    pub excluded_files: AtomicU64,
    pub write_errors: AtomicU64,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            lines_read: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            urls_extracted: AtomicU64::new(0),
            empty_records: AtomicU64::new(0),
            written: Default::default(),
            duplicates: Default::default(),
            excluded_files: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_line(&self, bytes: usize) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn add_extracted(&self, empty: bool) {
        self.urls_extracted.fetch_add(1, Ordering::Relaxed);
        if empty {
            self.empty_records.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn add_written(&self, category: Category) {
        self.written[category.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_duplicate(&self, category: Category) {
        self.duplicates[category.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_excluded(&self) {
        self.excluded_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_lines_read(&self) -> u64 {
        self.lines_read.load(Ordering::Relaxed)
    }

    pub fn get_bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    pub fn get_urls_extracted(&self) -> u64 {
        self.urls_extracted.load(Ordering::Relaxed)
    }

    pub fn get_empty_records(&self) -> u64 {
        self.empty_records.load(Ordering::Relaxed)
    }

    pub fn get_written(&self, category: Category) -> u64 {
        self.written[category.index()].load(Ordering::Relaxed)
    }

    pub fn get_duplicates(&self, category: Category) -> u64 {
        self.duplicates[category.index()].load(Ordering::Relaxed)
    }

    pub fn get_excluded_files(&self) -> u64 {
        self.excluded_files.load(Ordering::Relaxed)
    }

    pub fn get_write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn urls_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.get_urls_extracted() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        let errors = self.get_write_errors();

        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
        eprintln!("{}", "                    PROCESSING COMPLETE".green().bold());
        eprintln!("{}", "═".repeat(60).green());
        eprintln!();

        eprintln!("  {} {}", "URLs read:      ".green(), format_number(self.get_lines_read()));
        eprintln!("  {} {}", "Data read:      ".green(), ByteSize(self.get_bytes_read()));
        eprintln!("  {} {}", "Nothing found:  ".green(), format_number(self.get_empty_records()));
        eprintln!();

        for category in Category::ALL {
            eprintln!(
                "  {} {} new, {} duplicate",
                format!("{:<16}", format!("{}:", capitalize(category.label()))).green(),
                format_number(self.get_written(category)).green().bold(),
                format_number(self.get_duplicates(category)).yellow(),
            );
        }
        eprintln!("  {} {}", "Excluded files: ".yellow(), format_number(self.get_excluded_files()));

        if errors > 0 {
            eprintln!("  {} {}", "Write errors:   ".red(), format_number(errors).red());
        }

        eprintln!();
        eprintln!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        eprintln!("  {} {:.2} URLs/sec", "Throughput:     ".green(), self.urls_per_second());
        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a number with thousand separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("paths"), "Paths");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_stats() {
        let stats = ProcessingStats::new();

        stats.add_line(20);
        stats.add_line(30);
        stats.add_extracted(false);
        stats.add_extracted(true);
        stats.add_written(Category::Path);
        stats.add_duplicate(Category::Path);
        stats.add_duplicate(Category::Path);
        stats.add_excluded();

        assert_eq!(stats.get_lines_read(), 2);
        assert_eq!(stats.get_bytes_read(), 50);
        assert_eq!(stats.get_urls_extracted(), 2);
        assert_eq!(stats.get_empty_records(), 1);
        assert_eq!(stats.get_written(Category::Path), 1);
        assert_eq!(stats.get_duplicates(Category::Path), 2);
        assert_eq!(stats.get_written(Category::File), 0);
        assert_eq!(stats.get_excluded_files(), 1);
    }
}
