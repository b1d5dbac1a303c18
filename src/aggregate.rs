//! Aggregation of extracted records
//!
//! The aggregator is the only owner of the dedup registry and the sink. It
//! runs on a single thread, which makes "check, insert, write" atomic without
//! any locking.

use crate::category::Category;
use crate::dedup::DedupRegistry;
use crate::extract::ExtractedRecord;
use crate::filter::ExclusionFilter;
use crate::output::Sink;
use crate::progress::ProcessingStats;

use crossbeam_channel::Receiver;
use std::sync::Arc;

/// Single consumer turning records into unique wordlist entries
pub struct Aggregator<S: Sink> {
    registry: DedupRegistry,
    exclusions: ExclusionFilter,
    sink: S,
    stats: Arc<ProcessingStats>,
}

impl<S: Sink> Aggregator<S> {
    pub fn new(sink: S, exclusions: ExclusionFilter, stats: Arc<ProcessingStats>) -> Self {
        Self {
            registry: DedupRegistry::new(),
            exclusions,
            sink,
            stats,
        }
    }

    /// Handle one record. Categories are independent of each other.
    pub fn consume(&mut self, record: ExtractedRecord) {
        if let Some(file) = record.file {
            if self.exclusions.is_excluded(&file) {
                self.stats.add_excluded();
            } else {
                self.emit(Category::File, &file);
            }
        }

        if let Some(path) = record.path {
            self.emit(Category::Path, &path);
        }

        if let Some(subdomain) = record.subdomain {
            self.emit(Category::Subdomain, &subdomain);
        }

        for param in &record.parameters {
            self.emit(Category::Parameter, param);
        }
    }

    /// Dedup a value and write it if it is new. Write failures are logged and
    /// counted; they never stop the run.
    fn emit(&mut self, category: Category, value: &str) {
        if value.is_empty() {
            return;
        }

        if !self.registry.insert(category, value) {
            self.stats.add_duplicate(category);
            return;
        }

        match self.sink.append(category, value) {
            Ok(()) => self.stats.add_written(category),
            Err(e) => {
                self.stats.add_write_error();
                log::error!("{}: {}", e, error_chain(&e));
            }
        }
    }

    /// Drain the channel until every sender is gone, then flush and hand the
    /// sink back.
    pub fn run(mut self, records: Receiver<ExtractedRecord>) -> S {
        for record in records {
            self.consume(record);
        }

        if let Err(e) = self.sink.flush() {
            self.stats.add_write_error();
            log::error!("{}: {}", e, error_chain(&e));
        }

        log::debug!(
            "Aggregator drained; dedup sets hold ~{} bytes",
            self.registry.memory_usage()
        );
        self.sink
    }

    pub fn registry(&self) -> &DedupRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut source = e.source();
    while let Some(err) = source {
        parts.push(err.to_string());
        source = err.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::output::{FileSink, MemorySink};
    use tempfile::TempDir;

    fn aggregator() -> Aggregator<MemorySink> {
        Aggregator::new(
            MemorySink::new(),
            ExclusionFilter::from_list(".png,.jpg"),
            Arc::new(ProcessingStats::new()),
        )
    }

    #[test]
    fn test_record_feeds_every_category() {
        let mut agg = aggregator();
        agg.consume(extract("https://api.dev.example.com/users/123/profile.json?token=abc&id=5"));

        let sink = agg.sink();
        assert_eq!(sink.values(Category::File), &["profile.json"]);
        assert_eq!(sink.values(Category::Path), &["/users/123"]);
        assert_eq!(sink.values(Category::Subdomain), &["api"]);
        assert_eq!(sink.values(Category::Parameter), &["token", "id"]);
    }

    #[test]
    fn test_duplicates_are_written_once() {
        let mut agg = aggregator();
        for _ in 0..3 {
            agg.consume(extract("https://www.example.com/a/b/c.php?x=1"));
        }
        agg.consume(extract("https://www.example.com/a/b/d.php?x=2&y=3"));

        let sink = agg.sink();
        assert_eq!(sink.values(Category::Subdomain), &["www"]);
        assert_eq!(sink.values(Category::Path), &["/a/b"]);
        assert_eq!(sink.values(Category::File), &["c.php", "d.php"]);
        assert_eq!(sink.values(Category::Parameter), &["x", "y"]);
        assert_eq!(agg.stats.get_duplicates(Category::Subdomain), 3);
    }

    #[test]
    fn test_excluded_files_never_written() {
        let mut agg = aggregator();
        agg.consume(extract("https://cdn.example.com/img/logo.png"));
        agg.consume(extract("https://cdn.example.com/img/photo.jpg"));

        let sink = agg.sink();
        assert!(sink.values(Category::File).is_empty());
        assert_eq!(sink.values(Category::Path), &["/img/logo.png", "/img/photo.jpg"]);
        assert_eq!(agg.stats.get_excluded_files(), 2);
        assert!(!agg.registry().contains(Category::File, "logo.png"));
    }

    #[test]
    fn test_same_value_in_different_categories() {
        let mut agg = aggregator();
        agg.consume(ExtractedRecord {
            subdomain: Some("admin".to_string()),
            path: Some("/admin".to_string()),
            file: Some("admin".to_string()),
            parameters: vec!["admin".to_string()],
        });

        for category in Category::ALL {
            assert_eq!(agg.sink().values(category), &["admin"]);
        }
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("paths.txt")).unwrap();

        let stats = Arc::new(ProcessingStats::new());
        let mut agg = Aggregator::new(
            FileSink::new(temp_dir.path().to_path_buf()),
            ExclusionFilter::default(),
            Arc::clone(&stats),
        );
        agg.consume(extract("https://www.example.com/admin/login.php"));

        let (tx, rx) = crossbeam_channel::unbounded();
        drop(tx);
        agg.run(rx);

        assert_eq!(stats.get_write_errors(), 1);
        let files = std::fs::read_to_string(temp_dir.path().join("files.txt")).unwrap();
        let subs = std::fs::read_to_string(temp_dir.path().join("subdomains.txt")).unwrap();
        assert_eq!(files, "login.php\n");
        assert_eq!(subs, "www\n");
    }

    #[test]
    fn test_run_drains_channel() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        let handle = std::thread::spawn(move || aggregator().run(rx));

        for i in 0..10 {
            tx.send(extract(&format!("https://example.com/p{}?id={}", i, i))).unwrap();
        }
        drop(tx);

        let sink = handle.join().unwrap();
        assert_eq!(sink.values(Category::Path).len(), 10);
        assert_eq!(sink.values(Category::Parameter), &["id"]);
    }
}
