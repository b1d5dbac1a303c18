//! Core processing engine
//!
//! Fans URLs out to a pool of extraction workers and fans the records back in
//! to a single aggregator:
//!
//! ```text
//! lines -> url queue -> [workers] -> record queue -> aggregator -> sink
//! ```
//!
//! The coordinator waits for every worker to finish, closes the record queue,
//! then waits for the aggregator to drain it.

use crate::aggregate::Aggregator;
use crate::category::Category;
use crate::cli::Args;
use crate::extract::{extract, ExtractedRecord};
use crate::filter::ExclusionFilter;
use crate::output::{ensure_output_dir, DiscardSink, FileSink, Sink};
use crate::progress::{create_spinner, print_bullet, print_header, print_info, print_success, print_warning, ProcessingStats};

use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

/// Default number of extraction workers
pub const DEFAULT_WORKERS: usize = 50;

/// Default capacity of each bounded queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub exclusions: ExclusionFilter,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub show_stats: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            exclusions: ExclusionFilter::from_list(crate::filter::DEFAULT_EXCLUDED_EXTENSIONS),
            output_dir: PathBuf::from("./"),
            dry_run: false,
            quiet: true,
            verbose: false,
            show_stats: false,
        }
    }
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let config = Self {
            worker_count: args.threads,
            queue_capacity: args.queue_size,
            exclusions: args.get_exclusions(),
            output_dir: args.output.clone(),
            dry_run: args.dry_run,
            quiet: args.quiet,
            verbose: args.verbose,
            show_stats: args.stats,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or break the pipeline
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.worker_count == 0 {
            anyhow::bail!("Thread count must be at least 1");
        }
        if self.queue_capacity == 0 {
            anyhow::bail!("Queue size must be at least 1");
        }
        Ok(())
    }
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    stats: Arc<ProcessingStats>,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Run the pipeline over `lines`, writing wordlists to the configured
    /// output directory (or nowhere, for a dry run).
    pub fn process<I>(&self, lines: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        self.config.validate()?;

        if self.config.dry_run {
            if !self.config.quiet {
                print_header("DRY RUN - No files will be written");
            }
            let sink = self.run(lines, DiscardSink::new())?;
            if !self.config.quiet {
                for category in Category::ALL {
                    print_bullet(&format!(
                        "{}: {} new entries",
                        category.file_name(),
                        sink.count(category)
                    ));
                }
            }
            return Ok(());
        }

        ensure_output_dir(&self.config.output_dir)?;

        if !self.config.quiet {
            print_header("Extracting wordlists...");
            print_info(&format!("Output dir: {:?}", self.config.output_dir));
        }

        let sink = self.run(lines, FileSink::new(self.config.output_dir.clone()))?;

        if !self.config.quiet {
            let paths = sink.paths();
            if paths.is_empty() {
                print_warning("Nothing worth keeping was found");
            } else {
                print_success("Output files updated:");
                for (category, path) in paths {
                    print_bullet(&format!(
                        "{:?} (+{} {})",
                        path,
                        sink.lines_written(category),
                        category
                    ));
                }
            }
        }

        Ok(())
    }

    /// Run the pipeline into any sink and return the sink once every record
    /// has been aggregated.
    pub fn run<I, S>(&self, lines: I, sink: S) -> anyhow::Result<S>
    where
        I: IntoIterator<Item = String>,
        S: Sink + 'static,
    {
        self.config.validate()?;
        let workers = self.config.worker_count;

        let (url_tx, url_rx) = bounded::<String>(self.config.queue_capacity);
        let (record_tx, record_rx) = bounded::<ExtractedRecord>(self.config.queue_capacity);

        // Aggregator owns dedup state and the sink for the whole run
        let aggregator = Aggregator::new(sink, self.config.exclusions.clone(), Arc::clone(&self.stats));
        let aggregator = thread::Builder::new()
            .name("maul-aggregator".to_string())
            .spawn(move || aggregator.run(record_rx))?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("maul-worker-{}", i))
            .build()?;

        let spinner = if self.config.quiet {
            indicatif::ProgressBar::hidden()
        } else {
            create_spinner("Reading input...")
        };

        log::debug!("Starting {} extraction workers", workers);

        // Returns once every spawned worker has finished
        pool.in_place_scope(|scope| {
            for _ in 0..workers {
                let urls = url_rx.clone();
                let records = record_tx.clone();
                let stats = Arc::clone(&self.stats);
                scope.spawn(move |_| worker(urls, records, &stats));
            }
            // Only workers hold the url queue open; if they all stop, sends fail
            drop(url_rx);

            for line in lines {
                self.stats.add_line(line.len() + 1);
                spinner.inc(1);
                if url_tx.send(line).is_err() {
                    // All workers gone; nothing left to feed
                    break;
                }
            }

            // Closing the url queue lets workers drain and exit
            drop(url_tx);
        });

        spinner.finish_and_clear();

        // Last sender gone: the aggregator sees the end of the record queue
        drop(record_tx);

        log::debug!("Workers finished; waiting for aggregator");
        let sink = aggregator
            .join()
            .map_err(|_| anyhow::anyhow!("Aggregator thread panicked"))?;

        if !self.config.quiet || self.config.show_stats {
            self.stats.print_summary();
        }

        Ok(sink)
    }

    /// Get processing statistics
    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }
}

/// Extraction worker: one URL in, one record out, until the url queue closes
fn worker(urls: Receiver<String>, records: Sender<ExtractedRecord>, stats: &ProcessingStats) {
    for url in urls {
        let record = extract(&url);
        stats.add_extracted(record.is_empty());
        if records.send(record).is_err() {
            break;
        }
    }
}
