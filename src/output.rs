//! Output management module
//!
//! Appends unique values to one wordlist file per category. Files are opened
//! lazily in append mode, so re-running against the same directory adds to
//! the existing lists and categories with nothing to say produce no file.

use crate::category::Category;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default buffer size for file writing (64KB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Errors raised while writing wordlists
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open {category} output {path:?}")]
    Open {
        category: Category,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write to {category} output {path:?}")]
    Write {
        category: Category,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot flush {category} output {path:?}")]
    Flush {
        category: Category,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Destination for unique values, one stream per category.
///
/// Only the aggregator writes to a sink, so implementations need no locking.
pub trait Sink: Send {
    /// Append a single value followed by a newline
    fn append(&mut self, category: Category, value: &str) -> Result<(), SinkError>;

    /// Push buffered data to its destination
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// Output file writer with buffering
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
    bytes_written: u64,
}

impl OutputWriter {
    /// Open a file for appending, creating it if needed
    pub fn append(path: PathBuf, buffer_size: usize) -> io::Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)?;

        let writer = BufWriter::with_capacity(buffer_size, file);

        Ok(Self {
            writer,
            path,
            lines_written: 0,
            bytes_written: 0,
        })
    }

    /// Write a line to the output
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.lines_written += 1;
        self.bytes_written += line.len() as u64 + 1; // +1 for newline
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get number of lines written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Get bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Wordlist files in an output directory
pub struct FileSink {
    output_dir: PathBuf,
    buffer_size: usize,
    writers: [Option<OutputWriter>; 4],
}

impl FileSink {
    pub fn new(output_dir: PathBuf) -> Self {
        Self::with_buffer_size(output_dir, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(output_dir: PathBuf, buffer_size: usize) -> Self {
        Self {
            output_dir,
            buffer_size,
            writers: [None, None, None, None],
        }
    }

    /// Path of the wordlist for a category
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.output_dir.join(category.file_name())
    }

    /// Get or open the writer for a category. A failed open is retried on
    /// the next call.
    fn writer(&mut self, category: Category) -> Result<&mut OutputWriter, SinkError> {
        let slot = &mut self.writers[category.index()];

        let writer = match slot.take() {
            Some(writer) => writer,
            None => {
                let path = self.output_dir.join(category.file_name());
                let writer = OutputWriter::append(path.clone(), self.buffer_size)
                    .map_err(|source| SinkError::Open { category, path, source })?;
                log::debug!("Opened {:?} for appending", writer.path());
                writer
            }
        };

        Ok(slot.insert(writer))
    }

    /// Lines appended this run for a category
    pub fn lines_written(&self, category: Category) -> u64 {
        self.writers[category.index()]
            .as_ref()
            .map_or(0, OutputWriter::lines_written)
    }

    /// Files that were opened during this run
    pub fn paths(&self) -> Vec<(Category, PathBuf)> {
        Category::ALL
            .iter()
            .filter_map(|&category| {
                self.writers[category.index()]
                    .as_ref()
                    .map(|w| (category, w.path().to_path_buf()))
            })
            .collect()
    }
}

impl Sink for FileSink {
    fn append(&mut self, category: Category, value: &str) -> Result<(), SinkError> {
        let writer = self.writer(category)?;
        writer.write_line(value).map_err(|source| SinkError::Write {
            category,
            path: writer.path().to_path_buf(),
            source,
        })
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let mut first_error = None;

        // Try every file even if one of them fails
        for category in Category::ALL {
            if let Some(writer) = self.writers[category.index()].as_mut() {
                if let Err(source) = writer.flush() {
                    let err = SinkError::Flush {
                        category,
                        path: writer.path().to_path_buf(),
                        source,
                    };
                    if first_error.is_none() {
                        first_error = Some(err);
                    } else {
                        log::error!("{}", err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Keeps values in memory; used by tests and library callers
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    values: [Vec<String>; 4],
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values appended for a category, in write order
    pub fn values(&self, category: Category) -> &[String] {
        &self.values[category.index()]
    }
}

impl Sink for MemorySink {
    fn append(&mut self, category: Category, value: &str) -> Result<(), SinkError> {
        self.values[category.index()].push(value.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink for dry runs: counts values and throws them away
#[derive(Debug, Default)]
pub struct DiscardSink {
    counts: [u64; 4],
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }
}

impl Sink for DiscardSink {
    fn append(&mut self, category: Category, _value: &str) -> Result<(), SinkError> {
        self.counts[category.index()] += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
