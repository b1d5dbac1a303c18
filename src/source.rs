//! Input sources
//!
//! Reads URLs line by line from piped stdin and/or a file. Files are sniffed
//! for their encoding and transcoded to UTF-8; bad bytes are replaced rather
//! than failing the run.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Read};
use std::path::Path;
use thiserror::Error;

/// Read buffer for input files
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Errors raised by an input source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot open input {name}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed reading input {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> io::Result<EncodingInfo> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    // Read sample for detection (first 64KB should be enough)
    let mut sample = vec![0u8; 64 * 1024];
    let bytes_read = reader.read(&mut sample)?;
    sample.truncate(bytes_read);

    if bytes_read == 0 {
        return Ok(EncodingInfo::default());
    }

    // Check for BOM first
    if let Some(encoding) = detect_bom(&sample) {
        return Ok(EncodingInfo {
            name: encoding.name(),
            encoding,
        });
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, true);
    let encoding = detector.guess(None, true);

    Ok(EncodingInfo {
        name: encoding.name(),
        encoding,
    })
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<&'static Encoding> {
    if content.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(encoding_rs::UTF_8);
    }
    if content.starts_with(&[0xFE, 0xFF]) {
        return Some(encoding_rs::UTF_16BE);
    }
    if content.starts_with(&[0xFF, 0xFE]) {
        return Some(encoding_rs::UTF_16LE);
    }
    None
}

/// Line iterator over any buffered reader.
///
/// Stops after the first read error, which is yielded once.
pub struct LineReader<R: BufRead> {
    reader: R,
    name: String,
    line_buffer: Vec<u8>,
    done: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line_buffer: Vec::with_capacity(4096),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<String, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                // Remove trailing newline characters
                while matches!(self.line_buffer.last(), Some(b'\n') | Some(b'\r')) {
                    self.line_buffer.pop();
                }

                let line = match std::str::from_utf8(&self.line_buffer) {
                    Ok(s) => s.to_string(),
                    Err(_) => {
                        log::warn!("Invalid UTF-8 in {}, using lossy conversion", self.name);
                        String::from_utf8_lossy(&self.line_buffer).into_owned()
                    }
                };
                Some(Ok(line))
            }
            Err(source) => {
                self.done = true;
                Some(Err(SourceError::Read {
                    name: self.name.clone(),
                    source,
                }))
            }
        }
    }
}

/// Boxed line iterator shared by all input kinds
pub type BoxedLines = Box<dyn Iterator<Item = Result<String, SourceError>>>;

/// Open a file as a UTF-8 line iterator
pub fn open_file(path: &Path) -> Result<BoxedLines, SourceError> {
    let name = path.display().to_string();
    let open_err = |source| SourceError::Open {
        name: name.clone(),
        source,
    };

    let info = detect_encoding(path).map_err(open_err)?;
    let file = File::open(path).map_err(open_err)?;
    log::debug!("Reading {} as {}", name, info.name);

    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(info.encoding))
        .build(file);
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, decoder);

    Ok(Box::new(LineReader::new(reader, name)))
}

/// Standard input as a line iterator
pub fn open_stdin() -> BoxedLines {
    Box::new(LineReader::new(io::stdin().lock(), "stdin"))
}

/// Check for piped input (not an interactive terminal)
pub fn has_stdin() -> bool {
    !io::stdin().is_terminal()
}

/// Sequence of URLs drawn from one or more sources, in order.
///
/// Blank lines are skipped. A failing source is reported and abandoned; the
/// remaining sources are still read.
pub struct LineSource {
    sources: Vec<BoxedLines>,
    current: usize,
}

impl LineSource {
    pub fn new(sources: Vec<BoxedLines>) -> Self {
        Self { sources, current: 0 }
    }

    /// Open stdin (first) and the given file (second).
    ///
    /// An unreadable file is only fatal when there is nothing else to read.
    pub fn open(file: Option<&Path>, stdin: bool) -> anyhow::Result<Self> {
        let mut sources: Vec<BoxedLines> = Vec::new();

        if stdin {
            sources.push(open_stdin());
        }

        if let Some(path) = file {
            match open_file(path) {
                Ok(lines) => sources.push(lines),
                Err(e) if !sources.is_empty() => {
                    log::error!("{}: {}", e, error_source(&e));
                }
                Err(e) => return Err(e.into()),
            }
        }

        if sources.is_empty() {
            anyhow::bail!("No input: pipe URLs on stdin or pass --file");
        }

        Ok(Self::new(sources))
    }
}

impl Iterator for LineSource {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(source) = self.sources.get_mut(self.current) {
            match source.next() {
                Some(Ok(line)) => {
                    let line = line.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
                    if line.is_empty() {
                        continue;
                    }
                    return Some(line.to_string());
                }
                Some(Err(e)) => {
                    log::error!("{}: {}", e, error_source(&e));
                    self.current += 1;
                }
                None => self.current += 1,
            }
        }
        None
    }
}

fn error_source(e: &SourceError) -> &io::Error {
    match e {
        SourceError::Open { source, .. } | SourceError::Read { source, .. } => source,
    }
}
