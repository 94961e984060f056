use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::line::{parse_line, InstructionLine};

#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("cannot open {}: {source}", .path.display())]
    SourceUnavailable { path: PathBuf, #[source] source: std::io::Error },
    #[error("read failed at line {line}: {source}")]
    Read { line: usize, #[source] source: std::io::Error },
}

/// Pulls instruction lines out of a disassembly listing, one at a time.
///
/// Lines that are not instructions are skipped silently and only counted.
/// After the source is exhausted or a read fails the scanner stays finished.
pub struct LineScanner<R> {
    reader: R,
    buf: String,
    line_no: usize,
    skipped: usize,
    current: Option<InstructionLine>,
    done: bool,
}

impl LineScanner<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ScanError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened disassembly source");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), line_no: 0, skipped: 0, current: None, done: false }
    }

    /// Moves to the next instruction line. `Ok(false)` once the source is exhausted.
    pub fn advance(&mut self) -> Result<bool, ScanError> {
        self.current = None;
        while !self.done {
            self.buf.clear();
            let n = match self.reader.read_line(&mut self.buf) {
                Ok(n) => n,
                Err(source) => {
                    self.done = true;
                    return Err(ScanError::Read { line: self.line_no + 1, source });
                }
            };
            if n == 0 {
                self.done = true;
                break;
            }
            self.line_no += 1;
            let text = self.buf.strip_suffix('\n').unwrap_or(&self.buf);
            let text = text.strip_suffix('\r').unwrap_or(text);
            match parse_line(text) {
                Some(line) => {
                    debug!(line = self.line_no, mnemonic = %line.mnemonic, "instruction");
                    self.current = Some(line);
                    return Ok(true);
                }
                None => {
                    trace!(line = self.line_no, "skipped");
                    self.skipped += 1;
                }
            }
        }
        Ok(false)
    }

    /// The line produced by the last successful `advance`.
    pub fn line(&self) -> Option<&InstructionLine> {
        self.current.as_ref()
    }

    /// 1-based number of the last physical line read.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = Result<InstructionLine, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => self.current.take().map(Ok),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
