/*!
 * Line streaming for raw log files.
 *
 * Log lines are treated as opaque text: no parsing, no field extraction,
 * no trimming. A line keeps its trailing newline so the persisted row is
 * byte-identical to the source file content.
 */

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// One line of a log file, as read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based position of the line within its file
    pub number: u64,
    /// Full line text including any trailing newline
    pub text: String,
}

/// Lazy iterator over the lines of a log file.
///
/// Finite and not restartable once consumed. After the first read error
/// the iterator is fused and yields nothing further.
pub struct LogLines<R: BufRead> {
    reader: R,
    line_number: u64,
    done: bool,
}

impl LogLines<BufReader<File>> {
    /// Open a log file for streaming
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LogLines<R> {
    /// Wrap an existing reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            done: false,
        }
    }

    /// Number of the last line yielded, 0 before the first read
    pub fn current_line(&self) -> u64 {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut text = String::new();
        match self.reader.read_line(&mut text) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                Some(Ok(LogLine {
                    number: self.line_number,
                    text,
                }))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
