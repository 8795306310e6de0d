//! Reading a target file and applying the two predicates.
//!
//! Both scans work on raw bytes, so a file that is not valid UTF-8 is still
//! checked instead of being rejected. Characters and substrings are matched
//! by their UTF-8 encoding.

use std::fs::File;
use std::io::{self, BufRead, Read};
use std::path::Path;

use tracing::debug;

use crate::error::CheckError;

/// Bytes pulled from the file per read during a substring search.
const CHUNK_SIZE: usize = 64 * 1024;

/// Limits applied while reading a target file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ReadLimits {
    /// Maximum bytes read during a substring search. `None` (the default)
    /// reads files of any size. Line scans are never capped.
    pub max_file_size: Option<u64>,
}

impl ReadLimits {
    /// Limits that stop a substring search after `max_file_size` bytes.
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self {
            max_file_size: Some(max_file_size),
        }
    }
}

/// Where a forbidden character was first seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHit {
    /// 1-indexed line number.
    pub line: usize,
}

/// Outcome of a line scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineScan {
    /// The character occurs; scanning stopped at this line.
    Found(LineHit),
    /// Every line was read and none contains the character.
    Clean {
        /// Number of lines read.
        lines_scanned: usize,
    },
}

/// Open `path` for reading.
///
/// # Errors
///
/// Returns [`CheckError::Unavailable`] if the file cannot be opened.
pub fn open(path: &Path) -> Result<File, CheckError> {
    File::open(path).map_err(|source| {
        debug!(path = %path.display(), error = %source, "open failed");
        CheckError::Unavailable {
            path: path.to_owned(),
            source,
        }
    })
}

/// Scan `reader` line by line for `forbidden`, stopping at the first line
/// that contains it.
///
/// A line is everything up to `\n`; a trailing `\r` is dropped with it. The
/// last line needs no terminator. Lines after the first hit are never read.
///
/// # Errors
///
/// Returns [`CheckError::Read`] if reading fails before a verdict is reached.
pub fn scan_for_forbidden_char<R: BufRead>(
    mut reader: R,
    forbidden: char,
    path: &Path,
) -> Result<LineScan, CheckError> {
    let mut encoded = [0u8; 4];
    let needle = forbidden.encode_utf8(&mut encoded).as_bytes();

    let mut buffer = Vec::new();
    let mut line_no: usize = 0;
    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| CheckError::Read {
                path: path.to_owned(),
                source,
            })?;
        if read == 0 {
            debug!(lines = line_no, "no forbidden character found");
            return Ok(LineScan::Clean {
                lines_scanned: line_no,
            });
        }
        line_no += 1;

        if contains_bytes(strip_line_ending(&buffer), needle) {
            debug!(line = line_no, "forbidden character found");
            return Ok(LineScan::Found(LineHit { line: line_no }));
        }
    }
}

/// Search `reader` for every literal in `required` without holding the whole
/// file in memory.
///
/// Returns the positions in `required` of the literals that never occur, in
/// order; an empty result means all are present. Reading stops as soon as
/// every literal has been seen, so `max_file_size` only rejects files whose
/// search needed more bytes than the cap.
///
/// # Errors
///
/// Returns [`CheckError::Read`] on an I/O failure and [`CheckError::TooLarge`]
/// if more than `max_file_size` bytes had to be read.
pub fn find_missing_substrings<R: Read>(
    mut reader: R,
    required: &[String],
    path: &Path,
    max_file_size: Option<u64>,
) -> Result<Vec<usize>, CheckError> {
    let mut search = SubstringSearch::new(required);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    while !search.all_found() {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(CheckError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        total = total.saturating_add(read as u64);
        if let Some(limit) = max_file_size
            && total > limit
        {
            return Err(CheckError::TooLarge {
                path: path.to_owned(),
                limit,
            });
        }
        search.feed(&chunk[..read]);
    }

    debug!(bytes = total, "substring search finished");
    Ok(search.missing())
}

/// Positions in `required` of the literals that do not occur in `content`.
///
/// An empty result means every literal is present. An empty literal is
/// always present.
#[must_use]
pub fn missing_substrings(content: &[u8], required: &[String]) -> Vec<usize> {
    let mut search = SubstringSearch::new(required);
    search.feed(content);
    search.missing()
}

/// `true` only if every literal in `required` occurs in `content`.
#[must_use]
pub fn scan_for_required_substrings(content: &[u8], required: &[String]) -> bool {
    missing_substrings(content, required).is_empty()
}

/// Incremental containment check over content fed in pieces.
///
/// Keeps the last `longest - 1` bytes between pieces so a literal split
/// across two reads is still found.
struct SubstringSearch<'a> {
    required: &'a [String],
    found: Vec<bool>,
    overlap: usize,
    window: Vec<u8>,
}

impl<'a> SubstringSearch<'a> {
    fn new(required: &'a [String]) -> Self {
        let overlap = required
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .saturating_sub(1);
        Self {
            required,
            found: required.iter().map(String::is_empty).collect(),
            overlap,
            window: Vec::new(),
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        self.window.extend_from_slice(bytes);
        for (needle, seen) in self.required.iter().zip(self.found.iter_mut()) {
            if !*seen && contains_bytes(&self.window, needle.as_bytes()) {
                *seen = true;
            }
        }
        let keep_from = self.window.len().saturating_sub(self.overlap);
        self.window.drain(..keep_from);
    }

    fn all_found(&self) -> bool {
        self.found.iter().all(|seen| *seen)
    }

    fn missing(&self) -> Vec<usize> {
        self.found
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(index, _)| index)
            .collect()
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
