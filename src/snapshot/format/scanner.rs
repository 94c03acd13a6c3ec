//! Streaming fragment scanner.
//!
//! Reads a snapshot line by line and yields one [`Fragment`] per header
//! line. Only the fragment currently being assembled is held in memory.
//!
//! # Content Boundaries
//! ```text
//! // === a/b.c ===\n      ← header line (kept verbatim in Marker::raw)
//! int main(){}\n          ← content "int main(){}" + separator "\n"
//! // === c/d.h ===\n
//! #define X 1             ← content "#define X 1", no separator (EOF)
//! ```
//! Exactly one line terminator before the next header (or EOF) is the
//! separator and is not part of the content.

use std::io::BufRead;
use std::mem;
use log::{debug, trace};

use crate::snapshot::format::marker::parse_marker;
use crate::snapshot::types::error::Result;
use crate::snapshot::types::models::{Fragment, LineEnding, Marker, ParseOptions};

/// Header line waiting for its content.
struct Pending {
    marker: Marker,
    offset: u64,
    line: u64,
}

/// Iterator over the fragments of a snapshot stream.
///
/// Yields `Result<Fragment>`; an I/O error ends the iteration.
pub struct FragmentScanner<R: BufRead> {
    reader: R,
    options: ParseOptions,
    pending: Option<Pending>,
    body: Vec<u8>,
    line_buf: Vec<u8>,
    preamble: Option<Vec<u8>>,
    offset: u64,
    line_no: u64,
    finished: bool,
}

impl<R: BufRead> FragmentScanner<R> {
    pub fn new(reader: R, options: ParseOptions) -> Self {
        Self {
            reader,
            options,
            pending: None,
            body: Vec::new(),
            line_buf: Vec::new(),
            preamble: None,
            offset: 0,
            line_no: 0,
            finished: false,
        }
    }

    /// Bytes before the first header line.
    ///
    /// Available once the first fragment has been yielded, or once the
    /// scanner is exhausted for streams without any header.
    pub fn preamble(&self) -> Option<&[u8]> {
        self.preamble.as_deref()
    }

    /// Consumes the scanner, returning the preamble (empty if none was seen).
    pub fn into_preamble(self) -> Vec<u8> {
        self.preamble.unwrap_or_default()
    }

    fn close_pending(&mut self, pending: Pending) -> Fragment {
        let body = mem::take(&mut self.body);
        let (content, separator) = LineEnding::strip(&body);
        debug!(
            "Fragment {} at line {}: {} bytes",
            pending.marker.path,
            pending.line,
            content.len()
        );
        Fragment {
            marker: pending.marker,
            content: content.to_vec(),
            separator,
            offset: pending.offset,
            line: pending.line,
        }
    }
}

impl<R: BufRead> Iterator for FragmentScanner<R> {
    type Item = Result<Fragment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            self.line_buf.clear();
            let read = match self.reader.read_until(b'\n', &mut self.line_buf) {
                Ok(n) => n,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            };

            if read == 0 {
                self.finished = true;
                return match self.pending.take() {
                    Some(pending) => Some(Ok(self.close_pending(pending))),
                    None => {
                        trace!("No header line found; {} bytes of preamble", self.body.len());
                        self.preamble = Some(mem::take(&mut self.body));
                        None
                    }
                };
            }

            let line_offset = self.offset;
            self.offset += read as u64;
            self.line_no += 1;

            let (text, ending) = LineEnding::strip(&self.line_buf);
            let Some(mut marker) = parse_marker(text, self.options.encoding) else {
                self.body.extend_from_slice(&self.line_buf);
                continue;
            };
            marker.ending = ending;

            let next = Pending {
                marker,
                offset: line_offset,
                line: self.line_no,
            };
            match self.pending.replace(next) {
                Some(previous) => return Some(Ok(self.close_pending(previous))),
                None => self.preamble = Some(mem::take(&mut self.body)),
            }
        }
    }
}
