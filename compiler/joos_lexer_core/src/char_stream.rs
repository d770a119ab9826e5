//! Buffered, rewindable character source over one source unit.
//!
//! The stream keeps a growable byte buffer between two cursors: the *mark*
//! (the last committed position, where the current token attempt starts) and
//! the *read* cursor. The tokenizer reads ahead through `next()`, rewinds to
//! the mark to retry another automaton, and finally commits the winning
//! prefix with `advance()`.
//!
//! # Invariant
//!
//! The buffer always holds every byte between the mark and the read cursor,
//! so rewinding never touches the underlying reader. Compaction on refill
//! copies the `mark..end` window to the front of the buffer; the buffer
//! doubles when the window occupies its front half, which bounds buffered
//! lookahead to one token's maximum length.
//!
//! Input must be 7-bit ASCII; the first byte with the high bit set is a hard
//! error at read time.

use std::io;
use std::io::Read;

/// Initial buffer size in bytes. Grows by doubling.
const INITIAL_CAPACITY: usize = 1024;

/// Errors surfaced by the character source.
#[derive(Debug)]
pub enum CharStreamError {
    /// `next()` was called with no characters left.
    EndOfInput,
    /// A byte outside 7-bit ASCII was read.
    NonAscii { byte: u8 },
    /// The underlying reader failed.
    Io(io::Error),
}

impl std::fmt::Display for CharStreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharStreamError::EndOfInput => write!(f, "read past end of input"),
            CharStreamError::NonAscii { byte } => {
                write!(f, "non-ASCII byte 0x{byte:02X} in input")
            }
            CharStreamError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for CharStreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CharStreamError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CharStreamError {
    fn from(e: io::Error) -> Self {
        CharStreamError::Io(e)
    }
}

/// A buffered, seekable reader over the raw bytes of one source unit.
///
/// Tracks the 1-based (line, column) of the mark; `advance()` commits
/// characters and updates the bookkeeping (`\n` increments the line and
/// resets the column).
pub struct CharStream<R> {
    input: R,
    buf: Vec<u8>,
    /// Committed position: start of the current token attempt.
    mark: usize,
    /// Read cursor; `mark <= read <= end`.
    read: usize,
    /// Number of valid bytes in `buf`.
    end: usize,
    input_eof: bool,
    line: u32,
    col: u32,
}

impl<'a> CharStream<&'a [u8]> {
    /// Stream over an in-memory slice. Test and tooling convenience.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        CharStream::new(bytes)
    }
}

impl<R: Read> CharStream<R> {
    /// Create a stream over `input` with the default buffer size.
    pub fn new(input: R) -> Self {
        Self::with_capacity(input, INITIAL_CAPACITY)
    }

    /// Create a stream with a specific initial buffer size.
    ///
    /// Small capacities force early growth/compaction; the default is fine
    /// outside of tests.
    pub fn with_capacity(input: R, capacity: usize) -> Self {
        CharStream {
            input,
            buf: vec![0; capacity.max(1)],
            mark: 0,
            read: 0,
            end: 0,
            input_eof: false,
            line: 1,
            col: 1,
        }
    }

    /// Line of the mark (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the mark (1-based).
    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Bytes read but not yet committed (`mark..read`).
    ///
    /// Used for diagnostics when no automaton matches.
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.mark..self.read]
    }

    /// True when the underlying reader is exhausted and every buffered byte
    /// has been consumed by the read cursor.
    ///
    /// May read from the underlying source to find out, hence `&mut` and
    /// the `io::Error` case.
    pub fn is_end_of_input(&mut self) -> Result<bool, CharStreamError> {
        if self.read < self.end {
            return Ok(false);
        }
        if !self.input_eof {
            self.refill()?;
        }
        Ok(self.input_eof && self.read == self.end)
    }

    /// Return the next ASCII character and advance the read cursor.
    pub fn next(&mut self) -> Result<char, CharStreamError> {
        if self.read == self.end {
            if !self.input_eof {
                self.refill()?;
            }
            if self.read == self.end {
                return Err(CharStreamError::EndOfInput);
            }
        }
        let byte = self.buf[self.read];
        if byte & 0x80 != 0 {
            return Err(CharStreamError::NonAscii { byte });
        }
        self.read += 1;
        Ok(byte as char)
    }

    /// Return the read cursor to the mark.
    ///
    /// Never touches the underlying reader: the bytes between mark and read
    /// cursor are always buffered.
    pub fn rewind_to_mark(&mut self) {
        self.read = self.mark;
    }

    /// Commit the mark forward by `n` already-read characters, updating the
    /// (line, column) bookkeeping.
    ///
    /// `n` must not exceed the number of buffered bytes past the mark.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(
            self.mark + n <= self.end,
            "advance({n}) past buffered input (mark {}, end {})",
            self.mark,
            self.end
        );
        let committed = &self.buf[self.mark..self.mark + n];
        let newlines = memchr::memchr_iter(b'\n', committed).count();
        if newlines == 0 {
            self.col += n as u32;
        } else {
            // Column restarts after the last newline in the committed run.
            let last_nl = memchr::memrchr(b'\n', committed).unwrap_or(0);
            self.line += newlines as u32;
            self.col = (n - last_nl) as u32;
        }
        self.mark += n;
        self.read = self.mark;
    }

    /// Make room past `end` and read more bytes from the underlying source.
    ///
    /// Keeps the `mark..end` window intact: doubles the buffer when the
    /// window starts in the front half (the window may be most of the
    /// buffer), otherwise slides it to the front in place.
    fn refill(&mut self) -> Result<(), CharStreamError> {
        if self.end == self.buf.len() {
            if self.mark < self.buf.len() / 2 {
                let mut grown = vec![0; self.buf.len() * 2];
                grown[..self.end - self.mark].copy_from_slice(&self.buf[self.mark..self.end]);
                self.buf = grown;
            } else {
                self.buf.copy_within(self.mark..self.end, 0);
            }
            self.end -= self.mark;
            self.read -= self.mark;
            self.mark = 0;
        }

        loop {
            match self.input.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.input_eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(CharStreamError::Io(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests;
