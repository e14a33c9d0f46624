//! Line-oriented input for the `,` instruction and the bare shell.

use std::io::{self, BufRead};

/// A source that yields one line of raw bytes at a time with its terminator
/// removed. Lines need not be valid UTF-8.
pub trait LineSource {
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Reads lines from the process stdin.
///
/// Every read goes through the shared stdin buffer, so several `StdinLines`
/// (the shell and the interpreter, say) can interleave without losing data.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinLines;

impl LineSource for StdinLines {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        match io::stdin().lock().read_until(b'\n', &mut line)? {
            0 => Ok(None),
            _ => Ok(Some(strip_line_ending(line))),
        }
    }
}

/// Adapts any buffered reader into a [`LineSource`].
#[derive(Debug)]
pub struct BufLines<R> {
    reader: R,
}

impl<R: BufRead> BufLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufLines<R> {
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line)? {
            0 => Ok(None),
            _ => Ok(Some(strip_line_ending(line))),
        }
    }
}

/// Remove one trailing `\n` or `\r\n`.
pub fn strip_line_ending(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    line
}
