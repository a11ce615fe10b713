// Dweve EDI - Streaming EDI Structural Parser
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Byte reader for the tokenizer.
//!
//! Provides buffered byte-by-byte reading with offset tracking, lookahead
//! that does not consume input, and the ability to push bytes back.
//!
//! EDI has no line structure (segments end at a terminator that may or may
//! not be followed by a newline), so the reader works on raw bytes. The
//! lookahead window is what the syntax sniffer inspects before any token is
//! produced.

use crate::error::EdiResult;
use std::io::{ErrorKind, Read};

/// Buffered byte reader with lookahead and push back.
///
/// # Examples
///
/// ## Peeking Ahead
///
/// ```rust
/// use edi_core::ByteReader;
/// use std::io::Cursor;
///
/// let mut reader = ByteReader::new(Cursor::new("UNA:+.? 'UNB"));
///
/// // Peek without consuming
/// assert_eq!(reader.peek(3).unwrap(), b"UNA");
/// assert_eq!(reader.peek(3).unwrap(), b"UNA");
/// assert_eq!(reader.offset(), 0);
///
/// // Now consume it
/// assert_eq!(reader.take(3).unwrap(), b"UNA".to_vec());
/// assert_eq!(reader.offset(), 3);
/// ```
///
/// ## Push Back
///
/// ```rust
/// use edi_core::ByteReader;
/// use std::io::Cursor;
///
/// let mut reader = ByteReader::new(Cursor::new("ISA*00"));
/// let tag = reader.take(3).unwrap();
/// reader.push_back(&tag);
/// assert_eq!(reader.take(4).unwrap(), b"ISA*".to_vec());
/// ```
pub struct ByteReader<R: Read> {
    inner: R,
    buffer: Vec<u8>,
    pos: usize,
    chunk: usize,
    eof: bool,
    consumed: u64,
}

impl<R: Read> ByteReader<R> {
    /// Create a new byte reader with a 64KB read size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, 64 * 1024)
    }

    /// Create with a specific read size.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            inner: reader,
            buffer: Vec::new(),
            pos: 0,
            chunk: capacity.max(1),
            eof: false,
            consumed: 0,
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.consumed
    }

    #[inline]
    fn available(&self) -> usize {
        self.buffer.len() - self.pos
    }

    fn fill(&mut self, want: usize) -> EdiResult<()> {
        while self.available() < want && !self.eof {
            if self.pos > 0 && self.pos >= self.buffer.len() / 2 {
                self.buffer.drain(..self.pos);
                self.pos = 0;
            }

            let start = self.buffer.len();
            self.buffer.resize(start + self.chunk, 0);
            let read = loop {
                match self.inner.read(&mut self.buffer[start..]) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.buffer.truncate(start);
                        return Err(e.into());
                    }
                }
            };
            self.buffer.truncate(start + read);
            if read == 0 {
                self.eof = true;
            }
        }
        Ok(())
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.pos += n;
        self.consumed += n as u64;
    }

    /// Look at up to `n` bytes without consuming them.
    ///
    /// The returned slice is shorter than `n` only at end of input.
    pub fn peek(&mut self, n: usize) -> EdiResult<&[u8]> {
        self.fill(n)?;
        let end = (self.pos + n).min(self.buffer.len());
        Ok(&self.buffer[self.pos..end])
    }

    /// Look at the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&mut self) -> EdiResult<Option<u8>> {
        self.fill(1)?;
        Ok(self.buffer.get(self.pos).copied())
    }

    /// Read the next byte.
    #[inline]
    pub fn next_byte(&mut self) -> EdiResult<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.advance(1);
        }
        Ok(byte)
    }

    /// Read up to `n` bytes; fewer only at end of input.
    pub fn take(&mut self, n: usize) -> EdiResult<Vec<u8>> {
        self.fill(n)?;
        let end = (self.pos + n).min(self.buffer.len());
        let out = self.buffer[self.pos..end].to_vec();
        self.advance(out.len());
        Ok(out)
    }

    /// Push bytes back to be read again.
    pub fn push_back(&mut self, bytes: &[u8]) {
        self.buffer
            .splice(self.pos..self.pos, bytes.iter().copied());
        self.consumed = self.consumed.saturating_sub(bytes.len() as u64);
    }

    /// Consume input up to and including the next `byte`.
    ///
    /// Returns `false` if input ended first.
    pub fn skip_past(&mut self, byte: u8) -> EdiResult<bool> {
        loop {
            if let Some(i) = memchr::memchr(byte, &self.buffer[self.pos..]) {
                self.advance(i + 1);
                return Ok(true);
            }
            let rest = self.available();
            self.advance(rest);
            if self.eof {
                return Ok(false);
            }
            self.fill(1)?;
            if self.available() == 0 {
                return Ok(false);
            }
        }
    }

    /// Returns `true` when no input remains.
    #[inline]
    pub fn is_eof(&mut self) -> EdiResult<bool> {
        Ok(self.peek_byte()?.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_bytes() {
        let mut reader = ByteReader::new(Cursor::new("AB"));
        assert_eq!(reader.next_byte().unwrap(), Some(b'A'));
        assert_eq!(reader.next_byte().unwrap(), Some(b'B'));
        assert_eq!(reader.next_byte().unwrap(), None);
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn test_empty_input() {
        let mut reader = ByteReader::new(Cursor::new(""));
        assert!(reader.is_eof().unwrap());
        assert_eq!(reader.peek(10).unwrap(), b"");
        assert_eq!(reader.take(10).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut reader = ByteReader::new(Cursor::new("ISA*00*"));
        assert_eq!(reader.peek(4).unwrap(), b"ISA*");
        assert_eq!(reader.peek(2).unwrap(), b"IS");
        assert_eq!(reader.offset(), 0);
        assert_eq!(reader.next_byte().unwrap(), Some(b'I'));
    }

    #[test]
    fn test_peek_past_end() {
        let mut reader = ByteReader::new(Cursor::new("UNB"));
        assert_eq!(reader.peek(128).unwrap(), b"UNB");
    }

    #[test]
    fn test_small_capacity_lookahead() {
        let mut reader = ByteReader::with_capacity(Cursor::new("0123456789"), 1);
        assert_eq!(reader.peek(8).unwrap(), b"01234567");
        assert_eq!(reader.take(3).unwrap(), b"012".to_vec());
        assert_eq!(reader.peek(7).unwrap(), b"3456789");
    }

    #[test]
    fn test_push_back_restores_offset() {
        let mut reader = ByteReader::new(Cursor::new("ST*850"));
        let taken = reader.take(3).unwrap();
        assert_eq!(reader.offset(), 3);
        reader.push_back(&taken);
        assert_eq!(reader.offset(), 0);
        assert_eq!(reader.take(6).unwrap(), b"ST*850".to_vec());
    }

    #[test]
    fn test_push_back_different_bytes() {
        let mut reader = ByteReader::new(Cursor::new("BC"));
        reader.next_byte().unwrap();
        reader.push_back(b"XA");
        assert_eq!(reader.take(3).unwrap(), b"XAC".to_vec());
    }

    #[test]
    fn test_skip_past() {
        let mut reader = ByteReader::with_capacity(Cursor::new("REF*ZZ*1~N1*ST~"), 2);
        assert!(reader.skip_past(b'~').unwrap());
        assert_eq!(reader.peek(2).unwrap(), b"N1");
        assert!(reader.skip_past(b'~').unwrap());
        assert!(!reader.skip_past(b'~').unwrap());
        assert!(reader.is_eof().unwrap());
    }

    #[test]
    fn test_binary_content() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut reader = ByteReader::new(Cursor::new(data.clone()));
        assert_eq!(reader.take(256).unwrap(), data);
    }

    #[test]
    fn test_many_small_reads() {
        let input = "X".repeat(100_000);
        let mut reader = ByteReader::with_capacity(Cursor::new(input), 7);
        let mut count = 0;
        while reader.next_byte().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 100_000);
    }
}
