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

//! Tokenizer for delimiter-separated EDI text.
//!
//! The [`TokenSource`] trait is the contract the envelope state machines pull
//! from. [`Lexer`] implements it over any [`Read`] given a [`SyntaxProfile`].
//!
//! # Raw Data
//!
//! Binary segments declare a byte length and are followed by that many raw
//! bytes, which may contain any syntax character. The state machine reads
//! them with [`TokenSource::get_chars`]; afterwards the lexer expects either
//! the segment terminator or another element delimiter.
//!
//! # Examples
//!
//! ```rust
//! use edi_core::{Lexer, SyntaxProfile, Token, TokenSource};
//! use std::io::Cursor;
//!
//! let mut lexer = Lexer::new(Cursor::new("ST*850*0001~"), SyntaxProfile::x12_default());
//!
//! assert_eq!(lexer.next_token().unwrap(), Token::SegmentStart("ST".into()));
//! assert_eq!(lexer.next_token().unwrap(), Token::Simple("850".into()));
//! assert_eq!(lexer.next_token().unwrap(), Token::Simple("0001".into()));
//! assert_eq!(lexer.next_token().unwrap(), Token::SegmentEnd);
//! assert_eq!(lexer.next_token().unwrap(), Token::EndOfData);
//! ```

use crate::config::ParserConfig;
use crate::error::{EdiError, EdiResult};
use crate::reader::ByteReader;
use crate::syntax::{char_label, CharacterEncoding, SyntaxProfile};
use crate::token::{SubValue, Token};
use std::collections::VecDeque;
use std::io::Read;

/// Source of lexical tokens for the envelope state machines.
///
/// Setters exist because an interchange may switch characters or encoding
/// after its header has been read.
pub trait TokenSource {
    /// Next token, consuming it.
    fn next_token(&mut self) -> EdiResult<Token>;

    /// Up to `n` raw bytes ahead of the current position, not consumed.
    fn lookahead(&mut self, n: usize) -> EdiResult<Vec<u8>>;

    /// Return a token so the next [`next_token`](Self::next_token) yields it.
    ///
    /// Only one token may be pushed back at a time.
    fn unget_token(&mut self, token: Token);

    /// Consume exactly `n` raw bytes.
    ///
    /// Fails with [`EdiError::UnexpectedEnd`] if fewer remain.
    fn get_chars(&mut self, n: usize) -> EdiResult<Vec<u8>>;

    /// Consume `n` raw bytes forming one complete segment, terminator included.
    ///
    /// Used for headers whose content is itself syntax characters.
    fn raw_segment(&mut self, n: usize) -> EdiResult<Vec<u8>>;

    /// Discard the rest of the current segment and return the next token.
    fn skip_segment(&mut self) -> EdiResult<Token>;

    /// Current syntax characters.
    fn syntax(&self) -> &SyntaxProfile;

    /// Mutable access to the syntax characters.
    fn syntax_mut(&mut self) -> &mut SyntaxProfile;

    /// Number of segments started so far.
    fn segment_count(&self) -> usize;

    /// Bytes consumed so far.
    fn offset(&self) -> u64;

    /// Replace all syntax characters.
    fn set_syntax(&mut self, syntax: SyntaxProfile) {
        *self.syntax_mut() = syntax;
    }

    fn set_delimiter(&mut self, delimiter: u8) {
        self.syntax_mut().delimiter = delimiter;
    }

    fn set_sub_delimiter(&mut self, sub_delimiter: u8) {
        self.syntax_mut().sub_delimiter = sub_delimiter;
    }

    fn set_terminator(&mut self, terminator: u8) {
        self.syntax_mut().terminator = terminator;
    }

    fn set_release(&mut self, release: Option<u8>) {
        self.syntax_mut().release = release;
    }

    fn set_repetition(&mut self, repetition: Option<u8>) {
        self.syntax_mut().repetition = repetition;
    }

    fn set_encoding(&mut self, encoding: CharacterEncoding) {
        self.syntax_mut().encoding = encoding;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between segments; next is a tag.
    Between,
    /// Inside a segment; next is an element.
    InSegment,
    /// Raw bytes were just read inside a segment.
    AfterRaw,
}

enum FieldEnd {
    Delimiter,
    Terminator,
    Repetition,
    Eof,
}

/// Tokenizer over a byte stream.
pub struct Lexer<R: Read> {
    reader: ByteReader<R>,
    syntax: SyntaxProfile,
    state: State,
    queue: VecDeque<Token>,
    pushed: Option<Token>,
    segments: usize,
    max_element_length: usize,
}

impl<R: Read> Lexer<R> {
    /// Create a lexer with default limits.
    pub fn new(reader: R, syntax: SyntaxProfile) -> Self {
        Self::with_config(reader, syntax, &ParserConfig::default())
    }

    /// Create a lexer using the buffer size and element limit from `config`.
    pub fn with_config(reader: R, syntax: SyntaxProfile, config: &ParserConfig) -> Self {
        Self {
            reader: ByteReader::with_capacity(reader, config.buffer_size),
            syntax,
            state: State::Between,
            queue: VecDeque::new(),
            pushed: None,
            segments: 0,
            max_element_length: config.max_element_length,
        }
    }

    /// Returns `true` when positioned before a segment tag with nothing queued.
    pub fn at_segment_boundary(&self) -> bool {
        self.state == State::Between && self.queue.is_empty() && self.pushed.is_none()
    }

    fn is_filler(&self, b: u8) -> bool {
        if b == self.syntax.delimiter || b == self.syntax.sub_delimiter {
            return false;
        }
        b == self.syntax.terminator
            || b.is_ascii_whitespace()
            || self.syntax.terminator_suffix.contains(&b)
    }

    fn too_long(&self) -> EdiError {
        EdiError::ElementTooLong {
            segment: self.segments,
            limit: self.max_element_length,
        }
    }

    fn read_tag(&mut self) -> EdiResult<Token> {
        loop {
            match self.reader.peek_byte()? {
                None => return Ok(Token::EndOfData),
                Some(b) if self.is_filler(b) => {
                    self.reader.next_byte()?;
                }
                Some(_) => break,
            }
        }

        let mut tag = Vec::with_capacity(3);
        loop {
            match self.reader.next_byte()? {
                None => {
                    self.queue.push_back(Token::EndOfData);
                    break;
                }
                Some(b) if b == self.syntax.delimiter => {
                    self.state = State::InSegment;
                    break;
                }
                Some(b) if b == self.syntax.terminator => {
                    self.queue.push_back(Token::SegmentEnd);
                    break;
                }
                Some(b) => {
                    tag.push(b);
                    if tag.len() > self.max_element_length {
                        return Err(self.too_long());
                    }
                }
            }
        }

        self.segments += 1;
        let tag = self.syntax.encoding.decode(&tag);
        Ok(Token::SegmentStart(tag.trim().to_string()))
    }

    fn read_field(&mut self) -> EdiResult<Token> {
        let mut parts: Vec<Vec<u8>> = vec![Vec::new()];
        let mut length = 0usize;

        let end = loop {
            let Some(b) = self.reader.next_byte()? else {
                break FieldEnd::Eof;
            };
            let byte = if Some(b) == self.syntax.release {
                match self.reader.next_byte()? {
                    Some(escaped) => escaped,
                    None => break FieldEnd::Eof,
                }
            } else if b == self.syntax.delimiter {
                break FieldEnd::Delimiter;
            } else if b == self.syntax.terminator {
                break FieldEnd::Terminator;
            } else if Some(b) == self.syntax.repetition {
                break FieldEnd::Repetition;
            } else if b == self.syntax.sub_delimiter {
                parts.push(Vec::new());
                continue;
            } else {
                b
            };

            length += 1;
            if length > self.max_element_length {
                return Err(self.too_long());
            }
            if let Some(part) = parts.last_mut() {
                part.push(byte);
            }
        };

        self.enqueue_value(parts);
        match end {
            FieldEnd::Delimiter => {}
            FieldEnd::Repetition => self.queue.push_back(Token::Repetition),
            FieldEnd::Terminator => {
                self.queue.push_back(Token::SegmentEnd);
                self.state = State::Between;
            }
            FieldEnd::Eof => {
                self.queue.push_back(Token::EndOfData);
                self.state = State::Between;
            }
        }
        Ok(self.queue.pop_front().unwrap_or(Token::EndOfData))
    }

    fn enqueue_value(&mut self, parts: Vec<Vec<u8>>) {
        let encoding = self.syntax.encoding;
        if parts.len() == 1 {
            let token = match parts.first() {
                Some(value) if !value.is_empty() => Token::Simple(encoding.decode(value)),
                _ => Token::Empty,
            };
            self.queue.push_back(token);
            return;
        }

        let count = parts.len();
        for (i, part) in parts.iter().enumerate() {
            self.queue.push_back(Token::SubElement(SubValue {
                value: encoding.decode(part),
                index: i + 1,
                first: i == 0,
                last: i + 1 == count,
            }));
        }
    }

    fn after_raw(&mut self) -> EdiResult<Token> {
        match self.reader.peek_byte()? {
            None => {
                self.state = State::Between;
                Ok(Token::EndOfData)
            }
            Some(b) if b == self.syntax.terminator => {
                self.reader.next_byte()?;
                self.state = State::Between;
                Ok(Token::SegmentEnd)
            }
            Some(b) if b == self.syntax.delimiter => {
                self.reader.next_byte()?;
                self.state = State::InSegment;
                self.read_field()
            }
            Some(b) => Err(EdiError::unexpected_token(
                self.segments,
                "delimiter or terminator after raw data",
                char_label(b),
            )),
        }
    }
}

impl<R: Read> TokenSource for Lexer<R> {
    fn next_token(&mut self) -> EdiResult<Token> {
        if let Some(token) = self.pushed.take() {
            return Ok(token);
        }
        if let Some(token) = self.queue.pop_front() {
            return Ok(token);
        }
        match self.state {
            State::Between => self.read_tag(),
            State::InSegment => self.read_field(),
            State::AfterRaw => self.after_raw(),
        }
    }

    fn lookahead(&mut self, n: usize) -> EdiResult<Vec<u8>> {
        Ok(self.reader.peek(n)?.to_vec())
    }

    fn unget_token(&mut self, token: Token) {
        self.pushed = Some(token);
    }

    fn get_chars(&mut self, n: usize) -> EdiResult<Vec<u8>> {
        let bytes = self.reader.take(n)?;
        if bytes.len() < n {
            return Err(EdiError::unexpected_end(
                self.segments,
                format!("expected {} bytes of raw data, found {}", n, bytes.len()),
            ));
        }
        if self.state == State::InSegment {
            self.state = State::AfterRaw;
        }
        Ok(bytes)
    }

    fn raw_segment(&mut self, n: usize) -> EdiResult<Vec<u8>> {
        let bytes = self.get_chars(n)?;
        self.state = State::Between;
        self.segments += 1;
        Ok(bytes)
    }

    fn skip_segment(&mut self) -> EdiResult<Token> {
        self.pushed = None;
        let ended = self
            .queue
            .iter()
            .any(|t| matches!(t, Token::SegmentEnd | Token::EndOfData));
        self.queue.clear();
        if !ended && self.state != State::Between {
            self.reader.skip_past(self.syntax.terminator)?;
        }
        self.state = State::Between;
        self.next_token()
    }

    fn syntax(&self) -> &SyntaxProfile {
        &self.syntax
    }

    fn syntax_mut(&mut self) -> &mut SyntaxProfile {
        &mut self.syntax
    }

    fn segment_count(&self) -> usize {
        self.segments
    }

    fn offset(&self) -> u64 {
        self.reader.offset()
    }
}
