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

//! Lexical tokens produced by the [`Lexer`](crate::Lexer).
//!
//! For the segment `N1*ST*ACME*92:X~` with default X12 syntax the lexer
//! yields:
//!
//! ```text
//! SegmentStart("N1")
//! Simple("ST")
//! Simple("ACME")
//! SubElement { value: "92", index: 1, first: true, last: false }
//! SubElement { value: "X", index: 2, first: false, last: true }
//! SegmentEnd
//! ```

use std::fmt;

/// One component of a composite element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubValue {
    /// Component text.
    pub value: String,
    /// 1-based position within the composite.
    pub index: usize,
    /// First component of the composite.
    pub first: bool,
    /// Last component of the composite.
    pub last: bool,
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of a segment, carrying its tag.
    SegmentStart(String),
    /// Segment terminator reached.
    SegmentEnd,
    /// A simple element value.
    Simple(String),
    /// One component of a composite element.
    SubElement(SubValue),
    /// The next value repeats the current element.
    Repetition,
    /// An element with no content.
    Empty,
    /// Input exhausted.
    EndOfData,
}

impl Token {
    /// Returns `true` for tokens that carry or stand for an element value.
    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self, Token::Simple(_) | Token::SubElement(_) | Token::Empty)
    }

    /// Segment tag of a `SegmentStart` token.
    #[inline]
    pub fn as_segment_start(&self) -> Option<&str> {
        match self {
            Token::SegmentStart(tag) => Some(tag),
            _ => None,
        }
    }

    /// Text of a simple value; the first component of a composite; `""` for `Empty`.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Simple(value) => Some(value),
            Token::SubElement(sub) => Some(&sub.value),
            Token::Empty => Some(""),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::SegmentStart(tag) => write!(f, "segment start '{}'", tag),
            Token::SegmentEnd => f.write_str("segment end"),
            Token::Simple(value) => write!(f, "value '{}'", value),
            Token::SubElement(sub) => write!(f, "sub-element {} '{}'", sub.index, sub.value),
            Token::Repetition => f.write_str("repetition"),
            Token::Empty => f.write_str("empty value"),
            Token::EndOfData => f.write_str("end of data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_value() {
        assert!(Token::Simple("X".into()).is_value());
        assert!(Token::Empty.is_value());
        assert!(!Token::SegmentEnd.is_value());
        assert!(!Token::Repetition.is_value());
    }

    #[test]
    fn test_text() {
        assert_eq!(Token::Simple("850".into()).text(), Some("850"));
        assert_eq!(Token::Empty.text(), Some(""));
        let sub = Token::SubElement(SubValue {
            value: "UNOA".into(),
            index: 1,
            first: true,
            last: false,
        });
        assert_eq!(sub.text(), Some("UNOA"));
        assert_eq!(Token::EndOfData.text(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Token::SegmentStart("ISA".into()).to_string(),
            "segment start 'ISA'"
        );
        assert_eq!(Token::EndOfData.to_string(), "end of data");
    }
}
