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

//! Syntax characters of an EDI interchange.
//!
//! EDI streams carry no self-description beyond their first segment. The
//! [`SyntaxProfile`] captures the characters discovered by sniffing that
//! segment, and is handed to the [`Lexer`](crate::Lexer) so it can split the
//! remainder of the stream into tokens.
//!
//! # Examples
//!
//! ```rust
//! use edi_core::SyntaxProfile;
//!
//! let profile = SyntaxProfile::edifact_default();
//! assert_eq!(profile.delimiter, b'+');
//! assert_eq!(profile.sub_delimiter, b':');
//! assert_eq!(profile.terminator, b'\'');
//! assert_eq!(profile.release, Some(b'?'));
//! assert!(profile.validate().is_ok());
//! ```

use crate::error::{EdiError, EdiResult};
use std::fmt;

/// EDI standard family of an interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Standard {
    /// ANSI ASC X12 (ISA/GS/ST envelopes).
    X12,
    /// UN/EDIFACT (UNB/UNG/UNH envelopes).
    Edifact,
}

impl Standard {
    /// Name used for the `Standard` attribute of interchange nodes.
    pub fn name(&self) -> &'static str {
        match self {
            Standard::X12 => "ANSI X12",
            Standard::Edifact => "EDIFACT",
        }
    }

    /// Short key used by plugin registries.
    pub fn key(&self) -> &'static str {
        match self {
            Standard::X12 => "ANSI",
            Standard::Edifact => "EDIFACT",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character encoding implied by an interchange's syntax identifier.
///
/// X12 interchanges are always treated as [`CharacterEncoding::Ascii`].
/// EDIFACT syntax identifiers (`UNOA`, `UNOC`, `UNOY`, ...) select one of the
/// others. Only UTF-8 and the single-byte encodings are decoded by the lexer;
/// single-byte encodings decode byte-for-byte, leaving code page translation
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterEncoding {
    #[default]
    Ascii,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Iso2022,
    Utf8,
}

impl CharacterEncoding {
    /// IANA-style label.
    pub fn label(&self) -> &'static str {
        match self {
            CharacterEncoding::Ascii => "US-ASCII",
            CharacterEncoding::Iso8859_1 => "ISO-8859-1",
            CharacterEncoding::Iso8859_2 => "ISO-8859-2",
            CharacterEncoding::Iso8859_3 => "ISO-8859-3",
            CharacterEncoding::Iso8859_4 => "ISO-8859-4",
            CharacterEncoding::Iso8859_5 => "ISO-8859-5",
            CharacterEncoding::Iso8859_6 => "ISO-8859-6",
            CharacterEncoding::Iso8859_7 => "ISO-8859-7",
            CharacterEncoding::Iso8859_8 => "ISO-8859-8",
            CharacterEncoding::Iso8859_9 => "ISO-8859-9",
            CharacterEncoding::Iso2022 => "ISO-2022",
            CharacterEncoding::Utf8 => "UTF-8",
        }
    }

    /// Returns `true` for multi-byte UTF-8 decoding.
    #[inline]
    pub fn is_utf8(&self) -> bool {
        matches!(self, CharacterEncoding::Utf8)
    }

    /// Decode raw element bytes into text.
    pub fn decode(&self, bytes: &[u8]) -> String {
        if self.is_utf8() {
            String::from_utf8_lossy(bytes).into_owned()
        } else {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// The syntax characters of one interchange.
///
/// Determined once per interchange by the sniffer and immutable afterwards,
/// except through the explicit setters on the token source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxProfile {
    /// Data element separator.
    pub delimiter: u8,
    /// Component (sub-element) separator.
    pub sub_delimiter: u8,
    /// Sub-component separator, rarely used.
    pub sub_sub_delimiter: Option<u8>,
    /// Segment terminator.
    pub terminator: u8,
    /// Bytes that customarily follow the terminator (line endings).
    pub terminator_suffix: Vec<u8>,
    /// Release (escape) character.
    pub release: Option<u8>,
    /// Repetition separator.
    pub repetition: Option<u8>,
    /// Decimal mark for numeric values.
    pub decimal_mark: u8,
    /// Encoding of element text.
    pub encoding: CharacterEncoding,
}

impl SyntaxProfile {
    /// Common X12 syntax: `*` `:` `~`, repetition `^`.
    pub fn x12_default() -> Self {
        Self {
            delimiter: b'*',
            sub_delimiter: b':',
            sub_sub_delimiter: None,
            terminator: b'~',
            terminator_suffix: Vec::new(),
            release: None,
            repetition: Some(b'^'),
            decimal_mark: b'.',
            encoding: CharacterEncoding::Ascii,
        }
    }

    /// EDIFACT syntax level A defaults (`UNA:+.?*'`, syntax version 4).
    pub fn edifact_default() -> Self {
        Self {
            delimiter: b'+',
            sub_delimiter: b':',
            sub_sub_delimiter: None,
            terminator: b'\'',
            terminator_suffix: Vec::new(),
            release: Some(b'?'),
            repetition: Some(b'*'),
            decimal_mark: b'.',
            encoding: CharacterEncoding::Ascii,
        }
    }

    /// EDIFACT syntax level B defaults (information separators IS1, IS3, IS4).
    pub fn edifact_level_b() -> Self {
        Self {
            delimiter: 0x1D,
            sub_delimiter: 0x1F,
            sub_sub_delimiter: None,
            terminator: 0x1C,
            terminator_suffix: Vec::new(),
            release: None,
            repetition: None,
            decimal_mark: b'.',
            encoding: CharacterEncoding::Ascii,
        }
    }

    /// All framing characters currently assigned.
    pub fn assigned(&self) -> Vec<u8> {
        let mut chars = vec![self.delimiter, self.sub_delimiter, self.terminator];
        chars.extend(self.sub_sub_delimiter);
        chars.extend(self.release);
        chars.extend(self.repetition);
        chars
    }

    /// Returns `true` if `b` is one of the framing characters.
    #[inline]
    pub fn is_syntax_char(&self, b: u8) -> bool {
        b == self.delimiter
            || b == self.sub_delimiter
            || b == self.terminator
            || Some(b) == self.sub_sub_delimiter
            || Some(b) == self.release
            || Some(b) == self.repetition
    }

    /// Check that the framing characters and the decimal mark are
    /// pairwise distinct.
    pub fn validate(&self) -> EdiResult<()> {
        let chars = self.assigned();
        for (i, a) in chars.iter().enumerate() {
            if chars[i + 1..].contains(a) {
                return Err(EdiError::Syntax(format!(
                    "syntax character {} is assigned more than once",
                    char_label(*a)
                )));
            }
        }
        if chars.contains(&self.decimal_mark) {
            return Err(EdiError::Syntax(format!(
                "decimal mark {} is also a syntax character",
                char_label(self.decimal_mark)
            )));
        }
        Ok(())
    }
}

impl Default for SyntaxProfile {
    fn default() -> Self {
        Self::x12_default()
    }
}

/// Render a syntax byte for attributes and messages.
///
/// Printable ASCII renders as itself; anything else as `0xNN`, which keeps
/// control characters such as the EDIFACT level B separators out of XML.
pub fn char_label(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        char::from(b).to_string()
    } else {
        format!("0x{:02X}", b)
    }
}

/// Render a byte sequence with [`char_label`], concatenated.
pub fn bytes_label(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char_label(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x12_default_is_valid() {
        let profile = SyntaxProfile::x12_default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.assigned(), vec![b'*', b':', b'~', b'^']);
    }

    #[test]
    fn test_level_b_is_valid() {
        let profile = SyntaxProfile::edifact_level_b();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.release, None);
    }

    #[test]
    fn test_duplicate_characters_rejected() {
        let mut profile = SyntaxProfile::x12_default();
        profile.repetition = Some(b'*');
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_decimal_mark_must_differ() {
        let mut profile = SyntaxProfile::edifact_default();
        profile.decimal_mark = b':';
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("decimal mark :"));

        profile.decimal_mark = b',';
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_is_syntax_char() {
        let profile = SyntaxProfile::edifact_default();
        assert!(profile.is_syntax_char(b'?'));
        assert!(profile.is_syntax_char(b'*'));
        assert!(!profile.is_syntax_char(b'.'));
        assert!(!profile.is_syntax_char(b'A'));
    }

    #[test]
    fn test_char_label() {
        assert_eq!(char_label(b'~'), "~");
        assert_eq!(char_label(b' '), " ");
        assert_eq!(char_label(0x1D), "0x1D");
        assert_eq!(char_label(b'\n'), "0x0A");
        assert_eq!(bytes_label(b"\r\n"), "0x0D0x0A");
    }

    #[test]
    fn test_decode_latin1_and_utf8() {
        let bytes = [b'M', 0xFC, b'n'];
        assert_eq!(CharacterEncoding::Iso8859_1.decode(&bytes), "Mün");

        let utf8 = "Müller".as_bytes();
        assert_eq!(CharacterEncoding::Utf8.decode(utf8), "Müller");
        assert_eq!(CharacterEncoding::Ascii.decode(b"ABC"), "ABC");
    }

    #[test]
    fn test_standard_names() {
        assert_eq!(Standard::X12.name(), "ANSI X12");
        assert_eq!(Standard::Edifact.to_string(), "EDIFACT");
        assert_eq!(Standard::X12.key(), "ANSI");
    }
}
