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

//! Syntax discovery from the first bytes of an interchange.
//!
//! # X12
//!
//! The ISA segment has exactly 16 elements. Byte 3 is the element
//! delimiter; the two bytes after the 16th delimiter are the sub-element
//! separator (ISA16) and the segment terminator. The byte after the 11th
//! delimiter is the repetition separator in 4020 and later; older data
//! carries a letter there, which is ignored.
//!
//! # EDIFACT
//!
//! An optional `UNA` service string advice lists the characters at fixed
//! offsets. Anything it does not provide comes from the defaults of the
//! syntax identifier in `UNB` (`UNOA`, `UNOB`, ...), which also selects the
//! character encoding. The level A repetition separator `*` only exists from
//! syntax version 4; earlier versions and messages without `UNB` have none.
//!
//! # Examples
//!
//! ```rust
//! use edi_stream::{sniff, Dialect};
//!
//! let result = sniff(b"UNA:+.? 'UNB+UNOA:1+SENDER+RECEIVER+250101:1200+1'").unwrap();
//! assert_eq!(result.dialect, Dialect::Edifact);
//! assert_eq!(result.profile.delimiter, b'+');
//! assert_eq!(result.profile.sub_delimiter, b':');
//! assert_eq!(result.profile.decimal_mark, b'.');
//! assert_eq!(result.profile.release, Some(b'?'));
//! assert_eq!(result.profile.terminator, b'\'');
//! ```

use crate::dialect::{Dialect, DialectRegistry};
use edi_core::{
    bytes_label, char_label, CharacterEncoding, EdiError, EdiResult, Standard, SyntaxProfile,
};

/// Bytes of lookahead the parser hands to the sniffer.
pub const LOOKAHEAD: usize = 512;

const BOM: &[u8] = b"\xEF\xBB\xBF";
const X12_ELEMENTS: usize = 16;
const UNA_LEN: usize = 9;
const DOS_EOF: u8 = 0x1A;

/// Syntax discovered for one interchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffResult {
    /// Envelope grammar.
    pub dialect: Dialect,
    /// Standard family of the dialect.
    pub standard: Standard,
    /// Syntax characters and encoding.
    pub profile: SyntaxProfile,
    /// Bytes before the first segment (byte order mark, whitespace).
    pub leading: usize,
    /// Literal bytes of the first segment, terminator included.
    pub first_segment: Vec<u8>,
    /// Length of a `UNA` segment to consume before tokenizing.
    pub una_length: Option<usize>,
    /// EDIFACT syntax identifier such as `UNOC`.
    pub syntax_identifier: Option<String>,
}

/// Sniff with the default dialect prefixes.
pub fn sniff(lookahead: &[u8]) -> EdiResult<SniffResult> {
    sniff_with(&DialectRegistry::default(), lookahead)
}

/// Sniff using `registry` to pick the dialect.
pub fn sniff_with(registry: &DialectRegistry, lookahead: &[u8]) -> EdiResult<SniffResult> {
    let leading = leading_len(lookahead);
    let body = &lookahead[leading..];
    if body.is_empty() {
        return Err(EdiError::Sniff("no EDI data found".to_string()));
    }
    if body.len() < 3 {
        return Err(EdiError::Sniff(format!(
            "input too short to identify: '{}'",
            bytes_label(body)
        )));
    }

    let dialect = registry.lookup(body).ok_or_else(|| {
        EdiError::Sniff(format!(
            "unrecognized leading tag '{}'",
            bytes_label(&body[..3])
        ))
    })?;

    let mut result = match dialect {
        Dialect::X12 => sniff_x12(body)?,
        Dialect::Edifact | Dialect::EdifactBare => sniff_edifact(body)?,
    };
    result.leading = leading;
    Ok(result)
}

/// Length of a byte order mark plus filler at the start of `buf`.
///
/// Filler is whitespace, NUL padding and the DOS end-of-file marker `0x1A`.
pub fn leading_len(buf: &[u8]) -> usize {
    let bom = if buf.starts_with(BOM) { BOM.len() } else { 0 };
    bom + buf[bom..].iter().take_while(|&&b| is_filler(b)).count()
}

fn is_filler(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x00 || b == DOS_EOF
}

fn acceptable(b: u8, used: &[u8], allow_newline: bool) -> bool {
    if used.contains(&b) || b.is_ascii_alphanumeric() {
        return false;
    }
    if b.is_ascii_whitespace() {
        return allow_newline && (b == b'\n' || b == b'\r');
    }
    true
}

fn sniff_x12(buf: &[u8]) -> EdiResult<SniffResult> {
    if buf.len() < 4 {
        return Err(EdiError::Sniff("ISA segment too short".to_string()));
    }
    let delimiter = buf[3];
    if !acceptable(delimiter, &[], false) {
        return Err(EdiError::Sniff(format!(
            "invalid element delimiter {}",
            char_label(delimiter)
        )));
    }

    let positions: Vec<usize> = memchr::memchr_iter(delimiter, buf)
        .take(X12_ELEMENTS)
        .collect();
    if positions.len() < X12_ELEMENTS {
        return Err(EdiError::Sniff(format!(
            "ISA segment incomplete: found {} of {} element delimiters",
            positions.len(),
            X12_ELEMENTS
        )));
    }

    let last = positions[X12_ELEMENTS - 1];
    if buf.len() < last + 3 {
        return Err(EdiError::Sniff(
            "ISA segment truncated before segment terminator".to_string(),
        ));
    }
    let sub_delimiter = buf[last + 1];
    let terminator = buf[last + 2];
    if !acceptable(sub_delimiter, &[delimiter], false) {
        return Err(EdiError::Sniff(format!(
            "invalid sub-element separator {}",
            char_label(sub_delimiter)
        )));
    }
    if !acceptable(terminator, &[delimiter, sub_delimiter], true) {
        return Err(EdiError::Sniff(format!(
            "invalid segment terminator {}",
            char_label(terminator)
        )));
    }

    let terminator_suffix: Vec<u8> = buf[last + 3..]
        .iter()
        .copied()
        .take_while(|b| !b.is_ascii_alphabetic())
        .collect();

    let candidate = buf[positions[10] + 1];
    let repetition = if candidate.is_ascii_alphanumeric()
        || candidate.is_ascii_whitespace()
        || [delimiter, sub_delimiter, terminator].contains(&candidate)
    {
        None
    } else {
        Some(candidate)
    };

    // X12 declares no decimal mark.
    let used = [Some(delimiter), Some(sub_delimiter), Some(terminator), repetition];
    let decimal_mark = if used.contains(&Some(b'.')) { b',' } else { b'.' };

    let profile = SyntaxProfile {
        delimiter,
        sub_delimiter,
        sub_sub_delimiter: None,
        terminator,
        terminator_suffix,
        release: None,
        repetition,
        decimal_mark,
        encoding: CharacterEncoding::Ascii,
    };
    profile.validate()?;

    Ok(SniffResult {
        dialect: Dialect::X12,
        standard: Standard::X12,
        profile,
        leading: 0,
        first_segment: buf[..last + 3].to_vec(),
        una_length: None,
        syntax_identifier: None,
    })
}

/// Characters read from a `UNA` segment.
struct ServiceAdvice {
    sub_delimiter: u8,
    delimiter: u8,
    decimal_mark: u8,
    release: Option<u8>,
    repetition: Option<u8>,
    terminator: u8,
}

fn optional_char(b: u8) -> Option<u8> {
    (b != b' ').then_some(b)
}

fn sniff_edifact(buf: &[u8]) -> EdiResult<SniffResult> {
    let mut advice = None;
    let mut suffix = Vec::new();
    let mut offset = 0;

    if buf.starts_with(b"UNA") {
        if buf.len() < UNA_LEN {
            return Err(EdiError::Sniff("UNA segment too short".to_string()));
        }
        advice = Some(ServiceAdvice {
            sub_delimiter: buf[3],
            delimiter: buf[4],
            decimal_mark: buf[5],
            release: optional_char(buf[6]),
            repetition: optional_char(buf[7]),
            terminator: buf[8],
        });
        suffix = buf[UNA_LEN..]
            .iter()
            .copied()
            .take_while(|b| b.is_ascii_whitespace())
            .collect();
        offset = UNA_LEN + suffix.len();
    }

    let header = &buf[offset..];
    let dialect = if header.starts_with(b"UNB") {
        Dialect::Edifact
    } else if header.starts_with(b"UNH") {
        Dialect::EdifactBare
    } else {
        return Err(EdiError::Sniff(format!(
            "expected UNB or UNH, found '{}'",
            bytes_label(&header[..header.len().min(3)])
        )));
    };
    if header.len() < 4 {
        return Err(EdiError::Sniff(format!(
            "{} segment too short",
            String::from_utf8_lossy(&header[..3])
        )));
    }

    let mut identifier = None;
    let mut defaults = SyntaxProfile {
        repetition: None,
        ..SyntaxProfile::edifact_default()
    };
    if dialect == Dialect::Edifact {
        let id = header.get(4..8).ok_or_else(|| {
            EdiError::Sniff("UNB segment too short for syntax identifier".to_string())
        })?;
        let level = id[3];
        if !level.is_ascii_alphabetic() {
            return Err(EdiError::Sniff(format!(
                "invalid syntax identifier '{}'",
                bytes_label(id)
            )));
        }
        if level == b'B' {
            defaults = SyntaxProfile::edifact_level_b();
        } else if syntax_version(header).is_some_and(|v| v >= 4) {
            defaults.repetition = Some(b'*');
        }
        defaults.encoding = encoding_for_identifier(id);
        identifier = Some(String::from_utf8_lossy(id).into_owned());
    }

    let mut profile = match advice {
        Some(una) => SyntaxProfile {
            delimiter: una.delimiter,
            sub_delimiter: una.sub_delimiter,
            sub_sub_delimiter: None,
            terminator: una.terminator,
            terminator_suffix: Vec::new(),
            release: una.release,
            repetition: una.repetition,
            decimal_mark: una.decimal_mark,
            encoding: defaults.encoding,
        },
        None => SyntaxProfile {
            delimiter: header[3],
            ..defaults
        },
    };

    if suffix.is_empty() {
        suffix = scan_suffix(header, &profile);
    }
    profile.terminator_suffix = suffix;
    profile.validate()?;

    let first_segment = if advice_present(buf) {
        buf[..UNA_LEN].to_vec()
    } else {
        let end = find_terminator(header, &profile)
            .map(|i| i + 1)
            .unwrap_or(header.len());
        header[..end].to_vec()
    };

    Ok(SniffResult {
        dialect,
        standard: Standard::Edifact,
        profile,
        leading: 0,
        first_segment,
        una_length: advice_present(buf).then_some(UNA_LEN),
        syntax_identifier: identifier,
    })
}

/// Syntax version number from `UNB` S001, the digits after the identifier
/// and its sub-delimiter.
fn syntax_version(header: &[u8]) -> Option<u32> {
    let digits: Vec<u8> = header
        .get(9..)?
        .iter()
        .copied()
        .take_while(u8::is_ascii_digit)
        .collect();
    std::str::from_utf8(&digits).ok()?.parse().ok()
}

fn advice_present(buf: &[u8]) -> bool {
    buf.starts_with(b"UNA")
}

fn find_terminator(header: &[u8], profile: &SyntaxProfile) -> Option<usize> {
    let mut i = 0;
    while i < header.len() {
        let b = header[i];
        if Some(b) == profile.release {
            i += 2;
            continue;
        }
        if b == profile.terminator {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Up to two non-letter bytes after the first terminator.
fn scan_suffix(header: &[u8], profile: &SyntaxProfile) -> Vec<u8> {
    match find_terminator(header, profile) {
        Some(i) => header[i + 1..]
            .iter()
            .copied()
            .take(2)
            .take_while(|b| !b.is_ascii_alphabetic() && !profile.is_syntax_char(*b))
            .collect(),
        None => Vec::new(),
    }
}

/// Encoding implied by an EDIFACT syntax identifier.
pub fn encoding_for_identifier(identifier: &[u8]) -> CharacterEncoding {
    match identifier.get(3) {
        Some(b'C') => CharacterEncoding::Iso8859_1,
        Some(b'D') => CharacterEncoding::Iso8859_2,
        Some(b'E') => CharacterEncoding::Iso8859_5,
        Some(b'F') => CharacterEncoding::Iso8859_7,
        Some(b'G') => CharacterEncoding::Iso8859_3,
        Some(b'H') => CharacterEncoding::Iso8859_4,
        Some(b'I') => CharacterEncoding::Iso8859_6,
        Some(b'J') => CharacterEncoding::Iso8859_8,
        Some(b'K') => CharacterEncoding::Iso8859_9,
        Some(b'W') | Some(b'Y') => CharacterEncoding::Utf8,
        Some(b'X') => CharacterEncoding::Iso2022,
        _ => CharacterEncoding::Ascii,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISA: &str = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *250101*1200*^*00501*000000001*0*T*:~";

    // ==================== X12 ====================

    #[test]
    fn test_x12_basic() {
        let r = sniff(format!("{}GS*PO~", ISA).as_bytes()).unwrap();
        assert_eq!(r.dialect, Dialect::X12);
        assert_eq!(r.standard, Standard::X12);
        assert_eq!(r.profile.delimiter, b'*');
        assert_eq!(r.profile.sub_delimiter, b':');
        assert_eq!(r.profile.terminator, b'~');
        assert_eq!(r.profile.repetition, Some(b'^'));
        assert_eq!(r.profile.release, None);
        assert!(r.profile.terminator_suffix.is_empty());
        assert_eq!(r.first_segment, ISA.as_bytes());
    }

    #[test]
    fn test_x12_crlf_suffix() {
        let r = sniff(format!("{}\r\nGS*PO~", ISA).as_bytes()).unwrap();
        assert_eq!(r.profile.terminator_suffix, b"\r\n".to_vec());
    }

    #[test]
    fn test_x12_newline_terminator() {
        let isa = ISA.replace('~', "\n");
        let r = sniff(format!("{}GS*PO\n", isa).as_bytes()).unwrap();
        assert_eq!(r.profile.terminator, b'\n');
    }

    #[test]
    fn test_x12_4010_has_no_repetition() {
        let isa = ISA.replace("*^*00501*", "*U*00401*");
        let r = sniff(isa.as_bytes()).unwrap();
        assert_eq!(r.profile.repetition, None);
    }

    #[test]
    fn test_x12_other_delimiters() {
        let mut isa = ISA.replace('*', "|").replace(":~", ">").into_bytes();
        isa.push(0x85);
        let r = sniff(&isa).unwrap();
        assert_eq!(r.profile.delimiter, b'|');
        assert_eq!(r.profile.sub_delimiter, b'>');
        assert_eq!(r.profile.terminator, 0x85);
    }

    #[test]
    fn test_x12_incomplete() {
        let err = sniff(b"ISA*00*          *00*").unwrap_err();
        assert!(err.to_string().contains("incomplete"));
    }

    #[test]
    fn test_x12_alphanumeric_terminator_rejected() {
        let isa = ISA.replace(":~", ":A");
        assert!(sniff(isa.as_bytes()).is_err());
    }

    #[test]
    fn test_leading_bom_and_whitespace() {
        let input = format!("\u{FEFF}\r\n  {}", ISA);
        let r = sniff(input.as_bytes()).unwrap();
        assert_eq!(r.leading, 3 + 4);
        assert_eq!(r.dialect, Dialect::X12);
    }

    // ==================== EDIFACT ====================

    #[test]
    fn test_filler_before_data() {
        assert_eq!(leading_len(b"\x1A"), 1);
        assert_eq!(leading_len(b"\0\0\r\nISA"), 4);
        assert_eq!(leading_len(b"ISA"), 0);
    }

    #[test]
    fn test_x12_decimal_mark_avoids_delimiters() {
        let isa = ISA.replace('*', ".");
        let r = sniff(isa.as_bytes()).unwrap();
        assert_eq!(r.profile.delimiter, b'.');
        assert_eq!(r.profile.decimal_mark, b',');
    }

    #[test]
    fn test_una_characters() {
        let r = sniff(b"UNA:+.? 'UNB+UNOA:1+S+R+250101:1200+1'").unwrap();
        assert_eq!(r.una_length, Some(9));
        assert_eq!(r.first_segment, b"UNA:+.? '".to_vec());
        assert_eq!(r.profile.repetition, None);
        assert_eq!(r.syntax_identifier.as_deref(), Some("UNOA"));
        assert_eq!(r.profile.encoding, CharacterEncoding::Ascii);
    }

    #[test]
    fn test_una_custom_characters_and_suffix() {
        let r = sniff(b"UNA|*,!^#\nUNB*UNOC|3*S*R*250101|1200*7#\n").unwrap();
        assert_eq!(r.profile.sub_delimiter, b'|');
        assert_eq!(r.profile.delimiter, b'*');
        assert_eq!(r.profile.decimal_mark, b',');
        assert_eq!(r.profile.release, Some(b'!'));
        assert_eq!(r.profile.repetition, Some(b'^'));
        assert_eq!(r.profile.terminator, b'#');
        assert_eq!(r.profile.terminator_suffix, b"\n".to_vec());
        assert_eq!(r.profile.encoding, CharacterEncoding::Iso8859_1);
    }

    #[test]
    fn test_unb_without_una_uses_identifier_defaults() {
        let r = sniff(b"UNB+UNOY:4+S+R+250101:1200+1'\r\nUNH+1+ORDERS:D:96A:UN'").unwrap();
        assert_eq!(r.una_length, None);
        assert_eq!(r.profile.delimiter, b'+');
        assert_eq!(r.profile.release, Some(b'?'));
        assert_eq!(r.profile.encoding, CharacterEncoding::Utf8);
        assert_eq!(r.profile.terminator_suffix, b"\r\n".to_vec());
        assert_eq!(r.first_segment, b"UNB+UNOY:4+S+R+250101:1200+1'".to_vec());
    }

    #[test]
    fn test_syntax_version_4_repeats_with_asterisk() {
        let r = sniff(b"UNB+UNOY:4+S+R+250101:1200+1'").unwrap();
        assert_eq!(r.profile.repetition, Some(b'*'));
    }

    #[test]
    fn test_syntax_version_3_has_no_repetition() {
        let r = sniff(b"UNB+UNOA:3+S+R+250101:1200+1'UNH+1+ORDERS:D:96A:UN'").unwrap();
        assert_eq!(r.profile.repetition, None);
        assert_eq!(r.profile.release, Some(b'?'));
        assert!(!r.profile.is_syntax_char(b'*'));
    }

    #[test]
    fn test_bare_message_has_no_repetition() {
        let r = sniff(b"UNH+1+ORDERS:D:96A:UN'FTX+AAI+++5*3'").unwrap();
        assert_eq!(r.profile.repetition, None);
    }

    #[test]
    fn test_una_decimal_mark_clash_rejected() {
        let err = sniff(b"UNA:+:? 'UNB+UNOA:3+S+R+250101:1200+1'").unwrap_err();
        assert!(err.to_string().contains("decimal mark"));
    }

    #[test]
    fn test_level_b_identifier() {
        let r = sniff(b"UNB\x1DUNOB\x1F3\x1DS\x1DR\x1C").unwrap();
        assert_eq!(r.profile.delimiter, 0x1D);
        assert_eq!(r.profile.sub_delimiter, 0x1F);
        assert_eq!(r.profile.terminator, 0x1C);
        assert_eq!(r.profile.release, None);
    }

    #[test]
    fn test_invalid_identifier_level() {
        let err = sniff(b"UNB+UNO1:1+S+R+250101:1200+1'").unwrap_err();
        assert!(err.to_string().contains("syntax identifier"));
    }

    #[test]
    fn test_bare_message() {
        let r = sniff(b"UNH+1+ORDERS:D:96A:UN'BGM+220'").unwrap();
        assert_eq!(r.dialect, Dialect::EdifactBare);
        assert_eq!(r.syntax_identifier, None);
    }

    #[test]
    fn test_una_then_bare_message() {
        let r = sniff(b"UNA:+.? 'UNH+1+ORDERS:D:96A:UN'").unwrap();
        assert_eq!(r.dialect, Dialect::EdifactBare);
    }

    #[test]
    fn test_una_duplicate_characters_rejected() {
        assert!(sniff(b"UNA++.? 'UNB+UNOA:1'").is_err());
    }

    // ==================== Failures ====================

    #[test]
    fn test_empty_and_unknown() {
        assert!(sniff(b"").is_err());
        assert!(sniff(b"   \n").is_err());
        let err = sniff(b"<?xml version").unwrap_err();
        assert!(err.to_string().contains("unrecognized"));
    }

    #[test]
    fn test_encoding_table() {
        assert_eq!(encoding_for_identifier(b"UNOD"), CharacterEncoding::Iso8859_2);
        assert_eq!(encoding_for_identifier(b"UNOW"), CharacterEncoding::Utf8);
        assert_eq!(encoding_for_identifier(b"UNOX"), CharacterEncoding::Iso2022);
        assert_eq!(encoding_for_identifier(b"UNOZ"), CharacterEncoding::Ascii);
    }
}
