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

//! Property tests for syntax discovery
//!
//! # Properties Tested
//!
//! 1. **Syntax round-trip**: interchanges written with any valid set of
//!    syntax characters sniff back to exactly those characters
//! 2. **Envelope re-encoding**: the ISA header elements reported to the
//!    acknowledgment hook re-encode to the original bytes
//! 3. **Parse stability**: every generated interchange parses without
//!    faults under the strict policy

use edi_core::SyntaxProfile;
use edi_stream::{sniff, AckHandler, CollectingSink, Dialect, EdiParser, InterchangeHeader};
use edi_test::builders::{EdifactBuilder, X12Builder};
use proptest::prelude::*;

const X12_POOL: &[u8] = b"*|!#%&+>~@";
const EDIFACT_POOL: &[u8] = b":+?'|#!@&%";

fn suffix() -> impl Strategy<Value = &'static [u8]> {
    prop::sample::select(vec![&b""[..], &b"\r\n"[..], &b"\n"[..]])
}

#[derive(Default)]
struct HeaderCapture {
    header: Option<InterchangeHeader>,
    syntax: Option<SyntaxProfile>,
}

impl AckHandler for HeaderCapture {
    fn interchange_start(&mut self, header: &InterchangeHeader, syntax: &SyntaxProfile) {
        self.header = Some(header.clone());
        self.syntax = Some(syntax.clone());
    }
}

fn x12_builder(chars: &[u8], with_repetition: bool, newline: bool, suffix: &[u8]) -> X12Builder {
    let terminator = if newline { b'\n' } else { chars[2] };
    X12Builder::new()
        .delimiters(chars[0], chars[1], terminator)
        .repetition(with_repetition.then_some(chars[3]))
        .suffix(suffix)
        .transaction("850", &["BEG*00*SA*PO1**20250101", "PO1*1*10*EA", "CTT*1"])
}

#[test]
fn test_x12_builder_default_sniffs_defaults() {
    let builder = X12Builder::new().transaction("850", &["BEG*00*SA*PO1**20250101"]);
    let sniffed = sniff(&builder.build_bytes()).unwrap();
    assert_eq!(&sniffed.profile, builder.syntax());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: X12 syntax characters survive sniffing exactly
    #[test]
    fn prop_x12_syntax_roundtrip(
        chars in Just(X12_POOL.to_vec()).prop_shuffle(),
        with_repetition in any::<bool>(),
        newline in any::<bool>(),
        suffix in suffix(),
    ) {
        let builder = x12_builder(&chars, with_repetition, newline, suffix);
        let bytes = builder.build_bytes();
        let sniffed = sniff(&bytes).unwrap();

        prop_assert_eq!(sniffed.dialect, Dialect::X12);
        prop_assert_eq!(&sniffed.profile, builder.syntax());

        let isa = builder.isa();
        prop_assert_eq!(&sniffed.first_segment[..], &isa[..isa.len() - suffix.len()]);
    }

    /// Property: ISA elements re-encode to the original header bytes
    #[test]
    fn prop_x12_header_reencodes(
        chars in Just(X12_POOL.to_vec()).prop_shuffle(),
        with_repetition in any::<bool>(),
        suffix in suffix(),
    ) {
        let builder = x12_builder(&chars, with_repetition, false, suffix);
        let mut capture = HeaderCapture::default();
        let summary = EdiParser::new()
            .parse_with_ack(&builder.build_bytes()[..], &mut CollectingSink::new(), &mut capture)
            .unwrap();
        prop_assert_eq!(summary.documents, 1);
        prop_assert_eq!(summary.recovered, 0);

        let header = capture.header.unwrap();
        let syntax = capture.syntax.unwrap();
        let mut encoded = b"ISA".to_vec();
        for element in &header.elements {
            encoded.push(syntax.delimiter);
            encoded.extend_from_slice(element.as_bytes());
        }
        encoded.push(syntax.terminator);
        encoded.extend_from_slice(&syntax.terminator_suffix);
        prop_assert_eq!(encoded, builder.isa());
    }

    /// Property: UNA syntax characters survive sniffing exactly
    #[test]
    fn prop_edifact_una_roundtrip(
        chars in Just(EDIFACT_POOL.to_vec()).prop_shuffle(),
        decimal_comma in any::<bool>(),
        with_release in any::<bool>(),
        suffix in suffix(),
    ) {
        let decimal = if decimal_comma { b',' } else { b'.' };
        let release = with_release.then_some(chars[2]);
        let builder = EdifactBuilder::new()
            .syntax_chars(chars[0], chars[1], decimal, release, chars[3])
            .suffix(suffix)
            .message("ORDERS", &["BGM*220*PO1", "NAD*BY*5412345000013::9", "LIN*1"]);
        let bytes = builder.build_bytes();

        let sniffed = sniff(&bytes).unwrap();
        prop_assert_eq!(sniffed.dialect, Dialect::Edifact);
        prop_assert_eq!(sniffed.una_length, Some(9));
        prop_assert_eq!(&sniffed.profile, builder.syntax());

        let summary = EdiParser::new().parse(&bytes[..], &mut CollectingSink::new()).unwrap();
        prop_assert_eq!(summary.documents, 1);
        prop_assert_eq!(summary.recovered, 0);
    }

    /// Property: without UNA the syntax identifier decides the characters
    #[test]
    fn prop_edifact_identifier_defaults(
        level in prop::sample::select(vec!["UNOA", "UNOC", "UNOW", "UNOY"]),
        suffix in prop::sample::select(vec![&b""[..], &b"\r\n"[..]]),
        grouped in any::<bool>(),
        version in 3u8..=4,
    ) {
        let builder = EdifactBuilder::new()
            .una(false)
            .identifier(level)
            .syntax_version(version)
            .suffix(suffix)
            .grouped(grouped)
            .message("INVOIC", &["BGM*380*INV1"])
            .message("INVOIC", &["BGM*380*INV2", "LIN*1"]);
        let bytes = builder.build_bytes();
        let sniffed = sniff(&bytes).unwrap();

        let mut expected = SyntaxProfile::edifact_default();
        expected.terminator_suffix = suffix.to_vec();
        expected.encoding = edi_stream::encoding_for_identifier(level.as_bytes());
        expected.repetition = (version >= 4).then_some(b'*');
        prop_assert_eq!(&sniffed.profile, &expected);

        let summary = EdiParser::new().parse(&bytes[..], &mut CollectingSink::new()).unwrap();
        prop_assert_eq!(summary.documents, 2);
        prop_assert_eq!(summary.groups, usize::from(grouped));
    }
}
