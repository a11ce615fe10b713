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

//! Segment serialization with the syntax characters of an interchange.

use edi_core::SyntaxProfile;

/// One element of an outgoing segment.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Value<'a> {
    Simple(&'a str),
    Composite(&'a [&'a str]),
}

/// Writes segments into a string.
///
/// Values are escaped with the release character when the syntax has one.
/// Trailing empty elements and components are dropped.
#[derive(Debug)]
pub(crate) struct SegmentWriter {
    syntax: SyntaxProfile,
    out: String,
    counted: usize,
}

impl SegmentWriter {
    pub(crate) fn new(syntax: &SyntaxProfile) -> Self {
        Self {
            syntax: syntax.clone(),
            out: String::new(),
            counted: 0,
        }
    }

    pub(crate) fn syntax(&self) -> &SyntaxProfile {
        &self.syntax
    }

    /// Write `tag` followed by `elements`.
    pub(crate) fn segment(&mut self, tag: &str, elements: &[Value<'_>]) {
        let last = elements
            .iter()
            .rposition(|v| !is_empty(v))
            .map_or(0, |i| i + 1);

        self.out.push_str(tag);
        for value in &elements[..last] {
            self.out.push(char::from(self.syntax.delimiter));
            match value {
                Value::Simple(text) => self.escaped(text),
                Value::Composite(parts) => {
                    let used = parts
                        .iter()
                        .rposition(|p| !p.is_empty())
                        .map_or(0, |i| i + 1);
                    for (i, part) in parts[..used].iter().enumerate() {
                        if i > 0 {
                            self.out.push(char::from(self.syntax.sub_delimiter));
                        }
                        self.escaped(part);
                    }
                }
            }
        }
        self.terminate();
        self.counted += 1;
    }

    /// Write a segment verbatim, without escaping or counting.
    pub(crate) fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Terminator plus suffix.
    pub(crate) fn terminate(&mut self) {
        self.out.push(char::from(self.syntax.terminator));
        for &b in &self.syntax.terminator_suffix {
            self.out.push(char::from(b));
        }
    }

    /// Start counting segments for a new document.
    pub(crate) fn reset_count(&mut self) {
        self.counted = 0;
    }

    /// Segments written since the last reset.
    pub(crate) fn count(&self) -> usize {
        self.counted
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn escaped(&mut self, text: &str) {
        let Some(release) = self.syntax.release else {
            self.out.push_str(text);
            return;
        };
        for ch in text.chars() {
            if u8::try_from(ch).map_or(false, |b| self.syntax.is_syntax_char(b)) {
                self.out.push(char::from(release));
            }
            self.out.push(ch);
        }
    }
}

fn is_empty(value: &Value<'_>) -> bool {
    match value {
        Value::Simple(text) => text.is_empty(),
        Value::Composite(parts) => parts.iter().all(|p| p.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x12_segment() {
        let mut w = SegmentWriter::new(&SyntaxProfile::x12_default());
        w.segment("AK1", &[Value::Simple("PO"), Value::Simple("1"), Value::Simple("")]);
        assert_eq!(w.count(), 1);
        assert_eq!(w.finish(), "AK1*PO*1~");
    }

    #[test]
    fn test_edifact_composite_and_release() {
        let mut w = SegmentWriter::new(&SyntaxProfile::edifact_default());
        w.segment(
            "UCI",
            &[
                Value::Simple("A+B"),
                Value::Composite(&["SENDER", "14", ""]),
                Value::Composite(&["", ""]),
                Value::Simple("7"),
            ],
        );
        assert_eq!(w.finish(), "UCI+A?+B+SENDER:14++7'");
    }

    #[test]
    fn test_suffix_and_reset() {
        let mut syntax = SyntaxProfile::x12_default();
        syntax.terminator_suffix = b"\r\n".to_vec();
        let mut w = SegmentWriter::new(&syntax);
        w.segment("ST", &[Value::Simple("997"), Value::Simple("0001")]);
        w.reset_count();
        w.segment("SE", &[Value::Simple("1"), Value::Simple("0001")]);
        assert_eq!(w.count(), 1);
        assert_eq!(w.finish(), "ST*997*0001~\r\nSE*1*0001~\r\n");
    }
}
