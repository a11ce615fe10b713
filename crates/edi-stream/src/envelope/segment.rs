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

//! Whole-segment reading and element emission.

use crate::event::{names, Attributes, EventSink};
use edi_core::{EdiError, EdiResult, ParserConfig, Token, TokenSource};

/// One occurrence of an element value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Empty,
    Simple(String),
    Composite(Vec<String>),
}

impl Field {
    /// Text of the value, or of component `index` (1-based) of a composite.
    fn component(&self, index: usize) -> &str {
        match self {
            Field::Empty => "",
            Field::Simple(value) if index == 1 => value.as_str(),
            Field::Simple(_) => "",
            Field::Composite(parts) => index
                .checked_sub(1)
                .and_then(|i| parts.get(i))
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// An element with its repeats, first occurrence first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub repeats: Vec<Field>,
}

/// A segment read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: String,
    pub elements: Vec<Element>,
    /// Ordinal of the segment in the stream.
    pub position: usize,
}

impl Segment {
    /// Simple value of element `n` (1-based); first component of a composite.
    pub fn value(&self, n: usize) -> &str {
        self.component(n, 1)
    }

    /// Component `c` of element `n`, both 1-based.
    pub fn component(&self, n: usize, c: usize) -> &str {
        n.checked_sub(1)
            .and_then(|i| self.elements.get(i))
            .and_then(|e| e.repeats.first())
            .map(|f| f.component(c))
            .unwrap_or("")
    }

    /// Identifier of element `n`, such as `BEG02`.
    pub fn element_id(&self, n: usize) -> String {
        format!("{}{:02}", self.tag, n)
    }
}

/// Read the rest of a segment whose `SegmentStart` was consumed.
///
/// Stops at the segment end or at end of data.
pub fn read_segment<T: TokenSource + ?Sized>(tokens: &mut T, tag: &str) -> EdiResult<Segment> {
    let position = tokens.segment_count();
    let mut elements: Vec<Element> = Vec::new();
    let mut repeat = false;

    loop {
        let token = tokens.next_token()?;
        let field = match token {
            Token::SegmentEnd | Token::EndOfData => break,
            Token::Repetition => {
                repeat = true;
                continue;
            }
            Token::Simple(value) => Field::Simple(value),
            Token::Empty => Field::Empty,
            Token::SubElement(sub) => {
                let mut parts = vec![sub.value];
                let mut last = sub.last;
                while !last {
                    match tokens.next_token()? {
                        Token::SubElement(next) => {
                            parts.push(next.value);
                            last = next.last;
                        }
                        other => {
                            return Err(EdiError::unexpected_token(
                                position,
                                "sub-element",
                                other.to_string(),
                            ))
                        }
                    }
                }
                Field::Composite(parts)
            }
            Token::SegmentStart(next) => {
                return Err(EdiError::unexpected_token(
                    position,
                    format!("element of {}", tag),
                    format!("segment start '{}'", next),
                ))
            }
        };

        match elements.last_mut() {
            Some(element) if repeat => element.repeats.push(field),
            _ => elements.push(Element {
                repeats: vec![field],
            }),
        }
        repeat = false;
    }

    Ok(Segment {
        tag: tag.to_string(),
        elements,
        position,
    })
}

fn present<'v>(value: &'v str, config: &ParserConfig) -> Option<&'v str> {
    if value.is_empty() || (!config.keep_whitespace_only_elements && value.trim().is_empty()) {
        None
    } else {
        Some(value)
    }
}

/// Emit a segment node with its element nodes.
pub fn emit_segment<S: EventSink + ?Sized>(
    sink: &mut S,
    segment: &Segment,
    config: &ParserConfig,
) -> EdiResult<()> {
    sink.start_node(names::SEGMENT, &Attributes::new().with("Id", &segment.tag))?;
    for (i, element) in segment.elements.iter().enumerate() {
        let id = segment.element_id(i + 1);
        for field in &element.repeats {
            emit_field(sink, &id, field, config)?;
        }
    }
    sink.end_node(names::SEGMENT)
}

fn emit_field<S: EventSink + ?Sized>(
    sink: &mut S,
    id: &str,
    field: &Field,
    config: &ParserConfig,
) -> EdiResult<()> {
    match field {
        Field::Empty => Ok(()),
        Field::Simple(value) => match present(value, config) {
            Some(text) => {
                sink.start_node(names::ELEMENT, &Attributes::new().with("Id", id))?;
                sink.text(text)?;
                sink.end_node(names::ELEMENT)
            }
            None => Ok(()),
        },
        Field::Composite(parts) => {
            if parts.iter().all(|p| present(p, config).is_none()) {
                return Ok(());
            }
            let attrs = Attributes::new().with("Id", id).with("Composite", "yes");
            sink.start_node(names::ELEMENT, &attrs)?;
            for (i, part) in parts.iter().enumerate() {
                if let Some(text) = present(part, config) {
                    let attrs = Attributes::new().with("Sequence", (i + 1).to_string());
                    sink.start_node(names::SUBELEMENT, &attrs)?;
                    sink.text(text)?;
                    sink.end_node(names::SUBELEMENT)?;
                }
            }
            sink.end_node(names::ELEMENT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CollectingSink, NodeEvent};
    use edi_core::{Lexer, SyntaxProfile};
    use std::io::Cursor;

    fn read(input: &str) -> Segment {
        let mut lexer = Lexer::new(Cursor::new(input.as_bytes().to_vec()), SyntaxProfile::x12_default());
        let tag = match lexer.next_token().unwrap() {
            Token::SegmentStart(tag) => tag,
            other => panic!("expected segment start, got {}", other),
        };
        read_segment(&mut lexer, &tag).unwrap()
    }

    #[test]
    fn test_values_and_components() {
        let seg = read("SV1*HC:99213:25*100**UN~");
        assert_eq!(seg.tag, "SV1");
        assert_eq!(seg.position, 1);
        assert_eq!(seg.value(1), "HC");
        assert_eq!(seg.component(1, 2), "99213");
        assert_eq!(seg.component(1, 4), "");
        assert_eq!(seg.value(2), "100");
        assert_eq!(seg.value(3), "");
        assert_eq!(seg.value(4), "UN");
        assert_eq!(seg.value(9), "");
        assert_eq!(seg.value(0), "");
    }

    #[test]
    fn test_repeats_attach_to_element() {
        let seg = read("HI*BK:8901^BF:87200^BF:5559~");
        assert_eq!(seg.elements.len(), 1);
        assert_eq!(seg.elements[0].repeats.len(), 3);
        assert_eq!(
            seg.elements[0].repeats[2],
            Field::Composite(vec!["BF".to_string(), "5559".to_string()])
        );
    }

    #[test]
    fn test_emit_skips_empty_and_whitespace() {
        let seg = read("N1*ST*   *92*~");
        let mut sink = CollectingSink::new();
        emit_segment(&mut sink, &seg, &ParserConfig::default()).unwrap();
        let ids: Vec<_> = sink
            .starts(names::ELEMENT)
            .iter()
            .filter_map(|a| a.get("Id"))
            .map(str::to_string)
            .collect();
        assert_eq!(ids, vec!["N101", "N103"]);

        let mut sink = CollectingSink::new();
        let config = ParserConfig::default().with_whitespace_elements(true);
        emit_segment(&mut sink, &seg, &config).unwrap();
        assert_eq!(sink.count_starts(names::ELEMENT), 3);
        assert!(sink.texts().contains(&"   "));
    }

    #[test]
    fn test_emit_composite_sequences() {
        let seg = read("SV1*HC::25~");
        let mut sink = CollectingSink::new();
        emit_segment(&mut sink, &seg, &ParserConfig::default()).unwrap();
        let element = &sink.starts(names::ELEMENT)[0];
        assert_eq!(element.get("Composite"), Some("yes"));
        let sequences: Vec<_> = sink
            .starts(names::SUBELEMENT)
            .iter()
            .filter_map(|a| a.get("Sequence"))
            .map(str::to_string)
            .collect();
        assert_eq!(sequences, vec!["1", "3"]);
        assert!(matches!(sink.events.last(), Some(NodeEvent::End { name }) if name == "segment"));
    }
}
