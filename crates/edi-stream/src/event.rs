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

//! Structured events emitted by the parser.
//!
//! The parser drives an [`EventSink`] with nested start/end node calls and
//! text. Sinks decide the representation (XML, JSON, an in-memory tree).
//!
//! # Event Flow
//!
//! For a minimal X12 interchange the sink sees:
//!
//! ```text
//! start ediroot
//!   start interchange {Standard: "ANSI X12", Control: "000000001", ...}
//!     start sender / start address {Id, Qual} / end address / end sender
//!     start receiver / start address {Id, Qual} / end address / end receiver
//!     start group {GroupType: "PO", Control: "1", ...}
//!       start transaction {Code: "850", Control: "0001"}
//!         start segment {Id: "BEG"}
//!           start element {Id: "BEG01"} text "00" end element
//!         end segment
//!       end transaction
//!     end group
//!   end interchange
//! end ediroot
//! ```

use edi_core::EdiResult;

/// Node names used by the parser.
pub mod names {
    pub const ROOT: &str = "ediroot";
    pub const INTERCHANGE: &str = "interchange";
    pub const SENDER: &str = "sender";
    pub const RECEIVER: &str = "receiver";
    pub const ADDRESS: &str = "address";
    pub const GROUP: &str = "group";
    pub const TRANSACTION: &str = "transaction";
    pub const LOOP: &str = "loop";
    pub const SEGMENT: &str = "segment";
    pub const ELEMENT: &str = "element";
    pub const SUBELEMENT: &str = "subelement";
    pub const BINARY: &str = "binary";
}

/// Ordered attribute list; keys may repeat.
///
/// # Examples
///
/// ```rust
/// use edi_stream::Attributes;
///
/// let attrs = Attributes::new()
///     .with("Id", "N1")
///     .with("Note", "a")
///     .with("Note", "b");
///
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs.get("Note"), Some("a"));
/// let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, vec!["Id", "Note", "Note"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Append a pair, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a pair unless `value` is empty.
    pub fn push_nonempty(&mut self, key: impl Into<String>, value: &str) {
        if !value.is_empty() {
            self.push(key, value);
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Receiver of structured parse events.
///
/// Values passed in are only valid for the duration of the call; copy them
/// to keep them.
pub trait EventSink {
    /// A node begins.
    fn start_node(&mut self, name: &str, attributes: &Attributes) -> EdiResult<()>;

    /// The innermost open node ends.
    fn end_node(&mut self, name: &str) -> EdiResult<()>;

    /// Text content of the innermost open node.
    fn text(&mut self, text: &str) -> EdiResult<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn start_node(&mut self, name: &str, attributes: &Attributes) -> EdiResult<()> {
        (**self).start_node(name, attributes)
    }

    fn end_node(&mut self, name: &str) -> EdiResult<()> {
        (**self).end_node(name)
    }

    fn text(&mut self, text: &str) -> EdiResult<()> {
        (**self).text(text)
    }
}

/// An owned parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum NodeEvent {
    /// Node start with its attributes.
    Start { name: String, attributes: Attributes },
    /// Node end.
    End { name: String },
    /// Text content.
    Text { text: String },
}

impl NodeEvent {
    /// Returns `true` if this is the start of a node called `name`.
    #[inline]
    pub fn is_start(&self, name: &str) -> bool {
        matches!(self, NodeEvent::Start { name: n, .. } if n == name)
    }

    /// Returns `true` if this is the end of a node called `name`.
    #[inline]
    pub fn is_end(&self, name: &str) -> bool {
        matches!(self, NodeEvent::End { name: n } if n == name)
    }

    /// Attributes of a start event.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            NodeEvent::Start { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Text of a text event.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeEvent::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Sink that records every event.
///
/// # Examples
///
/// ```rust
/// use edi_stream::{Attributes, CollectingSink, EventSink};
///
/// let mut sink = CollectingSink::new();
/// sink.start_node("segment", &Attributes::new().with("Id", "BEG")).unwrap();
/// sink.end_node("segment").unwrap();
/// assert_eq!(sink.count_starts("segment"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub events: Vec<NodeEvent>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of start events for `name`.
    pub fn count_starts(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.is_start(name)).count()
    }

    /// Attributes of every start event for `name`, in order.
    pub fn starts(&self, name: &str) -> Vec<&Attributes> {
        self.events
            .iter()
            .filter(|e| e.is_start(name))
            .filter_map(NodeEvent::attributes)
            .collect()
    }

    /// Text events, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.events.iter().filter_map(NodeEvent::as_text).collect()
    }

    pub fn into_events(self) -> Vec<NodeEvent> {
        self.events
    }
}

impl EventSink for CollectingSink {
    fn start_node(&mut self, name: &str, attributes: &Attributes) -> EdiResult<()> {
        self.events.push(NodeEvent::Start {
            name: name.to_string(),
            attributes: attributes.clone(),
        });
        Ok(())
    }

    fn end_node(&mut self, name: &str) -> EdiResult<()> {
        self.events.push(NodeEvent::End {
            name: name.to_string(),
        });
        Ok(())
    }

    fn text(&mut self, text: &str) -> EdiResult<()> {
        self.events.push(NodeEvent::Text {
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_preserve_order_and_duplicates() {
        let mut attrs = Attributes::new();
        attrs.push("B", "2");
        attrs.push("A", "1");
        attrs.push("B", "3");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("B", "2"), ("A", "1"), ("B", "3")]);
        assert_eq!(attrs.get("B"), Some("2"));
        assert_eq!(attrs.get("C"), None);
    }

    #[test]
    fn test_push_nonempty() {
        let mut attrs = Attributes::new();
        attrs.push_nonempty("Empty", "");
        attrs.push_nonempty("Full", "x");
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_collecting_sink_through_mut_ref() {
        fn drive<S: EventSink>(mut sink: S) {
            sink.start_node("a", &Attributes::new()).unwrap();
            sink.text("t").unwrap();
            sink.end_node("a").unwrap();
        }
        let mut sink = CollectingSink::new();
        drive(&mut sink);
        assert_eq!(sink.events.len(), 3);
        assert!(sink.events[0].is_start("a"));
        assert_eq!(sink.events[1].as_text(), Some("t"));
        assert!(sink.events[2].is_end("a"));
        assert_eq!(sink.texts(), vec!["t"]);
    }
}
