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

//! Compiled loop rule tables.

use crate::descriptor::LoopDescriptor;
use std::collections::HashMap;

/// Loop rules of one document type, indexed by segment tag.
///
/// Rules keep their authored order within a tag; the engine takes the first
/// one whose preconditions hold, so more specific rules must come first.
/// A table is immutable once compiled and is shared between parses behind
/// an `Arc`.
///
/// # Examples
///
/// ```rust
/// use edi_loops::{LoopDescriptor, PluginTable};
///
/// let table = PluginTable::compile(
///     "850",
///     vec![
///         LoopDescriptor::new("N1", "N1", 2).in_path("/PO1"),
///         LoopDescriptor::new("PO1", "PO1", 1),
///         LoopDescriptor::new("N1", "N1", 1),
///     ],
/// );
///
/// assert_eq!(table.candidates("N1").len(), 2);
/// assert!(table.candidates("REF").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginTable {
    name: String,
    by_tag: HashMap<String, Vec<LoopDescriptor>>,
    rules: usize,
}

impl PluginTable {
    /// Build the tag index from rules in authored order.
    pub fn compile(name: impl Into<String>, descriptors: Vec<LoopDescriptor>) -> Self {
        let rules = descriptors.len();
        let mut by_tag: HashMap<String, Vec<LoopDescriptor>> = HashMap::new();
        for descriptor in descriptors {
            by_tag
                .entry(descriptor.tag().to_string())
                .or_default()
                .push(descriptor);
        }
        Self {
            name: name.into(),
            by_tag,
            rules,
        }
    }

    /// Name of the document type the table describes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered rules for `tag`; empty when the tag never changes loops.
    #[inline]
    pub fn candidates(&self, tag: &str) -> &[LoopDescriptor] {
        self.by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if some rule is triggered by `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules == 0
    }

    /// Distinct triggering tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.by_tag.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved_per_tag() {
        let table = PluginTable::compile(
            "test",
            vec![
                LoopDescriptor::no_op("N1").in_path("/PO1/SLN"),
                LoopDescriptor::new("PO1", "PO1", 1),
                LoopDescriptor::new("N1", "N1", 1),
            ],
        );
        let n1 = table.candidates("N1");
        assert_eq!(n1.len(), 2);
        assert!(n1[0].is_no_op());
        assert_eq!(n1[1].name(), Some("N1"));
        assert_eq!(table.len(), 3);
        assert_eq!(table.tags(), vec!["N1", "PO1"]);
    }

    #[test]
    fn test_empty_table() {
        let table = PluginTable::compile("none", Vec::new());
        assert!(table.is_empty());
        assert!(!table.contains("ST"));
        assert_eq!(table.name(), "none");
    }
}
