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

//! Envelope dialects and their selection by leading bytes.

use edi_core::Standard;
use std::collections::HashMap;

/// Envelope grammar of an interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// ISA ... IEA.
    X12,
    /// Optional UNA, then UNB ... UNZ.
    Edifact,
    /// UNH ... UNT messages without an interchange envelope.
    EdifactBare,
}

impl Dialect {
    /// Standard family the dialect belongs to.
    pub fn standard(&self) -> Standard {
        match self {
            Dialect::X12 => Standard::X12,
            Dialect::Edifact | Dialect::EdifactBare => Standard::Edifact,
        }
    }
}

/// Builds the dialect for a recognized prefix.
pub type DialectFactory = fn() -> Dialect;

/// Maps leading tags to dialects.
///
/// Lookup tries the longest registered prefix length first and falls back
/// to progressively shorter prefixes of the input.
///
/// # Examples
///
/// ```rust
/// use edi_stream::{Dialect, DialectRegistry};
///
/// let registry = DialectRegistry::default();
/// assert_eq!(registry.lookup(b"ISA*00*"), Some(Dialect::X12));
/// assert_eq!(registry.lookup(b"UNA:+.? '"), Some(Dialect::Edifact));
/// assert_eq!(registry.lookup(b"UNH+1"), Some(Dialect::EdifactBare));
/// assert_eq!(registry.lookup(b"<?xml"), None);
/// ```
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    prefixes: HashMap<Vec<u8>, DialectFactory>,
    longest: usize,
}

impl DialectRegistry {
    /// Registry with no prefixes.
    pub fn new() -> Self {
        Self {
            prefixes: HashMap::new(),
            longest: 0,
        }
    }

    /// Register `prefix`; a later registration replaces an earlier one.
    pub fn register(&mut self, prefix: &str, factory: DialectFactory) {
        self.longest = self.longest.max(prefix.len());
        self.prefixes.insert(prefix.as_bytes().to_vec(), factory);
    }

    /// Dialect for the start of `lookahead`.
    pub fn lookup(&self, lookahead: &[u8]) -> Option<Dialect> {
        let max = self.longest.min(lookahead.len());
        (1..=max)
            .rev()
            .find_map(|len| self.prefixes.get(&lookahead[..len]))
            .map(|factory| factory())
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("ISA", || Dialect::X12);
        registry.register("UNA", || Dialect::Edifact);
        registry.register("UNB", || Dialect::Edifact);
        registry.register("UNH", || Dialect::EdifactBare);
        registry
    }
}
