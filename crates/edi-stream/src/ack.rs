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

//! Acknowledgment hook.
//!
//! The parser reports envelope boundaries to an [`AckHandler`] so a reply
//! (X12 997/999, EDIFACT CONTRL) can be built while parsing. Every method
//! has a no-op default; implementations override what they need.
//!
//! Call order for one interchange:
//!
//! ```text
//! interchange_start
//!   group_start            (per group; absent for EDIFACT implicit groups)
//!     document_end         (per transaction set or message)
//!   group_end
//! interchange_end
//! ```
//!
//! `negative` replaces the remaining calls when a fatal error ends the
//! parse after `interchange_start`.

use crate::context::{DocumentSummary, GroupHeader, InterchangeHeader};
use edi_core::{EdiError, SyntaxProfile};

/// Receives envelope boundaries for acknowledgment generation.
pub trait AckHandler {
    /// Interchange header read.
    fn interchange_start(&mut self, _header: &InterchangeHeader, _syntax: &SyntaxProfile) {}

    /// Group header read.
    fn group_start(&mut self, _group: &GroupHeader) {}

    /// Document trailer checked.
    fn document_end(&mut self, _document: &DocumentSummary) {}

    /// Group trailer checked; `documents` is the count observed.
    fn group_end(&mut self, _group: &GroupHeader, _documents: usize) {}

    /// Interchange trailer checked; `groups` is the count observed.
    fn interchange_end(&mut self, _header: &InterchangeHeader, _groups: usize) {}

    /// A fatal error ended the parse.
    fn negative(&mut self, _error: &EdiError) {}
}

/// Handler that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAck;

impl AckHandler for NoAck {}

impl<A: AckHandler + ?Sized> AckHandler for &mut A {
    fn interchange_start(&mut self, header: &InterchangeHeader, syntax: &SyntaxProfile) {
        (**self).interchange_start(header, syntax)
    }

    fn group_start(&mut self, group: &GroupHeader) {
        (**self).group_start(group)
    }

    fn document_end(&mut self, document: &DocumentSummary) {
        (**self).document_end(document)
    }

    fn group_end(&mut self, group: &GroupHeader, documents: usize) {
        (**self).group_end(group, documents)
    }

    fn interchange_end(&mut self, header: &InterchangeHeader, groups: usize) {
        (**self).interchange_end(header, groups)
    }

    fn negative(&mut self, error: &EdiError) {
        (**self).negative(error)
    }
}
