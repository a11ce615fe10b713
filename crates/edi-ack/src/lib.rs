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

//! Acknowledgment generators for the streaming EDI parser.
//!
//! Each generator implements [`edi_stream::AckHandler`] and turns the
//! parser's envelope callbacks into outbound acknowledgment interchanges:
//!
//! - [`X12Acknowledgment`]: 997 (or 999) per functional group, plus `TA1`
//! - [`ContrlAcknowledgment`]: EDIFACT CONTRL per interchange
//! - [`Acknowledgments`]: both, for streams that mix standards
//!
//! Acknowledgments reuse the inbound syntax characters and swap sender and
//! receiver. With `group_acknowledgment_only` set, per-document detail
//! (AK2/AK5, UCM) is left out.
//!
//! # Example
//!
//! ```rust
//! use edi_ack::Acknowledgments;
//! use edi_core::ParserConfig;
//! use edi_stream::{CollectingSink, EdiParser};
//!
//! let input = "UNA:+.? 'UNB+UNOA:3+SENDER:14+RECEIVER:14+250101:1200+REF1'\
//!              UNH+M1+ORDERS:D:96A:UN'BGM+220+PO1'UNT+3+M1'UNZ+1+REF1'";
//!
//! let config = ParserConfig::default();
//! let mut acks = Acknowledgments::new(&config);
//! EdiParser::new()
//!     .with_config(config)
//!     .parse_with_ack(input.as_bytes(), &mut CollectingSink::new(), &mut acks)
//!     .unwrap();
//!
//! let contrl = &acks.into_acknowledgments()[0];
//! assert!(contrl.contains("UCI+REF1+SENDER:14+RECEIVER:14+7'"));
//! assert!(contrl.contains("UCM+M1+ORDERS:D:96A:UN+7'"));
//! ```

mod contrl;
mod tracker;
mod writer;
mod x12;

pub use contrl::ContrlAcknowledgment;
pub use x12::{X12AckKind, X12Acknowledgment, IMPLEMENTATION_REFERENCE};

/// Error codes reported for accepted faults.
pub mod codes {
    pub use crate::contrl::syntax_error_code as edifact_syntax_error;
    pub use crate::x12::syntax_error_code as x12_syntax_error;
}

use edi_core::{EdiError, ParserConfig, Standard, SyntaxProfile};
use edi_stream::{AckHandler, DocumentSummary, GroupHeader, InterchangeHeader};

/// Routes each interchange to the generator for its standard.
///
/// Output is kept in input order.
#[derive(Debug)]
pub struct Acknowledgments {
    x12: X12Acknowledgment,
    edifact: ContrlAcknowledgment,
    order: Vec<Standard>,
    current: Option<Standard>,
}

impl Acknowledgments {
    pub fn new(config: &ParserConfig) -> Self {
        Self::from_parts(
            X12Acknowledgment::new(config),
            ContrlAcknowledgment::new(config),
        )
    }

    /// Combine configured generators.
    pub fn from_parts(x12: X12Acknowledgment, edifact: ContrlAcknowledgment) -> Self {
        Self {
            x12,
            edifact,
            order: Vec::new(),
            current: None,
        }
    }

    /// All acknowledgments in the order their interchanges were read.
    pub fn into_acknowledgments(self) -> Vec<String> {
        let mut x12 = self.x12.into_acknowledgments().into_iter();
        let mut edifact = self.edifact.into_acknowledgments().into_iter();
        self.order
            .iter()
            .filter_map(|standard| match standard {
                Standard::X12 => x12.next(),
                Standard::Edifact => edifact.next(),
            })
            .collect()
    }

    fn handler(&mut self) -> Option<&mut dyn AckHandler> {
        match self.current? {
            Standard::X12 => Some(&mut self.x12),
            Standard::Edifact => Some(&mut self.edifact),
        }
    }

    fn close(&mut self) {
        if let Some(standard) = self.current.take() {
            self.order.push(standard);
        }
    }
}

impl AckHandler for Acknowledgments {
    fn interchange_start(&mut self, header: &InterchangeHeader, syntax: &SyntaxProfile) {
        self.current = Some(header.standard);
        if let Some(handler) = self.handler() {
            handler.interchange_start(header, syntax);
        }
    }

    fn group_start(&mut self, group: &GroupHeader) {
        if let Some(handler) = self.handler() {
            handler.group_start(group);
        }
    }

    fn document_end(&mut self, document: &DocumentSummary) {
        if let Some(handler) = self.handler() {
            handler.document_end(document);
        }
    }

    fn group_end(&mut self, group: &GroupHeader, documents: usize) {
        if let Some(handler) = self.handler() {
            handler.group_end(group, documents);
        }
    }

    fn interchange_end(&mut self, header: &InterchangeHeader, groups: usize) {
        if let Some(handler) = self.handler() {
            handler.interchange_end(header, groups);
        }
        self.close();
    }

    fn negative(&mut self, error: &EdiError) {
        if let Some(handler) = self.handler() {
            handler.negative(error);
        }
        self.close();
    }
}
