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

//! Streaming structural parser for ANSI X12 and UN/EDIFACT.
//!
//! The parser reads an interchange once, front to back, and reports its
//! structure to an [`EventSink`] as nested nodes:
//!
//! - **Sniffing**: syntax characters and encoding are discovered from the
//!   first bytes of every interchange ([`sniff`])
//! - **Envelopes**: interchange, group and document headers become nodes;
//!   trailer counts and control numbers are cross-checked
//! - **Loops**: segment groups are inferred by [`edi_loops`] rule tables
//! - **Recovery**: trailer and header mismatches go to a [`RecoveryPolicy`]
//! - **Acknowledgments**: envelope boundaries are reported to an
//!   [`AckHandler`]
//!
//! # Example
//!
//! ```rust
//! use edi_stream::{names, CollectingSink, EdiParser};
//!
//! let input = concat!(
//!     "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       ",
//!     "*250101*1200*^*00501*000000001*0*T*:~",
//!     "GS*PO*SENDER*RECEIVER*20250101*1200*1*X*005010~",
//!     "ST*850*0001~BEG*00*SA*PO123**20250101~REF*DP*38~SE*4*0001~",
//!     "GE*1*1~IEA*1*000000001~",
//! );
//!
//! let mut sink = CollectingSink::new();
//! let summary = EdiParser::new().parse(input.as_bytes(), &mut sink).unwrap();
//!
//! assert_eq!(summary.interchanges, 1);
//! assert_eq!(summary.groups, 1);
//! assert_eq!(summary.documents, 1);
//! assert_eq!(sink.count_starts(names::SEGMENT), 2);
//! ```
//!
//! # Recovery
//!
//! By default every fault is fatal. Any closure can decide instead:
//!
//! ```rust
//! use edi_core::{FaultKind, RecoverableFault};
//! use edi_stream::{CollectingSink, EdiParser};
//!
//! let parser = EdiParser::new()
//!     .with_policy(|fault: &RecoverableFault| fault.kind == FaultKind::CountMismatch);
//!
//! let input = "UNB+UNOA:3+S+R+250101:1200+7'UNH+1+ORDERS:D:96A:UN'UNT+9+1'UNZ+1+7'";
//! let summary = parser.parse(input.as_bytes(), &mut CollectingSink::new()).unwrap();
//! assert_eq!(summary.recovered, 1);
//! ```

pub mod ack;
pub mod context;
pub mod dialect;
mod envelope;
pub mod event;
pub mod parser;
pub mod recovery;
pub mod sniff;

pub use ack::{AckHandler, NoAck};
pub use context::{DocumentSummary, EnvelopeContext, GroupHeader, InterchangeHeader, Party};
pub use dialect::{Dialect, DialectFactory, DialectRegistry};
pub use envelope::segment::{Element, Field, Segment};
pub use envelope::x12::ISA_WIDTHS;
pub use event::{names, Attributes, CollectingSink, EventSink, NodeEvent};
pub use parser::{EdiParser, ParseSummary};
pub use recovery::{LenientPolicy, RecoveryPolicy, StrictPolicy};
pub use sniff::{encoding_for_identifier, sniff, sniff_with, SniffResult, LOOKAHEAD};
