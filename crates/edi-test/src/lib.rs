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

//! Shared test fixtures and interchange builders for the EDI crates.
//!
//! # Quick Start
//!
//! ```rust
//! use edi_test::builders::X12Builder;
//! use edi_test::fixtures;
//!
//! // Pre-built interchanges
//! let x12 = fixtures::minimal_x12();
//! let edifact = fixtures::edifact_with_una();
//!
//! // Custom interchanges with correct trailers
//! let text = X12Builder::new()
//!     .delimiters(b'|', b'>', b'\n')
//!     .transaction("850", &["BEG*00*SA*PO1**20250101", "PO1*1*10*EA"])
//!     .build();
//! assert!(text.starts_with("ISA|00|"));
//! assert!(text.contains("SE|4|0001\n"));
//! ```

pub mod builders;
pub mod fixtures;

pub use builders::{EdifactBuilder, X12Builder};
