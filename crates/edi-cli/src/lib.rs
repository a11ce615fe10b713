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

//! EDI CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **validate**: parse a file and report envelope counts and faults
//! - **sniff**: show the dialect and syntax characters of a file
//! - **events**: dump the parser's event stream as text or JSON
//! - **to-xml**: convert to XML
//! - **ack**: write 997/999/TA1 or CONTRL acknowledgments
//!
//! # Examples
//!
//! ```no_run
//! use edi_cli::commands::{to_xml, validate};
//! use edi_core::ParserConfig;
//!
//! # fn main() -> Result<(), edi_cli::error::CliError> {
//! validate("orders.edi", &ParserConfig::default(), false)?;
//! to_xml("orders.edi", Some("orders.xml"), &ParserConfig::default(), false, false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Input Limits
//!
//! Inputs larger than [`commands::DEFAULT_MAX_FILE_SIZE`] are refused; set
//! `EDI_MAX_FILE_SIZE` (bytes) to change the limit. A file name of `-`
//! reads standard input.

pub mod cli;
pub mod commands;
pub mod error;
