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

//! Core building blocks for streaming EDI parsing.
//!
//! This crate holds everything below the envelope state machines:
//!
//! - [`SyntaxProfile`]: the delimiter, terminator, release and repetition
//!   characters of one interchange
//! - [`Lexer`] / [`TokenSource`]: splits a byte stream into [`Token`]s
//! - [`ByteReader`]: buffered reading with lookahead and push back
//! - [`EdiError`] and [`RecoverableFault`]: the two-tier error model
//! - [`ParserConfig`]: options shared by the parser and its collaborators
//!
//! # Error Model
//!
//! Fatal conditions are [`EdiError`] values and stop the parse. Mismatches
//! the parser can continue past (wrong trailer counts, unechoed control
//! numbers, wrong-width header fields) are [`RecoverableFault`]s; they only
//! become errors when the installed recovery policy declines them.
//!
//! # Example
//!
//! ```rust
//! use edi_core::{Lexer, SyntaxProfile, Token, TokenSource};
//! use std::io::Cursor;
//!
//! let input = "UNH+1+ORDERS:D:96A:UN'";
//! let mut lexer = Lexer::new(Cursor::new(input), SyntaxProfile::edifact_default());
//!
//! assert_eq!(lexer.next_token().unwrap(), Token::SegmentStart("UNH".into()));
//! assert_eq!(lexer.next_token().unwrap(), Token::Simple("1".into()));
//! assert_eq!(lexer.next_token().unwrap().text(), Some("ORDERS"));
//! ```

mod config;
mod error;
mod fault;
mod lexer;
mod reader;
mod syntax;
mod token;

pub use config::ParserConfig;
pub use error::{EdiError, EdiResult};
pub use fault::{FaultKind, RecoverableFault};
pub use lexer::{Lexer, TokenSource};
pub use reader::ByteReader;
pub use syntax::{bytes_label, char_label, CharacterEncoding, Standard, SyntaxProfile};
pub use token::{SubValue, Token};
