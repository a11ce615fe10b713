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

//! Sniff command - report the dialect and syntax characters

use super::read_input;
use crate::error::CliError;
use edi_core::{bytes_label, char_label};
use edi_stream::LOOKAHEAD;

/// Print what the sniffer finds at the start of `file`.
pub fn sniff(file: &str) -> Result<(), CliError> {
    let input = read_input(file)?;
    let head = &input[..input.len().min(LOOKAHEAD)];
    let found = edi_stream::sniff(head)?;
    let profile = &found.profile;
    let optional = |b: Option<u8>| b.map_or_else(|| "none".to_string(), char_label);

    println!("Dialect: {:?}", found.dialect);
    println!("Standard: {}", found.standard);
    if let Some(identifier) = &found.syntax_identifier {
        println!("Syntax identifier: {}", identifier);
    }
    println!("Element delimiter: {}", char_label(profile.delimiter));
    println!("Sub-element delimiter: {}", char_label(profile.sub_delimiter));
    println!("Segment terminator: {}", char_label(profile.terminator));
    if !profile.terminator_suffix.is_empty() {
        println!("Terminator suffix: {}", bytes_label(&profile.terminator_suffix));
    }
    println!("Repetition separator: {}", optional(profile.repetition));
    println!("Release character: {}", optional(profile.release));
    println!("Decimal mark: {}", char_label(profile.decimal_mark));
    println!("Encoding: {}", profile.encoding.label());
    Ok(())
}
