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

//! Validate command - envelope structure, counts and control numbers

use super::{read_input, DiscardSink};
use crate::error::CliError;
use colored::Colorize;
use edi_core::{ParserConfig, RecoverableFault};
use edi_stream::EdiParser;
use parking_lot::Mutex;
use std::sync::Arc;

/// Parse every interchange in `file` and print a summary.
///
/// Recoverable faults are listed. They fail the run unless `lenient`.
///
/// # Output
///
/// ```text
/// ✓ orders.edi
///   Interchanges: 1
///   Groups: 1
///   Documents: 2
///   Segments: 14
///   Recovered: 0
/// ```
pub fn validate(file: &str, config: &ParserConfig, lenient: bool) -> Result<(), CliError> {
    let input = read_input(file)?;

    let faults: Arc<Mutex<Vec<RecoverableFault>>> = Arc::default();
    let recorded = Arc::clone(&faults);
    let parser = EdiParser::new()
        .with_config(config.clone())
        .with_policy(move |fault: &RecoverableFault| {
            recorded.lock().push(fault.clone());
            lenient
        });

    let result = parser.parse(&input[..], &mut DiscardSink);
    let faults = faults.lock();
    match result {
        Ok(summary) => {
            println!("{} {}", "✓".green().bold(), file);
            println!("  Interchanges: {}", summary.interchanges);
            println!("  Groups: {}", summary.groups);
            println!("  Documents: {}", summary.documents);
            println!("  Segments: {}", summary.segments);
            println!("  Recovered: {}", summary.recovered);
            for fault in faults.iter() {
                println!("  {} {}", "!".yellow().bold(), fault);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), file);
            Err(e.into())
        }
    }
}
