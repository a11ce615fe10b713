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

//! EDI Command Line Interface

use clap::Parser;
use edi_cli::cli::Commands;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// EDI - streaming X12 and EDIFACT toolkit
///
/// Sniffs, validates and converts X12 and UN/EDIFACT interchanges, and
/// writes functional acknowledgments for them.
///
/// # Examples
///
/// ```bash
/// # Check envelopes, counts and control numbers
/// edi validate orders.edi
///
/// # Convert to XML
/// edi to-xml orders.edi --output orders.xml
///
/// # Write 997 / CONTRL acknowledgments
/// edi ack orders.edi
/// ```
#[derive(Parser)]
#[command(name = "edi")]
#[command(author, version, about = "EDI - streaming X12 and EDIFACT toolkit", long_about = None)]
struct Cli {
    /// Log more (-v warnings, -vv debug, -vvv trace); EDI_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("EDI_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
