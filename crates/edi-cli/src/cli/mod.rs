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

//! CLI command definitions and argument parsing.

use crate::commands;
use crate::error::CliError;
use clap::{Args, Subcommand};
use edi_ack::X12AckKind;
use edi_core::ParserConfig;

/// Parser options shared by every command that parses.
#[derive(Args, Debug, Clone, Default)]
pub struct ParseArgs {
    /// Parser options as JSON (fields of ParserConfig); flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Continue past count, control number and header width mismatches
    #[arg(long)]
    pub lenient: bool,

    /// Report syntax characters as interchange attributes
    #[arg(long)]
    pub syntax_chars: bool,

    /// Keep elements that contain only whitespace
    #[arg(long)]
    pub keep_whitespace: bool,
}

impl ParseArgs {
    /// The configuration file, if any, with flags applied on top.
    pub fn parser_config(&self) -> Result<ParserConfig, CliError> {
        let mut config = commands::load_config(self.config.as_deref())?;
        if self.syntax_chars {
            config.include_syntax_characters = true;
        }
        if self.keep_whitespace {
            config.keep_whitespace_only_elements = true;
        }
        Ok(config)
    }
}

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate envelopes, counts and control numbers
    ///
    /// Parses every interchange in the file and prints counts. With
    /// --lenient, mismatches are listed as warnings instead of failing.
    Validate {
        /// Input file path, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Show the dialect and syntax characters of a file
    Sniff {
        /// Input file path, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Dump the parser's event stream
    Events {
        /// Input file path, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Write JSON instead of an indented outline
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Convert to XML
    ToXml {
        /// Input file path, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// No declaration and no indentation
        #[arg(long)]
        compact: bool,

        /// Qualify elements with the edi namespace
        #[arg(long)]
        namespace: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Write functional acknowledgments (997/999/TA1, CONTRL)
    Ack {
        /// Input file path, or - for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Write 999 instead of 997 for X12
        #[arg(long)]
        implementation: bool,

        /// Acknowledge groups only, without per-document detail
        #[arg(long)]
        group_only: bool,

        /// Always add a TA1 interchange acknowledgment
        #[arg(long)]
        ta1: bool,

        /// Control number of the first acknowledgment
        #[arg(long, default_value_t = 1)]
        control: u32,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns the failure message when input cannot be read, parsing
    /// fails or output cannot be written.
    pub fn execute(self) -> Result<(), String> {
        self.run().map_err(|e| e.to_string())
    }

    fn run(self) -> Result<(), CliError> {
        match self {
            Commands::Validate { file, parse } => {
                commands::validate(&file, &parse.parser_config()?, parse.lenient)
            }
            Commands::Sniff { file } => commands::sniff(&file),
            Commands::Events {
                file,
                output,
                json,
                parse,
            } => commands::events(
                &file,
                output.as_deref(),
                json,
                &parse.parser_config()?,
                parse.lenient,
            ),
            Commands::ToXml {
                file,
                output,
                compact,
                namespace,
                parse,
            } => {
                let mut config = parse.parser_config()?;
                if namespace {
                    config.namespace_enabled = true;
                }
                commands::to_xml(&file, output.as_deref(), &config, compact, parse.lenient)
            }
            Commands::Ack {
                file,
                output,
                implementation,
                group_only,
                ta1,
                control,
                parse,
            } => {
                let mut config = parse.parser_config()?;
                if group_only {
                    config.group_acknowledgment_only = true;
                }
                if ta1 {
                    config.interchange_acknowledgment_requested = true;
                }
                let kind = if implementation {
                    X12AckKind::Implementation
                } else {
                    X12AckKind::Functional
                };
                commands::ack(&file, output.as_deref(), &config, kind, control, parse.lenient)
            }
        }
    }
}
