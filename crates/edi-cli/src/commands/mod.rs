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

//! CLI command implementations

mod ack;
mod convert;
mod events;
mod sniff;
mod validate;

pub use ack::ack;
pub use convert::to_xml;
pub use events::events;
pub use sniff::sniff;
pub use validate::validate;

use crate::error::CliError;
use edi_core::{EdiResult, ParserConfig};
use edi_stream::{Attributes, EdiParser, EventSink, LenientPolicy};
use std::fs;
use std::io::{self, Read, Write};

/// Default maximum input size (1 GB).
/// Can be overridden via the EDI_MAX_FILE_SIZE environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

const STDIN: &str = "-";

fn get_max_file_size() -> u64 {
    std::env::var("EDI_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read an input file, or stdin for `-`, refusing anything over the size
/// limit.
///
/// # Errors
///
/// Returns `Err` if the input cannot be read or exceeds `EDI_MAX_FILE_SIZE`.
pub fn read_input(path: &str) -> Result<Vec<u8>, CliError> {
    let max = get_max_file_size();

    if path == STDIN {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .take(max.saturating_add(1))
            .read_to_end(&mut buf)
            .map_err(|e| CliError::io_error("<stdin>", e))?;
        if buf.len() as u64 > max {
            return Err(CliError::file_too_large("<stdin>", buf.len() as u64, max));
        }
        return Ok(buf);
    }

    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;
    if metadata.len() > max {
        return Err(CliError::file_too_large(path, metadata.len(), max));
    }
    fs::read(path).map_err(|e| CliError::io_error(path, e))
}

/// Write content to a file or stdout.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}

/// Load a JSON parser configuration; defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<ParserConfig, CliError> {
    let Some(path) = path else {
        return Ok(ParserConfig::default());
    };
    let bytes = read_input(path)?;
    serde_json::from_slice(&bytes).map_err(|e| CliError::config(path, e.to_string()))
}

/// Parser for `config`, accepting every recoverable fault when `lenient`.
pub fn build_parser(config: &ParserConfig, lenient: bool) -> EdiParser {
    let parser = EdiParser::new().with_config(config.clone());
    if lenient {
        parser.with_policy(LenientPolicy)
    } else {
        parser
    }
}

/// Sink for commands that only need the summary.
struct DiscardSink;

impl EventSink for DiscardSink {
    fn start_node(&mut self, _name: &str, _attributes: &Attributes) -> EdiResult<()> {
        Ok(())
    }

    fn end_node(&mut self, _name: &str) -> EdiResult<()> {
        Ok(())
    }

    fn text(&mut self, _text: &str) -> EdiResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), ParserConfig::default());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let err = read_input("/nonexistent/input.edi").unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
