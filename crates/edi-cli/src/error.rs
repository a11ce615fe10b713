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

//! Structured error types for the EDI CLI.

use edi_core::EdiError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by CLI commands.
///
/// # Examples
///
/// ```rust,no_run
/// use edi_cli::error::CliError;
///
/// fn read(path: &str) -> Result<Vec<u8>, CliError> {
///     std::fs::read(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// File read, write or metadata access failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        path: PathBuf,
        message: String,
    },

    /// Input exceeds `EDI_MAX_FILE_SIZE`.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB). Set EDI_MAX_FILE_SIZE to raise the limit")]
    FileTooLarge {
        path: PathBuf,
        actual: u64,
        max: u64,
        max_mb: u64,
    },

    /// The parser stopped with a fatal error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A parser configuration file could not be loaded.
    #[error("Invalid configuration '{path}': {message}")]
    Config {
        path: PathBuf,
        message: String,
    },

    /// JSON output failed.
    #[error("JSON format error: {message}")]
    JsonFormat {
        message: String,
    },

    /// Nothing in the input can be acted on.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        CliError::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CliError::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }
}

impl From<EdiError> for CliError {
    fn from(err: EdiError) -> Self {
        CliError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::JsonFormat {
            message: err.to_string(),
        }
    }
}
