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

//! Error types for EDI parsing.
//!
//! Every variant of [`EdiError`] terminates a parse. Mismatches the parser
//! can continue past are modelled separately as
//! [`RecoverableFault`](crate::RecoverableFault); one becomes an error only
//! when no recovery policy accepts it ([`EdiError::Unrecovered`]).
//!
//! # Error Categories
//!
//! - **I/O Errors**: Problems reading the input stream
//! - **Sniff Errors**: Syntax characters cannot be determined
//! - **Structural Errors**: Segments or tokens out of order, inconsistent loops
//! - **Unrecovered Faults**: Count/control mismatches the policy rejected
//!
//! # Examples
//!
//! ```rust
//! use edi_core::EdiError;
//!
//! let err = EdiError::unexpected_segment(7, "XYZ", "expected GS or IEA");
//! assert_eq!(err.segment(), Some(7));
//! assert!(err.to_string().contains("XYZ"));
//! ```

use crate::fault::RecoverableFault;
use thiserror::Error;

/// Fatal errors raised while parsing an interchange.
#[derive(Error, Debug)]
pub enum EdiError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax characters could not be determined.
    #[error("Cannot determine syntax: {0}")]
    Sniff(String),

    /// Syntax profile is inconsistent.
    #[error("Invalid syntax profile: {0}")]
    Syntax(String),

    /// Segment tag not allowed in its position.
    #[error("Unexpected segment '{tag}' at segment {segment}: {message}")]
    UnexpectedSegment {
        segment: usize,
        tag: String,
        message: String,
    },

    /// Token of the wrong kind.
    #[error("Unexpected token at segment {segment}: expected {expected}, found {found}")]
    UnexpectedToken {
        segment: usize,
        expected: String,
        found: String,
    },

    /// Input ended inside an envelope.
    #[error("Unexpected end of data at segment {segment}: {message}")]
    UnexpectedEnd { segment: usize, message: String },

    /// Loop transition would leave the loop stack inconsistent.
    #[error("Loop nesting error on segment '{tag}': {message}")]
    LoopNesting { tag: String, message: String },

    /// Binary object length is not a usable number.
    #[error("Invalid binary length '{value}' at segment {segment}")]
    BinaryLength { segment: usize, value: String },

    /// Element text exceeds the configured limit.
    #[error("Element exceeds {limit} bytes at segment {segment}")]
    ElementTooLong { segment: usize, limit: usize },

    /// A recoverable fault the recovery policy did not accept.
    #[error("{0}")]
    Unrecovered(Box<RecoverableFault>),

    /// The event sink failed.
    #[error("Event sink error: {0}")]
    Sink(String),
}

impl EdiError {
    /// Create an unexpected segment error.
    #[inline]
    pub fn unexpected_segment(
        segment: usize,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnexpectedSegment {
            segment,
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected token error.
    #[inline]
    pub fn unexpected_token(
        segment: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            segment,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unexpected end of data error.
    #[inline]
    pub fn unexpected_end(segment: usize, message: impl Into<String>) -> Self {
        Self::UnexpectedEnd {
            segment,
            message: message.into(),
        }
    }

    /// Create a loop nesting error.
    #[inline]
    pub fn loop_nesting(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoopNesting {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Wrap a rejected fault.
    #[inline]
    pub fn unrecovered(fault: RecoverableFault) -> Self {
        Self::Unrecovered(Box::new(fault))
    }

    /// Get the segment ordinal if available.
    #[inline]
    pub fn segment(&self) -> Option<usize> {
        match self {
            Self::UnexpectedSegment { segment, .. }
            | Self::UnexpectedToken { segment, .. }
            | Self::UnexpectedEnd { segment, .. }
            | Self::BinaryLength { segment, .. }
            | Self::ElementTooLong { segment, .. } => Some(*segment),
            Self::Unrecovered(fault) => Some(fault.position),
            _ => None,
        }
    }

    /// Returns the rejected fault, if this error wraps one.
    #[inline]
    pub fn fault(&self) -> Option<&RecoverableFault> {
        match self {
            Self::Unrecovered(fault) => Some(&**fault),
            _ => None,
        }
    }
}

/// Result type for EDI operations.
pub type EdiResult<T> = Result<T, EdiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultKind;
    use std::io;

    #[test]
    fn test_io_error() {
        let err: EdiError = io::Error::new(io::ErrorKind::NotFound, "file not found").into();
        assert!(matches!(err, EdiError::Io(_)));
        assert!(err.to_string().contains("file not found"));
        assert_eq!(err.segment(), None);
    }

    #[test]
    fn test_unexpected_segment() {
        let err = EdiError::unexpected_segment(3, "ZZZ", "expected ST or GE");
        assert_eq!(err.segment(), Some(3));
        let display = err.to_string();
        assert!(display.contains("ZZZ"));
        assert!(display.contains("segment 3"));
        assert!(display.contains("expected ST or GE"));
    }

    #[test]
    fn test_unexpected_token() {
        let err = EdiError::unexpected_token(2, "segment tag", "value 'X'");
        assert_eq!(err.segment(), Some(2));
        assert!(err.to_string().contains("segment tag"));
    }

    #[test]
    fn test_unexpected_end() {
        let err = EdiError::unexpected_end(12, "missing IEA");
        assert_eq!(err.segment(), Some(12));
        assert!(err.to_string().contains("missing IEA"));
    }

    #[test]
    fn test_loop_nesting_has_no_segment() {
        let err = EdiError::loop_nesting("N1", "cannot close 3 loops at level 1");
        assert_eq!(err.segment(), None);
        assert!(err.to_string().contains("N1"));
    }

    #[test]
    fn test_unrecovered_exposes_fault() {
        let fault = RecoverableFault::count_mismatch("SE", 1, 4, "5", 6);
        let err = EdiError::unrecovered(fault);
        assert_eq!(err.segment(), Some(6));
        assert_eq!(err.fault().map(|f| f.kind), Some(FaultKind::CountMismatch));
        assert!(err.to_string().contains("SE01"));
    }

    #[test]
    fn test_binary_length() {
        let err = EdiError::BinaryLength {
            segment: 4,
            value: "ten".to_string(),
        };
        assert!(err.to_string().contains("'ten'"));
        assert_eq!(err.segment(), Some(4));
    }
}
