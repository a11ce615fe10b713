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

//! Recoverable structural faults.
//!
//! A fault is raised where the parser detects a mismatch that does not stop
//! it from interpreting the rest of the input: a fixed-width header field of
//! the wrong length, a trailer count that disagrees with what was counted, a
//! control number that is not echoed, or a missing mandatory element.
//!
//! Each fault carries the value it expected, the value it found, and a
//! corrected value the parser will continue with if the fault is accepted.

use std::fmt;

/// Kind of recoverable fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Fixed-width field has the wrong length.
    FieldLength,
    /// Trailer count does not match the observed count.
    CountMismatch,
    /// Trailer control number does not echo the header.
    ControlNumberMismatch,
    /// Mandatory element is absent.
    MissingElement,
}

impl FaultKind {
    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            FaultKind::FieldLength => "field length mismatch",
            FaultKind::CountMismatch => "count mismatch",
            FaultKind::ControlNumberMismatch => "control number mismatch",
            FaultKind::MissingElement => "missing mandatory element",
        }
    }
}

/// A structural error the recovery policy may choose to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableFault {
    /// What went wrong.
    pub kind: FaultKind,
    /// Value the parser expected.
    pub expected: String,
    /// Value found in the input.
    pub actual: String,
    /// Value used if the fault is accepted.
    pub corrected: String,
    /// Segment tag where the fault was detected.
    pub segment: String,
    /// 1-based element position within the segment.
    pub field: usize,
    /// Ordinal of the segment within the stream.
    pub position: usize,
}

impl RecoverableFault {
    /// Fixed-width field of the wrong length.
    ///
    /// The corrected value is `actual` right-padded with spaces or truncated
    /// to `width`.
    pub fn field_length(
        segment: &str,
        field: usize,
        width: usize,
        actual: &str,
        position: usize,
    ) -> Self {
        let corrected = fit_width(actual, width);
        Self {
            kind: FaultKind::FieldLength,
            expected: format!("{} characters", width),
            actual: actual.to_string(),
            corrected,
            segment: segment.to_string(),
            field,
            position,
        }
    }

    /// Trailer count differs from the number observed.
    ///
    /// The corrected value is the observed count.
    pub fn count_mismatch(
        segment: &str,
        field: usize,
        observed: usize,
        declared: &str,
        position: usize,
    ) -> Self {
        Self {
            kind: FaultKind::CountMismatch,
            expected: observed.to_string(),
            actual: declared.to_string(),
            corrected: observed.to_string(),
            segment: segment.to_string(),
            field,
            position,
        }
    }

    /// Trailer control number does not echo the header's.
    pub fn control_mismatch(
        segment: &str,
        field: usize,
        header: &str,
        trailer: &str,
        position: usize,
    ) -> Self {
        Self {
            kind: FaultKind::ControlNumberMismatch,
            expected: header.to_string(),
            actual: trailer.to_string(),
            corrected: header.to_string(),
            segment: segment.to_string(),
            field,
            position,
        }
    }

    /// Mandatory element absent; `default` is used if accepted.
    pub fn missing_element(segment: &str, field: usize, default: &str, position: usize) -> Self {
        Self {
            kind: FaultKind::MissingElement,
            expected: format!("{}{:02}", segment, field),
            actual: String::new(),
            corrected: default.to_string(),
            segment: segment.to_string(),
            field,
            position,
        }
    }

    /// Element identifier such as `SE01`.
    pub fn element_id(&self) -> String {
        format!("{}{:02}", self.segment, self.field)
    }
}

impl fmt::Display for RecoverableFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} (segment {}): expected {}, found '{}'",
            self.kind.description(),
            self.element_id(),
            self.position,
            self.expected,
            self.actual
        )
    }
}

fn fit_width(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.chars().take(width).collect()
    } else {
        let mut padded = value.to_string();
        padded.extend(std::iter::repeat(' ').take(width - len));
        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_length_pads() {
        let fault = RecoverableFault::field_length("ISA", 6, 15, "SENDER", 1);
        assert_eq!(fault.kind, FaultKind::FieldLength);
        assert_eq!(fault.corrected, "SENDER         ");
        assert_eq!(fault.corrected.len(), 15);
        assert_eq!(fault.element_id(), "ISA06");
    }

    #[test]
    fn test_field_length_trims() {
        let fault = RecoverableFault::field_length("ISA", 9, 6, "20250101", 1);
        assert_eq!(fault.corrected, "202501");
    }

    #[test]
    fn test_count_mismatch_corrects_to_observed() {
        let fault = RecoverableFault::count_mismatch("SE", 1, 4, "5", 6);
        assert_eq!(fault.expected, "4");
        assert_eq!(fault.actual, "5");
        assert_eq!(fault.corrected, "4");
    }

    #[test]
    fn test_control_mismatch_corrects_to_header() {
        let fault = RecoverableFault::control_mismatch("IEA", 2, "000000001", "000000002", 9);
        assert_eq!(fault.corrected, "000000001");
        assert_eq!(fault.kind, FaultKind::ControlNumberMismatch);
    }

    #[test]
    fn test_display() {
        let fault = RecoverableFault::count_mismatch("GE", 1, 1, "2", 8);
        let msg = fault.to_string();
        assert!(msg.contains("count mismatch"));
        assert!(msg.contains("GE01"));
        assert!(msg.contains("segment 8"));
        assert!(msg.contains("expected 1"));
        assert!(msg.contains("'2'"));
    }

    #[test]
    fn test_missing_element() {
        let fault = RecoverableFault::missing_element("SE", 2, "", 4);
        assert_eq!(fault.expected, "SE02");
        assert!(fault.actual.is_empty());
    }
}
