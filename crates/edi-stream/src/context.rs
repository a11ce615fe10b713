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

//! Per-interchange envelope state.
//!
//! An [`EnvelopeContext`] is created when an interchange header is read and
//! passed by `&mut` through the group, document and segment levels. It
//! holds the counts and control numbers the trailers are checked against,
//! and every fault the recovery policy accepted.

use crate::recovery::RecoveryPolicy;
use edi_core::{EdiError, EdiResult, RecoverableFault, Standard};
use tracing::warn;

/// An identified party: sender or receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    pub id: String,
    pub qualifier: String,
}

impl Party {
    pub fn new(id: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            qualifier: qualifier.into(),
        }
    }
}

/// Fields of an interchange header (`ISA` or `UNB`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterchangeHeader {
    pub standard: Standard,
    pub sender: Party,
    pub receiver: Party,
    pub date: String,
    pub time: String,
    /// Interchange control number (ISA13, UNB 0020).
    pub control: String,
    /// Control version (ISA12) or syntax version (UNB S001/0002).
    pub version: String,
    /// EDIFACT syntax identifier such as `UNOA`.
    pub syntax_identifier: Option<String>,
    /// Sender requested an interchange acknowledgment.
    pub ack_requested: bool,
    pub test_indicator: String,
    /// Header elements as read, element 1 first.
    pub elements: Vec<String>,
}

impl InterchangeHeader {
    /// Empty header for a standard; used for EDIFACT messages without `UNB`.
    pub fn empty(standard: Standard) -> Self {
        Self {
            standard,
            sender: Party::default(),
            receiver: Party::default(),
            date: String::new(),
            time: String::new(),
            control: String::new(),
            version: String::new(),
            syntax_identifier: None,
            ack_requested: false,
            test_indicator: String::new(),
            elements: Vec::new(),
        }
    }
}

/// Fields of a functional group header (`GS` or `UNG`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupHeader {
    /// Functional identifier (GS01, UNG 0038).
    pub functional_id: String,
    pub sender: String,
    pub receiver: String,
    pub date: String,
    pub time: String,
    pub control: String,
    /// Responsible agency (GS07, UNG 0051).
    pub agency: String,
    pub version: String,
}

/// Outcome of one transaction set or message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Transaction set identifier or message type.
    pub doc_type: String,
    pub control: String,
    /// Version used for loop rules, if any.
    pub version: Option<String>,
    /// Identifier components echoed by acknowledgments: EDIFACT S009
    /// (type, version, release, agency) or the X12 ST03 convention.
    pub reference: Vec<String>,
    /// Segments counted, header and trailer included.
    pub segment_count: usize,
    /// Faults accepted inside this document.
    pub faults: Vec<RecoverableFault>,
}

impl DocumentSummary {
    /// Returns `true` if the document parsed without accepted faults.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Counts and control numbers for the interchange being parsed.
#[derive(Debug, Clone)]
pub struct EnvelopeContext {
    pub interchange: InterchangeHeader,
    /// Groups opened so far.
    pub group_count: usize,
    /// The open group, if any.
    pub group: Option<GroupHeader>,
    /// Documents in the open group.
    pub document_count: usize,
    /// Documents outside any group (EDIFACT implicit group).
    pub ungrouped_count: usize,
    /// Version of the open group.
    pub group_version: String,
    /// Expected length of the group date.
    pub date_length: usize,
    /// Segments in the open document.
    pub segment_count: usize,
    /// Every fault accepted in this interchange.
    pub faults: Vec<RecoverableFault>,
    document_start: usize,
}

impl EnvelopeContext {
    pub fn new(interchange: InterchangeHeader) -> Self {
        Self {
            interchange,
            group_count: 0,
            group: None,
            document_count: 0,
            ungrouped_count: 0,
            group_version: String::new(),
            date_length: 6,
            segment_count: 0,
            faults: Vec::new(),
            document_start: 0,
        }
    }

    /// Enter a group.
    pub fn open_group(&mut self, group: GroupHeader) {
        self.group_count += 1;
        self.document_count = 0;
        self.date_length = date_length_for(&group.version);
        self.group_version = group.version.clone();
        self.group = Some(group);
    }

    /// Leave the open group.
    pub fn close_group(&mut self) -> Option<GroupHeader> {
        self.group_version.clear();
        self.group.take()
    }

    /// Enter a document; its header segment is counted.
    pub fn open_document(&mut self) {
        if self.group.is_some() {
            self.document_count += 1;
        } else {
            self.ungrouped_count += 1;
        }
        self.segment_count = 1;
        self.document_start = self.faults.len();
    }

    /// Faults accepted since the open document began.
    pub fn document_faults(&self) -> &[RecoverableFault] {
        &self.faults[self.document_start.min(self.faults.len())..]
    }

    /// Route `fault` through `policy`.
    ///
    /// Returns the corrected value when accepted, otherwise
    /// [`EdiError::Unrecovered`].
    pub fn recover(
        &mut self,
        policy: &dyn RecoveryPolicy,
        fault: RecoverableFault,
    ) -> EdiResult<String> {
        if !policy.recover(&fault) {
            return Err(EdiError::unrecovered(fault));
        }
        warn!(
            kind = ?fault.kind,
            element = %fault.element_id(),
            segment = fault.position,
            expected = %fault.expected,
            actual = %fault.actual,
            "accepted structural fault"
        );
        let corrected = fault.corrected.clone();
        self.faults.push(fault);
        Ok(corrected)
    }
}

/// Date width in a group header: `CCYYMMDD` from version 004010 on.
pub fn date_length_for(version: &str) -> usize {
    let prefix: String = version.chars().take(6).collect();
    if prefix.len() == 6 && prefix.as_str() >= "004010" {
        8
    } else {
        6
    }
}
