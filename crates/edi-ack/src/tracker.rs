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

//! Envelope bookkeeping shared by the generators.

use edi_core::{Standard, SyntaxProfile};
use edi_stream::{DocumentSummary, GroupHeader, InterchangeHeader};

/// Outcome reported for a group or interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Accepted,
    AcceptedWithErrors,
    Rejected,
}

/// Documents received in one functional group.
#[derive(Debug, Clone)]
pub(crate) struct GroupResponse {
    pub header: GroupHeader,
    pub documents: Vec<DocumentSummary>,
    pub rejected: bool,
}

impl GroupResponse {
    pub fn status(&self) -> Status {
        status_of(&self.documents, self.rejected)
    }
}

/// Everything received in one interchange.
#[derive(Debug, Clone)]
pub(crate) struct InterchangeResponse {
    pub header: InterchangeHeader,
    pub syntax: SyntaxProfile,
    pub groups: Vec<GroupResponse>,
    /// EDIFACT messages outside any `UNG` group.
    pub ungrouped: Vec<DocumentSummary>,
    pub rejected: bool,
}

impl InterchangeResponse {
    pub fn status(&self) -> Status {
        if self.rejected {
            return Status::Rejected;
        }
        let groups = self.groups.iter().map(GroupResponse::status);
        let messages = std::iter::once(status_of(&self.ungrouped, false));
        if groups.chain(messages).any(|s| s != Status::Accepted) {
            Status::AcceptedWithErrors
        } else {
            Status::Accepted
        }
    }
}

fn status_of(documents: &[DocumentSummary], rejected: bool) -> Status {
    if rejected {
        Status::Rejected
    } else if documents.iter().all(DocumentSummary::is_clean) {
        Status::Accepted
    } else {
        Status::AcceptedWithErrors
    }
}

/// Follows the hook calls of one standard and hands back each finished
/// interchange.
#[derive(Debug)]
pub(crate) struct Tracker {
    standard: Standard,
    current: Option<InterchangeResponse>,
    open: Option<GroupResponse>,
}

impl Tracker {
    pub fn new(standard: Standard) -> Self {
        Self {
            standard,
            current: None,
            open: None,
        }
    }

    pub fn interchange_start(&mut self, header: &InterchangeHeader, syntax: &SyntaxProfile) {
        self.open = None;
        self.current = (header.standard == self.standard).then(|| InterchangeResponse {
            header: header.clone(),
            syntax: syntax.clone(),
            groups: Vec::new(),
            ungrouped: Vec::new(),
            rejected: false,
        });
    }

    pub fn group_start(&mut self, header: &GroupHeader) {
        if self.current.is_some() {
            self.open = Some(GroupResponse {
                header: header.clone(),
                documents: Vec::new(),
                rejected: false,
            });
        }
    }

    pub fn document_end(&mut self, document: &DocumentSummary) {
        if let Some(group) = self.open.as_mut() {
            group.documents.push(document.clone());
        } else if let Some(current) = self.current.as_mut() {
            current.ungrouped.push(document.clone());
        }
    }

    pub fn group_end(&mut self) {
        if let (Some(group), Some(current)) = (self.open.take(), self.current.as_mut()) {
            current.groups.push(group);
        }
    }

    /// The interchange closed normally.
    pub fn finish(&mut self) -> Option<InterchangeResponse> {
        self.group_end();
        self.current.take()
    }

    /// The interchange failed; the open group and the interchange are
    /// reported as rejected.
    pub fn reject(&mut self) -> Option<InterchangeResponse> {
        if let Some(group) = self.open.as_mut() {
            group.rejected = true;
        }
        let mut response = self.finish()?;
        response.rejected = true;
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_core::RecoverableFault;

    fn document(control: &str, clean: bool) -> DocumentSummary {
        DocumentSummary {
            doc_type: "850".to_string(),
            control: control.to_string(),
            version: None,
            reference: Vec::new(),
            segment_count: 4,
            faults: if clean {
                Vec::new()
            } else {
                vec![RecoverableFault::count_mismatch("SE", 1, 4, "9", 7)]
            },
        }
    }

    #[test]
    fn test_other_standard_is_ignored() {
        let mut tracker = Tracker::new(Standard::X12);
        tracker.interchange_start(
            &InterchangeHeader::empty(Standard::Edifact),
            &SyntaxProfile::edifact_default(),
        );
        tracker.document_end(&document("1", true));
        assert!(tracker.finish().is_none());
    }

    #[test]
    fn test_groups_and_status() {
        let mut tracker = Tracker::new(Standard::X12);
        tracker.interchange_start(
            &InterchangeHeader::empty(Standard::X12),
            &SyntaxProfile::x12_default(),
        );
        tracker.group_start(&GroupHeader::default());
        tracker.document_end(&document("0001", true));
        tracker.group_end();
        tracker.group_start(&GroupHeader::default());
        tracker.document_end(&document("0001", false));
        tracker.group_end();

        let response = tracker.finish().unwrap();
        assert_eq!(response.groups.len(), 2);
        assert_eq!(response.groups[0].status(), Status::Accepted);
        assert_eq!(response.groups[1].status(), Status::AcceptedWithErrors);
        assert_eq!(response.status(), Status::AcceptedWithErrors);
    }

    #[test]
    fn test_reject_closes_open_group() {
        let mut tracker = Tracker::new(Standard::Edifact);
        tracker.interchange_start(
            &InterchangeHeader::empty(Standard::Edifact),
            &SyntaxProfile::edifact_default(),
        );
        tracker.group_start(&GroupHeader::default());
        tracker.document_end(&document("M1", true));

        let response = tracker.reject().unwrap();
        assert_eq!(response.groups.len(), 1);
        assert_eq!(response.groups[0].status(), Status::Rejected);
        assert_eq!(response.status(), Status::Rejected);
        assert!(tracker.finish().is_none());
    }
}
