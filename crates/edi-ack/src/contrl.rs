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

//! EDIFACT CONTRL syntax and service reports.
//!
//! One CONTRL message is written per inbound interchange. `UCI` reports the
//! interchange, `UCF` each `UNG` group and `UCM` each message.

use crate::tracker::{InterchangeResponse, Status, Tracker};
use crate::writer::{SegmentWriter, Value};
use edi_core::{EdiError, FaultKind, ParserConfig, RecoverableFault, Standard, SyntaxProfile};
use edi_stream::{AckHandler, DocumentSummary, GroupHeader, InterchangeHeader};
use tracing::debug;

/// Action code 0083: acknowledged.
const ACKNOWLEDGED: &str = "7";
/// Action code 0083: rejected.
const REJECTED: &str = "4";

/// Builds CONTRL messages from parser hook calls.
#[derive(Debug)]
pub struct ContrlAcknowledgment {
    group_only: bool,
    control: u32,
    timestamp: Option<(String, String)>,
    tracker: Tracker,
    acknowledgments: Vec<String>,
}

impl ContrlAcknowledgment {
    /// Generator honoring `group_acknowledgment_only`.
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            group_only: config.group_acknowledgment_only,
            control: 1,
            timestamp: None,
            tracker: Tracker::new(Standard::Edifact),
            acknowledgments: Vec::new(),
        }
    }

    /// Interchange control reference of the first CONTRL interchange.
    pub fn with_control(mut self, control: u32) -> Self {
        self.control = control;
        self
    }

    /// Date (`YYMMDD`) and time (`HHMM`) for `UNB`; defaults to the inbound
    /// interchange's.
    pub fn with_timestamp(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.timestamp = Some((date.into(), time.into()));
        self
    }

    pub fn acknowledgments(&self) -> &[String] {
        &self.acknowledgments
    }

    pub fn into_acknowledgments(self) -> Vec<String> {
        self.acknowledgments
    }

    fn write(&mut self, response: &InterchangeResponse) {
        let header = &response.header;
        let control = self.control.to_string();
        self.control = self.control.saturating_add(1);
        let (date, time) = self
            .timestamp
            .clone()
            .unwrap_or_else(|| (header.date.clone(), header.time.clone()));
        let identifier = header.syntax_identifier.as_deref().unwrap_or("UNOA");
        let version = if header.version.is_empty() {
            "3"
        } else {
            header.version.as_str()
        };

        let mut w = SegmentWriter::new(&response.syntax);
        w.raw(&service_advice(&response.syntax));
        w.segment(
            "UNB",
            &[
                Value::Composite(&[identifier, version]),
                Value::Composite(&[header.receiver.id.as_str(), header.receiver.qualifier.as_str()]),
                Value::Composite(&[header.sender.id.as_str(), header.sender.qualifier.as_str()]),
                Value::Composite(&[date.as_str(), time.as_str()]),
                Value::Simple(&control),
            ],
        );

        w.reset_count();
        w.segment(
            "UNH",
            &[
                Value::Simple("1"),
                Value::Composite(&["CONTRL", "D", "3", "UN"]),
            ],
        );

        let status = response.status();
        w.segment(
            "UCI",
            &[
                Value::Simple(&header.control),
                Value::Composite(&[header.sender.id.as_str(), header.sender.qualifier.as_str()]),
                Value::Composite(&[header.receiver.id.as_str(), header.receiver.qualifier.as_str()]),
                Value::Simple(action(status)),
            ],
        );

        if !self.group_only {
            for document in &response.ungrouped {
                write_message(&mut w, document);
            }
        }
        for group in &response.groups {
            w.segment(
                "UCF",
                &[
                    Value::Simple(&group.header.control),
                    Value::Simple(&group.header.sender),
                    Value::Simple(&group.header.receiver),
                    Value::Simple(action(group.status())),
                ],
            );
            if !self.group_only {
                for document in &group.documents {
                    write_message(&mut w, document);
                }
            }
        }

        let count = (w.count() + 1).to_string();
        w.segment("UNT", &[Value::Simple(&count), Value::Simple("1")]);
        w.segment("UNZ", &[Value::Simple("1"), Value::Simple(&control)]);

        debug!(
            control = %control,
            groups = response.groups.len(),
            status = ?status,
            "CONTRL written"
        );
        self.acknowledgments.push(w.finish());
    }
}

/// `UNA` announcing the syntax characters in use.
fn service_advice(syntax: &SyntaxProfile) -> String {
    let mut out = String::from("UNA");
    for b in [
        syntax.sub_delimiter,
        syntax.delimiter,
        syntax.decimal_mark,
        syntax.release.unwrap_or(b' '),
        syntax.repetition.unwrap_or(b' '),
        syntax.terminator,
    ] {
        out.push(char::from(b));
    }
    for &b in &syntax.terminator_suffix {
        out.push(char::from(b));
    }
    out
}

fn write_message(w: &mut SegmentWriter, document: &DocumentSummary) {
    let identifier: Vec<&str> = if document.reference.is_empty() {
        vec![document.doc_type.as_str()]
    } else {
        document.reference.iter().map(String::as_str).collect()
    };
    let error = document.faults.first().map_or("", syntax_error_code);
    w.segment(
        "UCM",
        &[
            Value::Simple(&document.control),
            Value::Composite(&identifier),
            Value::Simple(ACKNOWLEDGED),
            Value::Simple(error),
        ],
    );
}

/// Syntax error code (0085) for a fault.
pub fn syntax_error_code(fault: &RecoverableFault) -> &'static str {
    match fault.kind {
        FaultKind::CountMismatch => "29",
        FaultKind::ControlNumberMismatch => "28",
        FaultKind::MissingElement => "13",
        FaultKind::FieldLength => "12",
    }
}

fn action(status: Status) -> &'static str {
    match status {
        Status::Rejected => REJECTED,
        Status::Accepted | Status::AcceptedWithErrors => ACKNOWLEDGED,
    }
}

impl AckHandler for ContrlAcknowledgment {
    fn interchange_start(&mut self, header: &InterchangeHeader, syntax: &SyntaxProfile) {
        self.tracker.interchange_start(header, syntax);
    }

    fn group_start(&mut self, group: &GroupHeader) {
        self.tracker.group_start(group);
    }

    fn document_end(&mut self, document: &DocumentSummary) {
        self.tracker.document_end(document);
    }

    fn group_end(&mut self, _group: &GroupHeader, _documents: usize) {
        self.tracker.group_end();
    }

    fn interchange_end(&mut self, _header: &InterchangeHeader, _groups: usize) {
        if let Some(response) = self.tracker.finish() {
            self.write(&response);
        }
    }

    fn negative(&mut self, error: &EdiError) {
        if let Some(response) = self.tracker.reject() {
            debug!(error = %error, "rejecting EDIFACT interchange");
            self.write(&response);
        }
    }
}
