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

//! X12 functional (997) and implementation (999) acknowledgments.
//!
//! One acknowledgment interchange is written per inbound interchange: a
//! single `FA` group holding one transaction set per inbound group. A `TA1`
//! interchange acknowledgment is added when the sender asked for one
//! (ISA14 = 1), when the configuration requests it, or when the inbound
//! interchange was rejected.

use crate::tracker::{GroupResponse, InterchangeResponse, Status, Tracker};
use crate::writer::{SegmentWriter, Value};
use edi_core::{EdiError, FaultKind, ParserConfig, RecoverableFault, Standard, SyntaxProfile};
use edi_stream::{AckHandler, DocumentSummary, GroupHeader, InterchangeHeader, ISA_WIDTHS};
use tracing::debug;

/// Implementation convention written in 999 headers.
pub const IMPLEMENTATION_REFERENCE: &str = "005010X231A1";

/// Which transaction set acknowledges a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum X12AckKind {
    /// 997 functional acknowledgment.
    #[default]
    Functional,
    /// 999 implementation acknowledgment.
    Implementation,
}

impl X12AckKind {
    /// Transaction set identifier.
    pub fn code(self) -> &'static str {
        match self {
            X12AckKind::Functional => "997",
            X12AckKind::Implementation => "999",
        }
    }
}

/// Builds X12 acknowledgments from parser hook calls.
///
/// # Examples
///
/// ```rust
/// use edi_ack::X12Acknowledgment;
/// use edi_core::ParserConfig;
/// use edi_stream::{CollectingSink, EdiParser};
///
/// let input = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       \
///              *250101*1200*^*00501*000000001*0*T*:~\
///              GS*PO*SENDER*RECEIVER*20250101*1200*1*X*005010~\
///              ST*850*0001~BEG*00*SA*PO1**20250101~SE*3*0001~\
///              GE*1*1~IEA*1*000000001~";
///
/// let mut ack = X12Acknowledgment::new(&ParserConfig::default());
/// EdiParser::new()
///     .parse_with_ack(input.as_bytes(), &mut CollectingSink::new(), &mut ack)
///     .unwrap();
///
/// let text = &ack.acknowledgments()[0];
/// assert!(text.contains("AK1*PO*1~"));
/// assert!(text.contains("AK9*A*1*1*1~"));
/// ```
#[derive(Debug)]
pub struct X12Acknowledgment {
    kind: X12AckKind,
    group_only: bool,
    interchange_ack: bool,
    control: u32,
    timestamp: Option<(String, String)>,
    tracker: Tracker,
    acknowledgments: Vec<String>,
}

impl X12Acknowledgment {
    /// 997 generator honoring `group_acknowledgment_only` and
    /// `interchange_acknowledgment_requested`.
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            kind: X12AckKind::default(),
            group_only: config.group_acknowledgment_only,
            interchange_ack: config.interchange_acknowledgment_requested,
            control: 1,
            timestamp: None,
            tracker: Tracker::new(Standard::X12),
            acknowledgments: Vec::new(),
        }
    }

    /// Transaction set to write. Groups declaring an `X231` version always
    /// get a 999.
    pub fn with_kind(mut self, kind: X12AckKind) -> Self {
        self.kind = kind;
        self
    }

    /// Control number of the first acknowledgment interchange.
    pub fn with_control(mut self, control: u32) -> Self {
        self.control = control;
        self
    }

    /// Date (`CCYYMMDD`) and time (`HHMM`) to stamp; defaults to the
    /// inbound interchange's.
    pub fn with_timestamp(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.timestamp = Some((date.into(), time.into()));
        self
    }

    /// Acknowledgments written so far, one per inbound interchange.
    pub fn acknowledgments(&self) -> &[String] {
        &self.acknowledgments
    }

    pub fn into_acknowledgments(self) -> Vec<String> {
        self.acknowledgments
    }

    fn kind_for(&self, group: &GroupHeader) -> X12AckKind {
        if group.version.contains("X231") {
            X12AckKind::Implementation
        } else {
            self.kind
        }
    }

    fn next_control(&mut self) -> u32 {
        let control = self.control;
        self.control = if self.control >= 999_999_999 {
            1
        } else {
            self.control + 1
        };
        control
    }

    fn write(&mut self, response: &InterchangeResponse) {
        let control = self.next_control();
        let header = &response.header;
        let (date, time) = self.timestamp.clone().unwrap_or_else(|| {
            let date = if header.date.len() == 6 {
                format!("20{}", header.date)
            } else {
                header.date.clone()
            };
            (date, header.time.clone())
        });
        let short_date = &date[date.len().saturating_sub(6)..];

        let mut w = SegmentWriter::new(&response.syntax);
        write_isa(&mut w, header, short_date, &time, control);

        let status = response.status();
        if self.interchange_ack || header.ack_requested || status == Status::Rejected {
            let (code, note) = match status {
                Status::Rejected => ("R", "022"),
                _ => ("A", "000"),
            };
            w.segment(
                "TA1",
                &[
                    Value::Simple(&format!("{:0>9}", header.control)),
                    Value::Simple(header.date.as_str()),
                    Value::Simple(header.time.as_str()),
                    Value::Simple(code),
                    Value::Simple(note),
                ],
            );
        }

        if !response.groups.is_empty() {
            let first = &response.groups[0].header;
            let version = match self.kind_for(first) {
                X12AckKind::Implementation => IMPLEMENTATION_REFERENCE.to_string(),
                X12AckKind::Functional if first.version.is_empty() => "004010".to_string(),
                X12AckKind::Functional => first.version.clone(),
            };
            let group_control = control.to_string();
            w.segment(
                "GS",
                &[
                    Value::Simple("FA"),
                    Value::Simple(&first.receiver),
                    Value::Simple(&first.sender),
                    Value::Simple(&date),
                    Value::Simple(&time),
                    Value::Simple(&group_control),
                    Value::Simple("X"),
                    Value::Simple(&version),
                ],
            );
            for (i, group) in response.groups.iter().enumerate() {
                self.write_group(&mut w, group, i + 1);
            }
            w.segment(
                "GE",
                &[
                    Value::Simple(&response.groups.len().to_string()),
                    Value::Simple(&group_control),
                ],
            );
        }

        w.segment(
            "IEA",
            &[
                Value::Simple(if response.groups.is_empty() { "0" } else { "1" }),
                Value::Simple(&format!("{:09}", control)),
            ],
        );

        debug!(
            control,
            groups = response.groups.len(),
            status = ?status,
            "X12 acknowledgment written"
        );
        self.acknowledgments.push(w.finish());
    }

    fn write_group(&self, w: &mut SegmentWriter, group: &GroupResponse, ordinal: usize) {
        let kind = self.kind_for(&group.header);
        let control = format!("{:04}", ordinal);
        let reference = match kind {
            X12AckKind::Implementation => IMPLEMENTATION_REFERENCE,
            X12AckKind::Functional => "",
        };

        w.reset_count();
        w.segment(
            "ST",
            &[
                Value::Simple(kind.code()),
                Value::Simple(&control),
                Value::Simple(reference),
            ],
        );
        let group_version = match kind {
            X12AckKind::Implementation => group.header.version.as_str(),
            X12AckKind::Functional => "",
        };
        w.segment(
            "AK1",
            &[
                Value::Simple(&group.header.functional_id),
                Value::Simple(&group.header.control),
                Value::Simple(group_version),
            ],
        );

        if !self.group_only {
            for document in &group.documents {
                write_document(w, kind, document);
            }
        }

        let received = group.documents.len().to_string();
        let accepted = if group.rejected { "0".to_string() } else { received.clone() };
        w.segment(
            "AK9",
            &[
                Value::Simple(status_code(group.status())),
                Value::Simple(&received),
                Value::Simple(&received),
                Value::Simple(&accepted),
            ],
        );
        let count = (w.count() + 1).to_string();
        w.segment("SE", &[Value::Simple(&count), Value::Simple(&control)]);
    }
}

fn write_isa(w: &mut SegmentWriter, header: &InterchangeHeader, date: &str, time: &str, control: u32) {
    let field = |i: usize| header.elements.get(i).map_or("", |s| s.trim());
    let field_or = |value: &'static str, i: usize| {
        let v = field(i);
        if v.is_empty() {
            value.to_string()
        } else {
            v.to_string()
        }
    };
    let sub = char::from(w.syntax().sub_delimiter).to_string();
    let values = [
        "00".to_string(),
        String::new(),
        "00".to_string(),
        String::new(),
        field_or("ZZ", 6),
        field(7).to_string(),
        field_or("ZZ", 4),
        field(5).to_string(),
        date.to_string(),
        time.to_string(),
        field_or("U", 10),
        field_or("00401", 11),
        format!("{:09}", control),
        "0".to_string(),
        field_or("P", 14),
        sub,
    ];
    let padded: Vec<String> = values
        .iter()
        .zip(ISA_WIDTHS.iter())
        .map(|(v, &width)| format!("{:<width$}", v, width = width))
        .collect();
    let elements: Vec<Value<'_>> = padded.iter().map(|v| Value::Simple(v.as_str())).collect();
    w.segment("ISA", &elements);
}

fn write_document(w: &mut SegmentWriter, kind: X12AckKind, document: &DocumentSummary) {
    let reference = match kind {
        X12AckKind::Implementation => document.reference.first().map_or("", String::as_str),
        X12AckKind::Functional => "",
    };
    w.segment(
        "AK2",
        &[
            Value::Simple(&document.doc_type),
            Value::Simple(&document.control),
            Value::Simple(reference),
        ],
    );

    let status = if document.is_clean() {
        Status::Accepted
    } else {
        Status::AcceptedWithErrors
    };
    let mut codes: Vec<&str> = Vec::new();
    for fault in &document.faults {
        let code = syntax_error_code(fault);
        if !codes.contains(&code) && codes.len() < 5 {
            codes.push(code);
        }
    }
    let mut elements = vec![Value::Simple(status_code(status))];
    elements.extend(codes.into_iter().map(Value::Simple));
    let tag = match kind {
        X12AckKind::Functional => "AK5",
        X12AckKind::Implementation => "IK5",
    };
    w.segment(tag, &elements);
}

/// AK5/IK5 transaction set syntax error code for a fault.
pub fn syntax_error_code(fault: &RecoverableFault) -> &'static str {
    match fault.kind {
        FaultKind::CountMismatch => "4",
        FaultKind::ControlNumberMismatch => "3",
        FaultKind::FieldLength | FaultKind::MissingElement => "5",
    }
}

fn status_code(status: Status) -> &'static str {
    match status {
        Status::Accepted => "A",
        Status::AcceptedWithErrors => "E",
        Status::Rejected => "R",
    }
}

impl AckHandler for X12Acknowledgment {
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
            debug!(error = %error, "rejecting X12 interchange");
            self.write(&response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(kind: FaultKind) -> RecoverableFault {
        match kind {
            FaultKind::CountMismatch => RecoverableFault::count_mismatch("SE", 1, 4, "9", 7),
            FaultKind::ControlNumberMismatch => {
                RecoverableFault::control_mismatch("SE", 2, "0001", "0002", 7)
            }
            FaultKind::FieldLength => RecoverableFault::field_length("ISA", 6, 15, "X", 1),
            FaultKind::MissingElement => RecoverableFault::missing_element("GE", 2, "", 9),
        }
    }

    #[test]
    fn test_syntax_error_codes() {
        assert_eq!(syntax_error_code(&fault(FaultKind::CountMismatch)), "4");
        assert_eq!(syntax_error_code(&fault(FaultKind::ControlNumberMismatch)), "3");
        assert_eq!(syntax_error_code(&fault(FaultKind::MissingElement)), "5");
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(X12AckKind::default().code(), "997");
        assert_eq!(X12AckKind::Implementation.code(), "999");
    }

    #[test]
    fn test_x231_group_forces_999() {
        let ack = X12Acknowledgment::new(&ParserConfig::default());
        let group = GroupHeader {
            version: "005010X231A1".to_string(),
            ..GroupHeader::default()
        };
        assert_eq!(ack.kind_for(&group), X12AckKind::Implementation);
        assert_eq!(ack.kind_for(&GroupHeader::default()), X12AckKind::Functional);
    }

    #[test]
    fn test_control_wraps() {
        let mut ack = X12Acknowledgment::new(&ParserConfig::default()).with_control(999_999_999);
        assert_eq!(ack.next_control(), 999_999_999);
        assert_eq!(ack.next_control(), 1);
    }

    #[test]
    fn test_isa_is_fixed_width() {
        let mut header = InterchangeHeader::empty(Standard::X12);
        header.elements = vec![
            "00", "          ", "00", "          ", "ZZ", "SENDER         ", "01",
            "RECEIVER       ", "250101", "1200", "^", "00501", "000000007", "0", "T", ":",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let mut w = SegmentWriter::new(&SyntaxProfile::x12_default());
        write_isa(&mut w, &header, "250102", "0930", 42);
        let isa = w.finish();
        assert_eq!(isa.len(), 106);
        assert!(isa.starts_with("ISA*00*          *00*          *01*RECEIVER       *ZZ*SENDER         *"));
        assert!(isa.ends_with("*250102*0930*^*00501*000000042*0*T*:~"));
    }
}
