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

//! Builders that write interchanges with consistent trailers.
//!
//! Segments are given in a neutral notation: `*` separates elements, `:`
//! separates components and `^` separates repeats. The builder rewrites
//! them with the chosen syntax characters, so data values must not contain
//! those three characters.

use edi_core::SyntaxProfile;

fn render(segment: &str, syntax: &SyntaxProfile) -> Vec<u8> {
    segment
        .bytes()
        .map(|b| match b {
            b'*' => syntax.delimiter,
            b':' => syntax.sub_delimiter,
            b'^' => syntax.repetition.unwrap_or(b'^'),
            other => other,
        })
        .collect()
}

fn pad(value: &str, width: usize) -> String {
    format!("{:<width$}", value, width = width)
}

/// Writes one X12 interchange.
#[derive(Debug, Clone)]
pub struct X12Builder {
    syntax: SyntaxProfile,
    version: String,
    sender: String,
    receiver: String,
    control: u32,
    groups: Vec<(String, Vec<(String, Vec<String>)>)>,
}

impl Default for X12Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl X12Builder {
    /// Version 00501 with `*` `:` `~` and repetition `^`.
    pub fn new() -> Self {
        Self {
            syntax: SyntaxProfile::x12_default(),
            version: "00501".to_string(),
            sender: "SENDER".to_string(),
            receiver: "RECEIVER".to_string(),
            control: 1,
            groups: Vec::new(),
        }
    }

    pub fn delimiters(mut self, delimiter: u8, sub_delimiter: u8, terminator: u8) -> Self {
        self.syntax.delimiter = delimiter;
        self.syntax.sub_delimiter = sub_delimiter;
        self.syntax.terminator = terminator;
        self
    }

    /// Repetition separator; `None` writes a pre-4020 `U` in ISA11.
    pub fn repetition(mut self, repetition: Option<u8>) -> Self {
        self.syntax.repetition = repetition;
        if repetition.is_none() {
            self.version = "00401".to_string();
        }
        self
    }

    /// Bytes written after every terminator, such as `\r\n`.
    pub fn suffix(mut self, suffix: &[u8]) -> Self {
        self.syntax.terminator_suffix = suffix.to_vec();
        self
    }

    pub fn parties(mut self, sender: &str, receiver: &str) -> Self {
        self.sender = sender.to_string();
        self.receiver = receiver.to_string();
        self
    }

    pub fn control(mut self, control: u32) -> Self {
        self.control = control;
        self
    }

    /// Start a new functional group.
    pub fn group(mut self, functional_id: &str) -> Self {
        self.groups.push((functional_id.to_string(), Vec::new()));
        self
    }

    /// Add a transaction set to the last group, opening a `PO` group if none.
    pub fn transaction(mut self, code: &str, segments: &[&str]) -> Self {
        if self.groups.is_empty() {
            self.groups.push(("PO".to_string(), Vec::new()));
        }
        if let Some((_, transactions)) = self.groups.last_mut() {
            transactions.push((
                code.to_string(),
                segments.iter().map(|s| s.to_string()).collect(),
            ));
        }
        self
    }

    /// Syntax characters the output uses.
    pub fn syntax(&self) -> &SyntaxProfile {
        &self.syntax
    }

    /// The ISA segment, terminator and suffix included.
    pub fn isa(&self) -> Vec<u8> {
        let isa11 = match self.syntax.repetition {
            Some(r) => char::from(r).to_string(),
            None => "U".to_string(),
        };
        let fields = [
            "ISA".to_string(),
            "00".to_string(),
            pad("", 10),
            "00".to_string(),
            pad("", 10),
            "ZZ".to_string(),
            pad(&self.sender, 15),
            "ZZ".to_string(),
            pad(&self.receiver, 15),
            "250101".to_string(),
            "1200".to_string(),
            isa11,
            self.version.clone(),
            format!("{:09}", self.control),
            "0".to_string(),
            "T".to_string(),
        ];
        let mut out = Vec::with_capacity(106);
        for field in &fields {
            out.extend_from_slice(field.as_bytes());
            out.push(self.syntax.delimiter);
        }
        out.push(self.syntax.sub_delimiter);
        self.terminate(&mut out);
        out
    }

    fn terminate(&self, out: &mut Vec<u8>) {
        out.push(self.syntax.terminator);
        out.extend_from_slice(&self.syntax.terminator_suffix);
    }

    fn push(&self, out: &mut Vec<u8>, segment: &str) {
        out.extend(render(segment, &self.syntax));
        self.terminate(out);
    }

    /// Interchange bytes.
    pub fn build_bytes(&self) -> Vec<u8> {
        let mut out = self.isa();
        let gs_version = if self.version == "00401" { "004010" } else { "005010" };
        for (g, (functional_id, transactions)) in self.groups.iter().enumerate() {
            let group_control = g + 1;
            self.push(
                &mut out,
                &format!(
                    "GS*{}*{}*{}*20250101*1200*{}*X*{}",
                    functional_id, self.sender, self.receiver, group_control, gs_version
                ),
            );
            for (t, (code, segments)) in transactions.iter().enumerate() {
                let control = format!("{:04}", t + 1);
                self.push(&mut out, &format!("ST*{}*{}", code, control));
                for segment in segments {
                    self.push(&mut out, segment);
                }
                self.push(&mut out, &format!("SE*{}*{}", segments.len() + 2, control));
            }
            self.push(
                &mut out,
                &format!("GE*{}*{}", transactions.len(), group_control),
            );
        }
        self.push(
            &mut out,
            &format!("IEA*{}*{:09}", self.groups.len(), self.control),
        );
        out
    }

    /// Interchange text; syntax characters must be ASCII.
    pub fn build(&self) -> String {
        String::from_utf8_lossy(&self.build_bytes()).into_owned()
    }
}

/// Writes one EDIFACT interchange.
#[derive(Debug, Clone)]
pub struct EdifactBuilder {
    syntax: SyntaxProfile,
    una: bool,
    identifier: String,
    version: u8,
    control: String,
    groups: bool,
    messages: Vec<(String, Vec<String>)>,
}

impl Default for EdifactBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EdifactBuilder {
    /// `UNOA` level A characters, with a `UNA` segment.
    pub fn new() -> Self {
        Self {
            syntax: SyntaxProfile::edifact_default(),
            una: true,
            identifier: "UNOA".to_string(),
            version: 3,
            control: "1".to_string(),
            groups: false,
            messages: Vec::new(),
        }
    }

    /// Syntax characters announced in `UNA`.
    pub fn syntax_chars(
        mut self,
        sub_delimiter: u8,
        delimiter: u8,
        decimal_mark: u8,
        release: Option<u8>,
        terminator: u8,
    ) -> Self {
        self.syntax.sub_delimiter = sub_delimiter;
        self.syntax.delimiter = delimiter;
        self.syntax.decimal_mark = decimal_mark;
        self.syntax.release = release;
        self.syntax.terminator = terminator;
        self.syntax.repetition = None;
        self
    }

    /// Write `UNA` or rely on the identifier's defaults.
    pub fn una(mut self, una: bool) -> Self {
        self.una = una;
        self
    }

    pub fn identifier(mut self, identifier: &str) -> Self {
        self.identifier = identifier.to_string();
        self
    }

    pub fn suffix(mut self, suffix: &[u8]) -> Self {
        self.syntax.terminator_suffix = suffix.to_vec();
        self
    }

    pub fn control(mut self, control: &str) -> Self {
        self.control = control.to_string();
        self
    }

    /// Syntax version in `UNB` S001 (3 by default).
    pub fn syntax_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Wrap all messages in one `UNG` group.
    pub fn grouped(mut self, grouped: bool) -> Self {
        self.groups = grouped;
        self
    }

    pub fn message(mut self, message_type: &str, segments: &[&str]) -> Self {
        self.messages.push((
            message_type.to_string(),
            segments.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn syntax(&self) -> &SyntaxProfile {
        &self.syntax
    }

    /// The `UNA` segment, suffix included.
    pub fn una_segment(&self) -> Vec<u8> {
        let s = &self.syntax;
        let mut out = b"UNA".to_vec();
        out.extend([
            s.sub_delimiter,
            s.delimiter,
            s.decimal_mark,
            s.release.unwrap_or(b' '),
            s.repetition.unwrap_or(b' '),
            s.terminator,
        ]);
        out.extend_from_slice(&s.terminator_suffix);
        out
    }

    fn push(&self, out: &mut Vec<u8>, segment: &str) {
        out.extend(render(segment, &self.syntax));
        out.push(self.syntax.terminator);
        out.extend_from_slice(&self.syntax.terminator_suffix);
    }

    pub fn build_bytes(&self) -> Vec<u8> {
        let mut out = if self.una {
            self.una_segment()
        } else {
            Vec::new()
        };
        self.push(
            &mut out,
            &format!(
                "UNB*{}:{}*SENDER:14*RECEIVER:14*250101:1200*{}",
                self.identifier, self.version, self.control
            ),
        );
        if self.groups {
            self.push(&mut out, "UNG*ORDERS*SENDER*RECEIVER*250101:1200*G1*UN*D:96A");
        }
        for (i, (message_type, segments)) in self.messages.iter().enumerate() {
            let reference = format!("M{}", i + 1);
            self.push(
                &mut out,
                &format!("UNH*{}*{}:D:96A:UN", reference, message_type),
            );
            for segment in segments {
                self.push(&mut out, segment);
            }
            self.push(&mut out, &format!("UNT*{}*{}", segments.len() + 2, reference));
        }
        if self.groups {
            self.push(&mut out, &format!("UNE*{}*G1", self.messages.len()));
        }
        let count = if self.groups { 1 } else { self.messages.len() };
        self.push(&mut out, &format!("UNZ*{}*{}", count, self.control));
        out
    }

    pub fn build(&self) -> String {
        String::from_utf8_lossy(&self.build_bytes()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isa_is_106_bytes() {
        let isa = X12Builder::new().isa();
        assert_eq!(isa.len(), 106);
        assert!(isa.ends_with(b"*T*:~"));
    }

    #[test]
    fn test_x12_trailer_counts() {
        let text = X12Builder::new()
            .transaction("850", &["BEG*00*SA*PO1**20250101"])
            .transaction("850", &["BEG*00*SA*PO2**20250101"])
            .build();
        assert!(text.contains("SE*3*0002~"));
        assert!(text.contains("GE*2*1~"));
        assert!(text.ends_with("IEA*1*000000001~"));
    }

    #[test]
    fn test_edifact_rendering() {
        let text = EdifactBuilder::new()
            .syntax_chars(b'|', b'#', b',', Some(b'!'), b'@')
            .message("ORDERS", &["BGM*220*PO1"])
            .build();
        assert!(text.starts_with("UNA|#,! @"));
        assert!(text.contains("UNH#M1#ORDERS|D|96A|UN@"));
        assert!(text.ends_with("UNZ#1#1@"));
    }
}
