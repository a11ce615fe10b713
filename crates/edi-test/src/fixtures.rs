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

//! Canonical interchanges used across the test suites.

/// ISA segment shared by the X12 fixtures: control 000000001, version 00501.
pub const ISA: &str = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *250101*1200*^*00501*000000001*0*T*:~";

/// One interchange, one group, one 850 with two data segments.
pub fn minimal_x12() -> String {
    format!(
        "{}GS*PO*SENDER*RECEIVER*20250101*1200*1*X*005010~ST*850*0001~BEG*00*SA*PO123**20250101~REF*DP*038~SE*4*0001~GE*1*1~IEA*1*000000001~",
        ISA
    )
}

/// An 850 with header parties, two line items and a summary.
pub fn purchase_order_x12() -> String {
    let segments = [
        "GS*PO*SENDER*RECEIVER*20250101*1200*7*X*004010",
        "ST*850*0001",
        "BEG*00*SA*PO-4711**20250101",
        "REF*DP*038",
        "N1*ST*WAREHOUSE 7*92*W7",
        "N3*1 MAIN ST",
        "N4*SPRINGFIELD*IL*62701",
        "N1*BT*ACCOUNTS",
        "PO1*1*10*EA*9.95**VP*ABC-1",
        "PID*F****WIDGET",
        "PO1*2*5*EA*19.5**VP*ABC-2",
        "CTT*2",
        "SE*12*0001",
        "GE*1*7",
        "IEA*1*000000001",
    ];
    let isa = ISA.replace("*00501*", "*00401*").replace("*^*", "*U*");
    format!("{}\r\n{}~\r\n", isa, segments.join("~\r\n"))
}

/// `UNA:+.? '` then one ORDERS message in an implicit group.
pub fn edifact_with_una() -> String {
    concat!(
        "UNA:+.? '",
        "UNB+UNOA:3+SENDER:14+RECEIVER:14+250101:1200+REF1'",
        "UNH+1+ORDERS:D:96A:UN'",
        "BGM+220+PO?+123+9'",
        "DTM+137:20250101:102'",
        "NAD+BY+5412345000013::9'",
        "LIN+1++4000862141404:SRS'",
        "QTY+21:48'",
        "UNS+S'",
        "CNT+2:1'",
        "UNT+9+1'",
        "UNZ+1+REF1'",
    )
    .to_string()
}

/// Two INVOIC messages in an explicit `UNG` group, no `UNA`, CRLF after terminators.
pub fn edifact_grouped() -> String {
    [
        "UNB+UNOC:3+SENDER+RECEIVER+250101:1200+42",
        "UNG+INVOIC+SENDER+RECEIVER+250101:1200+G7+UN+D:96A",
        "UNH+A1+INVOIC:D:96A:UN",
        "BGM+380+INV1",
        "LIN+1",
        "MOA+203:100",
        "UNS+S",
        "CNT+2:1",
        "MOA+86:100",
        "UNT+8+A1",
        "UNH+A2+INVOIC:D:96A:UN",
        "BGM+380+INV2",
        "UNT+3+A2",
        "UNE+2+G7",
        "UNZ+1+42",
    ]
    .iter()
    .map(|s| format!("{}'\r\n", s))
    .collect()
}

/// Messages without an interchange envelope.
pub fn edifact_bare() -> String {
    "UNH+1+ORDERS:D:96A:UN'BGM+220+A'UNT+3+1'UNH+2+ORDERS:D:96A:UN'BGM+220+B'UNT+3+2'".to_string()
}

/// Ten payload bytes, including `*` and `~`.
pub const BINARY_PAYLOAD: &[u8] = b"AB*CD~EF:G";

/// An X12 transaction with a `BIN` segment carrying [`BINARY_PAYLOAD`].
pub fn x12_with_binary() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(ISA.as_bytes());
    out.extend_from_slice(b"GS*PO*SENDER*RECEIVER*20250101*1200*1*X*005010~ST*850*0001~BEG*00*SA*PO1**20250101~BIN*10*");
    out.extend_from_slice(BINARY_PAYLOAD);
    out.extend_from_slice(b"~SE*4*0001~GE*1*1~IEA*1*000000001~");
    out
}

/// An EDIFACT message with a `UNO` ... `UNP` object carrying [`BINARY_PAYLOAD`].
pub fn edifact_with_binary() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"UNA:+.? 'UNB+UNOA:4+S+R+250101:1200+9'UNH+1+ORDERS:D:96A:UN'BGM+220+A'UNO+OBJ1+10'");
    out.extend_from_slice(BINARY_PAYLOAD);
    out.extend_from_slice(b"UNP+10+OBJ1'UNT+5+1'UNZ+1+9'");
    out
}

/// Two X12 interchanges back to back.
pub fn two_interchanges() -> String {
    let second = minimal_x12()
        .replace("000000001", "000000002")
        .replace("ST*850*0001", "ST*850*0007")
        .replace("SE*4*0001", "SE*4*0007");
    format!("{}\r\n{}", minimal_x12(), second)
}

/// [`minimal_x12`] with wrong SE, GE and IEA trailers.
pub fn x12_bad_trailers() -> String {
    minimal_x12()
        .replace("SE*4*0001", "SE*9*0001")
        .replace("GE*1*1", "GE*1*2")
        .replace("IEA*1*000000001", "IEA*3*000000001")
}
