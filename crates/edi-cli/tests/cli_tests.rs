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

//! CLI integration tests

use assert_cmd::Command;
use edi_test::fixtures;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

fn edi_cmd() -> Command {
    Command::cargo_bin("edi").expect("Failed to find edi binary")
}

fn create_temp_file(content: &[u8], suffix: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write temp file");
    file
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().expect("temp path is UTF-8")
}

// ==================== Help ====================

#[test]
fn test_help_output() {
    edi_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EDI - streaming X12 and EDIFACT toolkit"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_subcommand_fails() {
    edi_cmd().assert().failure();
}

#[test]
fn test_missing_file_fails() {
    edi_cmd()
        .args(["validate", "/nonexistent/input.edi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ==================== Validate ====================

#[test]
fn test_validate_x12() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["validate", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interchanges: 1"))
        .stdout(predicate::str::contains("Documents: 1"))
        .stdout(predicate::str::contains("Segments: 8"))
        .stdout(predicate::str::contains("Recovered: 0"));
}

#[test]
fn test_validate_edifact_grouped() {
    let file = create_temp_file(fixtures::edifact_grouped().as_bytes(), ".edi");
    edi_cmd()
        .args(["validate", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groups: 1"))
        .stdout(predicate::str::contains("Documents: 2"));
}

#[test]
fn test_validate_bad_trailers_strict_fails() {
    let file = create_temp_file(fixtures::x12_bad_trailers().as_bytes(), ".edi");
    edi_cmd()
        .args(["validate", path(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count mismatch in SE01"));
}

#[test]
fn test_validate_bad_trailers_lenient_warns() {
    let file = create_temp_file(fixtures::x12_bad_trailers().as_bytes(), ".edi");
    edi_cmd()
        .args(["validate", "--lenient", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovered: 3"))
        .stdout(predicate::str::contains("count mismatch in SE01"))
        .stdout(predicate::str::contains("control number mismatch in GE02"))
        .stdout(predicate::str::contains("count mismatch in IEA01"));
}

#[test]
fn test_validate_reads_stdin() {
    edi_cmd()
        .args(["validate", "-"])
        .write_stdin(fixtures::minimal_x12())
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents: 1"));
}

#[test]
fn test_max_file_size_enforced() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .env("EDI_MAX_FILE_SIZE", "16")
        .args(["validate", path(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("EDI_MAX_FILE_SIZE"));
}

// ==================== Sniff ====================

#[test]
fn test_sniff_x12() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["sniff", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dialect: X12"))
        .stdout(predicate::str::contains("Standard: ANSI X12"))
        .stdout(predicate::str::contains("Element delimiter: *"))
        .stdout(predicate::str::contains("Repetition separator: ^"))
        .stdout(predicate::str::contains("Release character: none"));
}

#[test]
fn test_sniff_edifact_with_una() {
    let file = create_temp_file(fixtures::edifact_with_una().as_bytes(), ".edi");
    edi_cmd()
        .args(["sniff", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard: EDIFACT"))
        .stdout(predicate::str::contains("Syntax identifier: UNOA"))
        .stdout(predicate::str::contains("Release character: ?"))
        .stdout(predicate::str::contains("Segment terminator: '"));
}

#[test]
fn test_sniff_rejects_unknown_input() {
    let file = create_temp_file(b"hello world, this is not an interchange", ".txt");
    edi_cmd()
        .args(["sniff", path(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ==================== Events ====================

#[test]
fn test_events_outline() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["events", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ediroot"))
        .stdout(predicate::str::contains("segment Id=\"BEG\""))
        .stdout(predicate::str::contains("\"PO123\""));
}

#[test]
fn test_events_json() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    let output = edi_cmd()
        .args(["events", "--json", path(&file)])
        .output()
        .expect("run edi");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["documents"], 1);
    assert_eq!(value["summary"]["segments"], 8);
    assert_eq!(value["events"][0]["event"], "start");
    assert_eq!(value["events"][0]["name"], "ediroot");
}

// ==================== To XML ====================

#[test]
fn test_to_xml_compact() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["to-xml", "--compact", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<ediroot>"))
        .stdout(predicate::str::contains("<?xml").not());
}

#[test]
fn test_to_xml_pretty_with_namespace() {
    let file = create_temp_file(fixtures::edifact_with_una().as_bytes(), ".edi");
    edi_cmd()
        .args(["to-xml", "--namespace", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("urn:dweve:edi"));
}

#[test]
fn test_to_xml_output_file() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    let out = tempfile::Builder::new().suffix(".xml").tempfile().unwrap();

    edi_cmd()
        .args(["to-xml", path(&file), "-o", path(&out)])
        .assert()
        .success();

    let xml = fs::read_to_string(out.path()).unwrap();
    assert!(xml.contains("<transaction"));
    assert!(xml.trim_end().ends_with("</ediroot>"));
}

#[test]
fn test_config_file_applies() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    let config = create_temp_file(br#"{"namespace_enabled": true}"#, ".json");
    edi_cmd()
        .args(["to-xml", "--config", path(&config), path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("urn:dweve:edi"));
}

#[test]
fn test_invalid_config_file_fails() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    let config = create_temp_file(b"{not json", ".json");
    edi_cmd()
        .args(["to-xml", "--config", path(&config), path(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ==================== Ack ====================

#[test]
fn test_ack_x12() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["ack", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ISA*00*"))
        .stdout(predicate::str::contains("ST*997*0001~AK1*PO*1~"))
        .stdout(predicate::str::contains("AK9*A*1*1*1~"));
}

#[test]
fn test_ack_control_number() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["ack", "--control", "5", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("IEA*1*000000005~"));
}

#[test]
fn test_ack_implementation() {
    let file = create_temp_file(fixtures::minimal_x12().as_bytes(), ".edi");
    edi_cmd()
        .args(["ack", "--implementation", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("ST*999*0001"));
}

#[test]
fn test_ack_contrl() {
    let file = create_temp_file(fixtures::edifact_with_una().as_bytes(), ".edi");
    edi_cmd()
        .args(["ack", path(&file)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("UNA"))
        .stdout(predicate::str::contains("UNH+1+CONTRL:D:3:UN'"))
        .stdout(predicate::str::contains("UCI+REF1+SENDER:14+RECEIVER:14+7'"));
}

#[test]
fn test_ack_bare_edifact_fails() {
    let file = create_temp_file(fixtures::edifact_bare().as_bytes(), ".edi");
    edi_cmd()
        .args(["ack", path(&file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no interchange envelope"));
}
