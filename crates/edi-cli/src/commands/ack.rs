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

//! Ack command - write acknowledgments

use super::{build_parser, read_input, write_output, DiscardSink};
use crate::error::CliError;
use edi_ack::{Acknowledgments, ContrlAcknowledgment, X12AckKind, X12Acknowledgment};
use edi_core::ParserConfig;

/// Write one acknowledgment per interchange in `file`.
///
/// When parsing fails inside an interchange, the rejection written for it
/// is still output before the error is returned.
pub fn ack(
    file: &str,
    output: Option<&str>,
    config: &ParserConfig,
    kind: X12AckKind,
    control: u32,
    lenient: bool,
) -> Result<(), CliError> {
    let input = read_input(file)?;
    let mut acks = Acknowledgments::from_parts(
        X12Acknowledgment::new(config)
            .with_kind(kind)
            .with_control(control),
        ContrlAcknowledgment::new(config).with_control(control),
    );

    let result =
        build_parser(config, lenient).parse_with_ack(&input[..], &mut DiscardSink, &mut acks);
    let written = acks.into_acknowledgments();
    if !written.is_empty() {
        let mut content = written.join("\n");
        content.push('\n');
        write_output(&content, output)?;
    }

    result?;
    if written.is_empty() {
        return Err(CliError::invalid_input("no interchange envelope to acknowledge"));
    }
    Ok(())
}
