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

//! Conversion commands

use super::{build_parser, read_input, write_output};
use crate::error::CliError;
use edi_core::ParserConfig;
use edi_xml::XmlConfig;

/// Convert `file` to XML.
///
/// Pretty output with a declaration unless `compact`; the namespace follows
/// `config.namespace_enabled`.
pub fn to_xml(
    file: &str,
    output: Option<&str>,
    config: &ParserConfig,
    compact: bool,
    lenient: bool,
) -> Result<(), CliError> {
    let input = read_input(file)?;
    let xml_config = if compact {
        XmlConfig::compact().with_namespace(config.namespace_enabled)
    } else {
        XmlConfig::from_parser(config)
    };
    let mut xml = edi_xml::to_xml(&build_parser(config, lenient), &input[..], &xml_config)?;
    xml.push('\n');
    write_output(&xml, output)
}
