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

//! Events command - dump the event stream

use super::{build_parser, read_input, write_output};
use crate::error::CliError;
use edi_core::ParserConfig;
use edi_stream::{CollectingSink, NodeEvent};
use serde_json::json;

/// Write the events of `file` as an indented outline, or as JSON with the
/// parse summary.
pub fn events(
    file: &str,
    output: Option<&str>,
    json: bool,
    config: &ParserConfig,
    lenient: bool,
) -> Result<(), CliError> {
    let input = read_input(file)?;
    let mut sink = CollectingSink::new();
    let summary = build_parser(config, lenient).parse(&input[..], &mut sink)?;

    let content = if json {
        let document = json!({
            "summary": summary,
            "events": sink.events,
        });
        let mut text = serde_json::to_string_pretty(&document)?;
        text.push('\n');
        text
    } else {
        outline(&sink.events)
    };
    write_output(&content, output)
}

fn outline(events: &[NodeEvent]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in events {
        match event {
            NodeEvent::Start { name, attributes } => {
                out.push_str(&"  ".repeat(depth));
                out.push_str(name);
                for (key, value) in attributes.iter() {
                    out.push_str(&format!(" {}={:?}", key, value));
                }
                out.push('\n');
                depth += 1;
            }
            NodeEvent::End { .. } => depth = depth.saturating_sub(1),
            NodeEvent::Text { text } => {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&format!("{:?}\n", text));
            }
        }
    }
    out
}
