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

//! quick-xml backed event sink

use edi_core::{EdiError, EdiResult, ParserConfig};
use edi_stream::{Attributes, EventSink};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::trace;

/// Namespace bound to the `edi` prefix when namespaces are enabled.
pub const EDI_NAMESPACE: &str = "urn:dweve:edi";

const PREFIX: &str = "edi";

/// Configuration for XML output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlConfig {
    /// Indent nested elements
    pub pretty: bool,
    /// Spaces per level when pretty
    pub indent: usize,
    /// Write the `<?xml ...?>` declaration
    pub declaration: bool,
    /// Qualify every element with the `edi` prefix
    pub namespace: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            declaration: true,
            namespace: false,
        }
    }
}

impl XmlConfig {
    /// No declaration, no indentation.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            declaration: false,
            ..Self::default()
        }
    }

    /// Defaults with the parser's `namespace_enabled` option applied.
    pub fn from_parser(config: &ParserConfig) -> Self {
        Self {
            namespace: config.namespace_enabled,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_namespace(mut self, namespace: bool) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Writes parser events as XML.
///
/// A node with no children is written as an empty element. Repeated
/// attribute keys keep their first value, since XML forbids duplicates.
pub struct XmlSink<W: Write> {
    writer: Writer<W>,
    config: XmlConfig,
    open: Vec<String>,
    pending: Option<BytesStart<'static>>,
    started: bool,
}

impl<W: Write> XmlSink<W> {
    pub fn new(inner: W, config: XmlConfig) -> Self {
        let writer = if config.pretty {
            Writer::new_with_indent(inner, b' ', config.indent)
        } else {
            Writer::new(inner)
        };
        Self {
            writer,
            config,
            open: Vec::new(),
            pending: None,
            started: false,
        }
    }

    /// Elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Flush and return the underlying writer.
    ///
    /// Fails if an element is still open.
    pub fn finish(mut self) -> EdiResult<W> {
        self.flush_pending()?;
        if let Some(name) = self.open.last() {
            return Err(EdiError::Sink(format!("element <{}> not closed", name)));
        }
        let mut inner = self.writer.into_inner();
        inner.flush()?;
        Ok(inner)
    }

    fn qualified(&self, name: &str) -> String {
        if self.config.namespace {
            format!("{}:{}", PREFIX, name)
        } else {
            name.to_string()
        }
    }

    fn write(&mut self, event: Event<'_>) -> EdiResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| EdiError::Sink(format!("XML write failed: {}", e)))
    }

    fn flush_pending(&mut self) -> EdiResult<()> {
        if let Some(start) = self.pending.take() {
            self.write(Event::Start(start))?;
        }
        Ok(())
    }
}

impl<W: Write> EventSink for XmlSink<W> {
    fn start_node(&mut self, name: &str, attributes: &Attributes) -> EdiResult<()> {
        self.flush_pending()?;
        if !self.started {
            self.started = true;
            if self.config.declaration {
                self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
            }
        }

        let qualified = self.qualified(name);
        let mut start = BytesStart::new(qualified.clone());
        if self.open.is_empty() && self.config.namespace {
            start.push_attribute(("xmlns:edi", EDI_NAMESPACE));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(attributes.len());
        for (key, value) in attributes.iter() {
            if seen.contains(&key) {
                trace!(element = name, attribute = key, "dropping repeated attribute");
                continue;
            }
            seen.push(key);
            start.push_attribute((key, value));
        }

        self.open.push(qualified);
        self.pending = Some(start);
        Ok(())
    }

    fn end_node(&mut self, name: &str) -> EdiResult<()> {
        let qualified = self.qualified(name);
        match self.open.pop() {
            Some(open) if open == qualified => {}
            Some(open) => {
                return Err(EdiError::Sink(format!(
                    "end of <{}> while <{}> is open",
                    qualified, open
                )))
            }
            None => {
                return Err(EdiError::Sink(format!(
                    "end of <{}> with no open element",
                    qualified
                )))
            }
        }

        match self.pending.take() {
            Some(start) => self.write(Event::Empty(start)),
            None => self.write(Event::End(BytesEnd::new(qualified))),
        }
    }

    fn text(&mut self, text: &str) -> EdiResult<()> {
        self.flush_pending()?;
        self.write(Event::Text(BytesText::new(text)))
    }
}
