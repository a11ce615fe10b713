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

//! Envelope state machines.
//!
//! Each standard is a recursive walk over interchange, group, document and
//! segment. The walk pulls tokens from a [`TokenSource`], emits nodes to an
//! [`EventSink`], routes trailer mismatches through the recovery policy and
//! reports envelope boundaries to the [`AckHandler`].

pub mod edifact;
pub mod segment;
pub mod x12;

use crate::ack::AckHandler;
use crate::context::{EnvelopeContext, Party};
use crate::event::{names, Attributes, EventSink};
use crate::parser::ParseSummary;
use crate::recovery::RecoveryPolicy;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edi_core::{
    char_label, EdiError, EdiResult, ParserConfig, RecoverableFault, Standard, Token, TokenSource,
};
use edi_loops::{LoopEngine, PluginRegistry};
use segment::{emit_segment, read_segment, Segment};
use tracing::debug;

/// Everything one parse threads through the envelope walk.
pub(crate) struct Session<'a, T: ?Sized, S: ?Sized> {
    pub tokens: &'a mut T,
    pub sink: &'a mut S,
    pub policy: &'a dyn RecoveryPolicy,
    pub ack: &'a mut dyn AckHandler,
    pub config: &'a ParserConfig,
    pub registry: &'a PluginRegistry,
    pub summary: ParseSummary,
    /// An interchange header was reported and its trailer not yet seen.
    pub header_open: bool,
}

impl<'a, T, S> Session<'a, T, S>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    pub fn position(&self) -> usize {
        self.tokens.segment_count()
    }

    /// Next segment tag, or `None` at end of data.
    pub fn next_tag_or_end(&mut self, expected: &str) -> EdiResult<Option<String>> {
        match self.tokens.next_token()? {
            Token::SegmentStart(tag) => Ok(Some(tag)),
            Token::EndOfData => Ok(None),
            other => Err(EdiError::unexpected_token(
                self.position(),
                expected,
                other.to_string(),
            )),
        }
    }

    /// Next segment tag; end of data is an error.
    pub fn next_tag(&mut self, expected: &str) -> EdiResult<String> {
        match self.next_tag_or_end(expected)? {
            Some(tag) => Ok(tag),
            None => Err(EdiError::unexpected_end(
                self.position(),
                format!("expected {}", expected),
            )),
        }
    }

    pub fn read(&mut self, tag: &str) -> EdiResult<Segment> {
        read_segment(&mut *self.tokens, tag)
    }

    pub fn emit(&mut self, segment: &Segment) -> EdiResult<()> {
        emit_segment(&mut *self.sink, segment, self.config)
    }

    /// Append syntax character attributes when configured.
    pub fn syntax_attributes(&self, attrs: &mut Attributes) {
        if !self.config.include_syntax_characters {
            return;
        }
        let syntax = self.tokens.syntax();
        attrs.push("ElementDelimiter", char_label(syntax.delimiter));
        attrs.push("SubElementDelimiter", char_label(syntax.sub_delimiter));
        attrs.push("SegmentTerminator", char_label(syntax.terminator));
        if let Some(repetition) = syntax.repetition {
            attrs.push("RepetitionSeparator", char_label(repetition));
        }
        if let Some(release) = syntax.release {
            attrs.push("ReleaseCharacter", char_label(release));
        }
        attrs.push("DecimalMark", char_label(syntax.decimal_mark));
    }

    /// Emit a `sender` or `receiver` node wrapping its address.
    pub fn emit_party(&mut self, node: &str, party: &Party) -> EdiResult<()> {
        self.sink.start_node(node, &Attributes::new())?;
        let mut attrs = Attributes::new().with("Id", &party.id);
        attrs.push_nonempty("Qual", &party.qualifier);
        self.sink.start_node(names::ADDRESS, &attrs)?;
        self.sink.end_node(names::ADDRESS)?;
        self.sink.end_node(node)
    }

    /// Emit raw payload bytes as base64 text.
    pub fn emit_binary(&mut self, mut attrs: Attributes, data: &[u8]) -> EdiResult<()> {
        attrs.push("Length", data.len().to_string());
        attrs.push("Encoding", "base64");
        self.sink.start_node(names::BINARY, &attrs)?;
        self.sink.text(&STANDARD.encode(data))?;
        self.sink.end_node(names::BINARY)
    }

    /// Loop engine for a document, using its plugin table when registered.
    pub fn loop_engine(&self, standard: Standard, document: &str, version: &str) -> LoopEngine {
        let version = (!version.is_empty()).then_some(version);
        let table = self.registry.lookup(standard, document, version);
        debug!(
            standard = %standard,
            document,
            version = version.unwrap_or(""),
            plugin = table.as_ref().map(|t| t.name()).unwrap_or("none"),
            "document loop rules"
        );
        LoopEngine::new(table)
    }

    /// Run the loop engine for `tag` and emit the loop boundaries it reports.
    pub fn apply_loops(&mut self, engine: &mut LoopEngine, tag: &str) -> EdiResult<()> {
        if let Some(transition) = engine.transition(tag)? {
            for _ in &transition.closed {
                self.sink.end_node(names::LOOP)?;
            }
            if let Some(name) = &transition.opened {
                self.sink
                    .start_node(names::LOOP, &Attributes::new().with("Name", name))?;
            }
        }
        Ok(())
    }

    /// Close every loop still open at document end.
    pub fn close_loops(&mut self, engine: &mut LoopEngine) -> EdiResult<()> {
        for _ in engine.finish() {
            self.sink.end_node(names::LOOP)?;
        }
        Ok(())
    }

    /// Read, loop-detect and emit one data segment.
    pub fn data_segment(&mut self, engine: &mut LoopEngine, tag: &str) -> EdiResult<()> {
        let segment = self.read(tag)?;
        self.apply_loops(engine, tag)?;
        self.emit(&segment)
    }

    /// Check trailer element `field` of `segment` against an observed count.
    pub fn check_count(
        &mut self,
        ctx: &mut EnvelopeContext,
        segment: &Segment,
        field: usize,
        observed: usize,
    ) -> EdiResult<()> {
        let declared = segment.value(field).trim();
        let fault = if declared.is_empty() {
            RecoverableFault::missing_element(
                &segment.tag,
                field,
                &observed.to_string(),
                segment.position,
            )
        } else if declared.parse::<usize>().ok() != Some(observed) {
            RecoverableFault::count_mismatch(&segment.tag, field, observed, declared, segment.position)
        } else {
            return Ok(());
        };
        ctx.recover(self.policy, fault).map(|_| ())
    }

    /// Check trailer element `field` of `segment` echoes `header`.
    pub fn check_control(
        &mut self,
        ctx: &mut EnvelopeContext,
        segment: &Segment,
        field: usize,
        header: &str,
    ) -> EdiResult<()> {
        let header = header.trim();
        let trailer = segment.value(field).trim();
        let fault = if trailer.is_empty() {
            RecoverableFault::missing_element(&segment.tag, field, header, segment.position)
        } else if trailer != header {
            RecoverableFault::control_mismatch(&segment.tag, field, header, trailer, segment.position)
        } else {
            return Ok(());
        };
        ctx.recover(self.policy, fault).map(|_| ())
    }

    /// Report an opened interchange.
    pub fn interchange_opened(&mut self, ctx: &EnvelopeContext) {
        let syntax = self.tokens.syntax().clone();
        self.ack.interchange_start(&ctx.interchange, &syntax);
        self.header_open = true;
        debug!(
            standard = %ctx.interchange.standard,
            control = %ctx.interchange.control,
            sender = %ctx.interchange.sender.id,
            receiver = %ctx.interchange.receiver.id,
            "interchange start"
        );
    }

    /// Report a closed interchange and fold its counts into the summary.
    pub fn interchange_closed(&mut self, ctx: &EnvelopeContext) {
        self.ack.interchange_end(&ctx.interchange, ctx.group_count);
        self.header_open = false;
        self.summary.interchanges += 1;
        self.summary.recovered += ctx.faults.len();
        debug!(
            control = %ctx.interchange.control,
            groups = ctx.group_count,
            recovered = ctx.faults.len(),
            "interchange end"
        );
    }
}

/// Tags that only appear in envelope headers and trailers.
pub(crate) fn is_envelope_tag(tag: &str) -> bool {
    matches!(
        tag,
        "ISA" | "IEA" | "GS" | "GE" | "ST" | "UNA" | "UNB" | "UNZ" | "UNG" | "UNE" | "UNH"
    )
}
