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

//! The parser driver.
//!
//! [`EdiParser`] sniffs each interchange in a stream, installs its syntax
//! on the lexer and runs the matching envelope state machine. Concatenated
//! interchanges, of any mix of standards, are emitted under one root node.

use crate::ack::{AckHandler, NoAck};
use crate::dialect::{Dialect, DialectRegistry};
use crate::envelope::{edifact, x12, Session};
use crate::event::{names, Attributes, EventSink};
use crate::recovery::{RecoveryPolicy, StrictPolicy};
use crate::sniff::{leading_len, sniff_with, LOOKAHEAD};
use edi_core::{EdiError, EdiResult, Lexer, ParserConfig, SyntaxProfile, TokenSource};
use edi_loops::PluginRegistry;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Counts for a completed parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseSummary {
    pub interchanges: usize,
    pub groups: usize,
    pub documents: usize,
    /// Segments in the stream, envelope segments included.
    pub segments: usize,
    /// Faults accepted by the recovery policy.
    pub recovered: usize,
}

/// Streaming EDI parser.
///
/// # Examples
///
/// ```rust
/// use edi_stream::{names, CollectingSink, EdiParser};
///
/// let input = "UNB+UNOA:3+SENDER+RECEIVER+250101:1200+1'\
///              UNH+1+ORDERS:D:96A:UN'BGM+220+PO1'UNT+3+1'\
///              UNZ+1+1'";
///
/// let mut sink = CollectingSink::new();
/// let summary = EdiParser::new().parse(input.as_bytes(), &mut sink).unwrap();
///
/// assert_eq!(summary.documents, 1);
/// assert_eq!(sink.count_starts(names::TRANSACTION), 1);
/// ```
#[derive(Clone)]
pub struct EdiParser {
    config: ParserConfig,
    policy: Arc<dyn RecoveryPolicy + Send + Sync>,
    registry: Option<Arc<PluginRegistry>>,
    dialects: DialectRegistry,
}

impl EdiParser {
    /// Parser with default configuration, strict recovery and the
    /// built-in loop rules.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            policy: Arc::new(StrictPolicy),
            registry: None,
            dialects: DialectRegistry::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Recovery policy for structural faults.
    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: RecoveryPolicy + Send + Sync + 'static,
    {
        self.policy = Arc::new(policy);
        self
    }

    /// Loop rules to use instead of [`PluginRegistry::global`].
    pub fn with_registry(mut self, registry: Arc<PluginRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Leading-tag table for dialect selection.
    pub fn with_dialects(mut self, dialects: DialectRegistry) -> Self {
        self.dialects = dialects;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse every interchange in `reader` into `sink`.
    pub fn parse<R, S>(&self, reader: R, sink: &mut S) -> EdiResult<ParseSummary>
    where
        R: Read,
        S: EventSink + ?Sized,
    {
        self.parse_with_ack(reader, sink, &mut NoAck)
    }

    /// Parse, reporting envelope boundaries to `ack`.
    ///
    /// A fatal error inside an interchange whose header was read is
    /// reported to [`AckHandler::negative`] before it is returned.
    pub fn parse_with_ack<R, S, A>(
        &self,
        reader: R,
        sink: &mut S,
        ack: &mut A,
    ) -> EdiResult<ParseSummary>
    where
        R: Read,
        S: EventSink + ?Sized,
        A: AckHandler,
    {
        let mut lexer = Lexer::with_config(reader, SyntaxProfile::x12_default(), &self.config);
        let registry = match &self.registry {
            Some(registry) => registry.as_ref(),
            None => PluginRegistry::global(),
        };
        let mut session = Session {
            tokens: &mut lexer,
            sink,
            policy: &*self.policy,
            ack,
            config: &self.config,
            registry,
            summary: ParseSummary::default(),
            header_open: false,
        };

        let result = self.run(&mut session);
        if let Err(err) = &result {
            if session.header_open {
                session.ack.negative(err);
            }
            debug!(error = %err, "parse failed");
        }
        result?;

        session.summary.segments = session.tokens.segment_count();
        Ok(session.summary)
    }

    fn run<T, S>(&self, session: &mut Session<'_, T, S>) -> EdiResult<()>
    where
        T: TokenSource + ?Sized,
        S: EventSink + ?Sized,
    {
        session.sink.start_node(names::ROOT, &Attributes::new())?;
        let mut parsed = 0usize;
        loop {
            let lookahead = session.tokens.lookahead(LOOKAHEAD)?;
            if lookahead.is_empty() {
                break;
            }
            let leading = leading_len(&lookahead);
            if leading > 0 {
                session.tokens.get_chars(leading)?;
                continue;
            }

            let sniffed = sniff_with(&self.dialects, &lookahead)?;
            debug!(
                dialect = ?sniffed.dialect,
                delimiter = %edi_core::char_label(sniffed.profile.delimiter),
                terminator = %edi_core::char_label(sniffed.profile.terminator),
                encoding = sniffed.profile.encoding.label(),
                "syntax sniffed"
            );
            session.tokens.set_syntax(sniffed.profile.clone());
            match sniffed.dialect {
                Dialect::X12 => x12::interchange(session, &sniffed)?,
                Dialect::Edifact => edifact::interchange(session, &sniffed)?,
                Dialect::EdifactBare => edifact::bare(session, &sniffed)?,
            }
            parsed += 1;
        }

        if parsed == 0 {
            return Err(EdiError::Sniff("no EDI data found".to_string()));
        }
        session.sink.end_node(names::ROOT)
    }
}

impl Default for EdiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EdiParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdiParser")
            .field("config", &self.config)
            .field("custom_registry", &self.registry.is_some())
            .finish_non_exhaustive()
    }
}
