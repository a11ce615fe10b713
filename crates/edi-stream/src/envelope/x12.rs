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

//! ANSI X12: `ISA` / `GS` / `ST` ... `SE` / `GE` / `IEA`.

use super::{is_envelope_tag, Session};
use crate::context::{
    date_length_for, DocumentSummary, EnvelopeContext, GroupHeader, InterchangeHeader, Party,
};
use crate::event::{names, Attributes, EventSink};
use crate::sniff::SniffResult;
use edi_core::{EdiError, EdiResult, RecoverableFault, Standard, Token, TokenSource};
use edi_loops::LoopEngine;
use tracing::debug;

/// Widths of ISA01 through ISA16.
pub const ISA_WIDTHS: [usize; 16] = [2, 10, 2, 10, 2, 15, 2, 15, 6, 4, 1, 5, 9, 1, 1, 1];

/// Parse one interchange; the lexer is positioned at `ISA`.
pub(crate) fn interchange<T, S>(session: &mut Session<'_, T, S>, sniffed: &SniffResult) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let raw = session.tokens.raw_segment(sniffed.first_segment.len())?;
    let position = session.position();
    let syntax = session.tokens.syntax().clone();
    let body = raw.strip_suffix(&[syntax.terminator]).unwrap_or(&raw[..]);

    let mut fields: Vec<String> = body
        .split(|&b| b == syntax.delimiter)
        .skip(1)
        .map(|f| syntax.encoding.decode(f))
        .collect();
    fields.resize(ISA_WIDTHS.len(), String::new());

    let mut ctx = EnvelopeContext::new(InterchangeHeader::empty(Standard::X12));
    for (i, &width) in ISA_WIDTHS.iter().enumerate() {
        if fields[i].chars().count() != width {
            let fault = RecoverableFault::field_length("ISA", i + 1, width, &fields[i], position);
            fields[i] = ctx.recover(session.policy, fault)?;
        }
    }

    ctx.interchange = InterchangeHeader {
        standard: Standard::X12,
        sender: Party::new(fields[5].trim(), fields[4].trim()),
        receiver: Party::new(fields[7].trim(), fields[6].trim()),
        date: fields[8].clone(),
        time: fields[9].clone(),
        control: fields[12].trim().to_string(),
        version: fields[11].clone(),
        syntax_identifier: None,
        ack_requested: fields[13] == "1",
        test_indicator: fields[14].clone(),
        elements: fields.clone(),
    };

    let mut attrs = Attributes::new()
        .with("Standard", Standard::X12.name())
        .with("AuthorizationQual", &fields[0])
        .with("Authorization", fields[1].trim())
        .with("SecurityQual", &fields[2])
        .with("Security", fields[3].trim())
        .with("Date", &fields[8])
        .with("Time", &fields[9]);
    if syntax.repetition.is_none() {
        attrs.push("StandardsId", &fields[10]);
    }
    attrs.push("Version", &fields[11]);
    attrs.push("Control", &fields[12]);
    attrs.push("AckRequest", &fields[13]);
    attrs.push("TestIndicator", &fields[14]);
    session.syntax_attributes(&mut attrs);

    session.sink.start_node(names::INTERCHANGE, &attrs)?;
    session.emit_party(names::SENDER, &ctx.interchange.sender)?;
    session.emit_party(names::RECEIVER, &ctx.interchange.receiver)?;
    session.interchange_opened(&ctx);

    loop {
        let tag = session.next_tag("GS or IEA")?;
        match tag.as_str() {
            "GS" => group(session, &mut ctx)?,
            "TA1" => {
                let segment = session.read(&tag)?;
                session.emit(&segment)?;
            }
            "IEA" => {
                let segment = session.read(&tag)?;
                let groups = ctx.group_count;
                let control = ctx.interchange.control.clone();
                session.check_count(&mut ctx, &segment, 1, groups)?;
                session.check_control(&mut ctx, &segment, 2, &control)?;
                break;
            }
            _ => {
                return Err(EdiError::unexpected_segment(
                    session.position(),
                    tag,
                    "expected GS or IEA",
                ))
            }
        }
    }

    session.sink.end_node(names::INTERCHANGE)?;
    session.interchange_closed(&ctx);
    Ok(())
}

fn group<T, S>(session: &mut Session<'_, T, S>, ctx: &mut EnvelopeContext) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let segment = session.read("GS")?;
    let mut header = GroupHeader {
        functional_id: segment.value(1).to_string(),
        sender: segment.value(2).trim().to_string(),
        receiver: segment.value(3).trim().to_string(),
        date: segment.value(4).to_string(),
        time: segment.value(5).to_string(),
        control: segment.value(6).trim().to_string(),
        agency: segment.value(7).to_string(),
        version: segment.value(8).to_string(),
    };
    let date_length = date_length_for(&header.version);
    if !header.date.is_empty() && header.date.chars().count() != date_length {
        let fault =
            RecoverableFault::field_length("GS", 4, date_length, &header.date, segment.position);
        header.date = ctx.recover(session.policy, fault)?;
    }
    ctx.open_group(header.clone());

    let attrs = Attributes::new()
        .with("GroupType", &header.functional_id)
        .with("ApplSender", &header.sender)
        .with("ApplReceiver", &header.receiver)
        .with("Date", &header.date)
        .with("Time", &header.time)
        .with("Control", &header.control)
        .with("StandardCode", &header.agency)
        .with("StandardVersion", &header.version);
    session.sink.start_node(names::GROUP, &attrs)?;
    session.ack.group_start(&header);
    debug!(group = %header.functional_id, control = %header.control, version = %header.version, "group start");

    loop {
        let tag = session.next_tag("ST or GE")?;
        match tag.as_str() {
            "ST" => transaction(session, ctx)?,
            "GE" => {
                let trailer = session.read(&tag)?;
                let documents = ctx.document_count;
                session.check_count(ctx, &trailer, 1, documents)?;
                session.check_control(ctx, &trailer, 2, &header.control)?;
                break;
            }
            _ => {
                return Err(EdiError::unexpected_segment(
                    session.position(),
                    tag,
                    "expected ST or GE",
                ))
            }
        }
    }

    session.sink.end_node(names::GROUP)?;
    session.ack.group_end(&header, ctx.document_count);
    session.summary.groups += 1;
    ctx.close_group();
    Ok(())
}

fn transaction<T, S>(session: &mut Session<'_, T, S>, ctx: &mut EnvelopeContext) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let header = session.read("ST")?;
    ctx.open_document();
    let code = header.value(1).trim().to_string();
    let control = header.value(2).trim().to_string();
    let convention = header.value(3).trim().to_string();
    let version = if convention.is_empty() {
        ctx.group_version.clone()
    } else {
        convention.clone()
    };

    let mut attrs = Attributes::new()
        .with("Code", &code)
        .with("Control", &control);
    attrs.push_nonempty("ImplementationConventionRef", &convention);
    session.sink.start_node(names::TRANSACTION, &attrs)?;

    let mut engine = session.loop_engine(Standard::X12, &code, &version);
    loop {
        let tag = session.next_tag("segment or SE")?;
        match tag.as_str() {
            "SE" => {
                let trailer = session.read(&tag)?;
                ctx.segment_count += 1;
                let segments = ctx.segment_count;
                session.check_count(ctx, &trailer, 1, segments)?;
                session.check_control(ctx, &trailer, 2, &control)?;
                break;
            }
            "BIN" => {
                ctx.segment_count += 1;
                binary(session, &mut engine)?;
            }
            _ if is_envelope_tag(&tag) => {
                return Err(EdiError::unexpected_segment(
                    session.position(),
                    tag,
                    format!("transaction {} not closed by SE", control),
                ))
            }
            _ => {
                ctx.segment_count += 1;
                session.data_segment(&mut engine, &tag)?;
            }
        }
    }

    session.close_loops(&mut engine)?;
    session.sink.end_node(names::TRANSACTION)?;

    let summary = DocumentSummary {
        doc_type: code,
        control,
        version: (!version.is_empty()).then_some(version),
        reference: if convention.is_empty() {
            Vec::new()
        } else {
            vec![convention]
        },
        segment_count: ctx.segment_count,
        faults: ctx.document_faults().to_vec(),
    };
    session.ack.document_end(&summary);
    session.summary.documents += 1;
    Ok(())
}

/// `BIN*length*data~`: the payload is read raw, so it may contain any byte.
fn binary<T, S>(session: &mut Session<'_, T, S>, engine: &mut LoopEngine) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let position = session.position();
    let length_text = match session.tokens.next_token()? {
        Token::Simple(value) => value,
        Token::Empty | Token::SegmentEnd | Token::EndOfData => String::new(),
        other => other.to_string(),
    };
    let length: usize = length_text
        .trim()
        .parse()
        .map_err(|_| EdiError::BinaryLength {
            segment: position,
            value: length_text.clone(),
        })?;
    let data = session.tokens.get_chars(length)?;
    match session.tokens.next_token()? {
        Token::SegmentEnd | Token::EndOfData => {}
        other => {
            return Err(EdiError::unexpected_token(
                position,
                "segment end after binary data",
                other.to_string(),
            ))
        }
    }

    session.apply_loops(engine, "BIN")?;
    session
        .sink
        .start_node(names::SEGMENT, &Attributes::new().with("Id", "BIN"))?;
    session
        .sink
        .start_node(names::ELEMENT, &Attributes::new().with("Id", "BIN01"))?;
    session.sink.text(length_text.trim())?;
    session.sink.end_node(names::ELEMENT)?;
    session.emit_binary(Attributes::new().with("Id", "BIN02"), &data)?;
    session.sink.end_node(names::SEGMENT)
}
