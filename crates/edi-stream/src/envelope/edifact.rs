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

//! UN/EDIFACT: `UNA` / `UNB` / `UNG` / `UNH` ... `UNT` / `UNE` / `UNZ`.
//!
//! Groups are optional. Messages directly under `UNB` form an implicit
//! group that emits no group node. Streams of bare `UNH` ... `UNT`
//! messages without an interchange envelope are parsed by [`bare`].

use super::{is_envelope_tag, Session};
use crate::context::{DocumentSummary, EnvelopeContext, GroupHeader, InterchangeHeader, Party};
use crate::event::{names, Attributes, EventSink};
use crate::sniff::{encoding_for_identifier, SniffResult};
use edi_core::{EdiError, EdiResult, RecoverableFault, Standard, TokenSource};
use edi_loops::LoopEngine;
use tracing::debug;

fn skip_service_advice<T, S>(session: &mut Session<'_, T, S>, sniffed: &SniffResult) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    if let Some(length) = sniffed.una_length {
        session.tokens.raw_segment(length)?;
    }
    Ok(())
}

/// Parse one `UNB` ... `UNZ` interchange.
pub(crate) fn interchange<T, S>(session: &mut Session<'_, T, S>, sniffed: &SniffResult) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    skip_service_advice(session, sniffed)?;
    let tag = session.next_tag("UNB")?;
    if tag != "UNB" {
        return Err(EdiError::unexpected_segment(
            session.position(),
            tag,
            "expected UNB",
        ));
    }
    let unb = session.read(&tag)?;

    let identifier = unb.component(1, 1).to_string();
    if !identifier.is_empty() {
        session
            .tokens
            .set_encoding(encoding_for_identifier(identifier.as_bytes()));
    }

    let mut ctx = EnvelopeContext::new(InterchangeHeader::empty(Standard::Edifact));
    let mut control = unb.value(5).trim().to_string();
    if control.is_empty() {
        let fault = RecoverableFault::missing_element("UNB", 5, "", unb.position);
        control = ctx.recover(session.policy, fault)?;
    }

    ctx.interchange = InterchangeHeader {
        standard: Standard::Edifact,
        sender: Party::new(unb.component(2, 1), unb.component(2, 2)),
        receiver: Party::new(unb.component(3, 1), unb.component(3, 2)),
        date: unb.component(4, 1).to_string(),
        time: unb.component(4, 2).to_string(),
        control: control.clone(),
        version: unb.component(1, 2).to_string(),
        syntax_identifier: (!identifier.is_empty()).then(|| identifier.clone()),
        ack_requested: unb.value(9) == "1",
        test_indicator: unb.value(11).to_string(),
        elements: (1..=unb.elements.len())
            .map(|n| unb.value(n).to_string())
            .collect(),
    };

    let mut attrs = Attributes::new()
        .with("Standard", Standard::Edifact.name())
        .with("SyntaxId", &identifier)
        .with("SyntaxVersion", unb.component(1, 2))
        .with("Date", unb.component(4, 1))
        .with("Time", unb.component(4, 2))
        .with("Control", &control);
    attrs.push_nonempty("RecipientRef", unb.component(6, 1));
    attrs.push_nonempty("ApplRef", unb.value(7));
    attrs.push_nonempty("Priority", unb.value(8));
    attrs.push_nonempty("AckRequest", unb.value(9));
    attrs.push_nonempty("AgreementId", unb.value(10));
    attrs.push_nonempty("TestIndicator", unb.value(11));
    session.syntax_attributes(&mut attrs);

    session.sink.start_node(names::INTERCHANGE, &attrs)?;
    session.emit_party(names::SENDER, &ctx.interchange.sender)?;
    session.emit_party(names::RECEIVER, &ctx.interchange.receiver)?;
    session.interchange_opened(&ctx);

    loop {
        let tag = session.next_tag("UNG, UNH or UNZ")?;
        match tag.as_str() {
            "UNG" => group(session, &mut ctx)?,
            "UNH" => message(session, &mut ctx)?,
            "UNZ" => {
                let trailer = session.read(&tag)?;
                let observed = if ctx.group_count > 0 {
                    ctx.group_count
                } else {
                    ctx.ungrouped_count
                };
                session.check_count(&mut ctx, &trailer, 1, observed)?;
                session.check_control(&mut ctx, &trailer, 2, &control)?;
                break;
            }
            _ => {
                return Err(EdiError::unexpected_segment(
                    session.position(),
                    tag,
                    "expected UNG, UNH or UNZ",
                ))
            }
        }
    }

    session.sink.end_node(names::INTERCHANGE)?;
    session.interchange_closed(&ctx);
    Ok(())
}

/// Parse `UNH` ... `UNT` messages with no interchange envelope until end of data.
pub(crate) fn bare<T, S>(session: &mut Session<'_, T, S>, sniffed: &SniffResult) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    skip_service_advice(session, sniffed)?;
    let mut ctx = EnvelopeContext::new(InterchangeHeader::empty(Standard::Edifact));
    let mut attrs = Attributes::new().with("Standard", Standard::Edifact.name());
    session.syntax_attributes(&mut attrs);
    session.sink.start_node(names::INTERCHANGE, &attrs)?;

    while let Some(tag) = session.next_tag_or_end("UNH")? {
        if tag != "UNH" {
            return Err(EdiError::unexpected_segment(
                session.position(),
                tag,
                "expected UNH",
            ));
        }
        message(session, &mut ctx)?;
    }

    session.sink.end_node(names::INTERCHANGE)?;
    session.summary.interchanges += 1;
    session.summary.recovered += ctx.faults.len();
    debug!(messages = ctx.ungrouped_count, "messages without interchange envelope");
    Ok(())
}

fn group<T, S>(session: &mut Session<'_, T, S>, ctx: &mut EnvelopeContext) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let ung = session.read("UNG")?;
    let header = GroupHeader {
        functional_id: ung.value(1).to_string(),
        sender: ung.component(2, 1).to_string(),
        receiver: ung.component(3, 1).to_string(),
        date: ung.component(4, 1).to_string(),
        time: ung.component(4, 2).to_string(),
        control: ung.value(5).trim().to_string(),
        agency: ung.value(6).to_string(),
        version: format!("{}{}", ung.component(7, 1), ung.component(7, 2)),
    };
    ctx.open_group(header.clone());

    let mut attrs = Attributes::new()
        .with("GroupType", &header.functional_id)
        .with("ApplSender", &header.sender);
    attrs.push_nonempty("ApplSenderQual", ung.component(2, 2));
    attrs.push("ApplReceiver", &header.receiver);
    attrs.push_nonempty("ApplReceiverQual", ung.component(3, 2));
    attrs.push("Date", &header.date);
    attrs.push("Time", &header.time);
    attrs.push("Control", &header.control);
    attrs.push("StandardCode", &header.agency);
    attrs.push("StandardVersion", ung.component(7, 1));
    attrs.push_nonempty("StandardRelease", ung.component(7, 2));
    session.sink.start_node(names::GROUP, &attrs)?;
    session.ack.group_start(&header);
    debug!(group = %header.functional_id, control = %header.control, "group start");

    loop {
        let tag = session.next_tag("UNH or UNE")?;
        match tag.as_str() {
            "UNH" => message(session, ctx)?,
            "UNE" => {
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
                    "expected UNH or UNE",
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

fn message<T, S>(session: &mut Session<'_, T, S>, ctx: &mut EnvelopeContext) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let unh = session.read("UNH")?;
    ctx.open_document();
    let control = unh.value(1).trim().to_string();
    let code = unh.component(2, 1).trim().to_string();
    let version = format!("{}{}", unh.component(2, 2), unh.component(2, 3));
    let reference: Vec<String> = (1..=4).map(|c| unh.component(2, c).to_string()).collect();

    let mut attrs = Attributes::new()
        .with("Code", &code)
        .with("Control", &control)
        .with("Version", unh.component(2, 2))
        .with("Release", unh.component(2, 3))
        .with("Agency", unh.component(2, 4));
    attrs.push_nonempty("AssociationCode", unh.component(2, 5));
    session.sink.start_node(names::TRANSACTION, &attrs)?;

    let mut engine = session.loop_engine(Standard::Edifact, &code, &version);
    loop {
        let tag = session.next_tag("segment or UNT")?;
        match tag.as_str() {
            "UNT" => {
                let trailer = session.read(&tag)?;
                ctx.segment_count += 1;
                let segments = ctx.segment_count;
                session.check_count(ctx, &trailer, 1, segments)?;
                session.check_control(ctx, &trailer, 2, &control)?;
                break;
            }
            "UNO" => binary(session, ctx, &mut engine)?,
            _ if is_envelope_tag(&tag) => {
                return Err(EdiError::unexpected_segment(
                    session.position(),
                    tag,
                    format!("message {} not closed by UNT", control),
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
        reference,
        segment_count: ctx.segment_count,
        faults: ctx.document_faults().to_vec(),
    };
    session.ack.document_end(&summary);
    session.summary.documents += 1;
    Ok(())
}

/// `UNO+reference+length'` raw bytes `UNP+length+reference'`.
fn binary<T, S>(
    session: &mut Session<'_, T, S>,
    ctx: &mut EnvelopeContext,
    engine: &mut LoopEngine,
) -> EdiResult<()>
where
    T: TokenSource + ?Sized,
    S: EventSink + ?Sized,
{
    let uno = session.read("UNO")?;
    ctx.segment_count += 1;
    let reference = uno.value(1).trim().to_string();
    let length_text = uno.value(2).trim().to_string();
    let length: usize = length_text.parse().map_err(|_| EdiError::BinaryLength {
        segment: uno.position,
        value: length_text.clone(),
    })?;
    let data = session.tokens.get_chars(length)?;

    let tag = session.next_tag("UNP")?;
    if tag != "UNP" {
        return Err(EdiError::unexpected_segment(
            session.position(),
            tag,
            "expected UNP after binary data",
        ));
    }
    let unp = session.read(&tag)?;
    ctx.segment_count += 1;

    let declared = unp.value(1).trim();
    if declared.parse::<usize>().ok() != Some(length) {
        let fault = RecoverableFault::count_mismatch("UNP", 1, length, declared, unp.position);
        ctx.recover(session.policy, fault)?;
    }
    let echoed = unp.value(2).trim();
    if echoed != reference {
        let fault = RecoverableFault::control_mismatch("UNP", 2, &reference, echoed, unp.position);
        ctx.recover(session.policy, fault)?;
    }

    session.apply_loops(engine, "UNO")?;
    session.emit(&uno)?;
    session.emit_binary(Attributes::new().with("Reference", &reference), &data)?;
    session.emit(&unp)
}
