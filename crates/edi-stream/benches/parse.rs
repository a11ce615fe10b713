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

//! Parser throughput benchmarks.
//!
//! Measures sniffing and full structural parsing of X12 and EDIFACT
//! interchanges at several document counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use edi_core::EdiResult;
use edi_stream::{sniff, Attributes, CollectingSink, EdiParser, EventSink};
use edi_test::builders::{EdifactBuilder, X12Builder};

const SIZES: &[usize] = &[10, 100, 1000];

/// Discards every event so the numbers measure the parser alone.
struct NullSink;

impl EventSink for NullSink {
    fn start_node(&mut self, _name: &str, _attributes: &Attributes) -> EdiResult<()> {
        Ok(())
    }

    fn end_node(&mut self, _name: &str) -> EdiResult<()> {
        Ok(())
    }

    fn text(&mut self, _text: &str) -> EdiResult<()> {
        Ok(())
    }
}

fn purchase_orders(count: usize) -> Vec<u8> {
    let mut builder = X12Builder::new().suffix(b"\n");
    for i in 0..count {
        let po = format!("BEG*00*SA*PO{}**20250101", i);
        builder = builder.transaction(
            "850",
            &[
                &po,
                "REF*DP*038",
                "N1*ST*ACME DISTRIBUTION*92*0001",
                "N3*100 MAIN ST",
                "PO1*1*10*EA*9.25**VP*WIDGET-1",
                "PID*F****SMALL WIDGET",
                "PO1*2*4*EA*19.00**VP*WIDGET-2",
                "CTT*2",
            ],
        );
    }
    builder.build_bytes()
}

fn invoices(count: usize) -> Vec<u8> {
    let mut builder = EdifactBuilder::new().suffix(b"\n");
    for i in 0..count {
        let bgm = format!("BGM*380*INV{}*9", i);
        builder = builder.message(
            "INVOIC",
            &[
                &bgm,
                "DTM*137:20250101:102",
                "NAD*BY*5412345000013::9",
                "LIN*1**4000862141404:SRS",
                "QTY*47:10",
                "MOA*203:92.50",
                "UNS*S",
                "MOA*86:92.50",
            ],
        );
    }
    builder.build_bytes()
}

// ============================================================================
// Sniffing
// ============================================================================

fn bench_sniff(c: &mut Criterion) {
    let mut group = c.benchmark_group("sniff");
    let x12 = purchase_orders(1);
    let edifact = invoices(1);

    group.bench_function("x12", |b| b.iter(|| sniff(black_box(&x12))));
    group.bench_function("edifact", |b| b.iter(|| sniff(black_box(&edifact))));
    group.finish();
}

// ============================================================================
// Full Parsing
// ============================================================================

fn bench_parse_x12(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_x12");
    let parser = EdiParser::new();

    for &size in SIZES {
        let input = purchase_orders(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parser.parse(black_box(&input[..]), &mut NullSink))
        });
    }
    group.finish();
}

fn bench_parse_edifact(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_edifact");
    let parser = EdiParser::new();

    for &size in SIZES {
        let input = invoices(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parser.parse(black_box(&input[..]), &mut NullSink))
        });
    }
    group.finish();
}

fn bench_collecting_sink(c: &mut Criterion) {
    let input = purchase_orders(100);
    let parser = EdiParser::new();
    c.bench_function("parse_x12_collecting", |b| {
        b.iter(|| {
            let mut sink = CollectingSink::new();
            parser.parse(black_box(&input[..]), &mut sink)
        })
    });
}

criterion_group!(
    benches,
    bench_sniff,
    bench_parse_x12,
    bench_parse_edifact,
    bench_collecting_sink
);
criterion_main!(benches);
