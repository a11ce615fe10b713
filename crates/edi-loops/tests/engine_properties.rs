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

//! Property tests for the loop engine
//!
//! # Properties Tested
//!
//! 1. **Stack invariant**: depth is always level + 1, and 1 after `finish`
//! 2. **Purity**: `peek` never changes state and predicts `transition`
//! 3. **Order independence**: reordering rules whose contexts never overlap
//!    does not change any result

use edi_core::Standard;
use edi_loops::{LoopDescriptor, LoopEngine, PluginRegistry, PluginTable};
use proptest::prelude::*;
use std::sync::Arc;

const X12_TAGS: &[&str] = &[
    "BEG", "REF", "N9", "N1", "N3", "N4", "PO1", "PID", "SCH", "SLN", "CTT", "HL", "AK2", "AK3",
    "AK5",
];
const EDIFACT_TAGS: &[&str] = &[
    "BGM", "DTM", "RFF", "NAD", "CTA", "CUX", "LIN", "PRI", "MOA", "TAX", "CPS", "PAC", "CNT",
];

fn tag_sequence(tags: &'static [&'static str]) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(tags), 0..60)
}

fn table(rules: Vec<LoopDescriptor>) -> Option<Arc<PluginTable>> {
    Some(Arc::new(PluginTable::compile("prop", rules)))
}

// ==================== Scenarios ====================

#[test]
fn test_null_rule_scenario() {
    let rules = vec![
        LoopDescriptor::new("PO1", "PO1", 1),
        LoopDescriptor::no_op("N1").in_path("/PO1"),
        LoopDescriptor::new("N1", "N1", 1),
    ];
    let mut engine = LoopEngine::new(table(rules));

    let opened = engine.transition("N1").unwrap().unwrap();
    assert_eq!(opened.opened.as_deref(), Some("N1"));

    engine.transition("PO1").unwrap();
    assert_eq!(engine.transition("N1").unwrap(), None);
    assert_eq!(engine.current(), Some("PO1"));

    engine.reset();
    assert!(engine.transition("N1").unwrap().is_some());
}

#[test]
fn test_registry_tables_drive_engine() {
    let registry = PluginRegistry::global();
    let table = registry.lookup(Standard::Edifact, "ORDERS", Some("D96A"));
    assert!(table.is_some());
    let mut engine = LoopEngine::new(table);
    for tag in ["BGM", "NAD", "RFF", "LIN", "PRI", "UNS"] {
        engine.transition(tag).unwrap();
    }
    assert_eq!(engine.depth(), 1);
}

// ==================== Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: stack depth tracks level; finish returns to the root
    #[test]
    fn prop_stack_invariant_x12(tags in tag_sequence(X12_TAGS), doc in prop::sample::select(vec!["810", "850", "855", "856", "997"])) {
        let table = PluginRegistry::global().lookup(Standard::X12, doc, None);
        let mut engine = LoopEngine::new(table);
        for tag in tags {
            engine.transition(tag).unwrap();
            prop_assert_eq!(engine.depth(), engine.level() + 1);
        }
        let closed = engine.finish();
        prop_assert_eq!(engine.depth(), 1);
        prop_assert!(closed.len() <= 3);
    }

    /// Property: stack invariant for the EDIFACT tables
    #[test]
    fn prop_stack_invariant_edifact(tags in tag_sequence(EDIFACT_TAGS), doc in prop::sample::select(vec!["ORDERS", "INVOIC", "DESADV"])) {
        let table = PluginRegistry::global().lookup(Standard::Edifact, doc, None);
        let mut engine = LoopEngine::new(table);
        for tag in tags {
            engine.transition(tag).unwrap();
            prop_assert_eq!(engine.depth(), engine.level() + 1);
        }
        engine.finish();
        prop_assert_eq!(engine.level(), 0);
    }

    /// Property: peek is idempotent and agrees with the next transition
    #[test]
    fn prop_peek_predicts_transition(tags in tag_sequence(X12_TAGS)) {
        let table = PluginRegistry::global().lookup(Standard::X12, "850", None);
        let mut engine = LoopEngine::new(table);
        for tag in tags {
            let before = engine.path();
            let first = engine.peek(tag).unwrap();
            let second = engine.peek(tag).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(engine.path(), before);
            prop_assert_eq!(engine.transition(tag).unwrap(), first);
        }
    }

    /// Property: rules with disjoint contexts can be listed in any order
    #[test]
    fn prop_disjoint_rules_order_independent(tags in prop::collection::vec(prop::sample::select(vec!["A", "X", "Z"]), 0..40)) {
        let forward = vec![
            LoopDescriptor::new("A", "A", 1),
            LoopDescriptor::new("X0", "X", 1).at_level(0),
            LoopDescriptor::new("X1", "X", 2).at_level(1),
            LoopDescriptor::new("/", "Z", 0),
        ];
        let mut backward = forward.clone();
        backward.swap(1, 2);

        let mut a = LoopEngine::new(table(forward));
        let mut b = LoopEngine::new(table(backward));
        for tag in tags {
            let ra = a.transition(tag).unwrap();
            let rb = b.transition(tag).unwrap();
            prop_assert_eq!(ra, rb);
            prop_assert_eq!(a.path(), b.path());
        }
    }
}
