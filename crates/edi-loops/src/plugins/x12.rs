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

//! ANSI X12 transaction sets.
//!
//! Loops are named after their first segment.

use crate::descriptor::LoopDescriptor;

/// 810 Invoice.
pub fn invoice_810() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("N1", "N1", 2).in_path("/IT1"),
        LoopDescriptor::new("N1", "N1", 1),
        LoopDescriptor::new("IT1", "IT1", 1),
        LoopDescriptor::new("PID", "PID", 2).in_path("/IT1"),
        LoopDescriptor::new("SAC", "SAC", 2).in_path("/IT1"),
        LoopDescriptor::new("SAC", "SAC", 1),
        LoopDescriptor::new("/", "TDS", 0),
        LoopDescriptor::new("ISS", "ISS", 1),
    ]
}

/// 850 Purchase Order.
pub fn purchase_order_850() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("N9", "N9", 1),
        LoopDescriptor::new("N1", "N1", 2).in_path("/PO1"),
        LoopDescriptor::new("N1", "N1", 1),
        LoopDescriptor::new("PO1", "PO1", 1),
        LoopDescriptor::new("PID", "PID", 2).in_path("/PO1"),
        LoopDescriptor::new("SCH", "SCH", 2).in_path("/PO1"),
        LoopDescriptor::new("SLN", "SLN", 2).in_path("/PO1"),
        LoopDescriptor::new("CTT", "CTT", 1),
    ]
}

/// 855 Purchase Order Acknowledgment.
pub fn po_acknowledgment_855() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("N1", "N1", 1),
        LoopDescriptor::new("PO1", "PO1", 1),
        LoopDescriptor::new("PID", "PID", 2).in_path("/PO1"),
        LoopDescriptor::new("ACK", "ACK", 2).in_path("/PO1"),
        LoopDescriptor::new("CTT", "CTT", 1),
    ]
}

/// 856 Ship Notice/Manifest.
///
/// Every `HL` starts a new hierarchical level loop; the parent/child relation
/// is carried in the data (HL02), not in the nesting.
pub fn ship_notice_856() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("HL", "HL", 1),
        LoopDescriptor::new("N1", "N1", 2).in_path("/HL"),
        LoopDescriptor::new("SLN", "SLN", 2).in_path("/HL"),
        LoopDescriptor::new("CLD", "CLD", 2).in_path("/HL"),
        LoopDescriptor::new("CTT", "CTT", 1),
    ]
}

/// 997 Functional Acknowledgment.
pub fn functional_ack_997() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("AK2", "AK2", 1),
        LoopDescriptor::new("AK3", "AK3", 2).in_path("/AK2"),
        LoopDescriptor::current("AK5", 1).in_path("/AK2"),
        LoopDescriptor::new("/", "AK9", 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoopEngine, PluginTable};
    use std::sync::Arc;

    fn run(rules: Vec<LoopDescriptor>, tags: &[&str]) -> LoopEngine {
        let mut engine = LoopEngine::new(Some(Arc::new(PluginTable::compile("t", rules))));
        for tag in tags {
            engine.transition(tag).unwrap();
        }
        engine
    }

    #[test]
    fn test_850_nested_n1() {
        let e = run(purchase_order_850(), &["BEG", "N1", "N3", "PO1", "N1"]);
        assert_eq!(e.path(), "/PO1/N1");
    }

    #[test]
    fn test_850_ctt_closes_lines() {
        let e = run(purchase_order_850(), &["PO1", "PID", "PO1", "SCH", "CTT"]);
        assert_eq!(e.path(), "/CTT");
    }

    #[test]
    fn test_856_hl_siblings() {
        let e = run(ship_notice_856(), &["BSN", "HL", "TD1", "N1", "HL", "LIN"]);
        assert_eq!(e.path(), "/HL");
    }

    #[test]
    fn test_997_ak5_and_ak9() {
        let mut e = run(functional_ack_997(), &["AK1", "AK2", "AK3", "AK4", "AK3"]);
        assert_eq!(e.path(), "/AK2/AK3");
        let t = e.transition("AK5").unwrap().unwrap();
        assert_eq!(t.closed, vec!["AK3".to_string()]);
        let t = e.transition("AK9").unwrap().unwrap();
        assert_eq!(t.closed, vec!["AK2".to_string()]);
        assert_eq!(e.depth(), 1);
    }

    #[test]
    fn test_810_tds_returns_to_root() {
        let e = run(invoice_810(), &["BIG", "N1", "IT1", "SAC", "TDS"]);
        assert_eq!(e.depth(), 1);
    }
}
