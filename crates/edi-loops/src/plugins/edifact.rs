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

//! UN/EDIFACT messages (D96A-era segment groups).
//!
//! `UNS` separates detail from summary and closes every open group.

use crate::descriptor::LoopDescriptor;

/// ORDERS purchase order message.
pub fn orders() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("SG3", "RFF", 2).in_path("/SG2"),
        LoopDescriptor::new("SG29", "RFF", 2).in_path("/SG25"),
        LoopDescriptor::new("SG1", "RFF", 1),
        LoopDescriptor::new("SG2", "NAD", 1),
        LoopDescriptor::new("SG5", "CTA", 2).in_path("/SG2"),
        LoopDescriptor::new("SG7", "CUX", 1),
        LoopDescriptor::new("SG25", "LIN", 1),
        LoopDescriptor::new("SG28", "PRI", 2).in_path("/SG25"),
        LoopDescriptor::new("/", "UNS", 0),
    ]
}

/// INVOIC invoice message.
pub fn invoic() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("SG3", "RFF", 2).in_path("/SG2"),
        LoopDescriptor::new("SG30", "RFF", 2).in_path("/SG25"),
        LoopDescriptor::new("SG1", "RFF", 1),
        LoopDescriptor::new("SG2", "NAD", 1),
        LoopDescriptor::new("SG7", "CUX", 1),
        LoopDescriptor::new("SG8", "PAT", 1),
        LoopDescriptor::new("SG25", "LIN", 1),
        LoopDescriptor::new("SG26", "MOA", 2).in_path("/SG25"),
        LoopDescriptor::new("SG29", "PRI", 2).in_path("/SG25"),
        LoopDescriptor::new("SG33", "TAX", 2).in_path("/SG25"),
        LoopDescriptor::new("/", "UNS", 0),
        LoopDescriptor::new("SG48", "MOA", 1).requires("summary"),
        LoopDescriptor::new("SG50", "TAX", 1).requires("summary"),
        LoopDescriptor::no_op("CNT").sets("summary"),
    ]
}

/// DESADV despatch advice message.
///
/// `LIN` nests under a packing level (`CPS`) when inside one.
pub fn desadv() -> Vec<LoopDescriptor> {
    vec![
        LoopDescriptor::new("SG1", "RFF", 1).on_occurrence(1),
        LoopDescriptor::new("SG2", "NAD", 1),
        LoopDescriptor::new("SG10", "CPS", 1).sets("packing"),
        LoopDescriptor::new("SG11", "PAC", 2).in_path("/SG10"),
        LoopDescriptor::new("SG17", "LIN", 2)
            .in_path("/SG10")
            .requires("packing"),
        LoopDescriptor::new("SG17", "LIN", 1),
        LoopDescriptor::new("/", "UNS", 0),
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
    fn test_orders_rff_context() {
        let e = run(orders(), &["BGM", "DTM", "RFF"]);
        assert_eq!(e.path(), "/SG1");
        let e = run(orders(), &["BGM", "NAD", "RFF"]);
        assert_eq!(e.path(), "/SG2/SG3");
        let e = run(orders(), &["BGM", "NAD", "LIN", "PRI", "RFF"]);
        assert_eq!(e.path(), "/SG25/SG29");
    }

    #[test]
    fn test_orders_uns_closes_all() {
        let e = run(orders(), &["NAD", "CTA", "LIN", "PRI", "UNS", "CNT"]);
        assert_eq!(e.depth(), 1);
    }

    #[test]
    fn test_invoic_summary_moa() {
        let e = run(invoic(), &["BGM", "LIN", "MOA", "UNS", "MOA"]);
        assert_eq!(e.depth(), 1);
        let e = run(invoic(), &["BGM", "LIN", "UNS", "CNT", "MOA"]);
        assert_eq!(e.path(), "/SG48");
    }

    #[test]
    fn test_desadv_packing_levels() {
        let e = run(desadv(), &["BGM", "LIN"]);
        assert_eq!(e.path(), "/SG17");
        let e = run(desadv(), &["BGM", "CPS", "PAC", "LIN"]);
        assert_eq!(e.path(), "/SG10/SG17");
        let e = run(desadv(), &["BGM", "CPS", "LIN", "CPS", "LIN"]);
        assert_eq!(e.path(), "/SG10/SG17");
    }

    #[test]
    fn test_desadv_second_rff_stays_flat() {
        let e = run(desadv(), &["BGM", "RFF", "DTM", "RFF"]);
        assert_eq!(e.path(), "/SG1");
    }
}
