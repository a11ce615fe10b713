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

//! Built-in loop rules for common document types.
//!
//! Rules for one tag are listed most specific first.

pub mod edifact;
pub mod x12;

use crate::registry::PluginRegistry;
use edi_core::Standard;

/// Register every built-in document type, version-less.
pub fn register_builtins(registry: &mut PluginRegistry) {
    registry.register(Standard::X12, "810", None, x12::invoice_810);
    registry.register(Standard::X12, "850", None, x12::purchase_order_850);
    registry.register(Standard::X12, "855", None, x12::po_acknowledgment_855);
    registry.register(Standard::X12, "856", None, x12::ship_notice_856);
    registry.register(Standard::X12, "997", None, x12::functional_ack_997);

    registry.register(Standard::Edifact, "ORDERS", None, edifact::orders);
    registry.register(Standard::Edifact, "INVOIC", None, edifact::invoic);
    registry.register(Standard::Edifact, "DESADV", None, edifact::desadv);
}
