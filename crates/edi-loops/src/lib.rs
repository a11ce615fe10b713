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

//! Loop detection for EDI documents.
//!
//! EDI documents contain nested, repeating segment groups ("loops") that are
//! not delimited in the data. This crate infers them from ordered rule
//! tables:
//!
//! - [`LoopDescriptor`]: one rule (tag, loop name, level, context, flags)
//! - [`PluginTable`]: rules of one document type indexed by tag
//! - [`LoopEngine`]: the loop stack and first-match rule evaluation
//! - [`PluginRegistry`]: tables by standard, document type and version,
//!   compiled once and shared
//!
//! # Example
//!
//! ```rust
//! use edi_core::Standard;
//! use edi_loops::{LoopEngine, PluginRegistry};
//!
//! let table = PluginRegistry::global().lookup(Standard::X12, "850", Some("004010"));
//! let mut engine = LoopEngine::new(table);
//!
//! for tag in ["BEG", "N1", "N3", "PO1", "PID", "CTT"] {
//!     if let Some(t) = engine.transition(tag).unwrap() {
//!         for closed in &t.closed {
//!             println!("end {}", closed);
//!         }
//!         if let Some(opened) = &t.opened {
//!             println!("start {}", opened);
//!         }
//!     }
//! }
//! assert_eq!(engine.path(), "/CTT");
//! ```

mod descriptor;
mod engine;
pub mod plugins;
mod registry;
mod table;

pub use descriptor::{render_path, LoopContext, LoopDescriptor, CURRENT};
pub use engine::{LoopEngine, Transition};
pub use registry::{normalize_version, PluginConstructor, PluginKey, PluginRegistry, MAX_VERSION_LEN};
pub use table::PluginTable;
