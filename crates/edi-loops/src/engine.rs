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

//! Loop detection state machine.
//!
//! For every data segment of a document the engine decides whether the
//! segment opens a loop, returns to an enclosing one, or leaves the loop
//! structure alone, and reports which loops must be closed first.
//!
//! # Algorithm
//!
//! 1. Look up the rules for the tag. No table or no rules: no transition.
//! 2. Take the first rule whose required flag is set and whose context
//!    matches. A winning no-op rule means no transition.
//! 3. A `"."` rule at the current level means no transition.
//! 4. Close `level - rule.level` loops, plus one more unless the name is a
//!    resume marker. A negative count, or one larger than the open loops, is
//!    a [`EdiError::LoopNesting`] error.
//! 5. Pop, set the level, push the new loop unless resuming.

use crate::descriptor::{render_path, LoopDescriptor};
use crate::table::PluginTable;
use edi_core::{EdiError, EdiResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::trace;

/// Outcome of a loop transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Loops closed, innermost first.
    pub closed: Vec<String>,
    /// Loop opened after closing, `None` when resuming.
    pub opened: Option<String>,
    /// Nesting level after the transition.
    pub level: usize,
}

impl Transition {
    /// Returns `true` if no loop is opened.
    pub fn is_resume(&self) -> bool {
        self.opened.is_none()
    }
}

/// Loop stack and rule matcher for one document at a time.
///
/// # Examples
///
/// ```rust
/// use edi_loops::{LoopDescriptor, LoopEngine, PluginTable};
/// use std::sync::Arc;
///
/// let table = Arc::new(PluginTable::compile(
///     "850",
///     vec![
///         LoopDescriptor::new("PO1", "PO1", 1),
///         LoopDescriptor::new("PID", "PID", 2).in_path("/PO1"),
///     ],
/// ));
/// let mut engine = LoopEngine::new(Some(table));
///
/// let t = engine.transition("PO1").unwrap().unwrap();
/// assert_eq!(t.opened.as_deref(), Some("PO1"));
///
/// let t = engine.transition("PID").unwrap().unwrap();
/// assert!(t.closed.is_empty());
/// assert_eq!(engine.path(), "/PO1/PID");
///
/// let t = engine.transition("PO1").unwrap().unwrap();
/// assert_eq!(t.closed, vec!["PID".to_string(), "PO1".to_string()]);
///
/// assert_eq!(engine.finish(), vec!["PO1".to_string()]);
/// assert_eq!(engine.depth(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LoopEngine {
    table: Option<Arc<PluginTable>>,
    stack: Vec<String>,
    level: usize,
    flags: HashSet<String>,
    occurrences: HashMap<String, usize>,
}

impl LoopEngine {
    /// Engine over `table`; `None` means segments are never wrapped.
    pub fn new(table: Option<Arc<PluginTable>>) -> Self {
        Self {
            table,
            stack: vec![String::new()],
            level: 0,
            flags: HashSet::new(),
            occurrences: HashMap::new(),
        }
    }

    /// Engine without rules.
    pub fn flat() -> Self {
        Self::new(None)
    }

    /// Table in use.
    pub fn table(&self) -> Option<&Arc<PluginTable>> {
        self.table.as_ref()
    }

    /// Current nesting level; 0 is the document root.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Stack depth including the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost open loop, `None` at the root.
    pub fn current(&self) -> Option<&str> {
        if self.stack.len() > 1 {
            self.stack.last().map(String::as_str)
        } else {
            None
        }
    }

    /// Open loops, root first. The root entry is an empty string.
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    /// Loop stack rendered as `/A/B`.
    pub fn path(&self) -> String {
        render_path(&self.stack)
    }

    /// Returns `true` if `flag` was set in this document.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Forget loops, flags and occurrence counts for the next document.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.level = 0;
        self.flags.clear();
        self.occurrences.clear();
    }

    /// Replace the table and reset.
    pub fn set_table(&mut self, table: Option<Arc<PluginTable>>) {
        self.table = table;
        self.reset();
    }

    /// Compute what [`transition`](Self::transition) would return, without
    /// changing any state.
    pub fn peek(&self, tag: &str) -> EdiResult<Option<Transition>> {
        let occurrence = self.occurrence_of(tag) + 1;
        match self.select(tag, occurrence) {
            Some(rule) => self.plan(tag, rule),
            None => Ok(None),
        }
    }

    /// Apply the loop rules for an incoming segment.
    pub fn transition(&mut self, tag: &str) -> EdiResult<Option<Transition>> {
        let occurrence = self.occurrence_of(tag) + 1;
        self.occurrences.insert(tag.to_string(), occurrence);

        let Some(table) = self.table.clone() else {
            return Ok(None);
        };
        let Some(rule) = self.select_in(&table, tag, occurrence) else {
            return Ok(None);
        };

        let planned = self.plan(tag, rule)?;
        if let Some(flag) = rule.flag_to_set() {
            self.flags.insert(flag.to_string());
        }

        let Some(transition) = planned else {
            return Ok(None);
        };

        for _ in 0..transition.closed.len() {
            if let Some(name) = self.stack.pop() {
                trace!(segment = tag, loop_name = %name, "loop closed");
            }
        }
        self.level = transition.level;
        if let Some(name) = &transition.opened {
            trace!(segment = tag, loop_name = %name, level = self.level, "loop opened");
            self.stack.push(name.clone());
        }
        debug_assert_eq!(self.stack.len(), self.level + 1);
        Ok(Some(transition))
    }

    /// Close every open loop at document end, innermost first.
    pub fn finish(&mut self) -> Vec<String> {
        let mut closed = Vec::with_capacity(self.stack.len().saturating_sub(1));
        while self.stack.len() > 1 {
            if let Some(name) = self.stack.pop() {
                trace!(loop_name = %name, "loop closed at document end");
                closed.push(name);
            }
        }
        self.level = 0;
        closed
    }

    fn occurrence_of(&self, tag: &str) -> usize {
        self.occurrences.get(tag).copied().unwrap_or(0)
    }

    fn select(&self, tag: &str, occurrence: usize) -> Option<&LoopDescriptor> {
        let table = self.table.as_deref()?;
        self.select_in(table, tag, occurrence)
    }

    fn select_in<'t>(
        &self,
        table: &'t PluginTable,
        tag: &str,
        occurrence: usize,
    ) -> Option<&'t LoopDescriptor> {
        table.candidates(tag).iter().find(|rule| {
            let flagged = rule
                .required_flag()
                .map(|flag| self.flags.contains(flag))
                .unwrap_or(true);
            flagged && rule.context().matches(&self.stack, self.level, occurrence)
        })
    }

    fn plan(&self, tag: &str, rule: &LoopDescriptor) -> EdiResult<Option<Transition>> {
        let Some(name) = rule.name() else {
            return Ok(None);
        };
        if rule.is_current() && rule.level() == self.level {
            return Ok(None);
        }

        let resumes = rule.resumes();
        let mut count = self.level as isize - rule.level() as isize;
        if !resumes {
            count += 1;
        }
        if count < 0 || count as usize > self.level {
            return Err(EdiError::loop_nesting(
                tag,
                format!(
                    "rule '{}' at level {} cannot apply at level {} ({})",
                    name,
                    rule.level(),
                    self.level,
                    self.path()
                ),
            ));
        }

        let count = count as usize;
        let closed = self.stack[self.stack.len() - count..]
            .iter()
            .rev()
            .cloned()
            .collect();
        Ok(Some(Transition {
            closed,
            opened: (!resumes).then(|| name.to_string()),
            level: rule.level(),
        }))
    }
}
