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

//! Loop descriptors: the rules a plugin table is built from.
//!
//! A descriptor says "when segment `tag` arrives in context `context`, the
//! document is now in loop `name` at nesting `level`". Names carry markers:
//!
//! | name      | meaning |
//! |-----------|---------|
//! | `"."`     | stay in (or return to) whatever loop is current at `level` |
//! | `"/..."`  | absolute reposition: close down to `level`, open nothing |
//! | `".X"`    | resume `X` at `level` without closing an extra loop |
//! | none      | explicit non-transition, see [`LoopDescriptor::no_op`] |
//! | other     | close loops down to `level - 1`, then open `name` |

use std::fmt;

/// Name marker for "the current loop".
pub const CURRENT: &str = ".";

/// Precondition on the engine state for a descriptor to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopContext {
    /// Always matches.
    Any,
    /// Inside a loop path.
    ///
    /// A leading `/` anchors the path at the root and matches as a prefix
    /// of the loop stack (`/PO1` matches `/PO1` and `/PO1/PID`). Without it
    /// the path must match the innermost loops (`PO1/PID`).
    Path(String),
    /// Current nesting level equals the value.
    Level(usize),
    /// The segment tag is seen for the n-th time (1-based) in this document.
    Occurrence(usize),
}

impl LoopContext {
    /// Evaluate against the loop stack (root first), nesting level and the
    /// occurrence number of the incoming segment.
    pub fn matches(&self, stack: &[String], level: usize, occurrence: usize) -> bool {
        match self {
            LoopContext::Any => true,
            LoopContext::Level(n) => *n == level,
            LoopContext::Occurrence(n) => *n == occurrence,
            LoopContext::Path(path) => path_matches(path, stack),
        }
    }
}

impl fmt::Display for LoopContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopContext::Any => f.write_str("*"),
            LoopContext::Path(path) => f.write_str(path),
            LoopContext::Level(n) => write!(f, "level {}", n),
            LoopContext::Occurrence(n) => write!(f, "occurrence {}", n),
        }
    }
}

/// Render a loop stack as `/A/B`; the root alone renders as `/`.
pub fn render_path(stack: &[String]) -> String {
    let loops = stack.get(1..).unwrap_or(&[]);
    format!("/{}", loops.join("/"))
}

fn path_matches(path: &str, stack: &[String]) -> bool {
    if path.is_empty() || path == "*" {
        return true;
    }

    if path.starts_with('/') {
        let prefix = path.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        let rendered = render_path(stack);
        return rendered == prefix
            || (rendered.starts_with(prefix)
                && rendered.as_bytes().get(prefix.len()) == Some(&b'/'));
    }

    let wanted: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let loops = stack.get(1..).unwrap_or(&[]);
    if wanted.len() > loops.len() {
        return false;
    }
    loops[loops.len() - wanted.len()..]
        .iter()
        .zip(&wanted)
        .all(|(have, want)| have == want)
}

/// One loop rule.
///
/// # Examples
///
/// ```rust
/// use edi_loops::{LoopContext, LoopDescriptor};
///
/// // N1 inside a PO1 loop opens a nested N1 loop at level 2
/// let nested = LoopDescriptor::new("N1", "N1", 2).in_path("/PO1");
/// // Anywhere else N1 opens a loop at level 1
/// let header = LoopDescriptor::new("N1", "N1", 1);
///
/// assert_eq!(nested.context(), &LoopContext::Path("/PO1".into()));
/// assert_eq!(header.context(), &LoopContext::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopDescriptor {
    name: Option<String>,
    tag: String,
    level: usize,
    context: LoopContext,
    requires: Option<String>,
    sets: Option<String>,
}

impl LoopDescriptor {
    /// Rule that moves to loop `name` at `level` when `tag` arrives.
    pub fn new(name: impl Into<String>, tag: impl Into<String>, level: usize) -> Self {
        Self {
            name: Some(name.into()),
            tag: tag.into(),
            level,
            context: LoopContext::Any,
            requires: None,
            sets: None,
        }
    }

    /// Rule that keeps `tag` in the loop current at `level`.
    pub fn current(tag: impl Into<String>, level: usize) -> Self {
        Self::new(CURRENT, tag, level)
    }

    /// Explicit non-transition.
    ///
    /// Matches like any other rule, but the segment stays where it is and
    /// later rules for the same tag are not tried.
    pub fn no_op(tag: impl Into<String>) -> Self {
        Self {
            name: None,
            tag: tag.into(),
            level: 0,
            context: LoopContext::Any,
            requires: None,
            sets: None,
        }
    }

    /// Restrict to a loop path.
    pub fn in_path(mut self, path: impl Into<String>) -> Self {
        self.context = LoopContext::Path(path.into());
        self
    }

    /// Restrict to a nesting level.
    pub fn at_level(mut self, level: usize) -> Self {
        self.context = LoopContext::Level(level);
        self
    }

    /// Restrict to the n-th occurrence of the tag.
    pub fn on_occurrence(mut self, n: usize) -> Self {
        self.context = LoopContext::Occurrence(n);
        self
    }

    /// Only match once `flag` has been set in this document.
    pub fn requires(mut self, flag: impl Into<String>) -> Self {
        self.requires = Some(flag.into());
        self
    }

    /// Set `flag` when this rule wins.
    pub fn sets(mut self, flag: impl Into<String>) -> Self {
        self.sets = Some(flag.into());
        self
    }

    /// Loop name, `None` for the no-op sentinel.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Triggering segment tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Nesting level the rule moves to.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn context(&self) -> &LoopContext {
        &self.context
    }

    pub fn required_flag(&self) -> Option<&str> {
        self.requires.as_deref()
    }

    pub fn flag_to_set(&self) -> Option<&str> {
        self.sets.as_deref()
    }

    /// Returns `true` for the explicit non-transition sentinel.
    pub fn is_no_op(&self) -> bool {
        self.name.is_none()
    }

    /// Returns `true` when the name is exactly [`CURRENT`].
    pub fn is_current(&self) -> bool {
        self.name.as_deref() == Some(CURRENT)
    }

    /// Returns `true` when the name carries a resume marker (`/` or `.`).
    ///
    /// Resuming rules close down to their level and open nothing.
    pub fn resumes(&self) -> bool {
        self.name
            .as_deref()
            .map(|n| n.starts_with('/') || n.starts_with('.'))
            .unwrap_or(false)
    }
}

impl fmt::Display for LoopDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} @{} [{}]",
            self.tag,
            self.name.as_deref().unwrap_or("(none)"),
            self.level,
            self.context
        )
    }
}
