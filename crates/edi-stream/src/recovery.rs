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

//! Recovery policies for structural faults.
//!
//! A [`RecoveryPolicy`] decides whether the parser continues past a
//! [`RecoverableFault`] using the fault's corrected value. Any closure
//! `Fn(&RecoverableFault) -> bool` is a policy.
//!
//! # Examples
//!
//! ```rust
//! use edi_core::{FaultKind, RecoverableFault};
//! use edi_stream::RecoveryPolicy;
//!
//! let counts_only = |fault: &RecoverableFault| fault.kind == FaultKind::CountMismatch;
//! let fault = RecoverableFault::count_mismatch("SE", 1, 4, "5", 6);
//! assert!(counts_only.recover(&fault));
//! ```

use edi_core::RecoverableFault;

/// Decides whether a structural fault is tolerated.
pub trait RecoveryPolicy {
    /// Return `true` to continue with `fault.corrected`.
    fn recover(&self, fault: &RecoverableFault) -> bool;
}

impl<F> RecoveryPolicy for F
where
    F: Fn(&RecoverableFault) -> bool,
{
    fn recover(&self, fault: &RecoverableFault) -> bool {
        self(fault)
    }
}

/// Rejects every fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictPolicy;

impl RecoveryPolicy for StrictPolicy {
    fn recover(&self, _fault: &RecoverableFault) -> bool {
        false
    }
}

/// Accepts every fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientPolicy;

impl RecoveryPolicy for LenientPolicy {
    fn recover(&self, _fault: &RecoverableFault) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_core::FaultKind;

    fn fault() -> RecoverableFault {
        RecoverableFault::control_mismatch("GE", 2, "1", "2", 9)
    }

    #[test]
    fn test_strict_and_lenient() {
        assert!(!StrictPolicy.recover(&fault()));
        assert!(LenientPolicy.recover(&fault()));
    }

    #[test]
    fn test_closure_policy() {
        let only_length = |f: &RecoverableFault| f.kind == FaultKind::FieldLength;
        assert!(!only_length.recover(&fault()));
        let boxed: Box<dyn RecoveryPolicy> = Box::new(only_length);
        assert!(boxed.recover(&RecoverableFault::field_length("ISA", 2, 10, "x", 1)));
    }
}
