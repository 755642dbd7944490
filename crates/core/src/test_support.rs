// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{HostId, HostTarget};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core types.
pub mod strategies {
    use crate::{CommandStatus, HostId};
    use proptest::prelude::*;

    pub fn arb_command_status() -> impl Strategy<Value = CommandStatus> {
        prop_oneof![
            Just(CommandStatus::Pending),
            Just(CommandStatus::Running),
            Just(CommandStatus::Completed),
            Just(CommandStatus::Failed),
            Just(CommandStatus::Cancelled),
        ]
    }

    /// Groups never contain a colon; names may.
    pub fn arb_host_id() -> impl Strategy<Value = HostId> {
        ("[a-z][a-z0-9-]{0,8}", "[a-z0-9][a-z0-9.:-]{0,12}")
            .prop_map(|(group, name)| HostId::new(group, name))
    }
}

// ── Target factories ────────────────────────────────────────────────────

/// SSH target `group:name` with test addressing.
pub fn target(group: &str, name: &str) -> HostTarget {
    HostTarget::builder().id(HostId::new(group, name)).address(name).build()
}

/// One target per name, all in `group`.
pub fn targets(group: &str, names: &[&str]) -> Vec<HostTarget> {
    names.iter().map(|name| target(group, name)).collect()
}
