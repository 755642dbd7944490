// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolve `--group` / `--host` selections against the configured hosts.

use sshq_core::{parse_host_ids, HostIdError, HostTarget};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("cannot specify both --group and --host")]
    BothSelectors,

    #[error("must specify either --group or --host")]
    NoSelector,

    #[error("no hosts found in group: {0}")]
    EmptyGroup(String),

    #[error("no matching hosts for: {0}")]
    NoMatchingHosts(String),

    #[error("host name '{0}' appears more than once in the selection")]
    DuplicateName(String),

    #[error(transparent)]
    InvalidHostId(#[from] HostIdError),
}

/// Targets for one run, in configuration order for a group and request
/// order for explicit hosts.
///
/// Explicit hosts that are not configured are skipped as long as at least
/// one matches.
pub fn resolve(
    hosts: &[HostTarget],
    group: Option<&str>,
    ids: &[String],
) -> Result<Vec<HostTarget>, InventoryError> {
    let selected = match (group, ids.is_empty()) {
        (Some(_), false) => return Err(InventoryError::BothSelectors),
        (None, true) => return Err(InventoryError::NoSelector),
        (Some(group), true) => {
            let found: Vec<_> = hosts.iter().filter(|h| h.group() == group).cloned().collect();
            if found.is_empty() {
                return Err(InventoryError::EmptyGroup(group.to_string()));
            }
            found
        }
        (None, false) => {
            let mut found = Vec::new();
            let mut missing = Vec::new();
            for id in parse_host_ids(ids)? {
                match hosts.iter().find(|h| h.id == id) {
                    Some(host) => found.push(host.clone()),
                    None => missing.push(id.to_string()),
                }
            }
            if found.is_empty() {
                return Err(InventoryError::NoMatchingHosts(missing.join(", ")));
            }
            if !missing.is_empty() {
                tracing::warn!(missing = %missing.join(", "), "skipping unknown hosts");
            }
            found
        }
    };

    let mut names = HashSet::new();
    for target in &selected {
        if !names.insert(target.name()) {
            return Err(InventoryError::DuplicateName(target.name().to_string()));
        }
    }
    Ok(selected)
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
