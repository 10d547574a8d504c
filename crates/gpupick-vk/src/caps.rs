// SPDX-License-Identifier: CEPL-1.0
//! Set-containment checks for layer and extension name lists.
//!
//! The same check serves instance layers, instance extensions and per-device
//! extensions. Names compare by exact string equality.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::error::{CapabilityKind, NegotiationError, Result};

/// Names in `required` that do not appear in `available`, deduplicated, in the
/// order they first appear in `required`.
pub fn missing<R, A>(required: &[R], available: &[A]) -> Vec<String>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    let available: BTreeSet<&str> = available.iter().map(AsRef::as_ref).collect();
    let mut seen = BTreeSet::new();
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !available.contains(name) && seen.insert(*name))
        .map(str::to_owned)
        .collect()
}

/// True iff every required name is available. Logs one event per required
/// name; never mutates either list.
pub fn verify<R, A>(kind: CapabilityKind, required: &[R], available: &[A]) -> bool
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    trace!(
        "available {kind}s: [{}]",
        available
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let absent = missing(required, available);
    for name in required.iter().map(AsRef::as_ref) {
        if absent.iter().any(|m| m == name) {
            warn!("{kind} {name} is NOT supported");
        } else {
            debug!("{kind} {name} is supported");
        }
    }
    absent.is_empty()
}

/// Like [`verify`], but turns a non-empty difference into
/// [`NegotiationError::UnsupportedCapability`].
pub fn require<R, A>(kind: CapabilityKind, required: &[R], available: &[A]) -> Result<()>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    if verify(kind, required, available) {
        return Ok(());
    }
    Err(NegotiationError::UnsupportedCapability {
        kind,
        missing: missing(required, available),
    })
}
