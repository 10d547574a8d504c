// SPDX-License-Identifier: CEPL-1.0
use tracing::info;

use crate::error::{NegotiationError, Result};
use crate::requirements::RequirementSet;
use crate::score::{score_device, Candidate, ScoreWeights};
use crate::source::DeviceSource;

/// Scores every device in enumeration order.
pub fn rank<S: DeviceSource + ?Sized>(
    source: &S,
    req: &RequirementSet,
    weights: &ScoreWeights,
) -> Result<Vec<Candidate>> {
    let devices = source.enumerate_devices()?;
    Ok(devices
        .into_iter()
        .enumerate()
        .map(|(position, device)| score_device(source, device, position, req, weights))
        .collect())
}

/// Highest score wins; on a tie the earlier candidate in `candidates` wins.
/// `None` when nothing scored above zero.
pub fn pick(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .filter(|c| c.is_viable())
        .fold(None, |best: Option<&Candidate>, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
}

pub fn select_best<S: DeviceSource + ?Sized>(
    source: &S,
    req: &RequirementSet,
    weights: &ScoreWeights,
) -> Result<Candidate> {
    let candidates = rank(source, req, weights)?;
    for c in &candidates {
        info!(
            "candidate [{}] {} ({:?}): score {}",
            c.position, c.name, c.device_type, c.score
        );
    }

    let best = pick(&candidates)
        .cloned()
        .ok_or(NegotiationError::NoSuitableResource {
            candidates: candidates.len(),
        })?;
    info!(
        "selected [{}] {} (score {}, graphics={:?}, present={:?})",
        best.position, best.name, best.score, best.indices.graphics, best.indices.present
    );
    Ok(best)
}
