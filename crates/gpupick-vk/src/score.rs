// SPDX-License-Identifier: CEPL-1.0
use std::fmt;

use ash::vk;
use serde::Deserialize;
use tracing::debug;

use crate::caps;
use crate::error::CapabilityKind;
use crate::queues::{QueueFamilyIndices, QueueRoles};
use crate::requirements::{DeviceFeature, RequirementSet};
use crate::source::DeviceSource;
use crate::surface::present_mode_name;

/// Tunable preferences. Disqualification is not tunable: a device missing a
/// role, an extension, a usable surface or a mandatory feature scores 0
/// whatever the weights say.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub discrete_bonus: u64,
    pub same_family_bonus: u64,
    /// Add `max_image_dimension2_d` as a quality proxy.
    pub use_image_dimension: bool,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            discrete_bonus: 1000,
            same_family_bonus: 100,
            use_image_dimension: true,
        }
    }
}

/// Why a candidate scored 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingQueueRoles(QueueRoles),
    MissingExtensions(Vec<String>),
    InadequateSurface { formats: usize, present_modes: usize },
    MissingFeatures(Vec<DeviceFeature>),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingQueueRoles(roles) => write!(f, "no queue family for {roles:?}"),
            Rejection::MissingExtensions(names) => {
                write!(f, "missing extensions: {}", names.join(", "))
            }
            Rejection::InadequateSurface {
                formats,
                present_modes,
            } => write!(
                f,
                "surface unusable ({formats} formats, {present_modes} present modes)"
            ),
            Rejection::MissingFeatures(feats) => write!(f, "missing features: {feats:?}"),
        }
    }
}

/// One scored device. A rejected candidate always scores 0.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub device: vk::PhysicalDevice,
    /// Position in the driver's enumeration.
    pub position: usize,
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub score: u64,
    pub indices: QueueFamilyIndices,
    pub rejection: Option<Rejection>,
}

impl Candidate {
    pub fn is_viable(&self) -> bool {
        self.score > 0
    }
}

pub fn score_device<S: DeviceSource + ?Sized>(
    source: &S,
    device: vk::PhysicalDevice,
    position: usize,
    req: &RequirementSet,
    weights: &ScoreWeights,
) -> Candidate {
    let props = source.properties(device);
    let mut cand = Candidate {
        device,
        position,
        name: source.device_name(device),
        device_type: props.device_type,
        score: 0,
        indices: QueueFamilyIndices::default(),
        rejection: None,
    };

    match evaluate(source, device, &props, req, weights, &mut cand.indices) {
        Ok(score) => cand.score = score,
        Err(why) => {
            debug!("{} [{}] rejected: {why}", cand.name, position);
            cand.rejection = Some(why);
        }
    }
    cand
}

fn evaluate<S: DeviceSource + ?Sized>(
    source: &S,
    device: vk::PhysicalDevice,
    props: &vk::PhysicalDeviceProperties,
    req: &RequirementSet,
    weights: &ScoreWeights,
    indices: &mut QueueFamilyIndices,
) -> Result<u64, Rejection> {
    let roles = req.queue_roles();
    let families = source.queue_families(device);
    *indices = QueueFamilyIndices::resolve(&families, roles, |i| source.supports_present(device, i));
    let missing_roles = indices.missing(roles);

    let available = source.extensions(device);
    let extensions_ok = caps::verify(
        CapabilityKind::DeviceExtension,
        &req.device_extensions,
        &available,
    );

    if !missing_roles.is_empty() {
        return Err(Rejection::MissingQueueRoles(missing_roles));
    }
    if !extensions_ok {
        return Err(Rejection::MissingExtensions(caps::missing(
            &req.device_extensions,
            &available,
        )));
    }

    if roles.contains(QueueRoles::PRESENT) {
        let surface = source.surface_capabilities(device);
        debug!(
            "surface: images {}..{}, {} formats, modes [{}]",
            surface.min_image_count(),
            surface
                .max_image_count()
                .map_or_else(|| "inf".to_owned(), |n| n.to_string()),
            surface.formats.len(),
            surface
                .present_modes
                .iter()
                .map(|&m| present_mode_name(m))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !surface.is_adequate() {
            return Err(Rejection::InadequateSurface {
                formats: surface.formats.len(),
                present_modes: surface.present_modes.len(),
            });
        }
    }

    let missing_features = req.missing_features(&source.features(device));
    if !missing_features.is_empty() {
        return Err(Rejection::MissingFeatures(missing_features));
    }

    // Weights come from config; the sum saturates instead of wrapping.
    let mut score = 0u64;
    if props.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score = score.saturating_add(weights.discrete_bonus);
    }
    if weights.use_image_dimension {
        score = score.saturating_add(u64::from(props.limits.max_image_dimension2_d));
    }
    if indices.shares_family() {
        score = score.saturating_add(weights.same_family_bonus);
    }
    Ok(score)
}
