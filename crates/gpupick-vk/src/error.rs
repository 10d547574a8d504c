// SPDX-License-Identifier: CEPL-1.0
use std::fmt;

use ash::vk;

/// Which list a capability name was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityKind {
    Layer,
    InstanceExtension,
    DeviceExtension,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CapabilityKind::Layer => "layer",
            CapabilityKind::InstanceExtension => "instance extension",
            CapabilityKind::DeviceExtension => "device extension",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    #[error("unsupported {kind}(s): {}", .missing.join(", "))]
    UnsupportedCapability {
        kind: CapabilityKind,
        missing: Vec<String>,
    },

    #[error("no suitable physical device among {candidates} candidate(s)")]
    NoSuitableResource { candidates: usize },

    #[error("{op} failed: {source}")]
    Vulkan {
        op: &'static str,
        #[source]
        source: vk::Result,
    },

    #[error("name {0:?} contains an interior NUL byte")]
    InvalidName(String),
}

impl NegotiationError {
    pub(crate) fn vulkan(op: &'static str) -> impl FnOnce(vk::Result) -> Self {
        move |source| NegotiationError::Vulkan { op, source }
    }
}

pub type Result<T, E = NegotiationError> = std::result::Result<T, E>;
