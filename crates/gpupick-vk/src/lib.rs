// SPDX-License-Identifier: CEPL-1.0
//! Physical device negotiation: pick the Vulkan device that meets a
//! [`RequirementSet`] and scores best, then create a logical device with one
//! queue per distinct family the requested roles resolved to.
#![deny(unsafe_op_in_unsafe_fn)]

pub mod caps;
pub mod error;
pub mod instance;
pub mod provision;
pub mod queues;
pub mod requirements;
pub mod score;
pub mod select;
pub mod source;
pub mod surface;

pub use ash;

pub use error::{CapabilityKind, NegotiationError, Result};
pub use instance::InstanceContext;
pub use provision::{negotiate, DeviceRequest, LogicalDevice};
pub use queues::{QueueFamilyIndices, QueueRole, QueueRoles};
pub use requirements::{DeviceFeature, RequirementSet};
pub use score::{Candidate, Rejection, ScoreWeights};
pub use select::{pick, rank, select_best};
pub use source::{AshSource, DeviceSource};
pub use surface::SurfaceCapabilities;
