// SPDX-License-Identifier: CEPL-1.0
use std::ffi::CString;

use ash::vk;
use serde::Deserialize;

use crate::error::{NegotiationError, Result};
use crate::queues::{QueueRole, QueueRoles};

pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Device features a candidate must support to score above zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceFeature {
    GeometryShader,
    TessellationShader,
    SamplerAnisotropy,
    ShaderFloat64,
    ShaderInt64,
    FillModeNonSolid,
    WideLines,
    MultiDrawIndirect,
}

impl DeviceFeature {
    pub fn is_supported(self, f: &vk::PhysicalDeviceFeatures) -> bool {
        let bit = match self {
            DeviceFeature::GeometryShader => f.geometry_shader,
            DeviceFeature::TessellationShader => f.tessellation_shader,
            DeviceFeature::SamplerAnisotropy => f.sampler_anisotropy,
            DeviceFeature::ShaderFloat64 => f.shader_float64,
            DeviceFeature::ShaderInt64 => f.shader_int64,
            DeviceFeature::FillModeNonSolid => f.fill_mode_non_solid,
            DeviceFeature::WideLines => f.wide_lines,
            DeviceFeature::MultiDrawIndirect => f.multi_draw_indirect,
        };
        bit == vk::TRUE
    }

    fn enable(self, f: &mut vk::PhysicalDeviceFeatures) {
        let bit = match self {
            DeviceFeature::GeometryShader => &mut f.geometry_shader,
            DeviceFeature::TessellationShader => &mut f.tessellation_shader,
            DeviceFeature::SamplerAnisotropy => &mut f.sampler_anisotropy,
            DeviceFeature::ShaderFloat64 => &mut f.shader_float64,
            DeviceFeature::ShaderInt64 => &mut f.shader_int64,
            DeviceFeature::FillModeNonSolid => &mut f.fill_mode_non_solid,
            DeviceFeature::WideLines => &mut f.wide_lines,
            DeviceFeature::MultiDrawIndirect => &mut f.multi_draw_indirect,
        };
        *bit = vk::TRUE;
    }
}

/// Everything a negotiation insists on. Lists are compared as sets; the
/// device extension and layer lists are handed to device creation verbatim.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RequirementSet {
    pub layers: Vec<String>,
    pub instance_extensions: Vec<String>,
    pub device_extensions: Vec<String>,
    pub roles: Vec<QueueRole>,
    pub features: Vec<DeviceFeature>,
}

impl Default for RequirementSet {
    fn default() -> Self {
        RequirementSet {
            layers: if cfg!(debug_assertions) {
                vec![VALIDATION_LAYER.to_owned()]
            } else {
                Vec::new()
            },
            instance_extensions: Vec::new(),
            device_extensions: vec![ash::khr::swapchain::NAME.to_string_lossy().into_owned()],
            roles: vec![QueueRole::Graphics, QueueRole::Present],
            features: vec![DeviceFeature::GeometryShader],
        }
    }
}

impl RequirementSet {
    pub fn queue_roles(&self) -> QueueRoles {
        self.roles.iter().copied().collect()
    }

    pub fn requires_present(&self) -> bool {
        self.queue_roles().contains(QueueRoles::PRESENT)
    }

    /// Drops the present role, for negotiations without a surface. The
    /// swapchain extension goes too: it needs `VK_KHR_surface` on the
    /// instance, which a surfaceless instance does not enable.
    pub fn without_present(mut self) -> Self {
        self.roles.retain(|r| *r != QueueRole::Present);
        let swapchain = ash::khr::swapchain::NAME.to_string_lossy();
        self.device_extensions.retain(|e| *e != swapchain);
        self
    }

    /// Mandatory features the given device lacks, in configured order.
    pub fn missing_features(&self, supported: &vk::PhysicalDeviceFeatures) -> Vec<DeviceFeature> {
        self.features
            .iter()
            .copied()
            .filter(|f| !f.is_supported(supported))
            .collect()
    }

    pub fn enabled_features(&self) -> vk::PhysicalDeviceFeatures {
        let mut out = vk::PhysicalDeviceFeatures::default();
        for f in &self.features {
            f.enable(&mut out);
        }
        out
    }
}

pub(crate) fn to_cstrings(names: &[String]) -> Result<Vec<CString>> {
    names
        .iter()
        .map(|n| CString::new(n.as_str()).map_err(|_| NegotiationError::InvalidName(n.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_ask_for_swapchain_graphics_and_present() {
        let req = RequirementSet::default();
        assert_eq!(req.device_extensions, ["VK_KHR_swapchain"]);
        assert_eq!(req.queue_roles(), QueueRoles::GRAPHICS | QueueRoles::PRESENT);
        assert!(req.requires_present());
        assert_eq!(req.features, [DeviceFeature::GeometryShader]);
    }

    #[test]
    fn without_present_keeps_graphics() {
        let req = RequirementSet::default().without_present();
        assert_eq!(req.queue_roles(), QueueRoles::GRAPHICS);
        assert!(!req.requires_present());
    }

    #[test]
    fn without_present_drops_swapchain_but_keeps_other_extensions() {
        let req = RequirementSet {
            device_extensions: vec![
                "VK_KHR_swapchain".into(),
                "VK_EXT_memory_budget".into(),
                "VK_KHR_swapchain".into(),
            ],
            ..RequirementSet::default()
        }
        .without_present();
        assert_eq!(req.device_extensions, ["VK_EXT_memory_budget"]);
    }

    #[test]
    fn features_are_checked_and_enabled_per_field() {
        let req = RequirementSet {
            features: vec![DeviceFeature::GeometryShader, DeviceFeature::SamplerAnisotropy],
            ..RequirementSet::default()
        };
        let supported = vk::PhysicalDeviceFeatures {
            sampler_anisotropy: vk::TRUE,
            ..Default::default()
        };
        assert_eq!(req.missing_features(&supported), [DeviceFeature::GeometryShader]);

        let enabled = req.enabled_features();
        assert_eq!(enabled.geometry_shader, vk::TRUE);
        assert_eq!(enabled.sampler_anisotropy, vk::TRUE);
        assert_eq!(enabled.tessellation_shader, vk::FALSE);
    }

    #[test]
    fn parses_from_toml_with_partial_fields() {
        let req: RequirementSet = toml::from_str(
            r#"
            device_extensions = ["VK_KHR_swapchain", "VK_KHR_maintenance1"]
            roles = ["graphics"]
            features = []
            "#,
        )
        .unwrap();
        assert_eq!(req.device_extensions.len(), 2);
        assert_eq!(req.queue_roles(), QueueRoles::GRAPHICS);
        assert!(req.features.is_empty());
        assert!(req.instance_extensions.is_empty());
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = to_cstrings(&["VK_\0bad".to_owned()]).unwrap_err();
        assert!(matches!(err, NegotiationError::InvalidName(_)));
    }
}
