// SPDX-License-Identifier: CEPL-1.0
use ash::vk;

/// What a device can do with the negotiation's surface.
#[derive(Clone, Debug, Default)]
pub struct SurfaceCapabilities {
    pub limits: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SurfaceCapabilities {
    /// A swapchain can only be built with at least one format and one mode.
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }

    pub fn min_image_count(&self) -> u32 {
        self.limits.min_image_count
    }

    /// `None` when the surface imposes no upper bound (driver reports 0).
    pub fn max_image_count(&self) -> Option<u32> {
        match self.limits.max_image_count {
            0 => None,
            n => Some(n),
        }
    }
}

/// Short mode label for surface diagnostics.
pub(crate) fn present_mode_name(m: vk::PresentModeKHR) -> &'static str {
    match m {
        vk::PresentModeKHR::FIFO => "FIFO",
        vk::PresentModeKHR::MAILBOX => "MAILBOX",
        vk::PresentModeKHR::IMMEDIATE => "IMMEDIATE",
        vk::PresentModeKHR::FIFO_RELAXED => "FIFO_RELAXED",
        _ => "OTHER",
    }
}
