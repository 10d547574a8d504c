// SPDX-License-Identifier: CEPL-1.0
//! Driver queries the negotiation needs, behind one trait.
//!
//! Every per-device query is infallible from the caller's point of view: a
//! failing driver call is logged and reported as an empty result, which the
//! scorer then treats as a missing capability. Only device enumeration itself
//! can fail the negotiation.

use ash::khr::surface;
use ash::vk;
use gpupick_core::raw_name;
use tracing::warn;

use crate::error::{NegotiationError, Result};
use crate::surface::SurfaceCapabilities;

pub trait DeviceSource {
    /// All candidate devices, in driver enumeration order.
    fn enumerate_devices(&self) -> Result<Vec<vk::PhysicalDevice>>;

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties;

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures;

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties>;

    fn extensions(&self, device: vk::PhysicalDevice) -> Vec<String>;

    /// Whether queue family `family` can present to the source's surface.
    /// Always false for a source without a surface.
    fn supports_present(&self, device: vk::PhysicalDevice, family: u32) -> bool;

    /// Limits, formats and present modes for the source's surface. Empty for
    /// a source without a surface.
    fn surface_capabilities(&self, device: vk::PhysicalDevice) -> SurfaceCapabilities;

    fn device_name(&self, device: vk::PhysicalDevice) -> String {
        raw_name(&self.properties(device).device_name)
    }
}

/// Queries a live instance, optionally against one surface.
pub struct AshSource<'a> {
    pub(crate) instance: &'a ash::Instance,
    surface: Option<(&'a surface::Instance, vk::SurfaceKHR)>,
}

impl<'a> AshSource<'a> {
    pub fn new(instance: &'a ash::Instance) -> Self {
        AshSource {
            instance,
            surface: None,
        }
    }

    pub fn with_surface(
        instance: &'a ash::Instance,
        surface_loader: &'a surface::Instance,
        surface: vk::SurfaceKHR,
    ) -> Self {
        AshSource {
            instance,
            surface: Some((surface_loader, surface)),
        }
    }
}

impl DeviceSource for AshSource<'_> {
    fn enumerate_devices(&self) -> Result<Vec<vk::PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
            .map_err(NegotiationError::vulkan("enumerate_physical_devices"))
    }

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(device) }
    }

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        unsafe { self.instance.get_physical_device_features(device) }
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        unsafe { self.instance.get_physical_device_queue_family_properties(device) }
    }

    fn extensions(&self, device: vk::PhysicalDevice) -> Vec<String> {
        match unsafe { self.instance.enumerate_device_extension_properties(device) } {
            Ok(props) => props.iter().map(|e| raw_name(&e.extension_name)).collect(),
            Err(e) => {
                warn!("enumerate_device_extension_properties: {e}");
                Vec::new()
            }
        }
    }

    fn supports_present(&self, device: vk::PhysicalDevice, family: u32) -> bool {
        let Some((loader, surface)) = self.surface else {
            return false;
        };
        unsafe { loader.get_physical_device_surface_support(device, family, surface) }
            .unwrap_or_else(|e| {
                warn!("get_physical_device_surface_support(family {family}): {e}");
                false
            })
    }

    fn surface_capabilities(&self, device: vk::PhysicalDevice) -> SurfaceCapabilities {
        let Some((loader, surface)) = self.surface else {
            return SurfaceCapabilities::default();
        };
        // capabilities: image counts, transforms, current extent
        let limits = unsafe { loader.get_physical_device_surface_capabilities(device, surface) }
            .unwrap_or_else(|e| {
                warn!("get_physical_device_surface_capabilities: {e}");
                vk::SurfaceCapabilitiesKHR::default()
            });
        // (format, colorspace) pairs exposed by WSI
        let formats = unsafe { loader.get_physical_device_surface_formats(device, surface) }
            .unwrap_or_else(|e| {
                warn!("get_physical_device_surface_formats: {e}");
                Vec::new()
            });
        let present_modes =
            unsafe { loader.get_physical_device_surface_present_modes(device, surface) }
                .unwrap_or_else(|e| {
                    warn!("get_physical_device_surface_present_modes: {e}");
                    Vec::new()
                });
        SurfaceCapabilities {
            limits,
            formats,
            present_modes,
        }
    }
}
