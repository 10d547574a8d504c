// SPDX-License-Identifier: CEPL-1.0
#![allow(dead_code)]
use std::cell::{Cell, RefCell};
use std::os::raw::c_char;

use gpupick_vk::ash::vk::{self, Handle};
use gpupick_vk::{DeviceSource, NegotiationError, SurfaceCapabilities};

/// An in-memory device as the driver would report it.
#[derive(Clone, Debug)]
pub struct FakeDevice {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub max_image_dimension: u32,
    pub families: Vec<vk::QueueFlags>,
    pub present_families: Vec<u32>,
    pub extensions: Vec<String>,
    pub features: vk::PhysicalDeviceFeatures,
    pub surface: SurfaceCapabilities,
}

impl FakeDevice {
    /// A device that meets the default requirements: one graphics family that
    /// can present, swapchain support, geometry shaders, a usable surface.
    pub fn new(name: &str, device_type: vk::PhysicalDeviceType, max_image_dimension: u32) -> Self {
        FakeDevice {
            name: name.to_owned(),
            device_type,
            max_image_dimension,
            families: vec![vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE],
            present_families: vec![0],
            extensions: vec!["VK_KHR_swapchain".to_owned()],
            features: vk::PhysicalDeviceFeatures {
                geometry_shader: vk::TRUE,
                ..Default::default()
            },
            surface: usable_surface(),
        }
    }

    pub fn discrete(name: &str, max_image_dimension: u32) -> Self {
        Self::new(name, vk::PhysicalDeviceType::DISCRETE_GPU, max_image_dimension)
    }

    pub fn integrated(name: &str, max_image_dimension: u32) -> Self {
        Self::new(name, vk::PhysicalDeviceType::INTEGRATED_GPU, max_image_dimension)
    }

    pub fn families(mut self, families: &[vk::QueueFlags], present: &[u32]) -> Self {
        self.families = families.to_vec();
        self.present_families = present.to_vec();
        self
    }

    pub fn extensions(mut self, names: &[&str]) -> Self {
        self.extensions = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn features(mut self, features: vk::PhysicalDeviceFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn surface(mut self, surface: SurfaceCapabilities) -> Self {
        self.surface = surface;
        self
    }
}

pub fn usable_surface() -> SurfaceCapabilities {
    SurfaceCapabilities {
        limits: vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 8,
            ..Default::default()
        },
        formats: vec![vk::SurfaceFormatKHR {
            format: vk::Format::B8G8R8A8_SRGB,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }],
        present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
    }
}

/// Hands out devices as `PhysicalDevice` handles `1..=n` in list order.
#[derive(Default)]
pub struct FakeSource {
    pub devices: Vec<FakeDevice>,
    pub fail_enumeration: bool,
    pub present_probes: RefCell<Vec<(usize, u32)>>,
    pub surface_probes: Cell<usize>,
}

impl FakeSource {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        FakeSource {
            devices,
            ..Default::default()
        }
    }

    pub fn handle(position: usize) -> vk::PhysicalDevice {
        vk::PhysicalDevice::from_raw(position as u64 + 1)
    }

    fn position(device: vk::PhysicalDevice) -> usize {
        device.as_raw() as usize - 1
    }

    fn get(&self, device: vk::PhysicalDevice) -> &FakeDevice {
        &self.devices[Self::position(device)]
    }
}

impl DeviceSource for FakeSource {
    fn enumerate_devices(&self) -> Result<Vec<vk::PhysicalDevice>, NegotiationError> {
        if self.fail_enumeration {
            return Err(NegotiationError::Vulkan {
                op: "enumerate_physical_devices",
                source: vk::Result::ERROR_INITIALIZATION_FAILED,
            });
        }
        Ok((0..self.devices.len()).map(Self::handle).collect())
    }

    fn properties(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        let dev = self.get(device);
        let mut props = vk::PhysicalDeviceProperties {
            device_type: dev.device_type,
            limits: vk::PhysicalDeviceLimits {
                max_image_dimension2_d: dev.max_image_dimension,
                ..Default::default()
            },
            ..Default::default()
        };
        for (dst, b) in props.device_name.iter_mut().zip(dev.name.bytes()) {
            *dst = b as c_char;
        }
        props
    }

    fn features(&self, device: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        self.get(device).features
    }

    fn queue_families(&self, device: vk::PhysicalDevice) -> Vec<vk::QueueFamilyProperties> {
        self.get(device)
            .families
            .iter()
            .map(|&queue_flags| vk::QueueFamilyProperties {
                queue_flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect()
    }

    fn extensions(&self, device: vk::PhysicalDevice) -> Vec<String> {
        self.get(device).extensions.clone()
    }

    fn supports_present(&self, device: vk::PhysicalDevice, family: u32) -> bool {
        self.present_probes
            .borrow_mut()
            .push((Self::position(device), family));
        self.get(device).present_families.contains(&family)
    }

    fn surface_capabilities(&self, device: vk::PhysicalDevice) -> SurfaceCapabilities {
        self.surface_probes.set(self.surface_probes.get() + 1);
        self.get(device).surface.clone()
    }
}
