// SPDX-License-Identifier: CEPL-1.0
use std::collections::{BTreeMap, BTreeSet};

use ash::vk;
use tracing::info;

use crate::error::{NegotiationError, Result};
use crate::queues::QueueFamilyIndices;
use crate::requirements::{to_cstrings, RequirementSet};
use crate::score::{Candidate, ScoreWeights};
use crate::select::select_best;
use crate::source::AshSource;

/// Everything device creation needs, decided before touching the driver.
#[derive(Clone, Debug)]
pub struct DeviceRequest {
    pub physical: vk::PhysicalDevice,
    pub indices: QueueFamilyIndices,
    /// One queue create info is issued per entry.
    pub queue_families: BTreeSet<u32>,
    pub extensions: Vec<String>,
    pub layers: Vec<String>,
    pub features: vk::PhysicalDeviceFeatures,
}

impl DeviceRequest {
    pub fn new(selection: &Candidate, req: &RequirementSet) -> Self {
        DeviceRequest {
            physical: selection.device,
            indices: selection.indices,
            queue_families: selection.indices.unique_families(),
            extensions: req.device_extensions.clone(),
            layers: req.layers.clone(),
            features: req.enabled_features(),
        }
    }
}

/// A created device with one queue per distinct family. Destroys the device
/// on drop; must be dropped before the instance it came from.
pub struct LogicalDevice {
    pub device: ash::Device,
    pub physical: vk::PhysicalDevice,
    pub indices: QueueFamilyIndices,
    pub queues: BTreeMap<u32, vk::Queue>,
}

impl LogicalDevice {
    pub fn graphics_queue(&self) -> Option<vk::Queue> {
        self.indices
            .graphics
            .and_then(|i| self.queues.get(&i).copied())
    }

    pub fn present_queue(&self) -> Option<vk::Queue> {
        self.indices
            .present
            .and_then(|i| self.queues.get(&i).copied())
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();
            self.device.destroy_device(None);
        }
    }
}

impl AshSource<'_> {
    pub fn provision(&self, request: &DeviceRequest) -> Result<LogicalDevice> {
        let priorities = [1.0_f32];
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = request
            .queue_families
            .iter()
            .map(|&family| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(family)
                    .queue_priorities(&priorities)
            })
            .collect();

        let ext_names = to_cstrings(&request.extensions)?;
        let ext_ptrs: Vec<*const std::os::raw::c_char> =
            ext_names.iter().map(|n| n.as_ptr()).collect();
        let layer_names = to_cstrings(&request.layers)?;
        let layer_ptrs: Vec<*const std::os::raw::c_char> =
            layer_names.iter().map(|n| n.as_ptr()).collect();

        // Device layers are ignored by current loaders but still passed
        // through for old implementations.
        #[allow(deprecated)]
        let dinfo = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&ext_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&request.features);

        let device = unsafe { self.instance.create_device(request.physical, &dinfo, None) }
            .map_err(NegotiationError::vulkan("create_device"))?;

        let queues: BTreeMap<u32, vk::Queue> = request
            .queue_families
            .iter()
            .map(|&family| (family, unsafe { device.get_device_queue(family, 0) }))
            .collect();

        info!(
            "logical device ready: {} queue(s) on families {:?}, {} extension(s)",
            queues.len(),
            request.queue_families,
            request.extensions.len()
        );

        Ok(LogicalDevice {
            device,
            physical: request.physical,
            indices: request.indices,
            queues,
        })
    }
}

/// Picks the best device and provisions it.
pub fn negotiate(
    source: &AshSource<'_>,
    req: &RequirementSet,
    weights: &ScoreWeights,
) -> Result<LogicalDevice> {
    let selection = select_best(source, req, weights)?;
    source.provision(&DeviceRequest::new(&selection, req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    use crate::requirements::DeviceFeature;

    fn selection(indices: QueueFamilyIndices) -> Candidate {
        Candidate {
            device: vk::PhysicalDevice::from_raw(7),
            position: 0,
            name: "gpu".into(),
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            score: 1100,
            indices,
            rejection: None,
        }
    }

    #[test]
    fn shared_family_issues_one_queue_request() {
        let sel = selection(QueueFamilyIndices {
            graphics: Some(2),
            present: Some(2),
        });
        let request = DeviceRequest::new(&sel, &RequirementSet::default());
        assert_eq!(request.queue_families.into_iter().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn distinct_families_issue_one_request_each() {
        let sel = selection(QueueFamilyIndices {
            graphics: Some(0),
            present: Some(3),
        });
        let request = DeviceRequest::new(&sel, &RequirementSet::default());
        assert_eq!(request.queue_families.into_iter().collect::<Vec<_>>(), [0, 3]);
        assert_eq!(request.physical, vk::PhysicalDevice::from_raw(7));
    }

    #[test]
    fn lists_are_passed_through_verbatim() {
        let req = RequirementSet {
            layers: vec!["VK_LAYER_KHRONOS_validation".into()],
            device_extensions: vec![
                "VK_KHR_swapchain".into(),
                "VK_KHR_swapchain".into(),
                "VK_EXT_memory_budget".into(),
            ],
            features: vec![DeviceFeature::SamplerAnisotropy],
            ..RequirementSet::default()
        };
        let sel = selection(QueueFamilyIndices {
            graphics: Some(0),
            present: Some(0),
        });
        let request = DeviceRequest::new(&sel, &req);
        assert_eq!(request.extensions, req.device_extensions);
        assert_eq!(request.layers, req.layers);
        assert_eq!(request.features.sampler_anisotropy, vk::TRUE);
        assert_eq!(request.features.geometry_shader, vk::FALSE);
    }
}
