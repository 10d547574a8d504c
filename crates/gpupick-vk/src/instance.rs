// SPDX-License-Identifier: CEPL-1.0
//! Instance and surface bootstrap. Not part of the selection logic; this is
//! the collaborator that hands the selector a live instance.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use ash::ext::debug_utils;
use ash::khr::surface;
use ash::{vk, Entry};
use gpupick_core::raw_name;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use tracing::{debug, error, info, trace, warn};

use crate::caps;
use crate::error::{CapabilityKind, NegotiationError, Result};
use crate::requirements::{to_cstrings, RequirementSet};
use crate::source::AshSource;

unsafe extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user: *mut c_void,
) -> vk::Bool32 {
    if data.is_null() {
        return vk::FALSE;
    }
    let p_message = unsafe { (*data).p_message };
    if p_message.is_null() {
        return vk::FALSE;
    }
    let msg = unsafe { CStr::from_ptr(p_message) }.to_string_lossy();
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        error!("[Vulkan] {msg}");
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        warn!("[Vulkan] {msg}");
    } else {
        trace!("[Vulkan] {msg}");
    }
    vk::FALSE
}

/// Instance extensions this negotiation needs: the window system's surface
/// extensions (when a display is given), debug utils in debug builds, and
/// whatever the caller configured.
pub fn required_instance_extensions(
    req: &RequirementSet,
    display: Option<RawDisplayHandle>,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if let Some(display) = display {
        let wsi = ash_window::enumerate_required_extensions(display)
            .map_err(NegotiationError::vulkan("enumerate_required_extensions"))?;
        names.extend(
            wsi.iter()
                .map(|&p| unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned()),
        );
    }
    if cfg!(debug_assertions) {
        names.push(debug_utils::NAME.to_string_lossy().into_owned());
    }
    for ext in &req.instance_extensions {
        if !names.contains(ext) {
            names.push(ext.clone());
        }
    }
    Ok(names)
}

/// Checks configured layers and the required instance extensions against the
/// loader before any instance exists.
pub fn verify_instance_support(entry: &Entry, layers: &[String], extensions: &[String]) -> Result<()> {
    let available_layers: Vec<String> = unsafe { entry.enumerate_instance_layer_properties() }
        .map_err(NegotiationError::vulkan("enumerate_instance_layer_properties"))?
        .iter()
        .map(|l| raw_name(&l.layer_name))
        .collect();
    caps::require(CapabilityKind::Layer, layers, &available_layers)?;

    let available_exts: Vec<String> = unsafe { entry.enumerate_instance_extension_properties(None) }
        .map_err(NegotiationError::vulkan("enumerate_instance_extension_properties"))?
        .iter()
        .map(|e| raw_name(&e.extension_name))
        .collect();
    caps::require(CapabilityKind::InstanceExtension, extensions, &available_exts)
}

/// Live instance, optional debug messenger and optional surface.
pub struct InstanceContext {
    entry: Entry,
    instance: ash::Instance,
    debug: Option<(debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    surface: Option<(surface::Instance, vk::SurfaceKHR)>,
}

impl InstanceContext {
    // STRICT ORDER:
    // 1) verify layers + extensions against the loader
    // 2) create instance
    // 3) debug messenger, then surface FROM THIS INSTANCE
    pub fn new(
        req: &RequirementSet,
        window: Option<(RawDisplayHandle, RawWindowHandle)>,
    ) -> Result<Self> {
        let entry = Entry::linked();

        let extensions = required_instance_extensions(req, window.map(|(d, _)| d))?;
        verify_instance_support(&entry, &req.layers, &extensions)?;

        let app = c"gpupick";
        let app_info = vk::ApplicationInfo::default()
            .application_name(app)
            .engine_name(app)
            .api_version(vk::API_VERSION_1_0);

        let ext_names = to_cstrings(&extensions)?;
        let ext_ptrs: Vec<*const c_char> = ext_names.iter().map(|n| n.as_ptr()).collect();
        let layer_names: Vec<CString> = to_cstrings(&req.layers)?;
        let layer_ptrs: Vec<*const c_char> = layer_names.iter().map(|n| n.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&ext_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(NegotiationError::vulkan("create_instance"))?;
        info!(
            "instance created ({} layer(s), {} extension(s))",
            req.layers.len(),
            extensions.len()
        );

        let mut ctx = InstanceContext {
            entry,
            instance,
            debug: None,
            surface: None,
        };

        if cfg!(debug_assertions) {
            ctx.debug = Some(ctx.create_debug_messenger()?);
        }

        if let Some((display, window)) = window {
            let surface = unsafe {
                ash_window::create_surface(&ctx.entry, &ctx.instance, display, window, None)
            }
            .map_err(NegotiationError::vulkan("create_surface"))?;
            let loader = surface::Instance::new(&ctx.entry, &ctx.instance);
            ctx.surface = Some((loader, surface));
            debug!("surface created");
        }

        Ok(ctx)
    }

    fn create_debug_messenger(&self) -> Result<(debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let loader = debug_utils::Instance::new(&self.entry, &self.instance);
        let ci = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                    | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));
        let messenger = unsafe { loader.create_debug_utils_messenger(&ci, None) }
            .map_err(NegotiationError::vulkan("create_debug_utils_messenger"))?;
        Ok((loader, messenger))
    }

    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// A device source bound to this instance and, if present, its surface.
    pub fn source(&self) -> AshSource<'_> {
        match &self.surface {
            Some((loader, surface)) => AshSource::with_surface(&self.instance, loader, *surface),
            None => AshSource::new(&self.instance),
        }
    }
}

// Surface and messenger go before the instance. Any LogicalDevice made from
// this context must already be gone.
impl Drop for InstanceContext {
    fn drop(&mut self) {
        unsafe {
            if let Some((loader, surface)) = self.surface.take() {
                loader.destroy_surface(surface, None);
            }
            if let Some((loader, messenger)) = self.debug.take() {
                loader.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}
