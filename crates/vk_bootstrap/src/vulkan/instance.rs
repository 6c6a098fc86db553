//! Vulkan instance creation
//!
//! Discovers what the loader offers, prints it, negotiates the final
//! extension/layer lists from the configuration and creates the instance.

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry, Instance};
use std::ffi::{c_char, CString};
use std::io::Write;

use crate::core::config::InstanceConfig;
use crate::vulkan::capabilities::{self, ApiVersion};
use crate::vulkan::debug::DebugMessenger;
use crate::vulkan::error::{VulkanError, VulkanResult};

/// Instance extension that lets the loader report portability (non-conformant) drivers
pub const PORTABILITY_ENUMERATION: &str = "VK_KHR_portability_enumeration";

/// Map an instance creation failure to an error
pub fn map_create_error(result: vk::Result) -> VulkanError {
    match result {
        vk::Result::ERROR_INCOMPATIBLE_DRIVER => VulkanError::IncompatibleDriver,
        other => VulkanError::Api(other),
    }
}

fn to_cstrings(names: &[String]) -> VulkanResult<Vec<CString>> {
    names
        .iter()
        .map(|name| CString::new(name.as_str()).map_err(|_| VulkanError::InvalidName(name.clone())))
        .collect()
}

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    /// Vulkan entry point
    pub entry: Entry,
    /// Vulkan instance handle
    pub instance: Instance,
    /// Debug messenger, when one was requested and `VK_EXT_debug_utils` was enabled
    pub debug_messenger: Option<DebugMessenger>,
    /// Extensions the instance was created with
    pub enabled_extensions: Vec<String>,
    /// Layers the instance was created with
    pub enabled_layers: Vec<String>,
    /// Instance-level version supported by the loader
    pub loader_version: ApiVersion,
}

impl VulkanInstance {
    /// Create the instance
    ///
    /// `window_extensions` are required; discovery listings go to `out`.
    pub fn new<W: Write + ?Sized>(
        entry: Entry,
        config: &InstanceConfig,
        window_extensions: &[String],
        out: &mut W,
    ) -> VulkanResult<Self> {
        capabilities::write_extension_listing(out, window_extensions)?;

        let available_extensions = capabilities::available_extensions(&entry)?;
        log::debug!("Loader offers {} instance extensions", available_extensions.len());

        let available_layers = capabilities::available_layers(&entry)?;
        capabilities::write_layer_listing(out, &available_layers)?;

        let mut required = window_extensions.to_vec();
        required.extend(config.extra_extensions.iter().cloned());

        let debug_utils_name = DebugUtils::name().to_string_lossy().into_owned();
        let mut optional = Vec::new();
        if config.enable_debug_messenger {
            optional.push(debug_utils_name.clone());
        }
        optional.push(PORTABILITY_ENUMERATION.to_string());

        let enabled_extensions = capabilities::negotiate_extensions(&required, &optional, &available_extensions)?;
        let enabled_layers = capabilities::negotiate_layers(&config.layers, &available_layers)?;

        let loader_version = capabilities::instance_version(&entry)?;
        log::info!("Vulkan loader supports instance version {}", loader_version);
        if config.api_version > loader_version {
            log::warn!(
                "Requested API version {} is newer than the loader's {}",
                config.api_version,
                loader_version
            );
        }

        let app_name = CString::new(config.application_name.as_str())
            .map_err(|_| VulkanError::InvalidName(config.application_name.clone()))?;
        let engine_name = CString::new(config.engine_name.as_str())
            .map_err(|_| VulkanError::InvalidName(config.engine_name.clone()))?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(config.application_version)
            .engine_name(&engine_name)
            .engine_version(config.engine_version)
            .api_version(config.api_version.to_raw());

        let extension_cstrs = to_cstrings(&enabled_extensions)?;
        let extension_ptrs: Vec<*const c_char> = extension_cstrs.iter().map(|ext| ext.as_ptr()).collect();
        let layer_cstrs = to_cstrings(&enabled_layers)?;
        let layer_ptrs: Vec<*const c_char> = layer_cstrs.iter().map(|layer| layer.as_ptr()).collect();

        let flags = if enabled_extensions.iter().any(|ext| ext == PORTABILITY_ENUMERATION) {
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        let create_info = vk::InstanceCreateInfo::builder()
            .flags(flags)
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        log::info!(
            "Initializing Vulkan instance ({} extensions, {} layers)",
            enabled_extensions.len(),
            enabled_layers.len()
        );
        let instance = unsafe { entry.create_instance(&create_info, None).map_err(map_create_error)? };

        let debug_messenger = if config.enable_debug_messenger {
            if enabled_extensions.contains(&debug_utils_name) {
                match DebugMessenger::new(&entry, &instance, config.debug_severity) {
                    Ok(messenger) => Some(messenger),
                    Err(e) => {
                        unsafe { instance.destroy_instance(None) };
                        return Err(e);
                    }
                }
            } else {
                log::warn!("Debug messenger requested but {} is unavailable", debug_utils_name);
                None
            }
        } else {
            None
        };

        Ok(Self {
            entry,
            instance,
            debug_messenger,
            enabled_extensions,
            enabled_layers,
            loader_version,
        })
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some(debug_messenger) = self.debug_messenger.take() {
                debug_messenger.destroy();
            }

            self.instance.destroy_instance(None);
        }
        log::debug!("Vulkan instance destroyed");
    }
}
