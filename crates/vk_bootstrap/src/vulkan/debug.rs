//! Debug messenger
//!
//! Registers a `VK_EXT_debug_utils` messenger whose callback forwards every
//! message into the `log` facade. The callback never asks the driver to abort
//! the offending call.

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry, Instance};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ffi::CStr;

use crate::vulkan::error::{VulkanError, VulkanResult};

/// Lowest message severity the messenger forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugSeverity {
    /// Diagnostic chatter from the loader and layers
    Verbose,
    /// Informational messages such as resource creation
    Info,
    /// Likely misuse
    #[default]
    Warning,
    /// Invalid usage
    Error,
}

impl DebugSeverity {
    /// Severity flags for this level and everything above it
    pub fn flags(self) -> vk::DebugUtilsMessageSeverityFlagsEXT {
        use ash::vk::DebugUtilsMessageSeverityFlagsEXT as Flags;

        let mut flags = Flags::ERROR;
        if self <= Self::Warning {
            flags |= Flags::WARNING;
        }
        if self <= Self::Info {
            flags |= Flags::INFO;
        }
        if self <= Self::Verbose {
            flags |= Flags::VERBOSE;
        }
        flags
    }
}

/// `log` level used for a message of the given severity
pub fn log_level_for(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> log::Level {
    use ash::vk::DebugUtilsMessageSeverityFlagsEXT as Flags;

    if severity.contains(Flags::ERROR) {
        log::Level::Error
    } else if severity.contains(Flags::WARNING) {
        log::Level::Warn
    } else if severity.contains(Flags::INFO) {
        log::Level::Info
    } else {
        log::Level::Debug
    }
}

/// Registered debug messenger
///
/// Must be destroyed before the instance it was created from; the owning
/// [`crate::vulkan::VulkanInstance`] takes care of that.
pub struct DebugMessenger {
    loader: DebugUtils,
    handle: vk::DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    /// Register the messenger on `instance`
    pub fn new(entry: &Entry, instance: &Instance, min_severity: DebugSeverity) -> VulkanResult<Self> {
        let loader = DebugUtils::new(entry, instance);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(min_severity.flags())
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let handle = unsafe {
            loader
                .create_debug_utils_messenger(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        log::info!("Debug messenger registered (minimum severity {:?})", min_severity);
        Ok(Self { loader, handle })
    }

    /// # Safety
    /// The parent instance must still be alive and the messenger must not be used afterwards.
    pub(crate) unsafe fn destroy(&self) {
        self.loader.destroy_debug_utils_messenger(self.handle, None);
    }
}

/// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() {
        return vk::FALSE;
    }
    let callback_data = *callback_data;

    let message_id_name = if callback_data.p_message_id_name.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr(callback_data.p_message_id_name).to_string_lossy()
    };

    let message = if callback_data.p_message.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr(callback_data.p_message).to_string_lossy()
    };

    log::log!(
        log_level_for(message_severity),
        "[Vulkan] {:?} [{} ({})] {}",
        message_type,
        message_id_name,
        callback_data.message_id_number,
        message
    );

    vk::FALSE
}
