//! Vulkan-specific error types

use ash::vk;
use thiserror::Error;

/// Errors raised while bringing up Vulkan
#[derive(Error, Debug)]
pub enum VulkanError {
    /// The Vulkan loader library could not be found or loaded
    #[error("Unable to load the Vulkan loader: {0}")]
    LoaderUnavailable(String),

    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Instance creation failed with `VK_ERROR_INCOMPATIBLE_DRIVER`
    #[error("Unable to create Vulkan instance, cannot find a compatible Vulkan ICD")]
    IncompatibleDriver,

    /// A required instance extension is not offered by the loader
    #[error("Required instance extension not available: {0}")]
    MissingExtension(String),

    /// A required layer is not installed
    #[error("Required instance layer not available: {0}")]
    MissingLayer(String),

    /// A configured name cannot be passed to Vulkan
    #[error("Invalid extension or layer name: {0:?}")]
    InvalidName(String),

    /// The driver reported no GPUs
    #[error("No physical devices found")]
    NoPhysicalDevices,

    /// The selected GPU reports no queue families
    #[error("Device {0} has no family of queues associated with it")]
    NoQueueFamilies(String),

    /// The selected GPU has no graphics-capable queue family
    #[error("Unable to find a queue family on {0} that accepts graphics commands")]
    NoGraphicsQueue(String),

    /// Configured device index is out of range
    #[error("Invalid device selection {index}, expected a value between 0 and {}", .count.saturating_sub(1))]
    InvalidSelection {
        /// Requested index
        index: usize,
        /// Number of devices available
        count: usize,
    },

    /// Input ended before a device was chosen
    #[error("Device selection aborted: no more input")]
    SelectionAborted,

    /// Console I/O failed during listing or prompting
    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_message() {
        let err = VulkanError::InvalidSelection { index: 4, count: 2 };
        assert_eq!(
            err.to_string(),
            "Invalid device selection 4, expected a value between 0 and 1"
        );
    }

    #[test]
    fn test_incompatible_driver_message() {
        assert!(VulkanError::IncompatibleDriver.to_string().contains("compatible Vulkan ICD"));
    }

    #[test]
    fn test_api_error_shows_result_code() {
        let err = VulkanError::Api(vk::Result::ERROR_INITIALIZATION_FAILED);
        assert_eq!(err.to_string(), "Vulkan API error: ERROR_INITIALIZATION_FAILED");
    }
}
