//! Vulkan bring-up
//!
//! Organized by stage: window, capability discovery, instance, debug
//! messenger, physical/logical device and GPU selection. [`VulkanContext`]
//! runs the stages in order and owns what they produce.

/// GLFW window configured for Vulkan
pub mod window;
/// Vulkan error types
pub mod error;
/// Instance extension and layer discovery and negotiation
pub mod capabilities;
/// Vulkan instance wrapper
pub mod instance;
/// Debug messenger routed to `log`
pub mod debug;
/// Physical device descriptors and logical device creation
pub mod device;
/// GPU selection strategies
pub mod selection;
/// Stage orchestration
pub mod context;

pub use context::VulkanContext;
pub use device::{LogicalDevice, PhysicalDeviceInfo};
pub use error::{VulkanError, VulkanResult};
pub use instance::VulkanInstance;
pub use window::{Window, WindowError, WindowResult};
