//! Vulkan context management
//!
//! Runs instance creation, GPU selection and optional logical device creation
//! in order, and owns the results so teardown happens in reverse.

use ash::Entry;
use std::io::{BufRead, Write};

use crate::core::config::BootstrapConfig;
use crate::vulkan::device::{self, GpuDescriptor, LogicalDevice, PhysicalDeviceInfo};
use crate::vulkan::error::{VulkanError, VulkanResult};
use crate::vulkan::instance::VulkanInstance;
use crate::vulkan::window::Window;

/// Main Vulkan context that owns all core Vulkan objects
pub struct VulkanContext {
    /// Logical device, when requested
    pub device: Option<LogicalDevice>,
    /// Selected physical device
    pub physical_device: PhysicalDeviceInfo,
    /// Index of the graphics queue family on the selected device
    pub graphics_family: u32,
    /// Every GPU the driver reported, in enumeration order
    pub gpus: Vec<GpuDescriptor>,
    /// Vulkan instance and debug messenger
    pub instance: VulkanInstance,
}

impl VulkanContext {
    /// Bring up Vulkan for `window`
    ///
    /// Listings and the selection prompt are written to `out`; interactive
    /// selection reads from `input`.
    pub fn new<R, W>(window: &Window, config: &BootstrapConfig, input: &mut R, out: &mut W) -> VulkanResult<Self>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        let window_extensions = window
            .required_instance_extensions()
            .map_err(|e| VulkanError::InitializationFailed(format!("Failed to get required extensions: {e}")))?;

        let entry = unsafe { Entry::load() }
            .map_err(|e| VulkanError::LoaderUnavailable(e.to_string()))?;

        let instance = VulkanInstance::new(entry, &config.instance, &window_extensions, out)?;

        let mut physical_devices = PhysicalDeviceInfo::enumerate(&instance.instance)?;
        let gpus: Vec<GpuDescriptor> = physical_devices.iter().map(|pd| pd.descriptor.clone()).collect();
        device::write_device_listing(out, &gpus)?;

        let selected = config.device.selection.select(&gpus, input, out)?;
        let physical_device = physical_devices.swap_remove(selected);
        writeln!(out, "selected: {}", physical_device.name())?;

        let graphics_family = device::graphics_queue_family(&physical_device.descriptor)?;
        log::info!(
            "Selected GPU: {} (graphics queue family {})",
            physical_device.name(),
            graphics_family
        );

        let device = if config.device.create_logical_device {
            Some(LogicalDevice::new(&instance.instance, &physical_device, graphics_family)?)
        } else {
            None
        };

        Ok(Self {
            device,
            physical_device,
            graphics_family,
            gpus,
            instance,
        })
    }

    /// Get the selected physical device
    pub fn physical_device(&self) -> &PhysicalDeviceInfo {
        &self.physical_device
    }

    /// Get the logical device, if one was created
    pub fn device(&self) -> Option<&LogicalDevice> {
        self.device.as_ref()
    }

    /// Get the graphics queue family index
    pub fn graphics_queue_family(&self) -> u32 {
        self.graphics_family
    }

    /// Extensions the instance was created with
    pub fn enabled_extensions(&self) -> &[String] {
        &self.instance.enabled_extensions
    }

    /// Layers the instance was created with
    pub fn enabled_layers(&self) -> &[String] {
        &self.instance.enabled_layers
    }

    /// Whether a debug messenger is active
    pub fn has_debug_messenger(&self) -> bool {
        self.instance.debug_messenger.is_some()
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        // Fields drop in declaration order: device before instance
        log::info!("Tearing down Vulkan context");
    }
}
