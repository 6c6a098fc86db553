//! Physical device enumeration and logical device creation

use ash::{vk, Device, Instance};
use std::ffi::CString;
use std::io::Write;

use crate::vulkan::capabilities::{fixed_c_string, ApiVersion};
use crate::vulkan::error::{VulkanError, VulkanResult};

/// Device extension enabled automatically when a GPU advertises it
pub const PORTABILITY_SUBSET: &str = "VK_KHR_portability_subset";

/// One queue family of a GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyDescriptor {
    /// Family index as used by `vkGetDeviceQueue`
    pub index: u32,
    /// Capabilities shared by every queue in the family
    pub flags: vk::QueueFlags,
    /// Number of queues in the family
    pub queue_count: u32,
}

impl QueueFamilyDescriptor {
    /// Whether the family accepts graphics commands
    pub fn supports_graphics(&self) -> bool {
        self.flags.contains(vk::QueueFlags::GRAPHICS)
    }
}

/// Driver-reported facts about one GPU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuDescriptor {
    /// Position in the driver's enumeration order
    pub index: usize,
    /// Marketing name reported by the driver
    pub name: String,
    /// Discrete, integrated, virtual, CPU or other
    pub device_type: vk::PhysicalDeviceType,
    /// Highest Vulkan version the device supports
    pub api_version: ApiVersion,
    /// Vendor-specific driver version
    pub driver_version: u32,
    /// PCI vendor id
    pub vendor_id: u32,
    /// PCI device id
    pub device_id: u32,
    /// Queue families in index order
    pub queue_families: Vec<QueueFamilyDescriptor>,
    /// Device extension names
    pub extensions: Vec<String>,
}

impl GpuDescriptor {
    /// Whether this is a discrete GPU
    pub fn is_discrete(&self) -> bool {
        self.device_type == vk::PhysicalDeviceType::DISCRETE_GPU
    }

    /// Whether any queue family accepts graphics commands
    pub fn supports_graphics(&self) -> bool {
        self.queue_families.iter().any(QueueFamilyDescriptor::supports_graphics)
    }

    /// Whether the device advertises a device extension
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext == name)
    }
}

/// Physical device handle together with its descriptor
pub struct PhysicalDeviceInfo {
    /// Vulkan physical device handle
    pub device: vk::PhysicalDevice,
    /// Properties, queue families and extensions
    pub descriptor: GpuDescriptor,
}

impl PhysicalDeviceInfo {
    /// Enumerate every GPU the instance can see
    pub fn enumerate(instance: &Instance) -> VulkanResult<Vec<Self>> {
        let devices = unsafe { instance.enumerate_physical_devices().map_err(VulkanError::Api)? };
        if devices.is_empty() {
            return Err(VulkanError::NoPhysicalDevices);
        }

        devices
            .into_iter()
            .enumerate()
            .map(|(index, device)| Self::describe(instance, index, device))
            .collect()
    }

    fn describe(instance: &Instance, index: usize, device: vk::PhysicalDevice) -> VulkanResult<Self> {
        let properties = unsafe { instance.get_physical_device_properties(device) };
        let queue_families = unsafe { instance.get_physical_device_queue_family_properties(device) };
        let extensions = unsafe {
            instance
                .enumerate_device_extension_properties(device)
                .map_err(VulkanError::Api)?
        };

        let descriptor = GpuDescriptor {
            index,
            name: fixed_c_string(&properties.device_name),
            device_type: properties.device_type,
            api_version: ApiVersion::from_raw(properties.api_version),
            driver_version: properties.driver_version,
            vendor_id: properties.vendor_id,
            device_id: properties.device_id,
            queue_families: queue_families
                .iter()
                .zip(0u32..)
                .map(|(family, index)| QueueFamilyDescriptor {
                    index,
                    flags: family.queue_flags,
                    queue_count: family.queue_count,
                })
                .collect(),
            extensions: extensions
                .iter()
                .map(|ext| fixed_c_string(&ext.extension_name))
                .collect(),
        };

        log::debug!(
            "GPU {}: {} ({:?}, Vulkan {}, {} queue families)",
            index,
            descriptor.name,
            descriptor.device_type,
            descriptor.api_version,
            descriptor.queue_families.len()
        );

        Ok(Self { device, descriptor })
    }

    /// Name of the device
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Index of the first queue family that accepts graphics commands
pub fn graphics_queue_family(gpu: &GpuDescriptor) -> VulkanResult<u32> {
    if gpu.queue_families.is_empty() {
        return Err(VulkanError::NoQueueFamilies(gpu.name.clone()));
    }

    gpu.queue_families
        .iter()
        .find(|family| family.supports_graphics())
        .map(|family| family.index)
        .ok_or_else(|| VulkanError::NoGraphicsQueue(gpu.name.clone()))
}

/// Print `found N GPU(s):` followed by `i: name`
pub fn write_device_listing<W: Write + ?Sized>(out: &mut W, gpus: &[GpuDescriptor]) -> std::io::Result<()> {
    writeln!(out, "found {} GPU(s):", gpus.len())?;
    for gpu in gpus {
        writeln!(out, "{}: {}", gpu.index, gpu.name)?;
    }
    Ok(())
}

/// Logical device wrapper with RAII cleanup
pub struct LogicalDevice {
    /// Vulkan logical device handle
    pub device: Device,
    /// Queue 0 of the graphics family
    pub graphics_queue: vk::Queue,
    /// Index of the graphics queue family
    pub graphics_family: u32,
    /// Device extensions that were enabled
    pub enabled_extensions: Vec<String>,
}

impl LogicalDevice {
    /// Create a logical device with one graphics queue
    pub fn new(instance: &Instance, physical_device: &PhysicalDeviceInfo, graphics_family: u32) -> VulkanResult<Self> {
        let priorities = [1.0_f32];
        let queue_infos = [vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(graphics_family)
            .queue_priorities(&priorities)
            .build()];

        // Implementations that expose the portability subset require it to be enabled
        let enabled_extensions: Vec<String> = if physical_device.descriptor.has_extension(PORTABILITY_SUBSET) {
            vec![PORTABILITY_SUBSET.to_string()]
        } else {
            Vec::new()
        };
        let extension_cstrs = enabled_extensions
            .iter()
            .map(|name| CString::new(name.as_str()).map_err(|_| VulkanError::InvalidName(name.clone())))
            .collect::<VulkanResult<Vec<_>>>()?;
        let extension_ptrs: Vec<*const std::ffi::c_char> = extension_cstrs.iter().map(|ext| ext.as_ptr()).collect();

        let device_features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_features(&device_features);

        let device = unsafe {
            instance
                .create_device(physical_device.device, &create_info, None)
                .map_err(VulkanError::Api)?
        };

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };

        log::info!(
            "Logical device created on {} (graphics family {})",
            physical_device.name(),
            graphics_family
        );

        Ok(Self {
            device,
            graphics_queue,
            graphics_family,
            enabled_extensions,
        })
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
        log::debug!("Logical device destroyed");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn gpu(index: usize, name: &str, device_type: vk::PhysicalDeviceType, families: &[vk::QueueFlags]) -> GpuDescriptor {
        GpuDescriptor {
            index,
            name: name.to_string(),
            device_type,
            api_version: ApiVersion::new(1, 3, 0),
            driver_version: 1,
            vendor_id: 0x10de,
            device_id: 0x2684,
            queue_families: families
                .iter()
                .zip(0u32..)
                .map(|(flags, index)| QueueFamilyDescriptor { index, flags: *flags, queue_count: 1 })
                .collect(),
            extensions: Vec::new(),
        }
    }

    #[test]
    fn test_first_graphics_family_is_chosen() {
        let device = gpu(
            0,
            "Test GPU",
            vk::PhysicalDeviceType::DISCRETE_GPU,
            &[
                vk::QueueFlags::TRANSFER,
                vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER,
                vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE,
                vk::QueueFlags::GRAPHICS,
            ],
        );
        assert_eq!(graphics_queue_family(&device).unwrap(), 2);
        assert!(device.supports_graphics());
    }

    #[test]
    fn test_no_queue_families() {
        let device = gpu(0, "Empty", vk::PhysicalDeviceType::CPU, &[]);
        let err = graphics_queue_family(&device).unwrap_err();
        assert!(matches!(err, VulkanError::NoQueueFamilies(ref n) if n == "Empty"));
    }

    #[test]
    fn test_no_graphics_family() {
        let device = gpu(0, "Compute only", vk::PhysicalDeviceType::OTHER, &[vk::QueueFlags::COMPUTE]);
        let err = graphics_queue_family(&device).unwrap_err();
        assert!(matches!(err, VulkanError::NoGraphicsQueue(_)));
        assert!(!device.supports_graphics());
    }

    #[test]
    fn test_device_listing_format() {
        let gpus = [
            gpu(0, "Integrated", vk::PhysicalDeviceType::INTEGRATED_GPU, &[vk::QueueFlags::GRAPHICS]),
            gpu(1, "Discrete", vk::PhysicalDeviceType::DISCRETE_GPU, &[vk::QueueFlags::GRAPHICS]),
        ];
        let mut out = Vec::new();
        write_device_listing(&mut out, &gpus).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "found 2 GPU(s):\n0: Integrated\n1: Discrete\n");
    }

    #[test]
    fn test_extension_lookup() {
        let mut device = gpu(0, "Portable", vk::PhysicalDeviceType::INTEGRATED_GPU, &[vk::QueueFlags::GRAPHICS]);
        assert!(!device.has_extension(PORTABILITY_SUBSET));
        device.extensions.push(PORTABILITY_SUBSET.to_string());
        assert!(device.has_extension(PORTABILITY_SUBSET));
        assert!(!device.is_discrete());
    }
}
