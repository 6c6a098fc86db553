//! GPU selection strategies

use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use crate::vulkan::device::GpuDescriptor;
use crate::vulkan::error::{VulkanError, VulkanResult};

/// How to pick a GPU when the driver reports more than one
///
/// A single GPU is always selected without consulting the strategy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSelection {
    /// First device in enumeration order
    First,
    /// Device at a fixed enumeration index
    Index(usize),
    /// First discrete GPU, falling back to the first device
    PreferDiscrete,
    /// Ask on the console
    #[default]
    Interactive,
}

impl DeviceSelection {
    /// Pick an index into `gpus`
    ///
    /// `input`/`out` are only touched by [`DeviceSelection::Interactive`].
    pub fn select<R, W>(&self, gpus: &[GpuDescriptor], input: &mut R, out: &mut W) -> VulkanResult<usize>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        match gpus.len() {
            0 => return Err(VulkanError::NoPhysicalDevices),
            1 => return Ok(0),
            _ => {}
        }

        match self {
            Self::First => Ok(0),
            Self::Index(index) if *index < gpus.len() => Ok(*index),
            Self::Index(index) => Err(VulkanError::InvalidSelection {
                index: *index,
                count: gpus.len(),
            }),
            Self::PreferDiscrete => Ok(gpus.iter().position(GpuDescriptor::is_discrete).unwrap_or(0)),
            Self::Interactive => prompt_for_index(gpus.len(), input, out),
        }
    }
}

/// Prompt until a valid index in `0..count` is entered
fn prompt_for_index<R, W>(count: usize, input: &mut R, out: &mut W) -> VulkanResult<usize>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut line = Vec::new();
    loop {
        write!(out, "select device: ")?;
        out.flush()?;

        // Raw bytes: undecodable input is just another invalid selection
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Err(VulkanError::SelectionAborted);
        }

        match String::from_utf8_lossy(&line).trim().parse::<usize>() {
            Ok(index) if index < count => return Ok(index),
            _ => writeln!(out, "invalid selection, expected a value between 0 and {}", count - 1)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulkan::device::tests::gpu;
    use ash::vk;
    use std::io::Cursor;

    fn two_gpus() -> Vec<GpuDescriptor> {
        vec![
            gpu(0, "Integrated", vk::PhysicalDeviceType::INTEGRATED_GPU, &[vk::QueueFlags::GRAPHICS]),
            gpu(1, "Discrete", vk::PhysicalDeviceType::DISCRETE_GPU, &[vk::QueueFlags::GRAPHICS]),
        ]
    }

    fn select_with(selection: &DeviceSelection, gpus: &[GpuDescriptor], input: &str) -> (VulkanResult<usize>, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = selection.select(gpus, &mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_device_never_prompts() {
        let gpus = &two_gpus()[..1];
        for selection in [
            DeviceSelection::First,
            DeviceSelection::Index(7),
            DeviceSelection::PreferDiscrete,
            DeviceSelection::Interactive,
        ] {
            let (result, output) = select_with(&selection, gpus, "");
            assert_eq!(result.unwrap(), 0);
            assert!(output.is_empty());
        }
    }

    #[test]
    fn test_empty_list_is_error() {
        let (result, _) = select_with(&DeviceSelection::First, &[], "");
        assert!(matches!(result, Err(VulkanError::NoPhysicalDevices)));
    }

    #[test]
    fn test_fixed_strategies() {
        let gpus = two_gpus();
        assert_eq!(select_with(&DeviceSelection::First, &gpus, "").0.unwrap(), 0);
        assert_eq!(select_with(&DeviceSelection::Index(1), &gpus, "").0.unwrap(), 1);
        assert_eq!(select_with(&DeviceSelection::PreferDiscrete, &gpus, "").0.unwrap(), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let (result, _) = select_with(&DeviceSelection::Index(2), &two_gpus(), "");
        assert!(matches!(result, Err(VulkanError::InvalidSelection { index: 2, count: 2 })));
    }

    #[test]
    fn test_prefer_discrete_falls_back_to_first() {
        let gpus = vec![
            gpu(0, "llvmpipe", vk::PhysicalDeviceType::CPU, &[vk::QueueFlags::GRAPHICS]),
            gpu(1, "Integrated", vk::PhysicalDeviceType::INTEGRATED_GPU, &[vk::QueueFlags::GRAPHICS]),
        ];
        assert_eq!(select_with(&DeviceSelection::PreferDiscrete, &gpus, "").0.unwrap(), 0);
    }

    #[test]
    fn test_interactive_accepts_valid_input() {
        let (result, output) = select_with(&DeviceSelection::Interactive, &two_gpus(), "1\n");
        assert_eq!(result.unwrap(), 1);
        assert_eq!(output, "select device: ");
    }

    #[test]
    fn test_interactive_reprompts_on_bad_input() {
        let (result, output) = select_with(&DeviceSelection::Interactive, &two_gpus(), "5\nabc\n-1\n 0 \n");
        assert_eq!(result.unwrap(), 0);
        assert_eq!(output.matches("select device: ").count(), 4);
        assert_eq!(
            output.matches("invalid selection, expected a value between 0 and 1\n").count(),
            3
        );
    }

    #[test]
    fn test_interactive_reprompts_on_undecodable_input() {
        let mut input = Cursor::new(b"\xff\xfe\n1\n".to_vec());
        let mut out = Vec::new();
        let result = DeviceSelection::Interactive.select(&two_gpus(), &mut input, &mut out);
        assert_eq!(result.unwrap(), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "select device: invalid selection, expected a value between 0 and 1\nselect device: "
        );
    }

    #[test]
    fn test_interactive_end_of_input_aborts() {
        let (result, output) = select_with(&DeviceSelection::Interactive, &two_gpus(), "9\n");
        assert!(matches!(result, Err(VulkanError::SelectionAborted)));
        assert!(output.ends_with("select device: "));
    }
}
