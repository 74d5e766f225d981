//! Vulkan import side, via ash.
//!
//! The context pins the physical device whose LUID matches the DXGI adapter,
//! so imports land on the same GPU the D3D devices allocate on. An import is
//! a three-step probe: create an external-memory image (refusal here is its
//! own outcome), import the handle as a dedicated allocation, bind. The
//! image and memory only exist to see whether the driver accepts them; both
//! are destroyed before returning.

use ash::vk;
use log::{debug, info};

use crate::catalog::DxgiFormat;
use crate::error::{ImportError, SetupError};
use crate::handle::ShareableHandle;

const TEXTURE_SIZE: u32 = 32;

pub struct VulkanContext {
    _entry: ash::Entry,
    instance: ash::Instance,
    device: ash::Device,
    memory_props: vk::PhysicalDeviceMemoryProperties,
}

impl VulkanContext {
    pub fn new(adapter_luid: [u8; 8]) -> Result<Self, SetupError> {
        let entry = unsafe { ash::Entry::load() }
            .map_err(|e| SetupError::Vulkan(format!("failed to load Vulkan: {e:?}")))?;

        let instance_extensions = [
            ash::khr::get_physical_device_properties2::NAME.as_ptr(),
            ash::khr::external_memory_capabilities::NAME.as_ptr(),
            ash::khr::external_fence_capabilities::NAME.as_ptr(),
        ];
        let app_info = vk::ApplicationInfo::default()
            .application_name(c"shareprobe")
            .api_version(vk::make_api_version(0, 1, 2, 0));
        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&instance_extensions);
        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(|e| SetupError::Vulkan(format!("failed to create instance: {e:?}")))?;

        let physical = match find_physical_device(&instance, adapter_luid) {
            Ok(pd) => pd,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(e);
            }
        };
        let props = unsafe { instance.get_physical_device_properties(physical) };
        let name = props
            .device_name_as_c_str()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("vulkan device: {name}");

        let queue_family = pick_queue_family(&instance, physical);
        let priorities = [1.0f32];
        let queue_info = [vk::DeviceQueueCreateInfo::default()
            .queue_family_index(queue_family)
            .queue_priorities(&priorities)];
        let device_extensions = [
            ash::khr::get_memory_requirements2::NAME.as_ptr(),
            ash::khr::dedicated_allocation::NAME.as_ptr(),
            ash::khr::external_memory::NAME.as_ptr(),
            ash::khr::external_memory_win32::NAME.as_ptr(),
        ];
        let device_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_info)
            .enabled_extension_names(&device_extensions);
        let device = match unsafe { instance.create_device(physical, &device_info, None) } {
            Ok(device) => device,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(SetupError::Vulkan(format!("failed to create device: {e:?}")));
            }
        };

        let memory_props = unsafe { instance.get_physical_device_memory_properties(physical) };
        Ok(Self {
            _entry: entry,
            instance,
            device,
            memory_props,
        })
    }

    /// Try to import a shared D3D texture. `Ok` means the image was created,
    /// the memory imported, and the two bound together.
    pub fn import_texture(
        &self,
        handle: &ShareableHandle,
        format: DxgiFormat,
    ) -> Result<(), ImportError> {
        let handle_type = if handle.is_nt() {
            vk::ExternalMemoryHandleTypeFlags::OPAQUE_WIN32
        } else {
            vk::ExternalMemoryHandleTypeFlags::D3D11_TEXTURE
        };
        let vk_format = dxgi_to_vk(format);

        let mut external_info =
            vk::ExternalMemoryImageCreateInfo::default().handle_types(handle_type);
        let image_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(vk_format)
            .extent(vk::Extent3D {
                width: TEXTURE_SIZE,
                height: TEXTURE_SIZE,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(vk::ImageUsageFlags::SAMPLED)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .push_next(&mut external_info);
        let image = unsafe { self.device.create_image(&image_info, None) }.map_err(|e| {
            debug!("image creation refused for {vk_format:?}: {e:?}");
            ImportError::NoImage
        })?;

        let result = self.import_and_bind(image, handle, handle_type);
        unsafe { self.device.destroy_image(image, None) };
        result
    }

    fn import_and_bind(
        &self,
        image: vk::Image,
        handle: &ShareableHandle,
        handle_type: vk::ExternalMemoryHandleTypeFlags,
    ) -> Result<(), ImportError> {
        let requirements = unsafe { self.device.get_image_memory_requirements(image) };
        let memory_type = self
            .find_memory_type(
                requirements.memory_type_bits,
                vk::MemoryPropertyFlags::DEVICE_LOCAL,
            )
            .ok_or_else(|| ImportError::Rejected {
                code: vk::Result::ERROR_OUT_OF_DEVICE_MEMORY.as_raw(),
                message: "no device-local memory type".into(),
            })?;

        let mut dedicated = vk::MemoryDedicatedAllocateInfo::default().image(image);
        let mut import = vk::ImportMemoryWin32HandleInfoKHR::default()
            .handle_type(handle_type)
            .handle(handle.raw() as vk::HANDLE);
        let alloc_info = vk::MemoryAllocateInfo::default()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type)
            .push_next(&mut dedicated)
            .push_next(&mut import);
        let memory = unsafe { self.device.allocate_memory(&alloc_info, None) }.map_err(|e| {
            ImportError::Rejected {
                code: e.as_raw(),
                message: format!("memory import failed: {e:?}"),
            }
        })?;

        let bound = unsafe { self.device.bind_image_memory(image, memory, 0) };
        unsafe { self.device.free_memory(memory, None) };
        bound.map_err(|e| ImportError::Rejected {
            code: e.as_raw(),
            message: format!("bind failed: {e:?}"),
        })
    }

    fn find_memory_type(&self, type_bits: u32, props: vk::MemoryPropertyFlags) -> Option<u32> {
        (0..self.memory_props.memory_type_count).find(|&i| {
            type_bits & (1 << i) != 0
                && self.memory_props.memory_types[i as usize]
                    .property_flags
                    .contains(props)
        })
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

fn find_physical_device(
    instance: &ash::Instance,
    adapter_luid: [u8; 8],
) -> Result<vk::PhysicalDevice, SetupError> {
    let devices = unsafe { instance.enumerate_physical_devices() }
        .map_err(|e| SetupError::Vulkan(format!("failed to enumerate devices: {e:?}")))?;
    devices
        .into_iter()
        .find(|&pd| {
            let mut id_props = vk::PhysicalDeviceIDProperties::default();
            let mut props2 = vk::PhysicalDeviceProperties2::default().push_next(&mut id_props);
            unsafe { instance.get_physical_device_properties2(pd, &mut props2) };
            id_props.device_luid_valid == vk::TRUE && id_props.device_luid == adapter_luid
        })
        .ok_or_else(|| {
            SetupError::Vulkan("no physical device matches the DXGI adapter LUID".into())
        })
}

fn pick_queue_family(instance: &ash::Instance, physical: vk::PhysicalDevice) -> u32 {
    let families = unsafe { instance.get_physical_device_queue_family_properties(physical) };
    families
        .iter()
        .position(|f| f.queue_flags.contains(vk::QueueFlags::GRAPHICS))
        .unwrap_or(0) as u32
}

/// Closest Vulkan format for each probed DXGI format. TYPELESS families map
/// to their most common typed interpretation; DXGI RGB10A2 / RG11B10 are
/// component-reversed packed formats on the Vulkan side.
fn dxgi_to_vk(format: DxgiFormat) -> vk::Format {
    match format {
        DxgiFormat::R24G8_TYPELESS
        | DxgiFormat::D24_UNORM_S8_UINT
        | DxgiFormat::R24_UNORM_X8_TYPELESS
        | DxgiFormat::X24_TYPELESS_G8_UINT => vk::Format::D24_UNORM_S8_UINT,
        DxgiFormat::D32_FLOAT_S8X24_UINT
        | DxgiFormat::R32_FLOAT_X8X24_TYPELESS
        | DxgiFormat::X32_TYPELESS_G8X24_UINT => vk::Format::D32_SFLOAT_S8_UINT,
        DxgiFormat::R32_TYPELESS | DxgiFormat::R32_FLOAT => vk::Format::R32_SFLOAT,
        DxgiFormat::D32_FLOAT => vk::Format::D32_SFLOAT,
        DxgiFormat::R32_UINT => vk::Format::R32_UINT,
        DxgiFormat::R32_SINT => vk::Format::R32_SINT,
        DxgiFormat::R16_TYPELESS | DxgiFormat::R16_UNORM => vk::Format::R16_UNORM,
        DxgiFormat::R16_FLOAT => vk::Format::R16_SFLOAT,
        DxgiFormat::D16_UNORM => vk::Format::D16_UNORM,
        DxgiFormat::R16_UINT => vk::Format::R16_UINT,
        DxgiFormat::R16_SNORM => vk::Format::R16_SNORM,
        DxgiFormat::R16_SINT => vk::Format::R16_SINT,
        DxgiFormat::R8G8B8A8_TYPELESS | DxgiFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        DxgiFormat::R8G8B8A8_UNORM_SRGB => vk::Format::R8G8B8A8_SRGB,
        DxgiFormat::R8G8B8A8_UINT => vk::Format::R8G8B8A8_UINT,
        DxgiFormat::R8G8B8A8_SNORM => vk::Format::R8G8B8A8_SNORM,
        DxgiFormat::R8G8B8A8_SINT => vk::Format::R8G8B8A8_SINT,
        DxgiFormat::B8G8R8A8_UNORM
        | DxgiFormat::B8G8R8X8_UNORM
        | DxgiFormat::B8G8R8A8_TYPELESS
        | DxgiFormat::B8G8R8X8_TYPELESS => vk::Format::B8G8R8A8_UNORM,
        DxgiFormat::B8G8R8A8_UNORM_SRGB | DxgiFormat::B8G8R8X8_UNORM_SRGB => {
            vk::Format::B8G8R8A8_SRGB
        }
        DxgiFormat::R10G10B10A2_TYPELESS | DxgiFormat::R10G10B10A2_UNORM => {
            vk::Format::A2B10G10R10_UNORM_PACK32
        }
        DxgiFormat::R10G10B10A2_UINT => vk::Format::A2B10G10R10_UINT_PACK32,
        DxgiFormat::R11G11B10_FLOAT => vk::Format::B10G11R11_UFLOAT_PACK32,
        DxgiFormat::R16G16B16A16_TYPELESS | DxgiFormat::R16G16B16A16_FLOAT => {
            vk::Format::R16G16B16A16_SFLOAT
        }
        DxgiFormat::R16G16B16A16_UNORM => vk::Format::R16G16B16A16_UNORM,
        DxgiFormat::R16G16B16A16_UINT => vk::Format::R16G16B16A16_UINT,
        DxgiFormat::R16G16B16A16_SNORM => vk::Format::R16G16B16A16_SNORM,
        DxgiFormat::R16G16B16A16_SINT => vk::Format::R16G16B16A16_SINT,
        _ => vk::Format::UNDEFINED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FORMATS;

    #[test]
    fn test_every_catalog_format_maps() {
        for entry in FORMATS {
            assert_ne!(
                dxgi_to_vk(entry.format),
                vk::Format::UNDEFINED,
                "{} has no Vulkan mapping",
                entry.name
            );
        }
    }

    #[test]
    fn test_packed_formats_are_component_reversed() {
        assert_eq!(
            dxgi_to_vk(DxgiFormat::R10G10B10A2_UNORM),
            vk::Format::A2B10G10R10_UNORM_PACK32
        );
        assert_eq!(
            dxgi_to_vk(DxgiFormat::R11G11B10_FLOAT),
            vk::Format::B10G11R11_UFLOAT_PACK32
        );
    }
}
