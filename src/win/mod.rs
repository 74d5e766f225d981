//! Windows backend: real D3D11, D3D12 and Vulkan devices on adapter 0.

mod bootstrap;
mod d3d11;
mod d3d12;
mod fence;
mod vulkan;

use log::warn;
use windows::Win32::Graphics::Direct3D11::ID3D11Texture2D;
use windows::Win32::Graphics::Direct3D12::ID3D12Resource;

use crate::catalog::{BindFlags, DxgiFormat, MiscFlags, ResourceFlags};
use crate::error::{CreateError, ImportError, SetupError};
use crate::handle::ShareableHandle;
use crate::outcome::FenceDirection;
use crate::probe::{ReopenedTexture, ShareBackend};

use bootstrap::AdapterDevices;
use vulkan::VulkanContext;

/// A source texture kept alive for the duration of one probe. The resource
/// itself must outlive the handle: legacy handles are only valid while the
/// resource that produced them exists.
pub enum SourceTexture {
    D3D11 {
        _texture: ID3D11Texture2D,
        handle: ShareableHandle,
    },
    D3D12 {
        _resource: ID3D12Resource,
        handle: ShareableHandle,
    },
}

impl SourceTexture {
    fn handle(&self) -> &ShareableHandle {
        match self {
            SourceTexture::D3D11 { handle, .. } => handle,
            SourceTexture::D3D12 { handle, .. } => handle,
        }
    }
}

pub struct WindowsBackend {
    devices: AdapterDevices,
    vulkan: Option<VulkanContext>,
}

impl WindowsBackend {
    pub fn new() -> Result<Self, SetupError> {
        let devices = bootstrap::init()?;
        let vulkan = match VulkanContext::new(devices.adapter_luid) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                warn!("Vulkan unavailable, Vulkan directions will report Failed: {e}");
                None
            }
        };
        Ok(Self { devices, vulkan })
    }
}

impl ShareBackend for WindowsBackend {
    type SourceTexture = SourceTexture;

    fn create_d3d11_texture(
        &mut self,
        format: DxgiFormat,
        bind: BindFlags,
        misc: MiscFlags,
    ) -> Result<SourceTexture, CreateError> {
        let (texture, handle) =
            d3d11::create_shared_texture(&self.devices.d3d11_primary, format, bind, misc)?;
        Ok(SourceTexture::D3D11 {
            _texture: texture,
            handle,
        })
    }

    fn create_d3d12_texture(
        &mut self,
        format: DxgiFormat,
        flags: ResourceFlags,
    ) -> Result<SourceTexture, CreateError> {
        let (resource, handle) =
            d3d12::create_shared_texture(&self.devices.d3d12_primary, format, flags)?;
        Ok(SourceTexture::D3D12 {
            _resource: resource,
            handle,
        })
    }

    fn reopen_in_d3d11(&mut self, source: &SourceTexture) -> Result<(), ImportError> {
        // Always open on the secondary device so same-API directions still
        // cross a device boundary.
        d3d11::open_shared_texture(&self.devices.d3d11_secondary, source.handle())?;
        Ok(())
    }

    fn reopen_in_d3d12(&mut self, source: &SourceTexture) -> Result<ReopenedTexture, ImportError> {
        d3d12::open_shared_texture(&self.devices.d3d12_secondary, source.handle())
    }

    fn reopen_in_vulkan(
        &mut self,
        source: &SourceTexture,
        format: DxgiFormat,
    ) -> Result<(), ImportError> {
        match &self.vulkan {
            Some(ctx) => ctx.import_texture(source.handle(), format),
            None => Err(ImportError::Rejected {
                code: 0,
                message: "vulkan context unavailable".into(),
            }),
        }
    }

    fn probe_fence(&mut self, direction: FenceDirection) -> Result<(), ImportError> {
        fence::probe(&self.devices, direction)
    }
}
