//! D3D12 side: committed shared textures, reopening, and the
//! ALLOW_SIMULTANEOUS_ACCESS readback.

use core::ffi::c_void;

use windows::Win32::Foundation::{GENERIC_ALL, HANDLE};
use windows::Win32::Graphics::Direct3D12::{
    ID3D12Device, ID3D12Resource, D3D12_HEAP_FLAG_SHARED, D3D12_HEAP_PROPERTIES,
    D3D12_HEAP_TYPE_DEFAULT, D3D12_RESOURCE_DESC, D3D12_RESOURCE_DIMENSION_TEXTURE2D,
    D3D12_RESOURCE_FLAGS, D3D12_RESOURCE_FLAG_ALLOW_SIMULTANEOUS_ACCESS,
    D3D12_RESOURCE_STATE_COMMON, D3D12_TEXTURE_LAYOUT_UNKNOWN,
};
use windows::Win32::Graphics::Dxgi::Common::{DXGI_FORMAT, DXGI_SAMPLE_DESC};

use crate::catalog::{DxgiFormat, ResourceFlags};
use crate::error::{CreateError, ImportError};
use crate::handle::ShareableHandle;
use crate::probe::ReopenedTexture;

const TEXTURE_SIZE: u64 = 32;

/// Create a 32x32 committed texture in a shared default heap and export its
/// NT handle. D3D12 shared resources are always NT handles.
pub fn create_shared_texture(
    device: &ID3D12Device,
    format: DxgiFormat,
    flags: ResourceFlags,
) -> Result<(ID3D12Resource, ShareableHandle), CreateError> {
    let heap = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_DEFAULT,
        ..Default::default()
    };
    let desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_TEXTURE2D,
        Alignment: 0,
        Width: TEXTURE_SIZE,
        Height: TEXTURE_SIZE as u32,
        DepthOrArraySize: 1,
        MipLevels: 1,
        Format: DXGI_FORMAT(format.0),
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Layout: D3D12_TEXTURE_LAYOUT_UNKNOWN,
        Flags: D3D12_RESOURCE_FLAGS(flags.0),
    };
    let mut resource: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap,
            D3D12_HEAP_FLAG_SHARED,
            &desc,
            D3D12_RESOURCE_STATE_COMMON,
            None,
            &mut resource,
        )
    }?;
    let resource = resource.ok_or_else(|| CreateError {
        code: 0,
        message: "CreateCommittedResource returned no resource".into(),
    })?;
    let raw = unsafe { device.CreateSharedHandle(&resource, None, GENERIC_ALL.0, None) }?;
    Ok((resource, ShareableHandle::nt(raw.0 as isize)))
}

/// Reopen a shared texture and read back whether the runtime reports it as
/// simultaneous-access capable. Legacy handles are passed through as-is;
/// the runtime rejects them, which is exactly the datum the sweep wants.
pub fn open_shared_texture(
    device: &ID3D12Device,
    handle: &ShareableHandle,
) -> Result<ReopenedTexture, ImportError> {
    let raw = HANDLE(handle.raw() as *mut c_void);
    let resource: ID3D12Resource = unsafe { device.OpenSharedHandle(raw) }?;
    let desc = unsafe { resource.GetDesc() };
    Ok(ReopenedTexture {
        simultaneous_access: desc
            .Flags
            .contains(D3D12_RESOURCE_FLAG_ALLOW_SIMULTANEOUS_ACCESS),
    })
}
