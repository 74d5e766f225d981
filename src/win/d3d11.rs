//! D3D11 side: shared texture creation and reopening.

use core::ffi::c_void;

use windows::Win32::Foundation::{GENERIC_ALL, HANDLE};
use windows::Win32::Graphics::Direct3D11::{
    ID3D11Device5, ID3D11Texture2D, D3D11_TEXTURE2D_DESC, D3D11_USAGE_DEFAULT,
};
use windows::Win32::Graphics::Dxgi::Common::{DXGI_FORMAT, DXGI_SAMPLE_DESC};
use windows::Win32::Graphics::Dxgi::{IDXGIResource, IDXGIResource1};
use windows::core::Interface;

use crate::catalog::{BindFlags, DxgiFormat, MiscFlags};
use crate::error::{CreateError, ImportError};
use crate::handle::ShareableHandle;

const TEXTURE_SIZE: u32 = 32;

/// Create a 32x32 shared texture and extract its shared handle. Which kind of
/// handle comes back is decided by the misc flags: SHARED_NTHANDLE textures
/// export an NT handle through IDXGIResource1, everything else exposes the
/// implicit legacy handle.
pub fn create_shared_texture(
    device: &ID3D11Device5,
    format: DxgiFormat,
    bind: BindFlags,
    misc: MiscFlags,
) -> Result<(ID3D11Texture2D, ShareableHandle), CreateError> {
    let desc = D3D11_TEXTURE2D_DESC {
        Width: TEXTURE_SIZE,
        Height: TEXTURE_SIZE,
        MipLevels: 1,
        ArraySize: 1,
        Format: DXGI_FORMAT(format.0),
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        Usage: D3D11_USAGE_DEFAULT,
        BindFlags: bind.0,
        CPUAccessFlags: 0,
        MiscFlags: misc.0,
    };
    let mut texture: Option<ID3D11Texture2D> = None;
    unsafe { device.CreateTexture2D(&desc, None, Some(&mut texture)) }?;
    let texture = texture.ok_or_else(|| CreateError {
        code: 0,
        message: "CreateTexture2D returned no texture".into(),
    })?;

    let handle = if misc.is_nt_handle() {
        let resource: IDXGIResource1 = texture.cast()?;
        let raw = unsafe { resource.CreateSharedHandle(None, GENERIC_ALL.0, None) }?;
        ShareableHandle::nt(raw.0 as isize)
    } else {
        let resource: IDXGIResource = texture.cast()?;
        let raw = unsafe { resource.GetSharedHandle() }?;
        ShareableHandle::legacy(raw.0 as isize)
    };
    Ok((texture, handle))
}

/// Reopen a shared texture on the given device. The import entry point is
/// chosen by the handle's kind tag, never re-derived from flags.
pub fn open_shared_texture(
    device: &ID3D11Device5,
    handle: &ShareableHandle,
) -> Result<ID3D11Texture2D, ImportError> {
    let raw = HANDLE(handle.raw() as *mut c_void);
    let texture: ID3D11Texture2D = unsafe {
        if handle.is_nt() {
            device.OpenSharedResource1(raw)?
        } else {
            device.OpenSharedResource(raw)?
        }
    };
    Ok(texture)
}
