//! Device bootstrap: one DXGI adapter, two devices per D3D API.
//!
//! Two devices per API so that same-API sharing still crosses a device
//! boundary, which is the scenario shared handles exist for.

use core::ffi::c_void;
use std::mem;

use log::info;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::Direct3D::{
    D3D_DRIVER_TYPE_UNKNOWN, D3D_FEATURE_LEVEL_11_0, D3D_FEATURE_LEVEL_11_1,
    D3D_FEATURE_LEVEL_12_0, D3D_FEATURE_LEVEL_12_1,
};
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device5, D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_SDK_VERSION,
};
use windows::Win32::Graphics::Direct3D12::{
    D3D12CreateDevice, ID3D12Device, D3D12_FEATURE_DATA_D3D12_OPTIONS4,
    D3D12_FEATURE_D3D12_OPTIONS4,
};
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory2, IDXGIAdapter1, IDXGIFactory4, DXGI_CREATE_FACTORY_FLAGS,
};
use windows::core::Interface;

use crate::error::SetupError;

pub struct AdapterDevices {
    pub d3d11_primary: ID3D11Device5,
    pub d3d11_secondary: ID3D11Device5,
    pub d3d12_primary: ID3D12Device,
    pub d3d12_secondary: ID3D12Device,
    /// DXGI adapter LUID, little-endian bytes, for matching the Vulkan
    /// physical device.
    pub adapter_luid: [u8; 8],
}

pub fn init() -> Result<AdapterDevices, SetupError> {
    let factory: IDXGIFactory4 = unsafe { CreateDXGIFactory2(DXGI_CREATE_FACTORY_FLAGS(0))? };
    let adapter = unsafe { factory.EnumAdapters1(0) }
        .map_err(|e| SetupError::NoAdapter(e.message().to_string()))?;
    let desc = unsafe { adapter.GetDesc1()? };

    let name_len = desc
        .Description
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(desc.Description.len());
    println!(
        "Testing adapter: {}",
        String::from_utf16_lossy(&desc.Description[..name_len])
    );

    let d3d12_primary = create_d3d12(&adapter)?;
    let d3d12_secondary = create_d3d12(&adapter)?;
    print_compat_tier(&d3d12_primary)?;

    let d3d11_primary = create_d3d11(&adapter)?;
    let d3d11_secondary = create_d3d11(&adapter)?;

    let mut adapter_luid = [0u8; 8];
    adapter_luid[..4].copy_from_slice(&desc.AdapterLuid.LowPart.to_le_bytes());
    adapter_luid[4..].copy_from_slice(&desc.AdapterLuid.HighPart.to_le_bytes());
    info!("adapter LUID {:02x?}", adapter_luid);

    Ok(AdapterDevices {
        d3d11_primary,
        d3d11_secondary,
        d3d12_primary,
        d3d12_secondary,
        adapter_luid,
    })
}

fn create_d3d12(adapter: &IDXGIAdapter1) -> Result<ID3D12Device, SetupError> {
    let mut device: Option<ID3D12Device> = None;
    unsafe { D3D12CreateDevice(adapter, D3D_FEATURE_LEVEL_11_0, &mut device)? };
    device.ok_or_else(|| SetupError::NoAdapter("D3D12CreateDevice returned no device".into()))
}

fn create_d3d11(adapter: &IDXGIAdapter1) -> Result<ID3D11Device5, SetupError> {
    let feature_levels = [
        D3D_FEATURE_LEVEL_12_1,
        D3D_FEATURE_LEVEL_12_0,
        D3D_FEATURE_LEVEL_11_1,
        D3D_FEATURE_LEVEL_11_0,
    ];
    let mut device = None;
    unsafe {
        D3D11CreateDevice(
            adapter,
            D3D_DRIVER_TYPE_UNKNOWN,
            HMODULE::default(),
            D3D11_CREATE_DEVICE_BGRA_SUPPORT,
            Some(&feature_levels),
            D3D11_SDK_VERSION,
            Some(&mut device),
            None,
            None,
        )?
    };
    let device =
        device.ok_or_else(|| SetupError::NoAdapter("D3D11CreateDevice returned no device".into()))?;
    // Shared fences and OpenSharedResource1 need the Device5 surface.
    Ok(device.cast::<ID3D11Device5>()?)
}

fn print_compat_tier(device: &ID3D12Device) -> Result<(), SetupError> {
    let mut options = D3D12_FEATURE_DATA_D3D12_OPTIONS4::default();
    unsafe {
        device.CheckFeatureSupport(
            D3D12_FEATURE_D3D12_OPTIONS4,
            &mut options as *mut _ as *mut c_void,
            mem::size_of::<D3D12_FEATURE_DATA_D3D12_OPTIONS4>() as u32,
        )?;
    }
    println!(
        "D3D12 Shared Resource Compat Tier: {}",
        options.SharedResourceCompatibilityTier.0
    );
    Ok(())
}
