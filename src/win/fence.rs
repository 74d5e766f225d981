//! Cross-API fence probes.
//!
//! Each probe creates a shared fence in the source API, reopens it in the
//! target API, signals from the D3D12 end CPU-side, and waits on the other
//! end with a finite deadline. A driver that never completes the wait shows
//! up as a failure, not a hang.

use core::ffi::c_void;

use windows::Win32::Foundation::{CloseHandle, GENERIC_ALL, HANDLE, WAIT_OBJECT_0};
use windows::Win32::Graphics::Direct3D11::{ID3D11Fence, D3D11_FENCE_FLAG_SHARED};
use windows::Win32::Graphics::Direct3D12::{ID3D12Fence, D3D12_FENCE_FLAG_SHARED};
use windows::Win32::System::Threading::{CreateEventA, WaitForSingleObject};

use crate::error::ImportError;
use crate::handle::ShareableHandle;
use crate::outcome::FenceDirection;

use super::bootstrap::AdapterDevices;

const SIGNAL_VALUE: u64 = 1;
const WAIT_TIMEOUT_MS: u32 = 5000;

pub fn probe(devices: &AdapterDevices, direction: FenceDirection) -> Result<(), ImportError> {
    match direction {
        FenceDirection::D3D11ToD3D12 => {
            let fence11: ID3D11Fence = unsafe {
                devices
                    .d3d11_primary
                    .CreateFence(0, D3D11_FENCE_FLAG_SHARED)
            }?;
            let raw = unsafe { fence11.CreateSharedHandle(None, GENERIC_ALL.0, None) }?;
            let handle = ShareableHandle::nt(raw.0 as isize);
            let fence12: ID3D12Fence =
                unsafe { devices.d3d12_primary.OpenSharedHandle(as_raw(&handle)) }?;
            unsafe { fence12.Signal(SIGNAL_VALUE) }?;
            wait_on_d3d11(&fence11)
        }
        FenceDirection::D3D12ToD3D11 => {
            let fence12: ID3D12Fence = unsafe {
                devices
                    .d3d12_primary
                    .CreateFence(0, D3D12_FENCE_FLAG_SHARED)
            }?;
            let raw = unsafe {
                devices
                    .d3d12_primary
                    .CreateSharedHandle(&fence12, None, GENERIC_ALL.0, None)
            }?;
            let handle = ShareableHandle::nt(raw.0 as isize);
            let fence11: ID3D11Fence =
                unsafe { devices.d3d11_primary.OpenSharedFence(as_raw(&handle)) }?;
            unsafe { fence12.Signal(SIGNAL_VALUE) }?;
            wait_on_d3d11(&fence11)
        }
        FenceDirection::D3D12ToD3D12 => {
            let source: ID3D12Fence = unsafe {
                devices
                    .d3d12_primary
                    .CreateFence(0, D3D12_FENCE_FLAG_SHARED)
            }?;
            let raw = unsafe {
                devices
                    .d3d12_primary
                    .CreateSharedHandle(&source, None, GENERIC_ALL.0, None)
            }?;
            let handle = ShareableHandle::nt(raw.0 as isize);
            let reopened: ID3D12Fence =
                unsafe { devices.d3d12_secondary.OpenSharedHandle(as_raw(&handle)) }?;
            unsafe { source.Signal(SIGNAL_VALUE) }?;
            wait_on_d3d12(&reopened)
        }
    }
}

fn as_raw(handle: &ShareableHandle) -> HANDLE {
    HANDLE(handle.raw() as *mut c_void)
}

fn wait_on_d3d11(fence: &ID3D11Fence) -> Result<(), ImportError> {
    let event = OwnedEvent::new()?;
    unsafe { fence.SetEventOnCompletion(SIGNAL_VALUE, event.0) }?;
    event.wait()
}

fn wait_on_d3d12(fence: &ID3D12Fence) -> Result<(), ImportError> {
    let event = OwnedEvent::new()?;
    unsafe { fence.SetEventOnCompletion(SIGNAL_VALUE, event.0) }?;
    event.wait()
}

/// Auto-reset event, closed on drop.
struct OwnedEvent(HANDLE);

impl OwnedEvent {
    fn new() -> Result<Self, ImportError> {
        let raw = unsafe { CreateEventA(None, false, false, None) }?;
        Ok(Self(raw))
    }

    fn wait(&self) -> Result<(), ImportError> {
        let status = unsafe { WaitForSingleObject(self.0, WAIT_TIMEOUT_MS) };
        if status == WAIT_OBJECT_0 {
            Ok(())
        } else {
            Err(ImportError::Rejected {
                code: status.0 as i32,
                message: format!("fence wait did not complete within {WAIT_TIMEOUT_MS}ms"),
            })
        }
    }
}

impl Drop for OwnedEvent {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}
