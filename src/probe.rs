//! Backend seam between the permutation driver and the graphics APIs.
//!
//! The sweep logic never touches a driver directly; it goes through
//! [`ShareBackend`]. The Windows backend implements it against real D3D11,
//! D3D12 and Vulkan devices, and tests implement it with a scripted mock, so
//! the row-emission rules can be verified anywhere.

use crate::catalog::{BindFlags, DxgiFormat, MiscFlags, ResourceFlags};
use crate::error::{CreateError, ImportError};
use crate::outcome::FenceDirection;

/// Sweep behavior knobs.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Suppress rows whose source texture could not be created. The
    /// per-section "Cannot create source texture" summary still appears when
    /// nothing at all could be created.
    pub skip_failed_allocations: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            skip_failed_allocations: true,
        }
    }
}

/// What a successful reopen reports back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReopenedTexture {
    /// The reopened D3D12 description carried ALLOW_SIMULTANEOUS_ACCESS.
    pub simultaneous_access: bool,
}

/// One probeable platform. A source texture lives for exactly one probe; the
/// driver drops it before moving to the next flag combination.
pub trait ShareBackend {
    /// Source texture plus whatever the backend needs to reopen it.
    type SourceTexture;

    fn create_d3d11_texture(
        &mut self,
        format: DxgiFormat,
        bind: BindFlags,
        misc: MiscFlags,
    ) -> Result<Self::SourceTexture, CreateError>;

    fn create_d3d12_texture(
        &mut self,
        format: DxgiFormat,
        flags: ResourceFlags,
    ) -> Result<Self::SourceTexture, CreateError>;

    fn reopen_in_d3d11(&mut self, source: &Self::SourceTexture) -> Result<(), ImportError>;

    fn reopen_in_d3d12(
        &mut self,
        source: &Self::SourceTexture,
    ) -> Result<ReopenedTexture, ImportError>;

    fn reopen_in_vulkan(
        &mut self,
        source: &Self::SourceTexture,
        format: DxgiFormat,
    ) -> Result<(), ImportError>;

    /// Create a shared fence in the direction's source API, reopen it in the
    /// target API, signal on the D3D12 side and wait on the other. `Ok(())`
    /// means the wait completed within the deadline.
    fn probe_fence(&mut self, direction: FenceDirection) -> Result<(), ImportError>;
}
