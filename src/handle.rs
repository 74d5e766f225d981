//! Ownership model for the OS handle a shared resource travels through.
//!
//! D3D11 produces two different things depending on the creation flags: a real
//! NT kernel handle (SHARED_NTHANDLE) that must be closed, or a legacy GDI
//! "handle" that is just an opaque token and must never be passed to
//! `CloseHandle`. The kind is recorded at creation time and carried with the
//! raw value; nothing downstream re-derives it from flags.

/// Which flavor of shared handle this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Real NT handle. Owned; closed on drop.
    Nt,
    /// Legacy GDI-style token. Not a kernel object, never closed.
    Legacy,
}

/// An owned shared-resource handle plus its kind tag.
#[derive(Debug)]
pub struct ShareableHandle {
    raw: isize,
    kind: HandleKind,
}

impl ShareableHandle {
    pub fn nt(raw: isize) -> Self {
        Self {
            raw,
            kind: HandleKind::Nt,
        }
    }

    pub fn legacy(raw: isize) -> Self {
        Self {
            raw,
            kind: HandleKind::Legacy,
        }
    }

    pub fn raw(&self) -> isize {
        self.raw
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn is_nt(&self) -> bool {
        self.kind == HandleKind::Nt
    }
}

#[cfg(windows)]
impl Drop for ShareableHandle {
    fn drop(&mut self) {
        if self.kind == HandleKind::Nt && self.raw != 0 {
            use windows::Win32::Foundation::{CloseHandle, HANDLE};
            unsafe {
                // Best effort; a stale handle at teardown is not actionable.
                let _ = CloseHandle(HANDLE(self.raw as *mut core::ffi::c_void));
            }
        }
    }
}
