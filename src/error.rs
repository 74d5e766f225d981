//! Error types. Expected driver rejections carry the HRESULT/VkResult code so
//! the log shows why a combination failed; platform faults during bootstrap
//! get their own type since they end the run rather than classify a row.

use thiserror::Error;

/// A source resource could not be created with the requested flags. This is
/// an expected sweep outcome, not a fault.
#[derive(Debug, Clone, Error)]
#[error("creation rejected ({code:#010x}): {message}")]
pub struct CreateError {
    pub code: i32,
    pub message: String,
}

/// Reopening a shared resource in the target API did not produce a usable
/// resource.
#[derive(Debug, Clone, Error)]
pub enum ImportError {
    #[error("import rejected ({code:#010x}): {message}")]
    Rejected { code: i32, message: String },
    /// Vulkan would not create an image for this format/handle-type pair, so
    /// there was nothing to import into.
    #[error("no image")]
    NoImage,
}

/// A fault while standing up devices or the Vulkan context. These abort the
/// run (gracefully) instead of classifying a table row.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no suitable adapter: {0}")]
    NoAdapter(String),
    #[error("vulkan unavailable: {0}")]
    Vulkan(String),
    #[cfg(windows)]
    #[error("platform error: {0}")]
    Platform(#[from] windows::core::Error),
}

#[cfg(windows)]
impl From<windows::core::Error> for CreateError {
    fn from(e: windows::core::Error) -> Self {
        CreateError {
            code: e.code().0,
            message: e.message().to_string(),
        }
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for ImportError {
    fn from(e: windows::core::Error) -> Self {
        ImportError::Rejected {
            code: e.code().0,
            message: e.message().to_string(),
        }
    }
}
