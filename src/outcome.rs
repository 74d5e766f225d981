//! Probe outcome model: directions swept and how each probe classified.

use std::fmt;

/// Which API allocated the source resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceApi {
    D3D11,
    D3D12,
}

impl fmt::Display for SourceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceApi::D3D11 => write!(f, "D3D11"),
            SourceApi::D3D12 => write!(f, "D3D12"),
        }
    }
}

/// A texture sharing direction: allocate in `source()`, reopen in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    D3D11ToD3D11,
    D3D11ToD3D12,
    D3D11ToVulkan,
    D3D12ToD3D11,
    D3D12ToD3D12,
    D3D12ToVulkan,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::D3D11ToD3D11,
        Direction::D3D11ToD3D12,
        Direction::D3D11ToVulkan,
        Direction::D3D12ToD3D11,
        Direction::D3D12ToD3D12,
        Direction::D3D12ToVulkan,
    ];

    pub fn source(self) -> SourceApi {
        match self {
            Direction::D3D11ToD3D11 | Direction::D3D11ToD3D12 | Direction::D3D11ToVulkan => {
                SourceApi::D3D11
            }
            Direction::D3D12ToD3D11 | Direction::D3D12ToD3D12 | Direction::D3D12ToVulkan => {
                SourceApi::D3D12
            }
        }
    }

    /// Section heading as printed in the report.
    pub fn heading(self) -> &'static str {
        match self {
            Direction::D3D11ToD3D11 => "D3D11 shared to D3D11",
            Direction::D3D11ToD3D12 => "D3D11 shared to D3D12",
            Direction::D3D11ToVulkan => "D3D11 shared to Vulkan",
            Direction::D3D12ToD3D11 => "D3D12 shared to D3D11",
            Direction::D3D12ToD3D12 => "D3D12 shared to D3D12",
            Direction::D3D12ToVulkan => "D3D12 shared to Vulkan",
        }
    }
}

/// A fence sharing direction: create in the first API, signal/wait across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceDirection {
    D3D11ToD3D12,
    D3D12ToD3D11,
    D3D12ToD3D12,
}

impl FenceDirection {
    pub const ALL: [FenceDirection; 3] = [
        FenceDirection::D3D11ToD3D12,
        FenceDirection::D3D12ToD3D11,
        FenceDirection::D3D12ToD3D12,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            FenceDirection::D3D11ToD3D12 => "D3D11 fence shared to D3D12",
            FenceDirection::D3D12ToD3D11 => "D3D12 fence shared to D3D11",
            FenceDirection::D3D12ToD3D12 => "D3D12 fence shared to D3D12",
        }
    }
}

/// How a single probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Reopened successfully; `simultaneous_access` is set when the reopened
    /// D3D12 description carries ALLOW_SIMULTANEOUS_ACCESS.
    Success { simultaneous_access: bool },
    /// The import or the cross-API wait was rejected.
    Failed,
    /// The source resource itself could not be created with these flags.
    SourceNotCreated(SourceApi),
    /// Vulkan refused to even create an image for this format/handle type.
    NoImage,
    /// Probe did not run to a classification. Kept for display parity; the
    /// sweep never produces it.
    Unknown,
}

impl Classification {
    pub fn success() -> Self {
        Classification::Success {
            simultaneous_access: false,
        }
    }

    /// Whether this row should be suppressed when skipping failed allocations.
    pub fn is_source_failure(self) -> bool {
        matches!(self, Classification::SourceNotCreated(_))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Success {
                simultaneous_access: false,
            } => write!(f, "Success"),
            Classification::Success {
                simultaneous_access: true,
            } => write!(f, "Success (ALLOW_SIMULTANEOUS_ACCESS)"),
            Classification::Failed => write!(f, "Failed"),
            Classification::SourceNotCreated(api) => write!(f, "{api} Texture not created"),
            Classification::NoImage => write!(f, "No image"),
            Classification::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strings() {
        assert_eq!(Classification::success().to_string(), "Success");
        assert_eq!(
            Classification::Success {
                simultaneous_access: true
            }
            .to_string(),
            "Success (ALLOW_SIMULTANEOUS_ACCESS)"
        );
        assert_eq!(Classification::Failed.to_string(), "Failed");
        assert_eq!(
            Classification::SourceNotCreated(SourceApi::D3D11).to_string(),
            "D3D11 Texture not created"
        );
        assert_eq!(
            Classification::SourceNotCreated(SourceApi::D3D12).to_string(),
            "D3D12 Texture not created"
        );
        assert_eq!(Classification::NoImage.to_string(), "No image");
        assert_eq!(Classification::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_direction_sources() {
        assert_eq!(Direction::D3D11ToVulkan.source(), SourceApi::D3D11);
        assert_eq!(Direction::D3D12ToD3D11.source(), SourceApi::D3D12);
        let d3d11_sourced = Direction::ALL
            .iter()
            .filter(|d| d.source() == SourceApi::D3D11)
            .count();
        assert_eq!(d3d11_sourced, 3);
    }

    #[test]
    fn test_source_failure_filter() {
        assert!(Classification::SourceNotCreated(SourceApi::D3D11).is_source_failure());
        assert!(!Classification::Failed.is_source_failure());
        assert!(!Classification::success().is_source_failure());
    }

    #[test]
    fn test_headings() {
        assert_eq!(Direction::D3D11ToD3D11.heading(), "D3D11 shared to D3D11");
        assert_eq!(
            FenceDirection::D3D12ToD3D12.heading(),
            "D3D12 fence shared to D3D12"
        );
    }
}
