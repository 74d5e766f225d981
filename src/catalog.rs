//! Format and creation-flag catalogs for the sharing sweep.
//!
//! Everything here is static data: the candidate pixel formats and the
//! per-API creation-flag combinations the sweep permutes over. Each entry
//! pairs the machine value with the SDK constant spelling so the report
//! tables read like the headers. Order is fixed; two runs against the same
//! driver must print identical tables.

/// DXGI format code, kept as a plain integer so the catalog and the sweep
/// driver build on every platform. The Windows backend converts to the SDK
/// type at the driver-call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DxgiFormat(pub i32);

impl DxgiFormat {
    pub const R16G16B16A16_TYPELESS: Self = Self(9);
    pub const R16G16B16A16_FLOAT: Self = Self(10);
    pub const R16G16B16A16_UNORM: Self = Self(11);
    pub const R16G16B16A16_UINT: Self = Self(12);
    pub const R16G16B16A16_SNORM: Self = Self(13);
    pub const R16G16B16A16_SINT: Self = Self(14);
    pub const D32_FLOAT_S8X24_UINT: Self = Self(20);
    pub const R32_FLOAT_X8X24_TYPELESS: Self = Self(21);
    pub const X32_TYPELESS_G8X24_UINT: Self = Self(22);
    pub const R10G10B10A2_TYPELESS: Self = Self(23);
    pub const R10G10B10A2_UNORM: Self = Self(24);
    pub const R10G10B10A2_UINT: Self = Self(25);
    pub const R11G11B10_FLOAT: Self = Self(26);
    pub const R8G8B8A8_TYPELESS: Self = Self(27);
    pub const R8G8B8A8_UNORM: Self = Self(28);
    pub const R8G8B8A8_UNORM_SRGB: Self = Self(29);
    pub const R8G8B8A8_UINT: Self = Self(30);
    pub const R8G8B8A8_SNORM: Self = Self(31);
    pub const R8G8B8A8_SINT: Self = Self(32);
    pub const R32_TYPELESS: Self = Self(39);
    pub const D32_FLOAT: Self = Self(40);
    pub const R32_FLOAT: Self = Self(41);
    pub const R32_UINT: Self = Self(42);
    pub const R32_SINT: Self = Self(43);
    pub const R24G8_TYPELESS: Self = Self(44);
    pub const D24_UNORM_S8_UINT: Self = Self(45);
    pub const R24_UNORM_X8_TYPELESS: Self = Self(46);
    pub const X24_TYPELESS_G8_UINT: Self = Self(47);
    pub const R16_TYPELESS: Self = Self(53);
    pub const R16_FLOAT: Self = Self(54);
    pub const D16_UNORM: Self = Self(55);
    pub const R16_UNORM: Self = Self(56);
    pub const R16_UINT: Self = Self(57);
    pub const R16_SNORM: Self = Self(58);
    pub const R16_SINT: Self = Self(59);
    pub const B8G8R8A8_UNORM: Self = Self(87);
    pub const B8G8R8X8_UNORM: Self = Self(88);
    pub const B8G8R8A8_TYPELESS: Self = Self(90);
    pub const B8G8R8A8_UNORM_SRGB: Self = Self(91);
    pub const B8G8R8X8_TYPELESS: Self = Self(92);
    pub const B8G8R8X8_UNORM_SRGB: Self = Self(93);
}

/// D3D11 bind flags (`D3D11_BIND_FLAG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindFlags(pub u32);

impl BindFlags {
    pub const SHADER_RESOURCE: Self = Self(0x8);
    pub const RENDER_TARGET: Self = Self(0x20);
    pub const DEPTH_STENCIL: Self = Self(0x40);
}

/// D3D11 resource-misc flags (`D3D11_RESOURCE_MISC_FLAG`), sharing subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiscFlags(pub u32);

impl MiscFlags {
    pub const SHARED: Self = Self(0x2);
    pub const SHARED_KEYEDMUTEX: Self = Self(0x10);
    pub const SHARED_NTHANDLE: Self = Self(0x800);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the created texture's shared handle will be an NT handle.
    pub fn is_nt_handle(self) -> bool {
        self.0 & Self::SHARED_NTHANDLE.0 != 0
    }

    /// Whether any sharing capability bit is set. Every catalog entry must
    /// satisfy this; the factory relies on it as a precondition.
    pub fn has_sharing_bit(self) -> bool {
        self.0 & (Self::SHARED.0 | Self::SHARED_KEYEDMUTEX.0) != 0
    }
}

/// D3D12 resource flags (`D3D12_RESOURCE_FLAGS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceFlags(pub i32);

impl ResourceFlags {
    pub const ALLOW_RENDER_TARGET: Self = Self(0x1);
    pub const ALLOW_DEPTH_STENCIL: Self = Self(0x2);
    pub const DENY_SHADER_RESOURCE: Self = Self(0x8);
    pub const ALLOW_SIMULTANEOUS_ACCESS: Self = Self(0x20);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// A candidate format together with its display name.
#[derive(Debug, Clone, Copy)]
pub struct FormatEntry {
    pub format: DxgiFormat,
    pub name: &'static str,
}

/// A flag value together with its display label.
#[derive(Debug, Clone, Copy)]
pub struct FlagEntry<K: 'static> {
    pub value: K,
    pub label: &'static str,
}

const fn fmt(format: DxgiFormat, name: &'static str) -> FormatEntry {
    FormatEntry { format, name }
}

/// Candidate formats, ordered as the tables should print. The less common
/// block (video, block-compressed, palettized) the original hardware matrix
/// excluded by default is likewise excluded here.
pub const FORMATS: &[FormatEntry] = &[
    fmt(DxgiFormat::R24G8_TYPELESS, "DXGI_FORMAT_R24G8_TYPELESS"),
    fmt(DxgiFormat::D24_UNORM_S8_UINT, "DXGI_FORMAT_D24_UNORM_S8_UINT"),
    fmt(
        DxgiFormat::R24_UNORM_X8_TYPELESS,
        "DXGI_FORMAT_R24_UNORM_X8_TYPELESS",
    ),
    fmt(
        DxgiFormat::X24_TYPELESS_G8_UINT,
        "DXGI_FORMAT_X24_TYPELESS_G8_UINT",
    ),
    fmt(
        DxgiFormat::D32_FLOAT_S8X24_UINT,
        "DXGI_FORMAT_D32_FLOAT_S8X24_UINT",
    ),
    fmt(
        DxgiFormat::R32_FLOAT_X8X24_TYPELESS,
        "DXGI_FORMAT_R32_FLOAT_X8X24_TYPELESS",
    ),
    fmt(
        DxgiFormat::X32_TYPELESS_G8X24_UINT,
        "DXGI_FORMAT_X32_TYPELESS_G8X24_UINT",
    ),
    fmt(DxgiFormat::R32_TYPELESS, "DXGI_FORMAT_R32_TYPELESS"),
    fmt(DxgiFormat::D32_FLOAT, "DXGI_FORMAT_D32_FLOAT"),
    fmt(DxgiFormat::R32_FLOAT, "DXGI_FORMAT_R32_FLOAT"),
    fmt(DxgiFormat::R32_UINT, "DXGI_FORMAT_R32_UINT"),
    fmt(DxgiFormat::R32_SINT, "DXGI_FORMAT_R32_SINT"),
    fmt(DxgiFormat::R16_TYPELESS, "DXGI_FORMAT_R16_TYPELESS"),
    fmt(DxgiFormat::R16_FLOAT, "DXGI_FORMAT_R16_FLOAT"),
    fmt(DxgiFormat::D16_UNORM, "DXGI_FORMAT_D16_UNORM"),
    fmt(DxgiFormat::R16_UNORM, "DXGI_FORMAT_R16_UNORM"),
    fmt(DxgiFormat::R16_UINT, "DXGI_FORMAT_R16_UINT"),
    fmt(DxgiFormat::R16_SNORM, "DXGI_FORMAT_R16_SNORM"),
    fmt(DxgiFormat::R16_SINT, "DXGI_FORMAT_R16_SINT"),
    fmt(DxgiFormat::R8G8B8A8_TYPELESS, "DXGI_FORMAT_R8G8B8A8_TYPELESS"),
    fmt(DxgiFormat::R8G8B8A8_UNORM, "DXGI_FORMAT_R8G8B8A8_UNORM"),
    fmt(
        DxgiFormat::R8G8B8A8_UNORM_SRGB,
        "DXGI_FORMAT_R8G8B8A8_UNORM_SRGB",
    ),
    fmt(DxgiFormat::R8G8B8A8_UINT, "DXGI_FORMAT_R8G8B8A8_UINT"),
    fmt(DxgiFormat::R8G8B8A8_SNORM, "DXGI_FORMAT_R8G8B8A8_SNORM"),
    fmt(DxgiFormat::R8G8B8A8_SINT, "DXGI_FORMAT_R8G8B8A8_SINT"),
    fmt(DxgiFormat::B8G8R8A8_UNORM, "DXGI_FORMAT_B8G8R8A8_UNORM"),
    fmt(DxgiFormat::B8G8R8X8_UNORM, "DXGI_FORMAT_B8G8R8X8_UNORM"),
    fmt(DxgiFormat::B8G8R8A8_TYPELESS, "DXGI_FORMAT_B8G8R8A8_TYPELESS"),
    fmt(
        DxgiFormat::B8G8R8A8_UNORM_SRGB,
        "DXGI_FORMAT_B8G8R8A8_UNORM_SRGB",
    ),
    fmt(DxgiFormat::B8G8R8X8_TYPELESS, "DXGI_FORMAT_B8G8R8X8_TYPELESS"),
    fmt(
        DxgiFormat::B8G8R8X8_UNORM_SRGB,
        "DXGI_FORMAT_B8G8R8X8_UNORM_SRGB",
    ),
    fmt(
        DxgiFormat::R10G10B10A2_TYPELESS,
        "DXGI_FORMAT_R10G10B10A2_TYPELESS",
    ),
    fmt(DxgiFormat::R10G10B10A2_UNORM, "DXGI_FORMAT_R10G10B10A2_UNORM"),
    fmt(DxgiFormat::R10G10B10A2_UINT, "DXGI_FORMAT_R10G10B10A2_UINT"),
    fmt(DxgiFormat::R11G11B10_FLOAT, "DXGI_FORMAT_R11G11B10_FLOAT"),
    fmt(
        DxgiFormat::R16G16B16A16_TYPELESS,
        "DXGI_FORMAT_R16G16B16A16_TYPELESS",
    ),
    fmt(
        DxgiFormat::R16G16B16A16_FLOAT,
        "DXGI_FORMAT_R16G16B16A16_FLOAT",
    ),
    fmt(
        DxgiFormat::R16G16B16A16_UNORM,
        "DXGI_FORMAT_R16G16B16A16_UNORM",
    ),
    fmt(DxgiFormat::R16G16B16A16_UINT, "DXGI_FORMAT_R16G16B16A16_UINT"),
    fmt(
        DxgiFormat::R16G16B16A16_SNORM,
        "DXGI_FORMAT_R16G16B16A16_SNORM",
    ),
    fmt(DxgiFormat::R16G16B16A16_SINT, "DXGI_FORMAT_R16G16B16A16_SINT"),
];

/// D3D11 bind-flag candidates.
pub const BIND_FLAGS_11: &[FlagEntry<BindFlags>] = &[
    FlagEntry {
        value: BindFlags::DEPTH_STENCIL,
        label: "D3D11_BIND_DEPTH_STENCIL",
    },
    FlagEntry {
        value: BindFlags::RENDER_TARGET,
        label: "D3D11_BIND_RENDER_TARGET",
    },
    FlagEntry {
        value: BindFlags::SHADER_RESOURCE,
        label: "D3D11_BIND_SHADER_RESOURCE",
    },
];

/// D3D11 misc-flag combinations. Every entry carries a sharing bit.
pub const MISC_FLAGS_11: &[FlagEntry<MiscFlags>] = &[
    FlagEntry {
        value: MiscFlags::SHARED,
        label: "D3D11_RESOURCE_MISC_SHARED",
    },
    FlagEntry {
        value: MiscFlags::SHARED.union(MiscFlags::SHARED_NTHANDLE),
        label: "D3D11_RESOURCE_MISC_SHARED | D3D11_RESOURCE_MISC_SHARED_NTHANDLE",
    },
    FlagEntry {
        value: MiscFlags::SHARED_KEYEDMUTEX,
        label: "D3D11_RESOURCE_MISC_SHARED_KEYEDMUTEX",
    },
    FlagEntry {
        value: MiscFlags::SHARED_NTHANDLE.union(MiscFlags::SHARED_KEYEDMUTEX),
        label: "D3D11_RESOURCE_MISC_SHARED_NTHANDLE | D3D11_RESOURCE_MISC_SHARED_KEYEDMUTEX",
    },
];

/// D3D12 resource-flag combinations.
pub const RESOURCE_FLAGS_12: &[FlagEntry<ResourceFlags>] = &[
    FlagEntry {
        value: ResourceFlags::ALLOW_DEPTH_STENCIL,
        label: "D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL",
    },
    FlagEntry {
        value: ResourceFlags::ALLOW_DEPTH_STENCIL.union(ResourceFlags::DENY_SHADER_RESOURCE),
        label: "D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL | D3D12_RESOURCE_FLAG_DENY_SHADER_RESOURCE",
    },
    FlagEntry {
        value: ResourceFlags::ALLOW_RENDER_TARGET,
        label: "D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET",
    },
    FlagEntry {
        value: ResourceFlags::ALLOW_RENDER_TARGET.union(ResourceFlags::ALLOW_SIMULTANEOUS_ACCESS),
        label:
            "D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET | D3D12_RESOURCE_FLAG_ALLOW_SIMULTANEOUS_ACCESS",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(FORMATS.len(), 41);
        assert_eq!(BIND_FLAGS_11.len(), 3);
        assert_eq!(MISC_FLAGS_11.len(), 4);
        assert_eq!(RESOURCE_FLAGS_12.len(), 4);
    }

    #[test]
    fn test_format_codes_match_dxgi() {
        // Spot checks against the DXGI_FORMAT enumeration values.
        assert_eq!(DxgiFormat::D24_UNORM_S8_UINT.0, 45);
        assert_eq!(DxgiFormat::R8G8B8A8_UNORM.0, 28);
        assert_eq!(DxgiFormat::B8G8R8A8_UNORM.0, 87);
        assert_eq!(DxgiFormat::R16G16B16A16_FLOAT.0, 10);
        assert_eq!(DxgiFormat::D32_FLOAT.0, 40);
    }

    #[test]
    fn test_no_duplicate_formats() {
        for (i, a) in FORMATS.iter().enumerate() {
            for b in &FORMATS[i + 1..] {
                assert_ne!(a.format, b.format, "{} duplicated", a.name);
            }
        }
    }

    #[test]
    fn test_every_misc_entry_carries_a_sharing_bit() {
        // The factory does not validate this; the catalog must guarantee it.
        for entry in MISC_FLAGS_11 {
            assert!(
                entry.value.has_sharing_bit(),
                "{} has no sharing bit",
                entry.label
            );
        }
    }

    #[test]
    fn test_nt_handle_detection() {
        assert!(!MISC_FLAGS_11[0].value.is_nt_handle());
        assert!(MISC_FLAGS_11[1].value.is_nt_handle());
        assert!(!MISC_FLAGS_11[2].value.is_nt_handle());
        assert!(MISC_FLAGS_11[3].value.is_nt_handle());
    }

    #[test]
    fn test_misc_flag_union() {
        let combo = MiscFlags::SHARED.union(MiscFlags::SHARED_NTHANDLE);
        assert_eq!(combo.0, 0x802);
        assert!(combo.is_nt_handle());
        assert!(combo.has_sharing_bit());
    }

    #[test]
    fn test_simultaneous_access_combo() {
        let combo = RESOURCE_FLAGS_12[3].value;
        assert_eq!(
            combo.0,
            ResourceFlags::ALLOW_RENDER_TARGET.0 | ResourceFlags::ALLOW_SIMULTANEOUS_ACCESS.0
        );
    }

    #[test]
    fn test_labels_match_values() {
        assert_eq!(FORMATS[1].name, "DXGI_FORMAT_D24_UNORM_S8_UINT");
        assert_eq!(BIND_FLAGS_11[0].label, "D3D11_BIND_DEPTH_STENCIL");
        assert!(MISC_FLAGS_11[1].label.contains("NTHANDLE"));
        assert!(RESOURCE_FLAGS_12[3].label.contains("SIMULTANEOUS_ACCESS"));
    }
}
