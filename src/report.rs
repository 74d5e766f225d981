//! Table output. One writer, fixed column widths, no retained state.
//!
//! The widths keep the `= <outcome>` column aligned down a section so the
//! table scans vertically: 26 for bind labels, 80 for misc-combination
//! labels, 104 for D3D12 resource-flag combinations.

use std::io::{self, Write};

use crate::catalog::FormatEntry;
use crate::outcome::{Classification, Direction, FenceDirection};

pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn format_header(&mut self, entry: &FormatEntry) -> io::Result<()> {
        writeln!(self.out, "Format {}", entry.name)
    }

    pub fn direction_header(&mut self, direction: Direction) -> io::Result<()> {
        writeln!(self.out, "  {}:", direction.heading())
    }

    /// Row for a D3D11-sourced probe.
    pub fn d3d11_row(
        &mut self,
        bind_label: &str,
        misc_label: &str,
        outcome: Classification,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "    Bind={bind_label:<26} Misc={misc_label:<80} = {outcome}"
        )
    }

    /// Row for a D3D12-sourced probe.
    pub fn d3d12_row(&mut self, flag_label: &str, outcome: Classification) -> io::Result<()> {
        writeln!(self.out, "    ResourceFlag={flag_label:<104} = {outcome}")
    }

    /// Printed once per section when no flag combination yielded a source.
    pub fn no_source_texture(&mut self) -> io::Result<()> {
        writeln!(self.out, "    Cannot create source texture")
    }

    pub fn fence_row(
        &mut self,
        direction: FenceDirection,
        outcome: Classification,
    ) -> io::Result<()> {
        writeln!(self.out, "{}: {outcome}", direction.heading())
    }

    pub fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FORMATS;

    fn capture(f: impl FnOnce(&mut Reporter<&mut Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf);
        f(&mut reporter);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_header() {
        let s = capture(|r| r.format_header(&FORMATS[1]).unwrap());
        assert_eq!(s, "Format DXGI_FORMAT_D24_UNORM_S8_UINT\n");
    }

    #[test]
    fn test_d3d11_row_padding() {
        let s = capture(|r| {
            r.d3d11_row(
                "D3D11_BIND_RENDER_TARGET",
                "D3D11_RESOURCE_MISC_SHARED",
                Classification::success(),
            )
            .unwrap()
        });
        // Bind label padded to 26, misc label to 80.
        assert!(s.starts_with("    Bind=D3D11_BIND_RENDER_TARGET   Misc="));
        let misc_start = s.find("Misc=").unwrap() + "Misc=".len();
        let eq = s.rfind(" = ").unwrap();
        assert_eq!(eq - misc_start, 80);
        assert!(s.ends_with(" = Success\n"));
    }

    #[test]
    fn test_d3d12_row_padding() {
        let s = capture(|r| {
            r.d3d12_row(
                "D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET",
                Classification::Success {
                    simultaneous_access: true,
                },
            )
            .unwrap()
        });
        let start = s.find("ResourceFlag=").unwrap() + "ResourceFlag=".len();
        let eq = s.rfind(" = ").unwrap();
        assert_eq!(eq - start, 104);
        assert!(s.ends_with(" = Success (ALLOW_SIMULTANEOUS_ACCESS)\n"));
    }

    #[test]
    fn test_no_source_summary() {
        let s = capture(|r| {
            r.direction_header(Direction::D3D11ToD3D12).unwrap();
            r.no_source_texture().unwrap();
        });
        assert_eq!(
            s,
            "  D3D11 shared to D3D12:\n    Cannot create source texture\n"
        );
    }

    #[test]
    fn test_fence_row() {
        let s = capture(|r| {
            r.fence_row(FenceDirection::D3D11ToD3D12, Classification::Failed)
                .unwrap()
        });
        assert_eq!(s, "D3D11 fence shared to D3D12: Failed\n");
    }
}
