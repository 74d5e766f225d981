//! Permutation driver: formats × flag combinations × directions.
//!
//! Strictly sequential and deterministic. Every (format, flags, direction)
//! triple produces exactly one classified row, except that source-creation
//! failures are suppressed under the default config; a section that emitted
//! no rows gets a single "Cannot create source texture" summary instead.
//! Probe failures classify, they never abort the sweep.

use std::io::{self, Write};

use log::debug;

use crate::catalog::{FormatEntry, BIND_FLAGS_11, FORMATS, MISC_FLAGS_11, RESOURCE_FLAGS_12};
use crate::error::ImportError;
use crate::outcome::{Classification, Direction, FenceDirection, SourceApi};
use crate::probe::{ShareBackend, SweepConfig};
use crate::report::Reporter;

pub fn run_texture_sweep<B: ShareBackend, W: Write>(
    backend: &mut B,
    config: SweepConfig,
    out: W,
) -> io::Result<()> {
    let mut reporter = Reporter::new(out);
    for entry in FORMATS {
        reporter.format_header(entry)?;
        for direction in Direction::ALL {
            sweep_direction(backend, config, &mut reporter, entry, direction)?;
        }
        reporter.blank_line()?;
    }
    Ok(())
}

fn sweep_direction<B: ShareBackend, W: Write>(
    backend: &mut B,
    config: SweepConfig,
    reporter: &mut Reporter<W>,
    entry: &FormatEntry,
    direction: Direction,
) -> io::Result<()> {
    reporter.direction_header(direction)?;
    let mut rows_emitted = 0usize;
    match direction.source() {
        SourceApi::D3D11 => {
            for bind in BIND_FLAGS_11 {
                for misc in MISC_FLAGS_11 {
                    let outcome =
                        match backend.create_d3d11_texture(entry.format, bind.value, misc.value) {
                            Ok(source) => {
                                // Source dropped at the end of this arm, before
                                // the next combination is tried.
                                classify_reopen(backend, direction, &source, entry)
                            }
                            Err(e) => {
                                debug!(
                                    "{} {} Bind={} Misc={}: {e}",
                                    entry.name,
                                    direction.heading(),
                                    bind.label,
                                    misc.label
                                );
                                Classification::SourceNotCreated(SourceApi::D3D11)
                            }
                        };
                    if outcome.is_source_failure() && config.skip_failed_allocations {
                        continue;
                    }
                    reporter.d3d11_row(bind.label, misc.label, outcome)?;
                    rows_emitted += 1;
                }
            }
        }
        SourceApi::D3D12 => {
            for flags in RESOURCE_FLAGS_12 {
                let outcome = match backend.create_d3d12_texture(entry.format, flags.value) {
                    Ok(source) => classify_reopen(backend, direction, &source, entry),
                    Err(e) => {
                        debug!(
                            "{} {} ResourceFlag={}: {e}",
                            entry.name,
                            direction.heading(),
                            flags.label
                        );
                        Classification::SourceNotCreated(SourceApi::D3D12)
                    }
                };
                if outcome.is_source_failure() && config.skip_failed_allocations {
                    continue;
                }
                reporter.d3d12_row(flags.label, outcome)?;
                rows_emitted += 1;
            }
        }
    }
    if rows_emitted == 0 {
        reporter.no_source_texture()?;
    }
    Ok(())
}

fn classify_reopen<B: ShareBackend>(
    backend: &mut B,
    direction: Direction,
    source: &B::SourceTexture,
    entry: &FormatEntry,
) -> Classification {
    match direction {
        Direction::D3D11ToD3D11 | Direction::D3D12ToD3D11 => {
            match backend.reopen_in_d3d11(source) {
                Ok(()) => Classification::success(),
                Err(e) => {
                    debug!("{} {}: {e}", entry.name, direction.heading());
                    Classification::Failed
                }
            }
        }
        Direction::D3D11ToD3D12 | Direction::D3D12ToD3D12 => {
            match backend.reopen_in_d3d12(source) {
                Ok(reopened) => Classification::Success {
                    simultaneous_access: reopened.simultaneous_access,
                },
                Err(e) => {
                    debug!("{} {}: {e}", entry.name, direction.heading());
                    Classification::Failed
                }
            }
        }
        Direction::D3D11ToVulkan | Direction::D3D12ToVulkan => {
            match backend.reopen_in_vulkan(source, entry.format) {
                Ok(()) => Classification::success(),
                Err(ImportError::NoImage) => Classification::NoImage,
                Err(e) => {
                    debug!("{} {}: {e}", entry.name, direction.heading());
                    Classification::Failed
                }
            }
        }
    }
}

pub fn run_fence_sweep<B: ShareBackend, W: Write>(backend: &mut B, out: W) -> io::Result<()> {
    let mut reporter = Reporter::new(out);
    for direction in FenceDirection::ALL {
        let outcome = match backend.probe_fence(direction) {
            Ok(()) => Classification::success(),
            Err(e) => {
                debug!("{}: {e}", direction.heading());
                Classification::Failed
            }
        };
        reporter.fence_row(direction, outcome)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BindFlags, DxgiFormat, MiscFlags, ResourceFlags};
    use crate::error::CreateError;
    use crate::probe::ReopenedTexture;

    /// Scripted backend: each knob forces one behavior across the sweep.
    struct MockBackend {
        d3d11_creates: bool,
        d3d12_creates: bool,
        reopens_succeed: bool,
        simultaneous_access: bool,
        vulkan_no_image: bool,
        fences_succeed: bool,
        live_sources: usize,
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                d3d11_creates: true,
                d3d12_creates: true,
                reopens_succeed: true,
                simultaneous_access: false,
                vulkan_no_image: false,
                fences_succeed: true,
                live_sources: 0,
            }
        }
    }

    struct MockSource;

    impl ShareBackend for MockBackend {
        type SourceTexture = MockSource;

        fn create_d3d11_texture(
            &mut self,
            _format: DxgiFormat,
            _bind: BindFlags,
            _misc: MiscFlags,
        ) -> Result<MockSource, CreateError> {
            if self.d3d11_creates {
                self.live_sources += 1;
                assert_eq!(self.live_sources, 1, "sources must not overlap");
                Ok(MockSource)
            } else {
                Err(CreateError {
                    code: -1,
                    message: "scripted".into(),
                })
            }
        }

        fn create_d3d12_texture(
            &mut self,
            _format: DxgiFormat,
            _flags: ResourceFlags,
        ) -> Result<MockSource, CreateError> {
            if self.d3d12_creates {
                self.live_sources += 1;
                assert_eq!(self.live_sources, 1, "sources must not overlap");
                Ok(MockSource)
            } else {
                Err(CreateError {
                    code: -1,
                    message: "scripted".into(),
                })
            }
        }

        fn reopen_in_d3d11(&mut self, _source: &MockSource) -> Result<(), ImportError> {
            self.live_sources -= 1;
            if self.reopens_succeed {
                Ok(())
            } else {
                Err(ImportError::Rejected {
                    code: -1,
                    message: "scripted".into(),
                })
            }
        }

        fn reopen_in_d3d12(
            &mut self,
            _source: &MockSource,
        ) -> Result<ReopenedTexture, ImportError> {
            self.live_sources -= 1;
            if self.reopens_succeed {
                Ok(ReopenedTexture {
                    simultaneous_access: self.simultaneous_access,
                })
            } else {
                Err(ImportError::Rejected {
                    code: -1,
                    message: "scripted".into(),
                })
            }
        }

        fn reopen_in_vulkan(
            &mut self,
            _source: &MockSource,
            _format: DxgiFormat,
        ) -> Result<(), ImportError> {
            self.live_sources -= 1;
            if self.vulkan_no_image {
                Err(ImportError::NoImage)
            } else if self.reopens_succeed {
                Ok(())
            } else {
                Err(ImportError::Rejected {
                    code: -1,
                    message: "scripted".into(),
                })
            }
        }

        fn probe_fence(&mut self, _direction: FenceDirection) -> Result<(), ImportError> {
            if self.fences_succeed {
                Ok(())
            } else {
                Err(ImportError::Rejected {
                    code: -1,
                    message: "scripted".into(),
                })
            }
        }
    }

    fn sweep(backend: &mut MockBackend, config: SweepConfig) -> String {
        let mut buf = Vec::new();
        run_texture_sweep(backend, config, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    // Per format: 3 D3D11-sourced directions x (3 bind x 4 misc) rows plus
    // 3 D3D12-sourced directions x 4 rows.
    const ROWS_PER_FORMAT: usize = 3 * 12 + 3 * 4;

    #[test]
    fn test_one_row_per_triple_when_everything_succeeds() {
        let mut backend = MockBackend::default();
        let out = sweep(&mut backend, SweepConfig::default());
        assert_eq!(count(&out, "Format DXGI_FORMAT_"), FORMATS.len());
        assert_eq!(
            count(&out, " = Success\n"),
            FORMATS.len() * ROWS_PER_FORMAT
        );
        assert_eq!(count(&out, "Cannot create source texture"), 0);
        assert_eq!(count(&out, "Unknown"), 0);
    }

    #[test]
    fn test_direction_headers_cover_all_six() {
        let mut backend = MockBackend::default();
        let out = sweep(&mut backend, SweepConfig::default());
        for direction in Direction::ALL {
            assert_eq!(
                count(&out, &format!("  {}:\n", direction.heading())),
                FORMATS.len()
            );
        }
    }

    #[test]
    fn test_creation_failures_collapse_to_summary() {
        let mut backend = MockBackend {
            d3d11_creates: false,
            d3d12_creates: false,
            ..MockBackend::default()
        };
        let out = sweep(&mut backend, SweepConfig::default());
        // One summary per (format, direction) section, no rows at all.
        assert_eq!(
            count(&out, "    Cannot create source texture\n"),
            FORMATS.len() * Direction::ALL.len()
        );
        assert_eq!(count(&out, "Texture not created"), 0);
        assert_eq!(count(&out, "= Success"), 0);
    }

    #[test]
    fn test_show_failed_allocations_emits_rows_not_summary() {
        let mut backend = MockBackend {
            d3d11_creates: false,
            d3d12_creates: false,
            ..MockBackend::default()
        };
        let config = SweepConfig {
            skip_failed_allocations: false,
        };
        let out = sweep(&mut backend, config);
        assert_eq!(
            count(&out, " = D3D11 Texture not created\n"),
            FORMATS.len() * 3 * 12
        );
        assert_eq!(
            count(&out, " = D3D12 Texture not created\n"),
            FORMATS.len() * 3 * 4
        );
        assert_eq!(count(&out, "Cannot create source texture"), 0);
    }

    #[test]
    fn test_import_failure_classifies_as_failed() {
        let mut backend = MockBackend {
            reopens_succeed: false,
            ..MockBackend::default()
        };
        let out = sweep(&mut backend, SweepConfig::default());
        assert_eq!(
            count(&out, " = Failed\n"),
            FORMATS.len() * ROWS_PER_FORMAT
        );
        assert_eq!(count(&out, "Unknown"), 0);
    }

    #[test]
    fn test_vulkan_image_refusal_reports_no_image() {
        let mut backend = MockBackend {
            vulkan_no_image: true,
            ..MockBackend::default()
        };
        let out = sweep(&mut backend, SweepConfig::default());
        // Two Vulkan directions: 12 D3D11-sourced rows + 4 D3D12-sourced rows
        // per format.
        assert_eq!(count(&out, " = No image\n"), FORMATS.len() * (12 + 4));
    }

    #[test]
    fn test_simultaneous_access_surfaces_in_d3d12_rows() {
        let mut backend = MockBackend {
            simultaneous_access: true,
            ..MockBackend::default()
        };
        let out = sweep(&mut backend, SweepConfig::default());
        // The two D3D12-target directions: 12 + 4 rows per format.
        assert_eq!(
            count(&out, " = Success (ALLOW_SIMULTANEOUS_ACCESS)\n"),
            FORMATS.len() * (12 + 4)
        );
    }

    #[test]
    fn test_fence_sweep_one_row_per_direction() {
        let mut backend = MockBackend::default();
        let mut buf = Vec::new();
        run_fence_sweep(&mut backend, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "D3D11 fence shared to D3D12: Success\n\
             D3D12 fence shared to D3D11: Success\n\
             D3D12 fence shared to D3D12: Success\n"
        );
    }

    #[test]
    fn test_fence_failure_never_aborts() {
        let mut backend = MockBackend {
            fences_succeed: false,
            ..MockBackend::default()
        };
        let mut buf = Vec::new();
        run_fence_sweep(&mut backend, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(count(&out, ": Failed\n"), FenceDirection::ALL.len());
    }
}
