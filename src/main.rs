mod catalog;
mod error;
mod handle;
mod outcome;
mod probe;
mod report;
mod sweep;
#[cfg(windows)]
mod win;

use clap::Parser;

use crate::probe::SweepConfig;

/// Probes which D3D11/D3D12 texture and fence creation-flag combinations
/// survive being shared and reopened in another graphics API.
#[derive(Parser, Debug)]
#[command(name = "shareprobe", version)]
struct Args {
    /// Print a row for every flag combination whose source texture could not
    /// be created, instead of collapsing them into a single summary line.
    #[arg(long)]
    show_failed_allocations: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = SweepConfig {
        skip_failed_allocations: !args.show_failed_allocations,
    };
    // Diagnostics always exit cleanly; a broken platform is a finding, not a
    // process failure.
    run(config);
}

#[cfg(windows)]
fn run(config: SweepConfig) {
    use log::error;

    let mut backend = match win::WindowsBackend::new() {
        Ok(backend) => backend,
        Err(e) => {
            error!("setup failed: {e}");
            println!("Cannot initialize devices: {e}");
            return;
        }
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = sweep::run_texture_sweep(&mut backend, config, &mut out) {
        error!("texture sweep aborted: {e}");
        return;
    }
    if let Err(e) = sweep::run_fence_sweep(&mut backend, &mut out) {
        error!("fence sweep aborted: {e}");
    }
}

#[cfg(not(windows))]
fn run(_config: SweepConfig) {
    println!("shareprobe requires Direct3D; nothing to probe on this platform.");
}
