//! update-kernelspecs - Entry Point
//! Probes the installed socket.io version and stamps it into every kernel spec.

mod logging;
mod settings;

use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

// Import workspace crates
use kernelspec_sync_core::application::constants::USAGE_EXIT_CODE;
use kernelspec_sync_core::application::{check_args, KernelspecSyncService};
use kernelspec_sync_infra_fs::FsKernelRegistry;
use kernelspec_sync_infra_system::NpmVersionProbe;

use logging::{init_logging, LogFormat};
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // 1. Argument gate: the program name and nothing else
    let args: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    if let Err(usage) = check_args(&args) {
        println!("{usage}");
        return Ok(ExitCode::from(USAGE_EXIT_CODE));
    }

    // 2. Initialize logging
    init_logging(LogFormat::from_env()).context("failed to initialize logging")?;
    info!("update-kernelspecs v{} starting", VERSION);

    // 3. Load configuration
    let settings = Settings::load().context("failed to load settings")?;
    settings.validate()?;

    // 4. Setup dependencies (DI wiring)
    let probe = Arc::new(NpmVersionProbe::new(settings.probe_config()));
    let search_path = settings.search_path();
    info!(dirs = ?search_path.dirs(), "Kernel search path");
    let registry = Arc::new(FsKernelRegistry::new(search_path, settings.writer()));

    let service = KernelspecSyncService::new(probe, registry, settings.sync_options()?);

    // 5. Probe once, rewrite every spec; the first failure aborts the run
    match service.run().await {
        Ok(report) => {
            info!(
                version = %report.version,
                kernels = report.updated.len(),
                "Done"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Kernel spec sync failed");
            Err(e.into())
        }
    }
}
