// Kernelspec sync use case
// Probe the installed version once, then rewrite every kernel spec in order.
use crate::domain::{KernelSpecLocation, ProbedVersion, VendorField};
use crate::error::{AppError, Result};
use crate::port::{KernelRegistry, ProbeError, VersionProbe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Knobs for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Where in `metadata` the version goes
    pub target: VendorField,
    /// Fail on a non-zero probe exit or an empty version instead of writing it
    pub strict_probe: bool,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub version: ProbedVersion,
    pub updated: Vec<KernelSpecLocation>,
}

/// Kernelspec sync service
///
/// Strictly sequential: the probe finishes before the first spec is read,
/// and each spec is written before the next is loaded. The first failure
/// aborts the run; specs already written stay written.
pub struct KernelspecSyncService {
    probe: Arc<dyn VersionProbe>,
    registry: Arc<dyn KernelRegistry>,
    options: SyncOptions,
}

impl KernelspecSyncService {
    /// Create a new sync service
    ///
    /// # Example
    /// ```text
    /// let service = KernelspecSyncService::new(
    ///     Arc::new(NpmVersionProbe::new(probe_config)),
    ///     Arc::new(FsKernelRegistry::new(search_path, writer)),
    ///     SyncOptions::default(),
    /// );
    /// let report = service.run().await?;
    /// ```
    pub fn new(
        probe: Arc<dyn VersionProbe>,
        registry: Arc<dyn KernelRegistry>,
        options: SyncOptions,
    ) -> Self {
        Self {
            probe,
            registry,
            options,
        }
    }

    /// Run the probe and turn its output into a version
    ///
    /// Lenient mode keeps whatever the process printed, even after a
    /// non-zero exit; strict mode rejects that and empty versions.
    pub async fn probe_version(&self) -> Result<ProbedVersion> {
        let command = self.probe.describe();
        info!(command = %command, "Probing installed version");

        let output = self.probe.probe().await?;

        debug!(
            command = %command,
            exit_code = ?output.exit_code,
            stderr = %output.stderr.trim(),
            "Probe finished"
        );

        if !output.is_success() {
            if self.options.strict_probe {
                return Err(ProbeError::NonZeroExit {
                    code: output.exit_code,
                    stderr: output.stderr.trim().to_string(),
                }
                .into());
            }
            warn!(
                command = %command,
                exit_code = ?output.exit_code,
                "Probe exited unsuccessfully, using its output anyway"
            );
        }

        let version = ProbedVersion::from_listing(&output.stdout);
        if version.is_empty() {
            if self.options.strict_probe {
                return Err(ProbeError::EmptyVersion.into());
            }
            warn!(command = %command, "Probe produced an empty version");
        }

        info!(version = %version, "Probed version");
        Ok(version)
    }

    /// Inject the version into one spec and write it back
    ///
    /// Always writes, even when the stored version already matches.
    pub async fn update_kernel(
        &self,
        location: &KernelSpecLocation,
        version: &ProbedVersion,
    ) -> Result<()> {
        let mut spec = self.registry.load(location).await?;
        spec.set_vendor_field(&self.options.target, version)?;
        self.registry.save(location, &spec).await?;

        info!(
            kernel = %location.name,
            path = %location.kernel_json_path().display(),
            version = %version,
            "Kernel spec updated"
        );
        Ok(())
    }

    /// Probe once, then update every discoverable spec
    ///
    /// # Errors
    /// - AppError::Probe if the probe cannot run (or fails in strict mode)
    /// - AppError::Kernelspec naming the first spec that could not be updated
    pub async fn run(&self) -> Result<SyncReport> {
        let version = self.probe_version().await?;
        let locations = self.registry.find_kernel_specs().await?;

        info!(count = locations.len(), "Discovered kernel specs");

        let mut updated = Vec::with_capacity(locations.len());
        for location in locations {
            self.update_kernel(&location, &version)
                .await
                .map_err(|e| AppError::for_kernel(location.name.clone(), e))?;
            updated.push(location);
        }

        info!(
            version = %version,
            updated = updated.len(),
            "Kernel spec sync completed"
        );

        Ok(SyncReport { version, updated })
    }
}
