// npm version probe
// reason: tokio for async process management, matching the rest of the runtime
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use kernelspec_sync_core::application::constants::{
    DEFAULT_NPM_COMMAND, DEFAULT_PACKAGE, DEFAULT_WEB_DIR,
};
use kernelspec_sync_core::port::version_probe::{ProbeError, ProbeOutput, VersionProbe};

/// Where and how to run `npm ls`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmProbeConfig {
    /// Package manager binary, resolved through PATH
    pub command: String,
    /// Package passed to `ls`
    pub package: String,
    /// Directory holding the package manifest
    pub working_dir: PathBuf,
    /// No deadline when `None`
    pub timeout_ms: Option<u64>,
}

impl Default for NpmProbeConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_NPM_COMMAND.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
            working_dir: PathBuf::from(DEFAULT_WEB_DIR),
            timeout_ms: None,
        }
    }
}

/// Runs `<command> ls <package>` inside the web app directory
pub struct NpmVersionProbe {
    config: NpmProbeConfig,
}

impl NpmVersionProbe {
    /// Create a new npm probe
    ///
    /// # Example
    /// ```ignore
    /// let probe = NpmVersionProbe::new(NpmProbeConfig::default());
    /// let output = probe.probe().await?;
    /// ```
    pub fn new(config: NpmProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NpmProbeConfig {
        &self.config
    }

    fn args(&self) -> [&str; 2] {
        ["ls", self.config.package.as_str()]
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(&self) -> Result<std::process::Output, ProbeError> {
        let child = Command::new(&self.config.command)
            .args(self.args())
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ProbeError::SpawnFailed(format!(
                    "{} (cwd={}): {}",
                    self.config.command,
                    self.config.working_dir.display(),
                    e
                ))
            })?;

        if let Some(timeout_ms) = self.config.timeout_ms {
            match timeout(Duration::from_millis(timeout_ms), child.wait_with_output()).await {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(e)) => Err(ProbeError::IoError(e.to_string())),
                Err(_) => Err(ProbeError::Timeout(timeout_ms)),
            }
        } else {
            child
                .wait_with_output()
                .await
                .map_err(|e| ProbeError::IoError(e.to_string()))
        }
    }
}

#[async_trait]
impl VersionProbe for NpmVersionProbe {
    async fn probe(&self) -> Result<ProbeOutput, ProbeError> {
        let started = Instant::now();

        info!(
            command = %self.config.command,
            args = ?self.args(),
            working_dir = %self.config.working_dir.display(),
            timeout_ms = ?self.config.timeout_ms,
            "Starting version probe"
        );

        let output = self.spawn_and_wait().await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = ProbeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            duration_ms,
        };

        info!(
            command = %self.config.command,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            "Version probe completed"
        );

        Ok(result)
    }

    fn describe(&self) -> String {
        format!(
            "{} ls {} (cwd={})",
            self.config.command,
            self.config.package,
            self.config.working_dir.display()
        )
    }
}
