//! Runtime settings
//!
//! Precedence: environment `KERNELSPEC_SYNC_*` > TOML file named by
//! `KERNELSPEC_SYNC_CONFIG` > built-in defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use kernelspec_sync_core::application::constants::{
    DEFAULT_INDENT, DEFAULT_NPM_COMMAND, DEFAULT_PACKAGE, DEFAULT_VENDOR_KEY,
    DEFAULT_VERSION_FIELD, DEFAULT_WEB_DIR, MAX_INDENT,
};
use kernelspec_sync_core::application::SyncOptions;
use kernelspec_sync_core::domain::VendorField;
use kernelspec_sync_core::AppError;
use kernelspec_sync_infra_fs::{KernelJsonWriter, KernelSearchPath};
use kernelspec_sync_infra_system::NpmProbeConfig;

const ENV_PREFIX: &str = "KERNELSPEC_SYNC";
const CONFIG_PATH_VAR: &str = "KERNELSPEC_SYNC_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Web app directory the probe runs in
    pub web_dir: String,
    pub npm_command: String,
    pub package: String,
    pub vendor_key: String,
    pub version_field: String,
    /// Replaces the Jupyter search path when non-empty
    #[serde(default)]
    pub kernel_dirs: Vec<String>,
    pub indent: usize,
    pub ensure_ascii: bool,
    pub strict_probe: bool,
    #[serde(default)]
    pub probe_timeout_ms: Option<u64>,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        Self::build(file.as_deref(), env_source())
    }

    /// Load from an optional file plus an environment source
    pub fn build(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("web_dir", DEFAULT_WEB_DIR)?
            .set_default("npm_command", DEFAULT_NPM_COMMAND)?
            .set_default("package", DEFAULT_PACKAGE)?
            .set_default("vendor_key", DEFAULT_VENDOR_KEY)?
            .set_default("version_field", DEFAULT_VERSION_FIELD)?
            .set_default("kernel_dirs", Vec::<String>::new())?
            .set_default("indent", DEFAULT_INDENT as i64)?
            .set_default("ensure_ascii", true)?
            .set_default("strict_probe", false)?;

        // An explicitly named file must exist
        let builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        };

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Reject settings that would produce a broken kernel.json
    pub fn validate(&self) -> Result<(), AppError> {
        if self.package.trim().is_empty() {
            return Err(AppError::Config("package cannot be empty".to_string()));
        }
        if self.npm_command.trim().is_empty() {
            return Err(AppError::Config("npm_command cannot be empty".to_string()));
        }
        if self.indent > MAX_INDENT {
            return Err(AppError::Config(format!(
                "indent must be at most {MAX_INDENT}, got {}",
                self.indent
            )));
        }
        self.vendor_field()?;
        Ok(())
    }

    pub fn vendor_field(&self) -> Result<VendorField, AppError> {
        Ok(VendorField::new(&self.vendor_key, &self.version_field)?)
    }

    pub fn sync_options(&self) -> Result<SyncOptions, AppError> {
        Ok(SyncOptions {
            target: self.vendor_field()?,
            strict_probe: self.strict_probe,
        })
    }

    pub fn probe_config(&self) -> NpmProbeConfig {
        NpmProbeConfig {
            command: self.npm_command.clone(),
            package: self.package.clone(),
            working_dir: expand_path(&self.web_dir),
            timeout_ms: self.probe_timeout_ms,
        }
    }

    pub fn search_path(&self) -> KernelSearchPath {
        if self.kernel_dirs.is_empty() {
            KernelSearchPath::from_env()
        } else {
            KernelSearchPath::new(self.kernel_dirs.iter().map(|d| expand_path(d)).collect())
        }
    }

    pub fn writer(&self) -> KernelJsonWriter {
        KernelJsonWriter::new(self.indent, self.ensure_ascii)
    }
}

/// `KERNELSPEC_SYNC_WEB_DIR=...`, `KERNELSPEC_SYNC_KERNEL_DIRS=/a:/b`, ...
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(":")
        .with_list_parse_key("kernel_dirs")
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
