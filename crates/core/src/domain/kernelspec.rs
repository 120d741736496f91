// Kernel Specification Entity
// One `kernel.json` document plus the directory it was discovered in

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::{DomainError, Result};
use super::version::ProbedVersion;

/// File name of the spec document inside a kernel resource directory
pub const KERNEL_JSON: &str = "kernel.json";

/// Vendor namespace inside kernel metadata
pub const DEFAULT_VENDOR_KEY: &str = "colab";

/// Field under the vendor namespace that receives the version
pub const DEFAULT_VERSION_FIELD: &str = "socketio_version";

/// A discovered kernel spec: registry name + resource directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSpecLocation {
    pub name: String,
    pub resource_dir: PathBuf,
}

impl KernelSpecLocation {
    pub fn new(name: impl Into<String>, resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            resource_dir: resource_dir.into(),
        }
    }

    /// `<resource_dir>/kernel.json`
    pub fn kernel_json_path(&self) -> PathBuf {
        self.resource_dir.join(KERNEL_JSON)
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }
}

/// Whether a registry name only uses `[a-z0-9._-]`
///
/// Names outside this set are still usable, the registry only warns.
pub fn is_valid_kernel_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

/// How the launcher interrupts a running kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InterruptMode {
    #[default]
    Signal,
    Message,
}

impl TryFrom<String> for InterruptMode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        if value.eq_ignore_ascii_case("signal") {
            Ok(InterruptMode::Signal)
        } else if value.eq_ignore_ascii_case("message") {
            Ok(InterruptMode::Message)
        } else {
            Err(DomainError::InvalidDocument(format!(
                "unknown interrupt_mode `{value}`, expected signal|message"
            )))
        }
    }
}

impl From<InterruptMode> for String {
    fn from(mode: InterruptMode) -> Self {
        match mode {
            InterruptMode::Signal => "signal".to_string(),
            InterruptMode::Message => "message".to_string(),
        }
    }
}

/// Parsed `kernel.json`
///
/// Standard launcher fields are typed and defaulted; every other top-level
/// key is carried through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub argv: Vec<String>,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub env: Map<String, Value>,

    #[serde(default)]
    pub interrupt_mode: InterruptMode,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl KernelSpec {
    /// Build from a parsed JSON document (must be an object)
    pub fn from_document(document: Value) -> Result<Self> {
        if !document.is_object() {
            return Err(DomainError::InvalidDocument(format!(
                "expected a JSON object, found {}",
                json_kind(&document)
            )));
        }

        serde_json::from_value(document).map_err(|e| DomainError::InvalidDocument(e.to_string()))
    }

    /// Serialize back to a JSON document
    ///
    /// Object keys come out sorted at every level (serde_json's default map).
    pub fn to_document(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| DomainError::InvalidDocument(e.to_string()))
    }

    /// Set `metadata.<vendor>.<field>` to the probed version
    ///
    /// Creates the vendor object when absent; sibling fields are preserved.
    ///
    /// # Errors
    /// - DomainError::InvalidMetadata if the vendor entry exists but is not an object
    pub fn set_vendor_field(&mut self, target: &VendorField, version: &ProbedVersion) -> Result<()> {
        let entry = self
            .metadata
            .entry(target.key.clone())
            .or_insert_with(|| Value::Object(Map::new()));

        match entry {
            Value::Object(vendor) => {
                vendor.insert(
                    target.field.clone(),
                    Value::String(version.as_str().to_string()),
                );
                Ok(())
            }
            other => Err(DomainError::InvalidMetadata {
                key: target.key.clone(),
                found: json_kind(other).to_string(),
            }),
        }
    }

    /// Read back `metadata.<vendor>.<field>` if present and a string
    pub fn vendor_field(&self, target: &VendorField) -> Option<&str> {
        self.metadata
            .get(&target.key)?
            .as_object()?
            .get(&target.field)?
            .as_str()
    }
}

/// Nested metadata location the version is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorField {
    pub key: String,
    pub field: String,
}

impl VendorField {
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let field = field.into();

        if key.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "vendor metadata key cannot be empty".to_string(),
            ));
        }
        if field.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "version field name cannot be empty".to_string(),
            ));
        }

        Ok(Self { key, field })
    }
}

impl Default for VendorField {
    fn default() -> Self {
        Self {
            key: DEFAULT_VENDOR_KEY.to_string(),
            field: DEFAULT_VERSION_FIELD.to_string(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
