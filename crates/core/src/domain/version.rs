// Probed package version

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version string extracted from package-manager output
///
/// No semver validation: any trailing token is accepted as-is, including
/// the empty string when the probe produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbedVersion(String);

impl ProbedVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// Parse raw listing output (`<name>@<version>`)
    pub fn from_listing(stdout: &str) -> Self {
        Self(extract_version(stdout))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProbedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProbedVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the version token from listing output
///
/// Trims surrounding whitespace, then keeps the segment after the last `@`.
/// Output without any `@` is returned trimmed and otherwise unchanged.
///
/// # Example
/// ```
/// use kernelspec_sync_core::domain::extract_version;
///
/// assert_eq!(extract_version("socket.io@4.5.1\n"), "4.5.1");
/// assert_eq!(extract_version("a@b@2.0.0"), "2.0.0");
/// ```
pub fn extract_version(stdout: &str) -> String {
    stdout
        .trim()
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .to_string()
}
