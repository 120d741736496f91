// Port Layer - Interfaces for external dependencies

pub mod kernel_registry;
pub mod version_probe;

// Re-exports
pub use kernel_registry::KernelRegistry;
pub use version_probe::{ProbeError, ProbeOutput, VersionProbe};
