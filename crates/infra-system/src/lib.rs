// Kernelspec Sync Infrastructure - System Adapters
// Implements: VersionProbe

pub mod npm_probe;

pub use npm_probe::{NpmProbeConfig, NpmVersionProbe};
