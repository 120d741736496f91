// Domain Layer - Kernel specs and the probed version

pub mod error;
pub mod kernelspec;
pub mod version;

// Re-exports
pub use error::DomainError;
pub use kernelspec::{
    is_valid_kernel_name, InterruptMode, KernelSpec, KernelSpecLocation, VendorField, KERNEL_JSON,
};
pub use version::{extract_version, ProbedVersion};
