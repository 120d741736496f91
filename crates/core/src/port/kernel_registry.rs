// Kernel Registry Port (Interface)

use crate::domain::{KernelSpec, KernelSpecLocation};
use crate::error::Result;
use async_trait::async_trait;

/// Registry of installed kernel specs
///
/// Specs are discovered, never created or deleted through this port.
#[async_trait]
pub trait KernelRegistry: Send + Sync {
    /// List every discoverable spec, in processing order
    async fn find_kernel_specs(&self) -> Result<Vec<KernelSpecLocation>>;

    /// Load the full spec document for a location
    async fn load(&self, location: &KernelSpecLocation) -> Result<KernelSpec>;

    /// Overwrite the spec document for a location
    async fn save(&self, location: &KernelSpecLocation, spec: &KernelSpec) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::io;
    use std::sync::Mutex;

    /// In-memory registry; optionally fails the save of one named spec
    pub struct InMemoryKernelRegistry {
        specs: Mutex<Vec<(KernelSpecLocation, KernelSpec)>>,
        fail_save_for: Option<String>,
        save_log: Mutex<Vec<String>>,
    }

    impl InMemoryKernelRegistry {
        pub fn new(specs: Vec<(KernelSpecLocation, KernelSpec)>) -> Self {
            Self {
                specs: Mutex::new(specs),
                fail_save_for: None,
                save_log: Mutex::new(Vec::new()),
            }
        }

        /// Make `save` fail with a permission error for `name`
        pub fn failing_save_for(mut self, name: impl Into<String>) -> Self {
            self.fail_save_for = Some(name.into());
            self
        }

        /// Names passed to successful `save` calls, in call order
        pub fn saved(&self) -> Vec<String> {
            self.save_log.lock().unwrap().clone()
        }

        pub fn spec(&self, name: &str) -> Option<KernelSpec> {
            self.specs
                .lock()
                .unwrap()
                .iter()
                .find(|(location, _)| location.name == name)
                .map(|(_, spec)| spec.clone())
        }
    }

    #[async_trait]
    impl KernelRegistry for InMemoryKernelRegistry {
        async fn find_kernel_specs(&self) -> Result<Vec<KernelSpecLocation>> {
            Ok(self
                .specs
                .lock()
                .unwrap()
                .iter()
                .map(|(location, _)| location.clone())
                .collect())
        }

        async fn load(&self, location: &KernelSpecLocation) -> Result<KernelSpec> {
            self.spec(&location.name)
                .ok_or_else(|| AppError::NotFound(format!("kernel spec {}", location.name)))
        }

        async fn save(&self, location: &KernelSpecLocation, spec: &KernelSpec) -> Result<()> {
            if self.fail_save_for.as_deref() == Some(location.name.as_str()) {
                return Err(AppError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("read-only: {}", location.kernel_json_path().display()),
                )));
            }

            let mut specs = self.specs.lock().unwrap();
            let slot = specs
                .iter_mut()
                .find(|(existing, _)| existing.name == location.name)
                .ok_or_else(|| AppError::NotFound(format!("kernel spec {}", location.name)))?;
            slot.1 = spec.clone();

            self.save_log.lock().unwrap().push(location.name.clone());
            Ok(())
        }
    }
}
