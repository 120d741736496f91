// Filesystem KernelRegistry Implementation

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use kernelspec_sync_core::domain::{
    is_valid_kernel_name, KernelSpec, KernelSpecLocation, KERNEL_JSON,
};
use kernelspec_sync_core::error::Result;
use kernelspec_sync_core::port::KernelRegistry;

use crate::search_path::KernelSearchPath;
use crate::writer::KernelJsonWriter;

/// Kernel specs stored as `<kernels_dir>/<name>/kernel.json`
pub struct FsKernelRegistry {
    search_path: KernelSearchPath,
    writer: KernelJsonWriter,
}

impl FsKernelRegistry {
    pub fn new(search_path: KernelSearchPath, writer: KernelJsonWriter) -> Self {
        Self {
            search_path,
            writer,
        }
    }

    pub fn search_path(&self) -> &KernelSearchPath {
        &self.search_path
    }

    /// Spec directories directly under one kernels dir, sorted by name, then path
    ///
    /// A missing (or non-directory) kernels dir yields nothing.
    async fn list_kernels_in(&self, dir: &Path) -> Result<Vec<KernelSpecLocation>> {
        let is_dir = tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            debug!(dir = %dir.display(), "Kernel directory not present, skipping");
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
            {
                continue;
            }
            if !is_kernel_dir(&path).await {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_lowercase();
            found.push(KernelSpecLocation::new(name, path));
        }

        // Names differing only in case collapse; the bytewise-smaller directory wins
        found.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.resource_dir.cmp(&b.resource_dir))
        });
        Ok(found)
    }
}

async fn is_kernel_dir(path: &Path) -> bool {
    tokio::fs::metadata(path.join(KERNEL_JSON))
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[async_trait]
impl KernelRegistry for FsKernelRegistry {
    async fn find_kernel_specs(&self) -> Result<Vec<KernelSpecLocation>> {
        let mut seen = HashSet::new();
        let mut specs = Vec::new();

        for dir in self.search_path.dirs() {
            for location in self.list_kernels_in(dir).await? {
                if !seen.insert(location.name.clone()) {
                    debug!(
                        kernel = %location.name,
                        shadowed = %location.resource_dir.display(),
                        "Kernel spec shadowed by higher-precedence directory"
                    );
                    continue;
                }
                if !is_valid_kernel_name(&location.name) {
                    warn!(
                        kernel = %location.name,
                        path = %location.resource_dir.display(),
                        "Invalid kernel spec directory name"
                    );
                }
                specs.push(location);
            }
        }

        Ok(specs)
    }

    async fn load(&self, location: &KernelSpecLocation) -> Result<KernelSpec> {
        let bytes = tokio::fs::read(location.kernel_json_path()).await?;
        let document: Value = serde_json::from_slice(&bytes)?;
        Ok(KernelSpec::from_document(document)?)
    }

    async fn save(&self, location: &KernelSpecLocation, spec: &KernelSpec) -> Result<()> {
        let bytes = self.writer.render(&spec.to_document()?)?;
        tokio::fs::write(location.kernel_json_path(), bytes).await?;
        Ok(())
    }
}
