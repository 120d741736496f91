//! Kernelspec Sync - End-to-end over real kernel directories
//!
//! Mock probe + filesystem registry in a temp dir

use async_trait::async_trait;
use kernelspec_sync_core::application::{KernelspecSyncService, SyncOptions};
use kernelspec_sync_core::domain::{KernelSpec, KernelSpecLocation, KERNEL_JSON};
use kernelspec_sync_core::error::{AppError, Result};
use kernelspec_sync_core::port::version_probe::mocks::MockVersionProbe;
use kernelspec_sync_core::port::KernelRegistry;
use kernelspec_sync_infra_fs::{FsKernelRegistry, KernelJsonWriter, KernelSearchPath};
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn write_kernel(kernels_dir: &Path, name: &str, document: Value) -> PathBuf {
    let dir = kernels_dir.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(KERNEL_JSON), serde_json::to_string_pretty(&document).unwrap()).unwrap();
    dir
}

fn read_kernel(dir: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join(KERNEL_JSON)).unwrap()).unwrap()
}

fn fs_registry(kernels_dir: &Path) -> FsKernelRegistry {
    FsKernelRegistry::new(
        KernelSearchPath::new(vec![kernels_dir.to_path_buf()]),
        KernelJsonWriter::default(),
    )
}

fn service_with(
    stdout: &str,
    registry: Arc<dyn KernelRegistry>,
) -> KernelspecSyncService {
    KernelspecSyncService::new(
        Arc::new(MockVersionProbe::with_stdout(stdout)),
        registry,
        SyncOptions::default(),
    )
}

/// Fails `save` for one kernel, delegates everything else
struct FailingSaveRegistry {
    inner: FsKernelRegistry,
    fail_for: String,
}

#[async_trait]
impl KernelRegistry for FailingSaveRegistry {
    async fn find_kernel_specs(&self) -> Result<Vec<KernelSpecLocation>> {
        self.inner.find_kernel_specs().await
    }

    async fn load(&self, location: &KernelSpecLocation) -> Result<KernelSpec> {
        self.inner.load(location).await
    }

    async fn save(&self, location: &KernelSpecLocation, spec: &KernelSpec) -> Result<()> {
        if location.name == self.fail_for {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only file system",
            )));
        }
        self.inner.save(location, spec).await
    }
}

/// New vendor key: created, other metadata untouched
#[tokio::test]
async fn test_injects_new_vendor_key() {
    let root = TempDir::new().unwrap();
    let dir = write_kernel(
        root.path(),
        "python3",
        json!({
            "argv": ["python3", "-m", "ipykernel_launcher", "-f", "{connection_file}"],
            "display_name": "Python 3",
            "language": "python",
            "metadata": {"debugger": true, "owner": {"team": "research"}}
        }),
    );

    let report = service_with("socket.io@4.5.1\n", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap();

    assert_eq!(report.version.as_str(), "4.5.1");
    let document = read_kernel(&dir);
    assert_eq!(
        document["metadata"],
        json!({
            "colab": {"socketio_version": "4.5.1"},
            "debugger": true,
            "owner": {"team": "research"}
        })
    );
    assert_eq!(document["display_name"], json!("Python 3"));
}

/// Existing vendor key: siblings kept, version overwritten
#[tokio::test]
async fn test_updates_existing_vendor_key() {
    let root = TempDir::new().unwrap();
    let dir = write_kernel(
        root.path(),
        "python3",
        json!({
            "argv": ["python3"],
            "display_name": "Python 3",
            "language": "python",
            "metadata": {"colab": {"other_field": "x", "socketio_version": "1.7.4"}}
        }),
    );

    service_with("a@b@2.0.0", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap();

    assert_eq!(
        read_kernel(&dir)["metadata"]["colab"],
        json!({"other_field": "x", "socketio_version": "2.0.0"})
    );
}

/// Second run with the same version produces identical bytes
#[tokio::test]
async fn test_second_run_is_byte_identical() {
    let root = TempDir::new().unwrap();
    let dir = write_kernel(
        root.path(),
        "ir",
        json!({
            "argv": ["R", "--slave", "-e", "IRkernel::main()", "--args", "{connection_file}"],
            "display_name": "R",
            "language": "R",
            "codemirror_mode": "r"
        }),
    );

    service_with("socket.io@2.3.0", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap();
    let first = fs::read(dir.join(KERNEL_JSON)).unwrap();

    service_with("socket.io@2.3.0", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap();
    let second = fs::read(dir.join(KERNEL_JSON)).unwrap();

    assert_eq!(first, second);
    assert_eq!(read_kernel(&dir)["codemirror_mode"], json!("r"));
}

/// All discovered kernels get the same version
#[tokio::test]
async fn test_every_kernel_rewritten() {
    let root = TempDir::new().unwrap();
    let dirs: Vec<PathBuf> = ["a", "b", "c"]
        .iter()
        .map(|name| write_kernel(root.path(), name, json!({"display_name": name})))
        .collect();

    let report = service_with("socket.io@4.5.1", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap();

    assert_eq!(report.updated.len(), 3);
    for dir in &dirs {
        assert_eq!(
            read_kernel(dir)["metadata"]["colab"]["socketio_version"],
            json!("4.5.1")
        );
    }
}

/// A failed write stops the run: earlier kernels persisted, later ones untouched
#[tokio::test]
async fn test_failed_write_aborts_remaining_kernels() {
    let root = TempDir::new().unwrap();
    let a = write_kernel(root.path(), "a", json!({"display_name": "A"}));
    let b = write_kernel(root.path(), "b", json!({"display_name": "B"}));
    let c = write_kernel(root.path(), "c", json!({"display_name": "C"}));
    let c_before = fs::read(c.join(KERNEL_JSON)).unwrap();

    let registry = FailingSaveRegistry {
        inner: fs_registry(root.path()),
        fail_for: "b".to_string(),
    };

    let err = service_with("socket.io@4.5.1", Arc::new(registry))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Kernelspec { ref name, .. } if name == "b"));
    assert_eq!(
        read_kernel(&a)["metadata"]["colab"]["socketio_version"],
        json!("4.5.1")
    );
    assert!(read_kernel(&b).get("metadata").is_none());
    assert_eq!(fs::read(c.join(KERNEL_JSON)).unwrap(), c_before);
}

/// A read-only kernel.json fails the real filesystem write and stops the run
#[cfg(unix)]
#[tokio::test]
async fn test_read_only_kernel_json_aborts_remaining_kernels() {
    use std::os::unix::fs::PermissionsExt;

    let root = TempDir::new().unwrap();
    let a = write_kernel(root.path(), "a", json!({"display_name": "A"}));
    let b = write_kernel(root.path(), "b", json!({"display_name": "B"}));
    let c = write_kernel(root.path(), "c", json!({"display_name": "C"}));
    let b_json = b.join(KERNEL_JSON);
    let c_before = fs::read(c.join(KERNEL_JSON)).unwrap();
    fs::set_permissions(&b_json, fs::Permissions::from_mode(0o444)).unwrap();

    // Permission bits do not bind a privileged user
    if fs::OpenOptions::new().write(true).open(&b_json).is_ok() {
        eprintln!("skipping: read-only file is still writable by this user");
        return;
    }

    let err = service_with("socket.io@4.5.1", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Kernelspec { ref name, .. } if name == "b"));
    assert_eq!(
        read_kernel(&a)["metadata"]["colab"]["socketio_version"],
        json!("4.5.1")
    );
    assert!(read_kernel(&b).get("metadata").is_none());
    assert_eq!(fs::read(c.join(KERNEL_JSON)).unwrap(), c_before);
}

/// Malformed kernel.json aborts with the kernel's name
#[tokio::test]
async fn test_malformed_kernel_json_named_in_error() {
    let root = TempDir::new().unwrap();
    let broken = root.path().join("broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join(KERNEL_JSON), "[\"not\", \"an object\"]").unwrap();

    let err = service_with("socket.io@4.5.1", Arc::new(fs_registry(root.path())))
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("broken"));
}
