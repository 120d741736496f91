// Kernel directory search path
// Follows the Jupyter data-path precedence: JUPYTER_PATH, user dir, system dirs.

use directories::BaseDirs;
use std::ffi::OsString;
use std::path::PathBuf;

/// Ordered list of `.../kernels` directories, highest precedence first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSearchPath {
    dirs: Vec<PathBuf>,
}

impl KernelSearchPath {
    /// Use exactly these kernel directories
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Jupyter's default search path for the current process environment
    pub fn from_env() -> Self {
        Self::from_data_dirs(jupyter_data_dirs(|key| std::env::var_os(key)))
    }

    /// `<data_dir>/kernels` for each data directory
    pub fn from_data_dirs(data_dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs: data_dirs.into_iter().map(|d| d.join("kernels")).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Jupyter data directories in precedence order, duplicates removed
///
/// `lookup` reads environment variables so tests can inject their own.
pub fn jupyter_data_dirs<F>(lookup: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut dirs = Vec::new();

    if let Some(jupyter_path) = non_empty(&lookup, "JUPYTER_PATH") {
        dirs.extend(
            std::env::split_paths(&jupyter_path).filter(|p| !p.as_os_str().is_empty()),
        );
    }

    if let Some(user_dir) = non_empty(&lookup, "JUPYTER_DATA_DIR")
        .map(PathBuf::from)
        .or_else(|| user_data_dir(&lookup))
    {
        dirs.push(user_dir);
    }

    dirs.extend(system_data_dirs(&lookup));

    let mut unique = Vec::with_capacity(dirs.len());
    for dir in dirs {
        if !unique.contains(&dir) {
            unique.push(dir);
        }
    }
    unique
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<OsString>
where
    F: Fn(&str) -> Option<OsString>,
{
    lookup(key).filter(|v| !v.is_empty())
}

#[cfg(target_os = "macos")]
fn user_data_dir<F>(_lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    BaseDirs::new().map(|b| b.home_dir().join("Library").join("Jupyter"))
}

#[cfg(windows)]
fn user_data_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    non_empty(lookup, "APPDATA")
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|b| b.config_dir().to_path_buf()))
        .map(|p| p.join("jupyter"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn user_data_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    non_empty(lookup, "XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            non_empty(lookup, "HOME")
                .map(|home| PathBuf::from(home).join(".local").join("share"))
        })
        .or_else(|| BaseDirs::new().map(|b| b.data_dir().to_path_buf()))
        .map(|p| p.join("jupyter"))
}

#[cfg(windows)]
fn system_data_dirs<F>(lookup: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    non_empty(lookup, "PROGRAMDATA")
        .map(|p| vec![PathBuf::from(p).join("jupyter")])
        .unwrap_or_default()
}

#[cfg(not(windows))]
fn system_data_dirs<F>(_lookup: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    vec![
        PathBuf::from("/usr/local/share/jupyter"),
        PathBuf::from("/usr/share/jupyter"),
    ]
}
