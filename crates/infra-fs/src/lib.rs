// Kernelspec Sync Infrastructure - Filesystem Adapter
// Implements: KernelRegistry over Jupyter-style kernel directories

mod registry;
mod search_path;
mod writer;

pub use registry::FsKernelRegistry;
pub use search_path::{jupyter_data_dirs, KernelSearchPath};
pub use writer::KernelJsonWriter;
