// Application Layer - Use Cases

pub mod args;
pub mod constants;
pub mod sync;

// Re-exports
pub use args::{check_args, UsageError};
pub use sync::{KernelspecSyncService, SyncOptions, SyncReport};
