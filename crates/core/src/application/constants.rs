// Defaults for the version sync (no magic values elsewhere)

/// Web application directory holding the socket.io dependency
pub const DEFAULT_WEB_DIR: &str = "/datalab/web";

/// Package manager binary used for the version probe
pub const DEFAULT_NPM_COMMAND: &str = "npm";

/// Package whose installed version is probed
pub const DEFAULT_PACKAGE: &str = "socket.io";

pub use crate::domain::kernelspec::{DEFAULT_VENDOR_KEY, DEFAULT_VERSION_FIELD};

/// Indentation width used when rewriting kernel.json
pub const DEFAULT_INDENT: usize = 1;

/// Upper bound for configured indentation
pub const MAX_INDENT: usize = 16;

/// Exit status for a wrong argument count
pub const USAGE_EXIT_CODE: u8 = 1;

/// Program name shown in the usage line when argv is empty
pub const PROGRAM_NAME: &str = "update-kernelspecs";
