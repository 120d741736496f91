// Version Probe Port
// Abstraction for asking a package manager which version is installed

use async_trait::async_trait;
use thiserror::Error;

/// Raw result of one probe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl ProbeOutput {
    /// Output of a process that exited with status 0
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Probe errors
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Probe timeout after {0}ms")]
    Timeout(u64),

    #[error("Probe exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Probe produced an empty version")]
    EmptyVersion,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Version Probe trait
///
/// Implementations:
/// - NpmVersionProbe: runs `npm ls <package>` in the web app directory
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// Run the listing command once and capture its output
    ///
    /// Does not judge the exit status; callers decide how strict to be.
    ///
    /// # Errors
    /// - ProbeError::SpawnFailed if the command cannot be started
    /// - ProbeError::Timeout if a deadline is configured and exceeded
    async fn probe(&self) -> Result<ProbeOutput, ProbeError>;

    /// Human-readable command line, for logs
    fn describe(&self) -> String;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock probe behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Return this output
        Output(ProbeOutput),
        /// Fail to spawn with message
        SpawnFail(String),
    }

    /// Mock VersionProbe for testing
    pub struct MockVersionProbe {
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockVersionProbe {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Successful probe printing `stdout`
        pub fn with_stdout(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Output(ProbeOutput::success(stdout)))
        }

        /// Probe whose process exits with `code` and prints nothing
        pub fn new_exit_failure(code: i32) -> Self {
            Self::new(MockBehavior::Output(ProbeOutput {
                stdout: String::new(),
                stderr: "npm ERR! missing".to_string(),
                exit_code: Some(code),
                duration_ms: 0,
            }))
        }

        pub fn new_spawn_failure(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl VersionProbe for MockVersionProbe {
        async fn probe(&self) -> Result<ProbeOutput, ProbeError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Output(output) => Ok(output),
                MockBehavior::SpawnFail(msg) => Err(ProbeError::SpawnFailed(msg)),
            }
        }

        fn describe(&self) -> String {
            "mock ls socket.io".to_string()
        }
    }
}
