// Argument gate
// The tool takes no arguments; only the count is checked, never the content.

use thiserror::Error;

use super::constants::PROGRAM_NAME;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Usage: {program}")]
pub struct UsageError {
    pub program: String,
}

/// Accept exactly one argument: the program name itself
///
/// # Errors
/// - UsageError carrying the program name (for the usage line) otherwise
pub fn check_args<S: AsRef<str>>(args: &[S]) -> Result<(), UsageError> {
    if args.len() == 1 {
        return Ok(());
    }

    let program = args
        .first()
        .map(|s| s.as_ref().to_string())
        .unwrap_or_else(|| PROGRAM_NAME.to_string());

    Err(UsageError { program })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_only_passes() {
        assert!(check_args(&["update-kernelspecs"]).is_ok());
    }

    #[test]
    fn test_extra_arguments_rejected() {
        let err = check_args(&["update-kernelspecs", "--force"]).unwrap_err();
        assert_eq!(err.to_string(), "Usage: update-kernelspecs");

        let err = check_args(&["/usr/bin/update-kernelspecs", "a", "b"]).unwrap_err();
        assert_eq!(err.program, "/usr/bin/update-kernelspecs");
    }

    #[test]
    fn test_empty_argv_rejected() {
        let empty: [&str; 0] = [];
        assert!(check_args(&empty).is_err());
    }
}
