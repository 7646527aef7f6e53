//! CLI error types and exit codes

use thiserror::Error;

use adkit_directory::DirectoryError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication / access error
/// - 3: Network error
/// - 4: Validation error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Directory(#[from] DirectoryError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Directory(err) => match err {
                DirectoryError::BindFailed | DirectoryError::InsufficientAccessRights { .. } => 2,
                DirectoryError::ConnectionFailed { .. } | DirectoryError::Timeout { .. } => 3,
                DirectoryError::InvalidConfiguration { .. }
                | DirectoryError::EncodingError { .. } => 4,
                _ => 1,
            },
            CliError::Validation(_) => 4,
            CliError::Prompt(_) => 1,
        }
    }

    pub fn print(&self) {
        eprintln!("error: {self}");
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(DirectoryError::BindFailed).exit_code(), 2);
        assert_eq!(
            CliError::from(DirectoryError::connection_failed("down")).exit_code(),
            3
        );
        assert_eq!(CliError::Validation("bad".to_string()).exit_code(), 4);
        assert_eq!(
            CliError::from(DirectoryError::not_found("cn=x")).exit_code(),
            1
        );
    }
}
