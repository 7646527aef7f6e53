//! Directory error types
//!
//! Error definitions with transient/permanent classification. Every failure
//! carries the server's raw diagnostic where one exists; callers render the
//! message, the engine never swallows it.

use thiserror::Error;

/// Error that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the directory server.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation or transport timed out.
    #[error("directory operation timed out: {message}")]
    Timeout { message: String },

    // Authentication errors (permanent)
    /// The bind handshake was rejected (invalid credentials).
    #[error("bind failed: invalid credentials")]
    BindFailed,

    /// The bound principal lacks rights for the attempted mutation.
    #[error("insufficient access rights: {diagnostic}")]
    InsufficientAccessRights { diagnostic: String },

    // Lookup outcomes
    /// No entry matched where exactly one was required.
    #[error("no entry found for {dn}")]
    NotFound { dn: String },

    /// More than one entry matched where exactly one was required.
    #[error("ambiguous result for {dn}: {count} entries matched")]
    AmbiguousResult { dn: String, count: usize },

    // Mutation outcomes
    /// An entry with the target DN already exists.
    #[error("entry already exists: {dn}")]
    AlreadyExists { dn: String },

    /// The directory rejected the value on a constraint (e.g. duplicate SPN).
    #[error("constraint violation: {diagnostic}")]
    ConstraintViolation { diagnostic: String },

    /// The directory rejected the value on policy grounds (e.g. password
    /// complexity or history rules).
    #[error("policy violation: {diagnostic}")]
    PolicyViolation { diagnostic: String },

    // Client-side errors
    /// A domain value could not be encoded into its wire representation.
    #[error("encoding error: {message}")]
    EncodingError { message: String },

    /// The session or engine configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Catch-all for any other server-reported failure, carrying the raw
    /// result code and diagnostic text.
    #[error("directory operation failed (rc {rc}): {diagnostic}")]
    OperationFailed { rc: u32, diagnostic: String },
}

impl DirectoryError {
    /// Check if this error is transient and the operation may succeed on a
    /// later attempt.
    ///
    /// The engine itself never retries, since directory mutations are not
    /// idempotent, but callers can use this to decide.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DirectoryError::ConnectionFailed { .. } | DirectoryError::Timeout { .. }
        )
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            DirectoryError::Timeout { .. } => "TIMEOUT",
            DirectoryError::BindFailed => "BIND_FAILED",
            DirectoryError::InsufficientAccessRights { .. } => "INSUFFICIENT_ACCESS_RIGHTS",
            DirectoryError::NotFound { .. } => "NOT_FOUND",
            DirectoryError::AmbiguousResult { .. } => "AMBIGUOUS_RESULT",
            DirectoryError::AlreadyExists { .. } => "ALREADY_EXISTS",
            DirectoryError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            DirectoryError::PolicyViolation { .. } => "POLICY_VIOLATION",
            DirectoryError::EncodingError { .. } => "ENCODING_ERROR",
            DirectoryError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            DirectoryError::OperationFailed { .. } => "OPERATION_FAILED",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation failed error carrying the server diagnostic.
    pub fn operation_failed(rc: u32, diagnostic: impl Into<String>) -> Self {
        DirectoryError::OperationFailed {
            rc,
            diagnostic: diagnostic.into(),
        }
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        DirectoryError::EncodingError {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        DirectoryError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a not-found error for a DN.
    pub fn not_found(dn: impl Into<String>) -> Self {
        DirectoryError::NotFound { dn: dn.into() }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
