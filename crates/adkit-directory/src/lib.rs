//! # adkit-directory
//!
//! Session layer and shared types for talking to an LDAP/Active Directory
//! server.
//!
//! This crate owns the four directory primitives (`search`, `modify`, `add`,
//! `unbind`) behind the [`DirectorySession`] trait, the entry/attribute data
//! model, and the error taxonomy every adkit operation reports through. The
//! account-level semantics (SPN management, password resets, account state)
//! live in `adkit-accounts` on top of this crate.
//!
//! ## Example
//!
//! ```ignore
//! use adkit_directory::{DirectoryConfig, LdapDirectorySession};
//!
//! let config = DirectoryConfig::new("ad.example.com", "cn=admin,dc=example,dc=com")
//!     .with_password("secret")
//!     .with_ssl();
//!
//! let session = LdapDirectorySession::bind(&config).await?;
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod operation;
pub mod session;

// Re-exports
pub use config::DirectoryConfig;
pub use entry::{AttributeValue, Entry};
pub use error::{DirectoryError, DirectoryResult};
pub use operation::{AddRequest, ModifyOp, SearchScope};
pub use session::{DirectorySession, LdapDirectorySession};
