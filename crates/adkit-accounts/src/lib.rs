//! # adkit-accounts
//!
//! The account mutation engine: translates high-level account intents
//! ("reset this password", "add this service principal", "disable this
//! account") into correctly-encoded directory modify/add requests, and maps
//! the directory's response into a typed outcome.
//!
//! The engine is pure request/response over a [`DirectorySession`]: it holds
//! no state across calls, performs no retries, and never prints or prompts.
//! Rendering outcomes is the driver's job.
//!
//! [`DirectorySession`]: adkit_directory::DirectorySession

pub mod codec;
pub mod control;
pub mod engine;

// Re-exports
pub use control::AccountState;
pub use engine::{AccountManager, AccountSettings, AccountSummary};
