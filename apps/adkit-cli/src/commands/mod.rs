//! Command handlers
//!
//! One module per subcommand. Handlers take their parsed args and the
//! account engine, render to stdout, and return a `CliResult`.

pub mod account;
pub mod create;
pub mod search;
pub mod show;
pub mod spn;

use dialoguer::Password;

use crate::error::CliResult;

/// Prompt for a password with hidden input.
pub fn prompt_password(prompt: &str) -> CliResult<String> {
    let password = Password::new().with_prompt(prompt).interact()?;
    Ok(password)
}

/// Prompt for a new password twice and require the entries to match.
pub fn prompt_new_password(prompt: &str) -> CliResult<String> {
    let password = Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    Ok(password)
}
