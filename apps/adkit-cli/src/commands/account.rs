//! Password reset and account state changes.

use clap::Args;

use adkit_accounts::{AccountManager, AccountState};
use adkit_directory::LdapDirectorySession;

use crate::commands::prompt_new_password;
use crate::error::CliResult;

#[derive(Args)]
pub struct PasswdArgs {
    /// Distinguished name of the account
    #[arg(long)]
    dn: String,

    /// New password (prompted when not supplied)
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args)]
pub struct StateArgs {
    /// Distinguished name of the account
    #[arg(long)]
    dn: String,
}

pub async fn passwd(
    args: PasswdArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_new_password(&format!("New password for {}", args.dn))?,
    };

    manager.reset_password(&args.dn, &password).await?;
    println!("Password reset for {}", args.dn);
    Ok(())
}

pub async fn enable(
    args: StateArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    manager
        .set_account_state(&args.dn, AccountState::Enabled)
        .await?;
    println!("Account {} enabled", args.dn);
    Ok(())
}

pub async fn disable(
    args: StateArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    manager
        .set_account_state(&args.dn, AccountState::Disabled)
        .await?;
    println!("Account {} disabled", args.dn);
    Ok(())
}
