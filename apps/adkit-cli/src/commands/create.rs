//! New account creation.

use clap::Args;

use adkit_accounts::AccountManager;
use adkit_directory::LdapDirectorySession;

use crate::commands::prompt_new_password;
use crate::error::CliResult;

#[derive(Args)]
pub struct CreateArgs {
    /// Parent OU for the new account (e.g. OU=Users,DC=example,DC=com)
    #[arg(long)]
    ou: String,

    /// Common name for the new account
    #[arg(long)]
    cn: String,

    /// Account name (sAMAccountName)
    #[arg(long)]
    account_name: String,

    /// Initial password (prompted when not supplied)
    #[arg(long)]
    password: Option<String>,
}

pub async fn execute(
    args: CreateArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_new_password(&format!("Initial password for {}", args.account_name))?,
    };

    let dn = manager
        .create_account(&args.ou, &args.cn, &args.account_name, &password)
        .await?;
    println!("Created {dn}");
    Ok(())
}
