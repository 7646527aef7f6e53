//! Entry search.

use clap::Args;

use adkit_accounts::AccountManager;
use adkit_directory::LdapDirectorySession;

use crate::error::CliResult;

#[derive(Args)]
pub struct SearchArgs {
    /// Base DN to search under (e.g. DC=example,DC=com)
    #[arg(long)]
    base: String,

    /// LDAP filter (e.g. "(sAMAccountName=alice)")
    #[arg(long)]
    filter: String,
}

pub async fn execute(
    args: SearchArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    let results = manager.search_entries(&args.base, &args.filter).await?;

    if results.is_empty() {
        println!("No entries matched");
        return Ok(());
    }

    for summary in results {
        println!(
            "{}\n  cn: {}\n  sAMAccountName: {}",
            summary.dn,
            summary.common_name.as_deref().unwrap_or("-"),
            summary.account_name.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
