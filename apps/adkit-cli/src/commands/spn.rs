//! Service principal name management.

use clap::{Args, Subcommand};

use adkit_accounts::AccountManager;
use adkit_directory::LdapDirectorySession;

use crate::error::CliResult;

#[derive(Args)]
pub struct SpnArgs {
    #[command(subcommand)]
    command: SpnCommands,
}

#[derive(Subcommand)]
enum SpnCommands {
    /// List the SPNs registered on an entry
    List {
        /// Distinguished name of the entry
        #[arg(long)]
        dn: String,
    },

    /// Register an SPN on an entry
    Add {
        /// Distinguished name of the entry
        #[arg(long)]
        dn: String,

        /// Service principal name (e.g. HTTP/web.example.com)
        #[arg(long)]
        spn: String,
    },

    /// Remove an SPN from an entry
    Remove {
        /// Distinguished name of the entry
        #[arg(long)]
        dn: String,

        /// Service principal name to remove
        #[arg(long)]
        spn: String,
    },
}

pub async fn execute(
    args: SpnArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    match args.command {
        SpnCommands::List { dn } => {
            let spns = manager.list_service_principals(&dn).await?;
            if spns.is_empty() {
                println!("No service principal names on {dn}");
            } else {
                println!("Service principal names on {dn}:");
                for spn in spns {
                    println!("  {spn}");
                }
            }
        }
        SpnCommands::Add { dn, spn } => {
            manager.add_service_principal(&dn, &spn).await?;
            println!("Added SPN '{spn}' to {dn}");
        }
        SpnCommands::Remove { dn, spn } => {
            manager.remove_service_principal(&dn, &spn).await?;
            println!("Removed SPN '{spn}' from {dn}");
        }
    }
    Ok(())
}
