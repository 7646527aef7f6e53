//! Full attribute dump of an entry.

use clap::Args;

use adkit_accounts::AccountManager;
use adkit_directory::{AttributeValue, LdapDirectorySession};

use crate::error::CliResult;

#[derive(Args)]
pub struct ShowArgs {
    /// Distinguished name of the entry
    #[arg(long)]
    dn: String,
}

pub async fn execute(
    args: ShowArgs,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    let entry = manager.get_all_attributes(&args.dn).await?;

    println!("{}", entry.dn);

    let mut names: Vec<&String> = entry.attrs.keys().collect();
    names.sort();

    for name in names {
        for value in &entry.attrs[name] {
            match value {
                AttributeValue::Text(text) => println!("  {name}: {text}"),
                AttributeValue::Binary(bytes) => {
                    println!("  {name}: <{} binary bytes>", bytes.len());
                }
            }
        }
    }
    Ok(())
}
