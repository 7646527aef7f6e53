//! adkit - directory account administration from the command line
//!
//! One subcommand per account operation; the binary binds a session, runs
//! the operation through the account engine, renders the outcome, and
//! unbinds on every exit path. All directory semantics live in the library
//! crates.

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use adkit_accounts::{AccountManager, AccountSettings};
use adkit_directory::{DirectoryConfig, LdapDirectorySession};
use error::{CliError, CliResult};

/// adkit - manage directory accounts: SPNs, credentials, account state
#[derive(Parser)]
#[command(name = "adkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection parameters, shared by every subcommand.
#[derive(Args)]
struct ConnectionArgs {
    /// Directory server hostname
    #[arg(long, env = "ADKIT_SERVER")]
    server: String,

    /// Server port (defaults to 389, or 636 with --ssl)
    #[arg(long)]
    port: Option<u16>,

    /// Bind DN or principal (e.g. admin@example.com)
    #[arg(long, env = "ADKIT_BIND_DN")]
    bind_dn: String,

    /// Bind password (prompted when not supplied)
    #[arg(long, env = "ADKIT_BIND_PASSWORD", hide_env_values = true)]
    bind_password: Option<String>,

    /// Connect over LDAPS
    #[arg(long, conflicts_with = "starttls")]
    ssl: bool,

    /// Upgrade the connection with STARTTLS
    #[arg(long)]
    starttls: bool,

    /// Domain suffix for derived userPrincipalName values (used by `create`)
    #[arg(long, env = "ADKIT_UPN_DOMAIN")]
    upn_domain: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage service principal names on an entry
    Spn(commands::spn::SpnArgs),

    /// Search for entries under a base DN
    Search(commands::search::SearchArgs),

    /// Show all attributes of an entry
    Show(commands::show::ShowArgs),

    /// Reset an account's password
    Passwd(commands::account::PasswdArgs),

    /// Enable an account
    Enable(commands::account::StateArgs),

    /// Disable an account
    Disable(commands::account::StateArgs),

    /// Create a new user account
    Create(commands::create::CreateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let manager = connect(cli.connection).await?;

    let result = dispatch(cli.command, &manager).await;

    // The session is released regardless of the command's outcome.
    if let Err(e) = manager.unbind().await {
        tracing::warn!(error = %e, "Failed to close directory session");
    }

    result
}

async fn dispatch(
    command: Commands,
    manager: &AccountManager<LdapDirectorySession>,
) -> CliResult<()> {
    match command {
        Commands::Spn(args) => commands::spn::execute(args, manager).await,
        Commands::Search(args) => commands::search::execute(args, manager).await,
        Commands::Show(args) => commands::show::execute(args, manager).await,
        Commands::Passwd(args) => commands::account::passwd(args, manager).await,
        Commands::Enable(args) => commands::account::enable(args, manager).await,
        Commands::Disable(args) => commands::account::disable(args, manager).await,
        Commands::Create(args) => commands::create::execute(args, manager).await,
    }
}

/// Bind a session from the connection arguments, prompting for the password
/// when it was not supplied.
async fn connect(args: ConnectionArgs) -> CliResult<AccountManager<LdapDirectorySession>> {
    let password = match args.bind_password {
        Some(password) => password,
        None => commands::prompt_password(&format!("Password for {}", args.bind_dn))?,
    };

    let mut config = DirectoryConfig::new(args.server, args.bind_dn).with_password(password);
    if args.ssl {
        config = config.with_ssl();
    }
    if args.starttls {
        config = config.with_starttls();
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    let session = LdapDirectorySession::bind(&config)
        .await
        .map_err(CliError::Directory)?;

    // The UPN domain only matters for `create`; the engine validates it
    // there.
    let settings = AccountSettings::new(args.upn_domain.unwrap_or_default());
    Ok(AccountManager::new(session, settings))
}
