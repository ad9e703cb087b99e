//! Command-line interface.

pub mod completions;
pub mod output;
pub mod report;
pub mod run;

use clap::{Parser, Subcommand};

/// fnsecrets - encrypt API credentials for Chainlink Functions requests.
#[derive(Parser)]
#[command(
    name = "fnsecrets",
    about = "Encrypt API credentials for Chainlink Functions requests",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not load a .env file from the current directory
    #[arg(long, global = true)]
    pub no_dotenv: bool,

    /// Functions router contract address
    #[arg(long, global = true)]
    pub router: Option<String>,

    /// DON identifier
    #[arg(long, global = true)]
    pub don_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt hosted secrets URLs
    Urls {
        /// Secrets URL (defaults to OPENWEATHER_API_KEY_GIST; repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,
    },

    /// Encrypt the secret value as inline secrets
    Inline,

    /// Encrypt the secret value, publish it as a gist and encrypt the gist URL
    Gist,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a parsed command line.
pub async fn execute(cli: Cli) -> crate::error::Result<()> {
    let network = run::Network {
        router: cli.router,
        don_id: cli.don_id,
    };

    match cli.command {
        Command::Urls { urls } => run::urls(network, urls).await,
        Command::Inline => run::inline(network).await,
        Command::Gist => run::gist(network).await,
        Command::Completions { shell } => completions::execute(shell),
    }
}
