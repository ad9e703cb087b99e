//! fnsecrets - encrypt API credentials for Chainlink Functions requests.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fnsecrets::cli::output;
use fnsecrets::cli::{execute, Cli};
use fnsecrets::core::{config, constants};
use fnsecrets::error::{ConfigError, Error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("fnsecrets=debug")
        } else {
            EnvFilter::new("fnsecrets=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let result = if cli.no_dotenv {
        execute(cli).await
    } else {
        match config::load_dotenv() {
            Ok(_) => execute(cli).await,
            Err(e) => Err(e),
        }
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        for cause in e.causes() {
            output::hint(&format!("caused by: {}", cause));
        }
        if let Error::Config(ConfigError::MissingVar(name)) = &e {
            output::hint(&format!("set {} in the environment or a .env file", name));
        }
        std::process::exit(1);
    }
}

