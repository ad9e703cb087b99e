//! Encryption commands.
//!
//! Each command loads configuration, binds the wallet, runs the workflow and
//! reports the outcome.

use tracing::debug;

use crate::cli::{output, report};
use crate::core::cipher::{self, SecretsManager};
use crate::core::config::Config;
use crate::core::gist::GistPublisher;
use crate::core::rpc::RpcProvider;
use crate::core::signer::Wallet;
use crate::core::types::SecretsBundle;
use crate::core::workflow::{self, Outcome};
use crate::error::Result;

/// Network overrides from the command line.
#[derive(Debug, Default)]
pub struct Network {
    pub router: Option<String>,
    pub don_id: Option<String>,
}

fn load(network: Network) -> Result<Config> {
    Config::from_env()?.with_network(network.router, network.don_id)
}

fn connect(config: &Config) -> Result<SecretsManager> {
    let provider = RpcProvider::new(&config.rpc_url)?;
    let wallet = Wallet::connect(&config.private_key, provider)?;

    output::kv("signer", wallet.address());
    output::kv("router", &config.router_address);
    output::kv("don", &config.don_id);

    Ok(SecretsManager::new(
        wallet,
        config.router_address.clone(),
        config.don_id.clone(),
    ))
}

fn report(outcome: &Outcome) {
    for line in report::render(outcome) {
        output::result(&line);
    }
}

/// Encrypt hosted secrets URLs.
///
/// Uses `urls` when given, otherwise the configured secrets URL.
pub async fn urls(network: Network, urls: Vec<String>) -> Result<()> {
    let config = load(network)?;
    let mut manager = connect(&config)?;

    let bundle = if urls.is_empty() {
        cipher::urls_bundle(config.secrets_url.as_deref())?
    } else {
        SecretsBundle::Urls(urls)
    };
    debug!(urls = bundle.len(), "encrypting secrets URLs");

    let outcome = workflow::encrypt(&mut manager, &bundle).await?;
    report(&outcome);
    Ok(())
}

/// Encrypt the configured secret value as inline secrets.
pub async fn inline(network: Network) -> Result<()> {
    let config = load(network)?;
    let mut manager = connect(&config)?;

    let bundle = cipher::named_bundle(config.secret_value.as_deref())?;
    let outcome = workflow::encrypt(&mut manager, &bundle).await?;
    report(&outcome);
    Ok(())
}

/// Encrypt the configured secret value, publish it and encrypt the gist URL.
pub async fn gist(network: Network) -> Result<()> {
    let config = load(network)?;
    let publisher = GistPublisher::new(config.github_api_url(), config.github_token()?)?;
    let mut manager = connect(&config)?;

    let bundle = cipher::named_bundle(config.secret_value.as_deref())?;
    let outcome = workflow::encrypt_and_publish(&mut manager, &publisher, &bundle).await?;
    report(&outcome);
    Ok(())
}
