//! Test support utilities for fnsecrets integration tests.
//!
//! Provides an isolated command environment, a fake DON with real keys and
//! a mock JSON-RPC node serving its router and coordinator.

#![allow(dead_code)]

pub mod assertions;
pub mod node;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use node::*;

use assert_cmd::Command;
use std::process::Output;
use tempfile::TempDir;

/// Hardhat/Anvil development account #0.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of `DEV_KEY`.
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Hosted secrets URL used across tests.
pub const SECRETS_URL: &str = "https://gist.githubusercontent.com/tester/0123abcd/raw/secrets.json";

/// Test environment with an isolated working directory.
///
/// Commands start from an empty environment so the developer's own
/// variables and `.env` never leak in.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A fnsecrets command with a cleared environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("fnsecrets").expect("failed to find fnsecrets binary");
        cmd.env_clear();
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// A command with the signing key and RPC URL set.
    pub fn cmd_with_node(&self, rpc_url: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("PRIVATE_KEY", DEV_KEY);
        cmd.env("ETHEREUM_SEPOLIA_RPC_URL", rpc_url);
        cmd
    }

    /// Write a `.env` file into the working directory.
    pub fn write_dotenv(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".env"), contents).expect("failed to write .env");
    }
}

/// Run a command off the async runtime.
pub async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("failed to run fnsecrets"))
        .await
        .expect("command task panicked")
}
