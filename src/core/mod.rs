//! Core library components.
//!
//! This module contains the reusable logic for configuration, signing,
//! secrets encryption and gist publishing.

pub mod abi;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod gist;
pub mod rpc;
pub mod signer;
pub mod types;
pub mod validation;
pub mod workflow;
