//! fnsecrets - encrypt API credentials for Chainlink Functions requests.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── output        # Terminal output helpers
//! │   └── report        # Result rendering
//! └── core/             # Core library components
//!     ├── config        # Environment configuration
//!     ├── signer        # secp256k1 wallet bound to an RPC provider
//!     ├── rpc           # JSON-RPC client
//!     ├── abi           # Minimal ABI encoding for router/coordinator calls
//!     ├── cipher/       # Secrets encryption
//!     │   ├── mod       # SecretsEncryptor trait
//!     │   ├── manager   # Router/DON bound secrets manager
//!     │   ├── ecies     # DON public key encryption
//!     │   └── tdh2      # Threshold encryption
//!     ├── gist          # Gist publisher
//!     └── workflow      # Encrypt / publish / re-encrypt pipeline
//! ```

pub mod cli;
pub mod core;
pub mod error;
