//! # wg_vanity
//!
//! Parallel WireGuard vanity key generator.
//!
//! ## Architecture
//!
//! - `estimate`: Expected attempts and time for a prefix
//! - `crypto`: X25519 key generation and base64 encoding
//! - `matcher`: Prefix matching
//! - `worker`: Worker protocol, search loop and thread pool
//! - `search`: Coordinator, progress reporting and the search entry point
//! - `host`: Host capabilities probed at startup
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod estimate;
pub mod format;
pub mod host;
pub mod matcher;
pub mod search;
pub mod worker;

pub use config::{Config, Settings};
pub use crypto::{EncodedKeypair, KeyGenerator, Keypair};
pub use estimate::{estimate_time, estimate_vanity, Estimate, TimeEstimate, ValidationError};
pub use host::HostInfo;
pub use matcher::{MatchResult, Pattern};
pub use search::{run_search, SearchError, SearchRequest, SearchResult, StatusLine};
pub use worker::{WorkerMsg, WorkerPool};
