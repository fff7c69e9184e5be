//! Prefix matching for encoded public keys.
//!
//! Compares the leading characters of a base64 public key against the
//! operator's prefix, optionally ignoring ASCII letter case.

mod pattern;

pub use pattern::{MatchResult, Pattern};
