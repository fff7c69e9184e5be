//! Cryptographic operations for WireGuard key generation.
//!
//! This module provides:
//! - Secure random X25519 key generation
//! - Base64 text encoding of both halves of the keypair
//! - The `KeyGenerator` seam used by workers

mod keypair;

pub use keypair::{EncodedKeypair, KeyGenerator, Keypair, X25519Generator};

/// Length of a 32-byte key in padded base64.
pub const ENCODED_KEY_LEN: usize = 44;

/// Longest prefix that can ever match; the final character is always `=`.
pub const MAX_PREFIX_LEN: usize = ENCODED_KEY_LEN - 1;
