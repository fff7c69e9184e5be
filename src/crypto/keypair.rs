//! WireGuard (X25519) keypair generation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use x25519_dalek::{PublicKey, StaticSecret};

/// A keypair rendered in WireGuard's text format (padded base64).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedKeypair {
    pub public_key: String,
    pub private_key: String,
}

/// Produces fresh candidate keypairs for a worker.
///
/// Each worker owns its generator exclusively.
pub trait KeyGenerator {
    fn generate(&mut self) -> EncodedKeypair;
}

/// Represents an X25519 keypair.
#[derive(Clone)]
pub struct Keypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl Keypair {
    /// Generates a new random keypair.
    ///
    /// Uses a cryptographically secure random number generator.
    #[inline]
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(rand::thread_rng());
        Self::from_secret(secret)
    }

    /// Builds a keypair from raw private key bytes.
    pub fn from_secret_bytes(secret_bytes: [u8; 32]) -> Self {
        Self::from_secret(StaticSecret::from(secret_bytes))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Returns the public key as standard base64.
    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(self.public.as_bytes())
    }

    /// Returns the private key as standard base64.
    pub fn private_key_base64(&self) -> String {
        STANDARD.encode(self.secret.to_bytes())
    }

    pub fn encode(&self) -> EncodedKeypair {
        EncodedKeypair {
            public_key: self.public_key_base64(),
            private_key: self.private_key_base64(),
        }
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Keypair({})", self.public_key_base64())
    }
}

/// The production generator: a fresh X25519 keypair per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct X25519Generator;

impl KeyGenerator for X25519Generator {
    #[inline]
    fn generate(&mut self) -> EncodedKeypair {
        Keypair::generate().encode()
    }
}
