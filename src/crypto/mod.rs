//! Cryptographic primitives.
//!
//! Provides key generation, Argon2id key derivation and XChaCha20-Poly1305
//! authenticated encryption.

pub mod aead;
pub mod kdf;
pub mod random;

pub use aead::{decrypt, encrypt, encrypt_with, generate_key, generate_key_with, generate_salt};
pub use kdf::{
    KdfParams, StrengthTier, TIERS, TierTable, derive_key, derive_key_with_params,
    derive_key_with_table,
};
pub use random::{FixedRandom, OsRandom, RandomSource};

use zeroize::Zeroizing;

/// Length of the salt (32 bytes).
pub const SALT_LEN: usize = 32;
/// Length of the nonce (24 bytes for XChaCha20-Poly1305).
pub const NONCE_LEN: usize = 24;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the Poly1305 authentication tag (16 bytes).
pub const TAG_LEN: usize = 16;

/// A symmetric key, wiped from memory on drop.
pub type Key = Zeroizing<[u8; KEY_LEN]>;
