//! Password-based authenticated encryption for byte buffers and files.
//!
//! Keys are derived from passwords with Argon2id and data is sealed with
//! XChaCha20-Poly1305. Encrypted files are a fixed positional envelope, see
//! [`format`].
//!
//! ```no_run
//! let message = b"do not go gentle into that good night";
//! pwseal::encrypt_file("poem.enc", b"password", message)?;
//!
//! let plaintext = pwseal::decrypt_file("poem.enc", b"password")?;
//! assert_eq!(plaintext.as_slice(), message);
//! # Ok::<(), pwseal::Error>(())
//! ```

pub mod crypto;
pub mod error;
pub mod format;
pub mod storage;

pub use crate::crypto::{KdfParams, Key, RandomSource, StrengthTier};
pub use crate::error::{Error, Result};
pub use crate::storage::Storage;

use crate::crypto::OsRandom;
use crate::format::Envelope;
use std::path::Path;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Encrypts `plaintext` under `password` and writes the envelope to `path`.
///
/// Salt and nonce come from the OS generator. See [`encrypt_file_with`].
pub fn encrypt_file(path: impl AsRef<Path>, password: &[u8], plaintext: &[u8]) -> Result<()> {
    encrypt_file_with(path, password, plaintext, &mut OsRandom)
}

/// Encrypts `plaintext` under `password` and writes the envelope to `path`,
/// drawing the salt and nonce from `rng`.
///
/// The file is created or overwritten only after every cryptographic step has
/// succeeded, so a failed call leaves any previous file untouched.
///
/// # Errors
///
/// - [`Error::RandomnessExhausted`] if the salt or nonce cannot be drawn.
/// - [`Error::InvalidDerivationParameters`] if the default tier is unusable.
/// - [`Error::Io`] if the file cannot be written.
pub fn encrypt_file_with<R: RandomSource + ?Sized>(
    path: impl AsRef<Path>,
    password: &[u8],
    plaintext: &[u8],
    rng: &mut R,
) -> Result<()> {
    let storage = Storage::new(path.as_ref());

    let salt = crypto::generate_salt(rng)?;
    let key = crypto::derive_key(password, &salt, StrengthTier::default())?;
    let sealed = crypto::encrypt_with(&key, plaintext, rng)?;
    drop(key);

    let file = format::serialize(&Envelope::new(salt, &sealed));
    storage.save(&file)?;

    debug!(
        path = %storage.path().display(),
        plaintext_len = plaintext.len(),
        envelope_len = file.len(),
        "wrote encrypted envelope"
    );
    Ok(())
}

/// Reads the envelope at `path` and decrypts it with `password`.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read.
/// - [`Error::MalformedCiphertext`] if the file is too short to be an envelope.
/// - [`Error::AuthenticationFailure`] if the password is wrong or the data
///   was modified. The two cases cannot be told apart.
pub fn decrypt_file(path: impl AsRef<Path>, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let storage = Storage::new(path.as_ref());

    let data = storage.load()?;
    let envelope = format::parse(&data)?;

    let key = crypto::derive_key(password, envelope.salt(), StrengthTier::default())?;

    let plaintext = crypto::decrypt(&key, envelope.sealed()).inspect_err(|e| {
        warn!(path = %storage.path().display(), "failed to open envelope: {e}");
    })?;

    debug!(
        path = %storage.path().display(),
        plaintext_len = plaintext.len(),
        "decrypted envelope"
    );
    Ok(plaintext)
}
