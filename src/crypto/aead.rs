use super::random::random_array;
use super::{KEY_LEN, Key, NONCE_LEN, OsRandom, RandomSource, SALT_LEN};
use crate::error::{Error, Result};
use chacha20poly1305::{
    Key as CipherKey, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroizing;

/// Generate a random key from the OS generator
pub fn generate_key() -> Result<Key> {
    generate_key_with(&mut OsRandom)
}

/// Generate a random key from `rng`
pub fn generate_key_with<R: RandomSource + ?Sized>(rng: &mut R) -> Result<Key> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    rng.fill_bytes(&mut *key)?;
    Ok(key)
}

/// Generate salt
pub fn generate_salt<R: RandomSource + ?Sized>(rng: &mut R) -> Result<[u8; SALT_LEN]> {
    random_array(rng)
}

/// Encrypt plaintext under a fresh nonce from the OS generator.
///
/// Output layout: `nonce (24) | ciphertext | tag (16)`.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    encrypt_with(key, plaintext, &mut OsRandom)
}

/// Encrypt plaintext under a fresh nonce drawn from `rng`.
///
/// Fails with [`Error::RandomnessExhausted`] instead of ever sealing under a
/// nonce that was not freshly drawn.
pub fn encrypt_with<R: RandomSource + ?Sized>(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(CipherKey::from_slice(key));

    let nonce: [u8; NONCE_LEN] = random_array(rng)?;

    let sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| Error::PlaintextTooLarge)?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Decrypt a nonce-prefixed ciphertext produced by [`encrypt`].
pub fn decrypt(key: &[u8; KEY_LEN], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if ciphertext.len() < NONCE_LEN {
        return Err(Error::MalformedCiphertext);
    }
    let (nonce, sealed) = ciphertext.split_at(NONCE_LEN);

    let cipher = XChaCha20Poly1305::new(CipherKey::from_slice(key));

    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| Error::AuthenticationFailure)?;
    Ok(Zeroizing::new(plaintext))
}
