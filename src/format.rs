//! On-disk envelope format.
//!
//! ```text
//! SALT (32) | NONCE (24) | CIPHERTEXT | TAG (16)
//! ```
//!
//! Purely positional: no magic, no version byte. Everything after the salt is
//! the output of [`crate::crypto::encrypt`].

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Error, Result};

/// Smallest byte length a well-formed envelope can have (empty plaintext).
pub const ENVELOPE_MIN_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// A borrowed view of an envelope: the KDF salt and the nonce-prefixed
/// sealed box that follows it.
#[derive(Debug)]
pub struct Envelope<'a> {
    salt: [u8; SALT_LEN],
    sealed: &'a [u8],
}

impl<'a> Envelope<'a> {
    pub fn new(salt: [u8; SALT_LEN], sealed: &'a [u8]) -> Self {
        Self { salt, sealed }
    }

    /// Returns the salt used for key derivation.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Returns the nonce-prefixed ciphertext.
    pub fn sealed(&self) -> &'a [u8] {
        self.sealed
    }
}

/// Splits raw file contents into salt and sealed box.
///
/// # Errors
///
/// Returns [`Error::MalformedCiphertext`] if `data` is shorter than
/// [`ENVELOPE_MIN_LEN`].
pub fn parse(data: &[u8]) -> Result<Envelope<'_>> {
    if data.len() < ENVELOPE_MIN_LEN {
        return Err(Error::MalformedCiphertext);
    }

    let (salt, sealed) = data.split_at(SALT_LEN);
    let salt: [u8; SALT_LEN] = salt.try_into().map_err(|_| Error::MalformedCiphertext)?;

    Ok(Envelope::new(salt, sealed))
}

/// Serializes an envelope to its on-disk bytes.
pub fn serialize(envelope: &Envelope<'_>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SALT_LEN + envelope.sealed.len());
    buf.extend_from_slice(&envelope.salt);
    buf.extend_from_slice(envelope.sealed);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_len_is_salt_nonce_and_tag() {
        assert_eq!(ENVELOPE_MIN_LEN, 72);
    }

    #[test]
    fn envelope_layout_is_salt_then_sealed() {
        let sealed = [2u8; NONCE_LEN + TAG_LEN + 5];
        let bytes = serialize(&Envelope::new([1u8; SALT_LEN], &sealed));

        assert_eq!(bytes.len(), SALT_LEN + sealed.len());
        assert_eq!(&bytes[..SALT_LEN], &[1u8; SALT_LEN]);
        assert_eq!(&bytes[SALT_LEN..], &sealed);

        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.salt(), &[1u8; SALT_LEN]);
        assert_eq!(parsed.sealed(), &sealed);
    }

    #[test]
    fn shortest_valid_envelope_parses() {
        let data = vec![0u8; ENVELOPE_MIN_LEN];
        let parsed = parse(&data).unwrap();
        assert_eq!(parsed.sealed().len(), NONCE_LEN + TAG_LEN);
    }

    #[test]
    fn too_short_fails() {
        for len in [0, 10, SALT_LEN, ENVELOPE_MIN_LEN - 1] {
            let data = vec![0u8; len];
            assert!(
                matches!(parse(&data), Err(Error::MalformedCiphertext)),
                "length {len} should be rejected"
            );
        }
    }
}
