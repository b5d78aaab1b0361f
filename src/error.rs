use thiserror::Error;

/// Failure kinds surfaced by every pwseal operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The random source could not supply the requested bytes.
    #[error("random source could not supply enough bytes")]
    RandomnessExhausted,

    /// The selected tier has no usable entry in the derivation table, or the
    /// explicit parameters are out of range.
    #[error("invalid key derivation parameters: {0}")]
    InvalidDerivationParameters(String),

    /// Input is too short to be a sealed message or envelope.
    #[error("ciphertext is truncated or not an encrypted envelope")]
    MalformedCiphertext,

    /// Sealed data failed verification. A wrong password and tampered data
    /// are reported the same way.
    #[error("invalid password or corrupted data")]
    AuthenticationFailure,

    /// The AEAD refused to seal the plaintext (beyond its length limit).
    #[error("plaintext too large to encrypt")]
    PlaintextTooLarge,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KdfParams, StrengthTier, TierTable, derive_key_with_table};

    #[test]
    fn invalid_parameters_carry_a_reason() {
        let table = TierTable::new(&[]);
        let err = derive_key_with_table(b"pw", &[0u8; 32], StrengthTier::Normal, &table)
            .unwrap_err();

        match &err {
            Error::InvalidDerivationParameters(reason) => assert!(reason.contains("Normal")),
            other => panic!("expected InvalidDerivationParameters, got: {other:?}"),
        }
        assert!(err.to_string().starts_with("invalid key derivation parameters: "));

        match KdfParams::new(4, 1, 1) {
            Err(Error::InvalidDerivationParameters(reason)) => {
                assert_eq!(reason, "argon2 memory cost too low");
            }
            other => panic!("expected InvalidDerivationParameters, got: {other:?}"),
        }
    }

    #[test]
    fn every_kind_has_a_distinct_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let messages = [
            Error::RandomnessExhausted.to_string(),
            Error::InvalidDerivationParameters("x".into()).to_string(),
            Error::MalformedCiphertext.to_string(),
            Error::AuthenticationFailure.to_string(),
            Error::PlaintextTooLarge.to_string(),
            Error::Io(io).to_string(),
        ];

        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(messages[4], "plaintext too large to encrypt");
    }
}
