use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use super::{KEY_LEN, Key, SALT_LEN};
use crate::error::{Error, Result};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl KdfParams {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidDerivationParameters(msg.to_string()));

        if self.mem_cost_kib < 8 {
            return invalid("argon2 memory cost too low");
        }
        if self.time_cost < 1 {
            return invalid("argon2 time cost must be >= 1");
        }
        if self.parallelism < 1 {
            return invalid("argon2 parallelism must be >= 1");
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return invalid("argon2 memory cost must be at least 8 * parallelism");
        }
        Ok(())
    }
}

/// How much work key derivation spends resisting brute force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrengthTier {
    /// Fast enough for foreground use.
    #[default]
    Interactive,
    Normal,
    Sensitive,
}

/// Maps each [`StrengthTier`] to its Argon2id parameters.
#[derive(Debug, Clone, Copy)]
pub struct TierTable<'a> {
    entries: &'a [(StrengthTier, KdfParams)],
}

/// The built-in table. Each tier is stricter and slower than the one before.
pub const TIERS: TierTable<'static> = TierTable::new(&[
    (
        StrengthTier::Interactive,
        KdfParams {
            mem_cost_kib: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        },
    ),
    (
        StrengthTier::Normal,
        KdfParams {
            mem_cost_kib: 64 * 1024, // 64 MiB
            time_cost: 3,
            parallelism: 1,
        },
    ),
    (
        StrengthTier::Sensitive,
        KdfParams {
            mem_cost_kib: 256 * 1024, // 256 MiB
            time_cost: 4,
            parallelism: 1,
        },
    ),
]);

impl<'a> TierTable<'a> {
    pub const fn new(entries: &'a [(StrengthTier, KdfParams)]) -> Self {
        Self { entries }
    }

    /// Returns the validated parameters registered for `tier`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDerivationParameters`] if the tier is missing or its
    /// entry is out of range.
    pub fn lookup(&self, tier: StrengthTier) -> Result<KdfParams> {
        let params = self
            .entries
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, p)| *p)
            .ok_or_else(|| {
                Error::InvalidDerivationParameters(format!("no entry for {tier:?} tier"))
            })?;
        params.validate()?;
        Ok(params)
    }
}

/// Derive a key from `password` with the built-in parameters for `tier`.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN], tier: StrengthTier) -> Result<Key> {
    derive_key_with_table(password, salt, tier, &TIERS)
}

/// Derive a key using the parameters `table` registers for `tier`.
pub fn derive_key_with_table(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    tier: StrengthTier,
    table: &TierTable<'_>,
) -> Result<Key> {
    let kdf = table.lookup(tier)?;
    derive_key_with_params(password, salt, kdf)
}

/// Derive a key with explicit Argon2id parameters.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    kdf: KdfParams,
) -> Result<Key> {
    kdf.validate()?;

    let params = Params::new(
        kdf.mem_cost_kib,
        kdf.time_cost,
        kdf.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| {
        Error::InvalidDerivationParameters(format!("failed to construct Argon2 params: {e}"))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, &mut *key)
        .map_err(|e| {
            Error::InvalidDerivationParameters(format!("argon2 key derivation failed: {e}"))
        })?;

    Ok(key)
}
