//! Sources of random bytes for keys, salts and nonces.

use getrandom::fill;

use crate::error::{Error, Result};

/// A provider of cryptographically secure random bytes.
///
/// Every operation that consumes randomness takes its source explicitly, so a
/// failing or deterministic source can be substituted without global state.
/// Implementations must either fill the whole buffer or return
/// [`Error::RandomnessExhausted`].
pub trait RandomSource {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system's secure generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        fill(buf).map_err(|_| Error::RandomnessExhausted)
    }
}

/// Replays a fixed byte sequence and fails once it runs dry.
///
/// Only meant for tests that need reproducible output or need to simulate an
/// exhausted generator. Never use it to protect real data.
#[derive(Debug, Clone, Default)]
pub struct FixedRandom {
    bytes: Vec<u8>,
    pos: usize,
}

impl FixedRandom {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            pos: 0,
        }
    }

    /// A source that fails on the first non-empty draw.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

impl RandomSource for FixedRandom {
    fn fill_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        // a short read leaves the source untouched
        if buf.len() > self.remaining() {
            return Err(Error::RandomnessExhausted);
        }
        let end = self.pos + buf.len();
        buf.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// Draws exactly `N` bytes.
pub(crate) fn random_array<const N: usize, R: RandomSource + ?Sized>(
    rng: &mut R,
) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    rng.fill_bytes(&mut out)?;
    Ok(out)
}
