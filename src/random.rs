use rand::{CryptoRng, RngCore};

use crate::error::HashingError;

/// Number of salt bytes bcrypt consumes.
pub const SALT_LEN: usize = 16;

/// Capability to produce salt bytes.
///
/// Any cryptographically secure `rand` generator qualifies, so production code
/// hands in [`rand::rngs::OsRng`] while tests can pass a seeded
/// [`rand::rngs::StdRng`] and get reproducible hashes back.
pub trait RandomSource {
    fn fill_salt(&mut self, salt: &mut [u8; SALT_LEN]) -> Result<(), HashingError>;
}

impl<R: RngCore + CryptoRng> RandomSource for R {
    fn fill_salt(&mut self, salt: &mut [u8; SALT_LEN]) -> Result<(), HashingError> {
        self.try_fill_bytes(salt)?;
        Ok(())
    }
}
