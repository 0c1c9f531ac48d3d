use thiserror::Error;

use crate::generator::{MAX_COST, MAX_SECRET_LEN, MIN_COST};

/// Everything that can stop a hash from being produced.
#[derive(Debug, Error)]
pub enum HashingError {
    #[error("password must not be empty")]
    EmptySecret,
    #[error("cost {0} is outside the supported range {min}..={max}", min = MIN_COST, max = MAX_COST)]
    CostOutOfRange(u32),
    #[error("password is {0} bytes long, bcrypt accepts at most {max}", max = MAX_SECRET_LEN)]
    SecretTooLong(usize),
    #[error("random source unavailable: {0}")]
    Entropy(#[from] rand::Error),
    #[error("bcrypt failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task did not complete: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` is not a valid environment variable name")]
    InvalidVariableName(String),
    #[error("unknown hash version `{0}`, expected one of 2a, 2b, 2x, 2y")]
    UnknownVersion(String),
}
