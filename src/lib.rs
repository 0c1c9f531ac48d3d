//! Salted bcrypt hash generation for command-line password tooling.
//!
//! The [`generator`] does the hashing, [`output`] turns a finished hash into a
//! printable line and [`config`] ties the two together for a single run.

pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod random;

pub use config::{HasherConfig, Preset};
pub use error::{ConfigError, HashingError};
pub use generator::{HashOutput, HashVersion, generate_hash, generate_hash_with, spawn_generate};
pub use output::OutputFormat;
pub use random::RandomSource;
