use std::fmt;
use std::str::FromStr;

use bcrypt::Version;
use rand::rngs::OsRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ConfigError, HashingError};
use crate::random::{RandomSource, SALT_LEN};

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;
pub const DEFAULT_COST: u32 = 12;

/// Bcrypt only ever looks at the first 72 bytes of a password. Longer input is
/// refused instead of being cut short behind the caller's back.
pub const MAX_SECRET_LEN: usize = 72;

/// Length of a canonical `$2b$cc$<salt><digest>` string.
pub const ENCODED_LEN: usize = 60;

/// Version tag written at the start of the encoded hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HashVersion {
    #[serde(rename = "2a")]
    TwoA,
    #[default]
    #[serde(rename = "2b")]
    TwoB,
    #[serde(rename = "2x")]
    TwoX,
    #[serde(rename = "2y")]
    TwoY,
}

impl HashVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashVersion::TwoA => "2a",
            HashVersion::TwoB => "2b",
            HashVersion::TwoX => "2x",
            HashVersion::TwoY => "2y",
        }
    }

    fn to_bcrypt(self) -> Version {
        match self {
            HashVersion::TwoA => Version::TwoA,
            HashVersion::TwoB => Version::TwoB,
            HashVersion::TwoX => Version::TwoX,
            HashVersion::TwoY => Version::TwoY,
        }
    }
}

impl fmt::Display for HashVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('$') {
            "2a" => Ok(HashVersion::TwoA),
            "2b" => Ok(HashVersion::TwoB),
            "2x" => Ok(HashVersion::TwoX),
            "2y" => Ok(HashVersion::TwoY),
            other => Err(ConfigError::UnknownVersion(other.to_string())),
        }
    }
}

/// A finished bcrypt hash in its canonical textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashOutput {
    hash: String,
    cost: u32,
    version: HashVersion,
}

impl HashOutput {
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn version(&self) -> HashVersion {
        self.version
    }
}

impl fmt::Display for HashOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash)
    }
}

/// Hash `secret` with a fresh salt from the operating system.
pub fn generate_hash(secret: &str, cost: u32) -> Result<HashOutput, HashingError> {
    generate_hash_with(secret, cost, HashVersion::default(), &mut OsRng)
}

/// Hash `secret`, drawing the salt from `rng`.
///
/// Input is validated before any randomness is consumed: empty secrets, costs
/// outside `MIN_COST..=MAX_COST` and secrets longer than `MAX_SECRET_LEN`
/// bytes are all rejected.
pub fn generate_hash_with<R: RandomSource + ?Sized>(
    secret: &str,
    cost: u32,
    version: HashVersion,
    rng: &mut R,
) -> Result<HashOutput, HashingError> {
    if secret.is_empty() {
        return Err(HashingError::EmptySecret);
    }
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(HashingError::CostOutOfRange(cost));
    }
    if secret.len() > MAX_SECRET_LEN {
        return Err(HashingError::SecretTooLong(secret.len()));
    }

    let mut salt = [0u8; SALT_LEN];
    rng.fill_salt(&mut salt)?;

    debug!(cost, %version, "hashing password");
    let parts = bcrypt::hash_with_salt(secret, cost, salt)?;
    let hash = parts.format_for_version(version.to_bcrypt());
    info!(cost, %version, "password hashed");

    Ok(HashOutput {
        hash,
        cost,
        version,
    })
}

/// Run the hash on tokio's blocking pool and wait for it to finish.
pub async fn spawn_generate(
    secret: String,
    cost: u32,
    version: HashVersion,
) -> Result<HashOutput, HashingError> {
    let handle =
        tokio::task::spawn_blocking(move || generate_hash_with(&secret, cost, version, &mut OsRng));
    Ok(handle.await??)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{CryptoRng, RngCore, SeedableRng, rngs::StdRng};

    const SECRET: &str = "correct horse battery staple";

    fn is_canonical(hash: &str, version: &str, cost: u32) -> bool {
        let prefix = format!("${}${:02}$", version, cost);
        let Some(rest) = hash.strip_prefix(&prefix) else {
            return false;
        };
        hash.len() == ENCODED_LEN
            && rest.len() == 53
            && rest
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'/')
    }

    struct BrokenSource;

    impl RngCore for BrokenSource {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }

        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unimplemented!()
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy pool gone"))
        }
    }

    impl CryptoRng for BrokenSource {}

    #[test]
    fn produces_canonical_encoding() {
        let output = generate_hash(SECRET, 4).unwrap();
        assert!(is_canonical(output.as_str(), "2b", 4), "{}", output);
        assert_eq!(output.cost(), 4);
        assert_eq!(output.version(), HashVersion::TwoB);
    }

    #[test]
    fn cost_is_zero_padded() {
        let mut rng = StdRng::seed_from_u64(1);
        let output = generate_hash_with(SECRET, 5, HashVersion::TwoA, &mut rng).unwrap();
        assert!(output.as_str().starts_with("$2a$05$"));
    }

    #[test]
    fn hash_verify_round_trip() {
        let output = generate_hash(SECRET, 4).unwrap();
        assert!(bcrypt::verify(SECRET, output.as_str()).unwrap());
    }

    #[test]
    fn hash_verify_incorrect() {
        let output = generate_hash(SECRET, 4).unwrap();
        assert!(!bcrypt::verify("scraaaawwwk", output.as_str()).unwrap());
    }

    #[test]
    fn fresh_salt_every_call() {
        let first = generate_hash(SECRET, 4).unwrap();
        let second = generate_hash(SECRET, 4).unwrap();
        assert_ne!(first, second);
        assert!(bcrypt::verify(SECRET, first.as_str()).unwrap());
        assert!(bcrypt::verify(SECRET, second.as_str()).unwrap());
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let first =
            generate_hash_with(SECRET, 4, HashVersion::TwoB, &mut StdRng::seed_from_u64(9))
                .unwrap();
        let second =
            generate_hash_with(SECRET, 4, HashVersion::TwoB, &mut StdRng::seed_from_u64(9))
                .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_version_verifies() {
        for version in [
            HashVersion::TwoA,
            HashVersion::TwoB,
            HashVersion::TwoX,
            HashVersion::TwoY,
        ] {
            let output = generate_hash_with(SECRET, 4, version, &mut OsRng).unwrap();
            assert!(is_canonical(output.as_str(), version.as_str(), 4));
            assert!(bcrypt::verify(SECRET, output.as_str()).unwrap());
        }
    }

    #[test]
    fn rejects_out_of_range_cost() {
        for cost in [0, 3, 32] {
            assert!(matches!(
                generate_hash(SECRET, cost),
                Err(HashingError::CostOutOfRange(c)) if c == cost
            ));
        }
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(
            generate_hash("", 4),
            Err(HashingError::EmptySecret)
        ));
    }

    #[test]
    fn rejects_secret_past_72_bytes() {
        let longest = "a".repeat(MAX_SECRET_LEN);
        assert!(generate_hash(&longest, 4).is_ok());

        let too_long = "a".repeat(MAX_SECRET_LEN + 1);
        assert!(matches!(
            generate_hash(&too_long, 4),
            Err(HashingError::SecretTooLong(73))
        ));
    }

    #[test]
    fn length_is_counted_in_bytes() {
        // 25 three-byte characters
        let secret = "€".repeat(25);
        assert!(matches!(
            generate_hash(&secret, 4),
            Err(HashingError::SecretTooLong(75))
        ));
    }

    #[test]
    fn reports_broken_random_source() {
        let result = generate_hash_with(SECRET, 4, HashVersion::TwoB, &mut BrokenSource);
        assert!(matches!(result, Err(HashingError::Entropy(_))));
    }

    #[test]
    fn parses_version_tags() {
        assert_eq!("2a".parse::<HashVersion>(), Ok(HashVersion::TwoA));
        assert_eq!("$2y".parse::<HashVersion>(), Ok(HashVersion::TwoY));
        assert_eq!(
            "3z".parse::<HashVersion>(),
            Err(ConfigError::UnknownVersion("3z".to_string()))
        );
    }

    #[tokio::test]
    async fn spawned_hash_completes() {
        let output = spawn_generate(SECRET.to_string(), 4, HashVersion::TwoA)
            .await
            .unwrap();
        assert!(is_canonical(output.as_str(), "2a", 4));
        assert!(bcrypt::verify(SECRET, output.as_str()).unwrap());
    }

    #[tokio::test]
    async fn spawned_hash_propagates_errors() {
        let result = spawn_generate(String::new(), 4, HashVersion::TwoB).await;
        assert!(matches!(result, Err(HashingError::EmptySecret)));
    }
}
