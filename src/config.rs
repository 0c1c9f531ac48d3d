use crate::error::HashingError;
use crate::generator::{DEFAULT_COST, HashOutput, HashVersion, spawn_generate};
use crate::output::{DEFAULT_VAR_NAME, OutputFormat};

/// Settings for a single hashing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    pub cost: u32,
    pub version: HashVersion,
    pub format: OutputFormat,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
            version: HashVersion::default(),
            format: OutputFormat::default(),
        }
    }
}

/// Ready-made configurations matching the two historical hash scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Cost 10, `$2b$`, printed bare.
    Plain,
    /// Cost 12, `$2a$`, printed as `PASSWORD_HASH='...'`.
    EnvFile,
}

impl From<Preset> for HasherConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Plain => Self {
                cost: 10,
                version: HashVersion::TwoB,
                format: OutputFormat::Raw,
            },
            Preset::EnvFile => Self {
                cost: 12,
                version: HashVersion::TwoA,
                format: OutputFormat::EnvAssignment {
                    name: DEFAULT_VAR_NAME.to_string(),
                },
            },
        }
    }
}

impl HasherConfig {
    /// Hash `secret` and render it according to this configuration.
    pub async fn run(&self, secret: String) -> Result<String, HashingError> {
        let output: HashOutput = spawn_generate(secret, self.cost, self.version).await?;
        Ok(self.format.render(&output))
    }
}
