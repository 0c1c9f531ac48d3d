use crate::error::ConfigError;
use crate::generator::HashOutput;

pub const DEFAULT_VAR_NAME: &str = "PASSWORD_HASH";

/// How a finished hash is presented on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The bare encoded hash.
    #[default]
    Raw,
    /// A shell assignment, `NAME='<hash>'`, ready to paste into a `.env` file.
    EnvAssignment { name: String },
    /// A single JSON object with the hash, cost and version.
    Json,
}

impl OutputFormat {
    pub fn env_assignment(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if !is_valid_var_name(&name) {
            return Err(ConfigError::InvalidVariableName(name));
        }
        Ok(OutputFormat::EnvAssignment { name })
    }

    /// Render `output` as one line, without the trailing newline.
    pub fn render(&self, output: &HashOutput) -> String {
        match self {
            OutputFormat::Raw => output.to_string(),
            OutputFormat::EnvAssignment { name } => format!("{}='{}'", name, output),
            // HashOutput holds only strings and integers
            OutputFormat::Json => serde_json::to_string(output).unwrap_or_default(),
        }
    }
}

fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
