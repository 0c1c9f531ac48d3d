use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hashgen::output::DEFAULT_VAR_NAME;
use hashgen::{HashVersion, HasherConfig, OutputFormat, Preset};
use thiserror::Error;
use tracing::{Level, debug};

/// Simple CLI to hash a password using bcrypt
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Password to hash
    password: Option<String>,

    /// Start from the settings of a known hash script
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Work factor, 4 to 31 [default: 12]
    #[arg(long)]
    cost: Option<u32>,

    /// How to print the hash [default: raw]
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Variable name for the env format, implies --format env
    #[arg(long)]
    var_name: Option<String>,

    /// Version tag of the produced hash: 2a, 2b, 2x or 2y [default: 2b]
    #[arg(long)]
    hash_version: Option<HashVersion>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    Plain,
    EnvFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Raw,
    Env,
    Json,
}

#[derive(Debug, Error)]
#[error("no password given, usage: hasher [OPTIONS] <PASSWORD>")]
struct MissingInput;

impl Args {
    fn config(&self) -> anyhow::Result<HasherConfig> {
        let mut config = match self.preset {
            Some(PresetArg::Plain) => HasherConfig::from(Preset::Plain),
            Some(PresetArg::EnvFile) => HasherConfig::from(Preset::EnvFile),
            None => HasherConfig::default(),
        };
        if let Some(cost) = self.cost {
            config.cost = cost;
        }
        if let Some(version) = self.hash_version {
            config.version = version;
        }
        match self.format {
            Some(FormatArg::Raw) => config.format = OutputFormat::Raw,
            Some(FormatArg::Json) => config.format = OutputFormat::Json,
            Some(FormatArg::Env) => {
                let name = self.var_name.as_deref().unwrap_or(DEFAULT_VAR_NAME);
                config.format = OutputFormat::env_assignment(name)?;
            }
            None => {
                if let Some(name) = &self.var_name {
                    config.format = OutputFormat::env_assignment(name.as_str())?;
                }
            }
        }
        Ok(config)
    }
}

async fn run(args: Args) -> anyhow::Result<String> {
    let config = args.config().context("invalid options")?;
    let password = args
        .password
        .filter(|password| !password.is_empty())
        .ok_or(MissingInput)?;

    debug!(cost = config.cost, version = %config.version, "configuration resolved");
    let line = config
        .run(password)
        .await
        .context("failed to generate the hash")?;
    Ok(line)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
