use std::cmp::Ordering;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use versioncheck::config::CheckConfig;
use versioncheck::{CheckError, Criteria, DispatchKey, Registry, Version};

#[derive(Parser)]
#[command(name = "versioncheck")]
#[command(version, about = "Evaluate version criteria and versioned dispatch tables")]
struct Cli {
    /// Log at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Test a version against a criteria expression
    Test {
        criteria: String,
        /// Omit to test an unknown version
        version: Option<String>,
    },
    /// Compare two versions
    Compare { a: String, b: String },
    /// Resolve which entry configured for a key handles a version
    Resolve {
        #[arg(short, long)]
        config: PathBuf,
        key: String,
        version: Option<String>,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Command::Resolve { config, .. } => CheckConfig::from_path(config)
            .with_context(|| format!("Failed to load config {:?}", config))?,
        _ => CheckConfig::default(),
    };
    init_logging(if cli.verbose { "info" } else { config.log.level.as_str() });

    match cli.command {
        Command::Test { criteria, version } => {
            let criteria = Criteria::parse(&criteria)?;
            let satisfied = criteria.test(version.as_deref());
            println!("{}", satisfied);
            Ok(if satisfied {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Compare { a, b } => {
            let symbol = match Version::parse(&a).cmp(&Version::parse(&b)) {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            println!("{}", symbol);
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve { key, version, .. } => {
            let registry = Registry::new();
            let dispatch_key = DispatchKey::from_path(&key);
            for (index, criteria) in config.criteria_for(&key)?.into_iter().enumerate() {
                registry.register(dispatch_key.clone(), criteria, index);
            }
            info!("{} candidates for {}", registry.candidates(&dispatch_key), key);

            match registry.resolve(&dispatch_key, version.as_deref()) {
                Ok(index) => {
                    println!("#{} {}", index, config.gates[&key][index]);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e @ CheckError::VersionNotSupport { .. }) => {
                    eprintln!("{}", e);
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
