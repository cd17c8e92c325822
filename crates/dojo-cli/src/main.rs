use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "dojo-hook",
    version,
    about = "Describe security scans for DefectDojo imports"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the description of a scan resource (JSON)
    Describe {
        input: PathBuf,
        /// Emit the full import draft as JSON
        #[arg(long)]
        json: bool,
        /// Pin the current time (RFC 3339), used for unfinished scans
        #[arg(long, value_parser = parse_rfc3339)]
        now: Option<OffsetDateTime>,
    },
    /// List known scan types, or resolve one
    Mapping {
        #[arg(long)]
        scan_type: Option<String>,
    },
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Describe { input, json, now } => {
            commands::describe::execute(commands::describe::DescribeInputs {
                config_path: cli.config,
                input,
                json,
                now,
            })
        }
        Commands::Mapping { scan_type } => commands::mapping::execute(cli.config, scan_type),
        Commands::Init { path, force } => init_config(path.or(cli.config), force),
        Commands::Config => commands::config::print_effective(cli.config),
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => dojo_core::config::ConfigPaths::resolve()?.config_path,
    };
    write_default_config(&config_path, force)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}

fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let config = dojo_core::config::Config::default_config();
    config.save(config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    Ok(())
}

fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|err| format!("invalid RFC 3339 time: {err}"))
}
