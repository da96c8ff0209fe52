use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xpipack::{
    archive::Compression,
    config::Config,
    error::ErrorKind,
    inspector::inspect,
    output::{print_report, InfoReport, OutputFormat},
    PackageBuilder,
};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const INVALID_IDENTIFIER: u8 = 2;
}

#[derive(Parser)]
#[command(name = "xpipack")]
#[command(
    author,
    version,
    about = "Inspect browser extensions and build .xpi packages"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the identity of an extension directory or .xpi file
    Info {
        /// Extension directory or .xpi archive
        path: PathBuf,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Package an extension directory into <id>.xpi
    Build {
        /// Extension source directory
        source: PathBuf,

        /// Directory to write the package into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Store entries without compression
        #[arg(long)]
        stored: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(command: Commands) -> Result<u8> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {:#}", e);
        Config::default()
    });

    match command {
        Commands::Info { path, format } => {
            let format = format.unwrap_or_else(|| config.default_format.as_str().to_string());
            run_info(&path, &format)?;
            Ok(exit_codes::SUCCESS)
        }
        Commands::Build {
            source,
            output,
            stored,
        } => {
            let compression = if stored {
                Compression::Stored
            } else {
                config.compression
            };
            let output_dir = output.or(config.output_dir);
            run_build(&source, output_dir.as_deref(), compression).await
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_info(path: &Path, format: &str) -> Result<()> {
    let format = OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?;
    let ext = inspect(path)?;
    print_report(&InfoReport::new(path, ext), format)
}

async fn run_build(source: &Path, output_dir: Option<&Path>, compression: Compression) -> Result<u8> {
    let builder = PackageBuilder::new().with_compression(compression);

    let progress = if std::io::stderr().is_terminal() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {pos} files {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = builder
        .build_with_progress(source, output_dir, |name| {
            if let Some(ref pb) = progress {
                pb.set_message(name.to_string());
                pb.inc(1);
            }
        })
        .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match result {
        Ok(written) => {
            println!("{}", written.display());
            Ok(exit_codes::SUCCESS)
        }
        Err(e) if e.kind() == ErrorKind::InvalidIdentifier => {
            eprintln!("Error: {}", e);
            Ok(exit_codes::INVALID_IDENTIFIER)
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'xpipack config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
