mod cli; // Command handlers

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use modbridge_core::config::ConfigFormat;
use modbridge_core::kernel::constants::DEFAULT_MODULES_DIR;

/// modbridge: capability probing and data tools for optional extension modules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe for extension modules and show how each capability was bound
    Probe {
        /// Configuration file (JSON, YAML or TOML). Defaults to ./modbridge.toml when present
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory searched for module libraries
        #[arg(short, long, default_value = DEFAULT_MODULES_DIR)]
        modules_dir: PathBuf,
    },
    /// Convert between JSON and the binary tag format
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    /// Encode a JSON document into tag bytes
    Encode {
        /// JSON input file
        input: PathBuf,
        /// Output file for the encoded bytes
        output: PathBuf,
    },
    /// Decode tag bytes and print them as JSON
    Decode {
        /// Encoded input file
        input: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the default configuration
    Default {
        /// Output format: json, yaml or toml
        #[arg(short, long, default_value = "toml", value_parser = parse_format)]
        format: ConfigFormat,
    },
}

fn parse_format(value: &str) -> Result<ConfigFormat, String> {
    ConfigFormat::from_extension(&value.to_lowercase())
        .ok_or_else(|| format!("unsupported configuration format '{}'", value))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let result = match args.command {
        Commands::Probe { config, modules_dir } => cli::probe(config.as_deref(), &modules_dir),
        Commands::Tag { command: TagCommand::Encode { input, output } } => cli::tag_encode(&input, &output),
        Commands::Tag { command: TagCommand::Decode { input, pretty } } => cli::tag_decode(&input, pretty),
        Commands::Config { command: ConfigCommand::Default { format } } => cli::config_default(format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
