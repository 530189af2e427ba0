//! Secure Storage Demo CLI
//!
//! Command-line interface for inspecting the options wire format and
//! exercising the storage client against an in-process host.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use securestore_lib::{Platform, StorageMethod};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "securestore-demo")]
#[command(about = "Secure storage demo CLI - inspect options and dispatched requests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with default options per platform (can also be set via SECURESTORE_OPTIONS env var)
    #[arg(long, global = true, env = "SECURESTORE_OPTIONS")]
    options_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the serialized options sent to the host
    Options {
        /// Only this platform
        #[arg(short, long, value_enum)]
        platform: Option<PlatformArg>,
    },

    /// Show the request a storage operation would dispatch, without a host
    Request {
        /// Operation to dispatch
        #[arg(value_enum)]
        method: MethodArg,

        /// Entry key (set, get, contains-key, remove)
        #[arg(short, long)]
        key: Option<String>,

        /// Entry value (set)
        #[arg(long)]
        value: Option<String>,

        /// Per-call timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Run a scripted session against the in-memory host
    Session {
        /// Prefix for the keys written by the session
        #[arg(long, default_value = "demo.")]
        prefix: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Android,
    Ios,
    Macos,
    Web,
    Windows,
    Linux,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Android => Platform::Android,
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Macos => Platform::MacOs,
            PlatformArg::Web => Platform::Web,
            PlatformArg::Windows => Platform::Windows,
            PlatformArg::Linux => Platform::Linux,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Set,
    Get,
    ContainsKey,
    Remove,
    GetAll,
    Clear,
}

impl From<MethodArg> for StorageMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Set => StorageMethod::Set,
            MethodArg::Get => StorageMethod::Get,
            MethodArg::ContainsKey => StorageMethod::ContainsKey,
            MethodArg::Remove => StorageMethod::Remove,
            MethodArg::GetAll => StorageMethod::GetAll,
            MethodArg::Clear => StorageMethod::Clear,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("securestore_demo_cli=debug,securestore_lib=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("securestore_demo_cli=info,securestore_lib=warn")
            .init();
    }

    let options = commands::load_options(cli.options_file.as_deref())?;

    // Dispatch commands
    match cli.command {
        Commands::Options { platform } => {
            commands::options::run(&options, platform.map(Platform::from), cli.verbose)?;
        }
        Commands::Request {
            method,
            key,
            value,
            timeout_ms,
        } => {
            commands::request::run(
                options,
                method.into(),
                key.as_deref(),
                value,
                timeout_ms,
                cli.verbose,
            )
            .await?;
        }
        Commands::Session { prefix } => {
            commands::session::run(options, &prefix, cli.verbose).await?;
        }
    }

    Ok(())
}
