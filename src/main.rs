use anyhow::{Context, Result};
use citeset::config::{find_config_file, get_config, load_config, Config, LogFormat};
use citeset::dataset::DatasetBuilder;
use citeset::utils::{DiagnosticSink, TracingSink};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// citeset - Build a citation dataset from PDFs and web pages
#[derive(Parser, Debug)]
#[command(name = "citeset")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build a citation dataset from PDFs and web pages", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract citations and write the dataset
    #[command(alias = "b")]
    Build {
        /// Folder containing PDF files
        #[arg(long, short)]
        folder: Option<PathBuf>,

        /// Link registry CSV ("Document Name", "Title", "Web Link")
        #[arg(long, short, conflicts_with = "no_registry")]
        registry: Option<PathBuf>,

        /// Run without a link registry
        #[arg(long)]
        no_registry: bool,

        /// Web page to include (repeatable, replaces configured URLs)
        #[arg(long = "url", short = 'u')]
        urls: Vec<String>,

        /// Output JSON file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Per-request HTTP timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: ./citeset.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("citeset={}", level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => get_config().context("failed to read configuration from environment")?,
    };

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        Commands::Build {
            folder,
            registry,
            no_registry,
            urls,
            output,
            timeout,
        } => {
            if let Some(folder) = folder {
                config.input.pdf_folder = folder;
            }
            if no_registry {
                config.input.registry_path = None;
            } else if let Some(registry) = registry {
                config.input.registry_path = Some(registry);
            }
            if !urls.is_empty() {
                config.input.urls = urls;
            }
            if let Some(output) = output {
                config.output.path = output;
            }
            if let Some(timeout) = timeout {
                config.http.timeout_seconds = timeout;
            }

            let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
            let builder = DatasetBuilder::from_config(&config, sink)?;
            let summary = builder
                .build(
                    &config.input.pdf_folder,
                    &config.input.urls,
                    config.input.registry(),
                    &config.output.path,
                )
                .await;

            tracing::info!(
                pdf_files = summary.pdf_files,
                pdf_records = summary.pdf_records,
                urls = summary.urls,
                web_records = summary.web_records,
                written = summary.written,
                "Run complete"
            );
        }

        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(citeset::config::CONFIG_FILE_NAME));
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
