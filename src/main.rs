//! # Asset Transcoder - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Caricamento della configurazione e override da CLI
//! - Avvio della conversione o della generazione del manifest
//!
//! ## Uscita del processo:
//! - Directory sorgente inesistente: errore, exit code non zero
//! - Nessun file da convertire: messaggio dedicato, exit code 0
//! - Run completata (anche con fallimenti per singolo file): exit code 0
//!
//! ## Esempio di utilizzo:
//! ```bash
//! asset-transcoder convert public/img --quality 80
//! asset-transcoder convert --quality 70 --save-config transcoder.json
//! asset-transcoder manifest --project-root .
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use asset_transcoder::json_output::JsonMessage;
use asset_transcoder::{BatchConverter, Config, ManifestBuilder, RunOutcome};

#[derive(Parser)]
#[command(name = "asset-transcoder")]
#[command(about = "Convert JPEG/PNG assets to WebP and report size savings")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every JPEG/PNG in a directory to a sibling .webp file
    Convert(ConvertArgs),
    /// Write a JSON manifest of font, texture and runtime bundle sizes
    Manifest(ManifestArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Directory containing the images (default: public/img)
    source_dir: Option<PathBuf>,

    /// WebP quality (0-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// WebP compression method (0-6, 6 = smallest output)
    #[arg(short, long)]
    method: Option<u8>,

    /// JSON config file with default settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output progress and results as JSON lines
    #[arg(long)]
    json: bool,

    /// Write the effective settings (after overrides) to a JSON config file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Args)]
struct ManifestArgs {
    /// Project root containing `public/` and `src/config/`
    #[arg(short, long, default_value = ".")]
    project_root: PathBuf,

    /// Application config to scan (default: <root>/src/config/index.ts)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Output file (default: <root>/src/config/resource_sizes.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Convert(args) => convert(args).await,
        Command::Manifest(args) => manifest(args).await,
    }
}

async fn convert(args: ConvertArgs) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };

    if let Some(source_dir) = args.source_dir {
        config.source_dir = source_dir;
    }
    if let Some(quality) = args.quality {
        config.webp_quality = quality;
    }
    if let Some(method) = args.method {
        config.webp_method = method;
    }
    config.json_output |= args.json;

    if let Some(ref path) = args.save_config {
        config.validate()?;
        config.save_to_file(path).await?;
        info!("Settings saved to {}", path.display());
    }

    let json_output = config.json_output;
    let converter = BatchConverter::new(config)?;

    match converter.run().await {
        Ok(RunOutcome::NoWork { source_dir }) => {
            info!("Nothing to do in {}", source_dir.display());
            Ok(())
        }
        Ok(RunOutcome::Completed(summary)) => {
            if summary.failure_count() > 0 {
                warn!("{} of {} files failed", summary.failure_count(), summary.total_files());
            }
            Ok(())
        }
        Err(e) => {
            if e.is_fatal() {
                error!("Run aborted before any conversion: {}", e);
            } else {
                error!("Run failed: {}", e);
            }
            if json_output {
                JsonMessage::error(e.to_string(), Some(converter.source_dir().display().to_string())).emit();
            }
            Err(e.into())
        }
    }
}

async fn manifest(args: ManifestArgs) -> Result<()> {
    let mut builder = ManifestBuilder::new(&args.project_root);
    if let Some(config_file) = args.config_file {
        builder = builder.with_config_file(config_file);
    }

    let output = args
        .output
        .unwrap_or_else(|| ManifestBuilder::default_output(&args.project_root));

    info!("Project root: {}", args.project_root.display());
    builder.write(&output).await?;

    Ok(())
}
