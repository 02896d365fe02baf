//! # Site Media Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Validazione fatale della configurazione (intensità, directory base)
//! - Creazione della configurazione e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (directory, intensity, gif-format, etc.)
//! 2. Configura il logging su stderr (INFO o DEBUG con --verbose)
//! 3. Valida l'intensità se passata da flag (errore fatale fuori da 1-5)
//! 4. Crea un oggetto Config; i knob non passati vengono chiesti
//!    interattivamente dopo il riepilogo dell'analisi
//! 5. Istanzia MediaOptimizer e avvia il processo
//!
//! ## Esempio di utilizzo:
//! ```bash
//! site-optimizer ./public --intensity 3 --gif-format mp4 --update-refs -y
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use site_media_optimizer::{Config, GifTarget, Intensity, MediaOptimizer};

#[derive(Parser)]
#[command(name = "site-optimizer")]
#[command(about = "Optimize website images, videos and GIFs toward ideal sizes")]
struct Args {
    /// Directory containing the site to optimize
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Compression intensity (1 gentle - 5 aggressive); prompted when omitted
    #[arg(short, long)]
    intensity: Option<u8>,

    /// What to do with heavy animated GIFs; prompted when omitted
    #[arg(long, value_enum)]
    gif_format: Option<GifFormatArg>,

    /// Rewrite references to converted files in .html/.js/.css
    #[arg(long)]
    update_refs: bool,

    /// Number of parallel workers for image encoding
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Video audio bitrate
    #[arg(short, long, default_value = "128k")]
    audio_bitrate: String,

    /// Dry run - don't actually replace files
    #[arg(long)]
    dry_run: bool,

    /// Skip interactive confirmations
    #[arg(short = 'y', long)]
    yes: bool,

    /// Emit JSON events on stdout instead of the text report
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// CLI spelling of the gif conversion target
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum GifFormatArg {
    Mp4,
    Webm,
    Skip,
}

impl From<GifFormatArg> for GifTarget {
    fn from(arg: GifFormatArg) -> Self {
        match arg {
            GifFormatArg::Mp4 => GifTarget::Mp4,
            GifFormatArg::Webm => GifTarget::Webm,
            GifFormatArg::Skip => GifTarget::Skip,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr: stdout belongs to the report (or the JSON stream)
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Invalid intensity is fatal before any file is considered
    let intensity = args.intensity.map(Intensity::new).transpose()?;

    if !args.directory.exists() {
        return Err(anyhow::anyhow!(
            "Directory does not exist: {}",
            args.directory.display()
        ));
    }

    let config = Config {
        intensity,
        gif_target: args.gif_format.map(GifTarget::from),
        update_refs: if args.update_refs { Some(true) } else { None },
        assume_yes: args.yes || args.json,
        workers: args.workers,
        audio_bitrate: args.audio_bitrate,
        dry_run: args.dry_run,
        json_output: args.json,
        ..Default::default()
    };

    let mut optimizer = MediaOptimizer::new(&args.directory, config)?;
    optimizer.run().await?;

    Ok(())
}
