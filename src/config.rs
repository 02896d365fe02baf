//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri del run
//! - Definisce `Thresholds`, la tabella immutabile di soglie heavy e ideal target
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `intensity`: Intensità di compressione (1-5; None = chiedi all'utente)
//! - `gif_target`: Formato di conversione GIF (None = chiedi all'utente)
//! - `update_refs`: Riscrive i riferimenti nei file .html/.js/.css
//! - `assume_yes`: Salta le conferme interattive
//! - `workers`: Numero di worker paralleli per le immagini (default: 4)
//! - `audio_bitrate`: Bitrate audio per la ricodifica video (default: "128k")
//! - `dry_run`: Simulazione senza modifiche (default: false)
//! - `json_output`: Eventi JSON su stdout invece del report testuale
//!
//! ## Soglie e target:
//! Le soglie heavy e gli ideal target vivono in `Thresholds`, costruita una
//! volta all'avvio e passata esplicitamente a classificatore e selettore dei
//! parametri, mai letta da stato globale.
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     intensity: Some(Intensity::new(4)?),
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::params::Intensity;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory that receives the pre-transform copies, created under the
/// scanned base directory.
pub const BACKUP_DIR: &str = "backup_originals";

/// Directories never descended into during scans.
pub const EXCLUDE_DIRS: &[&str] = &[BACKUP_DIR, ".git", "node_modules", "dist", "build", ".next"];

/// Target container for animated GIF conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GifTarget {
    Mp4,
    Webm,
    /// Leave every GIF untouched
    Skip,
}

impl GifTarget {
    /// Output extension for the converted file, `None` when skipping
    pub fn extension(self) -> Option<&'static str> {
        match self {
            GifTarget::Mp4 => Some("mp4"),
            GifTarget::Webm => Some("webm"),
            GifTarget::Skip => None,
        }
    }
}

/// Heavy-file cutoffs and ideal targets, in bytes. Inclusive cutoffs: a file
/// exactly at the threshold is already heavy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// jpg/jpeg/png
    pub raster_image_cutoff: u64,
    /// webp/avif
    pub web_image_cutoff: u64,
    pub gif_cutoff: u64,
    /// mp4/mov/webm
    pub video_cutoff: u64,
    /// Size a compressed image should approach
    pub ideal_image_bytes: u64,
    /// Size a compressed video should approach
    pub ideal_video_bytes: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            raster_image_cutoff: 800_000,
            web_image_cutoff: 400_000,
            gif_cutoff: 2_000_000,
            video_cutoff: 8_000_000,
            ideal_image_bytes: 250_000,
            ideal_video_bytes: 5_000_000,
        }
    }
}

/// Configuration for a single optimization run, immutable once processing
/// starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Compression intensity (1 gentle - 5 aggressive); `None` means ask
    /// interactively before processing starts
    pub intensity: Option<Intensity>,
    /// GIF conversion target; `None` means ask interactively when heavy GIFs
    /// are found
    pub gif_target: Option<GifTarget>,
    /// Rewrite textual references to converted files; `None` means ask
    pub update_refs: Option<bool>,
    /// Skip interactive confirmations
    pub assume_yes: bool,
    /// Number of parallel workers for image encoding
    pub workers: usize,
    /// Audio bitrate for video re-encoding
    pub audio_bitrate: String,
    /// Dry run - don't actually replace files
    pub dry_run: bool,
    /// Emit JSON events instead of the plain-text report
    pub json_output: bool,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            intensity: None,
            gif_target: None,
            update_refs: None,
            assume_yes: false,
            workers: 4,
            audio_bitrate: "128k".to_string(),
            dry_run: false,
            json_output: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if self.audio_bitrate.is_empty() {
            return Err(anyhow::anyhow!("Audio bitrate must not be empty"));
        }

        let t = &self.thresholds;
        if t.ideal_image_bytes == 0 || t.ideal_video_bytes == 0 {
            return Err(anyhow::anyhow!("Ideal target sizes must be greater than 0"));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
