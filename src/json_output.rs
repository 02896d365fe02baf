//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per uso programmatico
//! (wrapper di build, CI del sito).
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del run (directory, totale file, configurazione)
//! - `file_complete`: Esito di un singolo file
//! - `complete`: Fine run con i totali aggregati

use crate::config::{Config, GifTarget};
use crate::policy::TransformOutcome;
use crate::progress::RunTotals;
use serde::Serialize;
use std::path::PathBuf;

/// JSON event emitted on stdout when `--json` is active
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        new_path: Option<PathBuf>,
        action: String,
        original_size: u64,
        new_size: u64,
        reduction_percent: f64,
        note: String,
    },

    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_compressed: usize,
        files_converted: usize,
        files_skipped: usize,
        errors: usize,
        total_original_bytes: u64,
        total_new_bytes: u64,
        overall_reduction_percent: f64,
        text_files_updated: usize,
        duration_seconds: f64,
    },
}

/// Configuration snapshot included in the start event
#[derive(Debug, Serialize)]
pub struct JsonConfig {
    pub intensity: u8,
    pub gif_target: Option<GifTarget>,
    pub workers: usize,
    pub dry_run: bool,
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            intensity: config.intensity.unwrap_or_default().level(),
            gif_target: config.gif_target,
            workers: config.workers,
            dry_run: config.dry_run,
        }
    }
}

impl JsonMessage {
    pub fn start(input_dir: PathBuf, total_files: usize, config: &Config) -> Self {
        JsonMessage::Start {
            input_dir,
            total_files,
            config: JsonConfig::from(config),
        }
    }

    pub fn file_complete(outcome: &TransformOutcome) -> Self {
        JsonMessage::FileComplete {
            path: outcome.path.clone(),
            new_path: outcome.new_path.clone(),
            action: outcome.action.label().to_string(),
            original_size: outcome.original_bytes,
            new_size: outcome.new_bytes,
            reduction_percent: outcome.reduction_percent(),
            note: outcome.note.clone(),
        }
    }

    pub fn complete(totals: &RunTotals, text_files_updated: usize, duration_seconds: f64) -> Self {
        JsonMessage::Complete {
            files_processed: totals.files_processed,
            files_compressed: totals.files_compressed,
            files_converted: totals.files_converted,
            files_skipped: totals.files_skipped,
            errors: totals.errors,
            total_original_bytes: totals.total_original_bytes,
            total_new_bytes: totals.total_new_bytes,
            overall_reduction_percent: totals.overall_reduction_percent(),
            text_files_updated,
            duration_seconds,
        }
    }

    /// Print this message as a single JSON line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }
}
