//! # Decision Policy Module
//!
//! Questo modulo decide cosa fare del risultato di ogni trasformazione.
//!
//! ## Responsabilità:
//! - `Action`: esito terminale per-file (skip/compress/convert/error)
//! - `TransformOutcome`: record immutabile consumato dall'aggregatore
//! - Predicati di miglioramento: un re-encode vale solo se strettamente più
//!   piccolo; una conversione GIF vale anche a parità di dimensione quando il
//!   path di output cambia (la migrazione di formato è essa stessa lo scopo)
//!
//! Il candidato più grande dell'originale viene scartato e l'originale resta
//! intatto su disco: nessun outcome non-skip può mai registrare
//! `new_bytes >= original_bytes`.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Terminal action for a single asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Below its heavy cutoff, or explicitly excluded (gif with no target)
    SkippedNotHeavy,
    /// Transformed, but the result was not smaller than the original
    SkippedNoGain,
    /// Replaced in place with a strictly smaller re-encode
    Compressed,
    /// Converted to a new file beside the original
    Converted,
    /// The transformation failed; original untouched
    Failed,
}

impl Action {
    /// Short label for the report table
    pub fn label(self) -> &'static str {
        match self {
            Action::SkippedNotHeavy | Action::SkippedNoGain => "skip",
            Action::Compressed => "compress",
            Action::Converted => "convert",
            Action::Failed => "error",
        }
    }
}

/// Result of processing a single asset. Created once, never mutated,
/// consumed by the run aggregator and the report.
#[derive(Debug, Clone, Serialize)]
pub struct TransformOutcome {
    pub path: PathBuf,
    /// Set only for conversions that produced a differently named file
    pub new_path: Option<PathBuf>,
    pub original_bytes: u64,
    pub new_bytes: u64,
    pub action: Action,
    /// Parameter note for the report, e.g. "q=80" or "crf=24"
    pub note: String,
}

impl TransformOutcome {
    pub fn skipped_not_heavy(path: PathBuf, size: u64, note: impl Into<String>) -> Self {
        Self {
            path,
            new_path: None,
            original_bytes: size,
            new_bytes: size,
            action: Action::SkippedNotHeavy,
            note: note.into(),
        }
    }

    pub fn no_gain(path: PathBuf, size: u64, note: impl Into<String>) -> Self {
        Self {
            path,
            new_path: None,
            original_bytes: size,
            new_bytes: size,
            action: Action::SkippedNoGain,
            note: note.into(),
        }
    }

    pub fn compressed(path: PathBuf, original: u64, new: u64, note: impl Into<String>) -> Self {
        debug_assert!(new < original, "compressed outcome must strictly shrink");
        Self {
            path,
            new_path: None,
            original_bytes: original,
            new_bytes: new,
            action: Action::Compressed,
            note: note.into(),
        }
    }

    pub fn converted(
        path: PathBuf,
        new_path: PathBuf,
        original: u64,
        new: u64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            path,
            new_path: Some(new_path),
            original_bytes: original,
            new_bytes: new,
            action: Action::Converted,
            note: note.into(),
        }
    }

    pub fn failed(path: PathBuf, size: u64, note: impl Into<String>) -> Self {
        Self {
            path,
            new_path: None,
            original_bytes: size,
            new_bytes: size,
            action: Action::Failed,
            note: note.into(),
        }
    }

    /// Size reduction for this asset alone, 0 when the original size is 0
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            ((self.original_bytes as f64 - self.new_bytes as f64) / self.original_bytes as f64)
                * 100.0
        }
    }
}

/// A re-encode replaces the original only when strictly smaller
pub fn reencode_improves(original_bytes: u64, candidate_bytes: u64) -> bool {
    candidate_bytes < original_bytes
}

/// A gif conversion counts when smaller OR when the output lands at a
/// different path: format migration is a success even without shrinkage.
pub fn conversion_improves(
    original_bytes: u64,
    candidate_bytes: u64,
    input: &Path,
    output: &Path,
) -> bool {
    candidate_bytes < original_bytes || input != output
}
