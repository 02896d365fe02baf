//! # Progress Tracking and Run Aggregation Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di run.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - `RunTotals`: accumula ogni `TransformOutcome` in totali monotoni
//! - Calcolo della riduzione complessiva del run
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_compressed / files_converted**: File effettivamente trasformati
//! - **files_skipped**: File sotto soglia o senza guadagno
//! - **errors**: Trasformazioni fallite
//! - **total_original_bytes / total_new_bytes**: Byte prima/dopo
//!
//! L'accumulo avviene in un unico punto di serializzazione (l'orchestratore,
//! dopo il join dei worker), quindi `RunTotals` non ha bisogno di lock.

use crate::policy::{Action, TransformOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for media optimization
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Hidden bar for JSON mode, where stdout belongs to the event stream
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Run-level totals folded from every per-file outcome
#[derive(Debug, Default)]
pub struct RunTotals {
    pub files_processed: usize,
    pub files_compressed: usize,
    pub files_converted: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub total_original_bytes: u64,
    pub total_new_bytes: u64,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the totals
    pub fn accumulate(&mut self, outcome: &TransformOutcome) {
        self.files_processed += 1;
        self.total_original_bytes += outcome.original_bytes;
        self.total_new_bytes += outcome.new_bytes;

        match outcome.action {
            Action::Compressed => self.files_compressed += 1,
            Action::Converted => self.files_converted += 1,
            Action::SkippedNotHeavy | Action::SkippedNoGain => self.files_skipped += 1,
            Action::Failed => self.errors += 1,
        }
    }

    pub fn total_bytes_saved(&self) -> u64 {
        self.total_original_bytes.saturating_sub(self.total_new_bytes)
    }

    /// Overall reduction across the run, 0 when nothing was measured
    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_bytes > 0 {
            ((self.total_original_bytes as f64 - self.total_new_bytes as f64)
                / self.total_original_bytes as f64)
                * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Compressed: {} | Converted: {} | Skipped: {} | Errors: {} | Saved: {} ({:.1}%)",
            self.files_processed,
            self.files_compressed,
            self.files_converted,
            self.files_skipped,
            self.errors,
            crate::file_manager::FileManager::format_size(self.total_bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::TransformOutcome;

    #[test]
    fn test_accumulate_outcomes() {
        let mut totals = RunTotals::new();
        totals.accumulate(&TransformOutcome::compressed(
            "a.jpg".into(),
            1_000_000,
            400_000,
            "q=85",
        ));
        totals.accumulate(&TransformOutcome::skipped_not_heavy(
            "b.png".into(),
            50_000,
            "below heavy",
        ));
        totals.accumulate(&TransformOutcome::failed(
            "c.mp4".into(),
            9_000_000,
            "error:ffmpeg missing",
        ));

        assert_eq!(totals.files_processed, 3);
        assert_eq!(totals.files_compressed, 1);
        assert_eq!(totals.files_skipped, 1);
        assert_eq!(totals.errors, 1);
        assert_eq!(totals.total_original_bytes, 10_050_000);
        assert_eq!(totals.total_new_bytes, 9_450_000);
        assert_eq!(totals.total_bytes_saved(), 600_000);
    }

    #[test]
    fn test_overall_reduction() {
        let mut totals = RunTotals::new();
        totals.accumulate(&TransformOutcome::compressed(
            "a.jpg".into(),
            1_000,
            500,
            "q=85",
        ));
        totals.accumulate(&TransformOutcome::compressed(
            "b.jpg".into(),
            1_000,
            500,
            "q=85",
        ));
        assert!((totals.overall_reduction_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_run_has_zero_reduction() {
        let totals = RunTotals::new();
        assert_eq!(totals.overall_reduction_percent(), 0.0);
    }
}
