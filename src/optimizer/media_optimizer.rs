//! # Media Optimizer Main Orchestrator
//!
//! Orchestratore principale del run: scansione, riepilogo, risoluzione delle
//! scelte interattive, dispatch concorrente dei worker, aggregazione e report.
//!
//! ## Modello di concorrenza:
//! - Immagini: fino a `workers` task concorrenti
//! - Video e GIF (transcodifica ffmpeg, CPU-bound): sempre seriali
//! - I permessi vengono acquisiti prima dello spawn, i totali vengono
//!   accumulati solo dopo il join: un unico punto di serializzazione
//! - Ctrl-C ferma il dispatch dei task rimanenti; quelli in volo finiscono
//!   (la persistenza atomica garantisce che nessun originale resti corrotto)

use crate::{
    config::{Config, GifTarget},
    file_manager::FileManager,
    json_output::JsonMessage,
    media::{Analysis, MediaAsset, MediaKind},
    optimizer::task_optimizer::TaskOptimizer,
    policy::{Action, TransformOutcome},
    progress::{ProgressManager, RunTotals},
    prompt, refs, report,
};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Main run orchestrator
pub struct MediaOptimizer {
    config: Config,
    base_dir: PathBuf,
}

impl MediaOptimizer {
    /// Create a new optimizer for a base directory. Configuration errors are
    /// fatal here, before any asset is touched.
    pub fn new(base_dir: &Path, config: Config) -> Result<Self> {
        config.validate()?;
        if !base_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Base directory does not exist: {}",
                base_dir.display()
            ));
        }

        Ok(Self {
            config,
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Run the whole pipeline and return the aggregated totals
    pub async fn run(&mut self) -> Result<RunTotals> {
        let start_time = std::time::Instant::now();

        let assets = FileManager::find_media_assets(&self.base_dir)?;
        let analysis = Analysis::of(&assets, &self.config.thresholds);

        if self.config.json_output {
            JsonMessage::start(self.base_dir.clone(), assets.len(), &self.config).emit();
        } else {
            info!(
                "Scanning complete: {} media files in {}",
                assets.len(),
                self.base_dir.display()
            );
            report::print_analysis(&analysis, &self.config.thresholds);
        }

        if assets.is_empty() {
            let totals = RunTotals::new();
            if self.config.json_output {
                JsonMessage::complete(&totals, 0, start_time.elapsed().as_secs_f64()).emit();
            } else {
                info!("No media files found to process");
            }
            return Ok(totals);
        }

        if !self.resolve_run_choices(&analysis)? {
            info!("Aborted by user");
            return Ok(RunTotals::new());
        }

        self.log_configuration();

        let outcomes = self.process_assets_concurrently(assets).await?;

        // Unico punto di accumulo, dopo il join di tutti i worker
        let mut totals = RunTotals::new();
        for outcome in &outcomes {
            totals.accumulate(outcome);
        }

        let modified = self.rewrite_references(&outcomes).await?;

        if self.config.json_output {
            JsonMessage::complete(&totals, modified.len(), start_time.elapsed().as_secs_f64())
                .emit();
        } else {
            report::print_table(&outcomes, &self.base_dir);
            report::print_run_summary(&totals, modified.len(), self.config.dry_run);
            info!("✅ {}", totals.format_summary());
        }

        Ok(totals)
    }

    /// Resolve the knobs left open by the CLI: confirmation, intensity, gif
    /// target and reference rewriting. All decisions happen here, once,
    /// before any worker starts.
    fn resolve_run_choices(&mut self, analysis: &Analysis) -> Result<bool> {
        let interactive = !self.config.assume_yes && !self.config.json_output;

        if interactive && !prompt::confirm("Proceed with optimization?")? {
            return Ok(false);
        }

        if self.config.intensity.is_none() {
            self.config.intensity = Some(if interactive {
                prompt::ask_intensity()?
            } else {
                Default::default()
            });
        }

        if self.config.gif_target.is_none() {
            self.config.gif_target = Some(if interactive && analysis.heavy_gifs > 0 {
                prompt::ask_gif_target()?
            } else {
                GifTarget::Skip
            });
        }

        if self.config.update_refs.is_none() {
            let converting = self.config.gif_target != Some(GifTarget::Skip);
            self.config.update_refs = Some(if interactive && converting {
                prompt::confirm("Update references to converted files in .html/.js/.css?")?
            } else {
                false
            });
        }

        Ok(true)
    }

    fn log_configuration(&self) {
        if self.config.json_output {
            return;
        }

        info!(
            "Compression intensity: {}",
            self.config.intensity.unwrap_or_default()
        );
        match self.config.gif_target {
            Some(GifTarget::Skip) | None => info!("GIF mode: keep as-is"),
            Some(target) => info!("GIF mode: convert heavy GIFs to {:?}", target),
        }
        if self.config.dry_run {
            info!("Dry run mode: no files will be modified");
        }
        info!(
            "🔧 Concurrency: {} image workers, 1 transcode worker",
            self.config.workers
        );
    }

    /// Dispatch one bounded task per asset and collect every outcome,
    /// sorted by path for a deterministic report.
    async fn process_assets_concurrently(
        &self,
        mut assets: Vec<MediaAsset>,
    ) -> Result<Vec<TransformOutcome>> {
        assets.sort_by(|a, b| a.path.cmp(&b.path));

        let image_semaphore = Arc::new(Semaphore::new(self.config.workers));
        let transcode_semaphore = Arc::new(Semaphore::new(1));

        // Ctrl-C: stop handing out new work, let in-flight tasks finish
        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let cancelled = cancelled.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancelled.store(true, Ordering::SeqCst);
                }
            });
        }

        let progress = if self.config.json_output {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(assets.len() as u64)
        };

        let task_optimizer = Arc::new(TaskOptimizer::new(
            self.config.clone(),
            self.base_dir.clone(),
        ));

        let mut handles = Vec::with_capacity(assets.len());
        let mut dispatched = Vec::with_capacity(assets.len());

        for asset in assets {
            if cancelled.load(Ordering::SeqCst) {
                warn!("Interrupt received, remaining assets were not dispatched");
                break;
            }

            let semaphore = match asset.kind {
                MediaKind::Video | MediaKind::Gif => transcode_semaphore.clone(),
                _ => image_semaphore.clone(),
            };
            let permit = semaphore.acquire_owned().await?;

            let optimizer = task_optimizer.clone();
            let progress = progress.clone();
            let emit_json = self.config.json_output;
            dispatched.push((asset.path.clone(), asset.size_bytes));

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome = optimizer.process_asset(&asset).await;

                progress.update(
                    &asset
                        .path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy(),
                );
                if emit_json {
                    JsonMessage::file_complete(&outcome).emit();
                }
                outcome
            }));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        let results = futures::future::join_all(handles).await;
        for (result, (path, size)) in results.into_iter().zip(dispatched) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!("Worker for {} aborted: {}", path.display(), e);
                    outcomes.push(TransformOutcome::failed(path, size, "error:worker aborted"));
                }
            }
        }

        progress.finish("done");
        outcomes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(outcomes)
    }

    /// Rewrite textual references for converted gifs, when enabled
    async fn rewrite_references(&self, outcomes: &[TransformOutcome]) -> Result<Vec<PathBuf>> {
        let mapping: HashMap<PathBuf, PathBuf> = outcomes
            .iter()
            .filter(|o| o.action == Action::Converted)
            .filter_map(|o| o.new_path.clone().map(|new| (o.path.clone(), new)))
            .collect();

        let enabled = self.config.update_refs.unwrap_or(false);
        if !enabled || mapping.is_empty() || self.config.dry_run {
            return Ok(Vec::new());
        }

        let modified = refs::rewrite_references(&self.base_dir, &mapping).await?;
        info!("Updated references in {} text files", modified.len());
        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn non_interactive_config() -> Config {
        Config {
            assume_yes: true,
            gif_target: Some(GifTarget::Skip),
            update_refs: Some(false),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_over_light_tree_skips_everything() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("img")).unwrap();
        fs::write(base.join("img/icon.png"), vec![0u8; 10_000]).unwrap();
        fs::write(base.join("img/photo.jpg"), vec![0u8; 20_000]).unwrap();
        fs::write(base.join("clip.mp4"), vec![0u8; 30_000]).unwrap();
        fs::write(base.join("notes.txt"), b"ignored").unwrap();

        let mut optimizer = MediaOptimizer::new(base, non_interactive_config()).unwrap();
        let totals = optimizer.run().await.unwrap();

        assert_eq!(totals.files_processed, 3);
        assert_eq!(totals.files_skipped, 3);
        assert_eq!(totals.errors, 0);
        assert_eq!(totals.total_original_bytes, totals.total_new_bytes);
        assert_eq!(totals.overall_reduction_percent(), 0.0);
        // nothing touched, nothing backed up
        assert!(!base.join("backup_originals").exists());
    }

    #[tokio::test]
    async fn test_run_over_empty_tree() {
        let temp = TempDir::new().unwrap();
        let mut optimizer = MediaOptimizer::new(temp.path(), non_interactive_config()).unwrap();
        let totals = optimizer.run().await.unwrap();

        assert_eq!(totals.files_processed, 0);
        assert_eq!(totals.overall_reduction_percent(), 0.0);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let result = MediaOptimizer::new(Path::new("/no/such/dir"), non_interactive_config());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            workers: 0,
            ..non_interactive_config()
        };
        assert!(MediaOptimizer::new(temp.path(), config).is_err());
    }
}
