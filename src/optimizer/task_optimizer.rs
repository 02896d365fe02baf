//! # Task Optimizer Module
//!
//! Worker per un singolo asset: classificazione heavy, backup, selezione dei
//! parametri, trasformazione e decisione finale. Separato dall'orchestratore
//! per maggiore modularità.
//!
//! Un worker non fa mai fallire il run: ogni errore viene catturato nel
//! `TransformOutcome::failed` dell'asset e l'originale resta intatto.

use crate::{
    config::{Config, GifTarget},
    file_manager::FileManager,
    gif_converter::GifConverter,
    image_processor::ImageProcessor,
    media::{MediaAsset, MediaKind},
    params::{self, Intensity},
    policy::{self, TransformOutcome},
    video_processor::VideoProcessor,
};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Worker for processing single assets
pub struct TaskOptimizer {
    config: Config,
    base_dir: PathBuf,
    video_processor: VideoProcessor,
}

impl TaskOptimizer {
    /// Expects a resolved config: intensity and gif target already decided
    pub fn new(config: Config, base_dir: PathBuf) -> Self {
        let video_processor = VideoProcessor::new(config.clone());
        Self {
            config,
            base_dir,
            video_processor,
        }
    }

    fn intensity(&self) -> Intensity {
        self.config.intensity.unwrap_or_default()
    }

    fn gif_target(&self) -> GifTarget {
        self.config.gif_target.unwrap_or(GifTarget::Skip)
    }

    /// Drive one asset to its terminal outcome. Per-asset failures are
    /// folded into the outcome, never propagated.
    pub async fn process_asset(&self, asset: &MediaAsset) -> TransformOutcome {
        let result = match asset.kind {
            MediaKind::RasterImage | MediaKind::WebImage => self.process_image(asset).await,
            MediaKind::Video => self.process_video(asset).await,
            MediaKind::Gif => self.process_gif(asset).await,
        };

        result.unwrap_or_else(|e| {
            warn!("Failed to optimize {}: {}", asset.path.display(), e);
            TransformOutcome::failed(
                asset.path.clone(),
                asset.size_bytes,
                format!("error:{}", e),
            )
        })
    }

    async fn process_image(&self, asset: &MediaAsset) -> Result<TransformOutcome> {
        if !asset.is_heavy(&self.config.thresholds) {
            return Ok(TransformOutcome::skipped_not_heavy(
                asset.path.clone(),
                asset.size_bytes,
                "below heavy",
            ));
        }

        let quality = params::quality_for(
            self.intensity(),
            asset.size_bytes,
            asset.ideal_target(&self.config.thresholds),
        );

        // Backup deve completare prima che l'originale possa essere toccato
        if !self.config.dry_run {
            FileManager::backup_original(&asset.path, &self.base_dir).await?;
        }

        let (candidate, note) = ImageProcessor::encode_candidate(asset, quality).await?;
        let new_size = FileManager::file_size(candidate.path()).await?;

        if policy::reencode_improves(asset.size_bytes, new_size) {
            if !self.config.dry_run {
                FileManager::persist_candidate(candidate, &asset.path)?;
            }
            Ok(TransformOutcome::compressed(
                asset.path.clone(),
                asset.size_bytes,
                new_size,
                note,
            ))
        } else {
            debug!("Candidate for {} not smaller, keeping original", asset.path.display());
            Ok(TransformOutcome::no_gain(
                asset.path.clone(),
                asset.size_bytes,
                note,
            ))
        }
    }

    async fn process_video(&self, asset: &MediaAsset) -> Result<TransformOutcome> {
        if !asset.is_heavy(&self.config.thresholds) {
            return Ok(TransformOutcome::skipped_not_heavy(
                asset.path.clone(),
                asset.size_bytes,
                "below heavy",
            ));
        }

        let crf = params::crf_for(
            self.intensity(),
            asset.size_bytes,
            asset.ideal_target(&self.config.thresholds),
        );

        if !self.config.dry_run {
            FileManager::backup_original(&asset.path, &self.base_dir).await?;
        }

        let (candidate, note) = self.video_processor.encode_candidate(asset, crf).await?;
        let new_size = FileManager::file_size(candidate.path()).await?;

        if policy::reencode_improves(asset.size_bytes, new_size) {
            if !self.config.dry_run {
                // il file mantiene il nome originale anche se il container è mp4
                FileManager::persist_candidate(candidate, &asset.path)?;
            }
            Ok(TransformOutcome::compressed(
                asset.path.clone(),
                asset.size_bytes,
                new_size,
                note,
            ))
        } else {
            Ok(TransformOutcome::no_gain(
                asset.path.clone(),
                asset.size_bytes,
                note,
            ))
        }
    }

    async fn process_gif(&self, asset: &MediaAsset) -> Result<TransformOutcome> {
        let target = self.gif_target();
        if target == GifTarget::Skip {
            return Ok(TransformOutcome::skipped_not_heavy(
                asset.path.clone(),
                asset.size_bytes,
                "skipped",
            ));
        }

        if !asset.is_heavy(&self.config.thresholds) {
            return Ok(TransformOutcome::skipped_not_heavy(
                asset.path.clone(),
                asset.size_bytes,
                "below heavy",
            ));
        }

        if !self.config.dry_run {
            FileManager::backup_original(&asset.path, &self.base_dir).await?;
        }

        let (candidate, new_path, note) = GifConverter::convert_candidate(asset, target).await?;
        let new_size = FileManager::file_size(candidate.path()).await?;

        if policy::conversion_improves(asset.size_bytes, new_size, &asset.path, &new_path) {
            if !self.config.dry_run {
                FileManager::persist_candidate(candidate, &new_path)?;
            }
            Ok(TransformOutcome::converted(
                asset.path.clone(),
                new_path,
                asset.size_bytes,
                new_size,
                note,
            ))
        } else {
            Ok(TransformOutcome::no_gain(
                asset.path.clone(),
                asset.size_bytes,
                note,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Action;
    use tempfile::TempDir;

    fn optimizer_for(base: &TempDir, config: Config) -> TaskOptimizer {
        TaskOptimizer::new(config, base.path().to_path_buf())
    }

    fn asset_at(base: &TempDir, name: &str, bytes: usize) -> MediaAsset {
        let path = base.path().join(name);
        std::fs::write(&path, vec![0u8; bytes]).unwrap();
        let kind = MediaKind::from_path(&path).unwrap();
        MediaAsset::new(path, kind, bytes as u64)
    }

    #[tokio::test]
    async fn test_light_asset_is_skipped_without_backup() {
        let base = TempDir::new().unwrap();
        let optimizer = optimizer_for(&base, Config::default());
        let asset = asset_at(&base, "icon.png", 50_000);

        let outcome = optimizer.process_asset(&asset).await;

        assert_eq!(outcome.action, Action::SkippedNotHeavy);
        assert_eq!(outcome.new_bytes, outcome.original_bytes);
        assert!(!base.path().join("backup_originals").exists());
    }

    #[tokio::test]
    async fn test_gif_with_skip_target_is_recorded_skipped() {
        let base = TempDir::new().unwrap();
        let config = Config {
            gif_target: Some(GifTarget::Skip),
            ..Default::default()
        };
        let optimizer = optimizer_for(&base, config);
        // heavy gif, but the run decided not to convert
        let asset = asset_at(&base, "anim.gif", 2_500_000);

        let outcome = optimizer.process_asset(&asset).await;

        assert_eq!(outcome.action, Action::SkippedNotHeavy);
        assert_eq!(outcome.note, "skipped");
    }

    #[tokio::test]
    async fn test_corrupt_heavy_image_fails_without_touching_original() {
        let base = TempDir::new().unwrap();
        let optimizer = optimizer_for(&base, Config::default());
        // heavy by size, but not a decodable jpeg
        let asset = asset_at(&base, "broken.jpg", 900_000);

        let outcome = optimizer.process_asset(&asset).await;

        assert_eq!(outcome.action, Action::Failed);
        assert!(outcome.note.starts_with("error:"));
        assert_eq!(outcome.new_bytes, outcome.original_bytes);
        assert_eq!(
            std::fs::metadata(&asset.path).unwrap().len(),
            900_000,
            "original must stay intact"
        );
        // backup ran before the attempt, per ordering guarantee
        assert!(base
            .path()
            .join("backup_originals")
            .join("broken.jpg")
            .exists());
    }

    #[tokio::test]
    async fn test_dry_run_never_writes() {
        let base = TempDir::new().unwrap();
        let config = Config {
            dry_run: true,
            ..Default::default()
        };
        let optimizer = optimizer_for(&base, config);
        let asset = asset_at(&base, "broken.jpg", 900_000);

        let _ = optimizer.process_asset(&asset).await;

        assert!(!base.path().join("backup_originals").exists());
    }
}
