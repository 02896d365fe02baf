//! # Video Processing Module
//!
//! Questo modulo produce il candidato compresso per ogni video heavy.
//!
//! ## Responsabilità:
//! - Compressione video con FFmpeg (libx264)
//! - Controllo qualità tramite CRF selezionato dal parameter selector
//! - Ricodifica audio AAC con bitrate configurabile
//! - Verifica (cached) della presenza di ffmpeg
//!
//! ## Pipeline di compressione:
//! 1. Verifica che ffmpeg sia disponibile (probe una sola volta per run)
//! 2. Comprime nel tempfile candidato:
//!    - Codec video: libx264, preset slow
//!    - CRF: dal selettore adattivo (16-30)
//!    - Codec audio: AAC, bitrate configurabile (default 128k)
//!    - `+faststart` per lo streaming web
//! 3. La decision policy confronta le dimensioni e decide se sostituire
//!
//! ## Controllo qualità (CRF):
//! - 16-19: qualità quasi lossless (intensità 1)
//! - 20-24: buon compromesso (intensità 2-4)
//! - 25-30: compressione aggressiva (intensità 5 o file molto oltre target)

use crate::config::Config;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::media::MediaAsset;
use crate::platform::PlatformCommands;
use anyhow::Result;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// Handles video compression candidates
pub struct VideoProcessor {
    config: Config,
}

impl VideoProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compress a video into a candidate file beside the original. The
    /// candidate container is MP4 regardless of the input container.
    pub async fn encode_candidate(
        &self,
        asset: &MediaAsset,
        crf: u8,
    ) -> Result<(NamedTempFile, String)> {
        let platform = PlatformCommands::instance();
        if !platform.is_command_available("ffmpeg").await {
            return Err(OptimizeError::MissingDependency(
                "ffmpeg is required for video compression".to_string(),
            )
            .into());
        }

        debug!(
            "Compressing video {} (crf={}, audio={})",
            asset.path.display(),
            crf,
            self.config.audio_bitrate
        );

        let candidate = FileManager::candidate_file(&asset.path, ".mp4")?;

        let output = Command::new(platform.get_command("ffmpeg"))
            .args(["-y", "-loglevel", "warning", "-i"])
            .arg(&asset.path)
            .args([
                "-c:v",
                "libx264",
                "-preset",
                "slow",
                "-crf",
                &crf.to_string(),
                "-c:a",
                "aac",
                "-b:a",
                &self.config.audio_bitrate,
                "-movflags",
                "+faststart",
            ])
            .arg(candidate.path())
            .output()
            .await?;

        if !output.status.success() {
            return Err(OptimizeError::Ffmpeg(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok((candidate, format!("crf={}", crf)))
    }
}
