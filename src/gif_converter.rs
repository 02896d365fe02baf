//! # GIF Conversion Module
//!
//! Converte le GIF animate heavy in un vero container video (MP4 o WebM),
//! che sul web le sostituisce quasi sempre con una frazione dei byte.
//!
//! La conversione produce un file NUOVO accanto all'originale (stesso stem,
//! estensione del target); la GIF originale resta su disco e la mappa
//! vecchio->nuovo alimenta la riscrittura dei riferimenti nei file di testo.
//! Per la policy una conversione riuscita conta anche quando l'output non è
//! più piccolo: la migrazione di formato è l'obiettivo.

use crate::config::GifTarget;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::media::MediaAsset;
use crate::platform::PlatformCommands;
use anyhow::Result;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// Converts animated GIFs to a video container
pub struct GifConverter;

impl GifConverter {
    /// Transcode a gif into a candidate for `<stem>.<target>` beside the
    /// input. Returns the candidate, the final destination path, and the
    /// note for the report.
    pub async fn convert_candidate(
        asset: &MediaAsset,
        target: GifTarget,
    ) -> Result<(NamedTempFile, PathBuf, String)> {
        let ext = target.extension().ok_or_else(|| {
            OptimizeError::Validation("gif conversion invoked without a target format".to_string())
        })?;

        let platform = PlatformCommands::instance();
        if !platform.is_command_available("ffmpeg").await {
            return Err(OptimizeError::MissingDependency(
                "ffmpeg is required for GIF conversion".to_string(),
            )
            .into());
        }

        let new_path = asset.path.with_extension(ext);
        debug!(
            "Converting {} -> {}",
            asset.path.display(),
            new_path.display()
        );

        let candidate = FileManager::candidate_file(&new_path, &format!(".{}", ext))?;

        let mut cmd = Command::new(platform.get_command("ffmpeg"));
        cmd.args(["-y", "-loglevel", "warning", "-i"]).arg(&asset.path);
        if ext == "mp4" {
            // x264 needs even dimensions; gifs often are not
            cmd.args([
                "-movflags",
                "+faststart",
                "-an",
                "-c:v",
                "libx264",
                "-vf",
                "scale=trunc(iw/2)*2:trunc(ih/2)*2",
                "-pix_fmt",
                "yuv420p",
            ]);
        } else {
            cmd.args(["-an", "-c:v", "libvpx-vp9", "-b:v", "0", "-crf", "32"]);
        }
        let output = cmd.arg(candidate.path()).output().await?;

        if !output.status.success() {
            return Err(OptimizeError::Ffmpeg(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        let note = format!("gif→{}", ext);
        Ok((candidate, new_path, note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaAsset, MediaKind};

    #[tokio::test]
    async fn test_skip_target_is_rejected() {
        let asset = MediaAsset::new(PathBuf::from("loop.gif"), MediaKind::Gif, 3_000_000);
        let result = GifConverter::convert_candidate(&asset, GifTarget::Skip).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_destination_swaps_extension_only() {
        let path = PathBuf::from("media/anim/loop.gif");
        assert_eq!(
            path.with_extension("mp4"),
            PathBuf::from("media/anim/loop.mp4")
        );
        assert_eq!(
            path.with_extension("webm"),
            PathBuf::from("media/anim/loop.webm")
        );
    }
}
