//! # Image Processing Module
//!
//! Questo modulo produce il candidato compresso per ogni immagine heavy.
//!
//! ## Strategia per formato:
//!
//! | Formato | Strategia | Parametro |
//! |---------|-----------|-----------|
//! | JPEG    | ricodifica RGB in-process (crate `image`) | quality 70-95 |
//! | PNG     | ricompressione in-process, massima compressione | nessuno |
//! | WebP    | `cwebp` esterno | `-q` 70-95 |
//! | AVIF    | `ffmpeg` + libaom-av1 | CRF derivato dalla quality |
//!
//! Le ricodifiche in-process girano in `spawn_blocking` per non bloccare il
//! runtime; i tool esterni girano come processi asincroni. In ogni caso il
//! risultato finisce in un tempfile accanto alla destinazione e l'originale
//! non viene mai toccato qui: accettare o scartare il candidato è compito
//! della decision policy.
//!
//! ## Dipendenze esterne:
//! - `cwebp` per i WebP (errore per-file se assente)
//! - `ffmpeg` per gli AVIF (errore per-file se assente)

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::media::MediaAsset;
use crate::platform::PlatformCommands;
use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

/// Produces compressed candidates for raster and web images
pub struct ImageProcessor;

impl ImageProcessor {
    /// Encode a candidate next to the input file. Returns the candidate and
    /// the parameter note for the report.
    pub async fn encode_candidate(
        asset: &MediaAsset,
        quality: u8,
    ) -> Result<(NamedTempFile, String)> {
        let ext = asset
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => Self::encode_jpeg(&asset.path, quality).await,
            "png" => Self::encode_png(&asset.path).await,
            "webp" => Self::encode_webp(&asset.path, quality).await,
            "avif" => Self::encode_avif(&asset.path, quality).await,
            other => Err(OptimizeError::UnsupportedFormat(other.to_string()).into()),
        }
    }

    async fn encode_jpeg(input: &Path, quality: u8) -> Result<(NamedTempFile, String)> {
        debug!("Re-encoding JPEG {} at q={}", input.display(), quality);
        let suffix = format!(
            ".{}",
            input.extension().unwrap_or_default().to_string_lossy()
        );
        let candidate = FileManager::candidate_file(input, &suffix)?;

        let source = input.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, OptimizeError> {
            let img = image::open(&source)?;
            let rgb = img.to_rgb8();
            let mut buf = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
            Ok(buf)
        })
        .await??;

        tokio::fs::write(candidate.path(), &bytes).await?;
        Ok((candidate, format!("q={}", quality)))
    }

    async fn encode_png(input: &Path) -> Result<(NamedTempFile, String)> {
        debug!("Recompressing PNG {}", input.display());
        let candidate = FileManager::candidate_file(input, ".png")?;

        let source = input.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, OptimizeError> {
            let img = image::open(&source)?;
            let rgba = img.to_rgba8();
            let mut buf = Vec::new();
            let encoder =
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
            encoder.write_image(rgba.as_raw(), rgba.width(), rgba.height(), ColorType::Rgba8)?;
            Ok(buf)
        })
        .await??;

        tokio::fs::write(candidate.path(), &bytes).await?;
        Ok((candidate, "optimize".to_string()))
    }

    async fn encode_webp(input: &Path, quality: u8) -> Result<(NamedTempFile, String)> {
        let platform = PlatformCommands::instance();
        if !platform.is_command_available("cwebp").await {
            return Err(OptimizeError::MissingDependency(
                "cwebp is required for WebP optimization".to_string(),
            )
            .into());
        }

        let candidate = FileManager::candidate_file(input, ".webp")?;

        let output = Command::new(platform.get_command("cwebp"))
            .args(["-quiet", "-q", &quality.to_string(), "-m", "4", "-mt"])
            .arg(input)
            .arg("-o")
            .arg(candidate.path())
            .output()
            .await?;

        if !output.status.success() {
            return Err(OptimizeError::Encoder(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok((candidate, format!("q={}", quality)))
    }

    async fn encode_avif(input: &Path, quality: u8) -> Result<(NamedTempFile, String)> {
        let platform = PlatformCommands::instance();
        if !platform.is_command_available("ffmpeg").await {
            return Err(OptimizeError::MissingDependency(
                "ffmpeg is required for AVIF optimization".to_string(),
            )
            .into());
        }

        let crf = Self::avif_crf(quality);
        let candidate = FileManager::candidate_file(input, ".avif")?;

        let output = Command::new(platform.get_command("ffmpeg"))
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-c:v", "libaom-av1", "-still-picture", "1", "-crf", &crf.to_string()])
            .arg(candidate.path())
            .output()
            .await?;

        if !output.status.success() {
            return Err(OptimizeError::Ffmpeg(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok((candidate, format!("q={} (av1 crf={})", quality, crf)))
    }

    /// libaom has no 0-100 quality knob; map quality onto its inverted CRF
    /// scale (0 best, 63 worst).
    fn avif_crf(quality: u8) -> u8 {
        ((100u32.saturating_sub(quality as u32)) * 63 / 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaAsset, MediaKind};
    use std::path::PathBuf;

    #[test]
    fn test_avif_crf_mapping() {
        assert_eq!(ImageProcessor::avif_crf(95), 3);
        assert_eq!(ImageProcessor::avif_crf(70), 18);
        // clamped quality range keeps the CRF well inside libaom bounds
        for q in 70..=95u8 {
            assert!(ImageProcessor::avif_crf(q) <= 63);
        }
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let asset = MediaAsset::new(PathBuf::from("movie.mov"), MediaKind::Video, 100);
        let result = ImageProcessor::encode_candidate(&asset, 80).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_jpeg_reports_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("broken.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        let asset = MediaAsset::new(path, MediaKind::RasterImage, 10);

        let result = ImageProcessor::encode_candidate(&asset, 80).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_png_reencode_produces_candidate() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("pixel.png");

        // 8x8 white png via the image crate itself
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        img.save(&path).unwrap();

        let asset = MediaAsset::new(path.clone(), MediaKind::RasterImage, 100);
        let (candidate, note) = ImageProcessor::encode_candidate(&asset, 80).await.unwrap();

        assert!(candidate.path().exists());
        assert!(std::fs::metadata(candidate.path()).unwrap().len() > 0);
        assert_eq!(note, "optimize");
        // source is untouched
        assert!(path.exists());
    }
}
