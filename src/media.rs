//! # Media Classification Module
//!
//! Questo modulo definisce il modello dei file media e la classificazione
//! "heavy" contro le soglie configurate.
//!
//! ## Responsabilità:
//! - `MediaKind`: determina la classe di un file dalla sua estensione
//! - `MediaAsset`: record immutabile (path, kind, size) prodotto dalla scansione
//! - Classificazione heavy con confine inclusivo (size >= cutoff)
//! - Lookup dell'ideal target per classe di media
//! - `Analysis`: conteggi aggregati per il riepilogo pre-ottimizzazione
//!
//! ## Formati riconosciuti:
//! - **Immagini raster**: jpg, jpeg, png
//! - **Immagini web lossy**: webp, avif
//! - **GIF animate**: gif (percorso di conversione dedicato)
//! - **Video**: mp4, mov, webm
//! - **File di testo** (per la riscrittura dei riferimenti): html, js, css
//!
//! Estensioni fuori da queste tabelle non producono un `MediaAsset` e non
//! sono mai heavy.

use crate::config::Thresholds;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Media class of an asset, keyed on its lowercase extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    /// jpg/jpeg/png
    RasterImage,
    /// webp/avif
    WebImage,
    /// Animated gif, converted rather than re-encoded
    Gif,
    /// mp4/mov/webm
    Video,
}

impl MediaKind {
    /// Classify a path by extension, case-insensitive. Returns `None` for
    /// anything this tool does not touch.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" => Some(MediaKind::RasterImage),
            "webp" | "avif" => Some(MediaKind::WebImage),
            "gif" => Some(MediaKind::Gif),
            "mp4" | "mov" | "webm" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Heavy-size cutoff for this kind, in bytes
    pub fn cutoff(self, thresholds: &Thresholds) -> u64 {
        match self {
            MediaKind::RasterImage => thresholds.raster_image_cutoff,
            MediaKind::WebImage => thresholds.web_image_cutoff,
            MediaKind::Gif => thresholds.gif_cutoff,
            MediaKind::Video => thresholds.video_cutoff,
        }
    }

    /// Ideal size this kind should approach after compression
    pub fn ideal_target(self, thresholds: &Thresholds) -> u64 {
        match self {
            MediaKind::Video => thresholds.ideal_video_bytes,
            _ => thresholds.ideal_image_bytes,
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, MediaKind::RasterImage | MediaKind::WebImage)
    }
}

/// A media file collected by the scanner. Identity is the path; the size is
/// the one observed at collection time.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub size_bytes: u64,
}

impl MediaAsset {
    pub fn new(path: PathBuf, kind: MediaKind, size_bytes: u64) -> Self {
        Self {
            path,
            kind,
            size_bytes,
        }
    }

    /// Heavy classification, inclusive at the cutoff
    pub fn is_heavy(&self, thresholds: &Thresholds) -> bool {
        self.size_bytes >= self.kind.cutoff(thresholds)
    }

    pub fn ideal_target(&self, thresholds: &Thresholds) -> u64 {
        self.kind.ideal_target(thresholds)
    }
}

/// Check whether a path is a text file eligible for reference rewriting
pub fn is_text_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        let ext_lower = ext.to_string_lossy().to_lowercase();
        matches!(ext_lower.as_str(), "html" | "js" | "css")
    } else {
        false
    }
}

/// Pre-run counts shown to the user before asking to proceed
#[derive(Debug, Default, Clone)]
pub struct Analysis {
    pub images: usize,
    pub videos: usize,
    pub gifs: usize,
    pub heavy_images: usize,
    pub heavy_videos: usize,
    pub heavy_gifs: usize,
}

impl Analysis {
    pub fn of(assets: &[MediaAsset], thresholds: &Thresholds) -> Self {
        let mut analysis = Self::default();
        for asset in assets {
            let heavy = asset.is_heavy(thresholds);
            match asset.kind {
                MediaKind::RasterImage | MediaKind::WebImage => {
                    analysis.images += 1;
                    if heavy {
                        analysis.heavy_images += 1;
                    }
                }
                MediaKind::Gif => {
                    analysis.gifs += 1;
                    if heavy {
                        analysis.heavy_gifs += 1;
                    }
                }
                MediaKind::Video => {
                    analysis.videos += 1;
                    if heavy {
                        analysis.heavy_videos += 1;
                    }
                }
            }
        }
        analysis
    }

    pub fn total(&self) -> usize {
        self.images + self.videos + self.gifs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, size: u64) -> MediaAsset {
        let path = PathBuf::from(name);
        let kind = MediaKind::from_path(&path).unwrap();
        MediaAsset::new(path, kind, size)
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            MediaKind::from_path(Path::new("a/photo.JPG")),
            Some(MediaKind::RasterImage)
        );
        assert_eq!(
            MediaKind::from_path(Path::new("hero.avif")),
            Some(MediaKind::WebImage)
        );
        assert_eq!(
            MediaKind::from_path(Path::new("loop.gif")),
            Some(MediaKind::Gif)
        );
        assert_eq!(
            MediaKind::from_path(Path::new("clip.MOV")),
            Some(MediaKind::Video)
        );
        assert_eq!(MediaKind::from_path(Path::new("readme.txt")), None);
        assert_eq!(MediaKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_heavy_boundary_is_inclusive() {
        let thresholds = Thresholds::default();
        let cases = [
            ("photo.jpg", 800_000),
            ("photo.png", 800_000),
            ("hero.webp", 400_000),
            ("loop.gif", 2_000_000),
            ("clip.mp4", 8_000_000),
        ];
        for (name, cutoff) in cases {
            assert!(!asset(name, cutoff - 1).is_heavy(&thresholds), "{}", name);
            assert!(asset(name, cutoff).is_heavy(&thresholds), "{}", name);
        }
    }

    #[test]
    fn test_small_png_is_not_heavy() {
        let thresholds = Thresholds::default();
        assert!(!asset("icon.png", 50_000).is_heavy(&thresholds));
    }

    #[test]
    fn test_ideal_targets_by_class() {
        let thresholds = Thresholds::default();
        assert_eq!(asset("a.jpg", 1).ideal_target(&thresholds), 250_000);
        assert_eq!(asset("a.webp", 1).ideal_target(&thresholds), 250_000);
        assert_eq!(asset("a.mp4", 1).ideal_target(&thresholds), 5_000_000);
    }

    #[test]
    fn test_text_file_detection() {
        assert!(is_text_file(Path::new("index.html")));
        assert!(is_text_file(Path::new("app.JS")));
        assert!(is_text_file(Path::new("style.css")));
        assert!(!is_text_file(Path::new("photo.jpg")));
    }

    #[test]
    fn test_analysis_counts() {
        let thresholds = Thresholds::default();
        let assets = vec![
            asset("small.jpg", 100),
            asset("big.jpg", 900_000),
            asset("big.webp", 500_000),
            asset("anim.gif", 3_000_000),
            asset("small.gif", 10_000),
            asset("clip.mp4", 9_000_000),
        ];
        let analysis = Analysis::of(&assets, &thresholds);
        assert_eq!(analysis.images, 3);
        assert_eq!(analysis.heavy_images, 2);
        assert_eq!(analysis.gifs, 2);
        assert_eq!(analysis.heavy_gifs, 1);
        assert_eq!(analysis.videos, 1);
        assert_eq!(analysis.heavy_videos, 1);
        assert_eq!(analysis.total(), 6);
    }
}
