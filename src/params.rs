//! # Adaptive Parameter Selection Module
//!
//! Questo modulo mappa l'intensità di compressione scelta dall'utente (1-5)
//! sui parametri concreti degli encoder.
//!
//! ## Responsabilità:
//! - Newtype `Intensity` validato una sola volta per run (1-5)
//! - `quality_for()`: qualità JPEG/WebP in [70, 95] per le immagini
//! - `crf_for()`: CRF x264 in [16, 30] per i video
//!
//! ## Strategia adattiva:
//! Entrambe le funzioni partono da una tabella base indicizzata sull'intensità
//! e applicano una singola spinta extra quando il file è ancora molto lontano
//! dal suo ideal target (oltre il triplo) e l'utente ha scelto un'intensità
//! aggressiva (>= 3):
//!
//! | Intensità | Quality | CRF |
//! |-----------|---------|-----|
//! | 1         | 95      | 18  |
//! | 2         | 90      | 20  |
//! | 3         | 85      | 22  |
//! | 4         | 80      | 24  |
//! | 5         | 75      | 26  |
//!
//! La qualità scende di 5 punti, il CRF sale di 2: il CRF è una scala
//! invertita (valori più alti = più compressione), quindi la direzione
//! dell'aggiustamento si ribalta.
//!
//! Le due funzioni sono pure e totali su un'intensità già validata; la
//! validazione avviene alla costruzione di `Intensity`, mai per-file.

use crate::error::OptimizeError;
use serde::{Deserialize, Serialize};

/// Quality bounds for image encoders
pub const QUALITY_MIN: u8 = 70;
pub const QUALITY_MAX: u8 = 95;

/// CRF bounds for video encoding
pub const CRF_MIN: u8 = 16;
pub const CRF_MAX: u8 = 30;

/// User-chosen compression intensity, ordinal 1 (gentle) to 5 (aggressive).
///
/// Constructing an `Intensity` is the single validation point for the whole
/// run; every function downstream can rely on the 1-5 invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    /// Create a validated intensity level
    pub fn new(level: u8) -> Result<Self, OptimizeError> {
        if (1..=5).contains(&level) {
            Ok(Self(level))
        } else {
            Err(OptimizeError::InvalidIntensity(level))
        }
    }

    /// The raw ordinal level (guaranteed 1-5)
    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Intensity {
    type Error = OptimizeError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map intensity to an image encoder quality, nudged down when the file is
/// still far above its ideal target.
pub fn quality_for(intensity: Intensity, size_bytes: u64, ideal_target: u64) -> u8 {
    let mut quality: i16 = match intensity.level() {
        1 => 95,
        2 => 90,
        3 => 85,
        4 => 80,
        _ => 75,
    };

    // Extra push only for files beyond 3x the target at intensity >= 3
    if size_bytes > ideal_target.saturating_mul(3) && intensity.level() >= 3 {
        quality -= 5;
    }

    quality.clamp(QUALITY_MIN as i16, QUALITY_MAX as i16) as u8
}

/// Map intensity to an x264 CRF, nudged up (more compression) when the file
/// is still far above its ideal target.
pub fn crf_for(intensity: Intensity, size_bytes: u64, ideal_target: u64) -> u8 {
    let mut crf: i16 = match intensity.level() {
        1 => 18,
        2 => 20,
        3 => 22,
        4 => 24,
        _ => 26,
    };

    if size_bytes > ideal_target.saturating_mul(3) && intensity.level() >= 3 {
        crf += 2;
    }

    crf.clamp(CRF_MIN as i16, CRF_MAX as i16) as u8
}
