//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Integra con `thiserror` per automatic error conversion
//! - Distingue errori di configurazione (fatali) da errori per-file (recuperati)
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Image`: Errori di ricodifica immagini (formati corrotti, etc.)
//! - `Ffmpeg`: Errori del processo FFmpeg
//! - `Encoder`: Errori di altri encoder esterni (cwebp)
//! - `InvalidIntensity`: Intensità di compressione fuori da 1-5 (fatale, validata
//!   una volta prima di processare qualsiasi file)
//! - `MissingDependency`: Tool esterno mancante (ffmpeg, cwebp)
//! - `UnsupportedFormat`: Formato file non supportato
//! - `Validation`: Errori di validazione configurazione
//!
//! Gli errori per-file vengono catturati nel `TransformOutcome` del file e il
//! run continua; solo gli errori di configurazione interrompono il processo.

/// Custom error types for media optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Compression intensity must be between 1 and 5, got {0}")]
    InvalidIntensity(u8),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
