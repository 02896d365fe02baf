//! # Site Media Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione del run, soglie heavy e ideal target
//! - `error`: Tipi di errore custom
//! - `media`: Classificazione dei file media e analisi pre-run
//! - `params`: Mapping intensità -> quality/CRF adattivi
//! - `policy`: Decision policy per-asset e `TransformOutcome`
//! - `file_manager`: Discovery, backup e persistenza atomica
//! - `platform`: Risoluzione cross-platform dei tool esterni
//! - `image_processor` / `video_processor` / `gif_converter`: Trasformazioni
//! - `refs`: Riscrittura dei riferimenti nei file di testo
//! - `progress`: Progress bar e aggregazione dei totali di run
//! - `report` / `json_output`: Report testuale ed eventi JSON
//! - `prompt`: Prompt interattivi
//! - `optimizer`: Orchestratore e worker
//!
//! ## Utilizzo:
//! ```ignore
//! use site_media_optimizer::{Config, MediaOptimizer};
//!
//! let config = Config::default();
//! let mut optimizer = MediaOptimizer::new(&path, config)?;
//! let totals = optimizer.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod gif_converter;
pub mod image_processor;
pub mod json_output;
pub mod media;
pub mod optimizer;
pub mod params;
pub mod platform;
pub mod policy;
pub mod progress;
pub mod prompt;
pub mod refs;
pub mod report;
pub mod video_processor;

pub use config::{Config, GifTarget, Thresholds};
pub use error::OptimizeError;
pub use media::{Analysis, MediaAsset, MediaKind};
pub use optimizer::MediaOptimizer;
pub use params::Intensity;
pub use policy::{Action, TransformOutcome};
pub use progress::RunTotals;
