//! # Optimizer Module
//!
//! Orchestrazione del run di ottimizzazione:
//! - `media_optimizer`: pipeline completa (scan, prompt, dispatch, report)
//! - `task_optimizer`: worker per il singolo asset

pub mod media_optimizer;
pub mod task_optimizer;

pub use media_optimizer::MediaOptimizer;
pub use task_optimizer::TaskOptimizer;
