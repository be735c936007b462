//! # Optimizer Module
//!
//! Modulo che separa le responsabilità della run in sottomoduli:
//! - `batch_converter`: Orchestratore principale (discovery → conversione → report)
//! - `path_resolver`: Logica di calcolo path di destinazione

pub mod batch_converter;
pub mod path_resolver;

pub use batch_converter::{BatchConverter, RunOutcome};
pub use path_resolver::PathResolver;
