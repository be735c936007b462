//! # Asset Transcoder Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per diverse operazioni
//! - `file_manager`: Discovery degli asset e utilità sulle dimensioni
//! - `image_processor`: Conversione JPEG/PNG → WebP con normalizzazione colore
//! - `progress`: Progress bar e aggregazione metriche
//! - `report`: Report testuale per file e riepilogo finale
//! - `json_output`: Eventi JSON per uso programmatico
//! - `optimizer`: Orchestratore principale della run
//! - `manifest`: Manifest JSON delle dimensioni delle risorse dell'app
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use asset_transcoder::{BatchConverter, Config, RunOutcome};
//!
//! let converter = BatchConverter::new(Config::default())?;
//! match converter.run().await? {
//!     RunOutcome::NoWork { .. } => {}
//!     RunOutcome::Completed(summary) => println!("{}", summary.success_count()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod manifest;
pub mod optimizer;
pub mod progress;
pub mod report;

pub use config::Config;
pub use error::ConvertError;
pub use file_manager::AssetFile;
pub use image_processor::{ColorMode, ConversionResult, ImageProcessor};
pub use manifest::ManifestBuilder;
pub use optimizer::{BatchConverter, RunOutcome};
pub use progress::RunSummary;
