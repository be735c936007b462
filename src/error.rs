//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi che includono path e causa
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `DirectoryNotFound` / `NotADirectory`: errori fatali della run (prima di ogni conversione)
//! - `Io`: Errori di I/O (lettura sorgente, scrittura destinazione)
//! - `Image`: Errori di decodifica (file corrotti, formati non riconosciuti)
//! - `PngProbe`: Header PNG illeggibile durante il rilevamento della palette
//! - `Encode`: Errori dell'encoder WebP
//! - `ConfigExtraction`: Estrazione path dal config fallita (solo manifest tool)
//! - `Validation`: Errori di validazione input
//!
//! ## Propagazione:
//! Gli errori per singolo file non superano mai il confine del transcoder:
//! vengono convertiti in `ConversionResult::Failure` con la causa stringificata.
//! Solo gli errori a livello directory terminano la run.
//!
//! ## Esempio:
//! ```rust,ignore
//! if !dir.exists() {
//!     return Err(ConvertError::DirectoryNotFound(dir.to_path_buf()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for asset transcoding
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Source directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Source path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG header error: {0}")]
    PngProbe(#[from] png::DecodingError),

    #[error("WebP encoding error: {0}")]
    Encode(String),

    #[error("Config extraction error: {0}")]
    ConfigExtraction(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConvertError {
    /// True for failures that end the whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DirectoryNotFound(_) | Self::NotADirectory(_))
    }
}
