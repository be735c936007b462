//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso da script e tool di build.
//!
//! ## Responsabilità:
//! - Emette un oggetto JSON per riga su stdout per ogni evento della run
//! - Sostituisce il report testuale quando `json_output` è attivo
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio conversione (directory, numero file, parametri encoder)
//! - `no_work`: Directory valida ma senza file idonei
//! - `file_start`: Inizio elaborazione di un file
//! - `file_complete`: Fine elaborazione di un file (dimensioni o errore)
//! - `complete`: Fine run con totali (misurati e dei soli successi) e lista fallimenti
//! - `error`: Errore fatale (es. directory inesistente)

use crate::config::Config;
use crate::image_processor::ConversionResult;
use crate::progress::{FailedFile, RunSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    Start {
        input_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    NoWork {
        input_dir: PathBuf,
    },

    FileStart {
        path: PathBuf,
        size: u64,
        index: usize,
        total: usize,
    },

    FileComplete {
        path: PathBuf,
        output: Option<PathBuf>,
        original_size: Option<u64>,
        converted_size: Option<u64>,
        compression_ratio: Option<f64>,
        error: Option<String>,
    },

    Complete {
        total_files: usize,
        succeeded: usize,
        failed: usize,
        measured_original_size: u64,
        original_size: u64,
        converted_size: u64,
        compression_ratio: f64,
        duration_seconds: f64,
        failures: Vec<FailedFile>,
    },

    Error {
        message: String,
        details: Option<String>,
    },
}

/// Encoder parameters echoed in the `start` event
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub webp_quality: u8,
    pub webp_method: u8,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(input_dir: PathBuf, total_files: usize, config: JsonConfig) -> Self {
        Self::Start {
            input_dir,
            total_files,
            config,
        }
    }

    pub fn no_work(input_dir: PathBuf) -> Self {
        Self::NoWork { input_dir }
    }

    pub fn file_start(path: PathBuf, size: u64, index: usize, total: usize) -> Self {
        Self::FileStart {
            path,
            size,
            index,
            total,
        }
    }

    pub fn file_complete(path: PathBuf, output: PathBuf, result: &ConversionResult) -> Self {
        match result {
            ConversionResult::Success {
                original_size,
                converted_size,
            } => Self::FileComplete {
                path,
                output: Some(output),
                original_size: Some(*original_size),
                converted_size: Some(*converted_size),
                compression_ratio: Some(crate::file_manager::FileManager::compression_ratio(
                    *original_size,
                    *converted_size,
                )),
                error: None,
            },
            ConversionResult::Failure { reason } => Self::FileComplete {
                path,
                output: None,
                original_size: None,
                converted_size: None,
                compression_ratio: None,
                error: Some(reason.clone()),
            },
        }
    }

    pub fn complete(summary: &RunSummary) -> Self {
        Self::Complete {
            total_files: summary.total_files(),
            succeeded: summary.success_count(),
            failed: summary.failure_count(),
            measured_original_size: summary.measured_original_total(),
            original_size: summary.original_total(),
            converted_size: summary.converted_total(),
            compression_ratio: summary.aggregate_compression_ratio(),
            duration_seconds: summary.duration_seconds(),
            failures: summary.failures().to_vec(),
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            webp_quality: config.webp_quality,
            webp_method: config.webp_method,
        }
    }
}
