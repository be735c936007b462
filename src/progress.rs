//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce la barra di avanzamento e l'aggregazione delle metriche.
//!
//! ## Componenti principali:
//! - `ProgressManager`: barra `indicatif` su stdout, nascosta se stdout non è un terminale
//! - `ConversionStats`: accumulatore a singolo scrittore, aggiornato una volta per file
//! - `RunSummary`: risultato finale immutabile della run
//!
//! ## Metriche tracciate:
//! - **measured_original_total**: somma delle dimensioni misurate di tutti i file
//!   scoperti, inclusi quelli falliti (misura prima della conversione)
//! - **original_total / converted_total**: totali dei soli file convertiti con successo
//! - **files**: record per file con rapporto di compressione
//! - **failures**: lista ordinata dei fallimenti (nome file, causa)
//!
//! ## Rapporto di compressione:
//! `(1 - convertito / originale) * 100`, 0% quando l'originale è vuoto o
//! quando nessun file è stato convertito.
//!
//! ## Esempio:
//! ```rust,ignore
//! let mut stats = ConversionStats::new();
//! stats.record(&asset, original_size, &result);
//! let summary = stats.finish(elapsed);
//! println!("{:+.1}%", summary.aggregate_compression_ratio());
//! ```

use crate::file_manager::{AssetFile, FileManager};
use crate::image_processor::ConversionResult;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Manages the progress bar shown during a run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager drawing on stdout
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stdout());

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that never draws (JSON mode)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Print a report line without tearing the bar
    pub fn println(&self, line: &str) {
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Remove the bar once the run is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// A successfully converted file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub original_size: u64,
    pub converted_size: u64,
    pub compression_ratio: f64,
}

/// A file whose conversion failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedFile {
    pub name: String,
    pub reason: String,
}

/// Running totals for one conversion run
#[derive(Debug, Default)]
pub struct ConversionStats {
    files_processed: usize,
    measured_original_total: u64,
    original_total: u64,
    converted_total: u64,
    files: Vec<FileRecord>,
    failures: Vec<FailedFile>,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one file. `measured_size` is the size read before the
    /// conversion was attempted. Returns the per-file ratio on success.
    pub fn record(&mut self, asset: &AssetFile, measured_size: u64, result: &ConversionResult) -> Option<f64> {
        self.files_processed += 1;
        self.measured_original_total += measured_size;

        match result {
            ConversionResult::Success {
                original_size,
                converted_size,
            } => {
                let ratio = FileManager::compression_ratio(*original_size, *converted_size);
                self.original_total += original_size;
                self.converted_total += converted_size;
                self.files.push(FileRecord {
                    name: asset.file_name(),
                    original_size: *original_size,
                    converted_size: *converted_size,
                    compression_ratio: ratio,
                });
                Some(ratio)
            }
            ConversionResult::Failure { reason } => {
                self.failures.push(FailedFile {
                    name: asset.file_name(),
                    reason: reason.clone(),
                });
                None
            }
        }
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    pub fn success_count(&self) -> usize {
        self.files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Freeze the totals into a summary
    pub fn finish(self, duration: Duration) -> RunSummary {
        RunSummary {
            total_files: self.files_processed,
            measured_original_total: self.measured_original_total,
            original_total: self.original_total,
            converted_total: self.converted_total,
            files: self.files,
            failures: self.failures,
            duration_seconds: duration.as_secs_f64(),
        }
    }
}

/// Final, read-only result of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    total_files: usize,
    measured_original_total: u64,
    original_total: u64,
    converted_total: u64,
    files: Vec<FileRecord>,
    failures: Vec<FailedFile>,
    duration_seconds: f64,
}

impl RunSummary {
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn success_count(&self) -> usize {
        self.files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Sizes of every discovered file, failures included
    pub fn measured_original_total(&self) -> u64 {
        self.measured_original_total
    }

    /// Original size of the successfully converted files
    pub fn original_total(&self) -> u64 {
        self.original_total
    }

    pub fn converted_total(&self) -> u64 {
        self.converted_total
    }

    pub fn aggregate_compression_ratio(&self) -> f64 {
        FileManager::compression_ratio(self.original_total, self.converted_total)
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn failures(&self) -> &[FailedFile] {
        &self.failures
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }
}
