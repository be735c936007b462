//! # Report Module
//!
//! Proiezione dei risultati della run verso l'utente.
//!
//! ## Responsabilità:
//! - Riga di avanzamento per ogni file (`[i/n] Converting: name`)
//! - Riga di successo: dimensione originale → convertita con percentuale firmata
//! - Riga di fallimento: nome file + causa
//! - Riepilogo finale: successi su totale, dimensioni aggregate, lista fallimenti
//! - In modalità JSON delega tutto a `JsonMessage`
//!
//! Le funzioni di formattazione sono pure; `Reporter` decide solo dove scrivere.

use crate::config::Config;
use crate::file_manager::{AssetFile, FileManager};
use crate::image_processor::ConversionResult;
use crate::json_output::{JsonConfig, JsonMessage};
use crate::progress::{ProgressManager, RunSummary};
use std::path::Path;

const RULE_WIDTH: usize = 80;

/// Writes per-file lines and the final summary, as text or JSON
pub struct Reporter {
    progress: ProgressManager,
    json_output: bool,
    total_files: usize,
}

impl Reporter {
    pub fn new(total_files: usize, json_output: bool) -> Self {
        let progress = if json_output || total_files == 0 {
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            progress,
            json_output,
            total_files,
        }
    }

    pub fn no_work(&self, source_dir: &Path) {
        if self.json_output {
            JsonMessage::no_work(source_dir.to_path_buf()).emit();
        } else {
            self.progress.println(&Self::no_work_line(source_dir));
        }
    }

    pub fn start(&self, source_dir: &Path, config: &Config) {
        if self.json_output {
            JsonMessage::start(source_dir.to_path_buf(), self.total_files, JsonConfig::from(config)).emit();
        } else {
            self.progress.println(&format!(
                "Found {} image files, starting conversion...",
                self.total_files
            ));
            self.progress.println(&"-".repeat(RULE_WIDTH));
        }
    }

    pub fn file_started(&self, index: usize, asset: &AssetFile, size: u64) {
        if self.json_output {
            JsonMessage::file_start(asset.path().to_path_buf(), size, index, self.total_files).emit();
        } else {
            self.progress
                .println(&Self::file_start_line(index, self.total_files, &asset.file_name()));
        }
    }

    pub fn file_finished(&self, asset: &AssetFile, dest: &Path, result: &ConversionResult) {
        if self.json_output {
            JsonMessage::file_complete(asset.path().to_path_buf(), dest.to_path_buf(), result).emit();
            return;
        }

        let line = match result {
            ConversionResult::Success {
                original_size,
                converted_size,
            } => Self::success_line(*original_size, *converted_size),
            ConversionResult::Failure { reason } => Self::failure_line(&asset.file_name(), reason),
        };
        self.progress.println(&line);
        self.progress.println("");

        let status = if result.is_success() { "[OK]" } else { "[ERROR]" };
        self.progress.update(&format!("{} {}", status, asset.file_name()));
    }

    pub fn finish(&self, summary: &RunSummary) {
        self.progress.finish();

        if self.json_output {
            JsonMessage::complete(summary).emit();
        } else {
            for line in Self::summary_lines(summary) {
                println!("{}", line);
            }
        }
    }

    pub fn no_work_line(source_dir: &Path) -> String {
        format!("No image files to convert in {}", source_dir.display())
    }

    pub fn file_start_line(index: usize, total: usize, name: &str) -> String {
        format!("[{}/{}] Converting: {}", index + 1, total, name)
    }

    pub fn success_line(original_size: u64, converted_size: u64) -> String {
        format!(
            "  ✓ OK: {} → {} ({:+.1}%)",
            FileManager::format_size(original_size),
            FileManager::format_size(converted_size),
            FileManager::compression_ratio(original_size, converted_size)
        )
    }

    pub fn failure_line(name: &str, reason: &str) -> String {
        format!("  ✗ Failed: {}: {}", name, reason)
    }

    pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
        let mut lines = vec![
            "-".repeat(RULE_WIDTH),
            "Conversion complete!".to_string(),
            format!("Succeeded: {}/{}", summary.success_count(), summary.total_files()),
            format!(
                "Total size: {} → {} ({:+.1}%)",
                FileManager::format_size(summary.original_total()),
                FileManager::format_size(summary.converted_total()),
                summary.aggregate_compression_ratio()
            ),
        ];

        if !summary.failures().is_empty() {
            lines.push(String::new());
            lines.push(format!("Failed files ({}):", summary.failure_count()));
            for failed in summary.failures() {
                lines.push(format!("  - {}: {}", failed.name, failed.reason));
            }
        }

        lines.push(String::new());
        lines.push("WebP files were written next to the originals; originals are unchanged.".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ConversionStats;
    use std::time::Duration;

    #[test]
    fn test_success_line_units_and_sign() {
        assert_eq!(Reporter::success_line(2048, 512), "  ✓ OK: 2.00 KB → 512 B (+75.0%)");
        assert_eq!(
            Reporter::success_line(1000, 1500),
            "  ✓ OK: 1000 B → 1.46 KB (-50.0%)"
        );
        assert_eq!(
            Reporter::success_line(2 * 1024 * 1024, 512 * 1024),
            "  ✓ OK: 2.00 MB → 512.00 KB (+75.0%)"
        );
        assert_eq!(Reporter::success_line(0, 10), "  ✓ OK: 0 B → 10 B (+0.0%)");
    }

    #[test]
    fn test_failure_and_start_lines() {
        assert_eq!(
            Reporter::failure_line("bad.png", "invalid PNG signature"),
            "  ✗ Failed: bad.png: invalid PNG signature"
        );
        assert_eq!(Reporter::file_start_line(0, 4, "a.jpg"), "[1/4] Converting: a.jpg");
    }

    #[test]
    fn test_summary_lists_failures_only_when_present() {
        let asset = AssetFile::from_path(Path::new("/img/a.jpg")).unwrap();
        let mut stats = ConversionStats::new();
        stats.record(
            &asset,
            3 * 1024 * 1024,
            &ConversionResult::Success {
                original_size: 3 * 1024 * 1024,
                converted_size: 1024 * 1024,
            },
        );
        let clean = Reporter::summary_lines(&stats.finish(Duration::ZERO));
        assert!(clean.contains(&"Succeeded: 1/1".to_string()));
        assert!(clean.contains(&"Total size: 3.00 MB → 1.00 MB (+66.7%)".to_string()));
        assert!(!clean.iter().any(|l| l.starts_with("Failed files")));

        let broken = AssetFile::from_path(Path::new("/img/b.png")).unwrap();
        let mut stats = ConversionStats::new();
        stats.record(
            &broken,
            10,
            &ConversionResult::Failure {
                reason: "unexpected EOF".to_string(),
            },
        );
        let failed = Reporter::summary_lines(&stats.finish(Duration::ZERO));
        assert!(failed.contains(&"Succeeded: 0/1".to_string()));
        assert!(failed.contains(&"Total size: 0 B → 0 B (+0.0%)".to_string()));
        assert!(failed.contains(&"Failed files (1):".to_string()));
        assert!(failed.contains(&"  - b.png: unexpected EOF".to_string()));
    }
}
