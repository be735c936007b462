//! # Batch Converter Main Orchestrator
//!
//! Orchestratore della run: discovery → conversione sequenziale → report.
//!
//! ## Stati terminali:
//! - `RunOutcome::NoWork`: directory valida ma nessun file idoneo
//! - `RunOutcome::Completed`: almeno un file tentato, indipendentemente dai fallimenti
//!
//! Ogni file viene tentato esattamente una volta, uno alla volta: la
//! decodifica/encoding gira su un thread bloccante ma viene attesa prima di
//! passare al file successivo. Una directory inesistente termina la run prima
//! di qualsiasi conversione.

use crate::{
    config::Config,
    error::ConvertError,
    file_manager::{AssetFile, FileManager},
    image_processor::{ConversionResult, ImageProcessor},
    optimizer::path_resolver::PathResolver,
    progress::{ConversionStats, RunSummary},
    report::Reporter,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Terminal state of a run
#[derive(Debug)]
pub enum RunOutcome {
    NoWork { source_dir: PathBuf },
    Completed(RunSummary),
}

/// Drives one conversion run over a source directory
pub struct BatchConverter {
    config: Config,
    processor: ImageProcessor,
}

impl BatchConverter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let processor = ImageProcessor::new(&config);

        Ok(Self { config, processor })
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    /// Esegue la conversione di tutti i file scoperti
    pub async fn run(&self) -> Result<RunOutcome, ConvertError> {
        let start_time = Instant::now();
        let source_dir = self.config.source_dir.clone();

        let assets = FileManager::find_image_files(&source_dir)?;
        let reporter = Reporter::new(assets.len(), self.config.json_output);

        if assets.is_empty() {
            info!("No image files found in {}", source_dir.display());
            reporter.no_work(&source_dir);
            return Ok(RunOutcome::NoWork { source_dir });
        }

        self.log_configuration(&assets);
        reporter.start(&source_dir, &self.config);

        let mut stats = ConversionStats::new();
        for (index, asset) in assets.iter().enumerate() {
            let measured = asset.size().await;
            let original_size = measured.as_ref().copied().unwrap_or(0);

            reporter.file_started(index, asset, original_size);
            let (dest, result) = self.convert_one(asset, measured).await;
            if let Some(ratio) = stats.record(asset, original_size, &result) {
                debug!("{}: {:+.1}%", asset.file_name(), ratio);
            }
            reporter.file_finished(asset, &dest, &result);
        }

        let summary = stats.finish(start_time.elapsed());
        info!(
            "Converted {}/{} files in {:.2}s",
            summary.success_count(),
            summary.total_files(),
            summary.duration_seconds()
        );
        reporter.finish(&summary);

        Ok(RunOutcome::Completed(summary))
    }

    /// Convert one asset whose size was just measured. Never fails: problems
    /// become a failure result.
    async fn convert_one(
        &self,
        asset: &AssetFile,
        measured: std::io::Result<u64>,
    ) -> (PathBuf, ConversionResult) {
        let dest = match PathResolver::get_output_path(asset.path()) {
            Ok(dest) => dest,
            Err(e) => {
                let reason = e.to_string();
                return (asset.path().to_path_buf(), ConversionResult::Failure { reason });
            }
        };

        let original_size = match measured {
            Ok(size) => size,
            Err(e) => {
                warn!("Failed to read size of {}: {}", asset.path().display(), e);
                return (dest, ConversionResult::Failure { reason: e.to_string() });
            }
        };

        let processor = self.processor.clone();
        let task_asset = asset.clone();
        let task_dest = dest.clone();
        let result = tokio::task::spawn_blocking(move || {
            processor.transcode(&task_asset, original_size, &task_dest)
        })
        .await
        .unwrap_or_else(|e| ConversionResult::Failure {
            reason: format!("conversion task aborted: {}", e),
        });

        (dest, result)
    }

    /// Logga configurazione
    fn log_configuration(&self, assets: &[AssetFile]) {
        info!("Converting images in: {}", self.config.source_dir.display());
        info!(
            "Encoder: WebP quality {}, method {}",
            self.config.webp_quality, self.config.webp_method
        );
        info!("Found {} image files to process", assets.len());

        for (output, inputs) in PathResolver::find_collisions(assets.iter().map(|a| a.path())) {
            let names: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
            warn!(
                "{} will be written by several sources, last one wins: {}",
                output.display(),
                names.join(", ")
            );
        }
    }
}
