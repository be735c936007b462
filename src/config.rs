//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di conversione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `webp_quality`: Qualità WebP (0-100, default: 85, più alto = file più grande)
//! - `webp_method`: Metodo di compressione libwebp (0-6, default: 6 = massimo sforzo)
//! - `source_dir`: Directory sorgente (default: `public/img`)
//! - `json_output`: Emette eventi JSON invece del report testuale (default: false)
//!
//! ## Validazione:
//! - Controlla che webp_quality sia 0-100
//! - Controlla che webp_method sia 0-6
//! - Controlla che source_dir non sia vuota
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     webp_quality: 75,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default WebP quality
pub const DEFAULT_WEBP_QUALITY: u8 = 85;
/// Maximum-effort libwebp method (size over speed)
pub const DEFAULT_WEBP_METHOD: u8 = 6;
/// Default source directory, relative to the asset root
pub const DEFAULT_SOURCE_DIR: &str = "public/img";

/// Configuration for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebP quality (0-100)
    pub webp_quality: u8,
    /// libwebp compression method (0-6, higher = slower and smaller)
    pub webp_method: u8,
    /// Directory containing the raster assets
    pub source_dir: PathBuf,
    /// Output progress and status as JSON lines for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webp_quality: DEFAULT_WEBP_QUALITY,
            webp_method: DEFAULT_WEBP_METHOD,
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.webp_quality > 100 {
            return Err(anyhow::anyhow!("WebP quality must be between 0 and 100"));
        }

        if self.webp_method > 6 {
            return Err(anyhow::anyhow!("WebP method must be between 0 and 6"));
        }

        if self.source_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Source directory must not be empty"));
        }

        Ok(())
    }

    /// Load configuration from file, falling back to defaults when it is absent
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.webp_quality = 0;
        assert!(config.validate().is_ok());

        config.webp_quality = 101;
        assert!(config.validate().is_err());

        config.webp_quality = 85;
        config.webp_method = 7;
        assert!(config.validate().is_err());

        config.webp_method = 6;
        config.source_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.webp_quality, 85);
        assert_eq!(config.webp_method, 6);
        assert_eq!(config.source_dir, PathBuf::from("public/img"));
        assert!(!config.json_output);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            webp_quality: 70,
            webp_method: 4,
            source_dir: PathBuf::from("assets/textures"),
            json_output: true,
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.webp_quality, 70);
        assert_eq!(loaded_config.webp_method, 4);
        assert_eq!(loaded_config.source_dir, PathBuf::from("assets/textures"));
        assert!(loaded_config.json_output);
    }

    #[tokio::test]
    async fn test_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("absent.json")).await.unwrap();
        assert_eq!(config.webp_quality, DEFAULT_WEBP_QUALITY);
    }

    #[tokio::test]
    async fn test_config_partial_file_and_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        tokio::fs::write(&config_path, r#"{ "webp_quality": 60 }"#).await.unwrap();
        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.webp_quality, 60);
        assert_eq!(config.webp_method, DEFAULT_WEBP_METHOD);

        tokio::fs::write(&config_path, r#"{ "webp_method": 9 }"#).await.unwrap();
        assert!(Config::from_file(&config_path).await.is_err());
    }
}
