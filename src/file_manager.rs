//! # File Management Module
//!
//! Questo modulo gestisce la discovery degli asset raster e le utilità sulle dimensioni.
//!
//! ## Responsabilità:
//! - Discovery non ricorsiva dei file immagine in una directory sorgente
//! - Filtro per estensione (allow-list case-insensitive: JPG, JPEG, PNG)
//! - Solo file regolari: symlink e directory sono esclusi
//! - Ordinamento per path per run deterministiche e riproducibili
//! - Misura delle dimensioni al momento della lettura (mai in cache)
//! - Formattazione human-readable delle dimensioni e calcolo compressione
//!
//! ## Casi limite:
//! - Directory inesistente: `ConvertError::DirectoryNotFound`
//! - Directory esistente ma senza file idonei: sequenza vuota, non un errore
//!
//! ## Esempio:
//! ```rust,ignore
//! let assets = FileManager::find_image_files(Path::new("public/img"))?;
//! for asset in &assets {
//!     let size = asset.size().await?;
//! }
//! ```

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions eligible for transcoding (lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// A raster asset discovered in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    path: PathBuf,
    extension: String,
}

impl AssetFile {
    /// Build an asset from a path whose extension is on the allow-list
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased extension, without the dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name used in reports
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Current size on disk, measured on every call
    pub async fn size(&self) -> std::io::Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }
}

/// Manages asset discovery and size helpers
pub struct FileManager;

impl FileManager {
    /// Find all eligible image files directly inside `source_dir`, sorted by path
    pub fn find_image_files(source_dir: &Path) -> Result<Vec<AssetFile>, ConvertError> {
        if !source_dir.exists() {
            return Err(ConvertError::DirectoryNotFound(source_dir.to_path_buf()));
        }
        if !source_dir.is_dir() {
            return Err(ConvertError::NotADirectory(source_dir.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", source_dir.display(), e);
                    continue;
                }
            };

            // walkdir does not follow links, so symlinks report their own type here
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(asset) = AssetFile::from_path(entry.path()) {
                files.push(asset);
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Discovered {} image files in {}", files.len(), source_dir.display());

        Ok(files)
    }

    /// Get human-readable file size (B / KB / MB, 1024 breakpoints)
    pub fn format_size(size: u64) -> String {
        if size < KB {
            format!("{} B", size)
        } else if size < MB {
            format!("{:.2} KB", size as f64 / KB as f64)
        } else {
            format!("{:.2} MB", size as f64 / MB as f64)
        }
    }

    /// Signed compression percentage; negative when the output grew.
    /// A zero original size yields 0.
    pub fn compression_ratio(original_size: u64, converted_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            (1.0 - converted_size as f64 / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_image_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.PNG", "alpha.jpg", "mid.jpeg", "notes.txt", "anim.gif", "noext"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("deep.png"), b"x").unwrap();

        let files = FileManager::find_image_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();

        assert_eq!(names, vec!["alpha.jpg", "mid.jpeg", "zeta.PNG"]);
        assert_eq!(files[2].extension(), "png");
    }

    #[cfg(unix)]
    #[test]
    fn test_find_image_files_skips_symlinks() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.png");
        std::fs::write(&real, b"x").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("link.png")).unwrap();

        let files = FileManager::find_image_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "real.png");
    }

    #[test]
    fn test_find_image_files_empty_dir_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let files = FileManager::find_image_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_find_image_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = FileManager::find_image_files(&missing).unwrap_err();
        assert!(matches!(err, ConvertError::DirectoryNotFound(ref p) if p == &missing));
    }

    #[test]
    fn test_find_image_files_on_regular_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"x").unwrap();
        let err = FileManager::find_image_files(&file).unwrap_err();
        assert!(matches!(err, ConvertError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn test_asset_size_is_measured_at_read_time() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, vec![0u8; 10]).unwrap();
        let asset = AssetFile::from_path(&path).unwrap();
        assert_eq!(asset.size().await.unwrap(), 10);

        std::fs::write(&path, vec![0u8; 25]).unwrap();
        assert_eq!(asset.size().await.unwrap(), 25);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(0), "0 B");
        assert_eq!(FileManager::format_size(1023), "1023 B");
        assert_eq!(FileManager::format_size(1024), "1.00 KB");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(1024 * 1024), "1.00 MB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024 * 1024), "5120.00 MB");
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(FileManager::compression_ratio(0, 0), 0.0);
        assert_eq!(FileManager::compression_ratio(0, 500), 0.0);
        assert_eq!(FileManager::compression_ratio(1000, 250), 75.0);
        assert_eq!(FileManager::compression_ratio(1000, 1500), -50.0);
    }

    #[test]
    fn test_asset_file_extension_allow_list() {
        assert!(AssetFile::from_path(Path::new("a/b/photo.JPG")).is_some());
        assert!(AssetFile::from_path(Path::new("a/b/photo.webp")).is_none());
        assert!(AssetFile::from_path(Path::new("a/b/photo")).is_none());
    }
}
