//! # Resource Manifest Module
//!
//! Genera un manifest JSON con le dimensioni degli asset caricati dall'applicazione.
//!
//! ## Responsabilità:
//! - Estrae i path di font e texture dichiarati nel file di configurazione dell'app
//! - Misura ogni file sotto la directory `public` (file mancanti = 0 byte)
//! - Aggiunge i bundle runtime (ammo.js / wasm) con il loro totale
//! - Scrive `resource_sizes.json` con dimensioni per categoria e totali
//!
//! ## Estrazione path:
//! - Blocco `fontsConfig {` ... `}`: righe ``nome: `${BASE_URL}path` ``
//! - Blocco `preloadTextures: [` ... `]`: righe ``${BASE_URL}img/file``
//! - Righe commentate (`//`) e vuote ignorate, commenti inline rimossi
//!
//! ## Fallback:
//! Se il file di configurazione non è leggibile viene emesso un warning e si usa
//! una lista di default; il manifest viene comunque generato.
//!
//! Non dipende dalla pipeline di conversione: condivide solo la root degli asset.

use crate::error::ConvertError;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_FONTS: &[(&str, &str)] = &[("lxgw", "json/LXGW WenKai_Regular.json")];

const DEFAULT_TEXTURES: &[&str] = &[
    "img/earth.jpg",
    "img/BeachBallColor.jpg",
    "img/stone.png",
    "img/woodTexture.jpg",
    "img/project-placeholder.png",
    "img/lensflare0.png",
    "img/spark.png",
];

const RUNTIME_BUNDLES: &[&str] = &["ammo/ammo.js", "ammo/ammo.wasm.js", "ammo/ammo.wasm.wasm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub name: String,
    pub path: String,
}

/// Asset paths referenced by the application config, relative to `public/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePaths {
    pub fonts: Vec<FontEntry>,
    pub textures: Vec<String>,
}

impl ResourcePaths {
    /// Hardcoded list used when the config cannot be read
    pub fn defaults() -> Self {
        Self {
            fonts: DEFAULT_FONTS
                .iter()
                .map(|(name, path)| FontEntry {
                    name: name.to_string(),
                    path: path.to_string(),
                })
                .collect(),
            textures: DEFAULT_TEXTURES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Scan config source text for font and preload texture declarations
    pub fn parse(source: &str) -> Result<Self, ConvertError> {
        let font_re = Regex::new(r"(\w+):\s*`\$\{BASE_URL\}([^`]+)`")
            .map_err(|e| ConvertError::ConfigExtraction(e.to_string()))?;
        let texture_re = Regex::new(r"`\$\{BASE_URL\}img/([^`]+)`")
            .map_err(|e| ConvertError::ConfigExtraction(e.to_string()))?;

        let lines: Vec<&str> = source.lines().collect();
        let mut paths = Self::default();

        let fonts_block = block_after(&lines, |l| l.contains("fontsConfig") && l.contains('{'), |l| {
            l.trim().starts_with('}')
        });
        for line in fonts_block {
            if let Some(caps) = font_re.captures(line) {
                paths.fonts.push(FontEntry {
                    name: caps[1].to_string(),
                    path: strip_inline_comment(&caps[2]),
                });
            }
        }

        let textures_block = block_after(
            &lines,
            |l| l.contains("preloadTextures:") && l.contains('['),
            |l| l.contains(']'),
        );
        for line in textures_block {
            if let Some(caps) = texture_re.captures(line) {
                paths.textures.push(format!("img/{}", strip_inline_comment(&caps[1])));
            }
        }

        Ok(paths)
    }
}

/// Non-comment, non-blank lines between the first `open` line and the next `close` line
fn block_after<'a>(
    lines: &[&'a str],
    open: impl Fn(&str) -> bool,
    close: impl Fn(&str) -> bool,
) -> Vec<&'a str> {
    lines
        .iter()
        .skip_while(|l| !open(l))
        .skip(1)
        .take_while(|l| !close(l))
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.is_empty() && !trimmed.starts_with("//")
        })
        .copied()
        .collect()
}

fn strip_inline_comment(value: &str) -> String {
    value.split("//").next().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSize {
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTotals {
    pub fonts: u64,
    pub textures: u64,
    pub ammo: u64,
    pub all: u64,
}

/// Contents of `resource_sizes.json`, entries in config declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub fonts: IndexMap<String, FontSize>,
    pub textures: IndexMap<String, u64>,
    /// Runtime bundle sizes plus a `total` entry
    pub ammo: IndexMap<String, u64>,
    pub totals: ManifestTotals,
}

/// Builds the manifest for one project root
pub struct ManifestBuilder {
    public_dir: PathBuf,
    config_file: PathBuf,
}

impl ManifestBuilder {
    pub fn new(project_root: &Path) -> Self {
        Self {
            public_dir: project_root.join("public"),
            config_file: project_root.join("src").join("config").join("index.ts"),
        }
    }

    pub fn with_config_file(mut self, config_file: PathBuf) -> Self {
        self.config_file = config_file;
        self
    }

    /// Default output location under a project root
    pub fn default_output(project_root: &Path) -> PathBuf {
        project_root.join("src").join("config").join("resource_sizes.json")
    }

    /// Read the config and extract paths, falling back to the default list
    pub async fn resource_paths(&self) -> ResourcePaths {
        let extracted = match tokio::fs::read_to_string(&self.config_file).await {
            Ok(source) => ResourcePaths::parse(&source),
            Err(e) => Err(ConvertError::ConfigExtraction(format!(
                "{}: {}",
                self.config_file.display(),
                e
            ))),
        };

        extracted.unwrap_or_else(|e| {
            warn!("Could not extract resource paths from config ({}), using defaults", e);
            ResourcePaths::defaults()
        })
    }

    pub async fn build(&self) -> ResourceManifest {
        let paths = self.resource_paths().await;

        let mut fonts = IndexMap::new();
        for font in &paths.fonts {
            let size = self.size_of(&font.path).await;
            info!("  {}: {} ({})", font.name, format_mb(size), font.path);
            fonts.insert(
                font.name.clone(),
                FontSize {
                    path: font.path.clone(),
                    size,
                },
            );
        }

        let mut textures = IndexMap::new();
        for texture in &paths.textures {
            let size = self.size_of(texture).await;
            info!("  {}: {}", texture, format_mb(size));
            textures.insert(texture.clone(), size);
        }

        let mut ammo = IndexMap::new();
        let mut ammo_total = 0;
        for bundle in RUNTIME_BUNDLES {
            let size = self.size_of(bundle).await;
            info!("  {}: {}", bundle, format_mb(size));
            ammo_total += size;
            ammo.insert(bundle.to_string(), size);
        }
        ammo.insert("total".to_string(), ammo_total);

        let fonts_total: u64 = fonts.values().map(|f| f.size).sum();
        let textures_total: u64 = textures.values().sum();
        let totals = ManifestTotals {
            fonts: fonts_total,
            textures: textures_total,
            ammo: ammo_total,
            all: fonts_total + textures_total + ammo_total,
        };
        info!(
            "Totals: fonts {}, textures {}, ammo {}, all {}",
            format_mb(totals.fonts),
            format_mb(totals.textures),
            format_mb(totals.ammo),
            format_mb(totals.all)
        );

        ResourceManifest {
            fonts,
            textures,
            ammo,
            totals,
        }
    }

    /// Build the manifest and write it as pretty JSON
    pub async fn write(&self, output: &Path) -> anyhow::Result<ResourceManifest> {
        let manifest = self.build().await;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&manifest)?;
        tokio::fs::write(output, content).await?;
        info!("Resource sizes written to {}", output.display());

        Ok(manifest)
    }

    async fn size_of(&self, relative: &str) -> u64 {
        tokio::fs::metadata(self.public_dir.join(relative))
            .await
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

fn format_mb(size: u64) -> String {
    format!("{:.2} MB", size as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG_SOURCE: &str = r#"
const BASE_URL = import.meta.env.BASE_URL;

export const fontsConfig = {
	lxgw: `${BASE_URL}json/LXGW WenKai_Regular.json`,
	// helvetiker: `${BASE_URL}json/helvetiker.json`,

	roboto: `${BASE_URL}json/roboto.json`, // body text
};

export const RESOURCE_CONFIG = {
	preloadTextures: [
		`${BASE_URL}img/earth.jpg`,
		// `${BASE_URL}img/unused.png`,
		`${BASE_URL}img/stone.png`,
	],
	other: [`${BASE_URL}img/ignored.png`],
};
"#;

    #[test]
    fn test_parse_config_blocks() {
        let paths = ResourcePaths::parse(CONFIG_SOURCE).unwrap();

        assert_eq!(
            paths.fonts,
            vec![
                FontEntry {
                    name: "lxgw".to_string(),
                    path: "json/LXGW WenKai_Regular.json".to_string()
                },
                FontEntry {
                    name: "roboto".to_string(),
                    path: "json/roboto.json".to_string()
                },
            ]
        );
        assert_eq!(paths.textures, vec!["img/earth.jpg", "img/stone.png"]);
    }

    #[test]
    fn test_parse_without_blocks_is_empty() {
        let paths = ResourcePaths::parse("export const nothing = 1;").unwrap();
        assert!(paths.fonts.is_empty());
        assert!(paths.textures.is_empty());
    }

    #[tokio::test]
    async fn test_missing_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        let paths = ManifestBuilder::new(root.path()).resource_paths().await;
        assert_eq!(paths, ResourcePaths::defaults());
        assert_eq!(paths.textures.len(), 7);
    }

    #[tokio::test]
    async fn test_build_and_write_manifest() {
        let root = TempDir::new().unwrap();
        let config_dir = root.path().join("src").join("config");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("index.ts"), CONFIG_SOURCE).unwrap();

        let public = root.path().join("public");
        std::fs::create_dir_all(public.join("img")).unwrap();
        std::fs::create_dir_all(public.join("json")).unwrap();
        std::fs::create_dir_all(public.join("ammo")).unwrap();
        std::fs::write(public.join("json").join("roboto.json"), vec![0u8; 300]).unwrap();
        std::fs::write(public.join("img").join("earth.jpg"), vec![0u8; 1000]).unwrap();
        std::fs::write(public.join("ammo").join("ammo.js"), vec![0u8; 50]).unwrap();

        let output = ManifestBuilder::default_output(root.path());
        let manifest = ManifestBuilder::new(root.path()).write(&output).await.unwrap();

        assert_eq!(manifest.fonts["lxgw"].size, 0);
        assert_eq!(manifest.fonts["roboto"].size, 300);
        assert_eq!(manifest.textures["img/earth.jpg"], 1000);
        assert_eq!(manifest.textures["img/stone.png"], 0);
        assert_eq!(manifest.ammo["ammo/ammo.js"], 50);
        assert_eq!(manifest.ammo["total"], 50);
        assert_eq!(
            manifest.totals,
            ManifestTotals {
                fonts: 300,
                textures: 1000,
                ammo: 50,
                all: 1350
            }
        );

        let written: ResourceManifest =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, manifest);
    }

    #[tokio::test]
    async fn test_manifest_keeps_declaration_order() {
        let root = TempDir::new().unwrap();
        let config_file = root.path().join("index.ts");
        std::fs::write(
            &config_file,
            r#"
export const fontsConfig = {
	roboto: `${BASE_URL}json/roboto.json`,
	lxgw: `${BASE_URL}json/lxgw.json`,
};
const RESOURCE_CONFIG = {
	preloadTextures: [
		`${BASE_URL}img/woodTexture.jpg`,
		`${BASE_URL}img/earth.jpg`,
		`${BASE_URL}img/BeachBallColor.jpg`,
	],
};
"#,
        )
        .unwrap();

        let output = root.path().join("resource_sizes.json");
        let manifest = ManifestBuilder::new(root.path())
            .with_config_file(config_file)
            .write(&output)
            .await
            .unwrap();

        let fonts: Vec<&str> = manifest.fonts.keys().map(String::as_str).collect();
        assert_eq!(fonts, vec!["roboto", "lxgw"]);
        let textures: Vec<&str> = manifest.textures.keys().map(String::as_str).collect();
        assert_eq!(textures, vec!["img/woodTexture.jpg", "img/earth.jpg", "img/BeachBallColor.jpg"]);
        let ammo: Vec<&str> = manifest.ammo.keys().map(String::as_str).collect();
        assert_eq!(ammo, vec!["ammo/ammo.js", "ammo/ammo.wasm.js", "ammo/ammo.wasm.wasm", "total"]);

        let written = std::fs::read_to_string(&output).unwrap();
        let wood = written.find("woodTexture").unwrap();
        let earth = written.find("earth.jpg").unwrap();
        assert!(wood < earth);
    }
}
