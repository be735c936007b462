//! # Image Processing Module
//!
//! Questo modulo converte un singolo asset raster (JPEG/PNG) in WebP.
//!
//! ## Pipeline per file
//!
//! 1. **Formato sorgente**: dedotto dall'estensione (case-insensitive)
//! 2. **Decodifica**: in memoria con `image`, formato riconosciuto dal contenuto
//! 3. **Modo nativo**: color type dall'header PNG (`png`), `ColorType` decodificato per gli altri
//! 4. **Classificazione**: `ColorMode` {Indexed, AlphaCapable, PlainColor}, una volta per file
//! 5. **Normalizzazione**: funzione pura `ColorMode -> PixelLayout` (RGBA o RGB)
//! 6. **Encoding**: libwebp lossy, qualità fissa e metodo di massimo sforzo
//! 7. **Scrittura**: file temporaneo nella directory di destinazione + rename atomico
//!
//! ## Politica colore
//!
//! | Formato | Modo nativo          | ColorMode    | Layout |
//! |---------|----------------------|--------------|--------|
//! | PNG     | palette              | Indexed      | RGBA   |
//! | PNG     | alpha (LA, RGBA)     | AlphaCapable | RGBA   |
//! | PNG     | opaco (L, RGB, 16b)  | PlainColor   | RGB    |
//! | PNG     | L/RGB con `tRNS`     | PlainColor   | RGB    |
//! | JPEG    | qualsiasi            | PlainColor   | RGB    |
//!
//! ## Error Handling
//!
//! Ogni errore di decodifica, encoding o I/O viene catturato e convertito in
//! `ConversionResult::Failure` con la causa stringificata: il transcoder non
//! propaga mai errori oltre il proprio confine. L'originale non viene mai
//! modificato; una destinazione esistente viene sovrascritta.
//!
//! ## Esempio:
//! ```rust,ignore
//! let processor = ImageProcessor::new(&config);
//! let result = processor.transcode(&asset, original_size, &dest);
//! ```

use crate::config::Config;
use crate::error::ConvertError;
use crate::file_manager::AssetFile;
use image::io::Reader as ImageReader;
use image::DynamicImage;
use libwebp_sys::WebPConfig;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Source container format, from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Only PNG may carry transparency or a palette worth preserving
    pub fn is_alpha_capable(self) -> bool {
        matches!(self, Self::Png)
    }
}

/// Pixel storage reported by the decoder, before any conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeMode {
    Palette,
    Alpha,
    Opaque,
}

impl NativeMode {
    /// Inspect the raw bytes and the decoded image.
    ///
    /// The `image` decoder expands palettes and `tRNS` chunks on load, so for
    /// PNG content the mode comes from the stored color type in the header.
    pub fn probe(bytes: &[u8], image: &DynamicImage) -> Result<Self, ConvertError> {
        if bytes.starts_with(PNG_SIGNATURE) {
            let reader = png::Decoder::new(Cursor::new(bytes)).read_info()?;
            return Ok(Self::from_png_color_type(reader.info().color_type));
        }

        if image.color().has_alpha() {
            Ok(Self::Alpha)
        } else {
            Ok(Self::Opaque)
        }
    }

    /// A `tRNS` chunk does not make a grayscale or RGB image alpha-capable
    fn from_png_color_type(color_type: png::ColorType) -> Self {
        match color_type {
            png::ColorType::Indexed => Self::Palette,
            png::ColorType::Rgba | png::ColorType::GrayscaleAlpha => Self::Alpha,
            png::ColorType::Grayscale | png::ColorType::Rgb => Self::Opaque,
        }
    }
}

/// Color mode classification driving the pre-encode normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Indexed,
    AlphaCapable,
    PlainColor,
}

impl ColorMode {
    pub fn detect(format: SourceFormat, native: NativeMode) -> Self {
        if !format.is_alpha_capable() {
            return Self::PlainColor;
        }

        match native {
            NativeMode::Palette => Self::Indexed,
            NativeMode::Alpha => Self::AlphaCapable,
            NativeMode::Opaque => Self::PlainColor,
        }
    }

    /// Pixel layout handed to the encoder. Palettes expand to full alpha.
    pub fn layout(self) -> PixelLayout {
        match self {
            Self::Indexed | Self::AlphaCapable => PixelLayout::Rgba,
            Self::PlainColor => PixelLayout::Rgb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

/// Outcome of converting one asset
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success { original_size: u64, converted_size: u64 },
    Failure { reason: String },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Converts JPEG/PNG assets to lossy WebP.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    /// WebP quality (0-100)
    quality: u8,
    /// libwebp method (0-6)
    method: u8,
}

impl ImageProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            quality: config.webp_quality,
            method: config.webp_method,
        }
    }

    /// Convert `asset` into `dest`.
    ///
    /// `original_size` is the size measured by the caller before the attempt;
    /// it is echoed in the success result. Never returns an error: every
    /// failure becomes `ConversionResult::Failure`.
    pub fn transcode(&self, asset: &AssetFile, original_size: u64, dest: &Path) -> ConversionResult {
        match self.try_transcode(asset, dest) {
            Ok(converted_size) => ConversionResult::Success {
                original_size,
                converted_size,
            },
            Err(e) => {
                warn!("Conversion failed for {}: {}", asset.path().display(), e);
                ConversionResult::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_transcode(&self, asset: &AssetFile, dest: &Path) -> Result<u64, ConvertError> {
        let format = SourceFormat::from_extension(asset.extension()).ok_or_else(|| {
            ConvertError::Validation(format!("unsupported extension: {}", asset.extension()))
        })?;

        let bytes = std::fs::read(asset.path())?;
        let image = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()?
            .decode()?;

        let native = NativeMode::probe(&bytes, &image)?;
        let mode = ColorMode::detect(format, native);
        debug!(
            "{}: {:?} {:?} -> {:?} ({}x{})",
            asset.file_name(),
            format,
            image.color(),
            mode,
            image.width(),
            image.height()
        );

        let encoded = self.encode_webp(&image, mode.layout())?;
        write_atomically(dest, &encoded)?;

        Ok(std::fs::metadata(dest)?.len())
    }

    fn encode_webp(&self, image: &DynamicImage, layout: PixelLayout) -> Result<Vec<u8>, ConvertError> {
        let mut config = WebPConfig::new()
            .map_err(|_| ConvertError::Encode("libwebp rejected the default configuration".to_string()))?;
        config.quality = f32::from(self.quality);
        config.method = i32::from(self.method);

        let memory = match layout {
            PixelLayout::Rgba => {
                let rgba = image.to_rgba8();
                webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                    .encode_advanced(&config)
            }
            PixelLayout::Rgb => {
                let rgb = image.to_rgb8();
                webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
                    .encode_advanced(&config)
            }
        }
        .map_err(|e| ConvertError::Encode(format!("{:?}", e)))?;

        Ok(memory.to_vec())
    }
}

/// Write through a sibling temp file and rename it over `dest`
fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
