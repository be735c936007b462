//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path di output: ogni `nome.ext` produce un
//! `nome.webp` accanto all'originale.

use crate::error::ConvertError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of every converted file
pub const TARGET_EXTENSION: &str = "webp";

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Sibling path with the same stem and the target extension
    pub fn get_output_path(input_path: &Path) -> Result<PathBuf, ConvertError> {
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| ConvertError::Validation(format!("Invalid file name: {}", input_path.display())))?
            .to_string_lossy();

        let result = input_path.with_file_name(format!("{}.{}", file_stem, TARGET_EXTENSION));
        debug!("Resolved output path: {} -> {}", input_path.display(), result.display());

        Ok(result)
    }

    /// Inputs that would write the same output, e.g. `logo.jpg` and `logo.png`.
    /// The later file in run order overwrites the earlier one.
    pub fn find_collisions<'a, I>(inputs: I) -> Vec<(PathBuf, Vec<PathBuf>)>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut by_output: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
        let mut order = Vec::new();

        for input in inputs {
            if let Ok(output) = Self::get_output_path(input) {
                let entry = by_output.entry(output.clone()).or_default();
                if entry.is_empty() {
                    order.push(output);
                }
                entry.push(input.to_path_buf());
            }
        }

        order
            .into_iter()
            .filter_map(|output| {
                let inputs = by_output.remove(&output)?;
                (inputs.len() > 1).then_some((output, inputs))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_replaces_extension() {
        assert_eq!(
            PathResolver::get_output_path(Path::new("public/img/earth.jpg")).unwrap(),
            PathBuf::from("public/img/earth.webp")
        );
        assert_eq!(
            PathResolver::get_output_path(Path::new("lens.flare.PNG")).unwrap(),
            PathBuf::from("lens.flare.webp")
        );
    }

    #[test]
    fn test_output_path_rejects_nameless_input() {
        assert!(PathResolver::get_output_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_find_collisions() {
        let inputs = [
            Path::new("img/logo.jpg"),
            Path::new("img/logo.png"),
            Path::new("img/stone.png"),
        ];
        let collisions = PathResolver::find_collisions(inputs);

        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].0, PathBuf::from("img/logo.webp"));
        assert_eq!(collisions[0].1.len(), 2);
    }
}
