//! Gallery manifest: the TOML file naming the images to show and, optionally,
//! where each one goes.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// Fractional placement of one image within the surface. All four fields are
/// fractions of the surface dimensions in `[0, 1]`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    /// Path to the image file, resolved relative to the manifest's directory.
    pub path: PathBuf,
    /// Explicit placement. Entries without one are laid out automatically.
    #[serde(default)]
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(default, rename = "image")]
    pub images: Vec<ImageEntry>,
}

impl Manifest {
    pub fn from_toml_str(raw: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads and parses a manifest file, resolving relative image paths
    /// against the manifest's own directory.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::from_toml_str(&raw)?;
        if let Some(base) = path.parent() {
            for entry in &mut manifest.images {
                if entry.path.is_relative() {
                    entry.path = base.join(&entry.path);
                }
            }
        }
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        if self.version != SUPPORTED_VERSION {
            return Err(ManifestError::Invalid(format!(
                "unsupported manifest version {} (expected {SUPPORTED_VERSION})",
                self.version
            )));
        }
        if self.images.is_empty() {
            return Err(ManifestError::Invalid(
                "manifest declares no images".into(),
            ));
        }
        for (index, entry) in self.images.iter().enumerate() {
            if entry.path.as_os_str().is_empty() {
                return Err(ManifestError::Invalid(format!(
                    "image #{index} has an empty path"
                )));
            }
            if let Some(placement) = entry.placement {
                for (name, value) in [
                    ("x", placement.x),
                    ("y", placement.y),
                    ("width", placement.width),
                    ("height", placement.height),
                ] {
                    if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                        return Err(ManifestError::Invalid(format!(
                            "image #{index} placement {name} = {value} is outside [0, 1]"
                        )));
                    }
                }
                if placement.width == 0.0 || placement.height == 0.0 {
                    return Err(ManifestError::Invalid(format!(
                        "image #{index} placement has a zero extent"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_manifest() {
        let manifest = Manifest::from_toml_str(
            r#"
            version = 1

            [[image]]
            path = "photos/one.png"

            [[image]]
            path = "photos/two.jpg"
            placement = { x = 0.1, y = 0.1, width = 0.3, height = 0.4 }
            "#,
        )
        .expect("manifest should parse");
        assert_eq!(manifest.images.len(), 2);
        assert!(manifest.images[0].placement.is_none());
        assert_eq!(
            manifest.images[1].placement,
            Some(Placement {
                x: 0.1,
                y: 0.1,
                width: 0.3,
                height: 0.4,
            })
        );
    }

    #[test]
    fn rejects_unknown_versions() {
        let err = Manifest::from_toml_str("version = 2\n[[image]]\npath = \"a.png\"\n")
            .expect_err("version 2 must fail");
        assert!(matches!(err, ManifestError::Invalid(_)));
    }

    #[test]
    fn rejects_empty_image_lists() {
        let err = Manifest::from_toml_str("version = 1\n").expect_err("no images must fail");
        assert!(matches!(err, ManifestError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_placements() {
        let err = Manifest::from_toml_str(
            r#"
            version = 1
            [[image]]
            path = "a.png"
            placement = { x = 0.0, y = 0.0, width = 1.5, height = 0.5 }
            "#,
        )
        .expect_err("width beyond 1 must fail");
        assert!(matches!(err, ManifestError::Invalid(_)));
    }

    #[test]
    fn load_resolves_paths_against_the_manifest_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest_path = dir.path().join("wall.toml");
        std::fs::write(&manifest_path, "version = 1\n[[image]]\npath = \"a.png\"\n")
            .expect("write manifest");

        let manifest = Manifest::load(&manifest_path).expect("manifest should load");
        assert_eq!(manifest.images[0].path, dir.path().join("a.png"));
    }
}
