// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constant::{
    DEFAULT_FILL, DEFAULT_IMAGE_FORMAT, DEFAULT_OVERLAP, DEFAULT_PRECISION, DEFAULT_TILE_SIZE,
    MANIFEST_EXTENSION, SUPPORTED_IMAGE_FORMATS,
};
use crate::error::TesseraError;
use crate::geom::{Clipper, Diagnostic, group_by_patch, remap_labels};
use crate::im::{Labels, TesseraImage};
use crate::io::CanvasManifest;
use crate::tile::{Window, extract_patches};
use crate::ut::path::DatasetLayout;
use crate::ut::track;

/// Parameters of a sliding-window split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub tile_size: u32,
    pub overlap: u32,
    pub fill: f64,
    pub precision: u32,
    pub image_format: String,
    pub draw: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            overlap: DEFAULT_OVERLAP,
            fill: DEFAULT_FILL,
            precision: DEFAULT_PRECISION,
            image_format: DEFAULT_IMAGE_FORMAT.to_string(),
            draw: false,
        }
    }
}

impl SplitConfig {
    /// Check the configuration and derive its sliding window
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::split::SplitConfig;
    ///
    /// let window = SplitConfig::default().validate().unwrap();
    /// assert_eq!(window.stride(), 500);
    ///
    /// let config = SplitConfig { overlap: 640, ..SplitConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<Window, TesseraError> {
        let window = Window::new(self.tile_size, self.overlap)?;

        let format = self.image_format.trim_start_matches('.').to_lowercase();
        if !SUPPORTED_IMAGE_FORMATS.iter().any(|f| *f == format) {
            return Err(TesseraError::ConfigError(format!(
                "Unsupported image format '{}'",
                self.image_format
            )));
        }

        if !self.fill.is_finite() {
            return Err(TesseraError::ConfigError(format!(
                "Fill value must be finite, got {}",
                self.fill
            )));
        }

        // Beyond this an f64 no longer carries the requested digits
        if self.precision > 15 {
            return Err(TesseraError::ConfigError(format!(
                "Precision must be at most 15 digits, got {}",
                self.precision
            )));
        }

        Ok(window)
    }
}

/// A label dropped from one patch
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRecord {
    pub patch: usize,
    pub label: usize,
    pub diagnostic: Diagnostic,
    pub raw: String,
}

/// Result of splitting one source image
#[derive(Debug, Clone)]
pub struct SplitSummary {
    pub image: PathBuf,
    pub manifest: PathBuf,
    pub patches: usize,
    pub annotations: usize,
    pub diagnostics: Vec<DiagnosticRecord>,
}

/// Split one labelled source image into overlapping patches
///
/// The image is padded to a tileable canvas, cut into row-major tiles, and
/// every label is remapped onto every tile. All remapping completes before
/// any patch is written. Labels dropped from a patch are returned as
/// diagnostics rather than errors.
///
/// # Arguments
///
/// * `path` - Source image inside a dataset following `layout`
/// * `config` - Split parameters
/// * `layout` - Dataset convention locating labels and outputs
/// * `clipper` - Polygon/rectangle intersection backend
///
/// # Errors
///
/// Fails if the configuration is invalid, the image has no label file, or
/// any input cannot be read or output written.
pub fn split_image<P, L, C>(
    path: P,
    config: &SplitConfig,
    layout: &L,
    clipper: &C,
) -> Result<SplitSummary, TesseraError>
where
    P: AsRef<Path>,
    L: DatasetLayout + ?Sized,
    C: Clipper + ?Sized,
{
    let path = path.as_ref();
    let window = config.validate()?;
    let image_format = config.image_format.trim_start_matches('.').to_lowercase();

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| TesseraError::LayoutError(path.display().to_string()))?;

    let label_path = layout.label_path(path)?;
    if !label_path.is_file() {
        return Err(TesseraError::MissingLabelsError(
            label_path.display().to_string(),
        ));
    }

    let image = TesseraImage::open(path)?;
    let labels = Labels::open(&label_path)?;

    let height = image.height();
    let width = image.width();

    track::info(&format!(
        "{} | origin shape ({}, {}) | {} labels",
        path.display(),
        height,
        width,
        labels.len()
    ));

    let manifest = CanvasManifest::new(&path.to_string_lossy(), height, width, &window);

    track::debug(&format!(
        "{} | padding bottom={} right={} | padded shape ({}, {}) | {} tiles",
        path.display(),
        manifest.padding.bottom,
        manifest.padding.right,
        manifest.padded_height,
        manifest.padded_width,
        manifest.tiles.len()
    ));

    let canvas = image.pad(manifest.padding.bottom, manifest.padding.right, config.fill)?;

    let outputs = layout.output_paths(path)?;
    outputs.create()?;

    let mut patches = extract_patches(&canvas, &manifest.tiles, stem, &outputs, &image_format)?;

    let absolute = labels.to_absolute(width, height);
    let outcomes = remap_labels(
        absolute.as_labels(),
        &manifest.tiles,
        window.tile_size(),
        config.precision,
        clipper,
    );

    let (grouped, dropped) = group_by_patch(outcomes, patches.len());

    for (patch, remapped) in patches.iter_mut().zip(grouped) {
        for item in remapped {
            patch.push(item);
        }
    }

    let diagnostics: Vec<DiagnosticRecord> = dropped
        .into_iter()
        .map(|(patch, label, diagnostic)| {
            let raw = absolute.as_labels()[label].raw().to_string();

            match diagnostic {
                Diagnostic::Distorted => track::warning(&format!(
                    "{} | patch {} | {}: {}",
                    path.display(),
                    patch,
                    diagnostic,
                    raw
                )),
                Diagnostic::OutsideBounds => track::debug(&format!(
                    "{} | patch {} | label {} | {}",
                    path.display(),
                    patch,
                    label,
                    diagnostic
                )),
            }

            DiagnosticRecord {
                patch,
                label,
                diagnostic,
                raw,
            }
        })
        .collect();

    patches
        .par_iter()
        .map(|patch| patch.save(config.draw))
        .collect::<Result<Vec<()>, TesseraError>>()?;

    let manifest_path = outputs
        .canvas
        .join(format!("{}.{}", stem, MANIFEST_EXTENSION));

    manifest.save(&manifest_path)?;

    let annotations = patches.iter().map(|patch| patch.annotations().len()).sum();

    Ok(SplitSummary {
        image: path.to_path_buf(),
        manifest: manifest_path,
        patches: patches.len(),
        annotations,
        diagnostics,
    })
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::geom::GeoClipper;
    use std::collections::BTreeMap;
    use crate::ut::path::YoloLayout;
    use image::{Rgb, RgbImage};

    const LABELS: &str = "0 0.1 0.1 0.3 0.1 0.3 0.3 0.1 0.3\n\
                          1 0.4 0.1 0.7 0.1 0.7 0.2 0.4 0.2\n\
                          2 0.05 0.05 0.95 0.05 0.5 0.95\n";

    fn config() -> SplitConfig {
        SplitConfig {
            tile_size: 64,
            overlap: 14,
            image_format: "png".to_string(),
            ..SplitConfig::default()
        }
    }

    fn dataset(root: &str, with_labels: bool) -> PathBuf {
        let root = PathBuf::from(root);
        let _ = std::fs::remove_dir_all(&root);

        std::fs::create_dir_all(root.join("images/train")).unwrap();
        std::fs::create_dir_all(root.join("labels/train")).unwrap();

        let image_path = root.join("images/train/a.png");
        RgbImage::from_pixel(100, 100, Rgb([10, 20, 30]))
            .save(&image_path)
            .unwrap();

        if with_labels {
            std::fs::write(root.join("labels/train/a.txt"), LABELS).unwrap();
        }

        image_path
    }

    fn read_lines(path: PathBuf) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    pub fn test_validate() {
        assert!(SplitConfig::default().validate().is_ok());

        let bad_format = SplitConfig {
            image_format: "gif".to_string(),
            ..SplitConfig::default()
        };
        assert!(bad_format.validate().is_err());

        let bad_fill = SplitConfig {
            fill: f64::NAN,
            ..SplitConfig::default()
        };
        assert!(bad_fill.validate().is_err());

        let bad_tile = SplitConfig {
            tile_size: 0,
            ..SplitConfig::default()
        };
        assert!(bad_tile.validate().is_err());
    }

    #[test]
    pub fn test_split_image() {
        let root = "TEST_SPLIT_IMAGE";
        let image_path = dataset(root, true);

        let summary = split_image(&image_path, &config(), &YoloLayout::default(), &GeoClipper);
        let summary = summary.unwrap();

        assert_eq!(summary.patches, 4);
        assert_eq!(summary.annotations, 3);
        assert_eq!(summary.diagnostics.len(), 9);
        assert!(
            summary
                .diagnostics
                .iter()
                .all(|record| record.diagnostic == Diagnostic::OutsideBounds)
        );

        let split = PathBuf::from(root).join("split");

        let first = read_lines(split.join("labels/train/a_0.txt"));
        assert_eq!(first.len(), 2);
        assert!(first[0].starts_with("0 0.15625 0.15625"));
        assert!(first[1].starts_with("1 "));

        let second = read_lines(split.join("labels/train/a_1.txt"));
        assert_eq!(second.len(), 1);
        assert!(second[0].starts_with("1 "));

        assert!(read_lines(split.join("labels/train/a_3.txt")).is_empty());

        let patch = image::open(split.join("images/train/a_3.png"))
            .unwrap()
            .to_rgb8();
        assert_eq!(patch.dimensions(), (64, 64));
        assert_eq!(patch.get_pixel(10, 10).0, [10, 20, 30]);
        assert_eq!(patch.get_pixel(60, 60).0, [1, 1, 1]);

        let manifest = CanvasManifest::open(&summary.manifest).unwrap();
        assert_eq!((manifest.padded_height, manifest.padded_width), (114, 114));
        assert_eq!(manifest.tiles.len(), 4);

        std::fs::remove_dir_all(root).unwrap();
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            for entry in std::fs::read_dir(&current).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    let contents = std::fs::read(&path).unwrap();
                    files.insert(path, contents);
                }
            }
        }

        files
    }

    #[test]
    pub fn test_split_image_is_idempotent() {
        let root = "TEST_SPLIT_IMAGE_IDEMPOTENT";
        let image_path = dataset(root, true);
        let split = PathBuf::from(root).join("split");

        let config = SplitConfig {
            image_format: "jpg".to_string(),
            ..config()
        };

        split_image(&image_path, &config, &YoloLayout::default(), &GeoClipper).unwrap();
        let first = snapshot(&split);

        split_image(&image_path, &config, &YoloLayout::default(), &GeoClipper).unwrap();
        let second = snapshot(&split);

        std::fs::remove_dir_all(root).unwrap();

        // 4 rasters, 4 label files and the canvas manifest
        assert_eq!(first.len(), 9);
        assert!(first.keys().any(|path| path.ends_with("canvas/train/a.json")));
        assert!(first.keys().any(|path| path.ends_with("images/train/a_3.jpg")));
        assert_eq!(first, second);
    }

    #[test]
    pub fn test_split_draw() {
        let root = "TEST_SPLIT_IMAGE_DRAW";
        let image_path = dataset(root, true);

        let config = SplitConfig {
            draw: true,
            ..config()
        };

        split_image(&image_path, &config, &YoloLayout::default(), &GeoClipper).unwrap();
        let overlay = PathBuf::from(root).join("split/images/train/a_0_draw.png");
        let exists = overlay.is_file();

        std::fs::remove_dir_all(root).unwrap();

        assert!(exists);
    }

    #[test]
    pub fn test_split_missing_labels() {
        let root = "TEST_SPLIT_IMAGE_MISSING_LABELS";
        let image_path = dataset(root, false);

        let result = split_image(&image_path, &config(), &YoloLayout::default(), &GeoClipper);
        let split_created = PathBuf::from(root).join("split").exists();

        std::fs::remove_dir_all(root).unwrap();

        assert!(matches!(result, Err(TesseraError::MissingLabelsError(_))));
        assert!(!split_created);
    }
}
