// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TesseraError;
use crate::tile::{PaddingPlan, Tile, Window};

/// Recorded geometry of one padded canvas
///
/// Patch indices are positions in `tiles`, so a manifest is sufficient to
/// place every patch back onto the source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasManifest {
    pub source: String,
    pub height: u32,
    pub width: u32,
    pub padding: PaddingPlan,
    pub padded_height: u32,
    pub padded_width: u32,
    pub tile_size: u32,
    pub overlap: u32,
    pub tiles: Vec<Tile>,
}

impl CanvasManifest {
    /// Build a manifest for a source image of the given shape
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::io::CanvasManifest;
    /// use tessera_core::tile::Window;
    ///
    /// let window = Window::new(640, 140).unwrap();
    /// let manifest = CanvasManifest::new("image.png", 1000, 1000, &window);
    ///
    /// assert_eq!(manifest.padded_height, 1140);
    /// assert_eq!(manifest.tiles.len(), 4);
    /// ```
    pub fn new(source: &str, height: u32, width: u32, window: &Window) -> Self {
        let padding = window.plan(height, width);
        let padded_height = padding.padded_height(height);
        let padded_width = padding.padded_width(width);

        Self {
            source: source.to_string(),
            height,
            width,
            padding,
            padded_height,
            padded_width,
            tile_size: window.tile_size(),
            overlap: window.overlap(),
            tiles: window.tiles(padded_height, padded_width),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TesseraError> {
        let file = File::create(path).map_err(|_| TesseraError::ManifestWriteError)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, self).map_err(|_| TesseraError::ManifestWriteError)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TesseraError> {
        let file = File::open(&path).map_err(|_| {
            TesseraError::NoFileError(path.as_ref().to_string_lossy().to_string())
        })?;

        serde_json::from_reader(BufReader::new(file))
            .map_err(|err| TesseraError::OtherError(format!("Invalid canvas manifest: {}", err)))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    pub fn test_manifest_geometry() {
        let window = Window::new(640, 140).unwrap();
        let manifest = CanvasManifest::new("a.png", 480, 1200, &window);

        assert_eq!(manifest.padding.bottom, 160);
        assert_eq!(manifest.padding.right, 440);
        assert_eq!((manifest.padded_height, manifest.padded_width), (640, 1640));
        assert_eq!(manifest.tiles.len(), 3);
        assert_eq!(manifest.tiles[2].xmin, 1000);
    }

    #[test]
    pub fn test_manifest_save_open() {
        let path = "TEST_MANIFEST_SAVE_OPEN.json";
        let window = Window::new(100, 20).unwrap();
        let manifest = CanvasManifest::new("b.png", 250, 90, &window);

        manifest.save(path).unwrap();
        let restored = CanvasManifest::open(path);
        std::fs::remove_file(path).unwrap();

        assert_eq!(restored.unwrap(), manifest);
    }

    #[test]
    pub fn test_manifest_open_failure() {
        assert!(CanvasManifest::open("does_not_exist.json").is_err());
    }
}
