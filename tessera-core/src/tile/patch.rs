// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::constant::{DRAW_SUFFIX, LABEL_EXTENSION};
use crate::error::TesseraError;
use crate::geom::{Annotation, Remapped};
use crate::im::TesseraImage;
use crate::io;
use crate::tile::Tile;
use crate::ut::path::OutputPaths;

/// The raster and annotations materialized for one tile
///
/// Annotations are kept in label order alongside their local pixel
/// coordinates, which are only used to draw debug overlays.
#[derive(Debug, Clone)]
pub struct Patch {
    index: usize,
    tile: Tile,
    image: TesseraImage,
    image_path: PathBuf,
    annotation_path: PathBuf,
    annotations: Vec<Annotation>,
    drawable: Vec<Vec<[f64; 2]>>,
}

impl Patch {
    /// Initialize a patch without annotations
    ///
    /// # Arguments
    ///
    /// * `index` - Row-major index of the tile
    /// * `tile` - Absolute tile rectangle on the padded canvas
    /// * `image` - Pixels copied from the tile
    /// * `image_path` - Output path of the patch raster
    /// * `annotation_path` - Output path of the patch label file
    pub fn new(
        index: usize,
        tile: Tile,
        image: TesseraImage,
        image_path: PathBuf,
        annotation_path: PathBuf,
    ) -> Self {
        Self {
            index,
            tile,
            image,
            image_path,
            annotation_path,
            annotations: Vec::new(),
            drawable: Vec::new(),
        }
    }

    /// Append a remapped label
    pub fn push(&mut self, remapped: Remapped) {
        let (annotation, pixels) = remapped.into_parts();
        self.annotations.push(annotation);
        self.drawable.push(pixels);
    }
}

// >>> PROPERTY METHODS

impl Patch {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn image(&self) -> &TesseraImage {
        &self.image
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn annotation_path(&self) -> &Path {
        &self.annotation_path
    }

    /// Output path of the debug overlay, `<stem>_<index>_draw.<ext>`
    pub fn draw_path(&self) -> PathBuf {
        let stem = self
            .image_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let name = match self.image_path.extension() {
            Some(ext) => format!("{}{}.{}", stem, DRAW_SUFFIX, ext.to_string_lossy()),
            None => format!("{}{}", stem, DRAW_SUFFIX),
        };

        self.image_path.with_file_name(name)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Local pixel polylines parallel to `annotations`
    pub fn drawable(&self) -> &[Vec<[f64; 2]>] {
        &self.drawable
    }
}

// <<< PROPERTY METHODS

// >>> I/O METHODS

impl Patch {
    /// Write the patch raster, its label file and optionally an overlay
    ///
    /// # Arguments
    ///
    /// * `draw` - Also write `<stem>_<index>_draw.<ext>` with polylines drawn
    pub fn save(&self, draw: bool) -> Result<(), TesseraError> {
        self.image.save(&self.image_path)?;

        io::write_annotations(&self.annotation_path, &self.annotations)?;

        if draw {
            io::draw_overlay(&self.image, &self.drawable)?
                .save(self.draw_path())
                .map_err(|_| TesseraError::ImageWriteError)?;
        }

        Ok(())
    }
}

// <<< I/O METHODS

/// Copy every tile of a padded canvas into its own patch
///
/// Patches are named `<stem>_<index>.<image_format>` and
/// `<stem>_<index>.txt` following the row-major tile order.
///
/// # Arguments
///
/// * `canvas` - The padded canvas
/// * `tiles` - Tiles in row-major order
/// * `stem` - File stem of the source image
/// * `paths` - Output directories for images and labels
/// * `image_format` - Extension of the patch rasters
pub fn extract_patches(
    canvas: &TesseraImage,
    tiles: &[Tile],
    stem: &str,
    paths: &OutputPaths,
    image_format: &str,
) -> Result<Vec<Patch>, TesseraError> {
    tiles
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let image = canvas.crop(tile.xmin, tile.ymin, tile.width(), tile.height())?;

            let name = format!("{}_{}", stem, index);

            Ok(Patch::new(
                index,
                *tile,
                image,
                paths.images.join(format!("{}.{}", name, image_format)),
                paths
                    .labels
                    .join(format!("{}.{}", name, LABEL_EXTENSION)),
            ))
        })
        .collect()
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::im::TesseraBuffer;
    use crate::tile::Window;

    fn paths() -> OutputPaths {
        OutputPaths {
            images: PathBuf::from("out/images/g"),
            labels: PathBuf::from("out/labels/g"),
            canvas: PathBuf::from("out/canvas/g"),
        }
    }

    #[test]
    pub fn test_extract_patches() {
        let window = Window::new(4, 2).unwrap();

        // 6x6 canvas where each pixel stores x + 10 * y
        let data: Vec<u8> = (0..6).flat_map(|y| (0..6).map(move |x| x + 10 * y)).collect();
        let canvas = TesseraImage::U8(TesseraBuffer::new(6, 6, 1, data).unwrap());

        let tiles = window.tiles(6, 6);
        let patches = extract_patches(&canvas, &tiles, "img", &paths(), "png").unwrap();

        assert_eq!(patches.len(), 4);

        for (index, patch) in patches.iter().enumerate() {
            assert_eq!(patch.index(), index);
            assert_eq!(patch.image().shape(), (4, 4, 1));
            assert!(patch.annotations().is_empty());
        }

        match patches[3].image() {
            TesseraImage::U8(buffer) => {
                assert_eq!(buffer.pixel(0, 0), &[22]);
                assert_eq!(buffer.pixel(3, 3), &[55]);
            }
            _ => panic!("expected u8 patch"),
        }

        assert_eq!(
            patches[2].image_path(),
            Path::new("out/images/g/img_2.png")
        );
        assert_eq!(
            patches[2].annotation_path(),
            Path::new("out/labels/g/img_2.txt")
        );
    }

    #[test]
    pub fn test_draw_path() {
        let canvas = TesseraImage::U8(TesseraBuffer::new(4, 4, 1, vec![0; 16]).unwrap());
        let tiles = Window::new(4, 0).unwrap().tiles(4, 4);
        let patches = extract_patches(&canvas, &tiles, "scan", &paths(), "jpg").unwrap();

        assert_eq!(
            patches[0].draw_path(),
            PathBuf::from("out/images/g/scan_0_draw.jpg")
        );
    }
}
