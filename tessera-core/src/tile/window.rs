// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use serde::{Deserialize, Serialize};

use crate::error::TesseraError;

/// A square sliding window with a fixed overlap between neighbours
///
/// A window can only be constructed with `overlap < tile_size`, so the
/// stride between consecutive tile origins is always positive.
///
/// # Examples
///
/// ```
/// use tessera_core::tile::Window;
///
/// let window = Window::new(640, 140).unwrap();
/// assert_eq!(window.stride(), 500);
///
/// assert!(Window::new(640, 640).is_err());
/// assert!(Window::new(0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    tile_size: u32,
    overlap: u32,
}

impl Window {
    pub fn new(tile_size: u32, overlap: u32) -> Result<Self, TesseraError> {
        if tile_size == 0 {
            return Err(TesseraError::ConfigError(
                "Tile size must be a positive integer".to_string(),
            ));
        }

        if overlap >= tile_size {
            return Err(TesseraError::ConfigError(format!(
                "Overlap ({}) must be smaller than the tile size ({})",
                overlap, tile_size
            )));
        }

        Ok(Self { tile_size, overlap })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn overlap(&self) -> u32 {
        self.overlap
    }

    /// Distance between consecutive tile origins
    pub fn stride(&self) -> u32 {
        self.tile_size - self.overlap
    }
}
