// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use serde::{Deserialize, Serialize};

use crate::tile::Window;

/// Rows and columns appended to a source image to make it exactly tileable
///
/// Padding is only ever added on the bottom and right edges so source pixel
/// coordinates remain valid canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingPlan {
    pub bottom: u32,
    pub right: u32,
}

impl PaddingPlan {
    /// Height of the padded canvas
    pub fn padded_height(&self, height: u32) -> u32 {
        height + self.bottom
    }

    /// Width of the padded canvas
    pub fn padded_width(&self, width: u32) -> u32 {
        width + self.right
    }
}

impl Window {
    /// Padding needed along one dimension of length `length`
    ///
    /// Lengths up to one tile are padded to exactly one tile. Longer lengths
    /// are padded by `stride - (length - tile_size) % stride`, unless that
    /// amount equals a whole tile, in which case no padding is added. With a
    /// positive overlap a length already on a tile boundary therefore still
    /// receives one extra stride.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::tile::Window;
    ///
    /// let window = Window::new(640, 140).unwrap();
    ///
    /// assert_eq!(window.pad_amount(300), 340);
    /// assert_eq!(window.pad_amount(640), 0);
    /// assert_eq!(window.pad_amount(1000), 140);
    /// assert_eq!(window.pad_amount(1140), 500);
    ///
    /// let window = Window::new(640, 0).unwrap();
    /// assert_eq!(window.pad_amount(1280), 0);
    /// ```
    pub fn pad_amount(&self, length: u32) -> u32 {
        if length <= self.tile_size() {
            return self.tile_size() - length;
        }

        let stride = self.stride();
        let diff = stride - (length - self.tile_size()) % stride;

        if diff == self.tile_size() { 0 } else { diff }
    }

    /// Padding plan for a source image of the given height and width
    pub fn plan(&self, height: u32, width: u32) -> PaddingPlan {
        PaddingPlan {
            bottom: self.pad_amount(height),
            right: self.pad_amount(width),
        }
    }
}
