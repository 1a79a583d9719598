// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use serde::{Deserialize, Serialize};

use crate::tile::Window;

/// An absolute square region of the padded canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub ymin: u32,
    pub xmin: u32,
    pub ymax: u32,
    pub xmax: u32,
}

impl Tile {
    pub fn width(&self) -> u32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> u32 {
        self.ymax - self.ymin
    }

    /// Check if an absolute point lies within the tile, edges included
    pub fn contains(&self, [x, y]: [f64; 2]) -> bool {
        self.ymin as f64 <= y
            && y <= self.ymax as f64
            && self.xmin as f64 <= x
            && x <= self.xmax as f64
    }
}

impl Window {
    /// Walk a canvas row-major and emit every tile that fits inside it
    ///
    /// Tiles start every `stride` pixels. A tile reaching past the canvas
    /// is skipped, which never happens on a canvas padded by this window.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::tile::{Tile, Window};
    ///
    /// let window = Window::new(640, 140).unwrap();
    /// let tiles = window.tiles(1140, 1140);
    ///
    /// assert_eq!(tiles.len(), 4);
    /// assert_eq!(tiles[1], Tile { ymin: 0, xmin: 500, ymax: 640, xmax: 1140 });
    /// ```
    pub fn tiles(&self, height: u32, width: u32) -> Vec<Tile> {
        let size = self.tile_size();
        let stride = self.stride() as usize;

        let mut tiles = Vec::with_capacity(self.tile_count(height, width));

        for y in (0..height).step_by(stride) {
            for x in (0..width).step_by(stride) {
                let ymax = y + size;
                let xmax = x + size;

                if ymax > height || xmax > width {
                    continue;
                }

                tiles.push(Tile {
                    ymin: y,
                    xmin: x,
                    ymax,
                    xmax,
                });
            }
        }

        tiles
    }

    /// Number of tile rows and columns that fit a canvas
    pub fn grid_shape(&self, height: u32, width: u32) -> (usize, usize) {
        let fit = |length: u32| {
            if length < self.tile_size() {
                0
            } else {
                ((length - self.tile_size()) / self.stride()) as usize + 1
            }
        };

        (fit(height), fit(width))
    }

    /// Number of tiles that fit a canvas
    pub fn tile_count(&self, height: u32, width: u32) -> usize {
        let (rows, cols) = self.grid_shape(height, width);
        rows * cols
    }
}
