// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::constant::DRAW_COLOR;
use crate::error::TesseraError;
use crate::im::TesseraImage;

/// Draw closed polylines over an RGB copy of an image
///
/// # Arguments
///
/// * `image` - Patch raster
/// * `polygons` - Polygons in local pixel coordinates
///
/// # Examples
///
/// ```
/// use image::DynamicImage;
/// use tessera_core::im::TesseraImage;
/// use tessera_core::io::draw_overlay;
///
/// let image = TesseraImage::new_from_default(DynamicImage::new_rgb8(20, 20)).unwrap();
/// let overlay = draw_overlay(&image, &[vec![[2.0, 2.0], [10.0, 2.0], [10.0, 10.0]]]).unwrap();
///
/// assert_eq!(overlay.get_pixel(6, 2).0, [255, 0, 0]);
/// assert_eq!(overlay.get_pixel(15, 15).0, [0, 0, 0]);
/// ```
pub fn draw_overlay(
    image: &TesseraImage,
    polygons: &[Vec<[f64; 2]>],
) -> Result<RgbImage, TesseraError> {
    let mut canvas = image.to_rgb8()?;
    let color = Rgb(DRAW_COLOR);

    for polygon in polygons.iter() {
        let n = polygon.len();
        if n < 2 {
            continue;
        }

        for i in 0..n {
            let [x0, y0] = polygon[i];
            let [x1, y1] = polygon[(i + 1) % n];
            draw_line_segment_mut(
                &mut canvas,
                (x0 as f32, y0 as f32),
                (x1 as f32, y1 as f32),
                color,
            );
        }
    }

    Ok(canvas)
}
