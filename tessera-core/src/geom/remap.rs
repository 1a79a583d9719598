// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

use rayon::prelude::*;

use crate::geom::{Clipper, Intersection};
use crate::im::Label;
use crate::tile::Tile;

/// Reason a label contributed nothing to a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// The label polygon is self-intersecting or otherwise invalid
    Distorted,
    /// The clipped polygon is empty, degenerate, split, or a clipped triangle
    OutsideBounds,
}

impl Diagnostic {
    pub fn message(&self) -> &'static str {
        match self {
            Diagnostic::Distorted => "polygon distorted",
            Diagnostic::OutsideBounds => "polygon outside annotation box",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::Distorted => "distorted-polygon",
            Diagnostic::OutsideBounds => "outside-bounds",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A class id and polygon normalized to a patch's own extent
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    class_id: String,
    points: Vec<[f64; 2]>,
}

impl Annotation {
    pub fn new(class_id: &str, points: Vec<[f64; 2]>) -> Self {
        Self {
            class_id: class_id.to_string(),
            points,
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Format as a yolo segmentation label line
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::geom::Annotation;
    ///
    /// let annotation = Annotation::new("2", vec![[0.5, 0.25], [0.0, 1.0], [0.125, 0.0]]);
    /// assert_eq!(annotation.to_line(), "2 0.5 0.25 0 1 0.125 0");
    /// ```
    pub fn to_line(&self) -> String {
        let mut line = self.class_id.clone();
        for [x, y] in self.points.iter() {
            line.push_str(&format!(" {} {}", x, y));
        }
        line
    }
}

/// A successfully remapped label
///
/// Holds the normalized annotation together with the local pixel
/// coordinates it was derived from, which are only used for overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct Remapped {
    annotation: Annotation,
    pixels: Vec<[f64; 2]>,
}

impl Remapped {
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn pixels(&self) -> &[[f64; 2]] {
        &self.pixels
    }

    pub fn into_parts(self) -> (Annotation, Vec<[f64; 2]>) {
        (self.annotation, self.pixels)
    }
}

/// The outcome of remapping one label onto one patch
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub patch: usize,
    pub label: usize,
    pub result: Result<Remapped, Diagnostic>,
}

fn round_to(value: f64, factor: f64) -> f64 {
    let rounded = (value * factor).round() / factor;
    // Avoid emitting "-0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Remap an absolute label onto a single tile
///
/// A label with every vertex inside the tile (edges included) is kept
/// unchanged. Otherwise triangles are dropped and larger polygons are
/// clipped to the tile rectangle. Surviving vertices are shifted to the
/// tile origin, capped at `tile_size - 1` and normalized by the tile size
/// with `precision` decimal digits.
///
/// # Arguments
///
/// * `label` - Label in absolute canvas pixel coordinates
/// * `tile` - Target tile
/// * `tile_size` - Tile side length in pixels
/// * `precision` - Number of decimal digits kept after normalization
/// * `clipper` - Polygon/rectangle intersection backend
///
/// # Examples
///
/// ```
/// use tessera_core::geom::{remap_label, Diagnostic, GeoClipper};
/// use tessera_core::im::Label;
/// use tessera_core::tile::Tile;
///
/// let tile = Tile { ymin: 0, xmin: 0, ymax: 100, xmax: 100 };
///
/// let inside = Label::parse("1 10 10 50 10 50 50").unwrap();
/// let remapped = remap_label(&inside, &tile, 100, 6, &GeoClipper).unwrap();
/// assert_eq!(remapped.annotation().to_line(), "1 0.1 0.1 0.5 0.1 0.5 0.5");
///
/// let triangle = Label::parse("1 90 10 150 10 150 50").unwrap();
/// assert_eq!(
///     remap_label(&triangle, &tile, 100, 6, &GeoClipper),
///     Err(Diagnostic::OutsideBounds)
/// );
/// ```
pub fn remap_label<C: Clipper + ?Sized>(
    label: &Label,
    tile: &Tile,
    tile_size: u32,
    precision: u32,
    clipper: &C,
) -> Result<Remapped, Diagnostic> {
    let vertices = label.as_points();

    let points = if vertices.iter().all(|&p| tile.contains(p)) {
        vertices.to_vec()
    } else if vertices.len() == 3 {
        return Err(Diagnostic::OutsideBounds);
    } else {
        match clipper.intersect(vertices, tile) {
            Ok(Intersection::Simple(ring)) => ring,
            Ok(Intersection::Empty) | Ok(Intersection::Complex) => {
                return Err(Diagnostic::OutsideBounds);
            }
            Err(_) => return Err(Diagnostic::Distorted),
        }
    };

    let size = tile_size as f64;
    let limit = (tile_size.saturating_sub(1)) as f64;
    let xmin = tile.xmin as f64;
    let ymin = tile.ymin as f64;

    let pixels: Vec<[f64; 2]> = points
        .iter()
        .map(|&[x, y]| {
            [(x - xmin).min(limit), (y - ymin).min(limit)]
        })
        .collect();

    let factor = 10f64.powi(precision as i32);

    let normalized = pixels
        .iter()
        .map(|&[x, y]| [round_to(x / size, factor), round_to(y / size, factor)])
        .collect();

    Ok(Remapped {
        annotation: Annotation::new(label.class_id(), normalized),
        pixels,
    })
}

/// Remap every label onto every tile in parallel
///
/// Outcomes are returned ordered by label then by tile.
pub fn remap_labels<C: Clipper + ?Sized>(
    labels: &[Label],
    tiles: &[Tile],
    tile_size: u32,
    precision: u32,
    clipper: &C,
) -> Vec<Outcome> {
    labels
        .par_iter()
        .enumerate()
        .flat_map_iter(|(label_idx, label)| {
            tiles.iter().enumerate().map(move |(patch_idx, tile)| Outcome {
                patch: patch_idx,
                label: label_idx,
                result: remap_label(label, tile, tile_size, precision, clipper),
            })
        })
        .collect()
}

/// Split outcomes into per-patch annotations and diagnostics
///
/// Annotations for each patch stay in label order. Diagnostics are returned
/// as `(patch, label, diagnostic)` triples in the order they were received.
pub fn group_by_patch(
    outcomes: Vec<Outcome>,
    n_patches: usize,
) -> (Vec<Vec<Remapped>>, Vec<(usize, usize, Diagnostic)>) {
    let mut grouped: Vec<Vec<Remapped>> = (0..n_patches).map(|_| Vec::new()).collect();
    let mut diagnostics = Vec::new();

    for outcome in outcomes {
        match outcome.result {
            Ok(remapped) => {
                if let Some(patch) = grouped.get_mut(outcome.patch) {
                    patch.push(remapped);
                }
            }
            Err(diagnostic) => diagnostics.push((outcome.patch, outcome.label, diagnostic)),
        }
    }

    (grouped, diagnostics)
}
