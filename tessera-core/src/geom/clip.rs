// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Area, BooleanOps, Coord, Line, LineString, Polygon, Rect};

use crate::tile::Tile;

/// Result of intersecting a polygon with a tile rectangle
#[derive(Debug, Clone, PartialEq)]
pub enum Intersection {
    /// No overlap, or an overlap without area (a shared edge or corner)
    Empty,
    /// A single polygon given by its closed exterior ring
    Simple(Vec<[f64; 2]>),
    /// The overlap splits into several disjoint polygons
    Complex,
}

/// The input polygon is self-intersecting or otherwise not simple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPolygon;

/// Exact polygon/rectangle intersection backend
pub trait Clipper: Send + Sync {
    /// Intersect a polygon in absolute canvas coordinates with a tile
    fn intersect(&self, polygon: &[[f64; 2]], tile: &Tile) -> Result<Intersection, InvalidPolygon>;
}

/// Clipper backed by the boolean operations of the `geo` crate
///
/// # Examples
///
/// ```
/// use tessera_core::geom::{Clipper, GeoClipper, Intersection};
/// use tessera_core::tile::Tile;
///
/// let tile = Tile { ymin: 0, xmin: 0, ymax: 10, xmax: 10 };
/// let square = [[5.0, 5.0], [15.0, 5.0], [15.0, 15.0], [5.0, 15.0]];
///
/// match GeoClipper.intersect(&square, &tile).unwrap() {
///     Intersection::Simple(ring) => assert_eq!(ring.first(), ring.last()),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoClipper;

impl Clipper for GeoClipper {
    fn intersect(&self, polygon: &[[f64; 2]], tile: &Tile) -> Result<Intersection, InvalidPolygon> {
        let exterior: LineString<f64> = polygon
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect::<Vec<Coord<f64>>>()
            .into();

        let subject = Polygon::new(exterior, vec![]);

        if !is_simple(&subject) {
            return Err(InvalidPolygon);
        }

        let boundary = Rect::new(
            Coord {
                x: tile.xmin as f64,
                y: tile.ymin as f64,
            },
            Coord {
                x: tile.xmax as f64,
                y: tile.ymax as f64,
            },
        )
        .to_polygon();

        let pieces: Vec<Polygon<f64>> = subject
            .intersection(&boundary)
            .into_iter()
            .filter(|piece| piece.unsigned_area() > 0.0)
            .collect();

        match pieces.as_slice() {
            [] => Ok(Intersection::Empty),
            [piece] => Ok(Intersection::Simple(
                piece.exterior().coords().map(|c| [c.x, c.y]).collect(),
            )),
            _ => Ok(Intersection::Complex),
        }
    }
}

/// Check that a polygon exterior is a simple, non-degenerate ring
///
/// Consecutive duplicate vertices are tolerated. Non-adjacent edges must not
/// touch and adjacent edges may only share their common vertex.
///
/// # Examples
///
/// ```
/// use geo::{Polygon, LineString};
/// use tessera_core::geom::is_simple;
///
/// let square = Polygon::new(
///     LineString::from(vec![(0., 0.), (1., 0.), (1., 1.), (0., 1.)]),
///     vec![],
/// );
/// assert!(is_simple(&square));
///
/// let bowtie = Polygon::new(
///     LineString::from(vec![(0., 0.), (1., 1.), (1., 0.), (0., 1.)]),
///     vec![],
/// );
/// assert!(!is_simple(&bowtie));
/// ```
pub fn is_simple(polygon: &Polygon<f64>) -> bool {
    let mut ring: Vec<Coord<f64>> = polygon.exterior().coords().copied().collect();
    ring.dedup();

    if ring.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return false;
    }

    if ring.first() != ring.last() {
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
    }

    // A closed ring needs at least three distinct vertices
    if ring.len() < 4 {
        return false;
    }

    let edges: Vec<Line<f64>> = ring.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let n = edges.len();

    for i in 0..n {
        for j in i + 1..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);

            match line_intersection(edges[i], edges[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(_) => return false,
            }
        }
    }

    true
}
