mod clip;
mod remap;

pub use clip::{Clipper, GeoClipper, Intersection, InvalidPolygon, is_simple};
pub use remap::{
    Annotation, Diagnostic, Outcome, Remapped, group_by_patch, remap_label, remap_labels,
};
