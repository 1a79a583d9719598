mod annotations;
mod manifest;
mod overlay;

pub use annotations::write_annotations;

pub use manifest::CanvasManifest;

pub use overlay::draw_overlay;
