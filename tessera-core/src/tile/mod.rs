mod grid;
mod padding;
mod patch;
mod window;

pub use grid::Tile;
pub use padding::PaddingPlan;
pub use patch::{Patch, extract_patches};
pub use window::Window;
