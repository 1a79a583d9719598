mod buffer;
mod image;
mod labels;

pub use buffer::TesseraBuffer;
pub use image::TesseraImage;

pub use labels::Label;
pub use labels::Labels;
