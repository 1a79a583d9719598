// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// All currently supported image formats
pub const SUPPORTED_IMAGE_FORMATS: [&str; 14] = [
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "qoi", "tga", "tif", "tiff", "webp", "avif",
    "exr",
];

// Extension of yolo-style polygon label files
pub const LABEL_EXTENSION: &str = "txt";

// Extension of recorded canvas manifests
pub const MANIFEST_EXTENSION: &str = "json";

// Default sliding window settings
pub const DEFAULT_TILE_SIZE: u32 = 640;
pub const DEFAULT_OVERLAP: u32 = 140;

// Constant written into the padded border of every canvas
pub const DEFAULT_FILL: f64 = 1.0;

// Decimal digits kept for normalized patch coordinates
pub const DEFAULT_PRECISION: u32 = 6;

pub const DEFAULT_IMAGE_FORMAT: &str = "jpg";
pub const DEFAULT_SOURCE_EXTENSION: &str = "png";

// Default directory names of the yolo dataset convention
pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";
pub const SPLIT_DIR: &str = "split";
pub const CANVAS_DIR: &str = "canvas";

// Suffix of debug overlay images
pub const DRAW_SUFFIX: &str = "_draw";

// Color of debug overlay polylines
pub const DRAW_COLOR: [u8; 3] = [255, 0, 0];

// Run report file names
pub const REPORT_COUNTS: &str = "split_counts.tsv";
pub const REPORT_ERRORS: &str = "split_errors.tsv";
pub const REPORT_DIAGNOSTICS: &str = "split_diagnostics.tsv";
