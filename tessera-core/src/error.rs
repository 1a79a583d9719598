// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone)]
pub enum TesseraError {
    BufferSizeError,
    CropBoundsError,
    ConfigError(String),
    ImageError(&'static str),
    ImageReadError,
    ImageWriteError,
    ImageExtensionError,
    LabelsReadError(String),
    LabelsWriteError,
    ManifestWriteError,
    MissingLabelsError(String),
    LayoutError(String),
    NoFileError(String),
    DirError(String),
    OtherError(String),
}

impl fmt::Display for TesseraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TesseraError::BufferSizeError => {
                write!(
                    f,
                    "[tessera::BufferSizeError] The buffer does not match provided size"
                )
            }
            TesseraError::CropBoundsError => {
                write!(
                    f,
                    "[tessera::CropBoundsError] Cropping coordinates out of bounds."
                )
            }
            TesseraError::ConfigError(message) => {
                write!(f, "[tessera::ConfigError] Invalid configuration. {}.", message)
            }
            TesseraError::ImageError(message) => {
                write!(f, "[tessera::ImageError] Failed to create image. {}", message)
            }
            TesseraError::ImageReadError => {
                write!(f, "[tessera::ImageReadError] Failed to read image.")
            }
            TesseraError::ImageWriteError => {
                write!(f, "[tessera::ImageWriteError] Failed to write image.")
            }
            TesseraError::ImageExtensionError => {
                write!(
                    f,
                    "[tessera::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            TesseraError::LabelsReadError(message) => {
                write!(
                    f,
                    "[tessera::LabelsReadError] Labels could not be read. {}",
                    message
                )
            }
            TesseraError::LabelsWriteError => {
                write!(
                    f,
                    "[tessera::LabelsWriteError] Failed to successfully write patch labels to output."
                )
            }
            TesseraError::ManifestWriteError => {
                write!(
                    f,
                    "[tessera::ManifestWriteError] Failed to successfully write canvas manifest to output."
                )
            }
            TesseraError::MissingLabelsError(message) => {
                write!(
                    f,
                    "[tessera::MissingLabelsError] No labels for this image, refusing to split. {}.",
                    message
                )
            }
            TesseraError::LayoutError(message) => {
                write!(
                    f,
                    "[tessera::LayoutError] Path does not follow the dataset layout. {}.",
                    message
                )
            }
            TesseraError::NoFileError(message) => {
                write!(
                    f,
                    "[tessera::NoFileError] File could not be found. {}.",
                    message
                )
            }
            TesseraError::DirError(message) => {
                write!(
                    f,
                    "[tessera::DirError] Directory could not be read or created. {}.",
                    message
                )
            }
            TesseraError::OtherError(message) => {
                write!(f, "[tessera::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for TesseraError {}
