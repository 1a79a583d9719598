// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, Rgb, RgbImage, open as open_dynamic};
use num::FromPrimitive;

use crate::constant;
use crate::error::TesseraError;
use crate::im::TesseraBuffer;
use crate::impl_enum_dispatch;

/// A wrapper for representing and storing array-shaped pixels
///
/// The enum holds the subpixel types produced by decoding common raster
/// formats. All external image types (e.g `DynamicImage`) should be
/// converted to a TesseraImage via a method on this enum.
///
/// # Examples
///
/// ```
/// use image::{RgbImage, DynamicImage};
/// use tessera_core::im::TesseraImage;
///
/// let rgb = RgbImage::new(10, 10);
/// let dynamic = DynamicImage::ImageRgb8(rgb);
/// let image = TesseraImage::new_from_default(dynamic).unwrap();
///
/// assert_eq!(image.shape(), (10, 10, 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TesseraImage {
    U8(TesseraBuffer<u8>),
    U16(TesseraBuffer<u16>),
    F32(TesseraBuffer<f32>),
}

// >>> I/O METHODS

impl TesseraImage {
    /// Open a new image from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use tessera_core::im::TesseraImage;
    /// let image = TesseraImage::open("image.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<TesseraImage, TesseraError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if constant::SUPPORTED_IMAGE_FORMATS.iter().any(|e| e == &ext) {
                if let Ok(image) = open_dynamic(&path) {
                    return Self::new_from_default(image);
                }

                return Err(TesseraError::ImageReadError);
            }
        }

        Err(TesseraError::ImageExtensionError)
    }

    /// Initialize a new image from a DynamicImage
    ///
    /// Alpha channels are dropped since patches are written as grayscale or
    /// rgb rasters.
    ///
    /// # Arguments
    ///
    /// * `image` - An 8 or 16-bit or f32 grayscale or rgb DynamicImage
    pub fn new_from_default(image: DynamicImage) -> Result<TesseraImage, TesseraError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => Ok(TesseraImage::U8(TesseraBuffer::new(
                width,
                height,
                1,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA8(buffer) => Ok(TesseraImage::U8(TesseraBuffer::new(
                width,
                height,
                1,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            )?)),
            DynamicImage::ImageLuma16(buffer) => Ok(TesseraImage::U16(TesseraBuffer::new(
                width,
                height,
                1,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA16(buffer) => Ok(TesseraImage::U16(TesseraBuffer::new(
                width,
                height,
                1,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb8(buffer) => Ok(TesseraImage::U8(TesseraBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba8(buffer) => Ok(TesseraImage::U8(TesseraBuffer::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb16(buffer) => Ok(TesseraImage::U16(TesseraBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba16(buffer) => Ok(TesseraImage::U16(TesseraBuffer::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb32F(buffer) => Ok(TesseraImage::F32(TesseraBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba32F(buffer) => Ok(TesseraImage::F32(TesseraBuffer::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?)),
            _ => Err(TesseraError::ImageError(
                "A dynamic image with a valid data type was not detected.",
            )),
        }
    }

    /// Save image
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use tessera_core::im::TesseraImage;
    /// let image = TesseraImage::open("image.png").unwrap();
    /// image.save("image.jpg").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TesseraError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if constant::SUPPORTED_IMAGE_FORMATS.iter().any(|e| e == &ext) {
                return self
                    .to_encodable(&ext)?
                    .save(path)
                    .map_err(|_| TesseraError::ImageWriteError);
            }
        }

        Err(TesseraError::ImageExtensionError)
    }

    /// Convert to a bit depth the encoder for `ext` accepts
    fn to_encodable(&self, ext: &str) -> Result<DynamicImage, TesseraError> {
        let dynamic = self.to_dynamic()?;

        match (ext, self) {
            ("exr", _) => Ok(DynamicImage::ImageRgb32F(dynamic.to_rgb32f())),
            ("tif" | "tiff", _) => Ok(dynamic),
            ("png", TesseraImage::F32(_)) => Ok(DynamicImage::ImageRgb16(dynamic.to_rgb16())),
            ("png", _) => Ok(dynamic),
            (_, TesseraImage::U8(_)) => Ok(dynamic),
            _ if self.channels() == 1 => Ok(DynamicImage::ImageLuma8(dynamic.to_luma8())),
            _ => Ok(DynamicImage::ImageRgb8(dynamic.to_rgb8())),
        }
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl_enum_dispatch!(TesseraImage, U8, U16, F32; width(&self) -> u32);
impl_enum_dispatch!(TesseraImage, U8, U16, F32; height(&self) -> u32);
impl_enum_dispatch!(TesseraImage, U8, U16, F32; channels(&self) -> u32);
impl_enum_dispatch!(TesseraImage, U8, U16, F32; shape(&self) -> (u32, u32, u32));
impl_enum_dispatch!(TesseraImage, U8, U16, F32; len(&self) -> usize);
impl_enum_dispatch!(TesseraImage, U8, U16, F32; is_empty(&self) -> bool);

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl TesseraImage {
    /// Convert to a DynamicImage for encoding
    ///
    /// Single channel f32 images are expanded to rgb since image-rs has no
    /// grayscale f32 representation.
    pub fn to_dynamic(&self) -> Result<DynamicImage, TesseraError> {
        let channels = self.channels();
        match (self, channels) {
            (TesseraImage::U8(buffer), 1) => ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(
                buffer.width(),
                buffer.height(),
                buffer.as_raw().to_vec(),
            )
            .map(DynamicImage::ImageLuma8)
            .ok_or(TesseraError::BufferSizeError),
            (TesseraImage::U8(buffer), 3) => ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
                buffer.width(),
                buffer.height(),
                buffer.as_raw().to_vec(),
            )
            .map(DynamicImage::ImageRgb8)
            .ok_or(TesseraError::BufferSizeError),
            (TesseraImage::U16(buffer), 1) => ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(
                buffer.width(),
                buffer.height(),
                buffer.as_raw().to_vec(),
            )
            .map(DynamicImage::ImageLuma16)
            .ok_or(TesseraError::BufferSizeError),
            (TesseraImage::U16(buffer), 3) => ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(
                buffer.width(),
                buffer.height(),
                buffer.as_raw().to_vec(),
            )
            .map(DynamicImage::ImageRgb16)
            .ok_or(TesseraError::BufferSizeError),
            (TesseraImage::F32(buffer), 1) => ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(
                buffer.width(),
                buffer.height(),
                buffer.as_raw().iter().flat_map(|&v| [v, v, v]).collect(),
            )
            .map(DynamicImage::ImageRgb32F)
            .ok_or(TesseraError::BufferSizeError),
            (TesseraImage::F32(buffer), 3) => ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(
                buffer.width(),
                buffer.height(),
                buffer.as_raw().to_vec(),
            )
            .map(DynamicImage::ImageRgb32F)
            .ok_or(TesseraError::BufferSizeError),
            _ => Err(TesseraError::ImageError(
                "Only 1 or 3 channel RGB/grayscale images can be converted to a default image format (e.g. png).",
            )),
        }
    }

    /// Convert to an 8-bit rgb image, e.g. for drawing overlays
    pub fn to_rgb8(&self) -> Result<RgbImage, TesseraError> {
        Ok(self.to_dynamic()?.to_rgb8())
    }
}

// <<< CONVERSION METHODS

// >>> TRANSFORM METHODS

impl TesseraImage {
    /// Create a new image with copied cropped contents
    ///
    /// # Arguments
    ///
    /// * `x` - Minimum x-coordinate (left)
    /// * `y` - Minimum y-coordinate (top)
    /// * `w` - Width of crop
    /// * `h` - Height of crop
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<TesseraImage, TesseraError> {
        match self {
            TesseraImage::U8(buffer) => Ok(TesseraImage::U8(buffer.crop(x, y, w, h)?)),
            TesseraImage::U16(buffer) => Ok(TesseraImage::U16(buffer.crop(x, y, w, h)?)),
            TesseraImage::F32(buffer) => Ok(TesseraImage::F32(buffer.crop(x, y, w, h)?)),
        }
    }

    /// Extend the image on the bottom and right edges with a constant
    ///
    /// # Arguments
    ///
    /// * `bottom` - Number of rows appended below the image
    /// * `right` - Number of columns appended right of the image
    /// * `fill` - Value written to every channel, must fit the subpixel type
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{GrayImage, DynamicImage};
    /// use tessera_core::im::TesseraImage;
    ///
    /// let gray = DynamicImage::ImageLuma8(GrayImage::new(3, 2));
    /// let image = TesseraImage::new_from_default(gray).unwrap();
    /// let padded = image.pad(1, 2, 1.0).unwrap();
    ///
    /// assert_eq!(padded.shape(), (3, 5, 1));
    /// assert!(image.pad(1, 1, 256.0).is_err());
    /// ```
    pub fn pad(&self, bottom: u32, right: u32, fill: f64) -> Result<TesseraImage, TesseraError> {
        let invalid = || {
            TesseraError::ConfigError(format!(
                "Fill value {} does not fit the image data type",
                fill
            ))
        };

        match self {
            TesseraImage::U8(buffer) => Ok(TesseraImage::U8(buffer.pad(
                bottom,
                right,
                u8::from_f64(fill).ok_or_else(invalid)?,
            ))),
            TesseraImage::U16(buffer) => Ok(TesseraImage::U16(buffer.pad(
                bottom,
                right,
                u16::from_f64(fill).ok_or_else(invalid)?,
            ))),
            TesseraImage::F32(buffer) => Ok(TesseraImage::F32(buffer.pad(
                bottom,
                right,
                f32::from_f64(fill).ok_or_else(invalid)?,
            ))),
        }
    }
}

// <<< TRANSFORM METHODS
