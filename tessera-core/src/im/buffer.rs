// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::error::TesseraError;

/// A row-major container storing an image buffer or grid of pixels.
///
/// The struct is generic over the subpixel type `T`. The length of the
/// underlying vector must be equal to the product of `w` * `h` * `c`.
///
/// # Examples
///
/// ```
/// use tessera_core::im::TesseraBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 3; // RGB
/// let data = vec![0u8; (width * height * channels) as usize];
///
/// let buffer = TesseraBuffer::new(width, height, channels, data);
///
/// assert_eq!(buffer.unwrap().len(), (width * height * channels) as usize);
/// ```
///
/// ```
/// use tessera_core::im::TesseraBuffer;
///
/// let data = vec![0u8; 7];
/// let buffer = TesseraBuffer::new(2, 2, 1, data);
///
/// assert!(buffer.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TesseraBuffer<T> {
    w: u32,         // Width
    h: u32,         // Height
    c: u32,         // Channels
    buffer: Vec<T>, // Subpixels
}

impl<T> TesseraBuffer<T>
where
    T: Copy,
{
    /// Initializes a buffer from a vector of subpixels
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Number of image channels (e.g. 1 for grayscale)
    /// * `buffer` - Row-major subpixels
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        buffer: Vec<T>,
    ) -> Result<TesseraBuffer<T>, TesseraError> {
        if (width as usize) * (height as usize) * (channels as usize) == buffer.len() {
            Ok(TesseraBuffer {
                w: width,
                h: height,
                c: channels,
                buffer,
            })
        } else {
            Err(TesseraError::BufferSizeError)
        }
    }
}

// >>> PROPERTY METHODS

impl<T> TesseraBuffer<T>
where
    T: Copy,
{
    /// Width of the image
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the image
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of channels in the image
    pub fn channels(&self) -> u32 {
        self.c
    }

    /// Shape/dimensions of the image
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.h, self.w, self.c)
    }

    /// Length of the raw image
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T> TesseraBuffer<T>
where
    T: Copy,
{
    /// Returns the raw image
    pub fn into_raw(self) -> Vec<T> {
        self.buffer
    }

    /// Returns a reference to the raw image
    pub fn as_raw(&self) -> &Vec<T> {
        &self.buffer
    }

    /// Subpixel values of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        let c = self.c as usize;
        let start = ((y as usize) * (self.w as usize) + (x as usize)) * c;
        &self.buffer[start..start + c]
    }
}

// <<< CONVERSION METHODS

// >>> TRANSFORM METHODS

impl<T> TesseraBuffer<T>
where
    T: Copy,
{
    /// Create a new buffer with copied cropped contents
    ///
    /// # Arguments
    ///
    /// * `x` - Minimum x-coordinate (left)
    /// * `y` - Minimum y-coordinate (top)
    /// * `w` - Width of crop
    /// * `h` - Height of crop
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<TesseraBuffer<T>, TesseraError> {
        if x as u64 + w as u64 > self.w as u64 || y as u64 + h as u64 > self.h as u64 {
            return Err(TesseraError::CropBoundsError);
        }

        let c = self.c as usize;
        let orig_w = self.w as usize;

        let mut new_buffer = Vec::with_capacity((w as usize) * (h as usize) * c);

        for row in y..y + h {
            let start = ((row as usize) * orig_w + (x as usize)) * c;
            let end = start + (w as usize) * c;
            new_buffer.extend_from_slice(&self.buffer[start..end]);
        }

        Ok(TesseraBuffer {
            w,
            h,
            c: self.c,
            buffer: new_buffer,
        })
    }

    /// Extend the buffer on the bottom and right edges with a constant
    ///
    /// The top-left origin is preserved so pixel (x, y) of the source is
    /// pixel (x, y) of the padded buffer.
    ///
    /// # Arguments
    ///
    /// * `bottom` - Number of rows appended below the image
    /// * `right` - Number of columns appended right of the image
    /// * `fill` - Value written to every channel of the new pixels
    pub fn pad(&self, bottom: u32, right: u32, fill: T) -> TesseraBuffer<T> {
        let c = self.c as usize;
        let w = self.w + right;
        let h = self.h + bottom;

        let mut new_buffer = Vec::with_capacity((w as usize) * (h as usize) * c);

        let row_len = (self.w as usize) * c;

        for row in 0..self.h as usize {
            new_buffer.extend_from_slice(&self.buffer[row * row_len..(row + 1) * row_len]);
            new_buffer.extend(std::iter::repeat_n(fill, (right as usize) * c));
        }

        new_buffer.extend(std::iter::repeat_n(
            fill,
            (bottom as usize) * (w as usize) * c,
        ));

        TesseraBuffer {
            w,
            h,
            c: self.c,
            buffer: new_buffer,
        }
    }
}

// <<< TRANSFORM METHODS

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_buffer_new_success() {
        let buffer = TesseraBuffer::new(1, 3, 2, vec![1, 2, 3, 4, 5, 6]);
        assert!(buffer.is_ok());
    }

    #[test]
    fn test_buffer_new_error() {
        let buffer = TesseraBuffer::new(2, 3, 2, vec![1, 2, 3, 4, 5, 6]);
        assert!(buffer.is_err());
    }

    #[test]
    fn test_buffer_shape() {
        let buffer = TesseraBuffer::new(1, 3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(buffer.shape(), (3, 1, 2));
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_buffer_crop() {
        // 3x3 grayscale
        let buffer = TesseraBuffer::new(3, 3, 1, vec![0u8, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let crop = buffer.crop(1, 1, 2, 2).unwrap();
        assert_eq!(crop.shape(), (2, 2, 1));
        assert_eq!(crop.into_raw(), vec![4, 5, 7, 8]);
    }

    #[test]
    fn test_buffer_crop_multichannel() {
        let buffer = TesseraBuffer::new(2, 1, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();

        let crop = buffer.crop(1, 0, 1, 1).unwrap();
        assert_eq!(crop.into_raw(), vec![4, 5, 6]);
    }

    #[test]
    fn test_buffer_crop_out_of_bounds() {
        let buffer = TesseraBuffer::new(3, 3, 1, vec![0u8; 9]).unwrap();
        assert!(buffer.crop(2, 0, 2, 2).is_err());
        assert!(buffer.crop(0, 2, 1, 2).is_err());
    }

    #[test]
    fn test_buffer_pad() {
        let buffer = TesseraBuffer::new(2, 2, 1, vec![5u8, 6, 7, 8]).unwrap();

        let padded = buffer.pad(1, 2, 1);
        assert_eq!(padded.shape(), (3, 4, 1));
        assert_eq!(
            padded.into_raw(),
            vec![5, 6, 1, 1, 7, 8, 1, 1, 1, 1, 1, 1]
        );
    }

    #[test]
    fn test_buffer_pad_multichannel() {
        let buffer = TesseraBuffer::new(1, 1, 3, vec![9u16, 9, 9]).unwrap();

        let padded = buffer.pad(1, 1, 0);
        assert_eq!(padded.shape(), (2, 2, 3));
        assert_eq!(padded.pixel(0, 0), &[9, 9, 9]);
        assert_eq!(padded.pixel(1, 0), &[0, 0, 0]);
        assert_eq!(padded.pixel(1, 1), &[0, 0, 0]);
    }

    #[test]
    fn test_buffer_non_numeric_subpixels() {
        let buffer = TesseraBuffer::new(2, 2, 1, vec![true, false, false, true]).unwrap();

        let padded = buffer.pad(1, 0, false);
        assert_eq!(padded.into_raw(), vec![true, false, false, true, false, false]);
        assert_eq!(buffer.crop(1, 1, 1, 1).unwrap().into_raw(), vec![true]);
    }

    #[test]
    fn test_buffer_pad_zero() {
        let buffer = TesseraBuffer::new(2, 1, 1, vec![3u8, 4]).unwrap();
        assert_eq!(buffer.pad(0, 0, 1), buffer);
    }
}
