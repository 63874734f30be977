//! Frame data structures for captured screen content

use image::RgbaImage;
use std::time::Instant;

use crate::error::CaptureError;

/// A captured frame from the primary display
#[derive(Debug)]
pub struct CapturedFrame {
    /// Raw RGBA pixel data, row-major, no padding
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Create a new captured frame
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// Build a frame from a BGRA buffer as handed out by GDI
    pub fn from_bgra(mut data: Vec<u8>, width: u32, height: u32) -> Self {
        for pixel in data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
            pixel[3] = 255;
        }
        Self::new(data, width, height)
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Convert into an image buffer, checking the pixel count
    pub fn into_image(self) -> Result<RgbaImage, CaptureError> {
        let expected = self.width as usize * self.height as usize * 4;
        let actual = self.data.len();
        RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or(CaptureError::BufferSize { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bgra_swaps_channels() {
        let frame = CapturedFrame::from_bgra(vec![10, 20, 30, 0, 1, 2, 3, 4], 2, 1);

        assert_eq!(frame.data, vec![30, 20, 10, 255, 3, 2, 1, 255]);
        assert_eq!(frame.dimensions(), (2, 1));
    }

    #[test]
    fn test_into_image_rejects_short_buffer() {
        let frame = CapturedFrame::new(vec![0; 12], 2, 2);

        match frame.into_image() {
            Err(CaptureError::BufferSize { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
