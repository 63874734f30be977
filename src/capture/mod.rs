//! Screen Capture Layer
//!
//! Grabs the primary display once per break and blurs it for the overlay
//! background. Capture is read-only; a failure here only degrades the overlay
//! to a solid colour.

pub mod blur;
pub mod frame;

use image::RgbaImage;
use tracing::debug;

use crate::error::CaptureError;
use crate::capture::frame::CapturedFrame;

/// Source of primary display pixels
pub trait ScreenCapturer {
    /// Capture the primary display as an RGBA buffer of its reported size
    fn capture_primary(&self) -> Result<CapturedFrame, CaptureError>;
}

/// Captures the primary display through the OS
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryDisplayCapture;

impl ScreenCapturer for PrimaryDisplayCapture {
    fn capture_primary(&self) -> Result<CapturedFrame, CaptureError> {
        platform::capture_primary()
    }
}

/// Capture the primary display and blur it
pub fn capture_blurred(
    capturer: &dyn ScreenCapturer,
    radius: u32,
) -> Result<RgbaImage, CaptureError> {
    let frame = capturer.capture_primary()?;
    let (width, height) = frame.dimensions();
    debug!("Captured primary display at {}x{}", width, height);

    let captured_at = frame.timestamp;
    let image = frame.into_image()?;
    let blurred = blur::gaussian_approx(&image, radius);
    debug!("Blurred background ready in {:?}", captured_at.elapsed());
    Ok(blurred)
}

#[cfg(windows)]
mod platform {
    use std::ffi::c_void;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        DIB_RGB_COLORS, HGDIOBJ, SRCCOPY,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

    use crate::capture::frame::CapturedFrame;
    use crate::error::CaptureError;

    pub fn capture_primary() -> Result<CapturedFrame, CaptureError> {
        let (width, height) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        if width <= 0 || height <= 0 {
            return Err(CaptureError::InvalidDimensions { width, height });
        }

        unsafe {
            let screen_dc = GetDC(HWND::default());
            if screen_dc.is_invalid() {
                return Err(CaptureError::Os { call: "GetDC" });
            }

            let memory_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            let previous = SelectObject(memory_dc, HGDIOBJ(bitmap.0));

            let result = BitBlt(memory_dc, 0, 0, width, height, screen_dc, 0, 0, SRCCOPY)
                .map_err(|_| CaptureError::Os { call: "BitBlt" })
                .and_then(|_| read_pixels(memory_dc, bitmap, width, height));

            SelectObject(memory_dc, previous);
            let _ = DeleteObject(HGDIOBJ(bitmap.0));
            let _ = DeleteDC(memory_dc);
            ReleaseDC(HWND::default(), screen_dc);

            result
        }
    }

    unsafe fn read_pixels(
        dc: windows::Win32::Graphics::Gdi::HDC,
        bitmap: windows::Win32::Graphics::Gdi::HBITMAP,
        width: i32,
        height: i32,
    ) -> Result<CapturedFrame, CaptureError> {
        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                // Negative height asks for a top-down DIB
                biHeight: -height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut data = vec![0u8; width as usize * height as usize * 4];
        let lines = GetDIBits(
            dc,
            bitmap,
            0,
            height as u32,
            Some(data.as_mut_ptr() as *mut c_void),
            &mut info,
            DIB_RGB_COLORS,
        );
        if lines != height {
            return Err(CaptureError::Os { call: "GetDIBits" });
        }

        Ok(CapturedFrame::from_bgra(data, width as u32, height as u32))
    }
}

#[cfg(not(windows))]
mod platform {
    use crate::capture::frame::CapturedFrame;
    use crate::error::CaptureError;

    pub fn capture_primary() -> Result<CapturedFrame, CaptureError> {
        Err(CaptureError::Unsupported)
    }
}
