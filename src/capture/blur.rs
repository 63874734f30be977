//! Box blur used to soften the captured screen
//!
//! Three box passes with shrinking radii approximate a Gaussian blur. Each
//! pass averages every colour channel over a square neighbourhood clipped at
//! the image bounds. The square is separable, so a pass runs as a horizontal
//! window sum followed by a vertical one and divides once at the end.

use image::{Rgba, RgbaImage};

/// Radius used when none is configured
pub const DEFAULT_BLUR_RADIUS: u32 = 15;

/// Per-pass radii for a given overall blur radius
pub fn pass_radii(radius: u32) -> [u32; 3] {
    [radius / 2, radius / 3, radius / 6]
}

/// Apply the three-pass approximation of a Gaussian blur
pub fn gaussian_approx(source: &RgbaImage, radius: u32) -> RgbaImage {
    pass_radii(radius)
        .into_iter()
        .fold(source.clone(), |image, r| box_blur(&image, r))
}

/// A single box blur pass; output alpha is opaque
pub fn box_blur(source: &RgbaImage, radius: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    if radius == 0 || width == 0 || height == 0 {
        return source.clone();
    }

    let w = width as usize;
    let h = height as usize;
    let r = radius as usize;
    let raw = source.as_raw();

    // Horizontal sums per pixel and channel; the column count of a clipped
    // window depends only on x.
    let mut row_sums = vec![0u32; w * h * 3];
    let mut col_counts = vec![0u32; w];
    for (x, count) in col_counts.iter_mut().enumerate() {
        *count = (window(x, r, w).len()) as u32;
    }

    for y in 0..h {
        let row = &raw[y * w * 4..(y + 1) * w * 4];
        let mut acc = [0u32; 3];
        // Prime the window with columns [0, r)
        for x in 0..r.min(w) {
            for c in 0..3 {
                acc[c] += row[x * 4 + c] as u32;
            }
        }
        for x in 0..w {
            let entering = x + r;
            if entering < w {
                for c in 0..3 {
                    acc[c] += row[entering * 4 + c] as u32;
                }
            }
            if x > r {
                let leaving = x - r - 1;
                for c in 0..3 {
                    acc[c] -= row[leaving * 4 + c] as u32;
                }
            }
            let out = (y * w + x) * 3;
            row_sums[out..out + 3].copy_from_slice(&acc);
        }
    }

    let mut result = RgbaImage::new(width, height);
    for x in 0..w {
        let mut acc = [0u64; 3];
        for y in 0..r.min(h) {
            let idx = (y * w + x) * 3;
            for c in 0..3 {
                acc[c] += row_sums[idx + c] as u64;
            }
        }
        for y in 0..h {
            let entering = y + r;
            if entering < h {
                let idx = (entering * w + x) * 3;
                for c in 0..3 {
                    acc[c] += row_sums[idx + c] as u64;
                }
            }
            if y > r {
                let idx = ((y - r - 1) * w + x) * 3;
                for c in 0..3 {
                    acc[c] -= row_sums[idx + c] as u64;
                }
            }

            let count = col_counts[x] as u64 * window(y, r, h).len() as u64;
            result.put_pixel(
                x as u32,
                y as u32,
                Rgba([
                    (acc[0] / count) as u8,
                    (acc[1] / count) as u8,
                    (acc[2] / count) as u8,
                    255,
                ]),
            );
        }
    }

    result
}

/// Indices covered by a window of `radius` around `center`, clipped to `len`
fn window(center: usize, radius: usize, len: usize) -> std::ops::Range<usize> {
    center.saturating_sub(radius)..(center + radius + 1).min(len)
}
