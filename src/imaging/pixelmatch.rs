//! Perceptual pixel difference counting
//!
//! Port of the pixelmatch algorithm: colours are compared in YIQ space after
//! blending over white, and a differing pixel that looks like an anti-aliased
//! edge in either image is not counted unless `include_aa` is set.
//!
//! Reference: Kotsarenko & Ramos, "Measuring perceived color difference using
//! YIQ NTSC transmission color space in mobile applications" (2010), and
//! Vysniauskas, "Anti-aliased Pixel and Intensity Slope Detector" (2009).

use crate::errors::{MatchError, MatchResultOf};

use super::RasterBuffer;

/// Largest possible YIQ delta between two colours
const MAX_YIQ_DELTA: f64 = 35215.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    /// Matching threshold in `0..1`; smaller values are more sensitive
    pub threshold: f64,
    /// Count anti-aliased pixels as different
    pub include_aa: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            include_aa: false,
        }
    }
}

/// Count the pixels that differ perceptually between two rasters
pub fn compare(a: &RasterBuffer, b: &RasterBuffer, options: &CompareOptions) -> MatchResultOf<usize> {
    if a.as_bytes().len() != b.as_bytes().len() {
        return Err(MatchError::Comparison {
            expected: a.as_bytes().len(),
            actual: b.as_bytes().len(),
        });
    }
    let size = a.size() as usize;
    Ok(count_different_pixels(
        a.as_bytes(),
        b.as_bytes(),
        size,
        size,
        options,
    ))
}

fn count_different_pixels(
    img1: &[u8],
    img2: &[u8],
    width: usize,
    height: usize,
    options: &CompareOptions,
) -> usize {
    if img1 == img2 {
        return 0;
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;
    let mut diff = 0;

    for y in 0..height {
        for x in 0..width {
            let pos = (y * width + x) * 4;
            let delta = color_delta(img1, img2, pos, pos, false);

            if delta.abs() > max_delta {
                let anti_aliased = !options.include_aa
                    && (antialiased(img1, x, y, width, height, img2)
                        || antialiased(img2, x, y, width, height, img1));
                if !anti_aliased {
                    diff += 1;
                }
            }
        }
    }

    diff
}

/// Whether the pixel at (x1, y1) of `img` sits on an anti-aliased edge
fn antialiased(img: &[u8], x1: usize, y1: usize, width: usize, height: usize, img2: &[u8]) -> bool {
    let x0 = x1.saturating_sub(1);
    let y0 = y1.saturating_sub(1);
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let pos = (y1 * width + x1) * 4;

    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);
    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_at = (0, 0);
    let mut max_at = (0, 0);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }

            let delta = color_delta(img, img, pos, (y * width + x) * 4, true);

            if delta == 0.0 {
                zeroes += 1;
                // More than two identical siblings means a flat area, not an edge
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = (x, y);
            } else if delta > max {
                max = delta;
                max_at = (x, y);
            }
        }
    }

    // An edge needs both a darker and a brighter neighbour
    if min == 0.0 || max == 0.0 {
        return false;
    }

    (has_many_siblings(img, min_at.0, min_at.1, width, height)
        && has_many_siblings(img2, min_at.0, min_at.1, width, height))
        || (has_many_siblings(img, max_at.0, max_at.1, width, height)
            && has_many_siblings(img2, max_at.0, max_at.1, width, height))
}

/// Whether the pixel has more than two neighbours of exactly the same colour
fn has_many_siblings(img: &[u8], x1: usize, y1: usize, width: usize, height: usize) -> bool {
    let x0 = x1.saturating_sub(1);
    let y0 = y1.saturating_sub(1);
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let pos = (y1 * width + x1) * 4;

    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }

            let pos2 = (y * width + x) * 4;
            if img[pos..pos + 4] == img[pos2..pos2 + 4] {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }

    false
}

/// Squared YIQ distance between two pixels, negative when the first is lighter
///
/// With `y_only` only the brightness difference is returned.
fn color_delta(img1: &[u8], img2: &[u8], k: usize, m: usize, y_only: bool) -> f64 {
    let (r1, g1, b1, a1) = (img1[k], img1[k + 1], img1[k + 2], img1[k + 3]);
    let (r2, g2, b2, a2) = (img2[m], img2[m + 1], img2[m + 2], img2[m + 3]);

    if a1 == a2 && r1 == r2 && g1 == g2 && b1 == b2 {
        return 0.0;
    }

    let (r1, g1, b1) = blend_over_white(r1, g1, b1, a1);
    let (r2, g2, b2) = blend_over_white(r2, g2, b2, a2);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;

    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;

    if y1 > y2 { -delta } else { delta }
}

fn blend_over_white(r: u8, g: u8, b: u8, a: u8) -> (f64, f64, f64) {
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    if a < 255 {
        let alpha = f64::from(a) / 255.0;
        (blend(r, alpha), blend(g, alpha), blend(b, alpha))
    } else {
        (r, g, b)
    }
}

fn blend(c: f64, alpha: f64) -> f64 {
    255.0 + (c - 255.0) * alpha
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn set_pixel(raster: RasterBuffer, x: usize, y: usize, rgba: [u8; 4]) -> RasterBuffer {
        let size = raster.size();
        let mut data = raster.into_bytes();
        let pos = (y * size as usize + x) * 4;
        data[pos..pos + 4].copy_from_slice(&rgba);
        RasterBuffer::from_rgba(size, data).unwrap()
    }

    #[test]
    fn test_identical_rasters_have_no_difference() {
        let a = RasterBuffer::filled(28, [12, 34, 56, 255]);
        assert_eq!(compare(&a, &a.clone(), &CompareOptions::default()).unwrap(), 0);
    }

    #[test]
    fn test_completely_different_rasters() {
        let white = RasterBuffer::filled(28, WHITE);
        let black = RasterBuffer::filled(28, BLACK);
        assert_eq!(
            compare(&white, &black, &CompareOptions::default()).unwrap(),
            28 * 28
        );
    }

    #[test]
    fn test_single_isolated_pixel_is_counted() {
        let white = RasterBuffer::filled(8, WHITE);
        let dotted = set_pixel(white.clone(), 4, 4, BLACK);
        assert_eq!(compare(&white, &dotted, &CompareOptions::default()).unwrap(), 1);
    }

    #[test]
    fn test_small_colour_shift_is_below_threshold() {
        let a = RasterBuffer::filled(8, [100, 100, 100, 255]);
        let b = RasterBuffer::filled(8, [102, 101, 100, 255]);
        assert_eq!(compare(&a, &b, &CompareOptions::default()).unwrap(), 0);

        let strict = CompareOptions {
            threshold: 0.001,
            include_aa: false,
        };
        assert_eq!(compare(&a, &b, &strict).unwrap(), 64);
    }

    #[test]
    fn test_transparent_pixels_blend_over_white() {
        let transparent_black = RasterBuffer::filled(8, [0, 0, 0, 0]);
        let white = RasterBuffer::filled(8, WHITE);
        assert_eq!(
            compare(&transparent_black, &white, &CompareOptions::default()).unwrap(),
            0
        );
    }

    /// Builds a black left half, white right half, and a grey column between
    fn edge(size: u32, grey: u8) -> RasterBuffer {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for _y in 0..size {
            for x in 0..size {
                let px = match x.cmp(&(size / 2)) {
                    std::cmp::Ordering::Less => BLACK,
                    std::cmp::Ordering::Equal => [grey, grey, grey, 255],
                    std::cmp::Ordering::Greater => WHITE,
                };
                data.extend_from_slice(&px);
            }
        }
        RasterBuffer::from_rgba(size, data).unwrap()
    }

    #[test]
    fn test_anti_aliased_edge_is_ignored_unless_included() {
        let soft = edge(8, 128);
        let softer = edge(8, 200);

        let ignore_aa = CompareOptions::default();
        assert_eq!(compare(&soft, &softer, &ignore_aa).unwrap(), 0);

        let include_aa = CompareOptions {
            threshold: 0.1,
            include_aa: true,
        };
        assert_eq!(compare(&soft, &softer, &include_aa).unwrap(), 8);
    }

    #[test]
    fn test_size_mismatch_is_a_comparison_error() {
        let a = RasterBuffer::filled(28, WHITE);
        let b = RasterBuffer::filled(27, WHITE);
        assert!(matches!(
            compare(&a, &b, &CompareOptions::default()),
            Err(MatchError::Comparison { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_count_is_bounded_and_reflexive(
            pixels_a in proptest::collection::vec(any::<u8>(), 8 * 8 * 4),
            pixels_b in proptest::collection::vec(any::<u8>(), 8 * 8 * 4),
        ) {
            let a = RasterBuffer::from_rgba(8, pixels_a).unwrap();
            let b = RasterBuffer::from_rgba(8, pixels_b).unwrap();
            let options = CompareOptions::default();

            prop_assert_eq!(compare(&a, &a, &options).unwrap(), 0);
            let count = compare(&a, &b, &options).unwrap();
            prop_assert!(count <= 64);
        }
    }
}
