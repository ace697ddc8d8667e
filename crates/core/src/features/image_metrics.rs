//! Pixel-level technical measurements for decoded image content.
//!
//! All measurements run on an 8-bit luma plane (plus the RGB planes for color
//! variance). Images whose longest side exceeds [`ANALYSIS_MAX_DIMENSION`]
//! are downscaled first so measurement cost stays bounded.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Largest accepted content payload.
pub const MAX_CONTENT_BYTES: usize = 50 * 1024 * 1024;

/// Longest side, in pixels, of the plane the metrics are computed on.
pub const ANALYSIS_MAX_DIMENSION: u32 = 1024;

/// Side length of the square blocks used for noise estimation.
const NOISE_BLOCK_SIZE: u32 = 5;

/// JPEG macroblock size.
const JPEG_BLOCK_SIZE: u32 = 8;

/// Boundary-to-interior gradient ratio above which JPEG blocking is reported.
const BLOCKINESS_RATIO_THRESHOLD: f64 = 1.5;

// ---------------------------------------------------------------------------
// Technical metrics
// ---------------------------------------------------------------------------

/// Named numeric signals describing the technical quality of the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalMetrics {
    pub width: u32,
    pub height: u32,
    pub total_pixels: u64,
    /// Laplacian variance of the luma plane. Higher is sharper.
    pub sharpness: f64,
    /// Standard deviation inside the smoothest blocks. Higher is noisier.
    pub noise_level: f64,
    /// Spread between the 1st and 99th luma percentiles, 0 to 255.
    pub dynamic_range: f64,
    /// Mean per-channel RGB variance.
    pub color_variance: f64,
    pub brightness_mean: f64,
    pub contrast_std: f64,
    pub compression_artifacts: bool,
    /// `false` when only declared dimensions were available.
    pub pixel_data_measured: bool,
}

impl TechnicalMetrics {
    /// All-zero metrics recorded when the content could not be read.
    pub fn degenerate() -> Self {
        Self {
            width: 0,
            height: 0,
            total_pixels: 0,
            sharpness: 0.0,
            noise_level: 0.0,
            dynamic_range: 0.0,
            color_variance: 0.0,
            brightness_mean: 0.0,
            contrast_std: 0.0,
            compression_artifacts: false,
            pixel_data_measured: false,
        }
    }

    /// Metrics for descriptor input: dimensions only, nothing measured.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            total_pixels: u64::from(width) * u64::from(height),
            ..Self::degenerate()
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// Decode `bytes` and measure every technical metric.
///
/// Fails with `CoreError::Extraction` for empty, oversized or undecodable
/// payloads. Callers turn that into a degenerate record.
pub fn measure(bytes: &[u8]) -> Result<TechnicalMetrics, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Extraction("content is empty".to_string()));
    }
    if bytes.len() > MAX_CONTENT_BYTES {
        return Err(CoreError::Extraction(format!(
            "content is {} bytes, limit is {MAX_CONTENT_BYTES}",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| CoreError::Extraction(format!("unrecognized image format: {e}")))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CoreError::Extraction(format!("could not decode image: {e}")))?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(CoreError::Extraction("image has no pixels".to_string()));
    }

    // Blocking is measured on the full-resolution plane; downscaling would
    // smear the 8x8 grid.
    let compression_artifacts = format == ImageFormat::Jpeg && {
        let full_luma = img.to_luma8();
        blockiness_ratio(&full_luma) > BLOCKINESS_RATIO_THRESHOLD
    };

    let analysis = downscale_for_analysis(img);
    let luma = analysis.to_luma8();
    let rgb = analysis.to_rgb8();
    let (brightness_mean, contrast_std) = mean_and_std(&luma);

    Ok(TechnicalMetrics {
        width,
        height,
        total_pixels: u64::from(width) * u64::from(height),
        sharpness: laplacian_variance(&luma),
        noise_level: noise_level(&luma),
        dynamic_range: dynamic_range(&luma),
        color_variance: color_variance(&rgb),
        brightness_mean,
        contrast_std,
        compression_artifacts,
        pixel_data_measured: true,
    })
}

fn downscale_for_analysis(img: DynamicImage) -> DynamicImage {
    if img.width().max(img.height()) <= ANALYSIS_MAX_DIMENSION {
        img
    } else {
        img.resize(
            ANALYSIS_MAX_DIMENSION,
            ANALYSIS_MAX_DIMENSION,
            FilterType::Triangle,
        )
    }
}

fn mean_and_std(img: &GrayImage) -> (f64, f64) {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for pixel in img.pixels() {
        let v = f64::from(pixel.0[0]);
        sum += v;
        sum_sq += v * v;
        count += 1;
    }

    if count == 0 {
        return (0.0, 0.0);
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64) - mean * mean;
    (mean, variance.max(0.0).sqrt())
}

/// Variance of the 3x3 Laplacian `[0,1,0; 1,-4,1; 0,1,0]` response.
pub fn laplacian_variance(img: &GrayImage) -> f64 {
    let (w, h) = (img.width(), img.height());
    if w < 3 || h < 3 {
        return 0.0;
    }

    let px = |x: u32, y: u32| f64::from(img.get_pixel(x, y).0[0]);
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let laplacian =
                px(x, y - 1) + px(x, y + 1) + px(x - 1, y) + px(x + 1, y) - 4.0 * px(x, y);
            sum += laplacian;
            sum_sq += laplacian * laplacian;
            count += 1;
        }
    }

    let mean = sum / count as f64;
    ((sum_sq / count as f64) - mean * mean).max(0.0)
}

/// Median standard deviation of the smoothest quarter of 5x5 blocks.
pub fn noise_level(img: &GrayImage) -> f64 {
    let (w, h) = (img.width(), img.height());
    if w < NOISE_BLOCK_SIZE || h < NOISE_BLOCK_SIZE {
        return 0.0;
    }

    let count = f64::from(NOISE_BLOCK_SIZE * NOISE_BLOCK_SIZE);
    let mut variances = Vec::new();

    let mut y = 0;
    while y + NOISE_BLOCK_SIZE <= h {
        let mut x = 0;
        while x + NOISE_BLOCK_SIZE <= w {
            let mut sum = 0.0f64;
            let mut sum_sq = 0.0f64;
            for by in 0..NOISE_BLOCK_SIZE {
                for bx in 0..NOISE_BLOCK_SIZE {
                    let v = f64::from(img.get_pixel(x + bx, y + by).0[0]);
                    sum += v;
                    sum_sq += v * v;
                }
            }
            let mean = sum / count;
            variances.push(((sum_sq / count) - mean * mean).max(0.0));
            x += NOISE_BLOCK_SIZE;
        }
        y += NOISE_BLOCK_SIZE;
    }

    variances.sort_by(f64::total_cmp);
    let quartile_end = (variances.len() / 4).max(1);
    let smooth = &variances[..quartile_end];
    smooth[smooth.len() / 2].sqrt()
}

/// Luma spread between the 1st and 99th percentiles.
pub fn dynamic_range(img: &GrayImage) -> f64 {
    let mut histogram = [0u64; 256];
    for pixel in img.pixels() {
        histogram[usize::from(pixel.0[0])] += 1;
    }
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let percentile = |fraction: f64| -> usize {
        let target = ((total as f64) * fraction).ceil().max(1.0) as u64;
        let mut cumulative = 0u64;
        for (level, count) in histogram.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                return level;
            }
        }
        255
    };

    (percentile(0.99) - percentile(0.01)) as f64
}

/// Mean of the R, G and B channel variances.
pub fn color_variance(img: &RgbImage) -> f64 {
    let mut sum = [0.0f64; 3];
    let mut sum_sq = [0.0f64; 3];
    let mut count = 0u64;

    for pixel in img.pixels() {
        for channel in 0..3 {
            let v = f64::from(pixel.0[channel]);
            sum[channel] += v;
            sum_sq[channel] += v * v;
        }
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }

    let n = count as f64;
    (0..3)
        .map(|c| {
            let mean = sum[c] / n;
            ((sum_sq[c] / n) - mean * mean).max(0.0)
        })
        .sum::<f64>()
        / 3.0
}

/// Ratio of mean horizontal gradient across 8-pixel block boundaries to the
/// mean gradient inside blocks. Values well above 1 indicate JPEG blocking.
pub fn blockiness_ratio(img: &GrayImage) -> f64 {
    let (w, h) = (img.width(), img.height());
    if w < 2 * JPEG_BLOCK_SIZE || h == 0 {
        return 0.0;
    }

    let mut boundary_sum = 0.0f64;
    let mut boundary_count = 0u64;
    let mut interior_sum = 0.0f64;
    let mut interior_count = 0u64;

    for y in 0..h {
        for x in 1..w {
            let diff = (f64::from(img.get_pixel(x, y).0[0])
                - f64::from(img.get_pixel(x - 1, y).0[0]))
            .abs();
            if x % JPEG_BLOCK_SIZE == 0 {
                boundary_sum += diff;
                boundary_count += 1;
            } else {
                interior_sum += diff;
                interior_count += 1;
            }
        }
    }

    let boundary = boundary_sum / boundary_count.max(1) as f64;
    let interior = interior_sum / interior_count.max(1) as f64;
    if interior == 0.0 {
        // A perfectly flat interior with edges only on the grid is blocking;
        // a perfectly flat image is not.
        return if boundary > 0.0 { f64::MAX } else { 0.0 };
    }
    boundary / interior
}
