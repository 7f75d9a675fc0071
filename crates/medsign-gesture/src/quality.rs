use image::DynamicImage;
use medsign_base::Tensor;
use serde::{Deserialize, Serialize};

use crate::GestureError;

/// Default quality floor below which frames are not classified.
pub const DEFAULT_QUALITY_FLOOR: f64 = 0.3;

/// Image-level quality of one camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameQuality {
    /// Variance of the Laplacian; higher is sharper.
    pub blur_score: f64,
    /// Mean luma in [0, 255].
    pub brightness: f64,
    /// Standard deviation of luma.
    pub contrast: f64,
    /// Combined score in [0, 1].
    pub overall_quality: f64,
}

impl FrameQuality {
    /// Combine the three raw measurements into a quality record.
    pub fn from_measurements(blur_score: f64, brightness: f64, contrast: f64) -> Self {
        let exposure = 1.0 - (brightness - 127.0).abs() / 127.0;
        let overall = (blur_score / 100.0) * (contrast / 50.0) * exposure;
        Self {
            blur_score,
            brightness,
            contrast,
            overall_quality: overall.clamp(0.0, 1.0),
        }
    }

    /// A record carrying only an externally computed overall score.
    pub fn from_overall(overall_quality: f64) -> Self {
        Self {
            blur_score: 0.0,
            brightness: 0.0,
            contrast: 0.0,
            overall_quality: overall_quality.clamp(0.0, 1.0),
        }
    }

    /// Assess an HWC `u8` image with 1 (luma), 3 (RGB) or 4 (RGBA) channels.
    pub fn assess(image: &Tensor<u8>) -> Result<Self, GestureError> {
        let (luma, height, width) = to_luma(image)?;

        let (brightness, contrast) = mean_and_std(luma.iter().copied());
        let blur = laplacian_variance(&luma, width, height);

        Ok(Self::from_measurements(blur, brightness, contrast))
    }

    /// Assess a decoded image from the `image` crate.
    pub fn from_image(image: &DynamicImage) -> Result<Self, GestureError> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        let tensor = Tensor::new(vec![height as usize, width as usize, 1], gray.into_raw())?;
        Self::assess(&tensor)
    }

    pub fn is_acceptable(&self, floor: f64) -> bool {
        self.overall_quality >= floor
    }
}

/// Luma plane plus `(height, width)`.
fn to_luma(image: &Tensor<u8>) -> Result<(Vec<f64>, usize, usize), GestureError> {
    let (height, width, channels) = image
        .hwc()
        .ok_or_else(|| GestureError::InvalidImage(format!("expected [H, W, C], got {:?}", image.shape)))?;
    if height == 0 || width == 0 {
        return Err(GestureError::InvalidImage("empty image".to_string()));
    }

    if !matches!(channels, 1 | 3 | 4) {
        return Err(GestureError::InvalidImage(format!(
            "unsupported channel count {channels}"
        )));
    }
    if image.data.len() != height * width * channels {
        return Err(GestureError::InvalidImage(format!(
            "{} values for shape {:?}",
            image.data.len(),
            image.shape
        )));
    }

    let mut luma = Vec::with_capacity(height * width);
    for r in 0..height {
        for c in 0..width {
            let px = |ch: usize| image.at(r, c, ch) as f64;
            luma.push(if channels == 1 {
                px(0)
            } else {
                0.299 * px(0) + 0.587 * px(1) + 0.114 * px(2)
            });
        }
    }
    Ok((luma, height, width))
}

fn mean_and_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let var = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    (mean, var.sqrt())
}

/// Variance of the 4-neighbour Laplacian over interior pixels.
fn laplacian_variance(luma: &[f64], width: usize, height: usize) -> f64 {
    if width < 3 || height < 3 {
        return 0.0;
    }
    let at = |r: usize, c: usize| luma[r * width + c];
    let mut responses = Vec::with_capacity((width - 2) * (height - 2));
    for r in 1..height - 1 {
        for c in 1..width - 1 {
            responses.push(
                at(r - 1, c) + at(r + 1, c) + at(r, c - 1) + at(r, c + 1) - 4.0 * at(r, c),
            );
        }
    }
    mean_and_std(responses.into_iter()).1.powi(2)
}
