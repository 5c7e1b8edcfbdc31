use super::{GrayscaleImage, TargetSize};

/// Free parameter `a` of the cubic convolution kernel
const CUBIC_COEFFICIENT: f64 = -0.5;
/// Kernel radius in source samples when not downscaling
const KERNEL_SUPPORT: f64 = 2.0;

/// Cubic convolution kernel (Keys), zero outside of `(-2, 2)`
pub fn cubic_kernel(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        ((CUBIC_COEFFICIENT + 2.0) * t - (CUBIC_COEFFICIENT + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        (((t - 5.0) * t + 8.0) * t - 4.0) * CUBIC_COEFFICIENT
    } else {
        0.0
    }
}

/// Round an interpolated value into the 8 bit sample range
pub fn clamp_to_sample(value: f64) -> u8 {
    value.round().clamp(0.0, u8::MAX as f64) as u8
}

/// Source taps and weights of every output sample along one axis.
///
/// Every output sample uses the same number of taps. Tap indices
/// outside of the source are clamped to the border, so reads never
/// leave the image.
pub struct AxisCoefficients {
    taps_per_sample: usize,
    indices: Vec<usize>,
    weights: Vec<f64>,
}

impl AxisCoefficients {
    pub fn new(source_length: u32, target_length: u32) -> Self {
        debug_assert!(source_length > 0 && target_length > 0);
        let scale = source_length as f64 / target_length as f64;
        // widen the kernel when downscaling so it also low-passes
        let filter_scale = scale.max(1.0);
        let radius = (KERNEL_SUPPORT * filter_scale).ceil() as i64;
        let taps_per_sample = 2 * radius as usize;
        let last_index = source_length as i64 - 1;
        let capacity = taps_per_sample * target_length as usize;
        let mut indices = Vec::with_capacity(capacity);
        let mut weights = Vec::with_capacity(capacity);
        for output_index in 0..target_length {
            let center = (output_index as f64 + 0.5) * scale - 0.5;
            let first_tap = center.floor() as i64 - radius + 1;
            let sample_weights = (0..taps_per_sample as i64)
                .map(|offset| {
                    let tap = first_tap + offset;
                    indices.push(tap.clamp(0, last_index) as usize);
                    cubic_kernel((tap as f64 - center) / filter_scale)
                })
                .collect::<Vec<f64>>();
            let sum: f64 = sample_weights.iter().sum();
            if sum != 0.0 {
                weights.extend(sample_weights.iter().map(|weight| weight / sum));
            } else {
                weights.extend(sample_weights);
            }
        }
        Self {
            taps_per_sample,
            indices,
            weights,
        }
    }

    pub fn taps_per_sample(&self) -> usize {
        self.taps_per_sample
    }

    pub fn weights_of(&self, output_index: usize) -> &[f64] {
        let start = output_index * self.taps_per_sample;
        &self.weights[start..start + self.taps_per_sample]
    }

    fn indices_of(&self, output_index: usize) -> &[usize] {
        let start = output_index * self.taps_per_sample;
        &self.indices[start..start + self.taps_per_sample]
    }

    /// Weighted sum of the taps of `output_index`, reading
    /// source samples through `value_at`
    fn interpolate(&self, output_index: usize, value_at: impl Fn(usize) -> f64) -> f64 {
        self.indices_of(output_index)
            .iter()
            .zip(self.weights_of(output_index))
            .fold(0.0, |acc, (&index, &weight)| acc + weight * value_at(index))
    }
}

/// Separable bicubic resampling between two fixed resolutions.
///
/// The coefficients are computed once and shared by all images
/// of a dataset.
pub struct BicubicResampler {
    source_width: u32,
    source_height: u32,
    target: TargetSize,
    horizontal: AxisCoefficients,
    vertical: AxisCoefficients,
}

impl BicubicResampler {
    pub fn new(source_width: u32, source_height: u32, target: TargetSize) -> Self {
        Self {
            source_width,
            source_height,
            target,
            horizontal: AxisCoefficients::new(source_width, target.width),
            vertical: AxisCoefficients::new(source_height, target.height),
        }
    }

    pub fn resample(&self, image: &GrayscaleImage) -> GrayscaleImage {
        debug_assert_eq!(image.width(), self.source_width);
        debug_assert_eq!(image.height(), self.source_height);
        let intermediate = self.resample_rows(image);
        let dots = self.resample_columns(&intermediate);
        GrayscaleImage::new(self.target.width, self.target.height, dots)
    }

    /// horizontal pass, keeps the source height
    fn resample_rows(&self, image: &GrayscaleImage) -> Vec<f64> {
        let target_width = self.target.width as usize;
        let mut intermediate = Vec::with_capacity(target_width * self.source_height as usize);
        for row in image.dots().chunks_exact(self.source_width as usize) {
            for column_index in 0..target_width {
                let value = self
                    .horizontal
                    .interpolate(column_index, |index| row[index] as f64);
                intermediate.push(value);
            }
        }
        intermediate
    }

    /// vertical pass over the horizontally resampled rows
    fn resample_columns(&self, intermediate: &[f64]) -> Vec<u8> {
        let target_width = self.target.width as usize;
        let target_height = self.target.height as usize;
        let mut dots = Vec::with_capacity(target_width * target_height);
        for row_index in 0..target_height {
            for column_index in 0..target_width {
                let value = self.vertical.interpolate(row_index, |index| {
                    intermediate[index * target_width + column_index]
                });
                dots.push(clamp_to_sample(value));
            }
        }
        dots
    }
}
