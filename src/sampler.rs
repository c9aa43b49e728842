//! Image sampling - nearest-pixel color lookup in continuous image space.

use crate::color::Rgba;
use image::{DynamicImage, Rgba32FImage};

/// Color lookup over a source image.
pub trait Sampler: Send + Sync {
    /// Source size in pixels as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Color at image-space (x, y), transparent black outside the image.
    fn sample(&self, x: f64, y: f64) -> Rgba;
}

pub struct ImageSampler {
    image: Rgba32FImage,
}

impl ImageSampler {
    pub fn new(image: &DynamicImage) -> Self {
        Self { image: image.to_rgba32f() }
    }
}

impl Sampler for ImageSampler {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn sample(&self, x: f64, y: f64) -> Rgba {
        let (w, h) = self.image.dimensions();
        if !(x >= 0.0 && y >= 0.0 && x < w as f64 && y < h as f64) {
            return Rgba::TRANSPARENT;
        }
        // Pixel (i, j) covers [i, i + 1) x [j, j + 1)
        let [r, g, b, a] = self.image.get_pixel(x as u32, y as u32).0.map(|c| c.clamp(0.0, 1.0) as f64);
        Rgba::new(r, g, b, a)
    }
}
