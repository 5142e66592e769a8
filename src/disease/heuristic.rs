//! Color heuristic used when no disease model is available.
//!
//! The image is reduced to its per-channel mean intensities and classified
//! by a fixed, ordered rule list; the first rule that matches wins:
//!
//! 1. green dominance (`G - max(R, B) >= 20`) → Healthy
//! 2. red and green high, blue low (`R > 120, G > 120, B < 100`) → Yellow
//! 3. red dominance (`R - max(G, B) >= 20`) → RedRot
//! 4. brownish (`R > G > B`) with `60 < brightness < 180` → Rust
//! 5. anything else → Mosaic
//!
//! The thresholds are part of the contract and are not configurable.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage};
use serde::Serialize;
use tracing::debug;

use super::DiseaseClass;

/// Side of the square grid the image is reduced to before averaging
pub const HEURISTIC_GRID: u32 = 128;

const DOMINANCE_MARGIN: f64 = 20.0;
const YELLOW_MIN_RG: f64 = 120.0;
const YELLOW_MAX_B: f64 = 100.0;
const RUST_MIN_BRIGHTNESS: f64 = 60.0;
const RUST_MAX_BRIGHTNESS: f64 = 180.0;

/// Mean intensity of each RGB channel, each in `[0, 255]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelMeans {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelMeans {
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Compute the means of an image after converting it to RGB and
    /// resizing it to the heuristic grid
    pub fn of_image(image: &DynamicImage) -> Self {
        let rgb = image
            .resize_exact(HEURISTIC_GRID, HEURISTIC_GRID, FilterType::CatmullRom)
            .to_rgb8();

        let mut sums = [0.0f64; 3];
        for pixel in rgb.pixels() {
            for (sum, &value) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += value as f64;
            }
        }

        let count = (rgb.width() as f64 * rgb.height() as f64).max(1.0);
        Self::new(sums[0] / count, sums[1] / count, sums[2] / count)
    }

    pub fn brightness(&self) -> f64 {
        (self.red + self.green + self.blue) / 3.0
    }
}

/// Apply the ordered rule list to a mean triple
pub fn classify_means(means: &ChannelMeans) -> DiseaseClass {
    let ChannelMeans { red, green, blue } = *means;
    let brightness = means.brightness();

    if green - red.max(blue) >= DOMINANCE_MARGIN {
        return DiseaseClass::Healthy;
    }

    if red > YELLOW_MIN_RG && green > YELLOW_MIN_RG && blue < YELLOW_MAX_B {
        return DiseaseClass::Yellow;
    }

    if red - green.max(blue) >= DOMINANCE_MARGIN {
        return DiseaseClass::RedRot;
    }

    if red > green
        && green > blue
        && brightness > RUST_MIN_BRIGHTNESS
        && brightness < RUST_MAX_BRIGHTNESS
    {
        return DiseaseClass::Rust;
    }

    DiseaseClass::Mosaic
}

/// Classify an already-decoded image
pub fn classify_image(image: &DynamicImage) -> DiseaseClass {
    let means = ChannelMeans::of_image(image);
    let class = classify_means(&means);
    debug!(
        "Heuristic means r={:.1} g={:.1} b={:.1} -> {}",
        means.red, means.green, means.blue, class
    );
    class
}

/// Classify encoded image bytes; undecodable input is Healthy
pub fn classify_bytes(bytes: &[u8]) -> DiseaseClass {
    match image::load_from_memory(bytes) {
        Ok(image) => classify_image(&image),
        Err(e) => {
            debug!("Heuristic could not decode upload ({}), defaulting to Healthy", e);
            DiseaseClass::Healthy
        }
    }
}

/// Classify an image file; an unreadable file is Healthy
pub fn heuristic_predict(path: &Path) -> DiseaseClass {
    match image::open(path) {
        Ok(image) => classify_image(&image),
        Err(e) => {
            debug!("Heuristic could not read {:?} ({}), defaulting to Healthy", path, e);
            DiseaseClass::Healthy
        }
    }
}
