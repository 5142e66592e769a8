//! Image preprocessing for the disease ensemble
//!
//! Mirrors the loader the models were trained behind: nearest-neighbour
//! resize to 224×224, RGB, HWC order, values scaled to [0, 1], batch of one.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage};

use crate::model::{ImageTensor, IMAGE_INPUT_SHAPE};
use crate::utils::error::{AgriError, Result};

/// Resize and scale a decoded image into a `[1, 224, 224, 3]` tensor
pub fn preprocess_image(image: &DynamicImage) -> Result<ImageTensor> {
    let [_, height, width, channels] = IMAGE_INPUT_SHAPE;
    let resized = image
        .resize_exact(width as u32, height as u32, FilterType::Nearest)
        .to_rgb8();

    let mut data = Vec::with_capacity(height * width * channels);
    for pixel in resized.pixels() {
        data.extend(pixel.0.iter().map(|&v| v as f32 / 255.0));
    }

    ImageTensor::new(IMAGE_INPUT_SHAPE, data)
}

/// Load an image file and preprocess it
pub fn load_image_tensor(path: &Path) -> Result<ImageTensor> {
    let image =
        image::open(path).map_err(|e| AgriError::ImageLoad(path.to_path_buf(), e.to_string()))?;
    preprocess_image(&image)
}
