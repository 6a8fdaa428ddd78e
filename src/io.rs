use crate::data_container::SampleGrid;
use image::{DynamicImage, GrayImage};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Opens any image format supported by the `image` crate and reduces it to 8-bit gray.
pub fn open_gray_image(file_path: &Path) -> Result<SampleGrid, Box<dyn Error>> {
    let gray = DynamicImage::ImageLuma8(image::open(file_path)?.to_luma8());
    Ok(SampleGrid::try_from(&gray)?)
}

/// Saves the grid as a gray image; the format follows the file extension.
pub fn save_gray_image(grid: &SampleGrid, file_path: &Path) -> Result<(), Box<dyn Error>> {
    GrayImage::from(grid).save(file_path)?;
    Ok(())
}

/// `<out_dir>/<input stem>_<suffix>.png`
pub fn output_path(out_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    out_dir.join(format!("{stem}_{suffix}.png"))
}
