use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::error::Result;

/// A decoded RGB image together with the path it was loaded from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    rgb: RgbImage,
    path: PathBuf,
}

impl SourceImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rgb = image::open(&path)?.to_rgb8();
        Ok(Self {
            rgb,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn from_rgb<P: Into<PathBuf>>(rgb: RgbImage, path: P) -> Self {
        Self {
            rgb,
            path: path.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// Out-of-bounds reads are absent, never a fault.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x < self.rgb.width() && y < self.rgb.height() {
            Some(*self.rgb.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rgb(&self) -> &RgbImage {
        &self.rgb
    }
}
