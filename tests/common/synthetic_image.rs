use image::{Rgb, RgbImage};
use visdiff::SourceImage;

/// Generates an image where every row and every column carries a distinct
/// pixel pattern, so structural alignment is unambiguous.
pub fn gradient(width: u32, height: u32) -> SourceImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    SourceImage::from_rgb(
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(y % 251) as u8, (x % 251) as u8, ((x + 2 * y) % 251) as u8])
        }),
        "gradient.png",
    )
}

/// Copies `base` with one extra row of the given color inserted at `at`,
/// shifting the rows below it down by one.
pub fn with_row_inserted(base: &SourceImage, at: u32, color: Rgb<u8>) -> SourceImage {
    assert!(at <= base.height(), "insertion row out of range");
    let rgb = RgbImage::from_fn(base.width(), base.height() + 1, |x, y| {
        if y < at {
            *base.rgb().get_pixel(x, y)
        } else if y == at {
            color
        } else {
            *base.rgb().get_pixel(x, y - 1)
        }
    });
    SourceImage::from_rgb(rgb, "row-inserted.png")
}

/// Single-color image.
pub fn solid(width: u32, height: u32, color: Rgb<u8>) -> SourceImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    SourceImage::from_rgb(RgbImage::from_pixel(width, height, color), "solid.png")
}
