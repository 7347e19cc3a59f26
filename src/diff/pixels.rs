use image::Rgb;

use crate::Point;
use crate::source::SourceImage;

pub fn differs(a: Rgb<u8>, b: Rgb<u8>, threshold: u8) -> bool {
    a[0].abs_diff(b[0]) > threshold
        || a[1].abs_diff(b[1]) > threshold
        || a[2].abs_diff(b[2]) > threshold
}

/// Compares a `width x height` window of the two images at independent
/// origins. An absent pixel on either side counts as a difference. Points
/// are reported in left-image coordinates.
pub fn collect_points(
    left: &SourceImage,
    right: &SourceImage,
    width: u32,
    height: u32,
    left_origin: (u32, u32),
    right_origin: (u32, u32),
    threshold: u8,
) -> Vec<Point> {
    let mut points = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let lx = left_origin.0 + x;
            let ly = left_origin.1 + y;
            let same = match (
                left.pixel(lx, ly),
                right.pixel(right_origin.0 + x, right_origin.1 + y),
            ) {
                (Some(a), Some(b)) => !differs(a, b, threshold),
                _ => false,
            };
            if !same {
                points.push(Point::new(lx, ly));
            }
        }
    }
    points
}
