use std::time::Instant;

use log::debug;

use crate::source::SourceImage;
use crate::{Area, DiffConfig, DiffResultGroup};

use super::sequence::{self, Band, Span};
use super::{pixels, signatures};

/// Shift-aware comparison: aligns column signatures, recurses into matched
/// column bands with row signatures, and only then compares pixels.
pub fn compare(left: &SourceImage, right: &SourceImage, config: &DiffConfig) -> Vec<DiffResultGroup> {
    let started = Instant::now();
    let left_cols = signatures::column_signatures(left);
    let right_cols = signatures::column_signatures(right);
    let bands = sequence::diff_bands(&left_cols, &right_cols);
    debug!(
        "column pass: {} vs {} signatures, {} bands, {} ms",
        left_cols.len(),
        right_cols.len(),
        bands.len(),
        started.elapsed().as_millis()
    );

    let mut results = Vec::new();
    for band in bands {
        match band {
            Band::Updated {
                left: lcols,
                right: rcols,
            } => compare_rows(left, right, lcols, rcols, config, &mut results),
            other => {
                let (l, r) = other.spans();
                let left_area =
                    l.and_then(|s| Area::new(s.min as u32, 0, s.len as u32, left.height()));
                let right_area =
                    r.and_then(|s| Area::new(s.min as u32, 0, s.len as u32, right.height()));
                push_area(
                    left,
                    right,
                    left_area,
                    right_area,
                    config.ignore_spacing,
                    &mut results,
                );
            }
        }
    }
    results
}

/// Row-level pass over a matched column band. The band has equal width on
/// both sides; only the column offsets differ.
fn compare_rows(
    left: &SourceImage,
    right: &SourceImage,
    left_cols: Span,
    right_cols: Span,
    config: &DiffConfig,
    results: &mut Vec<DiffResultGroup>,
) {
    let width = left_cols.len as u32;
    let left_min_x = left_cols.min as u32;
    let right_min_x = right_cols.min as u32;
    let left_rows = signatures::row_signatures(left, left_min_x, width);
    let right_rows = signatures::row_signatures(right, right_min_x, width);

    for band in sequence::diff_bands(&left_rows, &right_rows) {
        match band {
            Band::Updated {
                left: lrows,
                right: rrows,
            } => {
                let points = pixels::collect_points(
                    left,
                    right,
                    width,
                    lrows.len as u32,
                    (left_min_x, lrows.min as u32),
                    (right_min_x, rrows.min as u32),
                    config.threshold,
                );
                if !points.is_empty() {
                    results.push(DiffResultGroup::Points {
                        dx: right_min_x as i32 - left_min_x as i32,
                        dy: rrows.min as i32 - lrows.min as i32,
                        points,
                    });
                }
            }
            other => {
                let (l, r) = other.spans();
                let left_area =
                    l.and_then(|s| Area::new(left_min_x, s.min as u32, width, s.len as u32));
                let right_area =
                    r.and_then(|s| Area::new(right_min_x, s.min as u32, width, s.len as u32));
                push_area(
                    left,
                    right,
                    left_area,
                    right_area,
                    config.ignore_spacing,
                    results,
                );
            }
        }
    }
}

/// Spacing suppression applies only to one-sided bands: a band that is a
/// single uniform color on the side it appears on is treated as intentional
/// whitespace, not a defect.
fn push_area(
    left: &SourceImage,
    right: &SourceImage,
    mut left_area: Option<Area>,
    mut right_area: Option<Area>,
    ignore_spacing: bool,
    results: &mut Vec<DiffResultGroup>,
) {
    if ignore_spacing && left_area.is_some() != right_area.is_some() {
        if let Some(area) = left_area {
            if uniform_color(left, &area) {
                left_area = None;
            }
        }
        if let Some(area) = right_area {
            if uniform_color(right, &area) {
                right_area = None;
            }
        }
    }
    if left_area.is_some() || right_area.is_some() {
        results.push(DiffResultGroup::Area {
            left: left_area,
            right: right_area,
        });
    }
}

fn uniform_color(img: &SourceImage, area: &Area) -> bool {
    let first = match img.pixel(area.x, area.y) {
        Some(p) => p,
        None => return false,
    };
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            match img.pixel(x, y) {
                Some(p) if p == first => {}
                _ => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    // Every row and every column gets a distinct pixel pattern, so band
    // alignment is unambiguous.
    fn gradient(width: u32, height: u32) -> SourceImage {
        SourceImage::from_rgb(
            RgbImage::from_fn(width, height, |x, y| {
                Rgb([(y % 251) as u8, (x % 251) as u8, ((x + 2 * y) % 251) as u8])
            }),
            "gradient.png",
        )
    }

    fn with_row_inserted(base: &SourceImage, at: u32, color: Rgb<u8>) -> SourceImage {
        let rgb = RgbImage::from_fn(base.width(), base.height() + 1, |x, y| {
            if y < at {
                *base.rgb().get_pixel(x, y)
            } else if y == at {
                color
            } else {
                *base.rgb().get_pixel(x, y - 1)
            }
        });
        SourceImage::from_rgb(rgb, "inserted.png")
    }

    fn with_column_inserted(base: &SourceImage, at: u32, color: Rgb<u8>) -> SourceImage {
        let rgb = RgbImage::from_fn(base.width() + 1, base.height(), |x, y| {
            if x < at {
                *base.rgb().get_pixel(x, y)
            } else if x == at {
                color
            } else {
                *base.rgb().get_pixel(x - 1, y)
            }
        });
        SourceImage::from_rgb(rgb, "col-inserted.png")
    }

    fn config(shift_aware: bool, ignore_spacing: bool) -> DiffConfig {
        DiffConfig {
            shift_aware,
            ignore_spacing,
            ..DiffConfig::default()
        }
    }

    #[test]
    fn identical_images_produce_no_results() {
        let img = gradient(24, 16);
        assert!(compare(&img, &img, &config(true, false)).is_empty());
    }

    #[test]
    fn inserted_blank_row_is_a_single_right_area() {
        let left = gradient(24, 16);
        let right = with_row_inserted(&left, 5, Rgb([255, 255, 255]));
        let results = compare(&left, &right, &config(true, false));
        assert_eq!(
            results,
            vec![DiffResultGroup::Area {
                left: None,
                right: Area::new(0, 5, 24, 1),
            }]
        );
    }

    #[test]
    fn inserted_uniform_row_is_suppressed_with_ignore_spacing() {
        let left = gradient(24, 16);
        let right = with_row_inserted(&left, 5, Rgb([255, 255, 255]));
        assert!(compare(&left, &right, &config(true, true)).is_empty());
    }

    #[test]
    fn inserted_patterned_row_survives_ignore_spacing() {
        let left = gradient(24, 16);
        let mut right = with_row_inserted(&left, 5, Rgb([255, 255, 255]))
            .rgb()
            .clone();
        right.put_pixel(3, 5, Rgb([0, 0, 0]));
        let right = SourceImage::from_rgb(right, "patterned.png");
        let results = compare(&left, &right, &config(true, true));
        assert_eq!(
            results,
            vec![DiffResultGroup::Area {
                left: None,
                right: Area::new(0, 5, 24, 1),
            }]
        );
    }

    #[test]
    fn changed_pixel_yields_localized_points() {
        let left = gradient(24, 16);
        let mut rgb = left.rgb().clone();
        rgb.put_pixel(7, 9, Rgb([250, 1, 2]));
        let right = SourceImage::from_rgb(rgb, "changed.png");
        let results = compare(&left, &right, &config(true, false));
        assert_eq!(
            results,
            vec![DiffResultGroup::Points {
                dx: 0,
                dy: 0,
                points: vec![crate::Point::new(7, 9)],
            }]
        );
    }

    #[test]
    fn inserted_blank_column_is_a_single_right_area() {
        let left = gradient(24, 16);
        let right = with_column_inserted(&left, 10, Rgb([255, 255, 255]));
        let results = compare(&left, &right, &config(true, false));
        assert_eq!(
            results,
            vec![DiffResultGroup::Area {
                left: None,
                right: Area::new(10, 0, 1, 16),
            }]
        );
    }

    #[test]
    fn inserted_uniform_column_is_suppressed_with_ignore_spacing() {
        let left = gradient(24, 16);
        let right = with_column_inserted(&left, 10, Rgb([255, 255, 255]));
        assert!(compare(&left, &right, &config(true, true)).is_empty());
    }

    #[test]
    fn inserted_patterned_column_survives_ignore_spacing() {
        let left = gradient(24, 16);
        let mut rgb = with_column_inserted(&left, 10, Rgb([255, 255, 255]))
            .rgb()
            .clone();
        rgb.put_pixel(10, 7, Rgb([0, 0, 0]));
        let right = SourceImage::from_rgb(rgb, "patterned.png");
        let results = compare(&left, &right, &config(true, true));
        assert_eq!(
            results,
            vec![DiffResultGroup::Area {
                left: None,
                right: Area::new(10, 0, 1, 16),
            }]
        );
    }

    #[test]
    fn widened_band_is_an_area_on_both_sides() {
        // Three middle columns replaced by five unrelated ones.
        let left = gradient(24, 16);
        let rgb = RgbImage::from_fn(26, 16, |x, y| {
            if x < 10 {
                *left.rgb().get_pixel(x, y)
            } else if x < 15 {
                Rgb([(x * 31 % 255) as u8, 199, (y * 17 % 255) as u8])
            } else {
                *left.rgb().get_pixel(x - 2, y)
            }
        });
        let right = SourceImage::from_rgb(rgb, "widened.png");
        let results = compare(&left, &right, &config(true, false));
        assert_eq!(
            results,
            vec![DiffResultGroup::Area {
                left: Area::new(10, 0, 3, 16),
                right: Area::new(10, 0, 5, 16),
            }]
        );
    }

    #[test]
    fn uniform_color_fails_fast_on_mismatch() {
        let img = gradient(8, 8);
        let area = Area::new(0, 0, 8, 8).unwrap();
        assert!(!uniform_color(&img, &area));
        let solid = SourceImage::from_rgb(RgbImage::from_pixel(8, 8, Rgb([3, 3, 3])), "solid.png");
        assert!(uniform_color(&solid, &area));
    }
}
