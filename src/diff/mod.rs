use std::time::Instant;

use log::debug;

use crate::annotate::DiffObserver;
use crate::source::SourceImage;
use crate::{DiffConfig, DiffResultGroup};

pub mod pixels;
pub mod sequence;
pub mod signatures;
pub mod structural;

/// Compares two images, structural or simple mode per `config.shift_aware`.
pub fn compare_images(
    left: &SourceImage,
    right: &SourceImage,
    config: &DiffConfig,
) -> Vec<DiffResultGroup> {
    let started = Instant::now();
    let results = if config.shift_aware {
        structural::compare(left, right, config)
    } else {
        simple(left, right, config.threshold)
    };
    debug!(
        "compared {} and {}: {} result group(s) in {} ms",
        left.path().display(),
        right.path().display(),
        results.len(),
        started.elapsed().as_millis()
    );
    results
}

/// Same as [`compare_images`], invoking the observer once per emitted group.
pub fn compare_images_with(
    left: &SourceImage,
    right: &SourceImage,
    config: &DiffConfig,
    observer: &mut dyn DiffObserver,
) -> Vec<DiffResultGroup> {
    let results = compare_images(left, right, config);
    for group in &results {
        observer.group(left, right, group);
    }
    results
}

/// Direct pixel comparison over the bounding canvas of both images. A
/// dimension mismatch shows up as differing points along the wider/taller
/// edge.
fn simple(left: &SourceImage, right: &SourceImage, threshold: u8) -> Vec<DiffResultGroup> {
    let width = left.width().max(right.width());
    let height = left.height().max(right.height());
    let points = pixels::collect_points(left, right, width, height, (0, 0), (0, 0), threshold);
    if points.is_empty() {
        Vec::new()
    } else {
        vec![DiffResultGroup::Points {
            dx: 0,
            dy: 0,
            points,
        }]
    }
}
