use std::time::Instant;

use log::debug;

use crate::cluster::cluster_points;
use crate::error::{DiffError, Result};
use crate::{Area, DiffConfig, DiffResultGroup, Point, Rect, SideRects};

/// Coordinates saturate at `i32::MAX` instead of wrapping.
fn sat(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Padded bounding box of a point cluster.
fn cluster_rect(points: &[Point], padding: u32) -> Option<Rect> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let padding = sat(padding);
    Some(Rect::new(
        sat(min_x).saturating_sub(padding),
        sat(min_y).saturating_sub(padding),
        sat(max_x).saturating_add(padding),
        sat(max_y).saturating_add(padding),
    ))
}

/// Area bands are already exact, so no padding is applied.
fn area_rect(area: &Area) -> Rect {
    Rect::new(
        sat(area.x),
        sat(area.y),
        sat(area.x.saturating_add(area.width)),
        sat(area.y.saturating_add(area.height)),
    )
}

/// Unions overlapping rectangles until a full pass merges nothing. The
/// result is the same set for any input permutation.
pub fn merge_rects(mut rects: Vec<Rect>) -> Vec<Rect> {
    loop {
        let mut merged_any = false;
        let mut folded: Vec<Rect> = Vec::with_capacity(rects.len());
        for rect in rects {
            match folded.iter_mut().find(|r| r.overlaps(&rect)) {
                Some(hit) => {
                    *hit = hit.union(&rect);
                    merged_any = true;
                }
                None => folded.push(rect),
            }
        }
        rects = folded;
        if !merged_any {
            return rects;
        }
    }
}

/// Clamps to the canvas and keeps the rectangle only if any area survives.
/// A zero-area canvas (or a rectangle entirely outside it) contributes
/// nothing to that side.
fn push_clamped(rects: &mut Vec<Rect>, rect: Rect, size: (u32, u32)) {
    let clamped = rect.clamp_to(size.0, size.1);
    if clamped.width() > 0 && clamped.height() > 0 {
        rects.push(clamped);
    }
}

/// Reduces diff results to the rectangles to draw over each image. Point
/// groups are clustered and padded; area groups map through exactly. Each
/// side is clamped to its own canvas and merged independently.
pub fn diff_rects(
    results: &[DiffResultGroup],
    left_size: (u32, u32),
    right_size: (u32, u32),
    config: &DiffConfig,
) -> Result<SideRects> {
    if config.clusters == 0 {
        return Err(DiffError::InvalidParameter(
            "clusters must be at least 1".into(),
        ));
    }
    let started = Instant::now();
    let mut left_rects = Vec::new();
    let mut right_rects = Vec::new();
    for group in results {
        match group {
            DiffResultGroup::Points { dx, dy, points } => {
                for cluster in cluster_points(points, config.clusters) {
                    if let Some(rect) = cluster_rect(&cluster, config.padding) {
                        push_clamped(&mut left_rects, rect, left_size);
                        push_clamped(&mut right_rects, rect.shift(*dx, *dy), right_size);
                    }
                }
            }
            DiffResultGroup::Area { left, right } => {
                if let Some(area) = left {
                    push_clamped(&mut left_rects, area_rect(area), left_size);
                }
                if let Some(area) = right {
                    push_clamped(&mut right_rects, area_rect(area), right_size);
                }
            }
        }
    }
    let rects = SideRects {
        left: merge_rects(left_rects),
        right: merge_rects(right_rects),
    };
    debug!(
        "derived {} + {} rect(s) from {} group(s) in {} ms",
        rects.left.len(),
        rects.right.len(),
        results.len(),
        started.elapsed().as_millis()
    );
    Ok(rects)
}
