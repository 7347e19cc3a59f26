use serde::Serialize;

pub mod error;
pub mod source;
pub mod diff;
pub mod cluster;
pub mod rects;
pub mod annotate;
pub mod batch;
pub mod report;

pub use annotate::{DebugAnnotator, DiffObserver, NoopObserver};
pub use diff::{compare_images, compare_images_with};
pub use error::{DiffError, Result};
pub use rects::diff_rects;
pub use source::SourceImage;

#[derive(Debug, Clone)]
pub struct DiffConfig {
    pub threshold: u8,
    pub shift_aware: bool,
    pub ignore_spacing: bool,
    pub clusters: usize,
    pub padding: u32,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            threshold: 0,
            shift_aware: false,
            ignore_spacing: false,
            clusters: 4,
            padding: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel band in one image's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    /// Bands must have nonzero extent on both axes.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResultGroup {
    /// Differing pixels in left-image coordinates; the matching right-image
    /// pixel of `(x, y)` is `(x + dx, y + dy)`.
    Points {
        dx: i32,
        dy: i32,
        points: Vec<Point>,
    },
    /// A band present on one or both sides with no finer alignment attempted.
    /// At least one side is present.
    Area {
        left: Option<Area>,
        right: Option<Area>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn shift(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }

    /// Closed-interval test: touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    pub fn union(&self, other: &Rect) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Dimensions beyond `i32::MAX` saturate rather than flip the bounds.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            left: self.left.clamp(0, w),
            top: self.top.clamp(0, h),
            right: self.right.clamp(0, w),
            bottom: self.bottom.clamp(0, h),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SideRects {
    pub left: Vec<Rect>,
    pub right: Vec<Rect>,
}

impl SideRects {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}
