use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::debug;

use crate::error::Result;
use crate::source::SourceImage;
use crate::{Area, DiffResultGroup};

/// Hook invoked with each emitted diff group. The engine itself never
/// touches the filesystem; anything with side effects lives behind this.
pub trait DiffObserver {
    fn group(&mut self, left: &SourceImage, right: &SourceImage, group: &DiffResultGroup);
}

pub struct NoopObserver;

impl DiffObserver for NoopObserver {
    fn group(&mut self, _left: &SourceImage, _right: &SourceImage, _group: &DiffResultGroup) {}
}

#[derive(Clone, Copy)]
enum Tint {
    Red,
    Green,
    Yellow,
}

/// Writes annotated copies of both images: differing points are filled red,
/// one-sided bands are tinted red (left) or green (right), two-sided bands
/// yellow on both.
pub struct DebugAnnotator {
    out_dir: PathBuf,
    canvases: Option<Canvases>,
}

struct Canvases {
    left: RgbImage,
    right: RgbImage,
    left_name: String,
    right_name: String,
}

impl DebugAnnotator {
    /// Output lands under `out_dir`, mirroring the pair name's directory
    /// part so same-named pairs from different subdirectories cannot
    /// overwrite each other.
    pub fn new<P: Into<PathBuf>>(out_dir: P, pair_name: &str) -> Self {
        let mut out_dir = out_dir.into();
        if let Some(parent) = Path::new(pair_name).parent() {
            if !parent.as_os_str().is_empty() {
                out_dir.push(parent);
            }
        }
        Self {
            out_dir,
            canvases: None,
        }
    }

    /// Writes the annotated images, if any group was observed. Returns the
    /// written paths.
    pub fn finish(self) -> Result<Option<(PathBuf, PathBuf)>> {
        let canvases = match self.canvases {
            Some(c) => c,
            None => return Ok(None),
        };
        fs::create_dir_all(&self.out_dir)?;
        let left_path = self.out_dir.join(format!("{}-left.png", canvases.left_name));
        let right_path = self
            .out_dir
            .join(format!("{}-right.png", canvases.right_name));
        canvases.left.save(&left_path)?;
        canvases.right.save(&right_path)?;
        debug!(
            "wrote annotated images {} and {}",
            left_path.display(),
            right_path.display()
        );
        Ok(Some((left_path, right_path)))
    }

    fn canvases(&mut self, left: &SourceImage, right: &SourceImage) -> &mut Canvases {
        self.canvases.get_or_insert_with(|| Canvases {
            left: left.rgb().clone(),
            right: right.rgb().clone(),
            left_name: stem(left.path(), "left"),
            right_name: stem(right.path(), "right"),
        })
    }
}

impl DiffObserver for DebugAnnotator {
    fn group(&mut self, left: &SourceImage, right: &SourceImage, group: &DiffResultGroup) {
        let canvases = self.canvases(left, right);
        match group {
            DiffResultGroup::Points { dx, dy, points } => {
                for p in points {
                    fill_point(&mut canvases.left, p.x as i64, p.y as i64);
                    fill_point(
                        &mut canvases.right,
                        p.x as i64 + *dx as i64,
                        p.y as i64 + *dy as i64,
                    );
                }
            }
            DiffResultGroup::Area {
                left: left_area,
                right: right_area,
            } => {
                let two_sided = left_area.is_some() && right_area.is_some();
                if let Some(area) = left_area {
                    let tint = if two_sided { Tint::Yellow } else { Tint::Red };
                    tint_area(&mut canvases.left, area, tint);
                }
                if let Some(area) = right_area {
                    let tint = if two_sided { Tint::Yellow } else { Tint::Green };
                    tint_area(&mut canvases.right, area, tint);
                }
            }
        }
    }
}

fn stem(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

fn fill_point(img: &mut RgbImage, x: i64, y: i64) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb([255, 0, 0]));
    }
}

fn tint_area(img: &mut RgbImage, area: &Area, tint: Tint) {
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if x < img.width() && y < img.height() {
                let p = img.get_pixel_mut(x, y);
                *p = tint_pixel(*p, tint);
            }
        }
    }
}

fn tint_pixel(p: Rgb<u8>, tint: Tint) -> Rgb<u8> {
    let boost = |v: u8| ((v as f32 * 1.5).min(255.0)) as u8;
    let cut = |v: u8| (v as f32 * 0.7) as u8;
    match tint {
        Tint::Red => Rgb([boost(p[0]), cut(p[1]), cut(p[2])]),
        Tint::Green => Rgb([cut(p[0]), boost(p[1]), cut(p[2])]),
        Tint::Yellow => Rgb([boost(p[0]), boost(p[1]), cut(p[2])]),
    }
}
