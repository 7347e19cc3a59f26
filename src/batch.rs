use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::annotate::DebugAnnotator;
use crate::diff::{compare_images, compare_images_with};
use crate::error::{DiffError, Result};
use crate::rects::diff_rects;
use crate::source::SourceImage;
use crate::{DiffConfig, SideRects};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    Added,
    Removed,
    Updated,
    Unchanged,
}

impl PairKind {
    pub fn label(&self) -> &'static str {
        match self {
            PairKind::Added => "added",
            PairKind::Removed => "removed",
            PairKind::Updated => "updated",
            PairKind::Unchanged => "unchanged",
        }
    }
}

/// A matched pair of files. At least one side is present.
#[derive(Debug, Clone)]
pub struct FilePair {
    pub left: Option<PathBuf>,
    pub right: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct PairDiff {
    pub kind: PairKind,
    pub left: Option<ImageInfo>,
    pub right: Option<ImageInfo>,
    pub rects: SideRects,
}

/// Pairs two explicit files under a single display name.
pub fn pair_files(left: &Path, right: &Path) -> Result<BTreeMap<String, FilePair>> {
    for path in [left, right] {
        if !path.exists() {
            return Err(DiffError::MissingInput(path.display().to_string()));
        }
    }
    let left_name = file_name(left);
    let right_name = file_name(right);
    let name = if left_name == right_name {
        left_name
    } else {
        format!("{left_name} vs {right_name}")
    };
    let pair = FilePair {
        left: Some(left.to_path_buf()),
        right: Some(right.to_path_buf()),
    };
    Ok(BTreeMap::from([(name, pair)]))
}

/// Walks both trees and matches PNG files by their path relative to each
/// root. Files present on one side only become one-sided pairs.
pub fn pair_directories(left_root: &Path, right_root: &Path) -> Result<BTreeMap<String, FilePair>> {
    let mut pairs: BTreeMap<String, FilePair> = BTreeMap::new();
    for (root, is_left) in [(left_root, true), (right_root, false)] {
        if !root.is_dir() {
            return Err(DiffError::MissingInput(root.display().to_string()));
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_png(entry.path()) {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            let pair = pairs.entry(rel).or_insert(FilePair {
                left: None,
                right: None,
            });
            if is_left {
                pair.left = Some(entry.path().to_path_buf());
            } else {
                pair.right = Some(entry.path().to_path_buf());
            }
        }
    }
    Ok(pairs)
}

pub fn compare_pair(
    name: &str,
    pair: &FilePair,
    config: &DiffConfig,
    debug_dir: Option<&Path>,
) -> Result<PairDiff> {
    let started = Instant::now();
    let diff = match (&pair.left, &pair.right) {
        (None, None) => {
            return Err(DiffError::InvalidParameter(format!(
                "pair {name} has no file on either side"
            )));
        }
        (Some(left), None) => PairDiff {
            kind: PairKind::Removed,
            left: Some(probe_info(left)?),
            right: None,
            rects: SideRects::default(),
        },
        (None, Some(right)) => PairDiff {
            kind: PairKind::Added,
            left: None,
            right: Some(probe_info(right)?),
            rects: SideRects::default(),
        },
        (Some(left), Some(right)) => {
            if files_identical(left, right)? {
                info!("{name}: file contents hash-identical, skipping decode");
                PairDiff {
                    kind: PairKind::Unchanged,
                    left: None,
                    right: None,
                    rects: SideRects::default(),
                }
            } else {
                compare_files(name, left, right, config, debug_dir)?
            }
        }
    };
    debug!("compared {name} in {} ms", started.elapsed().as_millis());
    Ok(diff)
}

/// Compares every pair in parallel. Keys order the output, so the result
/// does not depend on scheduling.
pub fn compare_pairs(
    pairs: &BTreeMap<String, FilePair>,
    config: &DiffConfig,
    debug_dir: Option<&Path>,
) -> Result<BTreeMap<String, PairDiff>> {
    pairs
        .par_iter()
        .map(|(name, pair)| {
            info!("comparing {name}");
            let diff = compare_pair(name, pair, config, debug_dir)?;
            Ok((name.clone(), diff))
        })
        .collect()
}

fn compare_files(
    name: &str,
    left_path: &Path,
    right_path: &Path,
    config: &DiffConfig,
    debug_dir: Option<&Path>,
) -> Result<PairDiff> {
    let left = SourceImage::open(left_path)?;
    let right = SourceImage::open(right_path)?;
    compare_decoded(name, &left, &right, config, debug_dir)
}

fn compare_decoded(
    name: &str,
    left: &SourceImage,
    right: &SourceImage,
    config: &DiffConfig,
    debug_dir: Option<&Path>,
) -> Result<PairDiff> {
    let left_info = info_of(left);
    let right_info = info_of(right);

    // A zero-area image on exactly one side reads as a whole-file change.
    let left_empty = left.width() == 0 || left.height() == 0;
    let right_empty = right.width() == 0 || right.height() == 0;
    if left_empty != right_empty {
        let kind = if left_empty {
            PairKind::Added
        } else {
            PairKind::Removed
        };
        return Ok(PairDiff {
            kind,
            left: Some(left_info),
            right: Some(right_info),
            rects: SideRects::default(),
        });
    }

    let results = match debug_dir {
        Some(dir) => {
            let mut annotator = DebugAnnotator::new(dir, name);
            let results = compare_images_with(left, right, config, &mut annotator);
            annotator.finish()?;
            results
        }
        None => compare_images(left, right, config),
    };
    let rects = diff_rects(
        &results,
        (left.width(), left.height()),
        (right.width(), right.height()),
        config,
    )?;
    let kind = if rects.is_empty() {
        PairKind::Unchanged
    } else {
        PairKind::Updated
    };
    Ok(PairDiff {
        kind,
        left: Some(left_info),
        right: Some(right_info),
        rects,
    })
}

fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    let da = md5::compute(fs::read(a)?);
    let db = md5::compute(fs::read(b)?);
    Ok(da.0 == db.0)
}

/// Reads dimensions from the file header without decoding pixel data.
fn probe_info(path: &Path) -> Result<ImageInfo> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(ImageInfo {
        path: path.to_path_buf(),
        width,
        height,
    })
}

fn info_of(img: &SourceImage) -> ImageInfo {
    ImageInfo {
        path: img.path().to_path_buf(),
        width: img.width(),
        height: img.height(),
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
