pub mod html;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Rect;
use crate::batch::{ImageInfo, PairDiff, PairKind};

#[derive(Serialize)]
pub struct DiffReport {
    pub total: usize,
    pub changed: usize,
    pub pairs: Vec<PairReport>,
}

#[derive(Serialize)]
pub struct PairReport {
    pub name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<ImageEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<ImageEntry>,
    pub left_rects: Vec<Rect>,
    pub right_rects: Vec<Rect>,
}

#[derive(Serialize)]
pub struct ImageEntry {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl From<&ImageInfo> for ImageEntry {
    fn from(info: &ImageInfo) -> Self {
        Self {
            path: info.path.display().to_string(),
            width: info.width,
            height: info.height,
        }
    }
}

impl From<&BTreeMap<String, PairDiff>> for DiffReport {
    fn from(diffs: &BTreeMap<String, PairDiff>) -> Self {
        let pairs = diffs
            .iter()
            .map(|(name, diff)| PairReport {
                name: name.clone(),
                status: diff.kind.label(),
                left: diff.left.as_ref().map(ImageEntry::from),
                right: diff.right.as_ref().map(ImageEntry::from),
                left_rects: diff.rects.left.clone(),
                right_rects: diff.rects.right.clone(),
            })
            .collect();
        let changed = diffs
            .values()
            .filter(|diff| diff.kind != PairKind::Unchanged)
            .count();
        Self {
            total: diffs.len(),
            changed,
            pairs,
        }
    }
}

impl DiffReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
