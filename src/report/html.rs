use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Instant;

use log::debug;

use crate::Rect;
use crate::batch::{ImageInfo, PairDiff, PairKind};
use crate::error::Result;

pub const DEFAULT_CSS: &str = "\
body { font-family: sans-serif; margin: 16px; }
.title { margin: 12px 0 4px; font-weight: bold; }
.status { color: #888; font-weight: normal; }
.row { display: flex; gap: 8px; }
.image-container { position: relative; }
.image-container img { display: block; }
.rect { position: absolute; border: 2px solid red; box-sizing: border-box; }
";

/// Renders a self-contained overlay page: each changed pair becomes a row of
/// the present side(s), with that side's rectangles drawn over the image.
/// Unchanged pairs are skipped.
pub fn render(diffs: &BTreeMap<String, PairDiff>, css: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Image diff</title>\n<style>\n");
    html.push_str(css);
    html.push_str("</style>\n</head>\n<body>\n<h1>Image diff</h1>\n");
    let mut changed = 0;
    for (name, diff) in diffs {
        if diff.kind == PairKind::Unchanged {
            continue;
        }
        changed += 1;
        pair_row(&mut html, name, diff);
    }
    if changed == 0 {
        html.push_str("<p>No differences found.</p>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub fn write(path: &Path, diffs: &BTreeMap<String, PairDiff>, css: &str) -> Result<()> {
    let started = Instant::now();
    fs::write(path, render(diffs, css))?;
    debug!(
        "wrote HTML report {} in {} ms",
        path.display(),
        started.elapsed().as_millis()
    );
    Ok(())
}

fn pair_row(html: &mut String, name: &str, diff: &PairDiff) {
    let _ = writeln!(
        html,
        "<div class=\"title\">{} <span class=\"status\">{}</span></div>\n<div class=\"row\">",
        escape(name),
        diff.kind.label()
    );
    if let Some(info) = &diff.left {
        side_column(html, info, &diff.rects.left);
    }
    if let Some(info) = &diff.right {
        side_column(html, info, &diff.rects.right);
    }
    html.push_str("</div>\n");
}

fn side_column(html: &mut String, info: &ImageInfo, rects: &[Rect]) {
    html.push_str("<div class=\"image-container\">\n");
    let _ = writeln!(
        html,
        "<img src=\"{}\">",
        escape(&info.path.display().to_string())
    );
    for rect in rects {
        let _ = writeln!(
            html,
            "<div class=\"rect\" style=\"top: {}px; left: {}px; width: {}px; height: {}px;\"></div>",
            rect.top,
            rect.left,
            rect.width(),
            rect.height()
        );
    }
    html.push_str("</div>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
