use std::iter;

/// One step of an LCS edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Common,
    Removed,
    Added,
}

/// Contiguous index range within one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub min: usize,
    pub len: usize,
}

/// A maximal run of non-common tokens between two common tokens (or sequence
/// ends). Equal-length runs are always `Updated`, never `Replaced`, even when
/// the tokens are unrelated: matching widths are what allow pixel-level
/// comparison later instead of a coarse area flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Added { right: Span },
    Removed { left: Span },
    Updated { left: Span, right: Span },
    Replaced { left: Span, right: Span },
}

impl Band {
    pub fn spans(&self) -> (Option<Span>, Option<Span>) {
        match *self {
            Band::Added { right } => (None, Some(right)),
            Band::Removed { left } => (Some(left), None),
            Band::Updated { left, right } | Band::Replaced { left, right } => {
                (Some(left), Some(right))
            }
        }
    }
}

pub fn diff_bands<T: PartialEq>(left: &[T], right: &[T]) -> Vec<Band> {
    group_ops(&diff_ops(left, right))
}

/// LCS edit script via linear-space Hirschberg alignment, with common
/// prefix/suffix trimming first. Deterministic for a given input.
pub fn diff_ops<T: PartialEq>(left: &[T], right: &[T]) -> Vec<EditOp> {
    let mut prefix = 0;
    while prefix < left.len() && prefix < right.len() && left[prefix] == right[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < left.len() - prefix
        && suffix < right.len() - prefix
        && left[left.len() - 1 - suffix] == right[right.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let mut ops = Vec::with_capacity(left.len() + right.len() - prefix - suffix);
    ops.extend(iter::repeat(EditOp::Common).take(prefix));
    align(
        &left[prefix..left.len() - suffix],
        &right[prefix..right.len() - suffix],
        &mut ops,
    );
    ops.extend(iter::repeat(EditOp::Common).take(suffix));
    ops
}

fn align<T: PartialEq>(left: &[T], right: &[T], ops: &mut Vec<EditOp>) {
    if left.is_empty() {
        ops.extend(iter::repeat(EditOp::Added).take(right.len()));
        return;
    }
    if right.is_empty() {
        ops.extend(iter::repeat(EditOp::Removed).take(left.len()));
        return;
    }
    if left.len() == 1 {
        match right.iter().position(|t| *t == left[0]) {
            Some(at) => {
                ops.extend(iter::repeat(EditOp::Added).take(at));
                ops.push(EditOp::Common);
                ops.extend(iter::repeat(EditOp::Added).take(right.len() - at - 1));
            }
            None => {
                ops.push(EditOp::Removed);
                ops.extend(iter::repeat(EditOp::Added).take(right.len()));
            }
        }
        return;
    }
    if right.len() == 1 {
        match left.iter().position(|t| *t == right[0]) {
            Some(at) => {
                ops.extend(iter::repeat(EditOp::Removed).take(at));
                ops.push(EditOp::Common);
                ops.extend(iter::repeat(EditOp::Removed).take(left.len() - at - 1));
            }
            None => {
                ops.extend(iter::repeat(EditOp::Removed).take(left.len()));
                ops.push(EditOp::Added);
            }
        }
        return;
    }

    let mid = left.len() / 2;
    let forward = lcs_lengths(&left[..mid], right);
    let backward = lcs_lengths_rev(&left[mid..], right);

    let mut split = 0;
    let mut best = forward[0] + backward[0];
    for j in 1..=right.len() {
        let score = forward[j] + backward[j];
        if score > best {
            best = score;
            split = j;
        }
    }

    align(&left[..mid], &right[..split], ops);
    align(&left[mid..], &right[split..], ops);
}

/// `lengths[j]` = LCS length of `a` against `b[..j]`.
fn lcs_lengths<T: PartialEq>(a: &[T], b: &[T]) -> Vec<u32> {
    let n = b.len();
    let mut prev = vec![0u32; n + 1];
    let mut cur = vec![0u32; n + 1];
    for item in a {
        for j in 0..n {
            cur[j + 1] = if *item == b[j] {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// `lengths[j]` = LCS length of `a` against `b[j..]`.
fn lcs_lengths_rev<T: PartialEq>(a: &[T], b: &[T]) -> Vec<u32> {
    let n = b.len();
    let mut prev = vec![0u32; n + 1];
    let mut cur = vec![0u32; n + 1];
    for item in a.iter().rev() {
        for j in (0..n).rev() {
            cur[j] = if *item == b[j] {
                prev[j + 1] + 1
            } else {
                cur[j + 1].max(prev[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Folds the edit script into typed bands. Pure function of the op stream:
/// each band records where its run starts in both sequences and how many
/// tokens each side contributed.
pub fn group_ops(ops: &[EditOp]) -> Vec<Band> {
    let mut bands = Vec::new();
    let mut left_at = 0usize;
    let mut right_at = 0usize;
    let mut removed = 0usize;
    let mut added = 0usize;

    for op in ops {
        match op {
            EditOp::Removed => {
                removed += 1;
                left_at += 1;
            }
            EditOp::Added => {
                added += 1;
                right_at += 1;
            }
            EditOp::Common => {
                if let Some(band) = close_run(left_at, right_at, removed, added) {
                    bands.push(band);
                }
                removed = 0;
                added = 0;
                left_at += 1;
                right_at += 1;
            }
        }
    }
    if let Some(band) = close_run(left_at, right_at, removed, added) {
        bands.push(band);
    }
    bands
}

fn close_run(left_at: usize, right_at: usize, removed: usize, added: usize) -> Option<Band> {
    let left = Span {
        min: left_at - removed,
        len: removed,
    };
    let right = Span {
        min: right_at - added,
        len: added,
    };
    match (removed > 0, added > 0) {
        (false, false) => None,
        (false, true) => Some(Band::Added { right }),
        (true, false) => Some(Band::Removed { left }),
        (true, true) if removed == added => Some(Band::Updated { left, right }),
        (true, true) => Some(Band::Replaced { left, right }),
    }
}
