use crate::Point;

const MAX_ROUNDS: usize = 32;

/// Partitions a point cloud into `k` spatial clusters. Degenerate inputs
/// degrade instead of failing: an empty cloud yields no clusters, and fewer
/// points than clusters yield one singleton cluster per point. No RNG
/// anywhere, so a given input always clusters the same way.
pub fn cluster_points(points: &[Point], k: usize) -> Vec<Vec<Point>> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }
    if points.len() < k {
        return points.iter().map(|p| vec![*p]).collect();
    }
    kmeans(points, k)
}

fn kmeans(points: &[Point], k: usize) -> Vec<Vec<Point>> {
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let mut centroids = seed_centroids(&coords, k);
    let mut assignment = vec![0usize; coords.len()];

    for _ in 0..MAX_ROUNDS {
        let mut changed = false;
        for (i, c) in coords.iter().enumerate() {
            let best = nearest(&centroids, *c);
            if assignment[i] != best {
                assignment[i] = best;
                changed = true;
            }
        }
        if fill_empty_clusters(&coords, &mut centroids, &mut assignment, k) {
            changed = true;
        }
        if !changed {
            break;
        }
        centroids = mean_centroids(&coords, &assignment, k);
    }

    let mut clusters = vec![Vec::new(); k];
    for (i, p) in points.iter().enumerate() {
        clusters[assignment[i]].push(*p);
    }
    clusters
}

/// Farthest-first seeding from the first point in input order; ties go to
/// the lowest index.
fn seed_centroids(coords: &[(f64, f64)], k: usize) -> Vec<(f64, f64)> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(coords[0]);
    while centroids.len() < k {
        let mut far = 0;
        let mut far_dist = -1.0f64;
        for (i, c) in coords.iter().enumerate() {
            let d = centroids
                .iter()
                .map(|s| dist2(*c, *s))
                .fold(f64::INFINITY, f64::min);
            if d > far_dist {
                far_dist = d;
                far = i;
            }
        }
        centroids.push(coords[far]);
    }
    centroids
}

fn nearest(centroids: &[(f64, f64)], p: (f64, f64)) -> usize {
    let mut best = 0;
    let mut best_dist = dist2(p, centroids[0]);
    for (i, c) in centroids.iter().enumerate().skip(1) {
        let d = dist2(p, *c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Every cluster must end up non-empty when `points.len() >= k`: an empty
/// cluster steals the point farthest from its current centroid, taken from
/// a cluster that has more than one member.
fn fill_empty_clusters(
    coords: &[(f64, f64)],
    centroids: &mut [(f64, f64)],
    assignment: &mut [usize],
    k: usize,
) -> bool {
    let mut moved = false;
    loop {
        let mut counts = vec![0usize; k];
        for &a in assignment.iter() {
            counts[a] += 1;
        }
        let empty = match counts.iter().position(|&c| c == 0) {
            Some(e) => e,
            None => break,
        };
        let mut candidate = None;
        let mut candidate_dist = -1.0f64;
        for (i, c) in coords.iter().enumerate() {
            if counts[assignment[i]] < 2 {
                continue;
            }
            let d = dist2(*c, centroids[assignment[i]]);
            if d > candidate_dist {
                candidate_dist = d;
                candidate = Some(i);
            }
        }
        match candidate {
            Some(i) => {
                assignment[i] = empty;
                centroids[empty] = coords[i];
                moved = true;
            }
            None => break,
        }
    }
    moved
}

fn mean_centroids(coords: &[(f64, f64)], assignment: &[usize], k: usize) -> Vec<(f64, f64)> {
    let mut sums = vec![(0.0f64, 0.0f64, 0usize); k];
    for (i, c) in coords.iter().enumerate() {
        let s = &mut sums[assignment[i]];
        s.0 += c.0;
        s.1 += c.1;
        s.2 += 1;
    }
    sums.into_iter()
        .map(|(x, y, n)| {
            let n = n.max(1) as f64;
            (x / n, y / n)
        })
        .collect()
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}
