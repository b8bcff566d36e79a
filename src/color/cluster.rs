//! Generic single-linkage agglomerative clustering.

/// Cluster `items` by repeatedly merging the globally closest pair of
/// clusters, where cluster distance is the closest-member distance.
///
/// Stops once no pair sits within `threshold`. Ties break on scan order, so
/// callers wanting reproducible output should avoid equidistant inputs or
/// assert on membership rather than ordering.
///
/// Quadratic per merge step; inputs here are tens of items, not thousands.
pub fn cluster_by_distance<T, F>(items: Vec<T>, threshold: f32, mut dist: F) -> Vec<Vec<T>>
where
    F: FnMut(&T, &T) -> f32,
{
    let mut clusters: Vec<Vec<T>> = items.into_iter().map(|item| vec![item]).collect();

    while clusters.len() > 1 {
        let mut best: Option<(usize, usize, f32)> = None;

        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let mut closest = f32::MAX;
                for a in &clusters[i] {
                    for b in &clusters[j] {
                        let d = dist(a, b);
                        if d < closest {
                            closest = d;
                        }
                    }
                }
                if best.is_none_or(|(_, _, bd)| closest < bd) {
                    best = Some((i, j, closest));
                }
            }
        }

        match best {
            Some((i, j, d)) if d <= threshold => {
                // remove() keeps emission order insertion-stable.
                let merged = clusters.remove(j);
                clusters[i].extend(merged);
            }
            _ => break,
        }
    }

    clusters
}
