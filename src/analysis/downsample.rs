//! Largest-Triangle-Three-Buckets downsampling.
//!
//! Reduces a point series to a bounded count for charting while preserving
//! visual extrema. Generic over the point type through X/Y accessor
//! closures so lap series, pace series and raw channel data all go through
//! the same code path.

/// Downsample `points` to `target` points with LTTB.
///
/// Returns the series unchanged when `target >= points.len()` or
/// `target <= 2`. Otherwise the first and last points are always kept; each
/// interior bucket contributes the point forming the largest triangle with
/// the previously selected point and the average point of the NEXT bucket.
/// Single pass per bucket, O(n) overall.
pub fn downsample_lttb<T, FX, FY>(points: &[T], target: usize, x: FX, y: FY) -> Vec<T>
where
    T: Clone,
    FX: Fn(&T) -> f64,
    FY: Fn(&T) -> f64,
{
    let len = points.len();
    if target >= len || target <= 2 {
        return points.to_vec();
    }

    let mut sampled = Vec::with_capacity(target);
    sampled.push(points[0].clone());

    let every = (len - 2) as f64 / (target - 2) as f64;
    let mut selected = 0usize;

    for bucket in 0..target - 2 {
        // Average point of the next bucket; the final bucket's successor is
        // the last point alone
        let next_start = ((bucket + 1) as f64 * every) as usize + 1;
        let next_end = (((bucket + 2) as f64 * every) as usize + 1).min(len);
        let (avg_x, avg_y) = if next_start < next_end {
            let span = (next_end - next_start) as f64;
            let sum_x: f64 = points[next_start..next_end].iter().map(&x).sum();
            let sum_y: f64 = points[next_start..next_end].iter().map(&y).sum();
            (sum_x / span, sum_y / span)
        } else {
            (x(&points[len - 1]), y(&points[len - 1]))
        };

        let range_start = (bucket as f64 * every) as usize + 1;
        let range_end = (((bucket + 1) as f64 * every) as usize + 1).min(len - 1);

        let selected_x = x(&points[selected]);
        let selected_y = y(&points[selected]);

        let mut best_index = range_start;
        let mut best_area = -1.0;
        for index in range_start..range_end {
            let area = ((selected_x - avg_x) * (y(&points[index]) - selected_y)
                - (selected_x - x(&points[index])) * (avg_y - selected_y))
                .abs()
                * 0.5;
            if area > best_area {
                best_area = area;
                best_index = index;
            }
        }

        sampled.push(points[best_index].clone());
        selected = best_index;
    }

    sampled.push(points[len - 1].clone());
    sampled
}
