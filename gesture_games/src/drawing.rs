//! Path geometry for the drawing games: densifying target polygons and
//! scoring a drawn path against them.

use hand_tracking::Point;
use score_ledger::tracker::round_to;

/// A drawn point this far from the ideal path scores zero.
pub const MAX_DISTANCE: f64 = 50.0;

/// Steps shorter than this count towards jitter.
pub const JITTER_THRESHOLD: f64 = 10.0;

/// Minimum spacing when resampling a drawn path.
pub const RESAMPLE_STEP: f64 = 5.0;

fn lerp(a: Point, b: Point, t: f64) -> Point {
    let x = a.x as f64 + (b.x - a.x) as f64 * t;
    let y = a.y as f64 + (b.y - a.y) as f64 * t;
    // Truncate toward zero.
    Point::new(x as i32, y as i32)
}

/// Closed polygon densified at a fixed pixel `step`.
///
/// Every edge, including last-to-first, contributes
/// `max(floor(len / step), 1)` points starting at its first vertex.
pub fn interpolate_by_step(points: &[Point], step: f64) -> Vec<Point> {
    let n = points.len();
    let mut dense = Vec::new();
    for i in 0..n {
        let start = points[i];
        let end = points[(i + 1) % n];
        let steps = ((start.distance(end) / step) as usize).max(1);
        for j in 0..steps {
            dense.push(lerp(start, end, j as f64 / steps as f64));
        }
    }
    dense
}

/// Closed polygon with `per_edge` evenly spaced samples on every edge,
/// both endpoints included.
pub fn interpolate_per_edge(points: &[Point], per_edge: usize) -> Vec<Point> {
    let n = points.len();
    let mut dense = Vec::with_capacity(n * per_edge);
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        for k in 0..per_edge {
            let t = if per_edge > 1 { k as f64 / (per_edge - 1) as f64 } else { 0.0 };
            dense.push(lerp(p1, p2, t));
        }
    }
    dense
}

/// Drop points closer than `step` to the last kept point.
pub fn resample(points: &[Point], step: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::new();
    for &p in points {
        match out.last() {
            Some(&last) if p.distance(last) < step => {}
            _ => out.push(p),
        }
    }
    out
}

/// Percentage of closeness to the ideal path, two decimals.
///
/// Each drawn point scores `max(0, 1 - d / MAX_DISTANCE)` where `d` is the
/// distance to the nearest ideal point; the result is the mean times 100.
/// An empty drawing, or an empty ideal path, scores 0.
pub fn accuracy(drawn: &[Point], ideal: &[Point]) -> f64 {
    if drawn.is_empty() || ideal.is_empty() {
        return 0.0;
    }
    let total: f64 = drawn
        .iter()
        .map(|&dp| {
            let nearest = ideal
                .iter()
                .map(|&ip| dp.distance(ip))
                .fold(f64::INFINITY, f64::min);
            (1.0 - nearest / MAX_DISTANCE).max(0.0)
        })
        .sum();
    round_to(total / drawn.len() as f64 * 100.0, 2)
}

/// Mean length of the steps shorter than [`JITTER_THRESHOLD`]; 0 when there
/// are none.
pub fn jitter(points: &[Point]) -> f64 {
    let small: Vec<f64> = points
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .filter(|&d| d < JITTER_THRESHOLD)
        .collect();
    if small.is_empty() {
        0.0
    } else {
        small.iter().sum::<f64>() / small.len() as f64
    }
}
