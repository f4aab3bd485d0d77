//! Orthogonal edge routing helpers.

use crate::geometry::Point;

const EPS: f64 = 1e-9;

/// Which leg of a two-leg step route comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bend {
    HorizontalFirst,
    VerticalFirst,
}

/// Two-leg orthogonal route from `from` to `to`.
pub fn step(from: Point, to: Point, bend: Bend) -> Vec<Point> {
    if (from.x - to.x).abs() < EPS || (from.y - to.y).abs() < EPS {
        return vec![from, to];
    }

    let corner = match bend {
        Bend::HorizontalFirst => Point::new(to.x, from.y),
        Bend::VerticalFirst => Point::new(from.x, to.y),
    };
    normalize_orthogonal(&[from, corner, to])
}

/// Drop repeated points and interior points that lie on a straight run.
pub fn normalize_orthogonal(points: &[Point]) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<Point> = Vec::new();
    for point in points {
        if out
            .last()
            .is_some_and(|p| (p.x - point.x).abs() < EPS && (p.y - point.y).abs() < EPS)
        {
            continue;
        }
        out.push(*point);
    }

    let mut i = 1usize;
    while i + 1 < out.len() {
        let prev = out[i - 1];
        let curr = out[i];
        let next = out[i + 1];
        let collinear = (prev.x - curr.x).abs() < EPS && (curr.x - next.x).abs() < EPS
            || (prev.y - curr.y).abs() < EPS && (curr.y - next.y).abs() < EPS;
        if collinear {
            out.remove(i);
        } else {
            i += 1;
        }
    }

    out
}

pub fn is_orthogonal(points: &[Point]) -> bool {
    points.windows(2).all(|w| {
        let dx = (w[0].x - w[1].x).abs();
        let dy = (w[0].y - w[1].y).abs();
        dx < EPS || dy < EPS
    })
}

/// Point halfway along the polyline, measured by length.
pub fn polyline_midpoint(points: &[Point]) -> Point {
    if points.len() < 2 {
        return points.first().copied().unwrap_or(Point::ZERO);
    }

    let total_len: f64 = points.windows(2).map(|s| s[0].distance(s[1])).sum();
    if total_len <= EPS {
        return points[0];
    }

    let half = total_len * 0.5;
    let mut accum = 0.0;
    for segment in points.windows(2) {
        let seg_len = segment[0].distance(segment[1]);
        if accum + seg_len >= half {
            let t = (half - accum) / seg_len;
            return segment[0] + (segment[1] - segment[0]) * t;
        }
        accum += seg_len;
    }

    points.last().copied().unwrap_or(Point::ZERO)
}

/// Shortest distance from `p` to any leg of the polyline.
pub fn distance_to_polyline(points: &[Point], p: Point) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => only.distance(p),
        _ => points
            .windows(2)
            .map(|s| distance_to_segment(s[0], s[1], p))
            .fold(f64::INFINITY, f64::min),
    }
}

fn distance_to_segment(a: Point, b: Point, p: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= EPS {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}
