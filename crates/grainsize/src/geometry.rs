//! Planar geometry on contour points: area, perimeter, Douglas-Peucker
//! simplification, convex hull, minimum-area rectangle and minimum enclosing
//! circle.
//!
//! All routines work in `f64` pixel coordinates. Contours come out of
//! `imageproc` as integer points and are converted once with [`to_points`].

use imageproc::point::Point;
use nalgebra::{Point2, Vector2};

/// Convert integer contour points to floating point.
pub fn to_points(contour: &[Point<i32>]) -> Vec<Point2<f64>> {
    contour
        .iter()
        .map(|p| Point2::new(p.x as f64, p.y as f64))
        .collect()
}

/// Enclosed area of a closed polygon (shoelace formula).
pub fn polygon_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        acc += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    acc.abs() * 0.5
}

/// Length of a closed polyline.
pub fn closed_perimeter(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .sum()
}

fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Douglas-Peucker simplification of the open chain `points[first..=last]`.
///
/// Kept vertices are flagged in `keep`. Uses an explicit work stack.
fn simplify_chain(
    points: &[Point2<f64>],
    first: usize,
    last: usize,
    epsilon: f64,
    keep: &mut [bool],
) {
    let mut stack = vec![(first, last)];
    while let Some((a, b)) = stack.pop() {
        if b <= a + 1 {
            continue;
        }
        let (mut far_idx, mut far_dist) = (a, -1.0);
        for i in (a + 1)..b {
            let d = point_segment_distance(&points[i], &points[a], &points[b]);
            if d > far_dist {
                far_dist = d;
                far_idx = i;
            }
        }
        if far_dist > epsilon {
            keep[far_idx] = true;
            stack.push((a, far_idx));
            stack.push((far_idx, b));
        }
    }
}

/// Simplify a closed contour to a polygon with tolerance `epsilon` (pixels).
///
/// The contour is split at its first point and the point farthest from it;
/// both halves are simplified independently. Returned vertices keep contour
/// order and never repeat the first point at the end.
pub fn approx_polygon_closed(points: &[Point2<f64>], epsilon: f64) -> Vec<Point2<f64>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let far = (1..n)
        .max_by(|&i, &j| {
            let di = (points[i] - points[0]).norm_squared();
            let dj = (points[j] - points[0]).norm_squared();
            di.total_cmp(&dj).then(j.cmp(&i))
        })
        .unwrap_or(n / 2);

    // Close the loop by appending the start point, so the second half is far..=n.
    let mut ring = points.to_vec();
    ring.push(points[0]);
    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[far] = true;
    simplify_chain(&ring, 0, far, epsilon, &mut keep);
    simplify_chain(&ring, far, n, epsilon, &mut keep);

    ring.truncate(n);
    ring.into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}

fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull (Andrew's monotone chain), counter-clockwise, no collinear points.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2
            && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2
            && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Rotated rectangle of minimum area enclosing a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinAreaRect {
    pub center: Point2<f64>,
    /// Side length along `angle`.
    pub width: f64,
    /// Side length perpendicular to `angle`.
    pub height: f64,
    /// Direction of the `width` side, degrees in [0, 180).
    pub angle_deg: f64,
}

impl MinAreaRect {
    pub fn long_side(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn short_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// True when either side has zero length.
    pub fn is_degenerate(&self) -> bool {
        let short = self.short_side();
        short.is_nan() || short <= 0.0
    }
}

fn extent_along(points: &[Point2<f64>], axis: &Vector2<f64>) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let t = p.coords.dot(axis);
        (lo.min(t), hi.max(t))
    })
}

/// Minimum-area enclosing rectangle by rotating calipers over the hull edges.
///
/// Returns `None` for an empty input. Collinear or single-point inputs yield a
/// rectangle with a zero-length side, which callers must treat as degenerate.
pub fn min_area_rect(points: &[Point2<f64>]) -> Option<MinAreaRect> {
    let hull = convex_hull(points);
    match hull.len() {
        0 => return None,
        1 => {
            return Some(MinAreaRect {
                center: hull[0],
                width: 0.0,
                height: 0.0,
                angle_deg: 0.0,
            })
        }
        _ => {}
    }

    let mut best: Option<(f64, MinAreaRect)> = None;
    let n = hull.len();
    for i in 0..n {
        let edge = hull[(i + 1) % n] - hull[i];
        let len = edge.norm();
        if len <= f64::EPSILON {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);
        let (u_lo, u_hi) = extent_along(&hull, &u);
        let (v_lo, v_hi) = extent_along(&hull, &v);
        let width = u_hi - u_lo;
        let height = v_hi - v_lo;
        let area = width * height;
        if best.as_ref().is_some_and(|(a, _)| *a <= area) {
            continue;
        }
        let center = Point2::from(u * (0.5 * (u_lo + u_hi)) + v * (0.5 * (v_lo + v_hi)));
        let angle_deg = u.y.atan2(u.x).to_degrees().rem_euclid(180.0);
        best = Some((
            area,
            MinAreaRect {
                center,
                width,
                height,
                angle_deg,
            },
        ));
    }
    best.map(|(_, rect)| rect)
}

/// Smallest circle containing a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnclosingCircle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl EnclosingCircle {
    fn contains(&self, p: &Point2<f64>) -> bool {
        (p - self.center).norm() <= self.radius * (1.0 + 1e-12) + 1e-9
    }

    fn from_two(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        let center = nalgebra::center(a, b);
        Self {
            center,
            radius: (a - center).norm(),
        }
    }

    fn from_three(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Self {
        let d = 2.0 * cross(a, b, c);
        if d.abs() <= f64::EPSILON {
            // Collinear: the circle through the two farthest points.
            let pairs = [(a, b), (a, c), (b, c)];
            let (p, q) = pairs
                .into_iter()
                .max_by(|(p1, q1), (p2, q2)| (*p1 - *q1).norm().total_cmp(&(*p2 - *q2).norm()))
                .unwrap_or((a, b));
            return Self::from_two(p, q);
        }
        let b_rel = b - a;
        let c_rel = c - a;
        let b2 = b_rel.norm_squared();
        let c2 = c_rel.norm_squared();
        let ux = (c_rel.y * b2 - b_rel.y * c2) / d;
        let uy = (b_rel.x * c2 - c_rel.x * b2) / d;
        let offset = Vector2::new(ux, uy);
        Self {
            center: a + offset,
            radius: offset.norm(),
        }
    }
}

/// Minimum enclosing circle (incremental Welzl without shuffling).
///
/// Expected input is a simplified polygon with a handful of vertices, so the
/// cubic worst case is irrelevant.
pub fn min_enclosing_circle(points: &[Point2<f64>]) -> Option<EnclosingCircle> {
    let first = points.first()?;
    let mut circle = EnclosingCircle {
        center: *first,
        radius: 0.0,
    };
    for i in 1..points.len() {
        if circle.contains(&points[i]) {
            continue;
        }
        circle = EnclosingCircle {
            center: points[i],
            radius: 0.0,
        };
        for j in 0..i {
            if circle.contains(&points[j]) {
                continue;
            }
            circle = EnclosingCircle::from_two(&points[i], &points[j]);
            for k in 0..j {
                if !circle.contains(&points[k]) {
                    circle = EnclosingCircle::from_three(&points[i], &points[j], &points[k]);
                }
            }
        }
    }
    Some(circle)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn rect_outline(x0: f64, y0: f64, w: f64, h: f64) -> Vec<Point2<f64>> {
        let mut pts = Vec::new();
        for i in 0..w as i32 {
            pts.push(Point2::new(x0 + i as f64, y0));
        }
        for i in 0..h as i32 {
            pts.push(Point2::new(x0 + w, y0 + i as f64));
        }
        for i in 0..w as i32 {
            pts.push(Point2::new(x0 + w - i as f64, y0 + h));
        }
        for i in 0..h as i32 {
            pts.push(Point2::new(x0, y0 + h - i as f64));
        }
        pts
    }

    #[test]
    fn shoelace_and_perimeter_of_square() {
        let sq = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        assert_abs_diff_eq!(polygon_area(&sq), 100.0);
        assert_abs_diff_eq!(closed_perimeter(&sq), 40.0);
    }

    #[test]
    fn dp_reduces_rectangle_outline_to_corners() {
        let outline = rect_outline(5.0, 7.0, 60.0, 30.0);
        let eps = 0.02 * closed_perimeter(&outline);
        let poly = approx_polygon_closed(&outline, eps);
        assert_eq!(poly.len(), 4, "got {:?}", poly);
        assert_abs_diff_eq!(polygon_area(&poly), 60.0 * 30.0, epsilon = 1e-9);
    }

    #[test]
    fn dp_keeps_more_than_six_vertices_on_a_circle() {
        let outline: Vec<_> = (0..360)
            .map(|deg| {
                let t = (deg as f64).to_radians();
                Point2::new(100.0 + 40.0 * t.cos(), 100.0 + 40.0 * t.sin())
            })
            .collect();
        let eps = 0.02 * closed_perimeter(&outline);
        let poly = approx_polygon_closed(&outline, eps);
        assert!(poly.len() > 6, "circle simplified to {} vertices", poly.len());
    }

    #[test]
    fn min_area_rect_of_rotated_rectangle() {
        let (w, h, theta) = (80.0f64, 30.0f64, 30.0f64.to_radians());
        let (c, s) = (theta.cos(), theta.sin());
        let (hw, hh) = (w / 2.0, h / 2.0);
        let corners: Vec<_> = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .iter()
            .map(|&(x, y)| Point2::new(50.0 + c * x - s * y, 60.0 + s * x + c * y))
            .collect();
        let rect = min_area_rect(&corners).unwrap();
        assert_relative_eq!(rect.long_side(), w, epsilon = 1e-9);
        assert_relative_eq!(rect.short_side(), h, epsilon = 1e-9);
        assert_relative_eq!(rect.center.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(rect.center.y, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn collinear_points_give_degenerate_rect() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(9.0, 0.0)];
        let rect = min_area_rect(&pts).unwrap();
        assert!(rect.is_degenerate());
        assert!(min_area_rect(&[]).is_none());
    }

    #[test]
    fn enclosing_circle_of_polygon_on_circle() {
        let pts: Vec<_> = (0..8)
            .map(|k| {
                let t = k as f64 * std::f64::consts::FRAC_PI_4;
                Point2::new(10.0 + 25.0 * t.cos(), -4.0 + 25.0 * t.sin())
            })
            .collect();
        let circle = min_enclosing_circle(&pts).unwrap();
        assert_relative_eq!(circle.radius, 25.0, epsilon = 1e-9);
        assert_relative_eq!(circle.center.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(circle.center.y, -4.0, epsilon = 1e-9);
        assert!(min_enclosing_circle(&[]).is_none());
    }
}
