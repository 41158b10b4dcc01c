//! 2D polygon area and triangulation.

use keel_math::Vec2;

const EPS: f64 = 1e-12;

/// Shoelace signed area: positive for counter-clockwise winding.
pub fn signed_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    0.5 * twice_area
}

/// Ear-clipping triangulation of a simple polygon.
///
/// Handles concave polygons and tolerates collinear vertices. Returns
/// index triples into `points`, wound counter-clockwise regardless of
/// the input winding. Returns `None` for polygons with fewer than three
/// vertices, near-zero area, or a self-intersecting boundary.
pub fn triangulate(points: &[Vec2]) -> Option<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let area = signed_area(points);
    if area.abs() < EPS {
        return None;
    }

    // Traverse counter-clockwise; `order` holds original indices.
    let mut order: Vec<usize> = (0..n).collect();
    if area < 0.0 {
        order.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while order.len() > 3 {
        let m = order.len();
        let mut clipped = false;
        for i in 0..m {
            let prev = order[(i + m - 1) % m];
            let curr = order[i];
            let next = order[(i + 1) % m];
            if cross(points[prev], points[curr], points[next]) <= EPS {
                continue; // reflex or collinear corner
            }
            let blocked = order.iter().any(|&j| {
                j != prev
                    && j != curr
                    && j != next
                    && point_in_triangle(points[j], points[prev], points[curr], points[next])
            });
            if blocked {
                continue;
            }
            triangles.push([prev, curr, next]);
            order.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            return None; // no ear: degenerate or self-intersecting boundary
        }
    }
    triangles.push([order[0], order[1], order[2]]);
    Some(triangles)
}

/// Z component of (b - a) x (c - a).
fn cross(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    (b - a).perp(&(c - a))
}

/// Strict interior test against a counter-clockwise triangle.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) > EPS && cross(b, c, p) > EPS && cross(c, a, p) > EPS
}
