//! Polyline paths: pruning, smoothing, and extrusion into traces.

use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::polygon::Polygon;
use crate::transform::{Transform, Transformation};

/// Miter joins longer than this multiple of the half-width are clipped.
const MITER_LIMIT: f64 = 4.;

/// An ordered list of waypoints.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    /// Creates a path through the given waypoints.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// The waypoints of the path.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The first waypoint, if any.
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// The last waypoint, if any.
    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Iterates over consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// The cumulative Euclidean length of the path.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let path = Path::new([Point::new(0., 0.), Point::new(3., 4.), Point::new(3., 10.)]);
    /// assert_eq!(path.length(), 11.);
    /// ```
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.dist(b)).sum()
    }

    /// Removes duplicate waypoints and waypoints that do not change the direction of
    /// travel, including points where the path doubles back on itself.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let path = Path::new([
    ///     Point::new(0., 0.),
    ///     Point::new(0., 0.),
    ///     Point::new(0., 5.),
    ///     Point::new(0., 10.),
    ///     Point::new(0., 8.),
    ///     Point::new(4., 8.),
    /// ]);
    /// assert_eq!(
    ///     path.pruned().points(),
    ///     &[Point::new(0., 0.), Point::new(0., 8.), Point::new(4., 8.)]
    /// );
    /// ```
    pub fn pruned(&self) -> Path {
        let mut out: Vec<Point> = Vec::with_capacity(self.points.len());
        for &p in &self.points {
            if out.last().is_some_and(|last| last.approx_eq(p)) {
                continue;
            }
            while out.len() >= 2 {
                let a = out[out.len() - 2];
                let b = out[out.len() - 1];
                let tolerance = crate::EPSILON * (1. + (b - a).norm() * (p - b).norm());
                if (b - a).cross(p - b).abs() <= tolerance {
                    out.pop();
                    if out.last().is_some_and(|last| last.approx_eq(p)) {
                        break;
                    }
                } else {
                    break;
                }
            }
            if !out.last().is_some_and(|last| last.approx_eq(p)) {
                out.push(p);
            }
        }
        Path { points: out }
    }

    /// Replaces every interior corner with a curved fillet of at most `radius`,
    /// approximated by `segments` straight pieces.
    ///
    /// Fillets are quadratic Bezier arcs tangent to both adjacent segments. The
    /// radius shrinks so that no fillet consumes more than half of a segment.
    pub fn smoothed(&self, radius: f64, segments: usize) -> Path {
        let path = self.pruned();
        let n = path.points.len();
        if n < 3 || segments == 0 || radius <= 0. {
            return path;
        }
        let mut out = vec![path.points[0]];
        for i in 1..n - 1 {
            let (a, b, c) = (path.points[i - 1], path.points[i], path.points[i + 1]);
            let (Some(u1), Some(u2)) = ((a - b).unit(), (c - b).unit()) else {
                out.push(b);
                continue;
            };
            let cos = u1.dot(u2).clamp(-1., 1.);
            let half = cos.acos() / 2.;
            let tan = half.tan();
            if tan <= crate::EPSILON {
                out.push(b);
                continue;
            }
            let tangent = (radius / tan)
                .min(a.dist(b) / 2.)
                .min(c.dist(b) / 2.);
            let p1 = b + u1 * tangent;
            let p2 = b + u2 * tangent;
            for k in 0..=segments {
                let t = k as f64 / segments as f64;
                let q = p1 * ((1. - t) * (1. - t)) + b * (2. * (1. - t) * t) + p2 * (t * t);
                out.push(q);
            }
        }
        out.push(path.points[n - 1]);
        Path { points: out }.dedup()
    }

    fn dedup(mut self) -> Path {
        self.points.dedup_by(|b, a| a.approx_eq(*b));
        self
    }

    /// Extrudes the path into a polygon of constant `width`, joining segments with
    /// clipped miters.
    ///
    /// Returns `None` for paths with fewer than two distinct points.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let path = Path::new([Point::new(0., 0.), Point::new(10., 0.)]);
    /// let trace = path.extrude(2.).unwrap();
    /// assert_eq!(trace.area(), 20.);
    /// ```
    pub fn extrude(&self, width: f64) -> Option<Polygon> {
        let path = self.clone().dedup();
        let pts = &path.points;
        if pts.len() < 2 {
            return None;
        }
        let half = width / 2.;
        let normals: Vec<Point> = pts
            .windows(2)
            .map(|w| {
                (w[1] - w[0])
                    .unit()
                    .map(|u| u.rotate(90.))
                    .unwrap_or_default()
            })
            .collect();
        let mut left = Vec::with_capacity(pts.len());
        let mut right = Vec::with_capacity(pts.len());
        for (i, &p) in pts.iter().enumerate() {
            let offset = if i == 0 {
                normals[0] * half
            } else if i == pts.len() - 1 {
                normals[i - 1] * half
            } else {
                let sum = normals[i - 1] + normals[i];
                match sum.unit() {
                    Some(miter) => {
                        let cos = miter.dot(normals[i]);
                        let len = if cos <= crate::EPSILON {
                            half * MITER_LIMIT
                        } else {
                            (half / cos).min(half * MITER_LIMIT)
                        };
                        miter * len
                    }
                    None => normals[i] * half,
                }
            };
            left.push(p + offset);
            right.push(p - offset);
        }
        right.reverse();
        left.extend(right);
        Some(Polygon::from_verts(left))
    }
}

impl Transform for Path {
    fn transform(&self, trans: Transformation) -> Self {
        Self {
            points: self.points.iter().map(|p| trans.apply(*p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn smoothing_keeps_endpoints_and_shortens_corners() {
        let path = Path::new([
            Point::new(0., 0.),
            Point::new(0., 100.),
            Point::new(100., 100.),
        ]);
        let smooth = path.smoothed(20., 8);
        assert_eq!(smooth.start(), Some(Point::new(0., 0.)));
        assert_eq!(smooth.end(), Some(Point::new(100., 100.)));
        assert!(smooth.length() < path.length());
        assert!(smooth.points().len() > path.points().len());
    }

    #[test]
    fn extruded_l_has_expected_area() {
        let path = Path::new([
            Point::new(0., 0.),
            Point::new(0., 10.),
            Point::new(10., 10.),
        ]);
        let trace = path.extrude(2.).unwrap();
        // Two 10x2 arms with the mitered corner counted once.
        assert_relative_eq!(trace.area(), 40., epsilon = 1e-9);
    }
}
