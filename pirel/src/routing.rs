//! Automatic routing of traces around a clearance region.
//!
//! A route connects a source port to a destination port. If the destination sits at or
//! below the bottom of the clearance rectangle and the two ports face each other, the
//! route is a direct S-curve. Otherwise the route detours around the left or right side
//! of the clearance and approaches the destination from outside, along the direction
//! the destination port faces.

use std::fmt::Display;
use std::str::FromStr;

use geometry::prelude::{Path, Point, Port, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The side on which a detour passes the clearance region.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Pick the shorter valid detour, preferring the left on ties.
    #[default]
    Auto,
    /// Always pass on the left.
    Left,
    /// Always pass on the right.
    Right,
}

impl Side {
    /// Every side, in the order used by parameter domains.
    pub const ALL: [Side; 3] = [Side::Auto, Side::Left, Side::Right];

    /// The lowercase name of the side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Auto => "auto",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Side::ALL
            .into_iter()
            .find(|side| side.as_str() == s)
            .ok_or_else(|| format!("unknown routing side `{s}`"))
    }
}

/// A candidate route.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The side the route passes on, or [`Side::Auto`] for a direct S-curve.
    pub side: Side,
    /// The pruned waypoints.
    pub path: Path,
    /// Whether the route stays clear of the clearance interior.
    pub valid: bool,
}

impl Candidate {
    fn new(side: Side, waypoints: Vec<Point>, from: &Port, to: &Port, clearance: &Rect) -> Self {
        let path = Path::new(waypoints).pruned();
        let valid = !clearance.contains_strictly(&from.center())
            && !clearance.contains_strictly(&to.center())
            && !path
                .segments()
                .any(|(a, b)| clearance.crosses_segment(a, b));
        Self { side, path, valid }
    }

    /// The Euclidean length of the route.
    pub fn length(&self) -> f64 {
        self.path.length()
    }
}

/// Returns `true` if the direct S-curve applies.
fn is_direct(from: &Port, to: &Port, clearance: &Rect) -> bool {
    to.center().y() <= clearance.bot() && from.opposes(to)
}

/// Computes the candidate routes from `from` to `to`.
///
/// Returns a single S-curve candidate when the direct case applies, and otherwise the
/// left detour followed by the right detour.
pub fn candidates(from: &Port, to: &Port, clearance: &Rect, width: f64) -> Vec<Candidate> {
    let src = from.center();
    let dst = to.center();

    if is_direct(from, to, clearance) {
        let mid = (src.y() + dst.y()) / 2.;
        let waypoints = vec![
            src,
            Point::new(src.x(), mid),
            Point::new(dst.x(), mid),
            dst,
        ];
        return vec![Candidate::new(Side::Auto, waypoints, from, to, clearance)];
    }

    let below = clearance.bot() - width;
    let lead = to.advanced(width).center();
    let above = (clearance.top() + width).max(lead.y());
    [
        (Side::Left, clearance.left() - width),
        (Side::Right, clearance.right() + width),
    ]
    .into_iter()
    .map(|(side, x)| {
        let waypoints = vec![
            src,
            Point::new(src.x(), below),
            Point::new(x, below),
            Point::new(x, above),
            Point::new(lead.x(), above),
            lead,
            dst,
        ];
        Candidate::new(side, waypoints, from, to, clearance)
    })
    .collect()
}

/// Chooses a route from `from` to `to` that avoids the interior of `clearance`.
///
/// With [`Side::Auto`] the strictly shorter valid detour wins and ties go to the left.
/// A forced side fails if its detour crosses the clearance. The returned path is
/// pruned but not smoothed.
///
/// # Examples
///
/// ```
/// use pirel::geometry::prelude::*;
/// use pirel::routing::{route, Side};
///
/// let from = Port::new("sig", Point::new(200., 0.), 50., 90.);
/// let to = Port::new("top", Point::new(250., 550.), 50., 90.);
/// let clearance = Rect::from_sides(0., 250., 300., 550.);
///
/// let path = route(&from, &to, &clearance, Side::Auto, 50.).unwrap();
/// assert_eq!(path.length(), 900.);
/// ```
pub fn route(from: &Port, to: &Port, clearance: &Rect, side: Side, width: f64) -> Result<Path> {
    let candidates = candidates(from, to, clearance, width);
    let chosen = match side {
        Side::Auto => candidates
            .into_iter()
            .filter(|c| c.valid)
            .fold(None::<Candidate>, |best, c| match best {
                Some(best) if best.length() <= c.length() => Some(best),
                _ => Some(c),
            }),
        forced => candidates
            .into_iter()
            .find(|c| c.valid && (c.side == forced || c.side == Side::Auto)),
    };

    match chosen {
        Some(candidate) => {
            tracing::trace!(
                from = %from.name(),
                to = %to.name(),
                side = %candidate.side,
                length = candidate.length(),
                "routed trace"
            );
            Ok(candidate.path)
        }
        None => Err(Error::RoutingImpossible {
            from: from.name().clone(),
            to: to.name().clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geometry::prelude::*;

    use super::*;
    use test_log::test;

    fn clearance() -> Rect {
        Rect::from_sides(0., 250., 300., 550.)
    }

    fn source() -> Port {
        Port::new("sig", Point::new(200., 0.), 50., 90.)
    }

    #[test]
    fn detours_have_expected_lengths() {
        let to = Port::new("top", Point::new(100., 550.), 50., 90.);
        let cands = candidates(&source(), &to, &clearance(), 50.);
        assert_eq!(cands.len(), 2);
        assert!(cands.iter().all(|c| c.valid));
        assert_relative_eq!(cands[0].length(), 1050.);
        assert_relative_eq!(cands[1].length(), 1050.);
        assert_eq!(
            cands[0].path.points(),
            &[
                Point::new(200., 0.),
                Point::new(200., 200.),
                Point::new(-50., 200.),
                Point::new(-50., 600.),
                Point::new(100., 600.),
                Point::new(100., 550.),
            ]
        );
    }

    #[test]
    fn equal_detours_prefer_left() {
        let to = Port::new("top", Point::new(100., 550.), 50., 90.);
        for _ in 0..3 {
            let path = route(&source(), &to, &clearance(), Side::Auto, 50.).unwrap();
            assert!(path.points().iter().any(|p| p.x() == -50.));
        }
    }

    #[test]
    fn selects_strictly_shorter_detour() {
        let to = Port::new("top", Point::new(250., 550.), 50., 90.);
        let auto = route(&source(), &to, &clearance(), Side::Auto, 50.).unwrap();
        assert_relative_eq!(auto.length(), 900.);
        assert!(auto.points().iter().any(|p| p.x() == 350.));

        let left = route(&source(), &to, &clearance(), Side::Left, 50.).unwrap();
        assert_relative_eq!(left.length(), 1200.);
    }

    #[test]
    fn mirrored_geometry_mirrors_choice() {
        let from = Port::new("sig", Point::new(100., 0.), 50., 90.);
        let to = Port::new("top", Point::new(50., 550.), 50., 90.);
        let path = route(&from, &to, &clearance(), Side::Auto, 50.).unwrap();
        assert!(path.points().iter().any(|p| p.x() == -50.));
    }

    #[test]
    fn direct_s_curve_below_clearance() {
        let to = Port::new("bottom", Point::new(150., 250.), 50., 270.);
        let cands = candidates(&source(), &to, &clearance(), 50.);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].side, Side::Auto);
        assert_eq!(
            cands[0].path.points(),
            &[
                Point::new(200., 0.),
                Point::new(200., 125.),
                Point::new(150., 125.),
                Point::new(150., 250.),
            ]
        );
        // A forced side still accepts the direct route.
        assert!(route(&source(), &to, &clearance(), Side::Right, 50.).is_ok());
    }

    #[test]
    fn destination_inside_clearance_is_impossible() {
        let to = Port::new("inner", Point::new(150., 400.), 50., 90.);
        let err = route(&source(), &to, &clearance(), Side::Auto, 50.).unwrap_err();
        assert!(matches!(err, Error::RoutingImpossible { .. }));
    }
}
