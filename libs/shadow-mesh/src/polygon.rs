//! # 2D Polygon
//!
//! An outer boundary loop plus zero or more hole loops. Loops are implicitly
//! closed (the last point connects back to the first).

use crate::error::{ShadowError, ShadowResult};
use glam::DVec2;
use robust::{orient2d, Coord};
use serde::{Deserialize, Serialize};

/// A simple 2D polygon with optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary vertices
    pub outer: Vec<DVec2>,
    /// Hole boundaries
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon {
    /// Creates a new polygon from outer boundary vertices.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shadow_mesh::Polygon;
    /// use glam::DVec2;
    ///
    /// let square = Polygon::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(1.0, 0.0),
    ///     DVec2::new(1.0, 1.0),
    ///     DVec2::new(0.0, 1.0),
    /// ]);
    /// assert_eq!(square.area(), 1.0);
    /// ```
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Creates a square polygon.
    ///
    /// # Arguments
    ///
    /// * `size` - Width and height
    /// * `center` - If true, center at origin
    pub fn square(size: DVec2, center: bool) -> Self {
        let (x, y) = if center {
            (-size.x / 2.0, -size.y / 2.0)
        } else {
            (0.0, 0.0)
        };

        Self::new(vec![
            DVec2::new(x, y),
            DVec2::new(x + size.x, y),
            DVec2::new(x + size.x, y + size.y),
            DVec2::new(x, y + size.y),
        ])
    }

    /// Creates a circle polygon centered at the origin.
    pub fn circle(radius: f64, segments: u32) -> Self {
        let vertices = (0..segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * (i as f64) / (segments as f64);
                DVec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::new(vertices)
    }

    /// Returns the number of vertices in the outer boundary.
    pub fn vertex_count(&self) -> usize {
        self.outer.len()
    }

    /// Returns the total number of vertices across all loops.
    pub fn total_vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Iterates over all loops, outer boundary first.
    pub fn loops(&self) -> impl Iterator<Item = &[DVec2]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Checks that every loop has at least three points and finite
    /// coordinates.
    pub fn validate(&self) -> ShadowResult<()> {
        for (i, ring) in self.loops().enumerate() {
            let name = if i == 0 {
                "outer boundary".to_string()
            } else {
                format!("hole {}", i - 1)
            };
            if ring.len() < 3 {
                return Err(ShadowError::invalid_polygon(format!(
                    "{name} has {} points, at least 3 required",
                    ring.len()
                )));
            }
            if !ring.iter().all(|p| p.is_finite()) {
                return Err(ShadowError::invalid_polygon(format!(
                    "{name} has non-finite coordinates"
                )));
            }
        }
        Ok(())
    }

    /// Enclosed area: outer area minus hole areas, independent of loop
    /// orientation.
    pub fn area(&self) -> f64 {
        let outer = signed_area(&self.outer).abs();
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        (outer - holes).max(0.0)
    }

    /// Total boundary length of all loops.
    pub fn perimeter(&self) -> f64 {
        self.loops().map(loop_length).sum()
    }

    /// Returns a copy scaled independently along x and y.
    pub fn scaled(&self, scale: DVec2) -> Self {
        Self {
            outer: self.outer.iter().map(|p| *p * scale).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(|p| *p * scale).collect())
                .collect(),
        }
    }

    /// Translates the polygon by the given offset.
    pub fn translate(&mut self, offset: DVec2) {
        for vertex in &mut self.outer {
            *vertex += offset;
        }
        for hole in &mut self.holes {
            for vertex in hole {
                *vertex += offset;
            }
        }
    }

    /// Even-odd point-in-polygon test across all loops.
    ///
    /// Points exactly on an edge may be reported either way.
    pub fn contains(&self, point: DVec2) -> bool {
        let crossings: i32 = self.loops().map(|ring| crossing_count(ring, point)).sum();
        crossings % 2 != 0
    }

    /// Distance from `point` to the nearest edge of any loop.
    pub fn boundary_distance(&self, point: DVec2) -> f64 {
        self.loops()
            .flat_map(|ring| ring_edges(ring))
            .map(|(a, b)| segment_distance(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Shoelace signed area; positive for counter-clockwise loops.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    ring_edges(ring)
        .map(|(a, b)| a.perp_dot(b))
        .sum::<f64>()
        / 2.0
}

/// Returns true if the loop winds counter-clockwise.
pub fn is_ccw(ring: &[DVec2]) -> bool {
    signed_area(ring) > 0.0
}

/// Length of a closed loop.
pub fn loop_length(ring: &[DVec2]) -> f64 {
    ring_edges(ring).map(|(a, b)| a.distance(b)).sum()
}

/// Iterates over the closed edges of a loop.
pub(crate) fn ring_edges(ring: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Distance from `p` to the segment `a`-`b`.
pub(crate) fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Crossing number of a loop around `point`, using exact orientation.
fn crossing_count(ring: &[DVec2], point: DVec2) -> i32 {
    let p = coord(point);
    let mut crossings = 0;
    for (a, b) in ring_edges(ring) {
        let upward = a.y <= point.y && b.y > point.y;
        let downward = b.y <= point.y && a.y > point.y;
        if upward && orient2d(coord(a), coord(b), p) > 0.0 {
            crossings += 1;
        } else if downward && orient2d(coord(a), coord(b), p) < 0.0 {
            crossings += 1;
        }
    }
    crossings
}

#[inline]
fn coord(p: DVec2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}
