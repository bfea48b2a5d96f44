//! # Polygon Densification
//!
//! Refines a 2D polygon so that no boundary edge is longer than
//! `1 / density`, then optionally meshes it into a flat surface.
//!
//! ## Algorithm Overview
//!
//! 1. Reject the request if `area * density^2` or `perimeter * density`
//!    exceeds [`MAX_DENSIFIED_POINTS`] (before any allocation)
//! 2. Split every edge of every loop into `ceil(density * length)` equal
//!    segments, keeping the original vertices
//! 3. Hand the dense polygon to the configured [`PolygonMesher`]
//!
//! Holes are densified exactly like the outer boundary and stay holes.

mod mesher;

#[cfg(test)]
mod tests;

pub use mesher::{BoundaryMesher, ConformingMesher, PolygonMesher};

use crate::error::{ShadowError, ShadowResult};
use crate::polygon::Polygon;
use crate::surface::Surface;
use config::constants::{
    approx_zero, segments_for_length, DEFAULT_DENSITY, MAX_DENSIFIED_POINTS,
};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which polygon-to-mesh strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MesherKind {
    /// Triangulate the densified boundary points only
    #[default]
    Boundary,
    /// Constrained Delaunay refinement with interior points
    Conforming,
}

impl MesherKind {
    /// Names accepted by [`MesherKind::from_str`].
    pub const NAMES: [&'static str; 2] = ["boundary", "conforming"];

    /// Returns the strategy implementation for this kind.
    pub fn mesher(self) -> &'static dyn PolygonMesher {
        match self {
            MesherKind::Boundary => &BoundaryMesher,
            MesherKind::Conforming => &ConformingMesher,
        }
    }
}

impl FromStr for MesherKind {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boundary" => Ok(MesherKind::Boundary),
            "conforming" => Ok(MesherKind::Conforming),
            other => Err(ShadowError::configuration(format!(
                "unknown mesher '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Parameters for densification and meshing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensifyConfig {
    /// Boundary points per unit length
    pub density: f64,
    /// Polygon-to-mesh strategy
    pub mesher: MesherKind,
}

impl Default for DensifyConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            mesher: MesherKind::default(),
        }
    }
}

impl DensifyConfig {
    /// Checks that the density is usable.
    pub fn validate(&self) -> ShadowResult<()> {
        validate_density(self.density)
    }
}

/// Densifies the boundary of `polygon` to `density` points per unit length.
///
/// Every original vertex is kept; points are only added along edges, so the
/// footprint is unchanged.
///
/// # Errors
///
/// - [`ShadowError::Configuration`] if `density` is not finite and positive
/// - [`ShadowError::InvalidPolygon`] if a loop is malformed
/// - [`ShadowError::ResourceLimit`] if `area * density^2` or
///   `perimeter * density` exceeds the ceiling
///
/// # Example
///
/// ```rust
/// use shadow_mesh::{densify, Polygon};
/// use glam::DVec2;
///
/// let square = Polygon::square(DVec2::ONE, false);
/// let dense = densify(&square, 10.0).unwrap();
/// assert_eq!(dense.outer.len(), 40);
/// ```
pub fn densify(polygon: &Polygon, density: f64) -> ShadowResult<Polygon> {
    validate_density(density)?;
    polygon.validate()?;
    check_size_estimate(polygon, density)?;

    let outer = densify_loop(&polygon.outer, density);
    let holes = polygon
        .holes
        .iter()
        .map(|hole| densify_loop(hole, density))
        .collect::<Vec<_>>();

    let dense = Polygon::with_holes(outer, holes);
    // Loops made only of repeated points collapse here
    dense.validate()?;

    log::debug!(
        "densified polygon from {} to {} points at density {}",
        polygon.total_vertex_count(),
        dense.total_vertex_count(),
        density
    );

    Ok(dense)
}

/// Densifies and meshes `polygon` with the configured strategy.
///
/// The result is a flat surface at z = 0 with counter-clockwise faces.
pub fn mesh_polygon(polygon: &Polygon, config: &DensifyConfig) -> ShadowResult<Surface> {
    config.validate()?;
    let mesher = config.mesher.mesher();
    log::debug!("meshing polygon with the {} mesher", mesher.name());
    mesher.mesh(polygon, config.density)
}

/// Pre-flight guard: estimated output size must stay under the ceiling.
///
/// Both the interior estimate (`area * density^2`) and the boundary point
/// count (`perimeter * density`) are checked; thin polygons have almost no
/// area but can still carry a huge boundary.
pub(crate) fn check_size_estimate(polygon: &Polygon, density: f64) -> ShadowResult<()> {
    let interior = polygon.area() * density * density;
    let boundary = polygon.perimeter() * density;
    let estimate = if interior.is_finite() && boundary.is_finite() {
        interior.max(boundary)
    } else {
        f64::INFINITY
    };
    if !estimate.is_finite() || estimate > MAX_DENSIFIED_POINTS as f64 {
        let estimated = if estimate.is_finite() {
            estimate.ceil() as usize
        } else {
            usize::MAX
        };
        return Err(ShadowError::ResourceLimit {
            estimated,
            limit: MAX_DENSIFIED_POINTS,
        });
    }
    Ok(())
}

fn validate_density(density: f64) -> ShadowResult<()> {
    if !density.is_finite() || density <= 0.0 {
        return Err(ShadowError::configuration(format!(
            "density must be a positive finite number: {density}"
        )));
    }
    Ok(())
}

/// Splits each edge of a closed loop into equal segments no longer than
/// `1 / density`. Each point appears once; the loop stays implicitly closed.
fn densify_loop(ring: &[DVec2], density: f64) -> Vec<DVec2> {
    let n = ring.len();
    let mut dense = Vec::with_capacity(n);

    for i in 0..n {
        let start = ring[i];
        let end = ring[(i + 1) % n];
        let length = start.distance(end);
        if approx_zero(length) {
            continue;
        }

        let segments = segments_for_length(length, density);
        dense.push(start);
        for k in 1..segments {
            dense.push(start.lerp(end, k as f64 / segments as f64));
        }
    }

    dense
}
