//! # Shadow Projection
//!
//! Projects a surface onto an axis-aligned plane from a point light.
//!
//! ## Algorithm Overview
//!
//! For each vertex, with `ln` the light's signed offset from the plane and
//! `nv` the vertex's:
//!
//! 1. Vertices on the far side of the plane (`nv` and `ln` of opposite sign)
//!    are dropped straight onto the plane at their own in-plane position
//! 2. Vertices strictly between the plane and the light use the perspective
//!    divide `t = ln / (ln - nv)`
//! 3. Vertices level with or beyond the light, or whose divide is not
//!    finite, are pushed out along their in-plane direction from the light
//!    to a fixed extent
//!
//! Faces are copied unchanged; only positions move. Per-vertex work runs on
//! `rayon` and gives the same result as a sequential pass.

mod session;


pub use session::ShadowSession;

use crate::error::{ShadowError, ShadowResult};
use crate::surface::Surface;
use config::constants::{AUTO_ATTENUATION_FACTOR, FAR_SHADOW_EXTENT};
use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Coordinate axis normal to a projection plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    /// All three axes, in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Component indices of the two in-plane axes.
    #[inline]
    pub fn in_plane(self) -> [usize; 2] {
        match self {
            Axis::X => [1, 2],
            Axis::Y => [0, 2],
            Axis::Z => [0, 1],
        }
    }
}

impl FromStr for Axis {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(ShadowError::configuration(format!(
                "unknown axis '{other}', expected one of: x, y, z"
            ))),
        }
    }
}

/// Axis-aligned plane: all points whose `axis` coordinate equals `offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub axis: Axis,
    pub offset: f64,
}

impl Plane {
    pub fn new(axis: Axis, offset: f64) -> Self {
        Self { axis, offset }
    }

    /// Signed distance of `point` from the plane along its axis.
    #[inline]
    pub fn signed_offset(&self, point: DVec3) -> f64 {
        point[self.axis.index()] - self.offset
    }

    /// Returns true if `point` lies exactly on the plane.
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        point[self.axis.index()] == self.offset
    }

    /// Returns `point` with its plane-axis coordinate forced onto the plane.
    #[inline]
    fn place(&self, mut point: DVec3) -> DVec3 {
        point[self.axis.index()] = self.offset;
        point
    }
}

/// Distance-based fade of shadow vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attenuation {
    /// No weights are computed
    #[default]
    Off,
    /// Weights fall to zero at this distance from the light (0 disables)
    Radius(f64),
    /// Radius is [`AUTO_ATTENUATION_FACTOR`] times the light's distance from
    /// the origin
    Auto,
}

impl Attenuation {
    /// Returns the effective radius for `light`, or `None` when no weights
    /// should be computed.
    pub fn resolve(&self, light: DVec3) -> Option<f64> {
        match *self {
            Attenuation::Off => None,
            Attenuation::Radius(radius) if radius == 0.0 => None,
            Attenuation::Radius(radius) => Some(radius),
            Attenuation::Auto => {
                let radius = AUTO_ATTENUATION_FACTOR * light.length();
                // Lights near f64::MAX overflow the length
                Some(if radius.is_finite() { radius } else { f64::MAX })
            }
        }
    }

    fn validate(&self) -> ShadowResult<()> {
        match *self {
            Attenuation::Radius(radius) if !radius.is_finite() || radius < 0.0 => {
                Err(ShadowError::configuration(format!(
                    "attenuation radius must be finite and non-negative: {radius}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Parameters for shadow projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Target plane (default: z = 0)
    pub plane: Plane,
    /// Attenuation mode (default: off)
    pub attenuation: Attenuation,
}

impl ShadowConfig {
    /// Checks every option before any geometric work.
    pub fn validate(&self) -> ShadowResult<()> {
        if !self.plane.offset.is_finite() {
            return Err(ShadowError::configuration(format!(
                "plane offset must be finite: {}",
                self.plane.offset
            )));
        }
        self.attenuation.validate()
    }
}

/// A projected shadow and its optional per-vertex weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shadow {
    /// Shadow geometry; same faces as the input, vertices on the plane
    pub surface: Surface,
    /// One weight in [0, 1] per shadow vertex, when attenuation is on
    pub weights: Option<Vec<f64>>,
}

impl Shadow {
    /// The "no shadow" result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }
}

/// How a vertex's shadow point was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RayCase {
    Perspective,
    Clamped,
    Extended,
}

/// Projects `surface` onto `config.plane` from a point light.
///
/// An input without faces gives [`Shadow::empty`]. Every output coordinate
/// is finite for finite inputs.
///
/// # Errors
///
/// [`ShadowError::Configuration`] for a non-finite light or plane offset, or
/// a negative / non-finite attenuation radius.
///
/// # Example
///
/// ```rust
/// use shadow_mesh::{project, ShadowConfig, Surface};
/// use glam::DVec3;
///
/// let surface = Surface::new(
///     vec![DVec3::new(0.0, 0.0, 1.0), DVec3::new(1.0, 0.0, 1.0), DVec3::new(0.0, 1.0, 1.0)],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
/// let shadow = project(&surface, DVec3::new(0.0, 0.0, 2.0), &ShadowConfig::default()).unwrap();
///
/// // Halfway between light and floor: the shadow is twice as large
/// assert_eq!(shadow.surface.vertex(1), DVec3::new(2.0, 0.0, 0.0));
/// assert!(shadow.weights.is_none());
/// ```
pub fn project(surface: &Surface, light: DVec3, config: &ShadowConfig) -> ShadowResult<Shadow> {
    config.validate()?;
    validate_light(light)?;

    if surface.is_empty() {
        log::debug!("surface has no faces, no shadow cast");
        return Ok(Shadow::empty());
    }

    let radius = config.attenuation.resolve(light);
    let extent = far_extent(radius);
    let plane = config.plane;

    let projected: Vec<(DVec3, RayCase)> = surface
        .vertices()
        .par_iter()
        .map(|&vertex| project_vertex(vertex, light, plane, extent))
        .collect();

    let clamped = projected.iter().filter(|(_, c)| *c == RayCase::Clamped).count();
    let extended = projected.iter().filter(|(_, c)| *c == RayCase::Extended).count();
    log::trace!(
        "{} vertices clamped behind the plane, {} pushed to the far extent",
        clamped,
        extended
    );

    let vertices: Vec<DVec3> = projected.into_iter().map(|(p, _)| p).collect();

    let weights = radius.map(|radius| {
        vertices
            .par_iter()
            .map(|p| attenuation_weight(p.distance(light), radius))
            .collect::<Vec<_>>()
    });

    log::debug!(
        "projected {} vertices / {} faces onto {:?} = {} (attenuation radius {:?})",
        vertices.len(),
        surface.face_count(),
        plane.axis,
        plane.offset,
        radius
    );

    Ok(Shadow {
        surface: Surface::from_trusted(vertices, surface.faces().to_vec()),
        weights,
    })
}

/// Projects the same surface onto several planes, one shadow per plane.
///
/// Renderers showing up to three walls call this with the walls they
/// selected; the selection itself stays with the caller.
pub fn project_onto_walls(
    surface: &Surface,
    light: DVec3,
    walls: &[Plane],
    attenuation: Attenuation,
) -> ShadowResult<Vec<Shadow>> {
    let configs: Vec<ShadowConfig> = walls
        .iter()
        .map(|&plane| ShadowConfig { plane, attenuation })
        .collect();
    for config in &configs {
        config.validate()?;
    }

    configs
        .iter()
        .map(|config| project(surface, light, config))
        .collect()
}

/// Projects a single point onto `plane` from `light`, with the same rules
/// as [`project`] and attenuation off.
pub fn project_point(point: DVec3, light: DVec3, plane: Plane) -> DVec3 {
    project_vertex(point, light, plane, FAR_SHADOW_EXTENT).0
}

/// Fade weight for a shadow point `distance` away from the light.
///
/// 1 at the light, falling linearly to 0 at `radius` and beyond. A
/// non-positive radius keeps only points exactly at the light. Overflowed
/// or NaN distances weigh 0.
pub fn attenuation_weight(distance: f64, radius: f64) -> f64 {
    if radius.is_nan() || radius <= 0.0 {
        return if distance <= 0.0 { 1.0 } else { 0.0 };
    }
    if distance.is_nan() || distance >= radius {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

pub(crate) fn validate_light(light: DVec3) -> ShadowResult<()> {
    if !light.is_finite() {
        return Err(ShadowError::configuration(format!(
            "light position must be finite: {light}"
        )));
    }
    Ok(())
}

fn far_extent(radius: Option<f64>) -> f64 {
    match radius {
        Some(radius) if radius > 0.0 && (2.0 * radius).is_finite() => 2.0 * radius,
        _ => FAR_SHADOW_EXTENT,
    }
}

fn project_vertex(vertex: DVec3, light: DVec3, plane: Plane, extent: f64) -> (DVec3, RayCase) {
    let ln = plane.signed_offset(light);
    let nv = plane.signed_offset(vertex);

    if ln * nv < 0.0 {
        return (plane.place(vertex), RayCase::Clamped);
    }

    if nv.abs() < ln.abs() {
        let t = ln / (ln - nv);
        let point = vertex * t + light * (1.0 - t);
        if t.is_finite() && point.is_finite() {
            return (plane.place(point), RayCase::Perspective);
        }
    }

    (extend_ray(vertex, light, plane, extent), RayCase::Extended)
}

/// Pushes a vertex out along its in-plane direction from the light.
fn extend_ray(vertex: DVec3, light: DVec3, plane: Plane, extent: f64) -> DVec3 {
    let mut direction = vertex - light;
    direction[plane.axis.index()] = 0.0;
    let direction = direction.normalize_or_zero();

    let far = plane.place(light + direction * extent);
    if far.is_finite() {
        far
    } else {
        plane.place(light)
    }
}
