//! # Stereographic Mapping
//!
//! Builds a spherical surface whose shadow, cast from a point light onto
//! z = 0, is a given 2D outline.
//!
//! ## Styles
//!
//! - `north`: inverse stereographic projection. The light sits at the
//!   sphere's north pole, `2 * radius` above the floor.
//! - `center`: gnomonic mapping onto the lower hemisphere. The light sits
//!   at the sphere's centre, `radius` above the floor.
//!
//! ## Algorithm
//!
//! 1. Scale the outline by `scale` and mesh it flat (densify + mesher)
//! 2. Map every vertex onto the unit sphere, scale by `radius` and lift so
//!    the south pole touches the floor
//! 3. Orient faces away from the sphere centre
//! 4. Optionally flatten feet, then close the result into a solid shell

mod shell;


use crate::error::{ShadowError, ShadowResult};
use crate::ops::densify::{mesh_polygon, DensifyConfig};
use crate::ops::shadow::{project, ShadowConfig};
use crate::polygon::{ring_edges, segment_distance, Polygon};
use crate::surface::Surface;
use config::constants::{DEFAULT_FOOT_RADIUS_RATIO, DEFAULT_SPHERE_RADIUS};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Plane-to-sphere mapping, which also fixes where the light must go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StereoStyle {
    /// Light at the north pole
    #[default]
    North,
    /// Light at the sphere centre
    Center,
}

impl StereoStyle {
    /// Names accepted by [`StereoStyle::from_str`].
    pub const NAMES: [&'static str; 2] = ["north", "center"];

    /// Maps a plane point, in units of the sphere radius, onto the unit
    /// sphere centred at the origin.
    ///
    /// Seen from the light of this style, the result lies on the ray
    /// through `(p.x, p.y, -1)`.
    pub fn to_unit_sphere(self, p: DVec2) -> DVec3 {
        match self {
            StereoStyle::North => {
                let q = p / 2.0;
                let h = q.length_squared();
                DVec3::new(2.0 * q.x / (1.0 + h), 2.0 * q.y / (1.0 + h), (h - 1.0) / (h + 1.0))
            }
            StereoStyle::Center => {
                let alpha = p.y.atan2(p.x);
                let beta = 1.0_f64.atan2(p.length());
                DVec3::new(
                    alpha.cos() * beta.cos(),
                    alpha.sin() * beta.cos(),
                    -beta.sin(),
                )
            }
        }
    }

    /// Light height above the unit sphere's centre.
    pub fn base_light_height(self) -> f64 {
        match self {
            StereoStyle::North => 1.0,
            StereoStyle::Center => 0.0,
        }
    }
}

impl FromStr for StereoStyle {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(StereoStyle::North),
            "center" => Ok(StereoStyle::Center),
            other => Err(ShadowError::configuration(format!(
                "unknown stereographic style '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Parameters for [`map_to_surface`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoConfig {
    pub style: StereoStyle,
    /// Sphere radius (default: 1)
    pub radius: f64,
    /// Shell thickness as a fraction of the radius; 0 gives an open surface
    pub solid_shell_ratio: f64,
    /// Flatten the underside near the vertical axis into a standing foot
    pub add_feet: bool,
    /// Foot radius; `None` uses [`DEFAULT_FOOT_RADIUS_RATIO`] of the radius
    pub foot_radius: Option<f64>,
    /// Anisotropic scale applied to the outline first
    pub scale: DVec2,
    /// Densification and meshing of the flat outline
    pub densify: DensifyConfig,
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self {
            style: StereoStyle::default(),
            radius: DEFAULT_SPHERE_RADIUS,
            solid_shell_ratio: 0.0,
            add_feet: false,
            foot_radius: None,
            scale: DVec2::ONE,
            densify: DensifyConfig::default(),
        }
    }
}

impl StereoConfig {
    /// Checks every option before any geometric work.
    pub fn validate(&self) -> ShadowResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ShadowError::configuration(format!(
                "sphere radius must be a positive finite number: {}",
                self.radius
            )));
        }
        if !(0.0..1.0).contains(&self.solid_shell_ratio) {
            return Err(ShadowError::configuration(format!(
                "solid shell ratio must be in [0, 1): {}",
                self.solid_shell_ratio
            )));
        }
        if !self.scale.is_finite() || self.scale.x == 0.0 || self.scale.y == 0.0 {
            return Err(ShadowError::configuration(format!(
                "scale must be finite and non-zero: {}",
                self.scale
            )));
        }
        if let Some(foot) = self.foot_radius {
            if !foot.is_finite() || foot < 0.0 {
                return Err(ShadowError::configuration(format!(
                    "foot radius must be finite and non-negative: {foot}"
                )));
            }
        }
        self.densify.validate()
    }

    /// Foot radius actually used when feet are requested.
    pub fn effective_foot_radius(&self) -> f64 {
        self.foot_radius
            .unwrap_or(DEFAULT_FOOT_RADIUS_RATIO * self.radius)
    }

    /// Centre of the lifted sphere.
    pub fn sphere_center(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.radius)
    }
}

/// A mapped surface and the light height that casts the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoSurface {
    /// Outer shell faces first, then inner shell and side faces if solid
    pub surface: Surface,
    /// Light position is `(0, 0, light_height)`
    pub light_height: f64,
    outer_face_count: usize,
}

impl StereoSurface {
    /// Light position that casts the outline onto z = 0.
    pub fn light(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.light_height)
    }

    /// The outer shell alone: the faces that cast the outline.
    pub fn outer_shell(&self) -> Surface {
        Surface::from_trusted(
            self.surface.vertices().to_vec(),
            self.surface.faces()[..self.outer_face_count].to_vec(),
        )
    }

    /// Number of leading faces forming the outer shell.
    pub fn outer_face_count(&self) -> usize {
        self.outer_face_count
    }

    /// Returns true if the surface is a solid shell.
    pub fn is_solid(&self) -> bool {
        self.outer_face_count < self.surface.face_count()
    }
}

/// Builds a spherical surface whose shadow reproduces `polygon`.
///
/// # Errors
///
/// - [`ShadowError::Configuration`] for an invalid option
/// - [`ShadowError::ResourceLimit`] / [`ShadowError::InvalidPolygon`] /
///   [`ShadowError::Triangulation`] from meshing the outline
/// - [`ShadowError::InvalidSurface`] if the solid shell cannot be closed
///
/// # Example
///
/// ```rust
/// use shadow_mesh::{map_to_surface, Polygon, StereoConfig};
/// use glam::DVec2;
///
/// let outline = Polygon::square(DVec2::ONE, true);
/// let mapped = map_to_surface(&outline, &StereoConfig::default()).unwrap();
/// assert_eq!(mapped.light_height, 2.0);
/// ```
pub fn map_to_surface(polygon: &Polygon, config: &StereoConfig) -> ShadowResult<StereoSurface> {
    config.validate()?;

    let outline = polygon.scaled(config.scale);
    let flat = mesh_polygon(&outline, &config.densify)?;

    let radius = config.radius;
    let center = config.sphere_center();
    let vertices: Vec<DVec3> = flat
        .vertices()
        .iter()
        .map(|v| config.style.to_unit_sphere(v.truncate() / radius) * radius + center)
        .collect();

    let mut outer = shell::orient_outward(
        Surface::from_trusted(vertices, flat.faces().to_vec()),
        center,
    );
    if config.add_feet {
        outer = shell::flatten_feet(&outer, center, config.effective_foot_radius());
    }
    let outer_face_count = outer.face_count();

    let surface = if config.solid_shell_ratio > 0.0 {
        shell::solidify(&outer, center, config.solid_shell_ratio)?
    } else {
        outer
    };

    let light_height = config.style.base_light_height() * radius + radius;

    log::debug!(
        "mapped {} vertices onto a {:?} sphere of radius {} (light at {}, solid: {})",
        flat.vertex_count(),
        config.style,
        radius,
        light_height,
        config.solid_shell_ratio > 0.0
    );

    Ok(StereoSurface {
        surface,
        light_height,
        outer_face_count,
    })
}

/// Hausdorff distance between the outline and the shadow of `mapped`.
///
/// The outer shell is projected from [`StereoSurface::light`] onto z = 0.
/// Its free-boundary vertices are measured against the boundary of
/// `polygon`, and the outline's loop vertices and edge midpoints against the
/// projected free-boundary edges. `polygon` must be the outline after any
/// `scale` was applied.
///
/// # Errors
///
/// [`ShadowError::InvalidSurface`] if the outer shell has no free boundary.
pub fn shadow_deviation(polygon: &Polygon, mapped: &StereoSurface) -> ShadowResult<f64> {
    polygon.validate()?;

    let shadow = project(&mapped.outer_shell(), mapped.light(), &ShadowConfig::default())?;
    let segments: Vec<(DVec2, DVec2)> = shadow
        .surface
        .free_boundary_edges()
        .iter()
        .map(|&[a, b]| {
            (
                shadow.surface.vertex(a).truncate(),
                shadow.surface.vertex(b).truncate(),
            )
        })
        .collect();

    if segments.is_empty() {
        return Err(ShadowError::invalid_surface(
            "outer shell has no free boundary to compare",
        ));
    }

    let shadow_to_outline = segments
        .iter()
        .map(|&(p, _)| polygon.boundary_distance(p))
        .fold(0.0, f64::max);

    let outline_to_shadow = polygon
        .loops()
        .flat_map(|ring| ring_edges(ring))
        .flat_map(|(a, b)| [a, a.lerp(b, 0.5)])
        .map(|q| {
            segments
                .iter()
                .map(|&(a, b)| segment_distance(q, a, b))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max);

    log::trace!(
        "shadow deviation: shadow->outline {}, outline->shadow {}",
        shadow_to_outline,
        outline_to_shadow
    );

    Ok(shadow_to_outline.max(outline_to_shadow))
}
