//! # Shadow Mesh
//!
//! Point-light shadows of triangle surfaces, and the inverse problem:
//! designing a surface whose shadow is a given outline.
//!
//! ## Architecture
//!
//! ```text
//! Polygon → densify → mesh_polygon → Surface (flat, z = 0)
//!                                      ↓
//!                               map_to_surface → StereoSurface + light height
//!
//! Surface + light + Plane → project → Shadow (surface on the plane + weights)
//! ```
//!
//! ## Algorithms
//!
//! - **Densification**: equal subdivision of every boundary edge
//! - **Meshing**: constrained Delaunay triangulation (`spade`), optionally
//!   refined with interior points
//! - **Projection**: per-vertex perspective divide with clamping and
//!   far-field fallback, parallelized with `rayon`
//! - **Stereographic design**: closed-form plane-to-sphere mappings with
//!   optional solid shell extrusion
//!
//! ## Usage
//!
//! ```rust
//! use shadow_mesh::{map_to_surface, project, Polygon, ShadowConfig, StereoConfig};
//! use glam::DVec2;
//!
//! let outline = Polygon::square(DVec2::ONE, true);
//! let mapped = map_to_surface(&outline, &StereoConfig::default()).unwrap();
//!
//! let shadow = project(&mapped.surface, mapped.light(), &ShadowConfig::default()).unwrap();
//! assert_eq!(shadow.surface.face_count(), mapped.surface.face_count());
//! ```
//!
//! Every operation is a pure function of its inputs. The library logs through
//! the `log` facade and never installs a logger.

pub mod error;
pub mod ops;
pub mod polygon;
pub mod surface;

pub use error::{ShadowError, ShadowResult};
pub use ops::{
    attenuation_weight, densify, map_to_surface, mesh_polygon, project, project_onto_walls,
    project_point, shadow_deviation, Attenuation, Axis, BoundaryMesher, ConformingMesher,
    DensifyConfig, MesherKind, Plane, PolygonMesher, Shadow, ShadowConfig, ShadowSession,
    StereoConfig, StereoStyle, StereoSurface,
};
pub use polygon::Polygon;
pub use surface::{Surface, SurfaceBuffers};
