//! # Geometry Operations
//!
//! Polygon densification and meshing, shadow projection, and stereographic
//! shadow design.

pub mod densify;
pub mod shadow;
pub mod stereographic;

pub use densify::{
    densify, mesh_polygon, BoundaryMesher, ConformingMesher, DensifyConfig, MesherKind,
    PolygonMesher,
};
pub use shadow::{
    attenuation_weight, project, project_onto_walls, project_point, Attenuation, Axis, Plane,
    Shadow, ShadowConfig, ShadowSession,
};
pub use stereographic::{map_to_surface, shadow_deviation, StereoConfig, StereoStyle, StereoSurface};
