//! # Polygon Meshers
//!
//! Strategies turning a polygon into a flat triangle surface. Both start
//! from the densified boundary and build a constrained Delaunay
//! triangulation with `spade`; the conforming mesher additionally refines
//! the interior.

use super::densify;
use crate::error::{ShadowError, ShadowResult};
use crate::polygon::Polygon;
use crate::surface::Surface;
use config::constants::{MAX_DENSIFIED_POINTS, MIN_TRIANGLE_ANGLE_DEG};
use glam::{DVec2, DVec3};
use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, Point2, RefinementParameters, Triangulation,
};

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Polygon-to-mesh capability.
///
/// Implementations must keep the polygon's footprint, keep every densified
/// boundary point, and emit counter-clockwise faces at z = 0.
pub trait PolygonMesher: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Densifies `polygon` at `density` and triangulates it.
    fn mesh(&self, polygon: &Polygon, density: f64) -> ShadowResult<Surface>;
}

/// Triangulates the densified boundary points only.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryMesher;

impl PolygonMesher for BoundaryMesher {
    fn name(&self) -> &'static str {
        "boundary"
    }

    fn mesh(&self, polygon: &Polygon, density: f64) -> ShadowResult<Surface> {
        let dense = densify(polygon, density)?;
        let cdt = constrained_triangulation(&dense)?;
        Ok(inside_faces(&cdt, &dense))
    }
}

/// Refines the constrained triangulation until triangles are no larger than
/// `(1 / density)^2` and no angle is below [`MIN_TRIANGLE_ANGLE_DEG`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConformingMesher;

impl PolygonMesher for ConformingMesher {
    fn name(&self) -> &'static str {
        "conforming"
    }

    fn mesh(&self, polygon: &Polygon, density: f64) -> ShadowResult<Surface> {
        let dense = densify(polygon, density)?;
        let mut cdt = constrained_triangulation(&dense)?;

        let spacing = 1.0 / density;
        let parameters = RefinementParameters::<f64>::new()
            .with_angle_limit(AngleLimit::from_deg(MIN_TRIANGLE_ANGLE_DEG))
            .with_max_allowed_area(spacing * spacing)
            .exclude_outer_faces(true)
            .with_max_additional_vertices(MAX_DENSIFIED_POINTS);
        let result = cdt.refine(parameters);
        if !result.refinement_complete {
            log::warn!(
                "conforming refinement stopped at the vertex cap ({} vertices)",
                cdt.num_vertices()
            );
        }

        Ok(inside_faces(&cdt, &dense))
    }
}

/// Inserts every loop of `polygon` as a closed chain of constraint edges.
fn constrained_triangulation(polygon: &Polygon) -> ShadowResult<Cdt> {
    let mut cdt = Cdt::new();

    for ring in polygon.loops() {
        let mut handles = Vec::with_capacity(ring.len());
        for p in ring {
            let handle = cdt.insert(Point2::new(p.x, p.y)).map_err(|e| {
                ShadowError::triangulation(format!(
                    "cannot insert point ({}, {}): {e:?}",
                    p.x, p.y
                ))
            })?;
            handles.push(handle);
        }

        for (i, &from) in handles.iter().enumerate() {
            let to = handles[(i + 1) % handles.len()];
            if from == to {
                continue;
            }
            if !cdt.can_add_constraint(from, to) {
                return Err(ShadowError::triangulation(
                    "polygon loops intersect each other or themselves",
                ));
            }
            cdt.add_constraint(from, to);
        }
    }

    Ok(cdt)
}

/// Collects the faces lying inside `polygon` into a compact flat surface.
///
/// Regions bounded by constraint edges are classified once each with a
/// point-in-polygon test on a seed face, then flood filled.
fn inside_faces(cdt: &Cdt, polygon: &Polygon) -> Surface {
    let mut inside: Vec<Option<bool>> = vec![None; cdt.num_all_faces()];
    let mut remap: Vec<Option<u32>> = vec![None; cdt.num_vertices()];
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for seed in cdt.inner_faces() {
        let seed = seed.fix();
        if inside[seed.index()].is_some() {
            continue;
        }
        let seed_inside = polygon.contains(centroid(cdt, seed));
        flood_region(cdt, seed, seed_inside, &mut inside);
    }

    for face in cdt.inner_faces() {
        if inside[face.fix().index()] != Some(true) {
            continue;
        }

        let mut tri = [0u32; 3];
        for (slot, vertex) in tri.iter_mut().zip(face.vertices()) {
            let index = vertex.fix().index();
            *slot = *remap[index].get_or_insert_with(|| {
                let p = vertex.position();
                vertices.push(DVec3::new(p.x, p.y, 0.0));
                (vertices.len() - 1) as u32
            });
        }

        let [a, b, c] = tri.map(|i| vertices[i as usize].truncate());
        if (b - a).perp_dot(c - a) < 0.0 {
            tri.swap(1, 2);
        }
        faces.push(tri);
    }

    log::debug!(
        "triangulated {} boundary points into {} faces over {} vertices",
        polygon.total_vertex_count(),
        faces.len(),
        vertices.len()
    );

    Surface::from_trusted(vertices, faces)
}

/// Marks every face reachable from `seed` without crossing a constraint edge.
fn flood_region(
    cdt: &Cdt,
    seed: FixedFaceHandle<InnerTag>,
    value: bool,
    inside: &mut [Option<bool>],
) {
    let mut stack = vec![seed];
    inside[seed.index()] = Some(value);

    while let Some(fixed) = stack.pop() {
        for edge in cdt.face(fixed).adjacent_edges() {
            if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                continue;
            }
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let neighbor = neighbor.fix();
            let slot = &mut inside[neighbor.index()];
            if slot.is_none() {
                *slot = Some(value);
                stack.push(neighbor);
            }
        }
    }
}

fn centroid(cdt: &Cdt, face: FixedFaceHandle<InnerTag>) -> DVec2 {
    let sum = cdt
        .face(face)
        .vertices()
        .iter()
        .map(|v| {
            let p = v.position();
            DVec2::new(p.x, p.y)
        })
        .fold(DVec2::ZERO, |acc, p| acc + p);
    sum / 3.0
}
