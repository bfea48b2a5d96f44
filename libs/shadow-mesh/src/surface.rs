//! # Surface Data Structure
//!
//! Immutable triangulated geometry: vertex positions plus a face index list.
//! Every operation returns a new surface instead of mutating its input.

use crate::error::{ShadowError, ShadowResult};
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A triangle surface with vertices and face indices.
///
/// Face winding defines the outward orientation. Construction validates
/// that every index is in range and that no face repeats an index.
///
/// # Example
///
/// ```rust
/// use shadow_mesh::Surface;
/// use glam::DVec3;
///
/// let surface = Surface::new(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
/// assert_eq!(surface.face_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceBuffers", into = "SurfaceBuffers")]
pub struct Surface {
    vertices: Vec<DVec3>,
    faces: Vec<[u32; 3]>,
}

/// Plain exchange layout for a [`Surface`]: N×3 coordinates and M×3 indices.
///
/// This is the data contract shared with renderers and exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBuffers {
    /// Vertex coordinates, one `[x, y, z]` per vertex
    pub vertices: Vec<[f64; 3]>,
    /// Face indices, one `[a, b, c]` per triangle
    pub faces: Vec<[u32; 3]>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::empty()
    }
}

impl Surface {
    /// Creates a surface, validating face indices.
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> ShadowResult<Self> {
        let vertex_count = vertices.len();
        for (i, face) in faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&idx| idx as usize >= vertex_count) {
                return Err(ShadowError::invalid_surface(format!(
                    "face {i} references vertex {bad} but only {vertex_count} vertices exist"
                )));
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(ShadowError::invalid_surface(format!(
                    "face {i} repeats a vertex index: {face:?}"
                )));
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Creates a surface whose faces are already known to be valid for
    /// `vertices` (same vertex count as a validated surface, or freshly
    /// generated indices).
    pub(crate) fn from_trusted(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Self {
        debug_assert!(faces
            .iter()
            .all(|f| f.iter().all(|&i| (i as usize) < vertices.len())));
        Self { vertices, faces }
    }

    /// Creates an empty surface (no vertices, no faces).
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Creates a surface from the exchange layout.
    pub fn from_buffers(vertices: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> ShadowResult<Self> {
        Self::new(vertices.into_iter().map(DVec3::from_array).collect(), faces)
    }

    /// Exports the surface in the exchange layout.
    pub fn to_buffers(&self) -> SurfaceBuffers {
        SurfaceBuffers {
            vertices: self.vertices.iter().map(|v| v.to_array()).collect(),
            faces: self.faces.clone(),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the surface has no faces.
    ///
    /// A surface without faces casts no shadow, whatever its vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the faces.
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns true if every vertex coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.is_finite())
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Returns a copy translated by `offset`.
    pub fn translated(&self, offset: DVec3) -> Surface {
        Self::from_trusted(
            self.vertices.iter().map(|v| *v + offset).collect(),
            self.faces.clone(),
        )
    }

    /// Returns a copy with every vertex transformed by a 4x4 matrix.
    ///
    /// Animation drivers use this to rotate a surface between frames.
    pub fn transformed(&self, matrix: &DMat4) -> Surface {
        Self::from_trusted(
            self.vertices
                .iter()
                .map(|v| matrix.transform_point3(*v))
                .collect(),
            self.faces.clone(),
        )
    }

    /// Returns a copy with every face's winding reversed.
    pub fn flipped(&self) -> Surface {
        Self::from_trusted(
            self.vertices.clone(),
            self.faces.iter().map(|f| [f[0], f[2], f[1]]).collect(),
        )
    }

    /// Returns a surface holding both this surface and `other`.
    ///
    /// Indices of `other` are offset by this surface's vertex count.
    pub fn merged(&self, other: &Surface) -> Surface {
        let offset = self.vertices.len() as u32;

        let mut vertices = Vec::with_capacity(self.vertices.len() + other.vertices.len());
        vertices.extend_from_slice(&self.vertices);
        vertices.extend_from_slice(&other.vertices);

        let mut faces = Vec::with_capacity(self.faces.len() + other.faces.len());
        faces.extend_from_slice(&self.faces);
        faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );

        Self::from_trusted(vertices, faces)
    }

    /// Returns the free boundary: edges belonging to exactly one face.
    ///
    /// Each edge is returned with the direction it has in its face, in face
    /// order.
    pub fn free_boundary_edges(&self) -> Vec<[u32; 2]> {
        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            for (a, b) in face_edges(face) {
                *counts.entry(undirected(a, b)).or_insert(0) += 1;
            }
        }

        self.faces
            .iter()
            .flat_map(face_edges)
            .filter(|&(a, b)| counts.get(&undirected(a, b)) == Some(&1))
            .map(|(a, b)| [a, b])
            .collect()
    }

    /// Returns true if the surface is closed and consistently wound.
    ///
    /// Every directed edge must appear exactly once and its reverse must
    /// appear exactly once. An empty surface is not closed.
    pub fn is_closed(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }

        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            for edge in face_edges(face) {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }

        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Computes area-weighted vertex normals.
    pub fn vertex_normals(&self) -> Vec<DVec3> {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.faces {
            let normal = self.face_normal(tri);
            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        normals
    }

    /// Unnormalized face normal (length is twice the face area).
    pub(crate) fn face_normal(&self, face: &[u32; 3]) -> DVec3 {
        let v0 = self.vertices[face[0] as usize];
        let v1 = self.vertices[face[1] as usize];
        let v2 = self.vertices[face[2] as usize];
        (v1 - v0).cross(v2 - v0)
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            result.push(v.x as f32);
            result.push(v.y as f32);
            result.push(v.z as f32);
        }
        result
    }

    /// Exports face indices as u32 array for GPU.
    ///
    /// Returns flattened [i0, i1, i2, i0, i1, i2, ...] array.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

impl TryFrom<SurfaceBuffers> for Surface {
    type Error = ShadowError;

    fn try_from(buffers: SurfaceBuffers) -> Result<Self, Self::Error> {
        Surface::from_buffers(buffers.vertices, buffers.faces)
    }
}

impl From<Surface> for SurfaceBuffers {
    fn from(surface: Surface) -> Self {
        SurfaceBuffers {
            vertices: surface.vertices.iter().map(|v| v.to_array()).collect(),
            faces: surface.faces,
        }
    }
}

#[inline]
fn face_edges(face: &[u32; 3]) -> [(u32, u32); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

#[inline]
fn undirected(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
