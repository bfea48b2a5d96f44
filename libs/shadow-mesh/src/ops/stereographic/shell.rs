//! Shell construction around a mapped sphere surface: outward orientation,
//! flattened feet and solid extrusion.

use crate::error::{ShadowError, ShadowResult};
use crate::surface::Surface;
use glam::DVec3;

/// Flips every face if the surface as a whole faces the sphere centre.
pub(super) fn orient_outward(surface: Surface, center: DVec3) -> Surface {
    let outwardness: f64 = surface
        .faces()
        .iter()
        .map(|face| {
            let centroid = face.iter().map(|&i| surface.vertex(i)).sum::<DVec3>() / 3.0;
            surface.face_normal(face).dot(centroid - center)
        })
        .sum();

    if outwardness < 0.0 {
        surface.flipped()
    } else {
        surface
    }
}

/// Drops vertices below the centre and within `foot_radius` of the vertical
/// axis onto z = 0.
pub(super) fn flatten_feet(surface: &Surface, center: DVec3, foot_radius: f64) -> Surface {
    let mut flattened = 0usize;
    let vertices = surface
        .vertices()
        .iter()
        .map(|&v| {
            if v.z < center.z && v.x.hypot(v.y) < foot_radius {
                flattened += 1;
                DVec3::new(v.x, v.y, 0.0)
            } else {
                v
            }
        })
        .collect();

    log::debug!("flattened {flattened} vertices into feet of radius {foot_radius}");
    Surface::from_trusted(vertices, surface.faces().to_vec())
}

/// Closes an open outer surface into a solid of thickness `ratio * radius`.
///
/// The inner shell is the outer one scaled toward `center` by `1 - ratio`
/// with reversed winding. Every free-boundary edge `a -> b` of the outer
/// shell gets the side quad `b, a, a', b'` where primes are inner copies.
pub(super) fn solidify(outer: &Surface, center: DVec3, ratio: f64) -> ShadowResult<Surface> {
    let n = outer.vertex_count() as u32;
    let keep = 1.0 - ratio;

    let inner = Surface::from_trusted(
        outer
            .vertices()
            .iter()
            .map(|&v| center + (v - center) * keep)
            .collect(),
        outer.faces().to_vec(),
    )
    .flipped();

    let rim = outer.free_boundary_edges();
    let sides: Vec<[u32; 3]> = rim
        .iter()
        .flat_map(|&[a, b]| [[b, a, a + n], [b, a + n, b + n]])
        .collect();

    let solid = outer.merged(&inner);
    let mut faces = solid.faces().to_vec();
    faces.extend(sides);
    let solid = Surface::from_trusted(solid.vertices().to_vec(), faces);

    if !solid.is_closed() {
        return Err(ShadowError::invalid_surface(format!(
            "solid shell is not closed after stitching {} rim edges",
            rim.len()
        )));
    }

    log::debug!(
        "solid shell: {} faces ({} side faces on a rim of {} edges)",
        solid.face_count(),
        2 * rim.len(),
        rim.len()
    );
    Ok(solid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_square() -> Surface {
        Surface::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_orient_outward_flips_inward_faces() {
        let center = DVec3::new(0.5, 0.5, 1.0);
        // Normals point +z, toward the centre above
        let oriented = orient_outward(open_square(), center);
        for face in oriented.faces() {
            assert!(oriented.face_normal(face).z < 0.0);
        }
    }

    #[test]
    fn test_orient_outward_keeps_outward_faces() {
        let center = DVec3::new(0.5, 0.5, -1.0);
        let oriented = orient_outward(open_square(), center);
        assert_eq!(oriented, open_square());
    }

    #[test]
    fn test_solidify_square_plate() {
        let outer = orient_outward(open_square(), DVec3::new(0.5, 0.5, 1.0));
        let solid = solidify(&outer, DVec3::new(0.5, 0.5, 1.0), 0.5).unwrap();

        assert_eq!(solid.vertex_count(), 8);
        // 2 outer + 2 inner + 2 per rim edge
        assert_eq!(solid.face_count(), 2 + 2 + 8);
        assert!(solid.is_closed());
        assert!(solid.free_boundary_edges().is_empty());
        assert_eq!(solid.vertex(4), DVec3::new(0.25, 0.25, 0.5));
    }

    #[test]
    fn test_flatten_feet() {
        let surface = Surface::new(
            vec![
                DVec3::new(0.1, 0.0, 0.2),
                DVec3::new(0.0, 0.1, 1.5),
                DVec3::new(0.9, 0.0, 0.1),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let footed = flatten_feet(&surface, DVec3::new(0.0, 0.0, 1.0), 0.5);
        assert_eq!(footed.vertex(0), DVec3::new(0.1, 0.0, 0.0));
        assert_eq!(footed.vertex(1), surface.vertex(1));
        assert_eq!(footed.vertex(2), surface.vertex(2));
    }
}
