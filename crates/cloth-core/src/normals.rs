//! Shading normals from the triangle list.

use glam::DVec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Recompute vertex normals from triangle geometry (area-weighted).
///
/// Each face contributes `(p2 - p1) x (p3 - p1)` unnormalised, so larger
/// faces weigh more. Sums are normalised at the end; a vertex whose sum is
/// zero keeps a zero normal.
pub fn compute_vertex_normals(positions: &[DVec3], faces: &[u32], normals: &mut [DVec3]) {
    for n in normals.iter_mut() {
        *n = DVec3::ZERO;
    }

    for tri in faces.chunks_exact(3) {
        let a = tri[0] as usize;
        let b = tri[1] as usize;
        let c = tri[2] as usize;

        let face_normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);

        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }

    #[cfg(feature = "parallel")]
    normals.par_iter_mut().for_each(|n| *n = n.normalize_or_zero());

    #[cfg(not(feature = "parallel"))]
    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }
}
