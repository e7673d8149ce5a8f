//! Grid topology: nodes, render faces, and the constraint/spring graph.
//!
//! Everything here is a pure function of the configuration. In particular
//! the solve order of the constraints comes from a seeded shuffle, so the
//! same grid always produces the same list in the same order.

use glam::{DVec2, DVec3};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::ClothConfig;
use crate::constraints::distance::{ConstraintKind, DistanceConstraint};
use crate::forces::spring::Spring;
use crate::method::BendingLevel;
use crate::particle::ParticleSet;

/// A pair of nodes linked by a constraint or spring.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Link {
    pub i: u32,
    pub j: u32,
    pub kind: ConstraintKind,
}

/// Row-major node index.
#[inline]
pub fn node_index(width: usize, col: usize, row: usize) -> u32 {
    (row * width + col) as u32
}

/// Create the node grid.
///
/// Node `(col, row)` sits at `(ex * col / W, -ey * row / H, 0)` in cloth
/// space. Texture U runs `col / (1 - W)` (non-positive, decreasing with the
/// column) and V runs `row / (H - 1)`. The two top corners are pinned.
pub fn build_particles(config: &ClothConfig) -> ParticleSet {
    let w = config.nodes_in_width;
    let h = config.nodes_in_height;
    let mut particles = ParticleSet::new(w * h);

    for col in 0..w {
        for row in 0..h {
            let idx = node_index(w, col, row) as usize;
            let position = DVec3::new(
                config.extent.x * col as f64 / w as f64,
                -(config.extent.y * row as f64 / h as f64),
                0.0,
            );
            let pinned = row == 0 && (col == 0 || col == w - 1);

            particles.position[idx] = position;
            particles.old_position[idx] = position;
            particles.acceleration[idx] = config.gravity;
            particles.inv_mass[idx] = if pinned { 0.0 } else { config.default_inv_mass };
            particles.tex_coord[idx] = DVec2::new(
                col as f64 / (1.0 - w as f64),
                row as f64 / (h as f64 - 1.0),
            );
        }
    }

    particles
}

/// Flat triangle index list, two triangles per cell:
/// `(tl, tr, bl)` then `(bl, tr, br)`.
pub fn build_faces(width: usize, height: usize) -> Vec<u32> {
    let mut faces = Vec::with_capacity(face_index_count(width, height));
    for col in 0..width.saturating_sub(1) {
        for row in 0..height.saturating_sub(1) {
            let tl = node_index(width, col, row);
            let tr = node_index(width, col + 1, row);
            let bl = node_index(width, col, row + 1);
            let br = node_index(width, col + 1, row + 1);
            faces.extend_from_slice(&[tl, tr, bl, bl, tr, br]);
        }
    }
    faces
}

/// All links of the grid in construction order (before shuffling).
///
/// Structural and shear links are emitted first, visiting columns in the
/// outer loop and rows in the inner loop; bending links follow in a second
/// pass with the same visiting order.
pub fn grid_links(width: usize, height: usize, level: BendingLevel) -> Vec<Link> {
    let idx = |c: usize, r: usize| node_index(width, c, r);
    let mut links = Vec::with_capacity(expected_constraint_count(width, height, level));
    let mut push = |i: u32, j: u32, kind: ConstraintKind| links.push(Link { i, j, kind });

    for c in 0..width {
        for r in 0..height {
            if c + 1 < width {
                push(idx(c, r), idx(c + 1, r), ConstraintKind::Structural);
            }
            if r + 1 < height {
                push(idx(c, r), idx(c, r + 1), ConstraintKind::Structural);
            }
            if c + 1 < width && r + 1 < height {
                push(idx(c + 1, r), idx(c, r + 1), ConstraintKind::Shear);
                push(idx(c, r), idx(c + 1, r + 1), ConstraintKind::Shear);
            }
        }
    }

    for c in 0..width {
        for r in 0..height {
            if level.includes_axis() {
                if c + 2 < width {
                    push(idx(c, r), idx(c + 2, r), ConstraintKind::Bending);
                }
                if r + 2 < height {
                    push(idx(c, r), idx(c, r + 2), ConstraintKind::Bending);
                }
            }
            if level.includes_diagonal() && c + 2 < width && r + 2 < height {
                push(idx(c, r), idx(c + 2, r + 2), ConstraintKind::Bending);
                push(idx(c + 2, r), idx(c, r + 2), ConstraintKind::Bending);
            }
        }
    }

    links
}

/// Grid links permuted by the fixed-seed shuffle.
pub fn shuffled_links(width: usize, height: usize, level: BendingLevel, seed: u64) -> Vec<Link> {
    let mut links = grid_links(width, height, level);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    links.shuffle(&mut rng);
    links
}

/// Distance constraints for every link, rest lengths taken from the
/// current node positions.
pub fn build_constraints(
    links: &[Link],
    particles: &ParticleSet,
    config: &ClothConfig,
) -> Vec<DistanceConstraint> {
    links
        .iter()
        .map(|link| {
            let compliance = match link.kind {
                ConstraintKind::Bending => config.bending_compliance,
                ConstraintKind::Structural | ConstraintKind::Shear => 0.0,
            };
            DistanceConstraint::between(
                particles,
                link.i,
                link.j,
                link.kind,
                compliance,
                config.pbd_stiffness,
            )
        })
        .collect()
}

/// Springs for every link, rest lengths taken from the current node
/// positions.
pub fn build_springs(links: &[Link], particles: &ParticleSet, config: &ClothConfig) -> Vec<Spring> {
    links
        .iter()
        .map(|link| {
            let hook = match link.kind {
                ConstraintKind::Bending => config.bending_spring_stiffness,
                ConstraintKind::Structural | ConstraintKind::Shear => config.spring_stiffness,
            };
            let rest = particles.position[link.i as usize]
                .distance(particles.position[link.j as usize]);
            Spring::new(link.i, link.j, rest, hook, config.spring_damping)
        })
        .collect()
}

/// Number of indices in the face list of a `width x height` grid.
pub fn face_index_count(width: usize, height: usize) -> usize {
    2 * width.saturating_sub(1) * height.saturating_sub(1) * 3
}

/// Number of links `grid_links` produces for the given grid and level.
pub fn expected_constraint_count(width: usize, height: usize, level: BendingLevel) -> usize {
    let (w, h) = (width, height);
    let structural = h * w.saturating_sub(1) + w * h.saturating_sub(1);
    let shear = 2 * w.saturating_sub(1) * h.saturating_sub(1);
    let axis = h * w.saturating_sub(2) + w * h.saturating_sub(2);
    let diagonal = 2 * w.saturating_sub(2) * h.saturating_sub(2);

    let mut total = structural + shear;
    if level.includes_axis() {
        total += axis;
    }
    if level.includes_diagonal() {
        total += diagonal;
    }
    total
}
