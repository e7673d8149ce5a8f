use glam::{DVec2, DVec3};

/// SoA node storage for the cloth grid.
///
/// Sized once when the topology is built and never resized afterwards;
/// constraints, springs and faces refer to nodes by index into these
/// columns. A node with `inv_mass == 0.0` is pinned.
pub struct ParticleSet {
    pub count: usize,
    pub position: Vec<DVec3>,
    pub velocity: Vec<DVec3>,
    /// Constant external acceleration (gravity for every node).
    pub acceleration: Vec<DVec3>,
    /// Position at the start of the current step (Verlet history for the
    /// spring methods).
    pub old_position: Vec<DVec3>,
    /// Force accumulator, zeroed after each spring-method iteration.
    pub force: Vec<DVec3>,
    pub tex_coord: Vec<DVec2>,
    /// Shading normal, written by `compute_normals`.
    pub normal: Vec<DVec3>,
    pub inv_mass: Vec<f64>,
}

impl ParticleSet {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            position: vec![DVec3::ZERO; count],
            velocity: vec![DVec3::ZERO; count],
            acceleration: vec![DVec3::ZERO; count],
            old_position: vec![DVec3::ZERO; count],
            force: vec![DVec3::ZERO; count],
            tex_coord: vec![DVec2::ZERO; count],
            normal: vec![DVec3::ZERO; count],
            inv_mass: vec![1.0; count],
        }
    }

    #[inline]
    pub fn is_pinned(&self, index: usize) -> bool {
        self.inv_mass[index] == 0.0
    }

    /// Mass of a node, `None` when pinned.
    #[inline]
    pub fn mass(&self, index: usize) -> Option<f64> {
        let w = self.inv_mass[index];
        if w == 0.0 {
            None
        } else {
            Some(1.0 / w)
        }
    }

    /// Indices of all pinned nodes.
    pub fn pinned(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter(|&i| self.is_pinned(i))
    }

    pub fn clear_forces(&mut self) {
        for f in self.force.iter_mut() {
            *f = DVec3::ZERO;
        }
    }

    /// True when every position and velocity is finite.
    pub fn all_finite(&self) -> bool {
        self.position.iter().all(|p| p.is_finite()) && self.velocity.iter().all(|v| v.is_finite())
    }
}
