use crate::particle::ParticleSet;

/// Hookean spring with velocity damping along its axis.
///
/// Used instead of distance constraints by the explicit integrators. The
/// spring only writes into the force accumulators; positions are left to
/// the integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    pub i: u32,
    pub j: u32,
    pub rest_length: f64,
    pub hook_coefficient: f64,
    pub damping_coefficient: f64,
}

impl Spring {
    pub fn new(
        i: u32,
        j: u32,
        rest_length: f64,
        hook_coefficient: f64,
        damping_coefficient: f64,
    ) -> Self {
        Self {
            i,
            j,
            rest_length,
            hook_coefficient,
            damping_coefficient,
        }
    }

    /// Add this spring's internal force to both endpoints.
    ///
    /// `f = n * ((len - rest) * k + ((v_j - v_i) . n) * c)` is added to `i`
    /// and subtracted from `j`, where `n` points from `i` to `j`.
    /// Coincident endpoints produce no force.
    pub fn apply_internal_force(&self, particles: &mut ParticleSet) {
        let i = self.i as usize;
        let j = self.j as usize;

        let delta = particles.position[j] - particles.position[i];
        let len = delta.length();
        if len < 1e-12 {
            return;
        }
        let n = delta / len;

        let relative_velocity = particles.velocity[j] - particles.velocity[i];
        let magnitude = (len - self.rest_length) * self.hook_coefficient
            + relative_velocity.dot(n) * self.damping_coefficient;
        let f = n * magnitude;

        particles.force[i] += f;
        particles.force[j] -= f;
    }
}

/// Accumulate the forces of every spring.
pub fn apply_spring_forces(springs: &[Spring], particles: &mut ParticleSet) {
    for s in springs {
        s.apply_internal_force(particles);
    }
}
