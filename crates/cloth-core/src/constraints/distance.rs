use crate::particle::ParticleSet;

/// Distances below this are treated as coincident nodes.
const MIN_DISTANCE: f64 = 1e-12;

/// Which role a constraint plays in the grid topology.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConstraintKind {
    /// Horizontal or vertical neighbour.
    Structural,
    /// Cell diagonal.
    Shear,
    /// Distance-2 pair resisting folds.
    Bending,
}

/// Update rule used when projecting a distance constraint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolveMode {
    /// XPBD with an accumulated multiplier.
    Xpbd,
    /// Classic PBD with a fixed stiffness factor.
    Pbd,
    /// XPBD with the multiplier discarded before every solve.
    XpbdSmallStep,
}

/// Distance constraint between two cloth nodes.
///
/// Reference: "XPBD: Position-Based Simulation of Compliant Constrained Dynamics",
/// Macklin et al., 2016
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint {
    /// Node index A.
    pub i: u32,
    /// Node index B.
    pub j: u32,
    pub kind: ConstraintKind,
    /// Distance between the two nodes when the constraint was created.
    pub rest_length: f64,
    /// Compliance (inverse stiffness). Zero keeps the distance rigid.
    pub compliance: f64,
    /// Correction factor for the classic PBD rule.
    pub stiffness: f64,
    /// Accumulated Lagrange multiplier (reset each step).
    pub lambda: f64,
}

impl DistanceConstraint {
    pub fn new(
        i: u32,
        j: u32,
        kind: ConstraintKind,
        rest_length: f64,
        compliance: f64,
        stiffness: f64,
    ) -> Self {
        Self {
            i,
            j,
            kind,
            rest_length,
            compliance,
            stiffness,
            lambda: 0.0,
        }
    }

    /// Create a constraint whose rest length is the nodes' current distance.
    pub fn between(
        particles: &ParticleSet,
        i: u32,
        j: u32,
        kind: ConstraintKind,
        compliance: f64,
        stiffness: f64,
    ) -> Self {
        let rest_length = particles.position[i as usize].distance(particles.position[j as usize]);
        Self::new(i, j, kind, rest_length, compliance, stiffness)
    }

    /// Project this constraint once, moving both nodes in place.
    ///
    /// Pinned pairs and coincident nodes are skipped.
    pub fn solve(&mut self, particles: &mut ParticleSet, dt: f64, mode: SolveMode) {
        let i = self.i as usize;
        let j = self.j as usize;

        let w_i = particles.inv_mass[i];
        let w_j = particles.inv_mass[j];
        let w_sum = w_i + w_j;
        if w_sum == 0.0 {
            return;
        }

        let diff = particles.position[i] - particles.position[j];
        let dist = diff.length();
        if dist < MIN_DISTANCE {
            return;
        }

        let c_val = dist - self.rest_length;
        let n = diff / dist;

        let correction = match mode {
            SolveMode::Xpbd => {
                let alpha_tilde = self.compliance / (dt * dt);
                let delta_lambda = (-c_val - alpha_tilde * self.lambda) / (w_sum + alpha_tilde);
                self.lambda += delta_lambda;
                n * delta_lambda
            }
            SolveMode::XpbdSmallStep => {
                self.lambda = 0.0;
                let alpha_tilde = self.compliance / (dt * dt);
                let delta_lambda = -c_val / (w_sum + alpha_tilde);
                n * delta_lambda
            }
            SolveMode::Pbd => n * (self.stiffness * -c_val / w_sum),
        };

        // Pinned endpoints must stay bit-identical.
        if w_i != 0.0 {
            particles.position[i] += correction * w_i;
        }
        if w_j != 0.0 {
            particles.position[j] -= correction * w_j;
        }
    }

    /// Current signed violation `|p_i - p_j| - rest_length`.
    pub fn violation(&self, particles: &ParticleSet) -> f64 {
        particles.position[self.i as usize].distance(particles.position[self.j as usize])
            - self.rest_length
    }
}

/// Run one Gauss-Seidel pass over `constraints` in list order.
pub fn solve_distance_constraints(
    constraints: &mut [DistanceConstraint],
    particles: &mut ParticleSet,
    dt: f64,
    mode: SolveMode,
) {
    for c in constraints.iter_mut() {
        c.solve(particles, dt, mode);
    }
}

/// Reset all Lagrange multipliers to zero.
/// Call this at the beginning of each step.
pub fn reset_lambdas(constraints: &mut [DistanceConstraint]) {
    for c in constraints.iter_mut() {
        c.lambda = 0.0;
    }
}

/// Largest absolute violation over `constraints`.
pub fn max_violation(constraints: &[DistanceConstraint], particles: &ParticleSet) -> f64 {
    constraints
        .iter()
        .map(|c| c.violation(particles).abs())
        .fold(0.0, f64::max)
}
