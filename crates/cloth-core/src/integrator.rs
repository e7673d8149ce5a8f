//! Per-method update rules.
//!
//! Position-based methods predict, project constraints and derive velocity
//! from the position change. Spring methods accumulate forces and apply one
//! explicit update rule per inner iteration. Pinned nodes are skipped by
//! every rule.

use glam::DVec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::constraints::distance::{
    reset_lambdas, solve_distance_constraints, DistanceConstraint, SolveMode,
};
use crate::forces::spring::{apply_spring_forces, Spring};
use crate::method::Method;
use crate::particle::ParticleSet;

/// Explicit update rule of the spring methods.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExplicitRule {
    Verlet,
    ExplicitEuler,
    SemiImplicitEuler,
}

/// How a method advances the cloth.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepKind {
    /// Predict, project `passes` times, derive velocity.
    Projection { mode: SolveMode, passes: u32 },
    /// `iterations` rounds of force accumulation and explicit update.
    Springs { rule: ExplicitRule, iterations: u32 },
}

impl StepKind {
    /// Map a method and its iteration count to an update scheme.
    pub fn for_method(method: Method, iterations: u32) -> Self {
        match method {
            Method::Xpbd => StepKind::Projection {
                mode: SolveMode::Xpbd,
                passes: iterations,
            },
            Method::Pbd => StepKind::Projection {
                mode: SolveMode::Pbd,
                passes: iterations,
            },
            Method::XpbdSmallStep => StepKind::Projection {
                mode: SolveMode::XpbdSmallStep,
                passes: 1,
            },
            Method::Verlet => StepKind::Springs {
                rule: ExplicitRule::Verlet,
                iterations,
            },
            Method::ExplicitEuler => StepKind::Springs {
                rule: ExplicitRule::ExplicitEuler,
                iterations,
            },
            Method::SemiImplicitEuler => StepKind::Springs {
                rule: ExplicitRule::SemiImplicitEuler,
                iterations,
            },
        }
    }

    /// Number of constraint passes or force iterations performed.
    pub fn passes(self) -> u32 {
        match self {
            StepKind::Projection { passes, .. } => passes,
            StepKind::Springs { iterations, .. } => iterations,
        }
    }
}

/// One position-based step.
///
/// 1. `v += a dt; old = p; p += v dt` for every free node.
/// 2. All multipliers reset to zero.
/// 3. `passes` Gauss-Seidel sweeps in fixed list order.
/// 4. `v = (p - old) / dt`, overwriting the predicted velocity.
pub fn step_projection(
    particles: &mut ParticleSet,
    constraints: &mut [DistanceConstraint],
    dt: f64,
    mode: SolveMode,
    passes: u32,
) {
    predict(particles, dt);

    reset_lambdas(constraints);
    for _ in 0..passes {
        solve_distance_constraints(constraints, particles, dt, mode);
    }

    derive_velocities(particles, dt);
}

/// One spring-method step of `iterations` inner rounds, each using the
/// full `dt`.
///
/// Gravity is scaled by `1 / iterations` so the total gravity impulse per
/// call does not depend on the iteration count. Spring forces are not
/// scaled.
pub fn step_springs(
    particles: &mut ParticleSet,
    springs: &[Spring],
    dt: f64,
    rule: ExplicitRule,
    iterations: u32,
) {
    let gravity_share = 1.0 / iterations.max(1) as f64;

    for _ in 0..iterations {
        for i in 0..particles.count {
            if let Some(mass) = particles.mass(i) {
                particles.force[i] += particles.acceleration[i] * mass * gravity_share;
            }
        }
        apply_spring_forces(springs, particles);

        for i in 0..particles.count {
            let w = particles.inv_mass[i];
            if w == 0.0 {
                continue;
            }
            let a = particles.force[i] * w;
            match rule {
                ExplicitRule::SemiImplicitEuler => {
                    particles.velocity[i] += a * dt;
                    particles.old_position[i] = particles.position[i];
                    particles.position[i] += particles.velocity[i] * dt;
                }
                ExplicitRule::ExplicitEuler => {
                    particles.old_position[i] = particles.position[i];
                    particles.position[i] += particles.velocity[i] * dt;
                    particles.velocity[i] += a * dt;
                }
                ExplicitRule::Verlet => {
                    let current = particles.position[i];
                    particles.position[i] += (current - particles.old_position[i]) + a * dt * dt;
                    particles.old_position[i] = current;
                    particles.velocity[i] = (particles.position[i] - current) / dt;
                }
            }
        }

        particles.clear_forces();
    }
}

#[inline]
fn predict_node(p: &mut DVec3, v: &mut DVec3, old: &mut DVec3, a: DVec3, w: f64, dt: f64) {
    if w == 0.0 {
        return;
    }
    *v += a * dt;
    *old = *p;
    *p += *v * dt;
}

#[inline]
fn derive_node(p: DVec3, old: DVec3, v: &mut DVec3, w: f64, dt: f64) {
    if w == 0.0 {
        return;
    }
    *v = (p - old) / dt;
}

#[cfg(not(feature = "parallel"))]
fn predict(particles: &mut ParticleSet, dt: f64) {
    for i in 0..particles.count {
        predict_node(
            &mut particles.position[i],
            &mut particles.velocity[i],
            &mut particles.old_position[i],
            particles.acceleration[i],
            particles.inv_mass[i],
            dt,
        );
    }
}

#[cfg(feature = "parallel")]
fn predict(particles: &mut ParticleSet, dt: f64) {
    particles
        .position
        .par_iter_mut()
        .zip(particles.velocity.par_iter_mut())
        .zip(particles.old_position.par_iter_mut())
        .zip(particles.acceleration.par_iter())
        .zip(particles.inv_mass.par_iter())
        .for_each(|((((p, v), old), a), w)| predict_node(p, v, old, *a, *w, dt));
}

#[cfg(not(feature = "parallel"))]
fn derive_velocities(particles: &mut ParticleSet, dt: f64) {
    for i in 0..particles.count {
        derive_node(
            particles.position[i],
            particles.old_position[i],
            &mut particles.velocity[i],
            particles.inv_mass[i],
            dt,
        );
    }
}

#[cfg(feature = "parallel")]
fn derive_velocities(particles: &mut ParticleSet, dt: f64) {
    particles
        .velocity
        .par_iter_mut()
        .zip(particles.position.par_iter())
        .zip(particles.old_position.par_iter())
        .zip(particles.inv_mass.par_iter())
        .for_each(|(((v, p), old), w)| derive_node(*p, *old, v, *w, dt));
}
