use glam::DVec3;

use crate::error::{ClothError, ClothResult};
use crate::particle::ParticleSet;

/// Fraction of the primary magnitude added as lift by the diagonal impulses.
const LIFT_FRACTION: f64 = 0.01;

/// Direction of a driver-triggered nudge applied to the whole cloth.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Impulse {
    Up = 0,
    Down = 1,
    Front = 2,
    Back = 3,
    /// Toward -X with a small +Y lift.
    LeftUp = 4,
    /// Toward +X with a small +Y lift.
    RightUp = 5,
}

impl Impulse {
    pub fn from_code(code: u8) -> ClothResult<Self> {
        match code {
            0 => Ok(Impulse::Up),
            1 => Ok(Impulse::Down),
            2 => Ok(Impulse::Front),
            3 => Ok(Impulse::Back),
            4 => Ok(Impulse::LeftUp),
            5 => Ok(Impulse::RightUp),
            other => Err(ClothError::UnknownImpulse(other)),
        }
    }

    /// Unscaled direction; the diagonal variants are not unit length.
    pub fn direction(self) -> DVec3 {
        match self {
            Impulse::Up => DVec3::Y,
            Impulse::Down => DVec3::NEG_Y,
            Impulse::Front => DVec3::Z,
            Impulse::Back => DVec3::NEG_Z,
            Impulse::LeftUp => DVec3::new(-1.0, LIFT_FRACTION, 0.0),
            Impulse::RightUp => DVec3::new(1.0, LIFT_FRACTION, 0.0),
        }
    }
}

/// Where an impulse is written.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ImpulseTarget {
    /// Add straight to velocity (position-based methods).
    Velocity,
    /// Add to the force accumulator, scaled by the given factor, so it
    /// survives into the next spring iteration.
    Force(f64),
}

/// Nudge every unpinned node by `impulse * magnitude * inv_mass`.
pub fn apply_impulse(
    particles: &mut ParticleSet,
    impulse: Impulse,
    magnitude: f64,
    target: ImpulseTarget,
) {
    let dir = impulse.direction() * magnitude;
    for i in 0..particles.count {
        let w = particles.inv_mass[i];
        if w == 0.0 {
            continue;
        }
        match target {
            ImpulseTarget::Velocity => particles.velocity[i] += dir * w,
            ImpulseTarget::Force(scale) => particles.force[i] += dir * w * scale,
        }
    }
}
