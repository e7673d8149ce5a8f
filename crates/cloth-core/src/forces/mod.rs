//! Force sources for the mass-spring methods and driver impulses.

pub mod impulse;
pub mod spring;
