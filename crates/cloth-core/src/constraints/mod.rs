//! Position constraints projected by the PBD family of methods.

pub mod distance;
