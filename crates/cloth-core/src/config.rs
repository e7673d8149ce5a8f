use glam::{DVec2, DVec3};

use crate::error::{ClothError, ClothResult};
use crate::method::{BendingLevel, Method};

/// Seed of the constraint-order shuffle. Fixed so runs are reproducible.
pub const DEFAULT_SHUFFLE_SEED: u64 = 15162428;

/// Everything needed to build and step a cloth.
///
/// Plain values, supplied once at construction. `Default` reproduces the
/// 60x90-node curtain hanging from its two top corners.
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig {
    /// World-space offset of the cloth's local origin (top-left node).
    pub origin: DVec3,
    /// Physical width and height of the cloth.
    pub extent: DVec2,
    /// Number of nodes along X (columns).
    pub nodes_in_width: usize,
    /// Number of nodes along Y (rows).
    pub nodes_in_height: usize,
    pub method: Method,
    /// Solver passes per step (position methods) or inner force
    /// iterations (spring methods). For `XpbdSmallStep` this is the number
    /// of sub-steps the driver takes per frame.
    pub iterations: u32,
    pub bending_level: BendingLevel,
    /// Frame timestep used by the driver.
    pub time_step: f64,
    pub gravity: DVec3,
    /// Inverse mass of every unpinned node.
    pub default_inv_mass: f64,
    /// XPBD compliance of bending constraints. Structural and shear
    /// constraints are always rigid.
    pub bending_compliance: f64,
    /// Correction factor of the classic PBD rule.
    pub pbd_stiffness: f64,
    /// Default magnitude of a driver impulse.
    pub impulse_strength: f64,
    /// Extra factor applied when an impulse lands in the force accumulator.
    pub impulse_force_scale: f64,
    /// Hook coefficient of structural and shear springs.
    pub spring_stiffness: f64,
    /// Hook coefficient of bending springs.
    pub bending_spring_stiffness: f64,
    pub spring_damping: f64,
    pub shuffle_seed: u64,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            origin: DVec3::new(-2.5, 5.0, -4.0),
            extent: DVec2::new(5.0, 10.0),
            nodes_in_width: 60,
            nodes_in_height: 90,
            method: Method::Xpbd,
            iterations: 10,
            bending_level: BendingLevel::All,
            time_step: 1.0 / 60.0,
            gravity: DVec3::new(0.0, -10.0, 0.0),
            default_inv_mass: 5.0,
            bending_compliance: 1.0,
            pbd_stiffness: 0.1,
            impulse_strength: 1.0,
            impulse_force_scale: 100.0,
            spring_stiffness: 60.0,
            bending_spring_stiffness: 10.0,
            spring_damping: 0.2,
            shuffle_seed: DEFAULT_SHUFFLE_SEED,
        }
    }
}

impl ClothConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_extent(mut self, extent: DVec2) -> Self {
        self.extent = extent;
        self
    }

    /// Set the node grid resolution (columns, rows).
    pub fn with_nodes(mut self, width: usize, height: usize) -> Self {
        self.nodes_in_width = width;
        self.nodes_in_height = height;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_bending_level(mut self, level: BendingLevel) -> Self {
        self.bending_level = level;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_gravity(mut self, gravity: DVec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_bending_compliance(mut self, compliance: f64) -> Self {
        self.bending_compliance = compliance;
        self
    }

    pub fn with_pbd_stiffness(mut self, stiffness: f64) -> Self {
        self.pbd_stiffness = stiffness;
        self
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = seed;
        self
    }

    /// Check every value the topology builder and integrator rely on.
    pub fn validate(&self) -> ClothResult<()> {
        if self.nodes_in_width < 2 || self.nodes_in_height < 2 {
            return Err(ClothError::InvalidGrid {
                width: self.nodes_in_width,
                height: self.nodes_in_height,
            });
        }
        let node_count = self
            .nodes_in_width
            .checked_mul(self.nodes_in_height)
            .and_then(|count| u32::try_from(count).ok());
        if node_count.is_none() {
            return Err(ClothError::InvalidConfig(format!(
                "{}x{} nodes exceed the u32 index range",
                self.nodes_in_width, self.nodes_in_height
            )));
        }
        if !(self.extent.is_finite() && self.extent.x > 0.0 && self.extent.y > 0.0) {
            return Err(ClothError::InvalidConfig(format!(
                "extent must be finite and positive, got {}",
                self.extent
            )));
        }
        if !self.origin.is_finite() || !self.gravity.is_finite() {
            return Err(ClothError::InvalidConfig(
                "origin and gravity must be finite".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(ClothError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ClothError::InvalidConfig(format!(
                "time step must be finite and positive, got {}",
                self.time_step
            )));
        }
        let non_negative = [
            ("default inverse mass", self.default_inv_mass),
            ("bending compliance", self.bending_compliance),
            ("PBD stiffness", self.pbd_stiffness),
            ("impulse force scale", self.impulse_force_scale),
            ("spring stiffness", self.spring_stiffness),
            ("bending spring stiffness", self.bending_spring_stiffness),
            ("spring damping", self.spring_damping),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ClothError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.impulse_strength.is_finite() {
            return Err(ClothError::InvalidConfig(
                "impulse strength must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
