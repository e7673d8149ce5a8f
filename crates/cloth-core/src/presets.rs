use crate::config::ClothConfig;
use crate::method::{BendingLevel, Method};

/// Method preset for quick configuration of a cloth run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MethodPreset {
    pub method: Method,
    pub iterations: u32,
    pub nodes_in_width: usize,
    pub nodes_in_height: usize,
    pub bending_level: BendingLevel,
}

impl MethodPreset {
    /// XPBD: 10 solver passes per step.
    pub const XPBD: Self = Self {
        method: Method::Xpbd,
        iterations: 10,
        nodes_in_width: 64,
        nodes_in_height: 64,
        bending_level: BendingLevel::None,
    };

    /// Classic PBD needs more passes to look as stiff as XPBD.
    pub const PBD: Self = Self {
        method: Method::Pbd,
        iterations: 20,
        nodes_in_width: 64,
        nodes_in_height: 64,
        bending_level: BendingLevel::None,
    };

    /// Small-step XPBD: 10 sub-steps per frame.
    pub const XPBD_SMALL_STEP: Self = Self {
        method: Method::XpbdSmallStep,
        iterations: 10,
        nodes_in_width: 64,
        nodes_in_height: 64,
        bending_level: BendingLevel::None,
    };

    pub const VERLET: Self = Self {
        method: Method::Verlet,
        iterations: 40,
        nodes_in_width: 64,
        nodes_in_height: 64,
        bending_level: BendingLevel::None,
    };

    /// Explicit Euler. Only stays stable with very small timesteps:
    /// roughly 1/1200 s at 40 iterations or 1/600 s at 100.
    pub const EXPLICIT_EULER: Self = Self {
        method: Method::ExplicitEuler,
        iterations: 100,
        nodes_in_width: 64,
        nodes_in_height: 64,
        bending_level: BendingLevel::None,
    };

    pub const SEMI_IMPLICIT_EULER: Self = Self {
        method: Method::SemiImplicitEuler,
        iterations: 40,
        nodes_in_width: 64,
        nodes_in_height: 64,
        bending_level: BendingLevel::None,
    };

    pub const ALL: [Self; 6] = [
        Self::XPBD,
        Self::PBD,
        Self::XPBD_SMALL_STEP,
        Self::VERLET,
        Self::EXPLICIT_EULER,
        Self::SEMI_IMPLICIT_EULER,
    ];

    /// The preset for `method`.
    pub fn for_method(method: Method) -> Self {
        match method {
            Method::Xpbd => Self::XPBD,
            Method::Pbd => Self::PBD,
            Method::XpbdSmallStep => Self::XPBD_SMALL_STEP,
            Method::Verlet => Self::VERLET,
            Method::ExplicitEuler => Self::EXPLICIT_EULER,
            Method::SemiImplicitEuler => Self::SEMI_IMPLICIT_EULER,
        }
    }

    /// Apply this preset to a cloth config.
    pub fn apply_to(&self, config: &mut ClothConfig) {
        config.method = self.method;
        config.iterations = self.iterations;
        config.nodes_in_width = self.nodes_in_width;
        config.nodes_in_height = self.nodes_in_height;
        config.bending_level = self.bending_level;
    }
}
