use crate::error::{ClothError, ClothResult};

/// Integration method driving a cloth step.
///
/// The first three variants project distance constraints on positions; the
/// last three integrate spring forces explicitly.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Method {
    /// Extended PBD: compliance and accumulated Lagrange multipliers.
    Xpbd = 1,
    /// Classic PBD: fixed stiffness factor, no multipliers.
    Pbd = 2,
    /// XPBD with small steps: one projection pass per (sub-divided) step.
    XpbdSmallStep = 3,
    /// Position Verlet over a mass-spring network.
    Verlet = 4,
    /// Explicit (forward) Euler over a mass-spring network.
    ExplicitEuler = 5,
    /// Semi-implicit (symplectic) Euler over a mass-spring network.
    SemiImplicitEuler = 6,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Xpbd,
        Method::Pbd,
        Method::XpbdSmallStep,
        Method::Verlet,
        Method::ExplicitEuler,
        Method::SemiImplicitEuler,
    ];

    /// Decode a method from its numeric code (1..=6).
    pub fn from_code(code: u8) -> ClothResult<Self> {
        match code {
            1 => Ok(Method::Xpbd),
            2 => Ok(Method::Pbd),
            3 => Ok(Method::XpbdSmallStep),
            4 => Ok(Method::Verlet),
            5 => Ok(Method::ExplicitEuler),
            6 => Ok(Method::SemiImplicitEuler),
            other => Err(ClothError::UnknownMethod(other)),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Display name used in logs and overlays.
    pub fn name(self) -> &'static str {
        match self {
            Method::Xpbd => "XPBD",
            Method::Pbd => "PBD",
            Method::XpbdSmallStep => "XPBD_SS",
            Method::Verlet => "Verlet_Integration",
            Method::ExplicitEuler => "Explicit_Euler",
            Method::SemiImplicitEuler => "Semi_Implicit_Euler",
        }
    }

    /// True for the methods that project distance constraints.
    pub fn is_position_based(self) -> bool {
        matches!(self, Method::Xpbd | Method::Pbd | Method::XpbdSmallStep)
    }

    /// True for the mass-spring methods.
    pub fn is_force_based(self) -> bool {
        !self.is_position_based()
    }
}

/// Which distance-2 bending constraints the topology builder adds.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BendingLevel {
    /// Structural and shear constraints only.
    None = 0,
    /// Diagonal bending pairs only.
    Diagonal = 1,
    /// Horizontal and vertical bending pairs only.
    Axis = 2,
    /// Both diagonal and axis pairs.
    All = 3,
}

impl BendingLevel {
    pub fn from_code(code: u8) -> ClothResult<Self> {
        match code {
            0 => Ok(BendingLevel::None),
            1 => Ok(BendingLevel::Diagonal),
            2 => Ok(BendingLevel::Axis),
            3 => Ok(BendingLevel::All),
            other => Err(ClothError::UnknownBendingLevel(other)),
        }
    }

    pub fn includes_diagonal(self) -> bool {
        matches!(self, BendingLevel::Diagonal | BendingLevel::All)
    }

    pub fn includes_axis(self) -> bool {
        matches!(self, BendingLevel::Axis | BendingLevel::All)
    }
}
