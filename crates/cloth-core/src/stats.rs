use crate::method::Method;

/// Summary of a single `Cloth::integrate` call, or of a whole frame when
/// merged by the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepStats {
    pub method: Method,
    /// Timestep of the last integrate call.
    pub dt: f64,
    /// Number of integrate calls summarised (1 for a single step).
    pub substeps: u32,
    /// Constraint passes or spring iterations per integrate call.
    pub passes: u32,
    pub particle_count: u32,
    pub constraint_count: u32,
    pub spring_count: u32,
    /// Largest distance any node moved during the step(s).
    pub max_displacement: f64,
    /// Largest node speed at the end of the step(s).
    pub max_speed: f64,
    /// False once any position or velocity became NaN or infinite.
    pub finite: bool,
}

impl StepStats {
    /// Stats for a call that did not advance the simulation.
    pub fn idle(method: Method) -> Self {
        Self {
            method,
            dt: 0.0,
            substeps: 0,
            passes: 0,
            particle_count: 0,
            constraint_count: 0,
            spring_count: 0,
            max_displacement: 0.0,
            max_speed: 0.0,
            finite: true,
        }
    }

    /// Fold a later step into this summary.
    pub fn merge(&mut self, next: &StepStats) {
        self.method = next.method;
        self.dt = next.dt;
        self.substeps += next.substeps;
        self.passes = next.passes;
        self.particle_count = next.particle_count;
        self.constraint_count = next.constraint_count;
        self.spring_count = next.spring_count;
        self.max_displacement = self.max_displacement.max(next.max_displacement);
        self.max_speed = next.max_speed;
        self.finite &= next.finite;
    }
}
