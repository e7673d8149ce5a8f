//! Per-frame stepping policy for an interactive host.
//!
//! A host calls `advance` once per rendered frame. The driver decides how
//! many integrate calls that frame needs and whether the simulation is
//! paused.

use tracing::debug;

use crate::cloth::Cloth;
use crate::method::Method;
use crate::stats::StepStats;

/// Whether frames advance the simulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    Running,
    Paused,
    /// Advance exactly one frame, then pause.
    StepOnce,
}

/// Drives a cloth at a fixed frame timestep.
pub struct FrameDriver {
    pub frame_dt: f64,
    state: RunState,
}

impl FrameDriver {
    /// Starts in `StepOnce`: the first frame is simulated, then the driver
    /// waits for `toggle_pause` or `request_step`.
    pub fn new(frame_dt: f64) -> Self {
        Self {
            frame_dt,
            state: RunState::StepOnce,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Flip between running and paused.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused | RunState::StepOnce => RunState::Running,
        };
        debug!(state = ?self.state, "toggled pause");
    }

    /// Simulate one more frame, then pause.
    pub fn request_step(&mut self) {
        self.state = RunState::StepOnce;
    }

    /// Rebuild the cloth and pause.
    pub fn reset(&mut self, cloth: &mut Cloth) {
        cloth.reset();
        self.state = RunState::Paused;
    }

    /// Simulate one frame unless paused, then refresh normals.
    ///
    /// `XpbdSmallStep` takes `iterations` integrate calls of
    /// `frame_dt / iterations`; every other method takes one call of
    /// `frame_dt` and iterates internally.
    pub fn advance(&mut self, cloth: &mut Cloth) -> Option<StepStats> {
        if self.state == RunState::Paused {
            return None;
        }

        let substeps = substeps_for(cloth.method(), cloth.config().iterations);
        let dt = self.frame_dt / substeps as f64;

        let mut frame = StepStats::idle(cloth.method());
        for _ in 0..substeps {
            frame.merge(&cloth.integrate(dt));
        }
        cloth.compute_normals();

        if self.state == RunState::StepOnce {
            self.state = RunState::Paused;
        }
        Some(frame)
    }
}

/// Integrate calls per frame for a method.
pub fn substeps_for(method: Method, iterations: u32) -> u32 {
    match method {
        Method::XpbdSmallStep => iterations.max(1),
        _ => 1,
    }
}
