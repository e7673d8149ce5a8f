use glam::DVec3;
use tracing::{debug, info, trace};

use crate::config::ClothConfig;
use crate::constraints::distance::DistanceConstraint;
use crate::error::{ClothError, ClothResult};
use crate::forces::impulse::{apply_impulse, Impulse, ImpulseTarget};
use crate::forces::spring::Spring;
use crate::integrator::{step_projection, step_springs, StepKind};
use crate::method::{BendingLevel, Method};
use crate::normals::compute_vertex_normals;
use crate::particle::ParticleSet;
use crate::presets::MethodPreset;
use crate::render::DrawMode;
use crate::stats::StepStats;
use crate::topology;

/// A rectangular cloth: node grid, constraint graph and render faces.
///
/// Owns every node, constraint, spring and face. Constraints, springs and
/// faces refer to nodes by index; the node columns are sized once per build
/// and only replaced wholesale by `reset`.
pub struct Cloth {
    config: ClothConfig,
    particles: ParticleSet,
    constraints: Vec<DistanceConstraint>,
    springs: Vec<Spring>,
    faces: Vec<u32>,
    draw_mode: DrawMode,
    /// Positions at the start of the current step, for displacement stats.
    step_start: Vec<DVec3>,
}

impl Cloth {
    /// Validate `config` and build the cloth.
    pub fn new(config: ClothConfig) -> ClothResult<Self> {
        config.validate()?;
        let mut cloth = Self {
            config,
            particles: ParticleSet::new(0),
            constraints: Vec::new(),
            springs: Vec::new(),
            faces: Vec::new(),
            draw_mode: DrawMode::default(),
            step_start: Vec::new(),
        };
        cloth.build();
        Ok(cloth)
    }

    /// Throw away all state and rebuild it from the configuration.
    ///
    /// The constraint order is reproduced exactly (same shuffle seed).
    pub fn reset(&mut self) {
        debug!(method = self.config.method.name(), "resetting cloth");
        self.build();
    }

    /// Switch integration method, take that method's preset iteration
    /// count and rebuild.
    pub fn set_method(&mut self, method: Method) {
        let iterations = MethodPreset::for_method(method).iterations;
        debug!(
            from = self.config.method.name(),
            to = method.name(),
            iterations,
            "switching method"
        );
        self.config.method = method;
        self.config.iterations = iterations;
        self.build();
    }

    /// Apply a full method preset (method, iterations, grid size, bending)
    /// and rebuild.
    pub fn apply_preset(&mut self, preset: MethodPreset) {
        debug!(method = preset.method.name(), "applying preset");
        preset.apply_to(&mut self.config);
        self.build();
    }

    /// Move the cloth's world-space origin. Simulation state is kept.
    pub fn set_origin(&mut self, origin: DVec3) -> ClothResult<()> {
        if !origin.is_finite() {
            return Err(ClothError::InvalidConfig(format!("origin must be finite, got {origin}")));
        }
        self.config.origin = origin;
        Ok(())
    }

    /// Change the iteration count. Takes effect on the next step.
    pub fn set_iterations(&mut self, iterations: u32) {
        self.config.iterations = iterations.max(1);
    }

    /// Change the bending topology and rebuild.
    pub fn set_bending_level(&mut self, level: BendingLevel) {
        debug!(?level, "switching bending level");
        self.config.bending_level = level;
        self.build();
    }

    fn build(&mut self) {
        let config = &self.config;
        let w = config.nodes_in_width;
        let h = config.nodes_in_height;

        let particles = topology::build_particles(config);
        let faces = topology::build_faces(w, h);
        let links = topology::shuffled_links(w, h, config.bending_level, config.shuffle_seed);

        let (constraints, springs) = if config.method.is_position_based() {
            (topology::build_constraints(&links, &particles, config), Vec::new())
        } else {
            (Vec::new(), topology::build_springs(&links, &particles, config))
        };

        info!(
            nodes = particles.count,
            width = w,
            height = h,
            constraints = constraints.len(),
            springs = springs.len(),
            faces = faces.len() / 3,
            method = config.method.name(),
            "built cloth"
        );

        self.step_start = vec![DVec3::ZERO; particles.count];
        self.particles = particles;
        self.constraints = constraints;
        self.springs = springs;
        self.faces = faces;
    }

    /// Advance the cloth by `dt` using the configured method.
    ///
    /// Near-zero timesteps are ignored. For `XpbdSmallStep` this performs a
    /// single projection pass; the caller sub-divides the frame.
    pub fn integrate(&mut self, dt: f64) -> StepStats {
        let method = self.config.method;
        if dt.abs() < 1.0e-9 {
            return StepStats::idle(method);
        }

        self.step_start.copy_from_slice(&self.particles.position);

        let kind = StepKind::for_method(method, self.config.iterations);
        match kind {
            StepKind::Projection { mode, passes } => {
                step_projection(&mut self.particles, &mut self.constraints, dt, mode, passes);
            }
            StepKind::Springs { rule, iterations } => {
                step_springs(&mut self.particles, &self.springs, dt, rule, iterations);
            }
        }

        let stats = self.collect_stats(dt, kind.passes());
        trace!(
            method = method.name(),
            dt,
            max_displacement = stats.max_displacement,
            max_speed = stats.max_speed,
            "integrated"
        );
        stats
    }

    fn collect_stats(&self, dt: f64, passes: u32) -> StepStats {
        let mut max_displacement: f64 = 0.0;
        let mut max_speed: f64 = 0.0;
        for i in 0..self.particles.count {
            max_displacement =
                max_displacement.max(self.particles.position[i].distance(self.step_start[i]));
            max_speed = max_speed.max(self.particles.velocity[i].length());
        }
        StepStats {
            method: self.config.method,
            dt,
            substeps: 1,
            passes,
            particle_count: self.particles.count as u32,
            constraint_count: self.constraints.len() as u32,
            spring_count: self.springs.len() as u32,
            max_displacement,
            max_speed,
            finite: self.particles.all_finite(),
        }
    }

    /// Recompute shading normals. Call after stepping, before rendering.
    pub fn compute_normals(&mut self) {
        compute_vertex_normals(
            &self.particles.position,
            &self.faces,
            &mut self.particles.normal,
        );
    }

    /// Push every free node in `impulse`'s direction.
    ///
    /// Position-based methods receive a velocity change; spring methods
    /// receive a scaled force that the next iteration consumes. `magnitude`
    /// defaults to the configured impulse strength.
    pub fn apply_impulse(&mut self, impulse: Impulse, magnitude: Option<f64>) {
        let magnitude = magnitude.unwrap_or(self.config.impulse_strength);
        let target = if self.config.method.is_position_based() {
            ImpulseTarget::Velocity
        } else {
            ImpulseTarget::Force(self.config.impulse_force_scale)
        };
        debug!(?impulse, magnitude, "applying impulse");
        apply_impulse(&mut self.particles, impulse, magnitude, target);
    }

    /// Row-major index of node `(col, row)`.
    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.config.nodes_in_width + col
    }

    /// World-space position of node `index`.
    pub fn world_position(&self, index: usize) -> DVec3 {
        self.config.origin + self.particles.position[index]
    }

    /// Place node `index` at a world-space position.
    pub fn set_world_position(&mut self, index: usize, position: DVec3) {
        self.particles.position[index] = position - self.config.origin;
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn method(&self) -> Method {
        self.config.method
    }

    pub fn nodes_in_width(&self) -> usize {
        self.config.nodes_in_width
    }

    pub fn nodes_in_height(&self) -> usize {
        self.config.nodes_in_height
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// Constraints in solve order.
    pub fn constraints(&self) -> &[DistanceConstraint] {
        &self.constraints
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Flat triangle index list (three indices per face).
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }
}
