use approx::assert_abs_diff_eq;
use cloth_core::driver::{FrameDriver, RunState};
use cloth_core::presets::MethodPreset;
use cloth_core::render::{write_vertices, DrawMode};
use cloth_core::{BendingLevel, Cloth, ClothConfig, ClothError, Impulse, Method};
use glam::{DVec2, DVec3};

const DT: f64 = 1.0 / 60.0;

fn grid(w: usize, h: usize, method: Method) -> ClothConfig {
    ClothConfig::new()
        .with_nodes(w, h)
        .with_extent(DVec2::new(1.0, 1.0))
        .with_method(method)
}

fn free_nodes(cloth: &Cloth) -> Vec<usize> {
    let p = cloth.particles();
    (0..p.count).filter(|&i| !p.is_pinned(i)).collect()
}

fn free_mean_y(cloth: &Cloth) -> f64 {
    let free = free_nodes(cloth);
    free.iter().map(|&i| cloth.particles().position[i].y).sum::<f64>() / free.len() as f64
}

#[test]
fn test_construction_rejects_degenerate_grid() {
    let result = Cloth::new(ClothConfig::new().with_nodes(1, 8));
    assert!(matches!(result, Err(ClothError::InvalidGrid { width: 1, height: 8 })));
}

#[test]
fn test_four_by_four_xpbd_drapes_without_nan() {
    let config = grid(4, 4, Method::Xpbd)
        .with_iterations(10)
        .with_gravity(DVec3::new(0.0, -10.0, 0.0));
    let mut cloth = Cloth::new(config).unwrap();
    let free = free_nodes(&cloth);
    assert_eq!(free.len(), 14);

    let start: Vec<f64> = free.iter().map(|&i| cloth.particles().position[i].y).collect();
    cloth.integrate(DT);
    for (&i, &y0) in free.iter().zip(&start) {
        let y1 = cloth.particles().position[i].y;
        assert!(y1 < y0, "node {i} should fall in the first step: {y0} -> {y1}");
    }

    for _ in 1..60 {
        let stats = cloth.integrate(DT);
        assert!(stats.finite, "positions must stay finite");
        assert_eq!(stats.passes, 10);
    }
    assert!(cloth.particles().all_finite());
    assert!(cloth.particles().velocity.iter().all(|v| v.is_finite()));
}

#[test]
fn test_single_xpbd_step_keeps_negative_zero_pins() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    let bits = |cloth: &Cloth| cloth.particles().position[0].y.to_bits();
    assert_eq!(bits(&cloth), (-0.0f64).to_bits());
    cloth.integrate(DT);
    assert_eq!(bits(&cloth), (-0.0f64).to_bits());
}

#[test]
fn test_pinned_nodes_are_bit_identical_for_every_method() {
    for method in Method::ALL {
        let config = grid(5, 5, method).with_iterations(4);
        let mut cloth = Cloth::new(config).unwrap();
        let pinned: Vec<usize> = cloth.particles().pinned().collect();
        assert_eq!(pinned.len(), 2);
        let before: Vec<DVec3> = pinned.iter().map(|&i| cloth.particles().position[i]).collect();

        let dt = if method.is_force_based() { 1.0e-4 } else { DT };
        for step in 0..50 {
            if step == 10 {
                cloth.apply_impulse(Impulse::RightUp, None);
            }
            cloth.integrate(dt);
        }

        for (k, &i) in pinned.iter().enumerate() {
            let after = cloth.particles().position[i];
            assert_eq!(after.x.to_bits(), before[k].x.to_bits(), "{method:?} node {i}");
            assert_eq!(after.y.to_bits(), before[k].y.to_bits(), "{method:?} node {i}");
            assert_eq!(after.z.to_bits(), before[k].z.to_bits(), "{method:?} node {i}");
        }
    }
}

#[test]
fn test_zero_dt_is_ignored() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    let before = cloth.particles().position.clone();
    let stats = cloth.integrate(0.0);
    assert_eq!(stats.substeps, 0);
    assert_eq!(cloth.particles().position, before);
}

#[test]
fn test_flat_cloth_normals_are_unit_z() {
    let mut cloth = Cloth::new(grid(5, 4, Method::Xpbd)).unwrap();
    cloth.compute_normals();

    let normals = &cloth.particles().normal;
    for n in normals {
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.z.abs(), 1.0, epsilon = 1e-12);
        assert_eq!(n.z.signum(), normals[0].z.signum(), "normals must agree in sign");
    }
}

#[test]
fn test_normals_follow_deformation() {
    let mut cloth = Cloth::new(grid(6, 6, Method::Xpbd)).unwrap();
    cloth.apply_impulse(Impulse::Front, Some(3.0));
    for _ in 0..20 {
        cloth.integrate(DT);
    }
    cloth.compute_normals();
    for n in &cloth.particles().normal {
        assert!(n.is_finite());
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_impulse_changes_velocity_for_position_methods() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    cloth.apply_impulse(Impulse::Up, Some(2.0));

    let p = cloth.particles();
    for i in 0..p.count {
        if p.is_pinned(i) {
            assert_eq!(p.velocity[i], DVec3::ZERO);
        } else {
            assert_abs_diff_eq!(p.velocity[i].y, 2.0 * p.inv_mass[i], epsilon = 1e-12);
            assert_eq!(p.force[i], DVec3::ZERO);
        }
    }
}

#[test]
fn test_impulse_changes_force_for_spring_methods() {
    let config = grid(4, 4, Method::SemiImplicitEuler);
    let scale = config.impulse_force_scale;
    let mut cloth = Cloth::new(config).unwrap();
    cloth.apply_impulse(Impulse::Back, None);

    let p = cloth.particles();
    for i in 0..p.count {
        assert_eq!(p.velocity[i], DVec3::ZERO);
        if !p.is_pinned(i) {
            assert_abs_diff_eq!(p.force[i].z, -p.inv_mass[i] * scale, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_diagonal_impulse_adds_lift() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Pbd)).unwrap();
    cloth.apply_impulse(Impulse::LeftUp, Some(1.0));
    let i = cloth.index(1, 1);
    let v = cloth.particles().velocity[i];
    let w = cloth.particles().inv_mass[i];
    assert_abs_diff_eq!(v.x, -w, epsilon = 1e-12);
    assert_abs_diff_eq!(v.y, 0.01 * w, epsilon = 1e-12);
}

#[test]
fn test_small_steps_reduce_per_step_motion() {
    let max_step_motion = |substeps: u32| {
        let config = grid(8, 8, Method::XpbdSmallStep).with_iterations(substeps);
        let mut cloth = Cloth::new(config).unwrap();
        let dt = DT / substeps as f64;
        let mut worst: f64 = 0.0;
        for _ in 0..(60 * substeps) {
            let stats = cloth.integrate(dt);
            assert!(stats.finite);
            worst = worst.max(stats.max_displacement);
        }
        worst
    };

    let coarse = max_step_motion(1);
    let fine = max_step_motion(10);
    assert!(fine < coarse, "N=10 ({fine}) should move less per step than N=1 ({coarse})");
}

#[test]
fn test_xpbd_holds_length_better_than_pbd() {
    let violation = |method: Method| {
        let config = grid(8, 8, method)
            .with_iterations(10)
            .with_bending_level(BendingLevel::None);
        let mut cloth = Cloth::new(config).unwrap();
        for _ in 0..30 {
            cloth.integrate(DT);
        }
        cloth_core::constraints::distance::max_violation(cloth.constraints(), cloth.particles())
    };
    assert!(violation(Method::Xpbd) < violation(Method::Pbd));
}

#[test]
fn test_spring_methods_fall_and_stay_finite() {
    for method in [Method::Verlet, Method::ExplicitEuler, Method::SemiImplicitEuler] {
        let config = grid(5, 5, method).with_iterations(10);
        let mut cloth = Cloth::new(config).unwrap();
        let start = free_mean_y(&cloth);
        for _ in 0..100 {
            let stats = cloth.integrate(1.0e-4);
            assert!(stats.finite, "{method:?} blew up");
            assert_eq!(stats.spring_count, cloth.springs().len() as u32);
        }
        assert!(free_mean_y(&cloth) < start, "{method:?} should fall under gravity");
        assert!(cloth.particles().force.iter().all(|f| *f == DVec3::ZERO));
    }
}

#[test]
fn test_spring_presets_stay_finite_at_frame_rate() {
    for method in [Method::Verlet, Method::SemiImplicitEuler] {
        let mut config = ClothConfig::default();
        MethodPreset::for_method(method).apply_to(&mut config);
        let mut cloth = Cloth::new(config).unwrap();
        let mut driver = FrameDriver::new(DT);
        driver.toggle_pause();
        for frame in 0..60 {
            let stats = driver.advance(&mut cloth).unwrap();
            assert!(stats.finite, "{method:?} blew up in frame {frame}");
        }
        assert!(cloth.particles().all_finite());
    }
}

#[test]
fn test_set_method_takes_preset_iterations() {
    let config = ClothConfig::default().with_nodes(30, 45);
    let mut cloth = Cloth::new(config).unwrap();
    assert_eq!(cloth.config().iterations, 10);

    cloth.set_method(Method::Verlet);
    assert_eq!(cloth.config().iterations, 40);
    for _ in 0..60 {
        assert!(cloth.integrate(DT).finite);
    }

    cloth.set_method(Method::Pbd);
    assert_eq!(cloth.config().iterations, 20);
    assert_eq!(cloth.nodes_in_width(), 30);
    assert_eq!(cloth.config().bending_level, BendingLevel::All);
}

#[test]
fn test_apply_preset_replaces_grid() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    cloth.apply_preset(MethodPreset::SEMI_IMPLICIT_EULER);
    assert_eq!(cloth.method(), Method::SemiImplicitEuler);
    assert_eq!(cloth.particles().count, 64 * 64);
    assert_eq!(cloth.config().iterations, 40);
    assert_eq!(cloth.config().bending_level, BendingLevel::None);
    assert!(cloth.constraints().is_empty());
}

#[test]
fn test_set_origin_keeps_state() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    cloth.integrate(DT);
    let local = cloth.particles().position.clone();

    cloth.set_origin(DVec3::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(cloth.particles().position, local);
    assert_eq!(cloth.world_position(5), DVec3::new(1.0, 2.0, 3.0) + local[5]);

    let err = cloth.set_origin(DVec3::new(f64::NAN, 0.0, 0.0));
    assert!(matches!(err, Err(ClothError::InvalidConfig(_))));
    assert_eq!(cloth.config().origin, DVec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_set_method_rebuilds_graph() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    assert!(!cloth.constraints().is_empty());
    cloth.set_method(Method::Verlet);
    assert!(cloth.constraints().is_empty());
    assert!(!cloth.springs().is_empty());
    cloth.set_method(Method::Pbd);
    assert!(cloth.springs().is_empty());
    assert_eq!(cloth.method(), Method::Pbd);
}

#[test]
fn test_set_bending_level_rebuilds_graph() {
    let mut cloth = Cloth::new(grid(6, 6, Method::Xpbd)).unwrap();
    let all = cloth.constraints().len();
    cloth.set_bending_level(BendingLevel::None);
    assert!(cloth.constraints().len() < all);
}

#[test]
fn test_world_position_offsets_by_origin() {
    let config = grid(3, 3, Method::Xpbd).with_origin(DVec3::new(-2.5, 5.0, -4.0));
    let mut cloth = Cloth::new(config).unwrap();
    let i = cloth.index(2, 1);
    let local = cloth.particles().position[i];
    assert_eq!(cloth.world_position(i), local + DVec3::new(-2.5, 5.0, -4.0));

    cloth.set_world_position(i, DVec3::new(0.0, 0.0, 0.0));
    assert_eq!(cloth.particles().position[i], DVec3::new(2.5, -5.0, 4.0));
}

#[test]
fn test_vertex_export_matches_nodes() {
    let mut cloth = Cloth::new(grid(3, 4, Method::Xpbd)).unwrap();
    cloth.compute_normals();
    cloth.set_draw_mode(DrawMode::Lines);
    assert_eq!(cloth.draw_mode(), DrawMode::Lines);

    let mut vertices = Vec::new();
    write_vertices(&cloth, &mut vertices);
    assert_eq!(vertices.len(), 12);
    let last = cloth.particles().count - 1;
    let world = cloth.world_position(last).as_vec3();
    assert_eq!(vertices[last].position, world.to_array());
    assert_abs_diff_eq!(vertices[last].uv[1], 1.0, epsilon = 1e-6);
}

// ---------------------------------------------------------------------------
// Frame driver
// ---------------------------------------------------------------------------

#[test]
fn test_driver_steps_once_then_pauses() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    let mut driver = FrameDriver::new(DT);

    let first = driver.advance(&mut cloth);
    assert!(first.is_some());
    assert_eq!(driver.state(), RunState::Paused);
    assert!(driver.advance(&mut cloth).is_none());

    driver.toggle_pause();
    for _ in 0..3 {
        assert!(driver.advance(&mut cloth).is_some());
    }
}

#[test]
fn test_driver_subdivides_small_step_frames() {
    let config = grid(4, 4, Method::XpbdSmallStep).with_iterations(10);
    let mut cloth = Cloth::new(config).unwrap();
    let mut driver = FrameDriver::new(DT);

    let stats = driver.advance(&mut cloth).unwrap();
    assert_eq!(stats.substeps, 10);
    assert_abs_diff_eq!(stats.dt, DT / 10.0, epsilon = 1e-15);
    assert_eq!(stats.passes, 1);
}

#[test]
fn test_driver_single_call_for_xpbd() {
    let config = grid(4, 4, Method::Xpbd).with_iterations(10);
    let mut cloth = Cloth::new(config).unwrap();
    let mut driver = FrameDriver::new(DT);

    let stats = driver.advance(&mut cloth).unwrap();
    assert_eq!(stats.substeps, 1);
    assert_eq!(stats.passes, 10);
    assert_abs_diff_eq!(stats.dt, DT, epsilon = 1e-15);
    assert!(cloth.particles().normal.iter().all(|n| n.length() > 0.0));
}

#[test]
fn test_driver_reset_restores_and_pauses() {
    let mut cloth = Cloth::new(grid(4, 4, Method::Xpbd)).unwrap();
    let start = cloth.particles().position.clone();
    let mut driver = FrameDriver::new(DT);
    driver.toggle_pause();
    for _ in 0..5 {
        driver.advance(&mut cloth);
    }
    driver.reset(&mut cloth);
    assert!(driver.is_paused());
    assert_eq!(cloth.particles().position, start);
}
