use cloth_core::config::{ClothConfig, DEFAULT_SHUFFLE_SEED};
use cloth_core::particle::ParticleSet;
use cloth_core::presets::MethodPreset;
use cloth_core::{BendingLevel, Cloth, Method};
use glam::{DVec2, DVec3};

#[test]
fn test_particle_set_new_initializes_correctly() {
    let particles = ParticleSet::new(10);

    assert_eq!(particles.count, 10);

    for i in 0..10 {
        assert_eq!(particles.position[i], DVec3::ZERO, "position[{i}] should be ZERO");
        assert_eq!(particles.velocity[i], DVec3::ZERO, "velocity[{i}] should be ZERO");
        assert_eq!(particles.acceleration[i], DVec3::ZERO, "acceleration[{i}] should be ZERO");
        assert_eq!(particles.old_position[i], DVec3::ZERO, "old_position[{i}] should be ZERO");
        assert_eq!(particles.force[i], DVec3::ZERO, "force[{i}] should be ZERO");
        assert_eq!(particles.tex_coord[i], DVec2::ZERO, "tex_coord[{i}] should be ZERO");
        assert_eq!(particles.normal[i], DVec3::ZERO, "normal[{i}] should be ZERO");
        assert_eq!(particles.inv_mass[i], 1.0, "inv_mass[{i}] should be 1.0");
        assert!(!particles.is_pinned(i));
    }
}

#[test]
fn test_particle_set_zero_count() {
    let particles = ParticleSet::new(0);

    assert_eq!(particles.count, 0);
    assert_eq!(particles.position.len(), 0);
    assert_eq!(particles.velocity.len(), 0);
    assert_eq!(particles.acceleration.len(), 0);
    assert_eq!(particles.old_position.len(), 0);
    assert_eq!(particles.force.len(), 0);
    assert_eq!(particles.tex_coord.len(), 0);
    assert_eq!(particles.normal.len(), 0);
    assert_eq!(particles.inv_mass.len(), 0);
    assert!(particles.all_finite());
}

#[test]
fn test_mass_and_pinning() {
    let mut particles = ParticleSet::new(3);
    particles.inv_mass[0] = 0.0;
    particles.inv_mass[1] = 4.0;

    assert_eq!(particles.mass(0), None);
    assert_eq!(particles.mass(1), Some(0.25));
    assert_eq!(particles.mass(2), Some(1.0));
    assert_eq!(particles.pinned().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_clear_forces_and_finiteness() {
    let mut particles = ParticleSet::new(2);
    particles.force[1] = DVec3::ONE;
    particles.clear_forces();
    assert!(particles.force.iter().all(|f| *f == DVec3::ZERO));

    particles.velocity[0].x = f64::NAN;
    assert!(!particles.all_finite());
}

#[test]
fn test_config_default_values() {
    let config = ClothConfig::default();

    assert_eq!(config.origin, DVec3::new(-2.5, 5.0, -4.0));
    assert_eq!(config.extent, DVec2::new(5.0, 10.0));
    assert_eq!(config.nodes_in_width, 60);
    assert_eq!(config.nodes_in_height, 90);
    assert_eq!(config.method, Method::Xpbd);
    assert_eq!(config.iterations, 10);
    assert_eq!(config.bending_level, BendingLevel::All);
    assert_eq!(config.time_step, 1.0 / 60.0);
    assert_eq!(config.gravity, DVec3::new(0.0, -10.0, 0.0));
    assert_eq!(config.default_inv_mass, 5.0);
    assert_eq!(config.bending_compliance, 1.0);
    assert_eq!(config.pbd_stiffness, 0.1);
    assert_eq!(config.spring_stiffness, 60.0);
    assert_eq!(config.bending_spring_stiffness, 10.0);
    assert_eq!(config.spring_damping, 0.2);
    assert_eq!(config.shuffle_seed, DEFAULT_SHUFFLE_SEED);
}

#[test]
fn test_config_builder_chain() {
    let config = ClothConfig::new()
        .with_nodes(8, 6)
        .with_method(Method::Pbd)
        .with_iterations(20)
        .with_bending_level(BendingLevel::Diagonal)
        .with_pbd_stiffness(0.2)
        .with_shuffle_seed(7);

    assert_eq!((config.nodes_in_width, config.nodes_in_height), (8, 6));
    assert_eq!(config.method, Method::Pbd);
    assert_eq!(config.iterations, 20);
    assert_eq!(config.bending_level, BendingLevel::Diagonal);
    assert_eq!(config.pbd_stiffness, 0.2);
    assert_eq!(config.shuffle_seed, 7);
    assert!(config.validate().is_ok());
}

#[test]
fn test_preset_builds_cloth() {
    let mut config = ClothConfig::default();
    MethodPreset::SEMI_IMPLICIT_EULER.apply_to(&mut config);
    let cloth = Cloth::new(config).unwrap();

    assert_eq!(cloth.method(), Method::SemiImplicitEuler);
    assert_eq!(cloth.particles().count, 64 * 64);
    assert_eq!(cloth.config().iterations, 40);
    assert!(cloth.constraints().is_empty());
}
