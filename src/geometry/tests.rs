use std::sync::Arc;

use super::particles::{particle_count, scatter, ParticleParams};
use super::*;
use crate::density::evaluate;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn size_grows_sublinearly() {
    assert!(approx(size_for(300.0), 300f32.powf(0.45) * 10.0 + 20.0));
    let mut last = 0.0;
    for v in [10.0, 50.0, 100.0, 500.0, 1000.0] {
        let s = size_for(v);
        assert!(s > last);
        last = s;
    }
    // doubling the volume grows the square by less than double
    assert!(size_for(1000.0) < 2.0 * size_for(500.0));
}

#[test]
fn floating_object_straddles_the_surface() {
    let b = evaluate(150.0, 300.0, 1.0);
    let size = size_for(300.0);
    let y = y_position(size, &b);
    assert!(approx(y, config::WATER_LEVEL - size * 0.5));
    assert!(y < config::WATER_LEVEL && y + size > config::WATER_LEVEL);
}

#[test]
fn very_light_object_keeps_ten_percent_under() {
    let b = evaluate(1.0, 1000.0, 1.4);
    assert!(b.is_floating);
    let size = size_for(1000.0);
    assert!(approx(immersed_ratio(&b), 0.1));
    assert!(approx(y_position(size, &b), config::WATER_LEVEL - size * 0.9));
}

#[test]
fn sunk_object_rests_on_floor_regardless_of_density() {
    let size = size_for(300.0);
    let steel = evaluate(2340.0, 300.0, 1.0);
    let barely = evaluate(301.0, 300.0, 1.0);
    assert!(!steel.is_floating && !barely.is_floating);
    assert!(approx(y_position(size, &steel), config::FLOOR_LEVEL - size));
    assert!(approx(y_position(size, &barely), config::FLOOR_LEVEL - size));
}

#[test]
fn tie_is_drawn_fully_submerged_at_the_surface() {
    let b = evaluate(300.0, 300.0, 1.0);
    assert!(b.is_floating);
    assert!(approx(y_position(size_for(300.0), &b), config::WATER_LEVEL));
}

#[test]
fn particle_count_saturates() {
    let p = ParticleParams::default();
    assert_eq!(particle_count(1.0, &p), 0);
    assert_eq!(particle_count(151.0, &p), 75);
    assert_eq!(particle_count(1000.0, &p), 500);
    assert_eq!(particle_count(5790.0, &p), 500);

    let sparse = ParticleParams { mass_per_particle: 5.0, cap: 100 };
    assert_eq!(particle_count(250.0, &sparse), 50);
    assert_eq!(particle_count(1000.0, &sparse), 100);
}

#[test]
fn scatter_is_reproducible_and_in_unit_square() {
    let a = scatter(420.0, 50);
    let b = scatter(420.0, 50);
    assert_eq!(a, b);
    assert_ne!(a, scatter(421.0, 50));
    for p in &a {
        assert!((0.0..1.0).contains(&p.pos.x) && (0.0..1.0).contains(&p.pos.y));
        assert!(p.radius >= config::PARTICLE_MIN_RADIUS);
    }
}

#[test]
fn mapper_reuses_layout_for_same_mass_only() {
    let mapper = GeometryMapper::default();
    let first = mapper.particles_for(200.0);
    let again = mapper.particles_for(200.0);
    assert!(Arc::ptr_eq(&first, &again));
    let other = mapper.particles_for(202.0);
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(other.len(), 101);
}

#[test]
fn map_centers_object_horizontally() {
    let mapper = GeometryMapper::default();
    let b = evaluate(150.0, 300.0, 1.0);
    let g = mapper.map(150.0, 300.0, &b);
    assert!(approx(g.origin.x + g.size / 2.0, config::SCENE_CENTER_X));
    assert_eq!(g.origin.y, g.y_position);
    assert_eq!(g.immersed_ratio, Some(0.5));
    assert_eq!(g.outline, FLOAT_OUTLINE);
    assert!(g.particle_positions().all(|p| p.x <= g.size && p.y <= g.size));
}

#[test]
fn liquid_fill_follows_catalog() {
    let water = liquid_fill(1.0);
    assert!((water.alpha - 0.2).abs() < 1e-6);
    let honey = liquid_fill(1.4);
    let thick = liquid_fill(1.3);
    assert_eq!(honey.color, thick.color);
}
