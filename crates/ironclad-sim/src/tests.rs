//! Tests for the engine: actuation, sensing, stepping, and collision
//! resolution.

use ironclad_core::config::{ArenaConfig, ObstacleConfig, TankConfig};
use ironclad_core::events::HitKind;

use crate::engine::{Engine, ShapeGeometry};
use crate::tank::wrap_angle;

/// Tank parked at the arena center, 36-ray lidar for test speed.
fn center_tank() -> TankConfig {
    TankConfig {
        position_x: 50.0,
        position_y: 37.5,
        lidar_points: 36,
        ..Default::default()
    }
}

fn default_engine() -> Engine {
    Engine::new(ArenaConfig::default())
}

// ---- Gun servo ----

#[test]
fn test_wrap_angle_normalizes_into_half_open_turn() {
    use std::f32::consts::PI;
    assert!((wrap_angle(0.0)).abs() < 1e-6);
    assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-5);
    assert!((wrap_angle(-PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
    assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
}

#[test]
fn test_gun_angle_converges_to_command() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());

    engine.rotate_gun(id, 0.5).unwrap();
    for _ in 0..120 {
        engine.step();
    }
    let angle = engine.gun_angle(id).unwrap();
    assert!(
        (angle - 0.5).abs() < 0.05,
        "gun should converge to 0.5, got {angle}"
    );
}

#[test]
fn test_gun_angle_is_gradual_not_instant() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());

    engine.rotate_gun(id, 1.0).unwrap();
    engine.step();
    let after_one = engine.gun_angle(id).unwrap();
    assert!(
        after_one < 0.9,
        "servo must converge gradually, got {after_one} after one step"
    );
}

#[test]
fn test_gun_command_clamped_to_bounds() {
    let mut engine = default_engine();
    let id = engine.add_tank(TankConfig {
        gun_angle_min: -0.3,
        gun_angle_max: 0.3,
        ..center_tank()
    });

    engine.rotate_gun(id, 2.0).unwrap();
    for _ in 0..180 {
        engine.step();
    }
    let angle = engine.gun_angle(id).unwrap();
    assert!(
        angle < 0.35 && angle > 0.2,
        "command must clamp to the 0.3 bound, got {angle}"
    );
}

// ---- Tread control ----

#[test]
fn test_equal_tread_speeds_translate_without_spin() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    let start = engine.tank_position(id).unwrap();

    for _ in 0..30 {
        engine.move_left_tread(id, 5.0).unwrap();
        engine.move_right_tread(id, 5.0).unwrap();
        engine.step();
    }

    let orientation = engine.tank_orientation(id).unwrap();
    let pos = engine.tank_position(id).unwrap();
    assert!(
        orientation.abs() < 0.02,
        "equal speeds must not spin the hull, got {orientation}"
    );
    assert!(
        pos.x > start.x + 0.5,
        "hull should advance along +x, got {} from {}",
        pos.x,
        start.x
    );
    let local = engine.tank_local_velocity(id).unwrap();
    assert!(local.x > 0.5, "forward body-frame speed expected, got {local}");
}

#[test]
fn test_opposite_tread_speeds_rotate_in_place() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    let start = engine.tank_position(id).unwrap();

    for _ in 0..30 {
        engine.move_left_tread(id, 5.0).unwrap();
        engine.move_right_tread(id, -5.0).unwrap();
        engine.step();
    }

    let pos = engine.tank_position(id).unwrap();
    let orientation = engine.tank_orientation(id).unwrap();
    assert!(
        (pos - start).length() < 1.0,
        "opposite speeds must hold the centroid, drifted {}",
        (pos - start).length()
    );
    assert!(
        orientation.abs() > 0.05,
        "opposite speeds should rotate the hull, got {orientation}"
    );
}

#[test]
fn test_tread_speed_clamped() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());

    for _ in 0..30 {
        engine.move_left_tread(id, 1000.0).unwrap();
        engine.move_right_tread(id, 1000.0).unwrap();
        engine.step();
    }
    let speed = engine.tank_world_velocity(id).unwrap().length();
    let max = TankConfig::default().tread_max_speed;
    assert!(
        speed <= max + 0.5,
        "hull speed {speed} exceeds tread limit {max}"
    );
}

// ---- Lidar ----

#[test]
fn test_lidar_full_range_when_unobstructed() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    let center = engine.tank_position(id).unwrap();

    let points = engine.scan_lidar_range(id, 10.0).unwrap().to_vec();
    assert_eq!(points.len(), 36);
    for p in &points {
        let d = (*p - center).length();
        assert!(
            (d - 10.0).abs() < 1e-3,
            "unobstructed ray must end at full range, got {d}"
        );
    }
}

#[test]
fn test_lidar_reports_wall_distance() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    let center = engine.tank_position(id).unwrap();

    let points = engine.scan_lidar_range(id, 100.0).unwrap().to_vec();
    // Ray 0 points along the hull heading (+x); the right wall face is
    // 50 m away.
    let forward = (points[0] - center).length();
    assert!(
        (forward - 50.0).abs() < 0.1,
        "forward ray should hit the wall at 50 m, got {forward}"
    );
    // Own hull and gun must not shadow the sweep: the nearest anything
    // is the top/bottom wall at 37.5 m.
    let min = points
        .iter()
        .map(|p| (*p - center).length())
        .fold(f32::INFINITY, f32::min);
    assert!(
        (min - 37.5).abs() < 0.1,
        "nearest hit should be a boundary wall, got {min}"
    );
}

#[test]
fn test_lidar_sees_obstacle() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    engine.add_obstacle(ObstacleConfig {
        position_x: 70.0,
        position_y: 37.5,
        radius: 5.0,
        ..Default::default()
    });

    let center = engine.tank_position(id).unwrap();
    let points = engine.scan_lidar_range(id, 100.0).unwrap().to_vec();
    let forward = (points[0] - center).length();
    assert!(
        (forward - 15.0).abs() < 0.1,
        "forward ray should stop at the obstacle rim 15 m out, got {forward}"
    );
}

#[test]
fn test_lidar_buffer_replaced_per_scan() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    let center = engine.tank_position(id).unwrap();

    engine.scan_lidar_range(id, 10.0).unwrap();
    let points = engine.scan_lidar_range(id, 5.0).unwrap().to_vec();
    assert_eq!(points.len(), 36);
    for p in &points {
        let d = (*p - center).length();
        assert!(
            (d - 5.0).abs() < 1e-3,
            "stale points from the previous sweep leaked through, got {d}"
        );
    }
}

// ---- Projectiles and collision resolution ----

#[test]
fn test_projectile_hits_wall_exactly_once() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    engine.fire_gun(id).unwrap();
    assert_eq!(engine.projectile_shapes().len(), 1);

    let mut events = Vec::new();
    for _ in 0..300 {
        events.extend(engine.step());
        if !events.is_empty() {
            break;
        }
    }
    assert_eq!(events.len(), 1, "exactly one wall event expected: {events:?}");
    assert_eq!(events[0].kind, HitKind::Wall);
    assert_eq!(events[0].shooter, id);
    assert_eq!(events[0].target, 0, "walls report the sentinel id 0");
    assert!(
        engine.projectile_shapes().is_empty(),
        "exploded projectile must leave the renderable set"
    );

    // Nothing further once the projectile is gone.
    for _ in 0..60 {
        assert!(engine.step().is_empty());
    }
}

#[test]
fn test_projectile_hits_obstacle() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    let obstacle = engine.add_obstacle(ObstacleConfig {
        position_x: 70.0,
        position_y: 37.5,
        radius: 5.0,
        ..Default::default()
    });

    engine.fire_gun(id).unwrap();
    let mut events = Vec::new();
    for _ in 0..120 {
        events.extend(engine.step());
        if !events.is_empty() {
            break;
        }
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, HitKind::Obstacle);
    assert_eq!(events[0].shooter, id);
    assert_eq!(events[0].target, obstacle);
}

#[test]
fn test_projectile_hits_other_tank() {
    let mut engine = default_engine();
    let shooter = engine.add_tank(center_tank());
    let target = engine.add_tank(TankConfig {
        position_x: 80.0,
        position_y: 37.5,
        angle: std::f32::consts::FRAC_PI_2,
        ..center_tank()
    });

    engine.fire_gun(shooter).unwrap();
    let mut events = Vec::new();
    for _ in 0..120 {
        events.extend(engine.step());
        if !events.is_empty() {
            break;
        }
    }
    assert!(!events.is_empty(), "projectile should reach the target tank");
    assert_eq!(events[0].kind, HitKind::TankBody);
    assert_eq!(events[0].shooter, shooter);
    assert_eq!(events[0].target, target);
}

#[test]
fn test_projectile_does_not_graze_own_gun() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    engine.fire_gun(id).unwrap();

    for _ in 0..5 {
        let events = engine.step();
        assert!(
            events.is_empty(),
            "muzzle overlap must not produce a self-hit: {events:?}"
        );
    }
    assert_eq!(
        engine.projectile_shapes().len(),
        1,
        "projectile with no contacts must stay live"
    );
}

#[test]
fn test_tank_wall_contact_is_not_an_event() {
    let mut engine = default_engine();
    let id = engine.add_tank(TankConfig {
        position_x: 12.0,
        position_y: 37.5,
        angle: std::f32::consts::PI,
        ..center_tank()
    });

    // Drive straight into the left wall.
    for _ in 0..120 {
        engine.move_left_tread(id, 10.0).unwrap();
        engine.move_right_tread(id, 10.0).unwrap();
        let events = engine.step();
        assert!(
            events.is_empty(),
            "non-projectile contacts are not engine events: {events:?}"
        );
    }
}

#[test]
fn test_removed_tank_leaves_projectile_in_flight() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    engine.fire_gun(id).unwrap();
    engine.remove_tank(id).unwrap();

    assert_eq!(engine.projectile_shapes().len(), 1);
    let mut events = Vec::new();
    for _ in 0..300 {
        events.extend(engine.step());
        if !events.is_empty() {
            break;
        }
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, HitKind::Wall);
    assert_eq!(
        events[0].shooter, id,
        "orphaned projectiles still report their firer"
    );
}

// ---- End to end ----

#[test]
fn test_fire_and_step_until_event_end_to_end() {
    let mut engine = default_engine();
    let id = engine.add_tank(center_tank());
    engine.rotate_gun(id, 0.4).unwrap();
    for _ in 0..60 {
        engine.step();
    }
    engine.fire_gun(id).unwrap();

    let mut produced = None;
    for _ in 0..600 {
        let events = engine.step();
        if let Some(event) = events.first() {
            produced = Some(*event);
            break;
        }
    }
    let event = produced.expect("a fired projectile must eventually hit something");
    assert!(matches!(
        event.kind,
        HitKind::Wall | HitKind::Obstacle | HitKind::TankBody | HitKind::Projectile
    ));
    assert!(engine.projectile_shapes().is_empty());
}

#[test]
fn test_determinism_same_scenario() {
    fn run() -> (String, glam::Vec2) {
        let mut engine = default_engine();
        let id = engine.add_tank(center_tank());
        engine.add_obstacle(ObstacleConfig {
            position_x: 75.0,
            position_y: 40.0,
            radius: 4.0,
            ..Default::default()
        });
        engine.rotate_gun(id, 0.2).unwrap();

        let mut all_events = Vec::new();
        for step in 0..240u32 {
            engine.move_left_tread(id, 3.0).unwrap();
            engine.move_right_tread(id, 2.0).unwrap();
            if step == 30 || step == 90 {
                engine.fire_gun(id).unwrap();
            }
            all_events.extend(engine.step());
        }
        let json = serde_json::to_string(&all_events).unwrap();
        (json, engine.tank_position(id).unwrap())
    }

    let (events_a, pos_a) = run();
    let (events_b, pos_b) = run();
    assert_eq!(events_a, events_b, "event sequences diverged");
    assert_eq!(pos_a, pos_b, "trajectories diverged");
}

// ---- Registry behavior through the engine ----

#[test]
fn test_tank_id_recycled_smallest_first() {
    let mut engine = default_engine();
    let a = engine.add_tank(center_tank());
    let b = engine.add_tank(TankConfig {
        position_x: 20.0,
        position_y: 20.0,
        ..center_tank()
    });
    assert_eq!((a, b), (0, 1));

    engine.remove_tank(a).unwrap();
    let c = engine.add_tank(TankConfig {
        position_x: 80.0,
        position_y: 60.0,
        ..center_tank()
    });
    assert_eq!(c, a, "smallest free id must be reused first");
}

#[test]
fn test_stale_id_fails_not_found() {
    let mut engine = default_engine();
    assert!(engine.rotate_gun(7, 0.1).is_err());
    assert!(engine.fire_gun(7).is_err());
    assert!(engine.scan_lidar(7).is_err());
    assert!(engine.tank_position(7).is_err());
    assert!(engine.remove_obstacle(3).is_err());

    let id = engine.add_tank(center_tank());
    engine.remove_tank(id).unwrap();
    assert!(engine.remove_tank(id).is_err(), "double remove must fail");
    assert!(engine.gun_angle(id).is_err());
}

// ---- Render surface ----

#[test]
fn test_shape_geometry_lookup() {
    let mut engine = default_engine();
    let tank = engine.add_tank(center_tank());
    let obstacle = engine.add_obstacle(ObstacleConfig {
        position_x: 30.0,
        position_y: 30.0,
        radius: 6.0,
        ..Default::default()
    });

    let shapes = engine.tank_shapes(tank).unwrap();
    assert_eq!(shapes.len(), 4, "hull, two treads, gun");
    match engine.shape_geometry(shapes[0].0) {
        Some(ShapeGeometry::Polygon(vertices)) => {
            assert_eq!(vertices.len(), 4);
        }
        other => panic!("hull should be a polygon, got {other:?}"),
    }

    let obstacle_shapes = engine.obstacle_shapes(obstacle).unwrap();
    match engine.shape_geometry(obstacle_shapes[0].0) {
        Some(ShapeGeometry::Circle { center, radius }) => {
            assert_eq!(radius, 6.0);
            assert!((center - glam::Vec2::new(30.0, 30.0)).length() < 1e-5);
        }
        other => panic!("obstacle should be a circle, got {other:?}"),
    }

    let handle = obstacle_shapes[0].0;
    engine.remove_obstacle(obstacle).unwrap();
    assert!(
        engine.shape_geometry(handle).is_none(),
        "geometry of a removed shape must be gone"
    );
}
