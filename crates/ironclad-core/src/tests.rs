//! Tests for the registry, categories, and config defaults.

use crate::categories;
use crate::color::Color;
use crate::config::{ArenaConfig, TankConfig};
use crate::error::CoreError;
use crate::registry::{Registry, RegistryId};

// ---- Registry ----

#[test]
fn test_registry_ids_monotonic() {
    let mut reg = Registry::new("thing");
    for expected in 0..10u32 {
        assert_eq!(reg.insert(expected * 100), expected);
    }
    assert_eq!(reg.len(), 10);
}

#[test]
fn test_registry_smallest_free_id_reused_first() {
    let mut reg = Registry::new("thing");
    for i in 0..5 {
        reg.insert(i);
    }
    reg.remove(3).unwrap();
    reg.remove(1).unwrap();
    // Smallest free id wins over both the larger free id and the counter.
    assert_eq!(reg.insert(10), 1);
    assert_eq!(reg.insert(11), 3);
    assert_eq!(reg.insert(12), 5);
}

#[test]
fn test_registry_live_ids_distinct() {
    let mut reg = Registry::new("thing");
    let mut live: Vec<RegistryId> = (0..20).map(|i| reg.insert(i)).collect();
    // Churn: remove every third id, insert replacements.
    for id in [0u32, 3, 6, 9, 12] {
        reg.remove(id).unwrap();
        live.retain(|&l| l != id);
    }
    for i in 0..5 {
        live.push(reg.insert(100 + i));
    }
    let mut sorted = live.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), live.len(), "live ids must be pairwise distinct");
}

#[test]
fn test_registry_insert_with_embeds_own_id() {
    struct Entity {
        self_id: RegistryId,
    }
    let mut reg = Registry::new("entity");
    reg.insert_with(|id| Entity { self_id: id });
    reg.insert_with(|id| Entity { self_id: id });
    reg.remove(0).unwrap();
    let recycled = reg.insert_with(|id| Entity { self_id: id });
    assert_eq!(recycled, 0);
    for (id, entity) in reg.iter() {
        assert_eq!(entity.self_id, id, "stored object must embed its own id");
    }
}

#[test]
fn test_registry_get_and_remove_stale_id() {
    let mut reg: Registry<u32> = Registry::new("thing");
    let id = reg.insert(7);
    reg.remove(id).unwrap();

    assert!(matches!(
        reg.get(id),
        Err(CoreError::NotFound { kind: "thing", id: 0 })
    ));
    assert!(reg.get_mut(id).is_err());
    assert!(reg.remove(id).is_err(), "double remove must fail");
    assert!(reg.remove(999).is_err(), "never-issued id must fail");
}

// ---- Categories ----

#[test]
fn test_category_flags_disjoint() {
    for (i, &a) in categories::FLAGS.iter().enumerate() {
        assert_eq!(a.count_ones(), 1, "flag {a:#x} must be a power of two");
        for &b in &categories::FLAGS[i + 1..] {
            assert_eq!(a & b, 0, "flags {a:#x} and {b:#x} overlap");
        }
    }
}

#[test]
fn test_category_all_covers_every_flag() {
    for &flag in &categories::FLAGS {
        assert_eq!(categories::ALL & flag, flag);
    }
}

// ---- Color ----

#[test]
fn test_color_channel_split() {
    assert_eq!(Color(0x123456).rgb(), [0x12, 0x34, 0x56]);
    assert_eq!(Color::WHITE.rgb(), [255, 255, 255]);
    assert_eq!(Color::BLACK.rgb(), [0, 0, 0]);
}

// ---- Config ----

#[test]
fn test_config_json_round_trip() {
    let arena = ArenaConfig::default();
    let json = serde_json::to_string(&arena).unwrap();
    let back: ArenaConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.arena_width, arena.arena_width);
    assert_eq!(back.sub_steps, arena.sub_steps);

    // Partial JSON falls back to defaults for omitted fields.
    let partial: TankConfig = serde_json::from_str(r#"{"position_x": 5.0}"#).unwrap();
    assert_eq!(partial.position_x, 5.0);
    assert_eq!(partial.lidar_points, TankConfig::default().lidar_points);
}

#[test]
fn test_arena_image_dimensions() {
    let arena = ArenaConfig::default();
    assert_eq!(arena.image_width(), 800);
    assert_eq!(arena.image_height(), 600);
}
