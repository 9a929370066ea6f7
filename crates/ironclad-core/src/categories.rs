//! Collision category bitmask shared by every shape in the arena.
//!
//! Each flag is a disjoint power of two; `ALL` masks in every flag.
//! The values feed directly into the physics backend's collision filter.

/// Tank gun barrel shapes.
pub const TANK_GUN: u32 = 0x0000_0001;

/// Tank hull and tread shapes.
pub const TANK_BODY: u32 = 0x0000_0002;

/// Arena boundary wall segments.
pub const WALL: u32 = 0x0000_0004;

/// In-flight projectiles.
pub const PROJECTILE: u32 = 0x0000_0008;

/// Static circular obstacles.
pub const OBSTACLE: u32 = 0x0000_0010;

/// Union of all categories; the default collision mask.
pub const ALL: u32 = 0xFFFF_FFFF;

/// Every single-class flag, for exhaustiveness checks.
pub const FLAGS: [u32; 5] = [TANK_GUN, TANK_BODY, WALL, PROJECTILE, OBSTACLE];
