//! Events produced by collision resolution each step.

use serde::{Deserialize, Serialize};

use crate::registry::RegistryId;

/// What a projectile struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitKind {
    /// An arena boundary segment. Walls carry no id; `target` is 0.
    Wall,
    /// A static obstacle; `target` is the obstacle id.
    Obstacle,
    /// A tank hull or tread; `target` is the tank id.
    TankBody,
    /// Another projectile; `target` is the other projectile's firer.
    Projectile,
    /// A shape with no recorded category; `target` is 0.
    Unknown,
}

/// One projectile impact, reported from `Engine::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Category of the struck shape.
    pub kind: HitKind,
    /// Id of the tank that fired the projectile.
    pub shooter: RegistryId,
    /// Id of the struck entity, or 0 where the kind carries none.
    pub target: RegistryId,
}
