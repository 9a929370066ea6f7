//! Static circular obstacle.

use glam::Vec2;
use rapier2d::prelude::*;

use ironclad_core::categories;
use ironclad_core::color::Color;
use ironclad_core::config::ObstacleConfig;
use ironclad_core::registry::RegistryId;

use crate::physics::{PhysicsWorld, ShapeKind, ShapeTag};

pub struct Obstacle {
    id: RegistryId,
    config: ObstacleConfig,
    body: RigidBodyHandle,
    shape: ColliderHandle,
}

impl Obstacle {
    /// Spawn a static ball collider tagged with the obstacle's own id.
    pub fn new(id: RegistryId, config: ObstacleConfig, world: &mut PhysicsWorld) -> Self {
        let body = world.add_body(
            RigidBodyBuilder::fixed()
                .translation(vector![config.position_x, config.position_y])
                .build(),
        );
        let collider = ColliderBuilder::ball(config.radius)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(categories::OBSTACLE),
                Group::from_bits_truncate(categories::ALL),
            ))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let shape = world.attach_collider(
            collider,
            body,
            ShapeTag {
                kind: ShapeKind::Obstacle,
                owner: id,
            },
        );

        Self {
            id,
            config,
            body,
            shape,
        }
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.config.position_x, self.config.position_y)
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    /// Shapes in render order.
    pub fn shapes_and_colors(&self) -> Vec<(ColliderHandle, Color)> {
        vec![(self.shape, self.config.color)]
    }

    /// Remove the obstacle's body from the world. Must be called before
    /// the wrapper is dropped from the registry.
    pub fn despawn(&mut self, world: &mut PhysicsWorld) {
        world.remove_body(self.body);
    }
}
