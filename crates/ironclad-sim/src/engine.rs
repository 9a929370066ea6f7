//! Arena engine: stepping, collision resolution, and the render surface.
//!
//! The engine owns the physics world for its whole lifetime, together
//! with the tank and obstacle registries and the live projectile list.
//! Callers drive it one fixed timestep at a time: issue actuation
//! commands, call [`Engine::step`], then query sensing accessors and
//! the render surface.

use glam::Vec2;
use log::{debug, info};
use rapier2d::prelude::*;

use ironclad_core::categories;
use ironclad_core::color::Color;
use ironclad_core::config::{ArenaConfig, ObstacleConfig, TankConfig};
use ironclad_core::error::Result;
use ironclad_core::events::{GameEvent, HitKind};
use ironclad_core::registry::{Registry, RegistryId};

use crate::obstacle::Obstacle;
use crate::physics::{PhysicsWorld, ShapeKind, ShapeTag};
use crate::tank::{Projectile, Tank};

/// World-space geometry of one collider, for the render consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// Convex polygon vertices in counter-clockwise order.
    Polygon(Vec<Vec2>),
    Circle { center: Vec2, radius: f32 },
}

pub struct Engine {
    config: ArenaConfig,
    world: PhysicsWorld,
    tanks: Registry<Tank>,
    obstacles: Registry<Obstacle>,
    projectiles: Vec<Projectile>,
}

impl Engine {
    /// Build an empty arena: physics world plus the four boundary
    /// walls. Walls are created once and never removed.
    pub fn new(config: ArenaConfig) -> Self {
        let mut world = PhysicsWorld::new(config.time_step, config.sub_steps);

        let w = config.arena_width;
        let h = config.arena_height;
        let t = config.wall_thickness;
        let wall_body = world.add_body(RigidBodyBuilder::fixed().build());
        // Segments hug the [0, w] x [0, h] interior, extended by the
        // thickness margin so the corners stay sealed.
        let segments = [
            (w / 2.0, -t / 2.0, w / 2.0 + t, t / 2.0),
            (w / 2.0, h + t / 2.0, w / 2.0 + t, t / 2.0),
            (-t / 2.0, h / 2.0, t / 2.0, h / 2.0 + t),
            (w + t / 2.0, h / 2.0, t / 2.0, h / 2.0 + t),
        ];
        for (cx, cy, hx, hy) in segments {
            world.attach_collider(
                ColliderBuilder::cuboid(hx, hy)
                    .translation(vector![cx, cy])
                    .collision_groups(InteractionGroups::new(
                        Group::from_bits_truncate(categories::WALL),
                        Group::from_bits_truncate(categories::ALL),
                    ))
                    .build(),
                wall_body,
                ShapeTag {
                    kind: ShapeKind::Wall,
                    owner: 0,
                },
            );
        }

        info!(
            "arena created: {w}x{h} m, dt={} s, {} sub-steps",
            config.time_step, config.sub_steps
        );

        Self {
            config,
            world,
            tanks: Registry::new("tank"),
            obstacles: Registry::new("obstacle"),
            projectiles: Vec::new(),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Pixels per meter for the render consumer.
    pub fn pixel_density(&self) -> f32 {
        self.config.pixel_density
    }

    // ---- Entity lifecycle ----

    pub fn add_tank(&mut self, config: TankConfig) -> RegistryId {
        let world = &mut self.world;
        let id = self.tanks.insert_with(|id| Tank::new(id, config, world));
        debug!("tank {id} added");
        id
    }

    /// Remove a tank and its bodies. Projectiles it already fired stay
    /// live until collision resolution destroys them.
    pub fn remove_tank(&mut self, id: RegistryId) -> Result<()> {
        let mut tank = self.tanks.remove(id)?;
        tank.despawn(&mut self.world);
        debug!("tank {id} removed");
        Ok(())
    }

    pub fn add_obstacle(&mut self, config: ObstacleConfig) -> RegistryId {
        let world = &mut self.world;
        let id = self
            .obstacles
            .insert_with(|id| Obstacle::new(id, config, world));
        debug!("obstacle {id} added");
        id
    }

    pub fn remove_obstacle(&mut self, id: RegistryId) -> Result<()> {
        let mut obstacle = self.obstacles.remove(id)?;
        obstacle.despawn(&mut self.world);
        debug!("obstacle {id} removed");
        Ok(())
    }

    // ---- Actuation passthroughs ----

    pub fn rotate_gun(&mut self, id: RegistryId, angle: f32) -> Result<()> {
        let tank = self.tanks.get_mut(id)?;
        tank.rotate_gun(&mut self.world, angle);
        Ok(())
    }

    pub fn fire_gun(&mut self, id: RegistryId) -> Result<()> {
        let tank = self.tanks.get_mut(id)?;
        let projectile = tank.fire_gun(&mut self.world);
        debug!("tank {id} fired");
        self.projectiles.push(projectile);
        Ok(())
    }

    pub fn move_left_tread(&mut self, id: RegistryId, speed: f32) -> Result<()> {
        let tank = self.tanks.get_mut(id)?;
        tank.move_left_tread(&mut self.world, speed);
        Ok(())
    }

    pub fn move_right_tread(&mut self, id: RegistryId, speed: f32) -> Result<()> {
        let tank = self.tanks.get_mut(id)?;
        tank.move_right_tread(&mut self.world, speed);
        Ok(())
    }

    // ---- Sensing passthroughs ----

    /// Sweep with the tank's configured default range.
    pub fn scan_lidar(&mut self, id: RegistryId) -> Result<&[Vec2]> {
        let tank = self.tanks.get_mut(id)?;
        Ok(tank.scan_lidar(&mut self.world))
    }

    /// Sweep with an explicit range.
    pub fn scan_lidar_range(&mut self, id: RegistryId, range: f32) -> Result<&[Vec2]> {
        let tank = self.tanks.get_mut(id)?;
        Ok(tank.scan_lidar_range(&mut self.world, range))
    }

    pub fn tank_position(&self, id: RegistryId) -> Result<Vec2> {
        Ok(self.tanks.get(id)?.position(&self.world))
    }

    pub fn tank_world_velocity(&self, id: RegistryId) -> Result<Vec2> {
        Ok(self.tanks.get(id)?.world_velocity(&self.world))
    }

    pub fn tank_local_velocity(&self, id: RegistryId) -> Result<Vec2> {
        Ok(self.tanks.get(id)?.local_velocity(&self.world))
    }

    pub fn tank_orientation(&self, id: RegistryId) -> Result<f32> {
        Ok(self.tanks.get(id)?.orientation(&self.world))
    }

    /// Realized gun angle relative to the hull.
    pub fn gun_angle(&self, id: RegistryId) -> Result<f32> {
        Ok(self.tanks.get(id)?.gun_angle(&self.world))
    }

    // ---- Stepping ----

    /// Advance the simulation by one fixed timestep, then resolve the
    /// raw begin-of-step contacts into typed events. Every projectile
    /// that registered at least one contact this step is destroyed
    /// exactly once; untouched projectiles stay live and renderable.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let contacts = self.world.step();
        self.resolve_collisions(contacts)
    }

    fn resolve_collisions(
        &mut self,
        contacts: Vec<(ColliderHandle, ColliderHandle)>,
    ) -> Vec<GameEvent> {
        // Keep only pairs touching a projectile; a single projectile
        // may contact several shapes within one step and every pairing
        // is retained. Projectile-projectile pairs count for both sides.
        let mut hits: Vec<(ColliderHandle, ColliderHandle)> = Vec::new();
        for (a, b) in contacts {
            let a_is_projectile =
                matches!(self.world.tag(a), Some(tag) if tag.kind == ShapeKind::Projectile);
            let b_is_projectile =
                matches!(self.world.tag(b), Some(tag) if tag.kind == ShapeKind::Projectile);
            if a_is_projectile {
                hits.push((a, b));
            }
            if b_is_projectile {
                hits.push((b, a));
            }
        }
        hits.sort_by_key(|&(p, o)| (p.into_raw_parts(), o.into_raw_parts()));

        let mut events: Vec<GameEvent> = Vec::new();
        let mut destroyed: Vec<ColliderHandle> = Vec::new();
        for (projectile, other) in hits {
            let shooter = match self.world.tag(projectile) {
                Some(tag) => tag.owner,
                None => continue,
            };
            let (kind, target) = match self.world.tag(other) {
                Some(tag) => match tag.kind {
                    ShapeKind::Wall => (HitKind::Wall, 0),
                    ShapeKind::Obstacle => (HitKind::Obstacle, tag.owner),
                    ShapeKind::TankBody => (HitKind::TankBody, tag.owner),
                    ShapeKind::Projectile => (HitKind::Projectile, tag.owner),
                    ShapeKind::TankGun => (HitKind::Unknown, 0),
                },
                None => (HitKind::Unknown, 0),
            };

            let event = GameEvent {
                kind,
                shooter,
                target,
            };
            // One record per (kind, shooter, target) tuple.
            if !events.contains(&event) {
                events.push(event);
            }
            if !destroyed.contains(&projectile) {
                destroyed.push(projectile);
            }
        }

        for shape in destroyed {
            if let Some(index) = self.projectiles.iter().position(|p| p.shape == shape) {
                let projectile = self.projectiles.swap_remove(index);
                self.world.remove_body(projectile.body);
                debug!("projectile from tank {} destroyed", projectile.shooter);
            }
        }

        events
    }

    // ---- Render surface ----

    /// Live tank ids in ascending order.
    pub fn tank_ids(&self) -> Vec<RegistryId> {
        self.tanks.iter().map(|(id, _)| id).collect()
    }

    /// Live obstacle ids in ascending order.
    pub fn obstacle_ids(&self) -> Vec<RegistryId> {
        self.obstacles.iter().map(|(id, _)| id).collect()
    }

    /// A tank's shapes in render order: hull, left tread, right tread, gun.
    pub fn tank_shapes(&self, id: RegistryId) -> Result<Vec<(ColliderHandle, Color)>> {
        Ok(self.tanks.get(id)?.shapes_and_colors())
    }

    pub fn obstacle_shapes(&self, id: RegistryId) -> Result<Vec<(ColliderHandle, Color)>> {
        Ok(self.obstacles.get(id)?.shapes_and_colors())
    }

    /// Shapes of every live (unexploded) projectile.
    pub fn projectile_shapes(&self) -> Vec<(ColliderHandle, Color)> {
        self.projectiles
            .iter()
            .map(|p| (p.shape, p.color))
            .collect()
    }

    /// Last lidar sweep of a tank with its dot color and pixel radius.
    pub fn lidar_overlay(&self, id: RegistryId) -> Result<(Vec<Vec2>, Color, f32)> {
        let tank = self.tanks.get(id)?;
        Ok((
            tank.lidar_points().to_vec(),
            tank.lidar_color(),
            tank.lidar_radius(),
        ))
    }

    /// World-space geometry of a collider, if it is still alive.
    pub fn shape_geometry(&self, handle: ColliderHandle) -> Option<ShapeGeometry> {
        let collider = self.world.collider(handle)?;
        let pos = collider.position();
        if let Some(cuboid) = collider.shape().as_cuboid() {
            let hx = cuboid.half_extents.x;
            let hy = cuboid.half_extents.y;
            let corners = [
                point![-hx, -hy],
                point![hx, -hy],
                point![hx, hy],
                point![-hx, hy],
            ];
            let vertices = corners
                .iter()
                .map(|&c| {
                    let p = pos * c;
                    Vec2::new(p.x, p.y)
                })
                .collect();
            Some(ShapeGeometry::Polygon(vertices))
        } else if let Some(ball) = collider.shape().as_ball() {
            let center = pos.translation.vector;
            Some(ShapeGeometry::Circle {
                center: Vec2::new(center.x, center.y),
                radius: ball.radius,
            })
        } else {
            None
        }
    }
}
