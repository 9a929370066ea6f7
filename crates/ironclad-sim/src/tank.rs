//! Tank actuation and sensing.
//!
//! A tank is four rigid bodies: hull, gun, left tread, right tread.
//! Both treads are welded to the hull; the gun is coupled through a
//! revolute joint whose position motor approaches a commanded relative
//! angle with bounded torque, so the realized gun angle lags the
//! command. Tread motion is velocity control along the hull's forward
//! axis: equal speeds translate, opposite speeds rotate in place.

use glam::Vec2;
use rapier2d::prelude::*;

use ironclad_core::categories;
use ironclad_core::color::Color;
use ironclad_core::config::TankConfig;
use ironclad_core::registry::RegistryId;

use crate::physics::{PhysicsWorld, ShapeKind, ShapeTag};

/// A projectile spawned by [`Tank::fire_gun`], tracked by the engine
/// until collision resolution destroys it.
pub struct Projectile {
    pub body: RigidBodyHandle,
    pub shape: ColliderHandle,
    pub shooter: RegistryId,
    pub color: Color,
}

pub struct Tank {
    id: RegistryId,
    config: TankConfig,

    hull: RigidBodyHandle,
    gun: RigidBodyHandle,
    left_tread: RigidBodyHandle,
    right_tread: RigidBodyHandle,

    hull_shape: ColliderHandle,
    gun_shape: ColliderHandle,
    left_tread_shape: ColliderHandle,
    right_tread_shape: ColliderHandle,

    gun_motor: ImpulseJointHandle,

    /// Last completed lidar sweep, replaced wholesale per scan.
    lidar: Vec<Vec2>,
}

impl Tank {
    pub fn new(id: RegistryId, config: TankConfig, world: &mut PhysicsWorld) -> Self {
        // All four bodies start at the hull pose; shapes carry the
        // local offsets.
        let body_at_pose = || {
            RigidBodyBuilder::dynamic()
                .translation(vector![config.position_x, config.position_y])
                .rotation(config.angle)
                .build()
        };
        let hull = world.add_body(body_at_pose());
        let gun = world.add_body(body_at_pose());
        let left_tread = world.add_body(body_at_pose());
        let right_tread = world.add_body(body_at_pose());

        let body_groups = InteractionGroups::new(
            Group::from_bits_truncate(categories::TANK_BODY),
            Group::from_bits_truncate(categories::ALL),
        );
        let gun_groups = InteractionGroups::new(
            Group::from_bits_truncate(categories::TANK_GUN),
            Group::from_bits_truncate(categories::ALL),
        );
        let tag = |kind| ShapeTag { kind, owner: id };

        let hull_shape = world.attach_collider(
            ColliderBuilder::cuboid(config.body_height, config.body_width)
                .collision_groups(body_groups)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            hull,
            tag(ShapeKind::TankBody),
        );

        let left_tread_shape = world.attach_collider(
            ColliderBuilder::cuboid(config.body_height, config.tread_width)
                .translation(vector![0.0, config.body_height / 2.0])
                .collision_groups(body_groups)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            left_tread,
            tag(ShapeKind::TankBody),
        );
        let right_tread_shape = world.attach_collider(
            ColliderBuilder::cuboid(config.body_height, config.tread_width)
                .translation(vector![0.0, -config.body_height / 2.0])
                .collision_groups(body_groups)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            right_tread,
            tag(ShapeKind::TankBody),
        );

        // Weld each tread to the hull. Joint contacts stay disabled so
        // the overlapping shapes never fight the welds.
        world.add_joint(
            hull,
            left_tread,
            FixedJointBuilder::new().contacts_enabled(false),
        );
        world.add_joint(
            hull,
            right_tread,
            FixedJointBuilder::new().contacts_enabled(false),
        );

        // The gun barrel extends forward from the hull center.
        let gun_shape = world.attach_collider(
            ColliderBuilder::cuboid(config.gun_height, config.gun_width)
                .translation(vector![config.gun_height, 0.0])
                .density(config.gun_density)
                .collision_groups(gun_groups)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            gun,
            tag(ShapeKind::TankGun),
        );

        // Bounded-effort angular servo: the gun approaches the target
        // relative angle gradually instead of snapping to it.
        let gun_motor = world.add_joint(
            hull,
            gun,
            RevoluteJointBuilder::new()
                .motor_position(0.0, config.gun_motor_stiffness, config.gun_motor_damping)
                .motor_max_force(config.gun_motor_max_torque)
                .contacts_enabled(false),
        );

        Self {
            id,
            config,
            hull,
            gun,
            left_tread,
            right_tread,
            hull_shape,
            gun_shape,
            left_tread_shape,
            right_tread_shape,
            gun_motor,
            lidar: Vec::new(),
        }
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    // ---- Actuation ----

    /// Command a gun angle relative to the hull. The target is clamped
    /// into the configured bounds; the servo converges over subsequent
    /// steps.
    pub fn rotate_gun(&mut self, world: &mut PhysicsWorld, angle: f32) {
        let target = angle.clamp(self.config.gun_angle_min, self.config.gun_angle_max);
        world.set_motor_position(
            self.gun_motor,
            target,
            self.config.gun_motor_stiffness,
            self.config.gun_motor_damping,
        );
    }

    /// Spawn a projectile at the muzzle.
    ///
    /// The projectile inherits the hull's world velocity on top of its
    /// muzzle speed, is flagged for continuous collision detection, and
    /// masks out every gun shape so it cannot graze the barrel it just
    /// left. Returns the tracking record for the engine.
    pub fn fire_gun(&mut self, world: &mut PhysicsWorld) -> Projectile {
        let (gun_pos, muzzle_forward) = match world.body(self.gun) {
            Some(rb) => (*rb.position(), rb.position().rotation * vector![1.0, 0.0]),
            None => (Isometry::identity(), vector![1.0, 0.0]),
        };
        let hull_velocity = world
            .body(self.hull)
            .map(|rb| *rb.linvel())
            .unwrap_or_else(|| vector![0.0, 0.0]);

        let velocity = muzzle_forward * self.config.projectile_velocity + hull_velocity;
        let body = world.add_body(
            RigidBodyBuilder::dynamic()
                .position(gun_pos)
                .linvel(velocity)
                .ccd_enabled(true)
                .build(),
        );

        let half = self.config.gun_width;
        let muzzle_offset = self.config.gun_height * 2.0 + self.config.gun_width;
        let shape = world.attach_collider(
            ColliderBuilder::cuboid(half, half)
                .translation(vector![muzzle_offset, 0.0])
                .collision_groups(InteractionGroups::new(
                    Group::from_bits_truncate(categories::PROJECTILE),
                    Group::from_bits_truncate(categories::ALL & !categories::TANK_GUN),
                ))
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            body,
            ShapeTag {
                kind: ShapeKind::Projectile,
                owner: self.id,
            },
        );

        Projectile {
            body,
            shape,
            shooter: self.id,
            color: self.config.projectile_color,
        }
    }

    /// Set the left tread's velocity along the hull's forward axis.
    pub fn move_left_tread(&mut self, world: &mut PhysicsWorld, speed: f32) {
        self.move_tread(world, self.left_tread, speed);
    }

    /// Set the right tread's velocity along the hull's forward axis.
    pub fn move_right_tread(&mut self, world: &mut PhysicsWorld, speed: f32) {
        self.move_tread(world, self.right_tread, speed);
    }

    fn move_tread(&mut self, world: &mut PhysicsWorld, tread: RigidBodyHandle, speed: f32) {
        let speed = speed.clamp(-self.config.tread_max_speed, self.config.tread_max_speed);
        let forward = match world.body(self.hull) {
            Some(rb) => rb.position().rotation * vector![1.0, 0.0],
            None => vector![1.0, 0.0],
        };
        if let Some(rb) = world.body_mut(tread) {
            rb.set_linvel(forward * speed, true);
        }
    }

    // ---- Sensing ----

    /// Sweep the configured default range.
    pub fn scan_lidar(&mut self, world: &mut PhysicsWorld) -> &[Vec2] {
        self.scan_lidar_range(world, self.config.lidar_range)
    }

    /// Cast `lidar_points` rays evenly over a full turn from the hull
    /// center and record, per ray, the closest non-self intersection
    /// (or the full-range endpoint on a miss).
    ///
    /// The backend reports intersections in arbitrary order, so every
    /// candidate is examined and folded to the smallest path fraction,
    /// skipping the scanning tank's own shapes by owner id. The buffer
    /// is replaced atomically per call.
    pub fn scan_lidar_range(&mut self, world: &mut PhysicsWorld, range: f32) -> &[Vec2] {
        world.update_query_pipeline();

        let (origin, heading) = match world.body(self.hull) {
            Some(rb) => (*rb.translation(), rb.rotation().angle()),
            None => (vector![0.0, 0.0], 0.0),
        };

        let count = self.config.lidar_points.max(1);
        let mut points = Vec::with_capacity(count);
        for i in 0..count {
            let angle = heading + std::f32::consts::TAU * i as f32 / count as f32;
            let dir = vector![angle.cos(), angle.sin()];

            let mut nearest = range;
            world.intersections_with_ray(
                point![origin.x, origin.y],
                dir,
                range,
                |handle, intersection| {
                    let own_shape = world.tag(handle).is_some_and(|tag| {
                        tag.owner == self.id
                            && matches!(tag.kind, ShapeKind::TankBody | ShapeKind::TankGun)
                    });
                    if !own_shape && intersection.time_of_impact < nearest {
                        nearest = intersection.time_of_impact;
                    }
                    true
                },
            );
            points.push(Vec2::new(
                origin.x + dir.x * nearest,
                origin.y + dir.y * nearest,
            ));
        }

        self.lidar = points;
        &self.lidar
    }

    // ---- Accessors ----

    /// Hull center in world coordinates.
    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        match world.body(self.hull) {
            Some(rb) => Vec2::new(rb.translation().x, rb.translation().y),
            None => Vec2::ZERO,
        }
    }

    /// Hull linear velocity in world coordinates.
    pub fn world_velocity(&self, world: &PhysicsWorld) -> Vec2 {
        match world.body(self.hull) {
            Some(rb) => Vec2::new(rb.linvel().x, rb.linvel().y),
            None => Vec2::ZERO,
        }
    }

    /// Hull linear velocity in the hull frame (x = forward).
    pub fn local_velocity(&self, world: &PhysicsWorld) -> Vec2 {
        match world.body(self.hull) {
            Some(rb) => {
                let local = rb.position().rotation.inverse() * *rb.linvel();
                Vec2::new(local.x, local.y)
            }
            None => Vec2::ZERO,
        }
    }

    /// Hull orientation as a signed world angle.
    pub fn orientation(&self, world: &PhysicsWorld) -> f32 {
        world
            .body(self.hull)
            .map(|rb| rb.rotation().angle())
            .unwrap_or(0.0)
    }

    /// Realized gun angle relative to the hull: the instantaneous
    /// relative rotation, not the last commanded target.
    pub fn gun_angle(&self, world: &PhysicsWorld) -> f32 {
        let hull = world.body(self.hull).map(|rb| rb.rotation().angle());
        let gun = world.body(self.gun).map(|rb| rb.rotation().angle());
        match (hull, gun) {
            (Some(hull), Some(gun)) => wrap_angle(gun - hull),
            _ => 0.0,
        }
    }

    /// Last completed lidar sweep.
    pub fn lidar_points(&self) -> &[Vec2] {
        &self.lidar
    }

    pub fn lidar_color(&self) -> Color {
        self.config.lidar_color
    }

    pub fn lidar_radius(&self) -> f32 {
        self.config.lidar_radius
    }

    pub fn projectile_color(&self) -> Color {
        self.config.projectile_color
    }

    /// Shapes in render order: hull, left tread, right tread, gun.
    pub fn shapes_and_colors(&self) -> Vec<(ColliderHandle, Color)> {
        vec![
            (self.hull_shape, self.config.tank_color),
            (self.left_tread_shape, self.config.left_tread_color),
            (self.right_tread_shape, self.config.right_tread_color),
            (self.gun_shape, self.config.gun_color),
        ]
    }

    /// Remove all four bodies from the world. In-flight projectiles
    /// fired by this tank are engine-owned and stay live.
    pub fn despawn(&mut self, world: &mut PhysicsWorld) {
        world.remove_body(self.hull);
        world.remove_body(self.gun);
        world.remove_body(self.left_tread);
        world.remove_body(self.right_tread);
    }
}

/// Normalize an angle into `(-PI, PI]`.
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU);
    if wrapped == 0.0 {
        PI
    } else {
        wrapped - PI
    }
}
