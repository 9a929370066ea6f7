//! rapier2d world wrapper.
//!
//! The simulation owns exactly one [`PhysicsWorld`] for its lifetime.
//! Entities hold plain rapier handles into it and every mutation goes
//! through `&mut PhysicsWorld`, so nothing can outlive the world.
//!
//! Besides the rapier sets this module keeps the collider tag side
//! table: a map from collider handle to `(shape kind, owner id)`,
//! consulted during collision classification and lidar self-exclusion.
//! Tags live and die with their collider.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use rapier2d::prelude::*;

use ironclad_core::registry::RegistryId;

/// Physical class of a collider, mirrored in its category bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    TankBody,
    TankGun,
    Wall,
    Obstacle,
    Projectile,
}

/// Owner metadata attached to every collider in the arena.
///
/// `owner` is the tank or obstacle id; walls carry 0. Projectiles carry
/// the id of the tank that fired them.
#[derive(Debug, Clone, Copy)]
pub struct ShapeTag {
    pub kind: ShapeKind,
    pub owner: RegistryId,
}

/// A begin-of-step contact between two colliders.
pub type ContactPair = (ColliderHandle, ColliderHandle);

pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    tags: HashMap<ColliderHandle, ShapeTag>,
}

impl PhysicsWorld {
    /// Create a zero-gravity world stepped at `time_step` seconds with
    /// `sub_steps` solver iterations.
    pub fn new(time_step: Real, sub_steps: usize) -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = time_step;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(sub_steps).unwrap_or(NonZeroUsize::MIN);

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, 0.0],
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            tags: HashMap::new(),
        }
    }

    /// Advance the world by one fixed timestep.
    ///
    /// Returns every contact pair that began during the step, sorted by
    /// raw collider handle. Rapier's channel delivery order may vary
    /// across runs; sorting keeps event sequences identical for the
    /// same physics trace.
    pub fn step(&mut self) -> Vec<ContactPair> {
        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                contacts.push((h1, h2));
            }
        }
        contacts.sort_by_key(|&(a, b)| (a.into_raw_parts(), b.into_raw_parts()));
        contacts
    }

    /// Insert a rigid body.
    pub fn add_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.bodies.insert(body)
    }

    /// Attach a collider to `body` and record its tag.
    pub fn attach_collider(
        &mut self,
        collider: Collider,
        body: RigidBodyHandle,
        tag: ShapeTag,
    ) -> ColliderHandle {
        let handle = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        self.tags.insert(handle, tag);
        handle
    }

    /// Remove a body, its colliders, their tags, and any attached joints.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.bodies.get(handle) {
            for &collider in body.colliders() {
                self.tags.remove(&collider);
            }
        }
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Couple two bodies with an impulse joint.
    pub fn add_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body1, body2, joint, true)
    }

    /// Retarget a revolute position motor, waking the attached bodies.
    pub fn set_motor_position(
        &mut self,
        joint: ImpulseJointHandle,
        target: Real,
        stiffness: Real,
        damping: Real,
    ) {
        if let Some(joint) = self.impulse_joints.get_mut(joint, true) {
            if let Some(revolute) = joint.data.as_revolute_mut() {
                revolute.set_motor_position(target, stiffness, damping);
            }
        }
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn tag(&self, handle: ColliderHandle) -> Option<&ShapeTag> {
        self.tags.get(&handle)
    }

    /// Refresh the query pipeline after body or collider mutations.
    /// Call once before a batch of ray casts.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// Invoke `callback` for every collider intersecting the ray, in
    /// unspecified order. The callback returns `false` to stop early.
    /// Callers fold the intersections down to the hit they want; no
    /// ordering is guaranteed by the backend.
    pub fn intersections_with_ray(
        &self,
        origin: Point<Real>,
        dir: Vector<Real>,
        max_toi: Real,
        callback: impl FnMut(ColliderHandle, RayIntersection) -> bool,
    ) {
        let ray = Ray::new(origin, dir);
        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_toi,
            true,
            QueryFilter::default(),
            callback,
        );
    }
}
