use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::body::BodyOps;

/// Rapier-backed simulation world implementing the bridge's body
/// capability interface.
pub struct RapierWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub const TICK_RATE: Real = 1.0 / 60.0;

    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = Self::TICK_RATE;

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(0.0, -9.81, 0.0),
        }
    }

    pub fn step(&mut self) {
        self.pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    pub fn add_dynamic_sphere(&mut self, position: Vec3, radius: f32, mass: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(position.x, position.y, position.z))
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(radius)
            .mass(mass)
            .friction(0.5)
            .restitution(0.3)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn add_kinematic_sphere(&mut self, position: Vec3, radius: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(Vector::new(position.x, position.y, position.z))
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(radius).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn add_dynamic_box(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        mass: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(position.x, position.y, position.z))
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .friction(0.5)
            .restitution(0.3)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn add_kinematic_box(&mut self, position: Vec3, half_extents: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(Vector::new(position.x, position.y, position.z))
            .build();
        let handle = self.bodies.insert(body);

        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn add_ground(&mut self, y: Real, half_size: Real) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_size, 0.1, half_size)
            .translation(Vector::new(0.0, y, 0.0))
            .build();
        self.colliders.insert(collider)
    }

    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }
}

impl BodyOps for RapierWorld {
    type Handle = RigidBodyHandle;

    fn position(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies.get(handle).map_or(Vec3::ZERO, |b| {
            let t = b.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    fn rotation(&self, handle: RigidBodyHandle) -> Quat {
        self.bodies.get(handle).map_or(Quat::IDENTITY, |b| {
            let r = b.rotation();
            Quat::from_xyzw(r.x, r.y, r.z, r.w).normalize()
        })
    }

    fn set_pose(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let rot =
                Rotation::from_xyzw(rotation.x, rotation.y, rotation.z, rotation.w).normalize();
            let pose = Pose::from_parts(Vector::new(position.x, position.y, position.z), rot);
            body.set_position(pose, true);
        }
    }

    fn linear_velocity(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies.get(handle).map_or(Vec3::ZERO, |b| {
            let v = b.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    fn angular_velocity(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies.get(handle).map_or(Vec3::ZERO, |b| {
            let v = b.angvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    fn set_velocities(&mut self, handle: RigidBodyHandle, linear: Vec3, angular: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(Vector::new(linear.x, linear.y, linear.z), true);
            body.set_angvel(Vector::new(angular.x, angular.y, angular.z), true);
        }
    }

    fn set_kinematic(&mut self, handle: RigidBodyHandle, kinematic: bool) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let body_type = if kinematic {
                RigidBodyType::KinematicPositionBased
            } else {
                RigidBodyType::Dynamic
            };
            if body.body_type() != body_type {
                body.set_body_type(body_type, true);
            }
        }
    }

    /// Closest point on the body's collider bounds, axis-aligned, which
    /// is what the monitor's radius estimate expects.
    fn closest_point(&self, handle: RigidBodyHandle, target: Vec3) -> Vec3 {
        let Some(body) = self.bodies.get(handle) else {
            return target;
        };

        let center = {
            let t = body.translation();
            Vec3::new(t.x, t.y, t.z)
        };

        let mut best = center;
        let mut best_distance = f32::MAX;
        for &collider_handle in body.colliders() {
            let Some(collider) = self.colliders.get(collider_handle) else {
                continue;
            };
            let aabb = collider.compute_aabb();
            let clamped = Vec3::new(
                target.x.clamp(aabb.mins.x, aabb.maxs.x),
                target.y.clamp(aabb.mins.y, aabb.maxs.y),
                target.z.clamp(aabb.mins.z, aabb.maxs.z),
            );
            let distance = (clamped - target).length();
            if distance < best_distance {
                best_distance = distance;
                best = clamped;
            }
        }
        best
    }
}
