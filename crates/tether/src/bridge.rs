use glam::{Quat, Vec3};

use crate::body::BodyOps;
use crate::error::BridgeError;
use crate::math::{self, Pose};
use crate::monitor::{CollisionMonitor, MonitorEntry};
use crate::registry::{BodyRegistry, Ownership};
use crate::snapshot::{BodyId, JitterBuffer, Snapshot, SourceId, SourceStats, TransformSample};

/// Blend state machine tunables. Empirically tuned; reproduce exactly for
/// behavioral parity across peers.
#[derive(Debug, Clone, Copy)]
pub struct BridgeConfig {
    /// Local radius expansion for early collision detection.
    pub radius_expansion: f32,
    /// Seconds in collision before the hand-back ramp starts.
    pub ramp_start: f32,
    /// Seconds in collision when the hand-back ramp ends.
    pub ramp_end: f32,
    /// Ratio the ramp holds at while bodies are still separating.
    pub release_ratio: f32,
    /// Relative distance below which the ramp is held back.
    pub release_distance: f32,
    /// Relative distance bound for unconditional monitor entry.
    pub collision_range_distance: f32,
    /// Ratios below this leave the simulated transform untouched.
    pub min_blend_ratio: f32,
    /// Positional delta under which a blend write is skipped.
    pub position_epsilon: f32,
    /// Angular delta (degrees) under which a blend write is skipped.
    pub angle_epsilon_deg: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            radius_expansion: 1.3,
            ramp_start: 0.6,
            ramp_end: 2.0,
            release_ratio: 0.2,
            release_distance: 0.8,
            collision_range_distance: 1.2,
            min_blend_ratio: 0.05,
            position_epsilon: 0.01,
            angle_epsilon_deg: 3.0,
        }
    }
}

/// Division-by-zero guard when summing radii.
const DISTANCE_GUARD: f32 = 1e-4;

/// Per-remote-body state captured during the keyframe pass, consumed by
/// the collision pass: the pre-tick pose and the velocities a hand-off to
/// local simulation should start from.
#[derive(Debug)]
struct SwitchInfo {
    id: BodyId,
    start_position: Vec3,
    start_rotation: Quat,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    entry: MonitorEntry,
}

#[derive(Debug)]
pub struct BridgeStats {
    pub bodies: usize,
    pub owned: usize,
    pub remote: usize,
    pub monitored: usize,
    pub sources: Vec<(SourceId, SourceStats)>,
}

/// Ties the body registry, jitter buffer, and collision monitor together
/// once per physics tick. Owned bodies are left to the native simulation;
/// remote bodies follow the jitter-buffered keyframe stream unless they
/// are plausibly interacting with an owned body, in which case they fall
/// under local simulation and are blended back afterward.
pub struct PhysicsBridge<B: BodyOps> {
    config: BridgeConfig,
    registry: BodyRegistry<B::Handle>,
    jitter: JitterBuffer,
    monitor: CollisionMonitor,
    inbox: Vec<(SourceId, Snapshot)>,
    switch_infos: Vec<SwitchInfo>,
}

impl<B: BodyOps> PhysicsBridge<B> {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            config,
            registry: BodyRegistry::new(),
            jitter: JitterBuffer::new(),
            monitor: CollisionMonitor::new(),
            inbox: Vec::new(),
            switch_infos: Vec::new(),
        }
    }

    pub fn add_rigid_body(
        &mut self,
        backend: &mut B,
        id: BodyId,
        handle: B::Handle,
        ownership: Ownership,
    ) -> Result<(), BridgeError> {
        self.registry.register(id, handle, ownership)?;
        // Owned bodies simulate; remote bodies start keyframed.
        backend.set_kinematic(handle, ownership == Ownership::Remote);
        Ok(())
    }

    pub fn remove_rigid_body(&mut self, id: &BodyId) -> Result<(), BridgeError> {
        self.registry.unregister(id)?;
        Ok(())
    }

    pub fn set_ownership(&mut self, id: &BodyId, ownership: Ownership) -> Result<(), BridgeError> {
        self.registry.set_ownership(id, ownership)
    }

    pub fn set_keyframed(&mut self, id: &BodyId, keyframed: bool) {
        self.registry.set_keyframed(id, keyframed);
    }

    /// Queue a received snapshot. Ingestion is deferred to the start of
    /// the next tick; nothing is applied mid-tick.
    pub fn add_snapshot(&mut self, source: SourceId, snapshot: Snapshot) {
        self.inbox.push((source, snapshot));
    }

    /// Drop all buffered state for a disconnected peer.
    pub fn remove_source(&mut self, source: &SourceId) -> bool {
        self.inbox.retain(|(s, _)| s != source);
        self.jitter.remove_source(source)
    }

    /// One fixed-timestep tick, invoked before the simulation step.
    /// `root` converts between the shared scene-root space and world
    /// space. Anomalies (unknown ids, missing samples) degrade to "hold
    /// last known state"; there is no fatal path here.
    pub fn fixed_update(&mut self, backend: &mut B, root: &Pose, dt: f32) {
        let half_dt = 0.5 * dt;

        self.switch_infos.clear();
        for (source, snapshot) in self.inbox.drain(..) {
            self.jitter.add(source, snapshot);
        }

        let combined = self.jitter.step(dt);
        self.monitor.begin_tick();

        // Keyframe pass: walk the id-sorted registry and the id-sorted
        // combined snapshot in lockstep.
        let mut samples = combined.iter().peekable();
        for record in self.registry.iter_mut() {
            if record.ownership == Ownership::Owned {
                backend.set_kinematic(record.handle, record.keyframed);
                continue;
            }

            while samples.peek().is_some_and(|(id, _)| **id < record.id) {
                samples.next();
            }
            let Some(sample) = samples
                .peek()
                .and_then(|(id, s)| (**id == record.id).then_some(**s))
            else {
                // No data for this body yet: hold its last known state.
                continue;
            };

            let start_position = backend.position(record.handle);
            let start_rotation = backend.rotation(record.handle);
            let keyframed_position = root.transform_point(sample.position);
            let keyframed_rotation = (root.rotation * sample.rotation).normalize();

            // Reconstruct the keyframe-implied velocities whenever a
            // materially newer sample arrives; they seed the hand-off to
            // local simulation. The angular delta is measured in the
            // pre-tick body frame.
            if record.last_keyframe_time < sample.local_time {
                let delta = sample.local_time - record.last_keyframe_time;
                if delta > f32::EPSILON {
                    let inv = 1.0 / delta;
                    record.linear_velocity = (keyframed_position - start_position) * inv;
                    record.angular_velocity = (start_rotation.inverse() * keyframed_rotation)
                        .normalize()
                        .to_scaled_axis()
                        * inv;
                }
                record.last_keyframe_time = sample.local_time;
            }

            let mut info = SwitchInfo {
                id: record.id,
                start_position,
                start_rotation,
                linear_velocity: record.linear_velocity,
                angular_velocity: record.angular_velocity,
                entry: MonitorEntry::default(),
            };

            if let Some(mut entry) = self.monitor.seed(&record.id) {
                // Under local simulation; nudge toward the keyframe
                // target as the hand-back ramp progresses.
                backend.set_kinematic(record.handle, false);
                entry.time_in_collision += dt;
                info.linear_velocity = backend.linear_velocity(record.handle);
                info.angular_velocity = backend.angular_velocity(record.handle);

                if entry.blend_ratio > self.config.min_blend_ratio {
                    let t = entry.blend_ratio;
                    let blended_position = keyframed_position * t + start_position * (1.0 - t);
                    let blended_rotation =
                        math::shortest_slerp(start_rotation, keyframed_rotation, t);

                    // Skip writes below the epsilons so settled bodies are
                    // not perturbed by simulation noise.
                    let move_position = (start_position - blended_position).length()
                        > self.config.position_epsilon;
                    let move_rotation = math::angle_between_deg(start_rotation, blended_rotation)
                        > self.config.angle_epsilon_deg;
                    if move_position || move_rotation {
                        backend.set_pose(
                            record.handle,
                            if move_position {
                                blended_position
                            } else {
                                start_position
                            },
                            if move_rotation {
                                blended_rotation
                            } else {
                                start_rotation
                            },
                        );
                    }
                }

                info.entry = entry;
            } else {
                // Pure keyframing: force the interpolated transform.
                backend.set_kinematic(record.handle, true);
                backend.set_pose(record.handle, keyframed_position, keyframed_rotation);
                backend.set_velocities(record.handle, Vec3::ZERO, Vec3::ZERO);
            }

            self.switch_infos.push(info);
        }

        // Collision pass: test every owned body against every remote body
        // seen this tick and rebuild the monitor set.
        let owned_handles: Vec<B::Handle> = self
            .registry
            .iter()
            .filter(|r| r.ownership == Ownership::Owned)
            .map(|r| r.handle)
            .collect();

        for &owned_handle in &owned_handles {
            let owned_position = backend.position(owned_handle);
            let owned_velocity = backend.linear_velocity(owned_handle);
            let projected_position = owned_position + owned_velocity * dt;

            for info in &mut self.switch_infos {
                let Some(remote) = self.registry.get(&info.id) else {
                    continue;
                };
                let remote_handle = remote.handle;
                let remote_position = backend.position(remote_handle);

                let center_distance = (remote_position - owned_position).length();
                let projected_distance = (remote_position - projected_position).length();

                let remote_hit = backend.closest_point(remote_handle, owned_position);
                let owned_hit = backend.closest_point(owned_handle, remote_position);
                let remote_radius =
                    self.config.radius_expansion * (remote_hit - remote_position).length();
                let owned_radius =
                    self.config.radius_expansion * (owned_hit - owned_position).length();
                let total_radius = remote_radius + owned_radius + DISTANCE_GUARD;

                let entry = &mut info.entry;
                entry.relative_distance =
                    center_distance.min(projected_distance) / total_radius;

                let in_range =
                    projected_distance < total_radius || center_distance < total_radius;
                let elapsed = entry.time_in_collision;
                let mut add_to_monitor = false;

                // Ongoing collision still inside the initial window.
                if entry.time_in_collision > half_dt
                    && elapsed <= self.config.ramp_start
                    && entry.relative_distance < self.config.collision_range_distance
                {
                    add_to_monitor = true;
                }

                // Hand-back ramp toward the keyframe stream.
                if !add_to_monitor && elapsed > 5.0 * dt && elapsed <= self.config.ramp_end {
                    add_to_monitor = true;
                    let clamped = elapsed.max(self.config.ramp_start + dt);
                    let window = self.config.ramp_end - self.config.ramp_start;
                    entry.blend_ratio = (clamped - self.config.ramp_start) / window;

                    // Bodies separating while the ramp is under way: hold
                    // the ratio at the release threshold instead of
                    // letting it oscillate.
                    if entry.relative_distance < self.config.release_distance
                        && entry.blend_ratio > self.config.release_ratio
                    {
                        entry.time_in_collision =
                            self.config.ramp_start + self.config.release_ratio * window;
                        entry.blend_ratio = self.config.release_ratio;
                    }
                }

                if in_range || add_to_monitor {
                    let merged = self.monitor.propose(info.id, *entry);

                    // Fresh collision: unlock the body and hand it the
                    // keyframe-implied velocities so the transition is
                    // velocity-continuous.
                    if merged.time_in_collision < half_dt {
                        log::trace!(
                            "remote body {} unlocked for local collision response",
                            info.id
                        );
                        backend.set_kinematic(remote_handle, false);
                        backend.set_pose(remote_handle, info.start_position, info.start_rotation);
                        backend.set_velocities(
                            remote_handle,
                            info.linear_velocity,
                            info.angular_velocity,
                        );
                    }
                }
            }
        }
    }

    /// Snapshot of all owned bodies' transforms in root-relative space,
    /// for transmission to peers. Invoked after the simulation step.
    pub fn generate_snapshot(&self, backend: &B, time: f32, root: &Pose) -> Snapshot {
        let mut bodies = Vec::with_capacity(self.registry.owned_count());
        let inverse_rotation = root.rotation.inverse();

        for record in self.registry.iter() {
            if record.ownership != Ownership::Owned {
                continue;
            }

            bodies.push(TransformSample {
                id: record.id,
                position: root.inverse_transform_point(backend.position(record.handle)),
                rotation: (inverse_rotation * backend.rotation(record.handle)).normalize(),
            });
        }

        Snapshot::new(time, bodies)
    }

    pub fn owned_count(&self) -> usize {
        self.registry.owned_count()
    }

    pub fn remote_count(&self) -> usize {
        self.registry.remote_count()
    }

    pub fn body_count(&self) -> usize {
        self.registry.len()
    }

    pub fn monitored_count(&self) -> usize {
        self.monitor.len()
    }

    pub fn monitor_entry(&self, id: &BodyId) -> Option<MonitorEntry> {
        self.monitor.entry(id).copied()
    }

    pub fn debug_stats(&self) -> BridgeStats {
        BridgeStats {
            bodies: self.registry.len(),
            owned: self.registry.owned_count(),
            remote: self.registry.remote_count(),
            monitored: self.monitor.len(),
            sources: self.jitter.stats().map(|(id, s)| (*id, s)).collect(),
        }
    }
}

impl<B: BodyOps> Default for PhysicsBridge<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Clone)]
    struct TestBody {
        position: Vec3,
        rotation: Quat,
        linear_velocity: Vec3,
        angular_velocity: Vec3,
        kinematic: bool,
        radius: f32,
    }

    #[derive(Debug, Default)]
    struct TestWorld {
        bodies: Vec<TestBody>,
    }

    impl TestWorld {
        fn add(&mut self, position: Vec3, radius: f32) -> usize {
            self.bodies.push(TestBody {
                position,
                rotation: Quat::IDENTITY,
                linear_velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                kinematic: false,
                radius,
            });
            self.bodies.len() - 1
        }
    }

    impl BodyOps for TestWorld {
        type Handle = usize;

        fn position(&self, handle: usize) -> Vec3 {
            self.bodies[handle].position
        }

        fn rotation(&self, handle: usize) -> Quat {
            self.bodies[handle].rotation
        }

        fn set_pose(&mut self, handle: usize, position: Vec3, rotation: Quat) {
            self.bodies[handle].position = position;
            self.bodies[handle].rotation = rotation;
        }

        fn linear_velocity(&self, handle: usize) -> Vec3 {
            self.bodies[handle].linear_velocity
        }

        fn angular_velocity(&self, handle: usize) -> Vec3 {
            self.bodies[handle].angular_velocity
        }

        fn set_velocities(&mut self, handle: usize, linear: Vec3, angular: Vec3) {
            self.bodies[handle].linear_velocity = linear;
            self.bodies[handle].angular_velocity = angular;
        }

        fn set_kinematic(&mut self, handle: usize, kinematic: bool) {
            self.bodies[handle].kinematic = kinematic;
        }

        fn closest_point(&self, handle: usize, target: Vec3) -> Vec3 {
            let body = &self.bodies[handle];
            let offset = target - body.position;
            let distance = offset.length();
            if distance <= body.radius || distance < 1e-6 {
                return target;
            }
            body.position + offset / distance * body.radius
        }
    }

    fn snap_at(time: f32, id: Uuid, position: Vec3) -> Snapshot {
        Snapshot::new(time, vec![TransformSample::new(id, position, Quat::IDENTITY)])
    }

    #[test]
    fn remote_body_follows_keyframe_stream() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        let id = Uuid::from_u128(1);
        let handle = world.add(Vec3::ZERO, 0.1);
        bridge
            .add_rigid_body(&mut world, id, handle, Ownership::Remote)
            .unwrap();
        assert!(world.bodies[handle].kinematic);

        bridge.add_snapshot(source, snap_at(0.0, id, Vec3::ZERO));
        bridge.add_snapshot(source, snap_at(0.2, id, Vec3::new(2.0, 0.0, 0.0)));

        bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);

        let body = &world.bodies[handle];
        assert!(body.kinematic);
        assert!(body.position.x > 0.0 && body.position.x < 2.0);
        assert_eq!(body.linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn keyframe_target_respects_root_transform() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        let id = Uuid::from_u128(1);
        let handle = world.add(Vec3::ZERO, 0.1);
        bridge
            .add_rigid_body(&mut world, id, handle, Ownership::Remote)
            .unwrap();

        let root = Pose::new(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY);
        bridge.add_snapshot(source, snap_at(0.0, id, Vec3::new(1.0, 0.0, 0.0)));
        bridge.fixed_update(&mut world, &root, DT);

        assert!((world.bodies[handle].position.x - 11.0).abs() < 1e-4);
    }

    #[test]
    fn handoff_is_velocity_continuous() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        let remote_id = Uuid::from_u128(1);
        let owned_id = Uuid::from_u128(2);

        let remote_handle = world.add(Vec3::ZERO, 0.3);
        let owned_handle = world.add(Vec3::new(0.5, 0.0, 0.0), 0.3);
        bridge
            .add_rigid_body(&mut world, remote_id, remote_handle, Ownership::Remote)
            .unwrap();
        bridge
            .add_rigid_body(&mut world, owned_id, owned_handle, Ownership::Owned)
            .unwrap();

        // Stream moving at 10 m/s along x.
        bridge.add_snapshot(source, snap_at(0.0, remote_id, Vec3::ZERO));
        bridge.add_snapshot(source, snap_at(0.1, remote_id, Vec3::new(1.0, 0.0, 0.0)));

        bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);

        // Proximity pulled the remote body under local simulation with
        // the keyframe-implied velocity, starting from its pre-tick pose.
        let body = &world.bodies[remote_handle];
        assert!(!body.kinematic);
        assert!((body.linear_velocity.x - 10.0).abs() < 0.1);
        assert!(body.position.length() < 1e-4);
        assert_eq!(bridge.monitored_count(), 1);
    }

    #[test]
    fn merge_takes_most_colliding_view() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        let remote_id = Uuid::from_u128(1);

        let remote_handle = world.add(Vec3::ZERO, 0.1);
        let near_handle = world.add(Vec3::new(0.15, 0.0, 0.0), 0.1);
        let far_handle = world.add(Vec3::new(0.2, 0.0, 0.0), 0.1);

        bridge
            .add_rigid_body(&mut world, remote_id, remote_handle, Ownership::Remote)
            .unwrap();
        bridge
            .add_rigid_body(&mut world, Uuid::from_u128(2), near_handle, Ownership::Owned)
            .unwrap();
        bridge
            .add_rigid_body(&mut world, Uuid::from_u128(3), far_handle, Ownership::Owned)
            .unwrap();

        bridge.add_snapshot(source, snap_at(0.0, remote_id, Vec3::ZERO));
        bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);

        let total = 1.3 * 0.2 + DISTANCE_GUARD;
        let near_relative = 0.15 / total;
        let entry = bridge.monitor_entry(&remote_id).unwrap();
        assert!((entry.relative_distance - near_relative).abs() < 1e-4);
    }

    #[test]
    fn blend_ratio_decays_monotonically() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        let remote_id = Uuid::from_u128(1);
        let owned_id = Uuid::from_u128(2);

        let remote_handle = world.add(Vec3::ZERO, 0.3);
        let owned_handle = world.add(Vec3::new(0.5, 0.0, 0.0), 0.3);
        bridge
            .add_rigid_body(&mut world, remote_id, remote_handle, Ownership::Remote)
            .unwrap();
        bridge
            .add_rigid_body(&mut world, owned_id, owned_handle, Ownership::Owned)
            .unwrap();

        bridge.add_snapshot(source, snap_at(0.0, remote_id, Vec3::ZERO));

        // Hold proximity long enough for the collision to mature past the
        // lower decay bound.
        for _ in 0..10 {
            bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);
            assert_eq!(bridge.monitored_count(), 1);
        }

        // Separate the pair; the monitor keeps proposing through the
        // hand-back window with a non-decreasing ratio.
        world.bodies[owned_handle].position = Vec3::new(100.0, 0.0, 0.0);

        let mut last_ratio = 0.0;
        let mut saw_ramp = false;
        for _ in 0..150 {
            bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);
            if let Some(entry) = bridge.monitor_entry(&remote_id) {
                assert!(entry.blend_ratio >= last_ratio - 1e-6);
                last_ratio = entry.blend_ratio;
                saw_ramp |= entry.blend_ratio > 0.0;
            }
        }

        assert!(saw_ramp);
        // Past the ramp window and out of range: released back to pure
        // keyframing.
        assert_eq!(bridge.monitored_count(), 0);
        assert!(world.bodies[remote_handle].kinematic);
    }

    #[test]
    fn close_pair_holds_ratio_at_release_threshold() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        let remote_id = Uuid::from_u128(1);
        let owned_id = Uuid::from_u128(2);

        let remote_handle = world.add(Vec3::ZERO, 0.3);
        let owned_handle = world.add(Vec3::new(0.5, 0.0, 0.0), 0.3);
        bridge
            .add_rigid_body(&mut world, remote_id, remote_handle, Ownership::Remote)
            .unwrap();
        bridge
            .add_rigid_body(&mut world, owned_id, owned_handle, Ownership::Owned)
            .unwrap();

        bridge.add_snapshot(source, snap_at(0.0, remote_id, Vec3::ZERO));

        // The pair never separates, so the ramp climbs only until the
        // release threshold and then plateaus there instead of handing
        // the body back.
        for _ in 0..60 {
            bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);
        }

        let config = BridgeConfig::default();
        for _ in 0..20 {
            bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);
            let entry = bridge.monitor_entry(&remote_id).unwrap();
            assert!((entry.blend_ratio - config.release_ratio).abs() < 1e-4);

            let held_time = config.ramp_start
                + config.release_ratio * (config.ramp_end - config.ramp_start);
            assert!((entry.time_in_collision - held_time).abs() < 1e-3);
        }
        assert_eq!(bridge.monitored_count(), 1);
        assert!(!world.bodies[remote_handle].kinematic);
    }

    #[test]
    fn owned_body_kinematic_follows_keyframed_flag() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let id = Uuid::from_u128(1);
        let handle = world.add(Vec3::ZERO, 0.1);
        bridge
            .add_rigid_body(&mut world, id, handle, Ownership::Owned)
            .unwrap();

        bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);
        assert!(!world.bodies[handle].kinematic);

        bridge.set_keyframed(&id, true);
        bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);
        assert!(world.bodies[handle].kinematic);
    }

    #[test]
    fn generated_snapshot_covers_owned_bodies_in_root_space() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let owned_id = Uuid::from_u128(2);
        let remote_id = Uuid::from_u128(1);
        let owned_handle = world.add(Vec3::new(11.0, 0.0, 0.0), 0.1);
        let remote_handle = world.add(Vec3::ZERO, 0.1);

        bridge
            .add_rigid_body(&mut world, owned_id, owned_handle, Ownership::Owned)
            .unwrap();
        bridge
            .add_rigid_body(&mut world, remote_id, remote_handle, Ownership::Remote)
            .unwrap();

        let root = Pose::new(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY);
        let snapshot = bridge.generate_snapshot(&world, 1.5, &root);

        assert_eq!(snapshot.time(), 1.5);
        assert_eq!(snapshot.bodies().len(), 1);
        assert_eq!(snapshot.bodies()[0].id, owned_id);
        assert!((snapshot.bodies()[0].position.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_snapshot_ids_are_tolerated() {
        let mut world = TestWorld::default();
        let mut bridge: PhysicsBridge<TestWorld> = PhysicsBridge::new();

        let source = Uuid::from_u128(100);
        bridge.add_snapshot(source, snap_at(0.0, Uuid::from_u128(99), Vec3::ONE));
        bridge.fixed_update(&mut world, &Pose::IDENTITY, DT);

        assert_eq!(bridge.body_count(), 0);
    }
}
