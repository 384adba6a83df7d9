use glam::{Quat, Vec3};

/// Capability interface over the simulation backend. The bridge only ever
/// manipulates bodies through this trait; no concrete engine type crosses
/// the boundary.
pub trait BodyOps {
    type Handle: Copy;

    fn position(&self, handle: Self::Handle) -> Vec3;
    fn rotation(&self, handle: Self::Handle) -> Quat;
    fn set_pose(&mut self, handle: Self::Handle, position: Vec3, rotation: Quat);

    fn linear_velocity(&self, handle: Self::Handle) -> Vec3;
    fn angular_velocity(&self, handle: Self::Handle) -> Vec3;
    fn set_velocities(&mut self, handle: Self::Handle, linear: Vec3, angular: Vec3);

    fn set_kinematic(&mut self, handle: Self::Handle, kinematic: bool);

    /// Closest point on the body's collision bounds to a world-space
    /// target. Feeds the collision monitor's radius estimate.
    fn closest_point(&self, handle: Self::Handle, target: Vec3) -> Vec3;
}
