use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Rotation, Rotation3, Vector3, VectorSpace, Zero};

/// A rigid placement in 3D: where an object is and which way it faces.
///
/// Poses are plain values. Composition follows the usual parent/child
/// convention: `parent.compose(&local)` yields the child's world pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
        }
    }

    /// Pose at the origin with no rotation
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::from_sv(1.0, Vector3::zero()),
        }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Pose at `position` rotated by `yaw` around the world up axis (+Y)
    pub fn from_position_yaw(position: Vector3<f32>, yaw: Rad<f32>) -> Self {
        Self {
            position,
            rotation: Quaternion::from_angle_y(yaw),
        }
    }

    /// Apply `local` in this pose's frame (`self * local`)
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation.rotate_vector(local.position),
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    pub fn inverse(&self) -> Pose {
        let inv_rotation = self.rotation.invert();
        Pose {
            position: inv_rotation.rotate_vector(-self.position),
            rotation: inv_rotation,
        }
    }

    /// Express this world pose in the frame of `parent`
    pub fn relative_to(&self, parent: &Pose) -> Pose {
        parent.inverse().compose(self)
    }

    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation.rotate_vector(point)
    }

    pub fn transform_vector(&self, vector: Vector3<f32>) -> Vector3<f32> {
        self.rotation.rotate_vector(vector)
    }

    /// The pose's local +Y axis in world space
    pub fn up(&self) -> Vector3<f32> {
        self.transform_vector(Vector3::unit_y())
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Pose {
        Pose {
            position: self.position + offset,
            rotation: self.rotation,
        }
    }

    /// Blend toward `target`. Position is lerped, orientation slerped along
    /// the shorter arc. `t` is clamped to `[0, 1]`.
    pub fn interpolate(&self, target: &Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *target;
        }
        Pose {
            position: self.position.lerp(target.position, t),
            rotation: self.rotation.slerp(target.rotation, t).normalize(),
        }
    }

    /// Position within `epsilon` and orientation within `epsilon` of quaternion dot
    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        let position_close = (self.position - other.position).magnitude() <= epsilon;
        let rotation_close = self.rotation.dot(other.rotation).abs() >= 1.0 - epsilon;
        position_close && rotation_close
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn compose_then_relative_round_trips() {
        let parent = Pose::from_position_yaw(Vector3::new(1.0, 2.0, 3.0), Deg(90.0).into());
        let local = Pose::from_position(Vector3::new(0.0, 0.0, 1.0));

        let world = parent.compose(&local);
        // +Z rotated 90 degrees about +Y lands on +X
        assert!(close(world.position, Vector3::new(2.0, 2.0, 3.0)));

        let back = world.relative_to(&parent);
        assert!(back.approx_eq(&local, 1e-4));
    }

    #[test]
    fn interpolate_hits_endpoints_and_midpoint() {
        let a = Pose::from_position(Vector3::new(0.0, 0.0, 0.0));
        let b = Pose::from_position_yaw(Vector3::new(2.0, 0.0, 0.0), Deg(90.0).into());

        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);

        let mid = a.interpolate(&b, 0.5);
        assert!(close(mid.position, Vector3::new(1.0, 0.0, 0.0)));
        let expected = Pose::from_position_yaw(Vector3::zero(), Deg(45.0).into());
        assert!(mid.rotation.dot(expected.rotation).abs() > 0.9999);
    }

    #[test]
    fn up_follows_rotation() {
        let tipped = Pose::new(
            Vector3::zero(),
            Quaternion::from_angle_z(Deg(90.0)),
        );
        assert!(close(tipped.up(), Vector3::new(-1.0, 0.0, 0.0)));
    }
}
