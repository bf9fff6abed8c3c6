//! Math utilities and types
//!
//! Provides fundamental math types for positioning tooth models in scene space.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Rigid transform: a rotation followed by a translation, no scale
///
/// One of these places a tooth's local geometry in scene space for a
/// treatment stage. The rotation is always a unit quaternion; inputs from
/// the data source are re-normalized before one of these is built (see
/// `scene::TransformStore`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation quaternion (unit length)
    pub rotation: Quat,

    /// Translation applied after rotation
    pub translation: Vec3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// Create the identity transform (no rotation, no translation)
    pub fn identity() -> Self {
        Self {
            rotation: Quat::identity(),
            translation: Vec3::zeros(),
        }
    }

    /// Create a transform from rotation and translation
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Create a transform with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::identity(),
            translation,
        }
    }

    /// Convert to a transformation matrix (rotate, then translate)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation) * self.rotation.to_homogeneous()
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.rotation.transform_point(&point) + self.translation
    }

    /// Apply this transform to a direction vector (rotation only)
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// True when this is (numerically) the identity transform
    pub fn is_identity(&self) -> bool {
        self.rotation.quaternion().w.abs() > 1.0 - 1e-6 && self.translation.norm() < 1e-6
    }
}
