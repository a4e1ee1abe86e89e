/// Common data types for hardware abstraction interfaces
pub use nalgebra::{Vector2, Vector3};

/// 2D vector representation using nalgebra
pub type Vector2f = Vector2<f32>;

/// 3D vector representation using nalgebra
pub type Vector3d = Vector3<f32>;
