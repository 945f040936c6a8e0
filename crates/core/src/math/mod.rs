//! Vector and quaternion algebra

pub mod quaternion;
pub mod vector3;

pub use quaternion::Quaternion;
pub use vector3::Vector3;
