// Re-export glam for convenience
pub use glam::*;

// Phong math types
mod interval;
pub use interval::Interval;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec4_plane_dot() {
        // Plane coefficients dotted with a homogeneous point
        let plane = Vec4::new(0.0, 1.0, 0.0, -2.0);
        let p = Vec3::new(5.0, 2.0, -1.0).extend(1.0);
        assert_eq!(plane.dot(p), 0.0);
    }
}
