//! Convex polyhedron primitive: the intersection of half-spaces.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use phong_math::{Interval, Vec3, Vec4};

/// Rays closer to parallel than this never cross a face.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A plane `a*x + b*y + c*z + d = 0`.
///
/// Points with `a*x + b*y + c*z + d <= 0` are inside, so `(a, b, c)` is the
/// outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    coefficients: Vec4,
}

impl Plane {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            coefficients: Vec4::new(a, b, c, d),
        }
    }

    /// Outward normal (not normalized).
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.coefficients.truncate()
    }

    /// Signed plane value at `p`; positive outside.
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.coefficients.dot(p.extend(1.0))
    }
}

/// A convex solid bounded by planes. Owns nothing but its faces and material.
pub struct Polyhedron {
    faces: Vec<Plane>,
    material: Arc<Material>,
}

impl Polyhedron {
    pub fn new(faces: Vec<Plane>, material: Arc<Material>) -> Self {
        Self { faces, material }
    }

    pub fn add_face(&mut self, face: Plane) {
        self.faces.push(face);
    }

    pub fn faces(&self) -> &[Plane] {
        &self.faces
    }
}

/// One end of the parameter interval and the face that produced it.
#[derive(Clone, Copy)]
struct Bound {
    t: f32,
    face: Option<usize>,
}

impl Hittable for Polyhedron {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut entry = Bound {
            t: f32::NEG_INFINITY,
            face: None,
        };
        let mut exit = Bound {
            t: f32::INFINITY,
            face: None,
        };

        for (index, plane) in self.faces.iter().enumerate() {
            let denom = plane.normal().dot(ray.direction());
            let dist = plane.signed_distance(ray.origin());

            if denom.abs() < PARALLEL_EPSILON {
                // Parallel: either always outside this face or unconstrained by it
                if dist > 0.0 {
                    return None;
                }
                continue;
            }

            let t = -dist / denom;
            if denom < 0.0 {
                if t > entry.t {
                    entry = Bound { t, face: Some(index) };
                }
            } else if t < exit.t {
                exit = Bound { t, face: Some(index) };
            }

            if entry.t > exit.t {
                return None;
            }
        }

        let accepted = if ray_t.surrounds(entry.t) {
            entry
        } else if ray_t.surrounds(exit.t) {
            exit
        } else {
            return None;
        };

        let face = accepted.face?;
        let outward_normal = self.faces[face].normal().normalize();
        Some(HitRecord::new(ray, accepted.t, outward_normal, &self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis-aligned cube spanning [-1, 1] on every axis.
    fn cube() -> Polyhedron {
        let faces = vec![
            Plane::new(1.0, 0.0, 0.0, -1.0),
            Plane::new(-1.0, 0.0, 0.0, -1.0),
            Plane::new(0.0, 1.0, 0.0, -1.0),
            Plane::new(0.0, -1.0, 0.0, -1.0),
            Plane::new(0.0, 0.0, 1.0, -1.0),
            Plane::new(0.0, 0.0, -1.0, -1.0),
        ];
        Polyhedron::new(faces, Arc::new(Material::default()))
    }

    #[test]
    fn test_plane_sides() {
        let plane = Plane::new(0.0, 2.0, 0.0, -2.0);
        assert!(plane.signed_distance(Vec3::new(0.0, 2.0, 0.0)) > 0.0);
        assert!(plane.signed_distance(Vec3::ZERO) < 0.0);
        assert_eq!(plane.signed_distance(Vec3::new(3.0, 1.0, 3.0)), 0.0);
    }

    #[test]
    fn test_hit_at_entry() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let cube = cube();
        let rec = cube.hit(&ray, Interval::FORWARD).unwrap();

        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_hit_at_exit_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        let cube = cube();
        let rec = cube.hit(&ray, Interval::FORWARD).unwrap();

        // Entry is behind the origin, exit at y = 1
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_miss_when_entry_after_exit() {
        // Passes beside the cube: leaves through y = -1 before entering through x = 1
        let ray = Ray::new(Vec3::new(5.0, 2.5, 0.0), Vec3::new(-1.0, -1.0, 0.0).normalize());
        assert!(cube().hit(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_parallel_outside_misses() {
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(cube().hit(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(cube().hit(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_out_of_range_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(cube().hit(&ray, Interval::new(0.001, 3.0)).is_none());
    }

    #[test]
    fn test_tilted_face_normal_is_normalized() {
        // Half-space x + y <= 1 capped into a wedge
        let mut wedge = cube();
        wedge.add_face(Plane::new(1.0, 1.0, 0.0, -1.0));
        assert_eq!(wedge.faces().len(), 7);

        let ray = Ray::new(Vec3::new(3.0, 3.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        let rec = wedge.hit(&ray, Interval::FORWARD).unwrap();

        assert!((rec.t - 2.5).abs() < 1e-5);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((rec.normal - expected).length() < 1e-5);
    }
}
