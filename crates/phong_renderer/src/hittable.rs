//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray};
use phong_math::{Interval, Vec3};

/// Record of a ray-object intersection.
///
/// Produced fresh by every query; never shared between queries.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record at parameter `t`, orienting `outward_normal` against the ray.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p: ray.at(t),
            normal,
            material,
            t,
            front_face,
        }
    }
}

/// Trait for objects that can be hit by rays.
///
/// Queries must not mutate the object: the same geometry is shared by every
/// render worker.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// A list of hittable objects, searched linearly.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let closest_so_far = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use std::sync::Arc;

    fn sphere_at(z: f32) -> Box<dyn Hittable> {
        Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Material::default()),
        ))
    }

    #[test]
    fn test_face_normal_orientation() {
        let material = Material::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let outside = HitRecord::new(&ray, 1.0, Vec3::Z, &material);
        assert!(outside.front_face);
        assert_eq!(outside.normal, Vec3::Z);

        let inside = HitRecord::new(&ray, 1.0, -Vec3::Z, &material);
        assert!(!inside.front_face);
        assert_eq!(inside.normal, Vec3::Z);
        assert_eq!(inside.p, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_list_returns_nearest() {
        let mut world = HittableList::new();
        // Far sphere first so the search interval has to shrink
        world.add(sphere_at(-10.0));
        world.add(sphere_at(-3.0));
        world.add(sphere_at(-6.0));
        assert_eq!(world.len(), 3);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = world.hit(&ray, Interval::FORWARD).unwrap();
        assert!((rec.t - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_list_misses() {
        let mut world = HittableList::default();
        assert!(world.is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(world.hit(&ray, Interval::FORWARD).is_none());

        world.add(sphere_at(-3.0));
        world.clear();
        assert!(world.hit(&ray, Interval::FORWARD).is_none());
    }
}
