//! Local illumination: ambient, diffuse and specular terms with shadow rays.
//!
//! The brightening applied here (two square roots on diffuse, one on
//! ambient) is not a gamma model. Scenes authored for this renderer depend
//! on those exact multiplicities.

use phong_core::Color;
use phong_math::{Interval, Vec3};
use rand::RngCore;

use crate::sampling::random_in_unit_sphere;
use crate::{HitRecord, Hittable, LightList, Ray};

/// Scale of the soft-shadow jitter relative to the distance to the light.
const SOFT_SHADOW_SPREAD: f32 = 1.0 / 500.0;

/// Specular cosines below this are treated as zero.
const SPECULAR_CUTOFF: f32 = 1e-7;

/// Point-light contributions at a hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightContributions {
    /// Sum of diffuse terms, square-rooted twice per channel
    pub diffuse: Color,
    /// Sum of specular terms
    pub specular: Color,
}

/// Evaluate every point light (index ≥ 1) at the hit point.
///
/// Each light casts its own shadow ray. With `soft_shadows` the ray starts
/// from a jittered copy of the hit point; the record itself is untouched.
pub fn light_contributions(
    ray: &Ray,
    rec: &HitRecord,
    lights: &LightList,
    world: &dyn Hittable,
    soft_shadows: bool,
    rng: &mut dyn RngCore,
) -> LightContributions {
    let material = rec.material;
    let view_dir = ray.direction().normalize();

    let mut diffuse = Color::ZERO;
    let mut specular = Color::ZERO;

    for light in lights.point_lights() {
        let distance = (light.position - rec.p).length();
        let origin = shadow_origin(rec.p, light.position, soft_shadows, rng);
        let to_light = light.position - origin;

        if in_shadow(world, origin, to_light, distance) {
            continue;
        }

        let attenuation = light.attenuation.factor(distance);

        diffuse += material.diffuse * attenuation * light.color;

        let halfway = (to_light.normalize() - view_dir).normalize_or_zero();
        let mut cos_spec = halfway.dot(rec.normal);
        if cos_spec < SPECULAR_CUTOFF {
            cos_spec = 0.0;
        }
        let cos_spec = cos_spec.powf(material.shininess);
        specular += cos_spec * material.specular * attenuation * light.color;
    }

    LightContributions {
        diffuse: sqrt_channels(sqrt_channels(diffuse)),
        specular,
    }
}

/// Ambient term from the light at index 0.
pub fn ambient_term(rec: &HitRecord, lights: &LightList) -> Color {
    sqrt_channels(rec.material.ambient * lights.ambient().color)
}

/// Start of the shadow ray toward `light_position`.
///
/// With `soft` the point is moved by up to 1/500 of the distance to the
/// light, a fresh offset per call.
fn shadow_origin(p: Vec3, light_position: Vec3, soft: bool, rng: &mut dyn RngCore) -> Vec3 {
    if !soft {
        return p;
    }
    let distance = (light_position - p).length();
    p + distance * SOFT_SHADOW_SPREAD * random_in_unit_sphere(rng)
}

/// True if something sits between `origin` and the light.
///
/// Occluders farther away than the light do not count.
fn in_shadow(world: &dyn Hittable, origin: Vec3, to_light: Vec3, light_distance: f32) -> bool {
    let shadow_ray = Ray::new(origin, to_light);
    match world.hit(&shadow_ray, Interval::FORWARD) {
        None => false,
        Some(hit) => (hit.p - origin).length() <= light_distance,
    }
}

/// Element-wise square root, negative channels clamped to zero.
#[inline]
fn sqrt_channels(c: Color) -> Color {
    c.max(Color::ZERO).to_array().map(f32::sqrt).into()
}
