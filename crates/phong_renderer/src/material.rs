//! Materials: lighting coefficients, a pigment, and the scatter protocol.

use std::sync::Arc;

use phong_core::{Color, Pigment};
use phong_math::Vec3;
use rand::RngCore;

use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::{hittable::HitRecord, Ray};

/// Surface description shared by every object that uses it.
///
/// The first four coefficients drive the local illumination model, the
/// rest decide how rays continue past the surface.
#[derive(Clone, Debug)]
pub struct Material {
    /// Ambient coefficient (ka)
    pub ambient: f32,
    /// Diffuse coefficient (kd)
    pub diffuse: f32,
    /// Specular coefficient (ks)
    pub specular: f32,
    /// Specular exponent (shininess)
    pub shininess: f32,
    /// Probability of a mirror bounce (kr)
    pub reflectivity: f32,
    /// Probability of a refractive bounce (kt)
    pub transmissivity: f32,
    /// Index of refraction
    pub ior: f32,
    /// Perturbation of mirror bounces, 0 = perfect mirror
    pub fuzz: f32,
    /// Base surface color
    pub pigment: Arc<Pigment>,
    /// Emitters never scatter
    pub emissive: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            shininess: 1.0,
            reflectivity: 0.0,
            transmissivity: 0.0,
            ior: 1.0,
            fuzz: 0.0,
            pigment: Arc::new(Pigment::default()),
            emissive: false,
        }
    }
}

impl Material {
    /// Build a material from its coefficients with a white pigment.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ambient: f32,
        diffuse: f32,
        specular: f32,
        shininess: f32,
        reflectivity: f32,
        transmissivity: f32,
        ior: f32,
        fuzz: f32,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            reflectivity,
            transmissivity,
            ior,
            fuzz: fuzz.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// A glowing surface lit only by the ambient term.
    pub fn emitter(color: Color) -> Self {
        Self {
            ambient: 1.0,
            diffuse: 0.0,
            pigment: Arc::new(Pigment::solid(color)),
            emissive: true,
            ..Default::default()
        }
    }

    /// Copy of this material with a different pigment.
    pub fn with_pigment(&self, pigment: Arc<Pigment>) -> Self {
        Self {
            pigment,
            ..self.clone()
        }
    }

    /// Decide how a ray continues after hitting this material.
    ///
    /// The attenuation is always the pigment color at the hit point, also
    /// when the ray is absorbed.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let attenuation = self.pigment.color_at(rec.p);

        let scattered = if self.emissive {
            None
        } else {
            self.choose_lobe(rng).scatter(ray_in, rec, rng)
        };

        ScatterResult {
            attenuation,
            scattered,
        }
    }

    /// Pick refraction, reflection or diffuse with probabilities kt, kr and the rest.
    fn choose_lobe(&self, rng: &mut dyn RngCore) -> Lobe {
        if self.transmissivity <= 0.0 && self.reflectivity <= 0.0 {
            return Lobe::Lambertian;
        }

        let r = gen_f32(rng);
        if r < self.transmissivity {
            Lobe::Dielectric { ior: self.ior }
        } else if r < self.transmissivity + self.reflectivity {
            Lobe::Metal { fuzz: self.fuzz }
        } else {
            Lobe::Lambertian
        }
    }
}

/// Outcome of a scatter query.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color multiplier for whatever the continuation ray sees
    pub attenuation: Color,
    /// Continuation ray, or `None` when the path ends here
    pub scattered: Option<Ray>,
}

/// How a single bounce leaves the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lobe {
    /// Cosine-weighted bounce about the normal.
    Lambertian,
    /// Mirror reflection perturbed by `fuzz`.
    Metal { fuzz: f32 },
    /// Refraction with Schlick-weighted reflection.
    Dielectric { ior: f32 },
}

impl Lobe {
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray> {
        match *self {
            Lobe::Lambertian => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if scatter_direction.length_squared() < 1e-8 {
                    scatter_direction = rec.normal;
                }

                Some(Ray::new(rec.p, scatter_direction))
            }
            Lobe::Metal { fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let direction = reflected + fuzz * random_in_unit_sphere(rng);

                // Only scatter if the reflected ray leaves the surface
                (direction.dot(rec.normal) > 0.0).then(|| Ray::new(rec.p, direction))
            }
            Lobe::Dielectric { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { ior };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Check for total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction =
                    if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                        reflect(unit_direction, rec.normal)
                    } else {
                        refract(unit_direction, rec.normal, refraction_ratio)
                    };

                Some(Ray::new(rec.p, direction))
            }
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface (Snell's law).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
