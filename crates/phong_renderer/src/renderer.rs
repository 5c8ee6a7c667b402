//! Core ray tracing integrator and image output.
//!
//! Implements recursive Whitted-style tracing with:
//! - Ambient/diffuse/specular local illumination with shadow rays
//! - Material scatter for reflection, refraction and diffuse bounces
//! - Anti-aliasing via multi-sampling
//! - Plain-text PPM output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::shading::{ambient_term, light_contributions};
use crate::{Camera, Color, Hittable, LightList, Ray};
use phong_math::Interval;
use rand::RngCore;
use thiserror::Error;

/// Maximum recursion depth of [`ray_color`].
pub const MAX_DEPTH: u32 = 14;

/// Color of rays that escape the scene.
pub const BACKGROUND: Color = Color::new(0.31, 0.31, 0.31);

/// Errors that can occur while rendering or writing the image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Jitter shadow ray origins to soften shadow edges
    pub soft_shadows: bool,
    /// Number of row batches, one worker thread each
    pub batch_count: u32,
    /// Base seed for the per-batch generators; `None` picks one at random
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            background: BACKGROUND,
            soft_shadows: true,
            batch_count: crate::batch::DEFAULT_BATCH_COUNT,
            seed: None,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Running out of depth returns white rather than black, so truncated
/// paths do not darken the image.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: &LightList,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ONE;
    }

    let Some(rec) = world.hit(ray, Interval::FORWARD) else {
        return config.background;
    };

    let light = light_contributions(ray, &rec, lights, world, config.soft_shadows, rng);
    let ambient = ambient_term(&rec, lights);
    let lit = light.diffuse + ambient;

    let scatter = rec.material.scatter(ray, &rec, rng);
    match scatter.scattered {
        Some(scattered) => {
            let incoming = ray_color(&scattered, world, lights, depth - 1, config, rng);
            scatter.attenuation * incoming * lit + light.specular
        }
        None => scatter.attenuation * lit + light.specular,
    }
}

/// Sum of `samples` jittered samples for pixel (col, row).
///
/// Row 0 is the bottom of the image. The caller divides by the sample
/// count when the image is written.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: &LightList,
    col: u32,
    row: u32,
    width: u32,
    height: u32,
    samples: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let u_scale = 1.0 / width.saturating_sub(1).max(1) as f32;
    let v_scale = 1.0 / height.saturating_sub(1).max(1) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..samples {
        let u = (col as f32 + crate::sampling::gen_f32(rng)) * u_scale;
        let v = (row as f32 + crate::sampling::gen_f32(rng)) * v_scale;

        let ray = camera.get_ray(u, v, rng);
        pixel_color += ray_color(&ray, world, lights, config.max_depth, config, rng);
    }

    pixel_color
}

/// Clamp a color to [0, 1] and convert to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let channel = |c: f32| (255.999 * Interval::UNIT.clamp(c)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Accumulated sample sums, one per pixel.
///
/// Stored row-major in a single buffer indexed `row * width + col`, with
/// row 0 at the bottom of the image.
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the accumulated value at (col, row).
    pub fn get(&self, col: u32, row: u32) -> Color {
        self.pixels[row as usize * self.width as usize + col as usize]
    }

    /// Add to the accumulated value at (col, row).
    pub fn accumulate(&mut self, col: u32, row: u32, color: Color) {
        self.pixels[row as usize * self.width as usize + col as usize] += color;
    }

    /// Averaged, clamped 8-bit RGB rows, top row first.
    pub fn to_rgb_rows(&self, samples_per_pixel: u32) -> Vec<Vec<[u8; 3]>> {
        let scale = 1.0 / samples_per_pixel.max(1) as f32;
        (0..self.height)
            .rev()
            .map(|row| {
                (0..self.width)
                    .map(|col| color_to_rgb(self.get(col, row) * scale))
                    .collect()
            })
            .collect()
    }

    /// Write the image as plain-text PPM (P3), top row first.
    pub fn write_ppm<W: Write>(&self, writer: &mut W, samples_per_pixel: u32) -> RenderResult<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for row in self.to_rgb_rows(samples_per_pixel) {
            for [r, g, b] in row {
                writeln!(writer, "{} {} {}", r, g, b)?;
            }
        }

        Ok(())
    }

    /// Write a PPM file at `path`.
    pub fn save_ppm(&self, path: &Path, samples_per_pixel: u32) -> RenderResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_ppm(&mut writer, samples_per_pixel)?;
        writer.flush()?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attenuation, HittableList, Light, Material, Sphere};
    use phong_core::Pigment;
    use phong_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn single_sphere(material: Material) -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3::ZERO, 1.0, Arc::new(material))));
        world
    }

    fn toward_sphere() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_depth_zero_is_white() {
        let world = single_sphere(Material::default());
        let lights = LightList::new(Light::ambient(Color::ONE));
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        // Pointed straight at the sphere, still white
        let color = ray_color(&toward_sphere(), &world, &lights, 0, &config, &mut rng);
        assert_eq!(color, Color::ONE);

        let empty = HittableList::new();
        let color = ray_color(&toward_sphere(), &empty, &lights, 0, &config, &mut rng);
        assert_eq!(color, Color::ONE);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = single_sphere(Material::default());
        let lights = LightList::default();
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(2);

        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let color = ray_color(&away, &world, &lights, MAX_DEPTH, &config, &mut rng);
        assert_eq!(color, BACKGROUND);
    }

    #[test]
    fn test_absorbed_ray_uses_local_terms() {
        // Emitter: attenuation * (diffuse + ambient) + specular, no recursion
        let glow = Color::new(1.0, 0.5, 0.25);
        let world = single_sphere(Material::emitter(glow));
        let lights = LightList::new(Light::ambient(Color::splat(0.25)));
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        let color = ray_color(&toward_sphere(), &world, &lights, MAX_DEPTH, &config, &mut rng);
        // ambient = sqrt(1.0 * 0.25)
        assert!((color - glow * 0.5).length() < 1e-5);
    }

    #[test]
    fn test_one_bounce_multiplies_recursive_color() {
        // Perfect mirror facing the ray: bounce goes back out to the background
        let material = Material {
            ambient: 1.0,
            diffuse: 0.0,
            reflectivity: 1.0,
            pigment: Arc::new(Pigment::solid(Color::new(1.0, 0.5, 1.0))),
            ..Default::default()
        };
        let world = single_sphere(material);
        let lights = LightList::new(Light::ambient(Color::ONE));
        let config = RenderConfig {
            background: Color::new(0.2, 0.4, 0.6),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);

        let color = ray_color(&toward_sphere(), &world, &lights, MAX_DEPTH, &config, &mut rng);
        let expected = Color::new(1.0, 0.5, 1.0) * Color::new(0.2, 0.4, 0.6);
        assert!((color - expected).length() < 1e-5);

        // With one level left the bounce hits the depth floor: white
        let color = ray_color(&toward_sphere(), &world, &lights, 1, &config, &mut rng);
        assert!((color - Color::new(1.0, 0.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_specular_is_added_after_attenuation() {
        let material = Material {
            ambient: 0.0,
            diffuse: 0.0,
            specular: 0.5,
            shininess: 1.0,
            pigment: Arc::new(Pigment::solid(Color::ZERO)),
            emissive: true,
            ..Default::default()
        };
        let world = single_sphere(material);
        let mut lights = LightList::new(Light::ambient(Color::ONE));
        lights.add(Light::new(Vec3::new(0.0, 0.0, 10.0), Color::ONE, Attenuation::NONE));
        let config = RenderConfig {
            soft_shadows: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        // Black pigment: only the specular highlight survives
        let color = ray_color(&toward_sphere(), &world, &lights, MAX_DEPTH, &config, &mut rng);
        assert!((color - Color::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0)), [0, 127, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 2.0, 0.31)), [0, 255, 79]);
    }

    #[test]
    fn test_write_ppm_flips_rows_and_averages() {
        let mut buffer = PixelBuffer::new(2, 2);
        // Bottom-left red (2 samples), top-right blue
        buffer.accumulate(0, 0, Color::new(2.0, 0.0, 0.0));
        buffer.accumulate(1, 1, Color::new(0.0, 0.0, 1.0));

        let mut out = Vec::new();
        buffer.write_ppm(&mut out, 2).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "P3");
        assert_eq!(lines[1], "2 2");
        assert_eq!(lines[2], "255");
        // Top row first
        assert_eq!(lines[3], "0 0 0");
        assert_eq!(lines[4], "0 0 127");
        assert_eq!(lines[5], "255 0 0");
        assert_eq!(lines[6], "0 0 0");
        assert_eq!(lines.len(), 7);
    }
}
