//! Phong renderer - CPU Ray Tracing
//!
//! A recursive ray tracer with Phong-style local illumination, shadow rays,
//! reflection, refraction and thin-lens depth of field. Rows are split into
//! batches that render in parallel; the result is written as plain PPM.

mod ray;
mod sampling;
mod hittable;
mod material;
mod sphere;
mod polyhedron;
mod light;
mod shading;
mod camera;
mod renderer;
mod batch;
mod scene;
mod scene_file;

pub use ray::Ray;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Material, Lobe, ScatterResult, reflect, refract};
pub use sphere::Sphere;
pub use polyhedron::{Plane, Polyhedron};
pub use light::{Attenuation, Light, LightList};
pub use shading::{LightContributions, ambient_term, light_contributions};
pub use camera::Camera;
pub use renderer::{
    RenderConfig, RenderError, RenderResult, PixelBuffer, ray_color, render_pixel, color_to_rgb,
    MAX_DEPTH, BACKGROUND,
};
pub use batch::{Progress, RowBatch, generate_batches, render, DEFAULT_BATCH_COUNT};
pub use scene::SceneDescription;
pub use scene_file::{SceneError, SceneResult, load_scene, parse_scene};

/// Re-export pigments and math types used throughout the public API
pub use phong_core::{Color, Pigment};
pub use phong_math::{Interval, Vec3, Vec4};
