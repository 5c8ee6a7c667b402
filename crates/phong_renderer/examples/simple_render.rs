//! Simple ray tracer example.
//!
//! Builds a scene in code (ground, three feature spheres, a glass
//! polyhedron and a field of small random spheres) and saves it as PPM.

use std::path::Path;
use std::sync::Arc;

use phong_renderer::{
    Attenuation, Camera, Color, Light, LightList, Material, Pigment, Plane, Polyhedron, Progress,
    RenderConfig, SceneDescription, Sphere, Vec3, render,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    println!("Phong Ray Tracer - Simple Example");
    println!("=================================");

    let start = std::time::Instant::now();
    let mut scene = build_scene();
    scene.set_resolution(800, 450);
    scene.samples_per_pixel = 20;
    println!("Scene built in {:?} ({} objects)", start.elapsed(), scene.object_count());

    let config = RenderConfig {
        seed: Some(7),
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        scene.width, scene.height, scene.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&scene, &config, &Progress::new()).expect("Render failed");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    image
        .save_ppm(Path::new(filename), scene.samples_per_pixel)
        .expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> SceneDescription {
    let mut scene = SceneDescription::default();
    scene.camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0);

    let mut lights = LightList::new(Light::ambient(Color::splat(0.3)));
    lights.add(Light::new(
        Vec3::new(10.0, 12.0, 6.0),
        Color::ONE,
        Attenuation::new(1.0, 0.005, 0.0),
    ));
    scene.lights = lights;

    let matte = Material::new(0.3, 0.8, 0.1, 10.0, 0.0, 0.0, 1.0, 0.0);
    let mirror = Material::new(0.1, 0.3, 0.9, 200.0, 0.9, 0.0, 1.0, 0.02);
    let glass = Material::new(0.1, 0.2, 0.9, 300.0, 0.05, 0.9, 1.5, 0.0);

    let ground = Pigment::checker(Color::splat(0.9), Color::new(0.2, 0.3, 0.1), 1.0);
    add_sphere(&mut scene, Vec3::new(0.0, -1000.0, 0.0), 1000.0, &matte, ground);

    add_sphere(&mut scene, Vec3::new(0.0, 1.0, 0.0), 1.0, &glass, Pigment::solid(Color::ONE));
    add_sphere(
        &mut scene,
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        &matte,
        Pigment::solid(Color::new(0.4, 0.2, 0.1)),
    );
    add_sphere(
        &mut scene,
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        &mirror,
        Pigment::solid(Color::new(0.7, 0.6, 0.5)),
    );

    // Glass cube resting on the ground behind the spheres
    let faces = vec![
        Plane::new(1.0, 0.0, 0.0, -1.5),
        Plane::new(-1.0, 0.0, 0.0, 0.5),
        Plane::new(0.0, 1.0, 0.0, -1.0),
        Plane::new(0.0, -1.0, 0.0, 0.0),
        Plane::new(0.0, 0.0, 1.0, 1.5),
        Plane::new(0.0, 0.0, -1.0, -2.5),
    ];
    let tinted = glass.with_pigment(Arc::new(Pigment::solid(Color::new(0.8, 0.9, 1.0))));
    scene
        .world
        .add(Box::new(Polyhedron::new(faces, Arc::new(tinted))));

    // Small random spheres
    let mut rng = StdRng::seed_from_u64(2024);

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());

            if choose_mat < 0.8 {
                add_sphere(&mut scene, center, 0.2, &matte, Pigment::solid(albedo * albedo));
            } else if choose_mat < 0.95 {
                add_sphere(&mut scene, center, 0.2, &mirror, Pigment::solid(Color::splat(0.5) + 0.5 * albedo));
            } else {
                add_sphere(&mut scene, center, 0.2, &glass, Pigment::solid(Color::ONE));
            }
        }
    }

    scene
}

fn add_sphere(
    scene: &mut SceneDescription,
    center: Vec3,
    radius: f32,
    material: &Material,
    pigment: Pigment,
) {
    let material = Arc::new(material.with_pigment(Arc::new(pigment)));
    scene
        .world
        .add(Box::new(Sphere::new(center, radius, material)));
}
