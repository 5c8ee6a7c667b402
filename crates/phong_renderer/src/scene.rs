//! Scene description: everything a render needs, built once and then read-only.

use std::sync::Arc;

use phong_core::Pigment;

use crate::{Camera, HittableList, LightList, Material};

/// A complete scene plus its render parameters.
pub struct SceneDescription {
    /// Camera settings; the render initializes its own copy
    pub camera: Camera,

    /// Lights, ambient light first
    pub lights: LightList,

    /// Pigments in declaration order
    pub pigments: Vec<Arc<Pigment>>,

    /// Materials in declaration order (with their default pigment)
    pub materials: Vec<Arc<Material>>,

    /// Scene geometry
    pub world: HittableList,

    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Width over height, fed to the camera
    pub aspect_ratio: f32,

    /// Samples per pixel
    pub samples_per_pixel: u32,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            camera: Camera::new(),
            lights: LightList::default(),
            pigments: Vec::new(),
            materials: Vec::new(),
            world: HittableList::new(),
            width: 800,
            height: 600,
            aspect_ratio: 4.0 / 3.0,
            samples_per_pixel: 15,
        }
    }
}

impl SceneDescription {
    /// Set the output size and recompute the aspect ratio.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.aspect_ratio = width as f32 / height.max(1) as f32;
    }

    /// An initialized copy of the camera matching the scene's aspect ratio.
    pub fn camera_for_render(&self) -> Camera {
        let mut camera = self.camera.clone().with_aspect_ratio(self.aspect_ratio);
        camera.initialize();
        camera
    }

    /// Number of objects in the scene.
    pub fn object_count(&self) -> usize {
        self.world.len()
    }
}
