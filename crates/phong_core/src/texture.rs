//! Texture loading and caching for image-mapped pigments.
//!
//! Images are decoded once with the `image` crate and kept as float RGB.
//! Values are stored as raw `byte / 255` without any colorspace conversion,
//! since the renderer writes its output without gamma correction either.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use phong_math::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// RGB pixels (0-1 range), row-major, first row at the top
    pub pixels: Vec<Vec3>,

    /// Source file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Vec3>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Sample the texture at UV coordinates (bilinear filtering).
    ///
    /// Coordinates wrap into [0, 1), with (0, 0) at bottom-left.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        // Convert to pixel coordinates
        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0); // Flip V for image coordinates

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);

        top.lerp(bottom, fy)
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        self.pixels.get(idx).copied().unwrap_or(Vec3::ZERO)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Vec3>()
    }
}

/// Cache for loaded textures.
///
/// Scene files may reference the same image from several pigments; each
/// path is decoded once.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);

        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let display = path.display().to_string();
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: display.clone(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty(display));
    }

    let pixels: Vec<Vec3> = rgb
        .pixels()
        .map(|p| {
            Vec3::new(
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
            )
        })
        .collect();

    Ok(Texture::new(width, height, pixels, display))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_corners_and_flip() {
        // 2x2: top row red/green, bottom row blue/white
        let red = Vec3::new(1.0, 0.0, 0.0);
        let green = Vec3::new(0.0, 1.0, 0.0);
        let blue = Vec3::new(0.0, 0.0, 1.0);
        let tex = Texture::new(2, 2, vec![red, green, blue, Vec3::ONE], "test");

        // v = 0 is the bottom row
        assert!((tex.sample(0.0, 0.0) - blue).length() < 1e-5);
        // Wrapping keeps v just below 1 near the top row
        assert!((tex.sample(0.0, 0.9999) - red).length() < 1e-3);
        // Midpoint blends all four
        let mid = tex.sample(0.5, 0.5);
        assert!((mid - Vec3::new(0.5, 0.5, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_texture_cache_loads_once() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = std::env::temp_dir().join("phong_texture_cache_test");
        std::fs::create_dir_all(&dir).unwrap();
        let img = image::RgbImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        img.save(dir.join("stripes.png")).unwrap();

        let mut cache = TextureCache::with_base_dir(&dir);
        assert!(cache.is_empty());

        let first = cache.load("stripes.png").unwrap();
        let second = cache.load("stripes.png").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        assert_eq!(first.width, 4);
        assert_eq!(first.height, 2);
        assert!((first.pixels[0] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((first.pixels[3] - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_missing_texture_is_an_error() {
        let mut cache = TextureCache::new();
        let err = cache.load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
        assert!(cache.is_empty());
    }
}
