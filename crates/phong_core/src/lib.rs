//! Phong Core - surface color sources for the Phong ray tracer.
//!
//! This crate provides:
//!
//! - **Pigments**: `Pigment` maps a world-space point to a base color
//!   (solid, checkerboard, image-mapped)
//! - **Textures**: `Texture` and `TextureCache` load images for
//!   image-mapped pigments
//!
//! # Example
//!
//! ```ignore
//! use phong_core::{Pigment, TextureCache};
//!
//! let mut cache = TextureCache::with_base_dir("scenes");
//! let texture = cache.load("marble.png")?;
//! let pigment = Pigment::image(texture, Vec4::X, Vec4::Y);
//! ```

pub mod pigment;
pub mod texture;

// Re-export commonly used types
pub use pigment::{Color, Pigment};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
