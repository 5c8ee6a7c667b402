//! Pigments: surface color as a function of position, independent of lighting.

use std::sync::Arc;

use phong_math::{Vec3, Vec4};

use crate::texture::Texture;

/// RGB color, nominally in the 0-1 range.
pub type Color = Vec3;

/// Base color of a surface.
#[derive(Clone, Debug)]
pub enum Pigment {
    /// A single color everywhere.
    Solid(Color),

    /// Alternating cubes of two colors.
    Checker { even: Color, odd: Color, size: f32 },

    /// An image projected through two linear maps.
    ///
    /// The texture coordinates of a point `p` are `s = S·(p, 1)` and
    /// `t = T·(p, 1)`.
    Image {
        texture: Arc<Texture>,
        s: Vec4,
        t: Vec4,
    },
}

impl Pigment {
    pub fn solid(color: Color) -> Self {
        Pigment::Solid(color)
    }

    /// Create a checkerboard. Non-positive cell sizes fall back to 1.
    pub fn checker(even: Color, odd: Color, size: f32) -> Self {
        let size = if size > 0.0 { size } else { 1.0 };
        Pigment::Checker { even, odd, size }
    }

    pub fn image(texture: Arc<Texture>, s: Vec4, t: Vec4) -> Self {
        Pigment::Image { texture, s, t }
    }

    /// Color of the surface at world-space point `p`.
    pub fn color_at(&self, p: Vec3) -> Color {
        match self {
            Pigment::Solid(color) => *color,
            Pigment::Checker { even, odd, size } => {
                let cell = (p / *size).floor();
                let parity = (cell.x + cell.y + cell.z) as i64;
                if parity.rem_euclid(2) == 0 {
                    *even
                } else {
                    *odd
                }
            }
            Pigment::Image { texture, s, t } => {
                let h = p.extend(1.0);
                texture.sample(s.dot(h), t.dot(h))
            }
        }
    }
}

impl Default for Pigment {
    fn default() -> Self {
        Pigment::Solid(Color::ONE)
    }
}
