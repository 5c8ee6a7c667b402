//! Light sources.

use phong_core::Color;
use phong_math::Vec3;

/// Distance falloff coefficients: `1 / (constant + linear*d + quadratic*d²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const NONE: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Falloff factor at distance `d`.
    #[inline]
    pub fn factor(&self, d: f32) -> f32 {
        1.0 / (self.constant + self.linear * d + self.quadratic * d * d)
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::NONE
    }
}

/// A point light. Used as the ambient light only its color matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub attenuation: Attenuation,
}

impl Light {
    pub fn new(position: Vec3, color: Color, attenuation: Attenuation) -> Self {
        Self {
            position,
            color,
            attenuation,
        }
    }

    /// An ambient light: color only.
    pub fn ambient(color: Color) -> Self {
        Self::new(Vec3::ZERO, color, Attenuation::NONE)
    }
}

/// The scene's lights. Index 0 is always the ambient light.
#[derive(Debug, Clone)]
pub struct LightList {
    lights: Vec<Light>,
}

impl LightList {
    /// Start a list with its ambient light.
    pub fn new(ambient: Light) -> Self {
        Self {
            lights: vec![ambient],
        }
    }

    /// Append a point light (index ≥ 1).
    pub fn add(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// The ambient light at index 0.
    pub fn ambient(&self) -> &Light {
        &self.lights[0]
    }

    /// Every light after the ambient one.
    pub fn point_lights(&self) -> &[Light] {
        &self.lights[1..]
    }

    /// Total count, ambient included.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Always false: the ambient light is never removed.
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }
}

impl Default for LightList {
    fn default() -> Self {
        Self::new(Light::ambient(Color::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuation_factor() {
        let att = Attenuation::new(1.0, 0.5, 0.25);
        // 1 / (1 + 0.5*2 + 0.25*4)
        assert!((att.factor(2.0) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(Attenuation::NONE.factor(100.0), 1.0);
    }

    #[test]
    fn test_ambient_stays_at_index_zero() {
        let mut lights = LightList::new(Light::ambient(Color::ONE));
        assert!(lights.point_lights().is_empty());

        lights.add(Light::new(Vec3::Y, Color::new(1.0, 0.0, 0.0), Attenuation::NONE));
        lights.add(Light::new(Vec3::X, Color::new(0.0, 1.0, 0.0), Attenuation::NONE));

        assert_eq!(lights.len(), 3);
        assert!(!lights.is_empty());
        assert_eq!(lights.ambient().color, Color::ONE);
        assert_eq!(lights.point_lights()[0].position, Vec3::Y);
        assert_eq!(lights.iter().count(), 3);
    }

    #[test]
    fn test_default_has_black_ambient() {
        let lights = LightList::default();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights.ambient().color, Color::ZERO);
    }
}
