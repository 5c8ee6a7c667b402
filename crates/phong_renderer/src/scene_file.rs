//! Plain-text scene file loader.
//!
//! The format is line oriented with whitespace separated fields. Sections
//! appear in a fixed order:
//!
//! ```text
//! 13 2 3                      look from
//! 0 0 0                       look at
//! 0 1 0                       up
//! 50                          vertical fov (degrees)
//! 2                           light count, first light is ambient
//! 0 0 0 0.2 0.2 0.2 1 0 0     x y z r g b constant linear quadratic
//! 5 5 5 1 1 1 1 0 0
//! 1                           pigment count
//! solid 1 0 0                 solid | checker | texmap
//! 1                           material count
//! 0.2 0.6 0.3 20 0 0 1        ka kd ks shininess kr kt ior [fuzz]
//! 1                           object count
//! 0 0 sphere 0 0 0 1          pigment material sphere x y z r
//! 0.1 10                      optional: aperture focus distance
//! ```
//!
//! A checker pigment is `checker r g b r g b size`. An image pigment is
//! `texmap <path>` followed by two lines of four numbers (the S and T
//! projection rows). A polyhedron is `polyhedron <n>` followed by `n` plane
//! lines `a b c d`. Blank lines are skipped.

use std::collections::VecDeque;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use phong_core::{Pigment, TextureCache, TextureError};
use phong_math::{Vec3, Vec4};
use thiserror::Error;

use crate::{
    Attenuation, Camera, Light, LightList, Material, Plane, Polyhedron, SceneDescription, Sphere,
};

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid number at line {line}: {value:?}")]
    InvalidNumber { line: usize, value: String },

    #[error("Unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("Line {line}: expected {expected} fields, found {found}")]
    MissingField {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: unknown pigment type {kind:?}")]
    UnknownPigment { line: usize, kind: String },

    #[error("Line {line}: unknown object type {kind:?}")]
    UnknownObject { line: usize, kind: String },

    #[error("Line {line}: {what} index {index} out of range (have {len})")]
    IndexOutOfRange {
        line: usize,
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Load a scene file from disk.
///
/// A file that cannot be opened is reported and replaced by the default
/// scene. Texture paths are resolved relative to the scene file.
pub fn load_scene(path: &Path) -> SceneResult<SceneDescription> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::error!("Could not open scene file {}: {}", path.display(), e);
            return Ok(SceneDescription::default());
        }
    };

    let mut textures = match path.parent() {
        Some(dir) => TextureCache::with_base_dir(dir),
        None => TextureCache::new(),
    };

    log::info!("Loading scene {}", path.display());
    parse_scene(&content, &mut textures)
}

/// Parse scene file contents.
pub fn parse_scene(content: &str, textures: &mut TextureCache) -> SceneResult<SceneDescription> {
    SceneParser::new(content).parse(textures)
}

/// One non-blank line, split into fields.
struct Line {
    number: usize,
    fields: Vec<String>,
}

impl Line {
    fn expect_fields(&self, expected: usize) -> SceneResult<()> {
        if self.fields.len() < expected {
            return Err(SceneError::MissingField {
                line: self.number,
                expected,
                found: self.fields.len(),
            });
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, index: usize) -> SceneResult<T> {
        self.expect_fields(index + 1)?;
        let value = &self.fields[index];
        value.parse().map_err(|_| SceneError::InvalidNumber {
            line: self.number,
            value: value.clone(),
        })
    }

    fn vec3(&self, start: usize) -> SceneResult<Vec3> {
        Ok(Vec3::new(
            self.parse(start)?,
            self.parse(start + 1)?,
            self.parse(start + 2)?,
        ))
    }

    fn vec4(&self, start: usize) -> SceneResult<Vec4> {
        Ok(Vec4::new(
            self.parse(start)?,
            self.parse(start + 1)?,
            self.parse(start + 2)?,
            self.parse(start + 3)?,
        ))
    }
}

struct SceneParser {
    lines: VecDeque<Line>,
}

impl SceneParser {
    fn new(content: &str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .filter(|(_, s)| !s.trim().is_empty())
            .map(|(i, s)| Line {
                number: i + 1,
                fields: s.split_whitespace().map(str::to_string).collect(),
            })
            .collect();

        Self { lines }
    }

    fn next_line(&mut self, section: &'static str) -> SceneResult<Line> {
        self.lines
            .pop_front()
            .ok_or(SceneError::UnexpectedEof(section))
    }

    fn count(&mut self, section: &'static str) -> SceneResult<usize> {
        self.next_line(section)?.parse(0)
    }

    fn parse(mut self, textures: &mut TextureCache) -> SceneResult<SceneDescription> {
        let mut scene = SceneDescription::default();

        let look_from = self.next_line("camera position")?.vec3(0)?;
        let look_at = self.next_line("camera target")?.vec3(0)?;
        let vup = self.next_line("camera up vector")?.vec3(0)?;
        let vfov: f32 = self.next_line("field of view")?.parse(0)?;

        scene.lights = self.parse_lights()?;
        scene.pigments = self.parse_pigments(textures)?;
        scene.materials = self.parse_materials()?;
        self.parse_objects(&mut scene)?;

        let (aperture, focus_dist) = self.parse_focus()?;
        scene.camera = Camera::new()
            .with_position(look_from, look_at, vup)
            .with_lens(vfov, aperture, focus_dist);

        log::info!(
            "Scene: {} lights, {} pigments, {} materials, {} objects",
            scene.lights.len(),
            scene.pigments.len(),
            scene.materials.len(),
            scene.object_count()
        );

        Ok(scene)
    }

    fn parse_lights(&mut self) -> SceneResult<LightList> {
        let count = self.count("light count")?;
        if count == 0 {
            log::warn!("Scene has no lights, using a black ambient light");
            return Ok(LightList::default());
        }

        let mut lights = LightList::default();
        for i in 0..count {
            let line = self.next_line("light")?;
            line.expect_fields(9)?;
            let light = Light::new(
                line.vec3(0)?,
                line.vec3(3)?,
                Attenuation::new(line.parse(6)?, line.parse(7)?, line.parse(8)?),
            );

            if i == 0 {
                lights = LightList::new(light);
            } else {
                lights.add(light);
            }
        }
        Ok(lights)
    }

    fn parse_pigments(&mut self, textures: &mut TextureCache) -> SceneResult<Vec<Arc<Pigment>>> {
        let count = self.count("pigment count")?;
        let mut pigments = Vec::with_capacity(count);

        for _ in 0..count {
            let line = self.next_line("pigment")?;
            line.expect_fields(1)?;

            let pigment = match line.fields[0].as_str() {
                "solid" => Pigment::solid(line.vec3(1)?),
                "checker" => Pigment::checker(line.vec3(1)?, line.vec3(4)?, line.parse(7)?),
                "texmap" | "textmap" => {
                    line.expect_fields(2)?;
                    let s = self.next_line("texture S row")?.vec4(0)?;
                    let t = self.next_line("texture T row")?.vec4(0)?;
                    let texture = textures.load(&line.fields[1])?;
                    Pigment::image(texture, s, t)
                }
                other => {
                    return Err(SceneError::UnknownPigment {
                        line: line.number,
                        kind: other.to_string(),
                    })
                }
            };

            pigments.push(Arc::new(pigment));
        }

        Ok(pigments)
    }

    fn parse_materials(&mut self) -> SceneResult<Vec<Arc<Material>>> {
        let count = self.count("material count")?;
        let mut materials = Vec::with_capacity(count);

        for _ in 0..count {
            let line = self.next_line("material")?;
            line.expect_fields(7)?;
            let fuzz = if line.fields.len() > 7 {
                line.parse(7)?
            } else {
                0.0
            };

            materials.push(Arc::new(Material::new(
                line.parse(0)?,
                line.parse(1)?,
                line.parse(2)?,
                line.parse(3)?,
                line.parse(4)?,
                line.parse(5)?,
                line.parse(6)?,
                fuzz,
            )));
        }

        Ok(materials)
    }

    fn parse_objects(&mut self, scene: &mut SceneDescription) -> SceneResult<()> {
        let count = self.count("object count")?;

        for _ in 0..count {
            let line = self.next_line("object")?;
            line.expect_fields(3)?;

            let pigment = lookup(&scene.pigments, line.parse(0)?, "pigment", line.number)?;
            let material = lookup(&scene.materials, line.parse(1)?, "material", line.number)?;
            let material = Arc::new(material.with_pigment(pigment.clone()));

            match line.fields[2].as_str() {
                "sphere" => {
                    let center = line.vec3(3)?;
                    let radius: f32 = line.parse(6)?;
                    scene.world.add(Box::new(Sphere::new(center, radius, material)));
                }
                "polyhedron" => {
                    let faces: usize = line.parse(3)?;
                    let mut polyhedron = Polyhedron::new(Vec::with_capacity(faces), material);
                    for _ in 0..faces {
                        let plane = self.next_line("polyhedron face")?.vec4(0)?;
                        polyhedron.add_face(Plane::new(plane.x, plane.y, plane.z, plane.w));
                    }
                    scene.world.add(Box::new(polyhedron));
                }
                other => {
                    return Err(SceneError::UnknownObject {
                        line: line.number,
                        kind: other.to_string(),
                    })
                }
            }
        }

        Ok(())
    }

    /// Optional `aperture focus` line; anything after it is ignored.
    fn parse_focus(&mut self) -> SceneResult<(f32, f32)> {
        let defaults = SceneDescription::default().camera;
        let focus = match self.lines.pop_front() {
            Some(line) if line.fields.len() >= 2 => (line.parse(0)?, line.parse(1)?),
            _ => (defaults.aperture(), defaults.focus_dist()),
        };

        if !self.lines.is_empty() {
            log::debug!("Ignoring {} trailing lines", self.lines.len());
        }
        Ok(focus)
    }
}

fn lookup<'a, T>(
    items: &'a [Arc<T>],
    index: usize,
    what: &'static str,
    line: usize,
) -> SceneResult<&'a Arc<T>> {
    items.get(index).ok_or(SceneError::IndexOutOfRange {
        line,
        what,
        index,
        len: items.len(),
    })
}
