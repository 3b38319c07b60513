use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::geometry::{FloatType, WorldPoint, WorldVector};
use crate::scene::primitives::{GeometryError, Triangle};
use crate::scene::{Bvh, SceneObject};
use crate::shade::Shader;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse file: {0}")]
    Parse(#[from] wavefront_obj::ParseError),

    #[error("scale must be finite, got {0}")]
    InvalidScale(FloatType),

    #[error("translation must be finite")]
    InvalidTranslation,

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Loads triangle meshes from OBJ `source` into `bvh`, every face shaded by
/// `shader`. Vertices are scaled about the model origin and then translated.
/// Non-triangle faces are skipped with a warning. Returns the number of
/// triangles added.
pub fn load_obj(
    source: &str,
    bvh: &mut Bvh,
    shader: &Arc<dyn Shader>,
    scale: FloatType,
    translation: WorldVector,
) -> Result<usize, LoaderError> {
    if !scale.is_finite() {
        return Err(LoaderError::InvalidScale(scale));
    }
    if !translation.iter().all(|c| c.is_finite()) {
        return Err(LoaderError::InvalidTranslation);
    }

    let parsed = wavefront_obj::obj::parse(source.to_owned())?;

    let mut count = 0;
    for object in parsed.objects {
        let vertices = &object.vertices;
        let position = |index: usize| -> WorldPoint {
            let v = &vertices[index];
            WorldPoint::new(v.x as FloatType, v.y as FloatType, v.z as FloatType) * scale
                + translation
        };

        for geometry in &object.geometry {
            for shape in &geometry.shapes {
                let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                    log::warn!("skipping non-triangle primitive in object {:?}", object.name);
                    continue;
                };

                let triangle = Triangle::new(position(a.0), position(b.0), position(c.0))?;
                bvh.add(SceneObject::new(Box::new(triangle), shader.clone()));
                count += 1;
            }
        }
    }

    Ok(count)
}

/// [`load_obj`] on the contents of a file.
pub fn load_obj_file(
    path: impl AsRef<Path>,
    bvh: &mut Bvh,
    shader: &Arc<dyn Shader>,
    scale: FloatType,
    translation: WorldVector,
) -> Result<usize, LoaderError> {
    let content = fs::read_to_string(path)?;
    load_obj(&content, bvh, shader, scale, translation)
}
