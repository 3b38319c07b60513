pub mod bvh;
mod hit;
pub mod primitives;

pub use bvh::Bvh;
pub use hit::HitRecord;
pub(crate) use hit::Surface;

use std::sync::Arc;

use crate::geometry::{FloatType, Ray, WorldBox};
use crate::shade::{Color, PointLight, Shader, Trace};

/// A single intersectable shape.
pub trait Primitive: Send + Sync {
    /// Nearest intersection within the closed window `[t_min, t_max]`,
    /// recorded against `object`, the scene object owning this primitive.
    /// Degenerate geometry (parallel rays, negative discriminants) is a
    /// miss, never an error.
    fn hit_test(
        &self,
        ray: &Ray,
        object: &Arc<SceneObject>,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord>;

    /// World space AABB of the primitive.
    fn bounding_box(&self) -> WorldBox;
}

/// A primitive paired with the shader that colors it. This pairing is the
/// unit stored in the accelerator and handed back by hit queries.
pub struct SceneObject {
    pub primitive: Box<dyn Primitive>,
    pub shader: Arc<dyn Shader>,
}

impl SceneObject {
    pub fn new(primitive: Box<dyn Primitive>, shader: Arc<dyn Shader>) -> Arc<SceneObject> {
        Arc::new(SceneObject { primitive, shader })
    }

    pub fn hit(
        self: &Arc<Self>,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord> {
        self.primitive.hit_test(ray, self, t_min, t_max)
    }
}

/// A built accelerator plus the light sources shaders may sample.
pub struct Scene {
    pub root: Bvh,
    pub lights: Vec<PointLight>,
}

impl Scene {
    /// Traces a single ray: nearest visible surface, shaded by the owning
    /// object's shader. `None` when the ray escapes the scene.
    pub fn cast(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<Color> {
        let hit = self.root.hit(ray, t_min, t_max)?;
        let trace = Trace {
            ray,
            lights: &self.lights,
        };
        Some(hit.object().shader.shade(&hit, &trace))
    }
}
