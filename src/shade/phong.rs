use std::sync::Arc;

use super::{Color, Shader, ShaderError, Trace, ensure_coefficient, ensure_finite_color};
use crate::geometry::{FloatType, WorldVector};
use crate::scene::HitRecord;

/// Phong reflectance on top of an inner surface shader: ambient, diffuse and
/// specular terms summed over the trace's light sources.
pub struct Phong {
    inner: Arc<dyn Shader>,
    ambient: Color,
    diffuse: FloatType,
    specular: FloatType,
    shininess: FloatType,
}

impl Phong {
    pub fn new(
        inner: Arc<dyn Shader>,
        ambient: Color,
        diffuse: FloatType,
        specular: FloatType,
        shininess: FloatType,
    ) -> Result<Phong, ShaderError> {
        ensure_finite_color(&ambient)?;
        ensure_coefficient("diffuse", diffuse)?;
        ensure_coefficient("specular", specular)?;
        ensure_coefficient("shininess", shininess)?;
        Ok(Phong {
            inner,
            ambient,
            diffuse,
            specular,
            shininess,
        })
    }
}

impl Shader for Phong {
    fn shade(&self, hit: &HitRecord, trace: &Trace) -> Color {
        let surface = self.inner.shade(hit, trace);
        let ambient = self.ambient.component_mul(&surface);

        let normal = hit.normal();
        let view = -trace.ray.direction;
        let point = hit.point();

        let mut diffuse = Color::zeros();
        let mut specular = Color::zeros();
        for light in trace.lights {
            let to_light = (light.position - point).normalize();

            let lambert = normal.dot(&to_light).max(0.0);
            diffuse += light.color.component_mul(&surface) * lambert;

            let reflection = reflect(&to_light, &normal);
            let highlight = reflection.dot(&view).max(0.0).powf(self.shininess);
            specular += light.color * highlight;
        }

        ambient + diffuse * self.diffuse + specular * self.specular
    }
}

/// Mirror of `v` about the unit normal `n`.
fn reflect(v: &WorldVector, n: &WorldVector) -> WorldVector {
    n * (2.0 * v.dot(n)) - v
}
