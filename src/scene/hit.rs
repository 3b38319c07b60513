use std::cell::OnceCell;
use std::sync::Arc;

use nalgebra::Unit;

use super::SceneObject;
use crate::geometry::{EPSILON, FloatType, Ray, TexturePoint, WorldPoint, WorldVector};

/// Where and how a ray struck a scene object. Absence of an intersection is
/// `Option::None`; a record always describes a real hit.
///
/// Only the ray parameter is computed by the intersection test itself. The
/// world space point is evaluated on first access and cached, offset by
/// [`EPSILON`] along the surface normal so follow-up rays spawned from it do
/// not re-intersect the same surface. Records are per-query values and are
/// not meant to be shared across threads.
pub struct HitRecord {
    t: FloatType,
    ray: Ray,
    object: Arc<SceneObject>,
    surface: Surface,
    point: OnceCell<WorldPoint>,
}

/// Per-variant data needed to derive the normal and surface coordinates on
/// demand.
pub(crate) enum Surface {
    Sphere {
        center: WorldPoint,
    },
    Plane {
        anchor: WorldPoint,
        normal: Unit<WorldVector>,
    },
    Triangle {
        normal: Unit<WorldVector>,
        uv: TexturePoint,
    },
}

impl HitRecord {
    pub(crate) fn new(
        t: FloatType,
        ray: Ray,
        object: Arc<SceneObject>,
        surface: Surface,
    ) -> HitRecord {
        HitRecord {
            t,
            ray,
            object,
            surface,
            point: OnceCell::new(),
        }
    }

    /// Distance along the ray.
    pub fn t(&self) -> FloatType {
        self.t
    }

    /// The scene object that was struck.
    pub fn object(&self) -> &Arc<SceneObject> {
        &self.object
    }

    /// World space intersection point, nudged off the surface along the
    /// normal. Cached after the first call.
    pub fn point(&self) -> WorldPoint {
        *self
            .point
            .get_or_init(|| self.ray.point_at(self.t) + self.normal().into_inner() * EPSILON)
    }

    /// Unit surface normal at the intersection. Derived from the raw
    /// geometric point, so the offset applied by [`HitRecord::point`] cannot
    /// skew it.
    pub fn normal(&self) -> Unit<WorldVector> {
        match &self.surface {
            Surface::Sphere { center } => Unit::new_normalize(self.ray.point_at(self.t) - center),
            Surface::Plane { normal, .. } => *normal,
            Surface::Triangle { normal, .. } => *normal,
        }
    }

    /// 2D surface coordinates: spherical parametrization for spheres, an
    /// in-plane orthonormal basis for planes, barycentric uv for triangles.
    pub fn texture_coordinates(&self) -> TexturePoint {
        match &self.surface {
            Surface::Sphere { center } => {
                let radial = (self.ray.point_at(self.t) - center).normalize();
                let u = 0.5 + radial.z.atan2(radial.x) / std::f32::consts::TAU;
                let v = radial.y.clamp(-1.0, 1.0).acos() / std::f32::consts::PI;
                TexturePoint::new(u, v)
            }
            Surface::Plane { anchor, normal } => {
                let (tangent, bitangent) = plane_basis(normal);
                let offset = self.ray.point_at(self.t) - anchor;
                TexturePoint::new(offset.dot(&tangent), offset.dot(&bitangent))
            }
            Surface::Triangle { uv, .. } => *uv,
        }
    }
}

/// Orthonormal in-plane basis for a plane normal. Deterministic for a given
/// normal, so plane uv coordinates are stable across queries.
fn plane_basis(normal: &Unit<WorldVector>) -> (WorldVector, WorldVector) {
    let helper = if normal.x.abs() > 0.9 {
        WorldVector::y()
    } else {
        WorldVector::x()
    };
    let tangent = normal.cross(&helper).normalize();
    let bitangent = normal.cross(&tangent);
    (tangent, bitangent)
}
