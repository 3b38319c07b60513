use std::sync::Arc;

use nalgebra::Unit;
use thiserror::Error;

use super::{HitRecord, Primitive, SceneObject, Surface};
use crate::geometry::{
    EPSILON, FloatType, Ray, TexturePoint, WorldBox, WorldPoint, WorldVector,
    ray_triangle_intersection,
};

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("coordinates must be finite")]
    NotFinite,

    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(FloatType),

    #[error("plane normal must have nonzero length")]
    ZeroNormal,

    #[error("plane points are collinear")]
    CollinearPoints,

    #[error("triangle is degenerate")]
    DegenerateTriangle,
}

fn ensure_finite_points<'a>(
    points: impl IntoIterator<Item = &'a WorldPoint>,
) -> Result<(), GeometryError> {
    for p in points {
        if !p.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NotFinite);
        }
    }
    Ok(())
}

pub struct Sphere {
    center: WorldPoint,
    radius: FloatType,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType) -> Result<Sphere, GeometryError> {
        ensure_finite_points([&center])?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Sphere { center, radius })
    }
}

impl Primitive for Sphere {
    fn hit_test(
        &self,
        ray: &Ray,
        object: &Arc<SceneObject>,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord> {
        let oc = ray.origin - self.center;
        let b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = b * b - c;

        if discriminant < 0.0 {
            return None;
        }

        // Near intersection only, no interior or far hits.
        let t = -b - discriminant.sqrt();
        if t < t_min || t > t_max {
            return None;
        }

        Some(HitRecord::new(
            t,
            *ray,
            object.clone(),
            Surface::Sphere {
                center: self.center,
            },
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox::new(self.center - r_vec, self.center + r_vec)
    }
}

/// Infinite plane, described by an anchor point and a unit normal.
pub struct Plane {
    anchor: WorldPoint,
    normal: Unit<WorldVector>,
}

impl Plane {
    pub fn new(anchor: WorldPoint, normal: WorldVector) -> Result<Plane, GeometryError> {
        ensure_finite_points([&anchor])?;
        if !normal.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NotFinite);
        }
        let normal = Unit::try_new(normal, EPSILON).ok_or(GeometryError::ZeroNormal)?;
        Ok(Plane { anchor, normal })
    }

    /// Plane through three non-collinear points, normal oriented by their
    /// winding.
    pub fn from_points(
        a: WorldPoint,
        b: WorldPoint,
        c: WorldPoint,
    ) -> Result<Plane, GeometryError> {
        ensure_finite_points([&a, &b, &c])?;
        let normal =
            Unit::try_new((b - a).cross(&(c - a)), EPSILON).ok_or(GeometryError::CollinearPoints)?;
        Ok(Plane { anchor: a, normal })
    }
}

impl Primitive for Plane {
    fn hit_test(
        &self,
        ray: &Ray,
        object: &Arc<SceneObject>,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord> {
        let denominator = ray.direction.dot(&self.normal);
        if denominator.abs() < EPSILON {
            // Parallel ray
            return None;
        }

        let t = (self.anchor - ray.origin).dot(&self.normal) / denominator;
        if t < t_min || t > t_max {
            return None;
        }

        Some(HitRecord::new(
            t,
            *ray,
            object.clone(),
            Surface::Plane {
                anchor: self.anchor,
                normal: self.normal,
            },
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        WorldBox::infinite()
    }
}

pub struct Triangle {
    vertices: [WorldPoint; 3],
    normal: Unit<WorldVector>,
    bounding_box: WorldBox,
}

impl Triangle {
    pub fn new(a: WorldPoint, b: WorldPoint, c: WorldPoint) -> Result<Triangle, GeometryError> {
        ensure_finite_points([&a, &b, &c])?;
        let normal = Unit::try_new((b - a).cross(&(c - a)), EPSILON)
            .ok_or(GeometryError::DegenerateTriangle)?;
        let bounding_box =
            WorldBox::from_points([&a, &b, &c]).ok_or(GeometryError::DegenerateTriangle)?;
        Ok(Triangle {
            vertices: [a, b, c],
            normal,
            bounding_box,
        })
    }
}

impl Primitive for Triangle {
    fn hit_test(
        &self,
        ray: &Ray,
        object: &Arc<SceneObject>,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord> {
        let [a, b, c] = &self.vertices;
        let (t, uv) = ray_triangle_intersection(ray, a, b, c)?;
        if t < t_min || t > t_max {
            return None;
        }

        Some(HitRecord::new(
            t,
            *ray,
            object.clone(),
            Surface::Triangle {
                normal: self.normal,
                uv: TexturePoint::new(uv.u, uv.v),
            },
        ))
    }

    fn bounding_box(&self) -> WorldBox {
        self.bounding_box
    }
}

#[cfg(test)]
mod test {
    use assert2::{assert, let_assert};

    use super::*;
    use crate::shade::ConstantColor;
    use crate::{Color, SceneObject};

    fn wrap(primitive: impl Primitive + 'static) -> Arc<SceneObject> {
        let shader = Arc::new(ConstantColor::new(Color::new(1.0, 1.0, 1.0)).unwrap());
        SceneObject::new(Box::new(primitive), shader)
    }

    #[test]
    fn sphere_round_trip() {
        let object = wrap(Sphere::new(WorldPoint::origin(), 1.0).unwrap());
        let ray = Ray::new(
            WorldPoint::new(0.0, 0.0, -5.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        let_assert!(Some(hit) = object.hit(&ray, 0.0, FloatType::INFINITY));
        assert!((hit.t() - 4.0).abs() < 1e-5);
        assert!((hit.normal().into_inner() - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn sphere_narrow_miss() {
        let object = wrap(Sphere::new(WorldPoint::new(1.0, 2.0, 3.0), 1.0).unwrap());
        let ray = Ray::new(
            WorldPoint::new(2.0, 3.01, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        assert!(object.hit(&ray, 0.0, FloatType::INFINITY).is_none());
    }

    #[test]
    fn sphere_window_is_closed() {
        let object = wrap(Sphere::new(WorldPoint::origin(), 1.0).unwrap());
        let ray = Ray::new(
            WorldPoint::new(0.0, 0.0, -5.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        // t = 4.0 exactly on either window bound is still accepted.
        assert!(object.hit(&ray, 4.0, 10.0).is_some());
        assert!(object.hit(&ray, 0.0, 4.0).is_some());
        assert!(object.hit(&ray, 4.5, 10.0).is_none());
        assert!(object.hit(&ray, 0.0, 3.5).is_none());
    }

    #[test]
    fn sphere_interior_origin_misses() {
        // The near root lies behind the origin and far hits are unsupported.
        let object = wrap(Sphere::new(WorldPoint::origin(), 1.0).unwrap());
        let ray = Ray::new(WorldPoint::origin(), WorldVector::new(0.0, 0.0, 1.0));
        assert!(object.hit(&ray, 0.0, FloatType::INFINITY).is_none());
    }

    #[test]
    fn sphere_bounding_box_is_tight() {
        let sphere = Sphere::new(WorldPoint::new(1.0, 2.0, 3.0), 2.0).unwrap();
        let b = sphere.bounding_box();
        assert!(b.min == WorldPoint::new(-1.0, 0.0, 1.0));
        assert!(b.max == WorldPoint::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn sphere_rejects_bad_parameters() {
        let_assert!(
            Err(GeometryError::InvalidRadius(_)) = Sphere::new(WorldPoint::origin(), 0.0)
        );
        let_assert!(
            Err(GeometryError::InvalidRadius(_)) =
                Sphere::new(WorldPoint::origin(), FloatType::INFINITY)
        );
        let_assert!(
            Err(GeometryError::NotFinite) =
                Sphere::new(WorldPoint::new(FloatType::NAN, 0.0, 0.0), 1.0)
        );
    }

    #[test]
    fn plane_hit_and_parallel_miss() {
        let object = wrap(Plane::new(WorldPoint::origin(), WorldVector::new(0.0, 1.0, 0.0)).unwrap());

        let down = Ray::new(
            WorldPoint::new(0.5, 3.0, 0.5),
            WorldVector::new(0.0, -1.0, 0.0),
        );
        let_assert!(Some(hit) = object.hit(&down, 0.0, FloatType::INFINITY));
        assert!((hit.t() - 3.0).abs() < 1e-6);
        assert!(hit.normal().into_inner() == WorldVector::new(0.0, 1.0, 0.0));

        let parallel = Ray::new(
            WorldPoint::new(0.0, 3.0, 0.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        assert!(object.hit(&parallel, 0.0, FloatType::INFINITY).is_none());

        let away = Ray::new(
            WorldPoint::new(0.0, 3.0, 0.0),
            WorldVector::new(0.0, 1.0, 0.0),
        );
        assert!(object.hit(&away, 0.0, FloatType::INFINITY).is_none());
    }

    #[test]
    fn plane_from_points_matches_cross_product() {
        let plane = Plane::from_points(
            WorldPoint::origin(),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 0.0, -1.0),
        )
        .unwrap();
        let object = wrap(plane);

        let down = Ray::new(
            WorldPoint::new(0.2, 5.0, 0.3),
            WorldVector::new(0.0, -1.0, 0.0),
        );
        let_assert!(Some(hit) = object.hit(&down, 0.0, FloatType::INFINITY));
        assert!((hit.normal().into_inner() - WorldVector::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn plane_rejects_degenerate_input() {
        let_assert!(
            Err(GeometryError::ZeroNormal) =
                Plane::new(WorldPoint::origin(), WorldVector::zeros())
        );
        let_assert!(
            Err(GeometryError::CollinearPoints) = Plane::from_points(
                WorldPoint::origin(),
                WorldPoint::new(1.0, 1.0, 1.0),
                WorldPoint::new(2.0, 2.0, 2.0),
            )
        );
    }

    #[test]
    fn triangle_hit_carries_barycentric_uv() {
        let triangle = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let object = wrap(triangle);

        let ray = Ray::new(
            WorldPoint::new(0.25, 0.5, -1.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        let_assert!(Some(hit) = object.hit(&ray, 0.0, FloatType::INFINITY));
        assert!((hit.t() - 1.0).abs() < 1e-6);

        let uv = hit.texture_coordinates();
        assert!((uv.x - 0.25).abs() < 1e-6);
        assert!((uv.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn triangle_bounding_box_is_tight() {
        let triangle = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(2.0, 0.0, 0.0),
            WorldPoint::new(0.0, 3.0, -1.0),
        )
        .unwrap();
        let b = triangle.bounding_box();
        assert!(b.min == WorldPoint::new(0.0, 0.0, -1.0));
        assert!(b.max == WorldPoint::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn triangle_rejects_degenerate_vertices() {
        let_assert!(
            Err(GeometryError::DegenerateTriangle) = Triangle::new(
                WorldPoint::origin(),
                WorldPoint::new(1.0, 0.0, 0.0),
                WorldPoint::new(2.0, 0.0, 0.0),
            )
        );
    }
}
