use super::{EPSILON, FloatType, Ray, WorldPoint};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates {
    pub u: FloatType,
    pub v: FloatType,
}

/// Calculates ray intersection with the (two sided) triangle `a`, `b`, `c`.
/// Returns distance along the ray and barycentric uv coordinates of the hit.
/// Adapted from https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm
///
/// A ray parallel to the triangle plane is a miss, never an error.
pub fn ray_triangle_intersection(
    ray: &Ray,
    a: &WorldPoint,
    b: &WorldPoint,
    c: &WorldPoint,
) -> Option<(FloatType, BarycentricCoordinates)> {
    let e1 = b - a;
    let e2 = c - a;

    let ray_cross_e2 = ray.direction.cross(&e2);
    let det = e1.dot(&ray_cross_e2);

    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = inv_det * s.dot(&ray_cross_e2);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let s_cross_e1 = s.cross(&e1);
    let v = inv_det * ray.direction.dot(&s_cross_e1);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * e2.dot(&s_cross_e1);
    Some((t, BarycentricCoordinates { u, v }))
}

#[cfg(test)]
mod test {
    use assert2::{assert, let_assert};

    use super::*;
    use crate::geometry::WorldVector;

    fn xy_triangle() -> [WorldPoint; 3] {
        [
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn hit_inside() {
        let [a, b, c] = xy_triangle();
        let ray = Ray::new(
            WorldPoint::new(0.25, 0.25, -2.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        let_assert!(Some((t, uv)) = ray_triangle_intersection(&ray, &a, &b, &c));
        assert!((t - 2.0).abs() < 1e-6);
        assert!((uv.u - 0.25).abs() < 1e-6);
        assert!((uv.v - 0.25).abs() < 1e-6);
    }

    #[test]
    fn hit_from_behind() {
        // Two sided: approaching against the geometric normal still hits.
        let [a, b, c] = xy_triangle();
        let ray = Ray::new(
            WorldPoint::new(0.25, 0.25, 3.0),
            WorldVector::new(0.0, 0.0, -1.0),
        );

        let_assert!(Some((t, _)) = ray_triangle_intersection(&ray, &a, &b, &c));
        assert!((t - 3.0).abs() < 1e-6);
    }

    #[test]
    fn miss_outside_edges() {
        let [a, b, c] = xy_triangle();
        let ray = Ray::new(
            WorldPoint::new(0.75, 0.75, -2.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );
        assert!(ray_triangle_intersection(&ray, &a, &b, &c).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let [a, b, c] = xy_triangle();
        let ray = Ray::new(
            WorldPoint::new(0.0, 0.0, 1.0),
            WorldVector::new(1.0, 0.0, 0.0),
        );
        assert!(ray_triangle_intersection(&ray, &a, &b, &c).is_none());
    }

    #[test]
    fn negative_t_is_reported() {
        // The triangle behind the origin still solves, with t < 0. Window
        // filtering is the caller's job.
        let [a, b, c] = xy_triangle();
        let ray = Ray::new(
            WorldPoint::new(0.25, 0.25, 2.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        let_assert!(Some((t, _)) = ray_triangle_intersection(&ray, &a, &b, &c));
        assert!(t < 0.0);
    }
}
