mod bbox;
mod ray_triangle_intersection;

pub use bbox::WorldBox;
pub use ray_triangle_intersection::{BarycentricCoordinates, ray_triangle_intersection};

pub type FloatType = f32;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type TexturePoint = nalgebra::Point2<FloatType>;

/// Shared geometric tolerance: parallel-ray rejection and the
/// self-intersection offset applied to hit points.
pub const EPSILON: FloatType = 1e-4;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let direction = direction.normalize();
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }
}
