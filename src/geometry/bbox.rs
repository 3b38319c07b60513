use super::{FloatType, Ray, WorldPoint, WorldVector};

/// Axis-aligned bounding box.
///
/// Either `min <= max` holds componentwise, or the box is the designated
/// [`WorldBox::empty`] value. Unbounded primitives use [`WorldBox::infinite`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBox {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl WorldBox {
    pub fn new(min: WorldPoint, max: WorldPoint) -> WorldBox {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "box corners out of order: {min:?} > {max:?}"
        );
        WorldBox { min, max }
    }

    /// The union identity: surrounds nothing, intersects nothing.
    pub fn empty() -> WorldBox {
        WorldBox {
            min: WorldPoint::new(
                FloatType::INFINITY,
                FloatType::INFINITY,
                FloatType::INFINITY,
            ),
            max: WorldPoint::new(
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
            ),
        }
    }

    /// Unbounded box, intersected by every ray.
    pub fn infinite() -> WorldBox {
        WorldBox {
            min: WorldPoint::new(
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
            ),
            max: WorldPoint::new(
                FloatType::INFINITY,
                FloatType::INFINITY,
                FloatType::INFINITY,
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Smallest box containing both operands. Empty boxes act as identity.
    pub fn surround(a: &WorldBox, b: &WorldBox) -> WorldBox {
        WorldBox {
            min: WorldPoint::from(a.min.coords.inf(&b.min.coords)),
            max: WorldPoint::from(a.max.coords.sup(&b.max.coords)),
        }
    }

    /// Tight box of a point set, `None` for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut result = WorldBox {
            min: *first,
            max: *first,
        };
        for p in iter {
            result.min = WorldPoint::from(result.min.coords.inf(&p.coords));
            result.max = WorldPoint::from(result.max.coords.sup(&p.coords));
        }
        Some(result)
    }

    pub fn size(&self) -> WorldVector {
        self.max - self.min
    }

    /// Calculates ray intersection with the box via the slab method.
    /// Returns entry and exit distance along the ray, the ray intersects iff entry <= exit.
    ///
    /// The multiplication is NAN if the ray is starting inside the slab bounding plane
    /// and is parallel to it. In this case we blend to +-infinity, so that the slab
    /// does not constrain the interval.
    pub fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        if self.is_empty() {
            return (FloatType::INFINITY, FloatType::NEG_INFINITY);
        }

        let to_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (entry <= exit) per axis
        let componentwise_entry = to_min.zip_map(&to_max, FloatType::min);
        let componentwise_exit = to_min.zip_map(&to_max, FloatType::max);

        let entry = componentwise_entry
            .x
            .max(componentwise_entry.y)
            .max(componentwise_entry.z);
        let exit = componentwise_exit
            .x
            .min(componentwise_exit.y)
            .min(componentwise_exit.z);

        (entry, exit)
    }

    /// True iff the ray passes through the box somewhere within the closed
    /// window `[t_min, t_max]`.
    pub fn intersects(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> bool {
        let (entry, exit) = self.intersect(ray);
        exit >= entry.max(t_min) && entry <= t_max
    }
}
