use std::sync::Arc;

use log::debug;
use ordered_float::OrderedFloat;

use super::{HitRecord, SceneObject};
use crate::geometry::{FloatType, Ray, WorldBox, WorldVector};

/// Ranges of at most this many objects become leaves.
const LEAF_MAX_OBJECTS: usize = 4;

/// Bounding volume hierarchy over scene objects.
///
/// Lifecycle: objects are [`add`](Bvh::add)ed one at a time, then
/// [`build`](Bvh::build) partitions them once, after which the tree is
/// immutable and [`hit`](Bvh::hit) may be called freely (also from several
/// threads, queries never mutate the tree). Adding after the build, building
/// twice or querying an unbuilt tree are precondition violations and panic.
pub struct Bvh {
    objects: Vec<Arc<SceneObject>>,
    bounding_box: WorldBox,
    children: Option<Box<[Bvh; 2]>>,
    built: bool,
}

impl Bvh {
    pub fn new() -> Bvh {
        Bvh {
            objects: Vec::new(),
            bounding_box: WorldBox::empty(),
            children: None,
            built: false,
        }
    }

    /// Adds an object, growing the running bounding box.
    pub fn add(&mut self, object: Arc<SceneObject>) {
        assert!(!self.built, "objects cannot be added after the build");
        self.bounding_box =
            WorldBox::surround(&self.bounding_box, &object.primitive.bounding_box());
        self.objects.push(object);
    }

    /// Number of objects added so far. Only meaningful before the build;
    /// building redistributes the objects into the tree.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    /// Partitions the added objects into the hierarchy. Called exactly once.
    ///
    /// Recursive binary split: the axis of greatest extent of the range's
    /// bounding box, at the largest box-minimum coordinate of any object in
    /// the range. A split that leaves either side empty falls back to a
    /// leaf, so the recursion always terminates. Building an empty
    /// collection yields a tree whose queries always miss.
    pub fn build(&mut self) {
        assert!(!self.built, "the hierarchy is already built");
        let mut objects = std::mem::take(&mut self.objects);
        let object_count = objects.len();
        self.build_recursive(&mut objects);
        debug!("built bvh over {object_count} objects, depth {}", self.depth());
    }

    fn build_recursive(&mut self, objects: &mut [Arc<SceneObject>]) {
        self.built = true;
        self.bounding_box = objects.iter().fold(WorldBox::empty(), |b, o| {
            WorldBox::surround(&b, &o.primitive.bounding_box())
        });

        if objects.len() <= LEAF_MAX_OBJECTS {
            self.objects = objects.to_vec();
            return;
        }

        let axis = split_axis(&self.bounding_box.size());
        let split_position = objects
            .iter()
            .map(|o| o.primitive.bounding_box().min[axis])
            .fold(FloatType::NEG_INFINITY, FloatType::max);

        let mid = itertools::partition(objects.iter_mut(), |o| {
            o.primitive.bounding_box().min[axis] < split_position
        });

        if mid == 0 || mid == objects.len() {
            // Degenerate split (e.g. coincident boxes), keep the range as a leaf.
            self.objects = objects.to_vec();
            return;
        }

        let (left_objects, right_objects) = objects.split_at_mut(mid);
        let mut left = Bvh::new();
        let mut right = Bvh::new();
        left.build_recursive(left_objects);
        right.build_recursive(right_objects);
        self.children = Some(Box::new([left, right]));
    }

    /// Nearest intersection within the closed window `[t_min, t_max]`.
    ///
    /// Subtrees whose bounding box fails the slab test are pruned without
    /// descent; leaves test every member; interior nodes return the nearer
    /// of their children's results.
    pub fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord> {
        assert!(self.built, "the hierarchy must be built before querying");

        if !self.bounding_box.intersects(ray, t_min, t_max) {
            return None;
        }

        match &self.children {
            Some(children) => {
                let left = children[0].hit(ray, t_min, t_max);
                let right = children[1].hit(ray, t_min, t_max);
                nearer(left, right)
            }
            None => self
                .objects
                .iter()
                .filter_map(|o| o.hit(ray, t_min, t_max))
                .min_by_key(|hit| OrderedFloat(hit.t())),
        }
    }

    fn depth(&self) -> usize {
        match &self.children {
            Some(children) => 1 + children[0].depth().max(children[1].depth()),
            None => 1,
        }
    }
}

impl Default for Bvh {
    fn default() -> Bvh {
        Bvh::new()
    }
}

/// Axis of greatest extent; the earlier axis wins ties.
fn split_axis(extent: &WorldVector) -> usize {
    if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    }
}

fn nearer(a: Option<HitRecord>, b: Option<HitRecord>) -> Option<HitRecord> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a.t() < b.t() {
                Some(a)
            } else {
                Some(b)
            }
        }
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
