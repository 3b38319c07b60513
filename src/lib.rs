pub mod geometry;
pub mod loader;
pub mod scene;
pub mod shade;

pub use crate::loader::{load_obj, load_obj_file};
pub use geometry::{Ray, WorldBox, WorldPoint, WorldVector};
pub use scene::{Bvh, HitRecord, Primitive, Scene, SceneObject};
pub use shade::{Color, PointLight, Shader, Trace};
