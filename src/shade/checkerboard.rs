use std::sync::Arc;

use super::{Color, Shader, ShaderError, Trace};
use crate::geometry::{EPSILON, FloatType};
use crate::scene::HitRecord;

/// Tiles the surface with two inner shaders, alternating on a checkerboard
/// of the hit's surface coordinates.
pub struct Checkerboard {
    even: Arc<dyn Shader>,
    odd: Arc<dyn Shader>,
    tile_size: FloatType,
}

impl Checkerboard {
    /// `even` covers tiles where `floor(u/s) + floor(v/s)` is even, `odd`
    /// the rest.
    pub fn new(
        even: Arc<dyn Shader>,
        odd: Arc<dyn Shader>,
        tile_size: FloatType,
    ) -> Result<Checkerboard, ShaderError> {
        if !tile_size.is_finite() || tile_size < EPSILON {
            return Err(ShaderError::InvalidTileSize(tile_size));
        }
        Ok(Checkerboard {
            even,
            odd,
            tile_size,
        })
    }
}

impl Shader for Checkerboard {
    fn shade(&self, hit: &HitRecord, trace: &Trace) -> Color {
        let uv = hit.texture_coordinates();
        let tile =
            (uv.x / self.tile_size).floor() as i64 + (uv.y / self.tile_size).floor() as i64;

        if tile.rem_euclid(2) == 0 {
            self.even.shade(hit, trace)
        } else {
            self.odd.shade(hit, trace)
        }
    }
}
