mod checkerboard;
mod constant;
mod phong;

pub use checkerboard::Checkerboard;
pub use constant::ConstantColor;
pub use phong::Phong;

use thiserror::Error;

use crate::geometry::{FloatType, Ray, WorldPoint};
use crate::scene::HitRecord;

/// Linear RGB color. Shading output is not clamped; tone mapping is the
/// caller's concern.
pub type Color = nalgebra::Vector3<FloatType>;

pub struct PointLight {
    pub position: WorldPoint,
    pub color: Color,
}

/// Ambient information a shader needs beyond the hit itself.
pub struct Trace<'a> {
    pub ray: &'a Ray,
    pub lights: &'a [PointLight],
}

/// Computes the color of a surface hit. Shaders are pure: immutable
/// configuration only, every evaluation independent and re-entrant.
pub trait Shader: Send + Sync {
    fn shade(&self, hit: &HitRecord, trace: &Trace) -> Color;
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("color components must be finite")]
    InvalidColor,

    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(FloatType),

    #[error("{0} must be a finite non-negative number, got {1}")]
    InvalidCoefficient(&'static str, FloatType),
}

fn ensure_finite_color(color: &Color) -> Result<(), ShaderError> {
    if color.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ShaderError::InvalidColor)
    }
}

fn ensure_coefficient(name: &'static str, value: FloatType) -> Result<(), ShaderError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ShaderError::InvalidCoefficient(name, value))
    }
}
