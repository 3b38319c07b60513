use super::{Color, Shader, ShaderError, Trace, ensure_finite_color};
use crate::scene::HitRecord;

/// Shades every hit with one fixed color; the usual innermost shader of a
/// composition.
pub struct ConstantColor {
    color: Color,
}

impl ConstantColor {
    pub fn new(color: Color) -> Result<ConstantColor, ShaderError> {
        ensure_finite_color(&color)?;
        Ok(ConstantColor { color })
    }
}

impl Shader for ConstantColor {
    fn shade(&self, _hit: &HitRecord, _trace: &Trace) -> Color {
        self.color
    }
}
