//! 视觉属性

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const MAGENTA: Color = Color::new(255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从 0xRRGGBB 创建
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// 从 [0, 1] 范围的浮点分量创建，分量数必须为 4
    pub fn from_components(components: &[f32]) -> CoreResult<Self> {
        let [r, g, b, a] = components else {
            return Err(CoreError::InvalidColor {
                components: components.len(),
            });
        };
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Ok(Self::with_alpha(to_u8(*r), to_u8(*g), to_u8(*b), to_u8(*a)))
    }

    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// 实体视觉属性
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub color: Color,
}

impl Properties {
    pub fn with_color(color: Color) -> Self {
        Self { color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_components() {
        let c = Color::from_components(&[1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(c, Color::RED);

        let err = Color::from_components(&[1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(err, CoreError::InvalidColor { components: 3 });
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex(0x00FFFF), Color::CYAN);
        assert_eq!(Color::YELLOW.to_f32_array(), [1.0, 1.0, 0.0, 1.0]);
    }
}
