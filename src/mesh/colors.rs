//! Color mapping for face classifications

use crate::topology::CellType;

/// RGBA color type
pub type Color = [f32; 4];

/// Trait for mapping surface types to colors
pub trait ColorMapper<T> {
    /// Map a surface type to an RGBA color
    fn map_color(&self, surface: &T) -> Color;
}

/// Default color mapper for [`CellType`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceColorMapper;

impl ColorMapper<CellType> for SurfaceColorMapper {
    fn map_color(&self, surface: &CellType) -> Color {
        match surface {
            CellType::Water => [0.1, 0.3, 0.7, 1.0],     // Deep blue
            CellType::Land => [0.2, 0.6, 0.2, 1.0],      // Green
            CellType::Undefined => [0.5, 0.5, 0.5, 1.0], // Gray
        }
    }
}

/// Color mapper with a configurable color per surface type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomColorMapper {
    pub water: Color,
    pub land: Color,
    pub undefined: Color,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            water: [0.1, 0.3, 0.7, 1.0],
            land: [0.2, 0.6, 0.2, 1.0],
            undefined: [0.5, 0.5, 0.5, 1.0],
        }
    }
}

impl ColorMapper<CellType> for CustomColorMapper {
    fn map_color(&self, surface: &CellType) -> Color {
        match surface {
            CellType::Water => self.water,
            CellType::Land => self.land,
            CellType::Undefined => self.undefined,
        }
    }
}

/// Scale the RGB channels of `color`, keeping alpha
pub fn shade(color: Color, factor: f32) -> Color {
    [
        (color[0] * factor).clamp(0.0, 1.0),
        (color[1] * factor).clamp(0.0, 1.0),
        (color[2] * factor).clamp(0.0, 1.0),
        color[3],
    ]
}
