use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// A position in canvas pixel space
pub type Point = Vec2;

/// Fixed drawing palette, in cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PaletteColor {
    #[default]
    Rose = 0,
    Aqua = 1,
    Azure = 2,
    Lime = 3,
    Amber = 4,
    Magenta = 5,
    White = 6,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 7] = [
        PaletteColor::Rose,
        PaletteColor::Aqua,
        PaletteColor::Azure,
        PaletteColor::Lime,
        PaletteColor::Amber,
        PaletteColor::Magenta,
        PaletteColor::White,
    ];

    /// Position in the palette
    pub fn index(self) -> usize {
        self as usize
    }

    /// Palette entry at `index`, wrapping around
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Next palette entry (wrapping)
    pub fn next(self) -> Self {
        self.shifted(1)
    }

    /// Entry `offset` steps further along the palette (wrapping)
    pub fn shifted(self, offset: usize) -> Self {
        Self::from_index(self.index() + offset % Self::ALL.len())
    }

    /// CSS hex notation
    pub fn hex(self) -> &'static str {
        match self {
            PaletteColor::Rose => "#ff0055",
            PaletteColor::Aqua => "#00ffcc",
            PaletteColor::Azure => "#0099ff",
            PaletteColor::Lime => "#ccff00",
            PaletteColor::Amber => "#ffcc00",
            PaletteColor::Magenta => "#ff00cc",
            PaletteColor::White => "#ffffff",
        }
    }

    /// Opaque RGBA in 0..1
    pub fn rgba(self) -> [f32; 4] {
        let [r, g, b] = match self {
            PaletteColor::Rose => [0xff, 0x00, 0x55],
            PaletteColor::Aqua => [0x00, 0xff, 0xcc],
            PaletteColor::Azure => [0x00, 0x99, 0xff],
            PaletteColor::Lime => [0xcc, 0xff, 0x00],
            PaletteColor::Amber => [0xff, 0xcc, 0x00],
            PaletteColor::Magenta => [0xff, 0x00, 0xcc],
            PaletteColor::White => [0xff, 0xff, 0xff],
        };
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}

/// Brush diameter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BrushSize {
    Small = 0,
    #[default]
    Medium = 1,
    Large = 2,
}

impl BrushSize {
    /// Diameter in pixels
    pub fn diameter(self) -> f32 {
        match self {
            BrushSize::Small => 3.0,
            BrushSize::Medium => 8.0,
            BrushSize::Large => 20.0,
        }
    }

    pub fn next(self) -> Self {
        match self {
            BrushSize::Small => BrushSize::Medium,
            BrushSize::Medium => BrushSize::Large,
            BrushSize::Large => BrushSize::Small,
        }
    }
}

/// Number of rotational copies per stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum SymmetryOrder {
    #[default]
    Two,
    Three,
    Four,
    Six,
    Eight,
    Twelve,
}

impl SymmetryOrder {
    pub const ALL: [SymmetryOrder; 6] = [
        SymmetryOrder::Two,
        SymmetryOrder::Three,
        SymmetryOrder::Four,
        SymmetryOrder::Six,
        SymmetryOrder::Eight,
        SymmetryOrder::Twelve,
    ];

    /// Rotational copy count N
    pub fn count(self) -> u32 {
        match self {
            SymmetryOrder::Two => 2,
            SymmetryOrder::Three => 3,
            SymmetryOrder::Four => 4,
            SymmetryOrder::Six => 6,
            SymmetryOrder::Eight => 8,
            SymmetryOrder::Twelve => 12,
        }
    }

    /// Whether mirrored copies are drawn (N > 2)
    pub fn has_mirror(self) -> bool {
        self.count() > 2
    }

    /// Angle between neighbouring rotational copies
    pub fn step_angle(self) -> f32 {
        std::f32::consts::TAU / self.count() as f32
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&o| o == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl TryFrom<u32> for SymmetryOrder {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|order| order.count() == value)
            .ok_or(ValidationError::UnsupportedSymmetry(value))
    }
}

impl From<SymmetryOrder> for u32 {
    fn from(order: SymmetryOrder) -> Self {
        order.count()
    }
}

/// How a stroke is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BrushStyle {
    #[default]
    Neon = 0,
    Spray = 1,
    Ribbon = 2,
}

impl BrushStyle {
    pub fn next(self) -> Self {
        match self {
            BrushStyle::Neon => BrushStyle::Spray,
            BrushStyle::Spray => BrushStyle::Ribbon,
            BrushStyle::Ribbon => BrushStyle::Neon,
        }
    }
}

/// Input tool that produced a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum DrawTool {
    #[default]
    Freehand = 0,
    Polygon = 1,
}

impl DrawTool {
    pub fn next(self) -> Self {
        match self {
            DrawTool::Freehand => DrawTool::Polygon,
            DrawTool::Polygon => DrawTool::Freehand,
        }
    }
}

/// Current brush selections, as shown by the UI labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub color: PaletteColor,
    pub size: BrushSize,
    pub symmetry: SymmetryOrder,
    pub style: BrushStyle,
    pub tool: DrawTool,
}

/// A committed stroke
///
/// Strokes are only handed out by shared reference once they are in the
/// history, so they never change after commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Points in drawing order (at least one)
    pub points: Vec<Point>,
    pub color: PaletteColor,
    pub size: BrushSize,
    pub symmetry: SymmetryOrder,
    pub style: BrushStyle,
    pub tool: DrawTool,
    /// Seed for scattered brush textures, fixed at commit
    pub seed: u64,
}

impl Stroke {
    /// Build a stroke from the current selection
    pub fn from_selection(points: Vec<Point>, selection: &Selection, seed: u64) -> Self {
        Self {
            points,
            color: selection.color,
            size: selection.size,
            symmetry: selection.symmetry,
            style: selection.style,
            tool: selection.tool,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let mut color = PaletteColor::default();
        for _ in 0..PaletteColor::ALL.len() {
            color = color.next();
        }
        assert_eq!(color, PaletteColor::Rose);
        assert_eq!(PaletteColor::White.next(), PaletteColor::Rose);
    }

    #[test]
    fn test_palette_shift_wraps() {
        assert_eq!(PaletteColor::Rose.shifted(2), PaletteColor::Azure);
        assert_eq!(PaletteColor::Magenta.shifted(3), PaletteColor::Aqua);
        assert_eq!(PaletteColor::Lime.shifted(7), PaletteColor::Lime);
        assert_eq!(
            PaletteColor::Lime.shifted(usize::MAX),
            PaletteColor::Lime.shifted(usize::MAX % 7)
        );
    }

    #[test]
    fn test_palette_rgba() {
        assert_eq!(PaletteColor::White.rgba(), [1.0, 1.0, 1.0, 1.0]);
        let rose = PaletteColor::Rose.rgba();
        assert_eq!(rose[0], 1.0);
        assert_eq!(rose[1], 0.0);
        assert!((rose[2] - 85.0 / 255.0).abs() < 1e-6);
        assert_eq!(PaletteColor::Rose.hex(), "#ff0055");
    }

    #[test]
    fn test_symmetry_orders() {
        let counts: Vec<u32> = SymmetryOrder::ALL.iter().map(|o| o.count()).collect();
        assert_eq!(counts, vec![2, 3, 4, 6, 8, 12]);
        assert!(!SymmetryOrder::Two.has_mirror());
        assert!(SymmetryOrder::Three.has_mirror());
        assert_eq!(SymmetryOrder::Twelve.next(), SymmetryOrder::Two);
    }

    #[test]
    fn test_symmetry_try_from() {
        assert_eq!(SymmetryOrder::try_from(6).unwrap(), SymmetryOrder::Six);
        assert!(matches!(
            SymmetryOrder::try_from(5),
            Err(ValidationError::UnsupportedSymmetry(5))
        ));
    }

    #[test]
    fn test_brush_cycles() {
        assert_eq!(BrushSize::default().diameter(), 8.0);
        assert_eq!(BrushSize::Large.next(), BrushSize::Small);
        assert_eq!(BrushStyle::Ribbon.next(), BrushStyle::Neon);
        assert_eq!(DrawTool::Polygon.next(), DrawTool::Freehand);
    }

    #[test]
    fn test_stroke_from_selection() {
        let selection = Selection {
            color: PaletteColor::Amber,
            symmetry: SymmetryOrder::Eight,
            ..Default::default()
        };
        let stroke = Stroke::from_selection(vec![Point::new(1.0, 2.0)], &selection, 7);
        assert_eq!(stroke.color, PaletteColor::Amber);
        assert_eq!(stroke.symmetry, SymmetryOrder::Eight);
        assert_eq!(stroke.size, BrushSize::Medium);
        assert_eq!(stroke.seed, 7);
    }
}
