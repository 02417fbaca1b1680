//! N-fold rotational symmetry with mirror reflection
//!
//! A [`SymmetryTransform`] maps one point (or path) to its symmetric copies
//! around a center. Every copy is rotated by `i * 2π/N + rotation` and
//! scaled uniformly about the center. For N > 2 each rotation also gets a
//! mirrored copy, reflected across the vertical axis through the center
//! before rotating. N = 2 skips the mirror pass since the half-turn already
//! produces the symmetric pair.
//!
//! The transform is a plain value: applying it never touches its inputs.

use glam::{Affine2, Vec2};

use crate::types::{Point, SymmetryOrder};

/// Symmetry parameters for one draw pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryTransform {
    pub center: Point,
    pub order: SymmetryOrder,
    /// Rotation offset θ in radians
    pub rotation: f32,
    /// Uniform scale about the center
    pub scale: f32,
}

impl SymmetryTransform {
    /// Identity-parameter transform (θ = 0, s = 1)
    pub fn new(center: Point, order: SymmetryOrder) -> Self {
        Self {
            center,
            order,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Total number of copies: N for N = 2, 2N otherwise
    pub fn copy_count(&self) -> usize {
        copy_count(self.order)
    }

    /// Every copy, rotated then mirrored for each rotation index
    pub fn copies(&self) -> impl Iterator<Item = SymmetryCopy> + '_ {
        let n = self.order.count();
        let mirror = self.order.has_mirror();
        (0..n).flat_map(move |index| {
            let angle = index as f32 * self.order.step_angle() + self.rotation;
            let rotated = SymmetryCopy {
                index,
                mirrored: false,
                angle,
                center: self.center,
                scale: self.scale,
            };
            let mirrored = mirror.then_some(SymmetryCopy {
                mirrored: true,
                ..rotated
            });
            std::iter::once(rotated).chain(mirrored)
        })
    }

    /// All copies of a single point
    pub fn apply(&self, point: Point) -> Vec<Point> {
        self.copies().map(|copy| copy.apply(point)).collect()
    }

    /// All copies of a path, one transformed path per copy
    pub fn apply_path(&self, path: &[Point]) -> Vec<Vec<Point>> {
        self.copies()
            .map(|copy| path.iter().map(|&p| copy.apply(p)).collect())
            .collect()
    }
}

/// Number of copies produced for a symmetry order
pub fn copy_count(order: SymmetryOrder) -> usize {
    let n = order.count() as usize;
    if order.has_mirror() { n * 2 } else { n }
}

/// One symmetric copy: a rotation index, optionally mirrored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryCopy {
    pub index: u32,
    pub mirrored: bool,
    /// Total rotation applied, including the transform's offset
    pub angle: f32,
    pub center: Point,
    pub scale: f32,
}

impl SymmetryCopy {
    /// Map a point into this copy
    pub fn apply(&self, point: Point) -> Point {
        let mut offset = point - self.center;
        if self.mirrored {
            offset.x = -offset.x;
        }
        Vec2::from_angle(self.angle).rotate(offset) * self.scale + self.center
    }

    /// This copy as an affine transform, for canvases that draw in stroke space
    pub fn affine(&self) -> Affine2 {
        let mirror = if self.mirrored {
            Affine2::from_scale(Vec2::new(-1.0, 1.0))
        } else {
            Affine2::IDENTITY
        };
        Affine2::from_translation(self.center)
            * Affine2::from_angle(self.angle)
            * Affine2::from_scale(Vec2::splat(self.scale))
            * mirror
            * Affine2::from_translation(-self.center)
    }
}
