//! Core value types shared by the codec and the engine.

use nalgebra::Vector2;

/// A 2D point with single-precision coordinates, as carried on the wire.
///
/// Equality is exact value equality on the pair; the core applies no
/// tolerance anywhere.
pub type Point = Vector2<f32>;

/// Corner indices of a triangle into a specific point set.
///
/// Arity is fixed by the type; the dynamic three-indices check lives at the
/// JSON boundary (`input`). Index range is validated by the wire encoder,
/// not here. The corner order is whatever the producer emitted: consumers
/// must not assume a winding direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Triangle {
    #[inline]
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// Corner indices in emission order.
    #[inline]
    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}
