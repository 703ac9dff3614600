use core::fmt::Debug;
use core::ops::AddAssign;

use crate::parser::Fixed;

/// An operand value on the charstring arguments stack.
///
/// The interpreter never does more with operands than relative addition,
/// so any representation that can be built from the two literal encodings
/// and added to itself works.
pub trait Number: Copy + Default + PartialEq + AddAssign + Debug {
    fn from_i32(n: i32) -> Self;
    fn from_fixed(n: Fixed) -> Self;
    fn to_f32(self) -> f32;

    /// Truncates to an integer, used for subroutine indices.
    fn to_i32(self) -> i32;
}

impl Number for f32 {
    #[inline]
    fn from_i32(n: i32) -> Self {
        n as f32
    }

    #[inline]
    fn from_fixed(n: Fixed) -> Self {
        n.to_f32()
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn to_i32(self) -> i32 {
        // `as` saturates and maps NaN to zero.
        self as i32
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, other: Fixed) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl Number for Fixed {
    #[inline]
    fn from_i32(n: i32) -> Self {
        Fixed::from_i32(n)
    }

    #[inline]
    fn from_fixed(n: Fixed) -> Self {
        n
    }

    #[inline]
    fn to_f32(self) -> f32 {
        Fixed::to_f32(self)
    }

    #[inline]
    fn to_i32(self) -> i32 {
        Fixed::to_i32(self)
    }
}

/// Returns an absolute value without relying on `std`.
#[inline]
pub fn f32_abs(n: f32) -> f32 {
    if n.is_sign_negative() { -n } else { n }
}
