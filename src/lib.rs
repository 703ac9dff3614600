/*!
An interpreter for Type 2 charstrings, the glyph programs used by CFF fonts.

The interpreter decodes operands and operators, expands subroutine calls,
tracks stem hints and the current point, and reports every drawing
operation to a [`CharStringHandler`](type2::CharStringHandler).

Higher-level [`outline`] and [`bounds`] functions are provided for the
common case of turning a charstring into a path.

## Features

- Zero allocations.
- `no_std` compatible, when the default `std` feature is disabled.
- Operands can be interpreted as `f32` or as 16.16 [`Fixed`] values.

## Safety

- The library must not panic. Any panic is considered a critical bug.
- Stack and call depth limits from the Type 2 format are enforced.
*/

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

mod outline;
mod parser;
pub mod type2;

#[cfg(test)]
mod writer;

pub use outline::{bounds, outline, Glyph, OutlineBuilder, Rect};
pub use parser::{Fixed, FromData, Stream};
pub use type2::CFFError;
