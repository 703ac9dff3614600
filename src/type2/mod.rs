// Useful links:
// http://wwwimages.adobe.com/content/dam/Adobe/en/devnet/font/pdfs/5176.CFF.pdf
// http://wwwimages.adobe.com/content/dam/Adobe/en/devnet/font/pdfs/5177.Type2.pdf

mod argstack;
mod call_stack;
mod env;
mod interpreter;
mod number;
mod ops;
mod path;

use core::fmt;

pub use argstack::ArgumentsStack;
pub use call_stack::{calc_subroutine_bias, BiasedSubrs, CallContext, CallStack, CharStringKind, Subroutines};
pub use env::{CharStringEnv, Point};
pub use interpreter::CharStringInterpreter;
pub use number::Number;
pub use ops::{CharStringHandler, NullHandler};

pub(crate) use number::f32_abs;

// Limits according to the Adobe Technical Note #5177 Appendix B.
pub const STACK_LIMIT: usize = 10;
pub const MAX_ARGUMENTS_STACK_LEN: usize = 48;

pub(crate) const TWO_BYTE_OPERATOR_MARK: u8 = 12;

/// Enumerates the operators defined in the Adobe Technical Note #5177.
///
/// Escaped operators are stored as `0x0c00 | second_byte`.
pub mod operator {
    pub const HORIZONTAL_STEM: u16           = 1;
    pub const VERTICAL_STEM: u16             = 3;
    pub const VERTICAL_MOVE_TO: u16          = 4;
    pub const LINE_TO: u16                   = 5;
    pub const HORIZONTAL_LINE_TO: u16        = 6;
    pub const VERTICAL_LINE_TO: u16          = 7;
    pub const CURVE_TO: u16                  = 8;
    pub const CALL_LOCAL_SUBROUTINE: u16     = 10;
    pub const RETURN: u16                    = 11;
    pub const ENDCHAR: u16                   = 14;
    pub const HORIZONTAL_STEM_HINT_MASK: u16 = 18;
    pub const HINT_MASK: u16                 = 19;
    pub const COUNTER_MASK: u16              = 20;
    pub const MOVE_TO: u16                   = 21;
    pub const HORIZONTAL_MOVE_TO: u16        = 22;
    pub const VERTICAL_STEM_HINT_MASK: u16   = 23;
    pub const CURVE_LINE: u16                = 24;
    pub const LINE_CURVE: u16                = 25;
    pub const VV_CURVE_TO: u16               = 26;
    pub const HH_CURVE_TO: u16               = 27;
    pub const SHORT_INT: u16                 = 28;
    pub const CALL_GLOBAL_SUBROUTINE: u16    = 29;
    pub const VH_CURVE_TO: u16               = 30;
    pub const HV_CURVE_TO: u16               = 31;
    pub const FIXED_16_16: u16               = 255;

    pub const DOTSECTION: u16                = 0x0c00;
    pub const HFLEX: u16                     = 0x0c22;
    pub const FLEX: u16                      = 0x0c23;
    pub const HFLEX1: u16                    = 0x0c24;
    pub const FLEX1: u16                     = 0x0c25;
}

static OPERATOR_NAMES: phf::Map<u16, &'static str> = phf::phf_map! {
    1u16 => "hstem",
    3u16 => "vstem",
    4u16 => "vmoveto",
    5u16 => "rlineto",
    6u16 => "hlineto",
    7u16 => "vlineto",
    8u16 => "rrcurveto",
    10u16 => "callsubr",
    11u16 => "return",
    14u16 => "endchar",
    18u16 => "hstemhm",
    19u16 => "hintmask",
    20u16 => "cntrmask",
    21u16 => "rmoveto",
    22u16 => "hmoveto",
    23u16 => "vstemhm",
    24u16 => "rcurveline",
    25u16 => "rlinecurve",
    26u16 => "vvcurveto",
    27u16 => "hhcurveto",
    28u16 => "shortint",
    29u16 => "callgsubr",
    30u16 => "vhcurveto",
    31u16 => "hvcurveto",
    255u16 => "fixed",
    0x0c00u16 => "dotsection",
    0x0c03u16 => "and",
    0x0c04u16 => "or",
    0x0c05u16 => "not",
    0x0c09u16 => "abs",
    0x0c0au16 => "add",
    0x0c0bu16 => "sub",
    0x0c0cu16 => "div",
    0x0c0eu16 => "neg",
    0x0c0fu16 => "eq",
    0x0c12u16 => "drop",
    0x0c14u16 => "put",
    0x0c15u16 => "get",
    0x0c16u16 => "ifelse",
    0x0c17u16 => "random",
    0x0c18u16 => "mul",
    0x0c1au16 => "sqrt",
    0x0c1bu16 => "dup",
    0x0c1cu16 => "exch",
    0x0c1du16 => "index",
    0x0c1eu16 => "roll",
    0x0c22u16 => "hflex",
    0x0c23u16 => "flex",
    0x0c24u16 => "hflex1",
    0x0c25u16 => "flex1",
};

/// A charstring operator, or the first byte of a number literal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator(pub u16);

impl Operator {
    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn is_escaped(self) -> bool {
        self.0 >> 8 == u16::from(TWO_BYTE_OPERATOR_MARK)
    }

    /// Returns the Type 2 name of a known operator.
    pub fn name(self) -> Option<&'static str> {
        OPERATOR_NAMES.get(&self.0).copied()
    }

    /// Checks that the byte starts a number literal instead of an operator.
    pub fn is_number(self) -> bool {
        matches!(self.0, operator::SHORT_INT | operator::FIXED_16_16 | 32..=254)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Operator({})", name),
            None => write!(f, "Operator({:#06x})", self.0),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.is_escaped() => write!(f, "12 {}", self.0 & 0xff),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A list of errors that can occur during charstring interpretation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CFFError {
    ReadOutOfBounds,
    ZeroBBox,
    InvalidOperator,
    UnsupportedOperator,
    MissingEndChar,
    NestingLimitReached,
    CallStackUnderflow,
    ArgumentsStackLimitReached,
    InvalidArgumentsStackLength,
    BboxOverflow,
    InvalidSubroutineIndex,
}

impl fmt::Display for CFFError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CFFError::ReadOutOfBounds => {
                write!(f, "read out of bounds")
            }
            CFFError::ZeroBBox => {
                write!(f, "zero bbox")
            }
            CFFError::InvalidOperator => {
                write!(f, "an invalid operator occurred")
            }
            CFFError::UnsupportedOperator => {
                write!(f, "an unsupported operator occurred")
            }
            CFFError::MissingEndChar => {
                write!(f, "the 'endchar' operator is missing")
            }
            CFFError::NestingLimitReached => {
                write!(f, "subroutines nesting limit reached")
            }
            CFFError::CallStackUnderflow => {
                write!(f, "'return' outside of a subroutine")
            }
            CFFError::ArgumentsStackLimitReached => {
                write!(f, "arguments stack limit reached")
            }
            CFFError::InvalidArgumentsStackLength => {
                write!(f, "an invalid amount of items are in an arguments stack")
            }
            CFFError::BboxOverflow => {
                write!(f, "outline's bounding box is too large")
            }
            CFFError::InvalidSubroutineIndex => {
                write!(f, "an invalid subroutine index")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CFFError {}
