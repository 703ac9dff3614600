use core::convert::TryFrom;

use log::{debug, trace};

use crate::parser::Stream;

use super::call_stack::{BiasedSubrs, CallContext, CallStack, CharStringKind, Subroutines};
use super::{ArgumentsStack, CFFError, Number, Operator, TWO_BYTE_OPERATOR_MARK};

/// A pen position.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Point<N> {
    pub x: N,
    pub y: N,
}

impl<N: Number> Point<N> {
    #[inline]
    pub fn new(x: N, y: N) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn move_x(&mut self, dx: N) {
        self.x += dx;
    }

    #[inline]
    pub fn move_y(&mut self, dy: N) {
        self.y += dy;
    }

    #[inline]
    pub fn move_by(&mut self, dx: N, dy: N) {
        self.move_x(dx);
        self.move_y(dy);
    }
}

/// Per-glyph interpreter state.
///
/// Built fresh for every charstring. Only the subroutine lists are shared
/// between glyphs, and those are never written to.
pub struct CharStringEnv<'a, 's, N, S: ?Sized> {
    pub(crate) context: CallContext<'a>,
    pub(crate) call_stack: CallStack<'a>,
    pub(crate) global_subrs: BiasedSubrs<'s, S>,
    pub(crate) local_subrs: BiasedSubrs<'s, S>,
    pub(crate) stack: ArgumentsStack<N>,
    pt: Point<N>,
    pub(crate) hstem_count: u32,
    pub(crate) vstem_count: u32,
    pub(crate) hintmask_size: usize,
    pub(crate) seen_moveto: bool,
    pub(crate) seen_hintmask: bool,
    pub(crate) endchar: bool,
}

impl<'a, 's, N: Number, S: Subroutines<'a> + ?Sized> CharStringEnv<'a, 's, N, S> {
    pub fn new(char_string: &'a [u8], global_subrs: &'s S, local_subrs: &'s S) -> Self {
        CharStringEnv {
            context: CallContext::new(char_string, CharStringKind::CharString, 0),
            call_stack: CallStack::default(),
            global_subrs: BiasedSubrs::new(global_subrs),
            local_subrs: BiasedSubrs::new(local_subrs),
            stack: ArgumentsStack::new(),
            pt: Point::default(),
            hstem_count: 0,
            vstem_count: 0,
            hintmask_size: 0,
            seen_moveto: false,
            seen_hintmask: false,
            endchar: false,
        }
    }

    #[inline]
    pub fn point(&self) -> Point<N> {
        self.pt
    }

    /// Sets the current point.
    ///
    /// Only the path emission functions call this.
    #[inline]
    pub(crate) fn set_point(&mut self, pt: Point<N>) {
        self.pt = pt;
    }

    #[inline]
    pub fn hstem_count(&self) -> u32 {
        self.hstem_count
    }

    #[inline]
    pub fn vstem_count(&self) -> u32 {
        self.vstem_count
    }

    /// Returns the hintmask length in bytes, once it has been fixed.
    pub fn hintmask_size(&self) -> Option<usize> {
        if self.seen_hintmask {
            Some(self.hintmask_size)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_endchar(&self) -> bool {
        self.endchar
    }

    /// Returns the origin of the program currently being executed.
    #[inline]
    pub fn context(&self) -> &CallContext<'a> {
        &self.context
    }

    #[inline]
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    #[inline]
    pub fn stack(&self) -> &ArgumentsStack<N> {
        &self.stack
    }

    #[inline]
    pub(crate) fn stream(&mut self) -> &mut Stream<'a> {
        &mut self.context.stream
    }

    /// Reads the next operator, including the first byte of a number literal.
    pub(crate) fn fetch_op(&mut self) -> Result<Operator, CFFError> {
        let s = &mut self.context.stream;
        if s.at_end() {
            return Err(CFFError::MissingEndChar);
        }

        let b0 = s.read::<u8>().ok_or(CFFError::ReadOutOfBounds)?;
        if b0 == TWO_BYTE_OPERATOR_MARK {
            let b1 = s.read::<u8>().ok_or(CFFError::ReadOutOfBounds)?;
            return Ok(Operator(u16::from(TWO_BYTE_OPERATOR_MARK) << 8 | u16::from(b1)));
        }

        Ok(Operator(u16::from(b0)))
    }

    pub(crate) fn call_subr(&mut self, kind: CharStringKind) -> Result<(), CFFError> {
        let n = self.stack.pop_i32()?;
        let subrs = match kind {
            CharStringKind::GlobalSubroutine => &self.global_subrs,
            _ => &self.local_subrs,
        };

        let subr_num = subrs.resolve(n)?;
        let data = subrs.get(subr_num).ok_or(CFFError::InvalidSubroutineIndex)?;

        let offset = self.context.stream.offset();
        self.call_stack.push(self.context)?;
        trace!(
            "calling {:?} {} from offset {} at depth {}",
            kind,
            subr_num,
            offset,
            self.call_stack.len()
        );
        self.context = CallContext::new(data, kind, subr_num);
        Ok(())
    }

    pub(crate) fn return_from_subr(&mut self) -> Result<(), CFFError> {
        self.context = self.call_stack.pop()?;
        trace!("returned to {:?} at depth {}", self.context.kind, self.call_stack.len());
        Ok(())
    }

    /// Fixes the hintmask size on first use.
    ///
    /// Operands left on the stack at this point are an implicit `vstem`.
    pub(crate) fn determine_hintmask_size(&mut self) {
        if !self.seen_hintmask {
            self.vstem_count = self.vstem_count.saturating_add((self.stack.len() / 2) as u32);
            let stems = u64::from(self.hstem_count) + u64::from(self.vstem_count);
            self.hintmask_size = usize::try_from((stems + 7) >> 3).unwrap_or(usize::MAX);
            self.seen_hintmask = true;
            debug!("hintmask size fixed at {} bytes for {} stems", self.hintmask_size, stems);
        }
    }
}
