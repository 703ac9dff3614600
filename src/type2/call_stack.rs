use crate::parser::Stream;

use super::{CFFError, STACK_LIMIT};

/// Where a charstring execution context comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CharStringKind {
    CharString,
    GlobalSubroutine,
    LocalSubroutine,
}

/// A read-only list of subroutines.
///
/// Usually backed by a CFF INDEX owned by the font.
pub trait Subroutines<'a> {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<&'a [u8]>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> Subroutines<'a> for [&'a [u8]] {
    #[inline]
    fn len(&self) -> usize {
        <[&'a [u8]]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&'a [u8]> {
        <[&'a [u8]]>::get(self, index).copied()
    }
}

// Adobe Technical Note #5176, Chapter 16 "Local / Global Subrs INDEXes"
#[inline]
pub fn calc_subroutine_bias(len: usize) -> i32 {
    if len < 1240 {
        107
    } else if len < 33900 {
        1131
    } else {
        32768
    }
}

/// A subroutines list together with its bias.
pub struct BiasedSubrs<'s, S: ?Sized> {
    subrs: &'s S,
    bias: i32,
}

impl<'a, 's, S: Subroutines<'a> + ?Sized> BiasedSubrs<'s, S> {
    pub fn new(subrs: &'s S) -> Self {
        BiasedSubrs {
            subrs,
            bias: calc_subroutine_bias(subrs.len()),
        }
    }

    #[inline]
    pub fn bias(&self) -> i32 {
        self.bias
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subrs.is_empty()
    }

    /// Converts an encoded subroutine number into a list index.
    pub fn resolve(&self, index: i32) -> Result<usize, CFFError> {
        let index = index.checked_add(self.bias).ok_or(CFFError::InvalidSubroutineIndex)?;
        if index < 0 || index as usize >= self.subrs.len() {
            return Err(CFFError::InvalidSubroutineIndex);
        }

        Ok(index as usize)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.subrs.get(index)
    }
}

/// An execution point: the program being run and the read position in it.
#[derive(Clone, Copy, Debug)]
pub struct CallContext<'a> {
    pub stream: Stream<'a>,
    pub kind: CharStringKind,
    pub subr_num: usize,
}

impl<'a> CallContext<'a> {
    pub fn new(data: &'a [u8], kind: CharStringKind, subr_num: usize) -> Self {
        CallContext {
            stream: Stream::new(data),
            kind,
            subr_num,
        }
    }
}

/// Suspended execution points, capped at `STACK_LIMIT` frames.
#[derive(Default)]
pub struct CallStack<'a> {
    records: [Option<CallContext<'a>>; STACK_LIMIT],
    top: usize,
}

impl<'a> CallStack<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.top
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn push(&mut self, context: CallContext<'a>) -> Result<(), CFFError> {
        if self.top >= STACK_LIMIT {
            return Err(CFFError::NestingLimitReached);
        }

        self.records[self.top] = Some(context);
        self.top += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<CallContext<'a>, CFFError> {
        let top = self.top.checked_sub(1).ok_or(CFFError::CallStackUnderflow)?;
        let context = self.records[top].take().ok_or(CFFError::CallStackUnderflow)?;
        self.top = top;
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_breakpoints() {
        assert_eq!(calc_subroutine_bias(0), 107);
        assert_eq!(calc_subroutine_bias(1239), 107);
        assert_eq!(calc_subroutine_bias(1240), 1131);
        assert_eq!(calc_subroutine_bias(33899), 1131);
        assert_eq!(calc_subroutine_bias(33900), 32768);
    }

    #[test]
    fn resolve_index() {
        let data: &[u8] = &[11];
        let subrs: &[&[u8]] = &[data, data, data];
        let biased = BiasedSubrs::new(subrs);
        assert_eq!(biased.bias(), 107);
        assert_eq!(biased.resolve(-107), Ok(0));
        assert_eq!(biased.resolve(-105), Ok(2));
        assert_eq!(biased.resolve(-104), Err(CFFError::InvalidSubroutineIndex));
        assert_eq!(biased.resolve(-108), Err(CFFError::InvalidSubroutineIndex));
        assert_eq!(biased.resolve(i32::MAX), Err(CFFError::InvalidSubroutineIndex));
    }

    #[test]
    fn resolve_in_empty_list() {
        let subrs: &[&[u8]] = &[];
        let biased = BiasedSubrs::new(subrs);
        assert!(biased.is_empty());
        assert_eq!(biased.resolve(-107), Err(CFFError::InvalidSubroutineIndex));
    }

    #[test]
    fn depth_limit() {
        let mut stack = CallStack::default();
        for i in 0..STACK_LIMIT {
            stack.push(CallContext::new(&[], CharStringKind::LocalSubroutine, i)).unwrap();
        }

        let res = stack.push(CallContext::new(&[], CharStringKind::LocalSubroutine, 0));
        assert_eq!(res.unwrap_err(), CFFError::NestingLimitReached);
        assert_eq!(stack.len(), STACK_LIMIT);

        assert_eq!(stack.pop().unwrap().subr_num, STACK_LIMIT - 1);
    }

    #[test]
    fn pop_empty() {
        let mut stack = CallStack::default();
        assert_eq!(stack.pop().unwrap_err(), CFFError::CallStackUnderflow);
    }
}
