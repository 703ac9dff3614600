use core::fmt;

use super::{CFFError, Number, MAX_ARGUMENTS_STACK_LEN};

/// The charstring operands stack.
///
/// Operands are addressed relative to a base. The base is only moved when a
/// width hook consumes the leading advance-width operand, so every operator
/// sees its own arguments starting at index 0.
pub struct ArgumentsStack<N> {
    data: [N; MAX_ARGUMENTS_STACK_LEN], // 192B for f32
    base: usize,
    len: usize,
}

impl<N: Number> ArgumentsStack<N> {
    pub fn new() -> Self {
        ArgumentsStack {
            data: [N::default(); MAX_ARGUMENTS_STACK_LEN],
            base: 0,
            len: 0,
        }
    }

    /// Returns the number of operands above the base.
    #[inline]
    pub fn len(&self) -> usize {
        self.len - self.base
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn push(&mut self, n: N) -> Result<(), CFFError> {
        if self.len == MAX_ARGUMENTS_STACK_LEN {
            Err(CFFError::ArgumentsStackLimitReached)
        } else {
            self.data[self.len] = n;
            self.len += 1;
            Ok(())
        }
    }

    /// Returns an operand relative to the base.
    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        self.args().get(index).copied()
    }

    /// Callers check `len()` first.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> N {
        self.data[self.base + index]
    }

    #[inline]
    pub fn pop(&mut self) -> Result<N, CFFError> {
        if self.is_empty() {
            return Err(CFFError::InvalidArgumentsStackLength);
        }

        self.len -= 1;
        Ok(self.data[self.len])
    }

    #[inline]
    pub fn pop_i32(&mut self) -> Result<i32, CFFError> {
        self.pop().map(N::to_i32)
    }

    /// Hides the first operand from every following read.
    ///
    /// Returns the hidden operand.
    pub fn skip_first(&mut self) -> Option<N> {
        if self.is_empty() {
            return None;
        }

        let n = self.at(0);
        self.base += 1;
        Some(n)
    }

    /// Returns the operands above the base.
    #[inline]
    pub fn args(&self) -> &[N] {
        &self.data[self.base..self.len]
    }

    #[inline]
    pub fn clear(&mut self) {
        self.base = 0;
        self.len = 0;
    }
}

impl<N: Number> Default for ArgumentsStack<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Number> fmt::Debug for ArgumentsStack<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.args()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop() {
        let mut stack = ArgumentsStack::<f32>::new();
        stack.push(1.0).unwrap();
        stack.push(2.5).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop_i32(), Ok(2));
        assert_eq!(stack.pop(), Ok(1.0));
        assert_eq!(stack.pop(), Err(CFFError::InvalidArgumentsStackLength));
    }

    #[test]
    fn limit() {
        let mut stack = ArgumentsStack::<f32>::new();
        for i in 0..MAX_ARGUMENTS_STACK_LEN {
            stack.push(i as f32).unwrap();
        }

        assert_eq!(stack.push(0.0), Err(CFFError::ArgumentsStackLimitReached));
    }

    #[test]
    fn skip_first_moves_base() {
        let mut stack = ArgumentsStack::<f32>::new();
        for n in [500.0, 10.0, 20.0] {
            stack.push(n).unwrap();
        }

        assert_eq!(stack.skip_first(), Some(500.0));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.at(0), 10.0);
        assert_eq!(stack.args(), &[10.0, 20.0]);
        assert_eq!(format!("{:?}", stack), "[10.0, 20.0]");

        stack.pop().unwrap();
        stack.pop().unwrap();
        assert!(stack.pop().is_err());

        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.skip_first(), None);
    }

    #[test]
    fn out_of_range_get() {
        let mut stack = ArgumentsStack::<f32>::new();
        assert_eq!(stack.get(0), None);
        assert_eq!(stack.get(MAX_ARGUMENTS_STACK_LEN + 1), None);

        stack.push(7.0).unwrap();
        stack.push(8.0).unwrap();
        assert_eq!(stack.get(1), Some(8.0));
        assert_eq!(stack.get(2), None);

        stack.skip_first();
        assert_eq!(stack.get(0), Some(8.0));
        assert_eq!(stack.get(1), None);
    }
}
