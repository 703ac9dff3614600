use super::call_stack::Subroutines;
use super::env::CharStringEnv;
use super::ops::{process_op, CharStringHandler};
use super::{CFFError, Number};

/// Runs a single Type 2 charstring.
///
/// # Example
///
/// ```
/// use cff_charstring::type2::{CharStringInterpreter, NullHandler};
///
/// let subrs: &[&[u8]] = &[];
/// // 10 hmoveto endchar
/// let data = [149, 22, 14];
/// let mut interpreter = CharStringInterpreter::<f32, _>::new(&data, subrs, subrs);
/// interpreter.interpret(&mut NullHandler).unwrap();
/// assert_eq!(interpreter.env().point().x, 10.0);
/// ```
pub struct CharStringInterpreter<'a, 's, N, S: ?Sized> {
    env: CharStringEnv<'a, 's, N, S>,
}

impl<'a, 's, N: Number, S: Subroutines<'a> + ?Sized> CharStringInterpreter<'a, 's, N, S> {
    pub fn new(char_string: &'a [u8], global_subrs: &'s S, local_subrs: &'s S) -> Self {
        CharStringInterpreter {
            env: CharStringEnv::new(char_string, global_subrs, local_subrs),
        }
    }

    #[inline]
    pub fn env(&self) -> &CharStringEnv<'a, 's, N, S> {
        &self.env
    }

    /// Executes the program until `endchar`.
    ///
    /// Any error stops the execution. Suspended subroutine calls are
    /// dropped, and the handler may have seen part of the outline by then.
    pub fn interpret<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        self.env.endchar = false;

        loop {
            let op = self.env.fetch_op()?;
            process_op(op, &mut self.env, handler)?;
            if self.env.endchar {
                break;
            }
        }

        Ok(())
    }
}
