use crate::parser::Fixed;

use super::call_stack::{CharStringKind, Subroutines};
use super::env::{CharStringEnv, Point};
use super::{operator, ArgumentsStack, CFFError, Number, Operator};

/// Receives everything a charstring program produces.
///
/// Every method has an empty default, so an implementation only overrides
/// what it cares about. The handler is passed by `&mut` into every step of
/// the interpretation and can hold any per-glyph state.
pub trait CharStringHandler<N: Number> {
    /// Called before a stack-clearing operator runs, so the handler can pick
    /// the advance width off the stack with `ArgumentsStack::skip_first`.
    fn check_width(&mut self, _op: Operator, _stack: &mut ArgumentsStack<N>) {}

    fn move_to(&mut self, _pt: Point<N>) {}

    fn line_to(&mut self, _pt: Point<N>) {}

    fn curve_to(&mut self, _pt1: Point<N>, _pt2: Point<N>, _pt3: Point<N>) {}

    /// Called once an operator has consumed its operands.
    ///
    /// `args` are the operands still on the stack right before it is cleared.
    /// Move operators have already popped their own coordinates.
    fn flush_op(&mut self, _op: Operator, _args: &[N]) {}

    /// Called for `hintmask` and `cntrmask` together with the mask bytes.
    fn flush_hint_mask(&mut self, op: Operator, args: &[N], _mask: &[u8]) {
        self.flush_op(op, args);
    }
}

/// A handler that ignores everything.
#[derive(Clone, Copy, Default, Debug)]
pub struct NullHandler;

impl<N: Number> CharStringHandler<N> for NullHandler {}

pub(crate) fn process_op<'a, N, S, H>(
    op: Operator,
    env: &mut CharStringEnv<'a, '_, N, S>,
    handler: &mut H,
) -> Result<(), CFFError>
where
    N: Number,
    S: Subroutines<'a> + ?Sized,
    H: CharStringHandler<N> + ?Sized,
{
    match op.get() {
        operator::RETURN => env.return_from_subr()?,
        operator::ENDCHAR => {
            handler.check_width(op, &mut env.stack);
            env.endchar = true;
            flush_args_and_op(op, env, handler);
        }
        operator::FIXED_16_16 => {
            let n = env.stream().read::<Fixed>().ok_or(CFFError::ReadOutOfBounds)?;
            env.stack.push(N::from_fixed(n))?;
        }
        operator::CALL_LOCAL_SUBROUTINE => env.call_subr(CharStringKind::LocalSubroutine)?,
        operator::CALL_GLOBAL_SUBROUTINE => env.call_subr(CharStringKind::GlobalSubroutine)?,
        operator::HORIZONTAL_STEM | operator::HORIZONTAL_STEM_HINT_MASK => {
            handler.check_width(op, &mut env.stack);
            env.hstem_count = env.hstem_count.saturating_add((env.stack.len() / 2) as u32);
            flush_args_and_op(op, env, handler);
        }
        operator::VERTICAL_STEM | operator::VERTICAL_STEM_HINT_MASK => {
            handler.check_width(op, &mut env.stack);
            env.vstem_count = env.vstem_count.saturating_add((env.stack.len() / 2) as u32);
            flush_args_and_op(op, env, handler);
        }
        operator::HINT_MASK | operator::COUNTER_MASK => {
            handler.check_width(op, &mut env.stack);
            env.determine_hintmask_size();
            let size = env.hintmask_size;
            let mask = env.stream().read_bytes(size).ok_or(CFFError::ReadOutOfBounds)?;
            handler.flush_hint_mask(op, env.stack.args(), mask);
            env.stack.clear();
        }
        operator::MOVE_TO => {
            handler.check_width(op, &mut env.stack);
            env.rmoveto(handler)?;
            process_post_move(op, env, handler);
        }
        operator::HORIZONTAL_MOVE_TO => {
            handler.check_width(op, &mut env.stack);
            env.hmoveto(handler)?;
            process_post_move(op, env, handler);
        }
        operator::VERTICAL_MOVE_TO => {
            handler.check_width(op, &mut env.stack);
            env.vmoveto(handler)?;
            process_post_move(op, env, handler);
        }
        operator::LINE_TO => {
            env.rlineto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::HORIZONTAL_LINE_TO => {
            env.hlineto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::VERTICAL_LINE_TO => {
            env.vlineto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::CURVE_TO => {
            env.rrcurveto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::CURVE_LINE => {
            env.rcurveline(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::LINE_CURVE => {
            env.rlinecurve(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::VV_CURVE_TO => {
            env.vvcurveto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::HH_CURVE_TO => {
            env.hhcurveto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::VH_CURVE_TO => {
            env.vhcurveto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::HV_CURVE_TO => {
            env.hvcurveto(handler);
            flush_args_and_op(op, env, handler);
        }
        operator::HFLEX => {
            env.hflex(handler)?;
            flush_args_and_op(op, env, handler);
        }
        operator::FLEX => {
            env.flex(handler)?;
            flush_args_and_op(op, env, handler);
        }
        operator::HFLEX1 => {
            env.hflex1(handler)?;
            flush_args_and_op(op, env, handler);
        }
        operator::FLEX1 => {
            env.flex1(handler)?;
            flush_args_and_op(op, env, handler);
        }
        operator::DOTSECTION => {
            // Deprecated, ignored like a hint.
            flush_args_and_op(op, env, handler);
        }
        _ => parse_number(op, env)?,
    }

    Ok(())
}

fn process_post_move<'a, N, S, H>(
    op: Operator,
    env: &mut CharStringEnv<'a, '_, N, S>,
    handler: &mut H,
) where
    N: Number,
    S: Subroutines<'a> + ?Sized,
    H: CharStringHandler<N> + ?Sized,
{
    if !env.seen_moveto {
        // Stems can't be declared past the first move,
        // so the mask size is known by now.
        if !env.seen_hintmask {
            env.determine_hintmask_size();
        }

        env.seen_moveto = true;
    }

    flush_args_and_op(op, env, handler);
}

fn flush_args_and_op<'a, N, S, H>(
    op: Operator,
    env: &mut CharStringEnv<'a, '_, N, S>,
    handler: &mut H,
) where
    N: Number,
    S: Subroutines<'a> + ?Sized,
    H: CharStringHandler<N> + ?Sized,
{
    handler.flush_op(op, env.stack.args());
    env.stack.clear();
}

/// Decodes a number literal that starts with `op`.
fn parse_number<'a, N, S>(
    op: Operator,
    env: &mut CharStringEnv<'a, '_, N, S>,
) -> Result<(), CFFError>
where
    N: Number,
    S: Subroutines<'a> + ?Sized,
{
    if !op.is_number() {
        // 0, 2, 9, 13, 15, 16, 17 are reserved.
        return Err(if op.is_escaped() {
            CFFError::UnsupportedOperator
        } else {
            CFFError::InvalidOperator
        });
    }

    // Number literals are single-byte operators.
    let b0 = op.get() as u8;
    let n = match b0 {
        28 => {
            let n = env.stream().read::<i16>().ok_or(CFFError::ReadOutOfBounds)?;
            i32::from(n)
        }
        32..=246 => i32::from(b0) - 139,
        247..=250 => {
            let b1 = env.stream().read::<u8>().ok_or(CFFError::ReadOutOfBounds)?;
            (i32::from(b0) - 247) * 256 + i32::from(b1) + 108
        }
        251..=254 => {
            let b1 = env.stream().read::<u8>().ok_or(CFFError::ReadOutOfBounds)?;
            -(i32::from(b0) - 251) * 256 - i32::from(b1) - 108
        }
        // Fixed literals are read by the dispatcher.
        _ => return Err(CFFError::InvalidOperator),
    };

    env.stack.push(N::from_i32(n))
}
