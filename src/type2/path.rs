//! Path construction operators.
//!
//! Every operator consumes the whole arguments stack and groups it into
//! lines and curves. Points are built from offsets relative to the previous
//! point, and the current point only changes through the `emit_*` functions
//! after the handler has seen the segment.

use super::call_stack::Subroutines;
use super::env::{CharStringEnv, Point};
use super::{f32_abs, CFFError, CharStringHandler, Number};

impl<'a, 's, N: Number, S: Subroutines<'a> + ?Sized> CharStringEnv<'a, 's, N, S> {
    #[inline]
    fn arg(&self, index: usize) -> N {
        self.stack.at(index)
    }

    #[inline]
    fn emit_move<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H, pt: Point<N>) {
        handler.move_to(pt);
        self.set_point(pt);
    }

    #[inline]
    fn emit_line<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H, pt: Point<N>) {
        handler.line_to(pt);
        self.set_point(pt);
    }

    #[inline]
    fn emit_curve<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
        pt1: Point<N>,
        pt2: Point<N>,
        pt3: Point<N>,
    ) {
        handler.curve_to(pt1, pt2, pt3);
        self.set_point(pt3);
    }

    /// Emits a line to the offset stored at `i`, `i + 1`.
    fn line_at<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H, i: usize) {
        let mut pt1 = self.point();
        pt1.move_by(self.arg(i), self.arg(i + 1));
        self.emit_line(handler, pt1);
    }

    /// Emits a curve from the six offsets starting at `i`.
    fn curve_at<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H, i: usize) {
        let mut pt1 = self.point();
        pt1.move_by(self.arg(i), self.arg(i + 1));
        let mut pt2 = pt1;
        pt2.move_by(self.arg(i + 2), self.arg(i + 3));
        let mut pt3 = pt2;
        pt3.move_by(self.arg(i + 4), self.arg(i + 5));
        self.emit_curve(handler, pt1, pt2, pt3);
    }

    pub(crate) fn rmoveto<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        let dy = self.stack.pop()?;
        let dx = self.stack.pop()?;
        let mut pt1 = self.point();
        pt1.move_by(dx, dy);
        self.emit_move(handler, pt1);
        Ok(())
    }

    pub(crate) fn hmoveto<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        let mut pt1 = self.point();
        pt1.move_x(self.stack.pop()?);
        self.emit_move(handler, pt1);
        Ok(())
    }

    pub(crate) fn vmoveto<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        let mut pt1 = self.point();
        pt1.move_y(self.stack.pop()?);
        self.emit_move(handler, pt1);
        Ok(())
    }

    // {dxa dya}+ rlineto
    //
    // An odd trailing operand has no pair and is dropped.
    pub(crate) fn rlineto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        let len = self.stack.len();
        let mut i = 0;
        while i + 2 <= len {
            self.line_at(handler, i);
            i += 2;
        }
    }

    // dx1 {dya dxb}* hlineto
    // {dxa dyb}+ hlineto
    pub(crate) fn hlineto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        self.alternating_lines(handler, true);
    }

    // dy1 {dxa dyb}* vlineto
    // {dya dxb}+ vlineto
    pub(crate) fn vlineto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        self.alternating_lines(handler, false);
    }

    fn alternating_lines<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
        horizontal: bool,
    ) {
        let len = self.stack.len();
        let mut i = 0;
        while i + 2 <= len {
            let mut pt1 = self.point();
            Self::move_axis(&mut pt1, horizontal, self.arg(i));
            self.emit_line(handler, pt1);
            Self::move_axis(&mut pt1, !horizontal, self.arg(i + 1));
            self.emit_line(handler, pt1);
            i += 2;
        }

        if i < len {
            let mut pt1 = self.point();
            Self::move_axis(&mut pt1, horizontal, self.arg(i));
            self.emit_line(handler, pt1);
        }
    }

    // {dxa dya dxb dyb dxc dyc}+ rrcurveto
    pub(crate) fn rrcurveto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        let len = self.stack.len();
        let mut i = 0;
        while i + 6 <= len {
            self.curve_at(handler, i);
            i += 6;
        }
    }

    // {dxa dya dxb dyb dxc dyc}+ dxd dyd rcurveline
    pub(crate) fn rcurveline<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        let len = self.stack.len();
        let mut i = 0;
        while i + 6 <= len {
            self.curve_at(handler, i);
            i += 6;
        }

        while i + 2 <= len {
            self.line_at(handler, i);
            i += 2;
        }
    }

    // {dxa dya}+ dxb dyb dxc dyc dxd dyd rlinecurve
    pub(crate) fn rlinecurve<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        let len = self.stack.len();
        let line_limit = len % 6;
        let mut i = 0;
        while i + 2 <= line_limit {
            self.line_at(handler, i);
            i += 2;
        }

        while i + 6 <= len {
            self.curve_at(handler, i);
            i += 6;
        }
    }

    // dx1? {dya dxb dyb dyc}+ vvcurveto
    pub(crate) fn vvcurveto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        let len = self.stack.len();
        let mut i = 0;
        let mut pt1 = self.point();
        if len % 2 != 0 {
            pt1.move_x(self.arg(0));
            i += 1;
        }

        while i + 4 <= len {
            pt1.move_y(self.arg(i));
            let mut pt2 = pt1;
            pt2.move_by(self.arg(i + 1), self.arg(i + 2));
            let mut pt3 = pt2;
            pt3.move_y(self.arg(i + 3));
            self.emit_curve(handler, pt1, pt2, pt3);
            pt1 = self.point();
            i += 4;
        }
    }

    // dy1? {dxa dxb dyb dxc}+ hhcurveto
    pub(crate) fn hhcurveto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        let len = self.stack.len();
        let mut i = 0;
        let mut pt1 = self.point();
        if len % 2 != 0 {
            pt1.move_y(self.arg(0));
            i += 1;
        }

        while i + 4 <= len {
            pt1.move_x(self.arg(i));
            let mut pt2 = pt1;
            pt2.move_by(self.arg(i + 1), self.arg(i + 2));
            let mut pt3 = pt2;
            pt3.move_x(self.arg(i + 3));
            self.emit_curve(handler, pt1, pt2, pt3);
            pt1 = self.point();
            i += 4;
        }
    }

    // dy1 dx2 dy2 dx3 {dxa dxb dyb dyc dyd dxe dye dxf}* dyf? vhcurveto
    // {dya dxb dyb dxc dxd dxe dye dyf}+ dxf? vhcurveto
    pub(crate) fn vhcurveto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        self.alternating_curves(handler, false);
    }

    // dx1 dx2 dy2 dy3 {dya dxb dyb dxc dxd dxe dye dyf}* dxf? hvcurveto
    // {dxa dxb dyb dyc dyd dxe dye dxf}+ dyf? hvcurveto
    pub(crate) fn hvcurveto<H: CharStringHandler<N> + ?Sized>(&mut self, handler: &mut H) {
        self.alternating_curves(handler, true);
    }

    #[inline]
    fn move_axis(pt: &mut Point<N>, horizontal: bool, d: N) {
        if horizontal {
            pt.move_x(d)
        } else {
            pt.move_y(d)
        }
    }

    fn alternating_curves<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
        horizontal: bool,
    ) {
        let len = self.stack.len();
        let mut i = 0;
        if len % 8 >= 4 {
            // A leading 4-operand curve, then pairs of curves starting
            // on the other axis.
            let mut pt1 = self.point();
            Self::move_axis(&mut pt1, horizontal, self.arg(0));
            let mut pt2 = pt1;
            pt2.move_by(self.arg(1), self.arg(2));
            let mut pt3 = pt2;
            Self::move_axis(&mut pt3, !horizontal, self.arg(3));
            i += 4;

            while i + 8 <= len {
                self.emit_curve(handler, pt1, pt2, pt3);
                pt1 = self.point();
                Self::move_axis(&mut pt1, !horizontal, self.arg(i));
                pt2 = pt1;
                pt2.move_by(self.arg(i + 1), self.arg(i + 2));
                pt3 = pt2;
                Self::move_axis(&mut pt3, horizontal, self.arg(i + 3));
                self.emit_curve(handler, pt1, pt2, pt3);

                pt1 = pt3;
                Self::move_axis(&mut pt1, horizontal, self.arg(i + 4));
                pt2 = pt1;
                pt2.move_by(self.arg(i + 5), self.arg(i + 6));
                pt3 = pt2;
                Self::move_axis(&mut pt3, !horizontal, self.arg(i + 7));
                i += 8;
            }

            if i < len {
                Self::move_axis(&mut pt3, horizontal, self.arg(i));
            }

            self.emit_curve(handler, pt1, pt2, pt3);
        } else {
            while i + 8 <= len {
                let mut pt1 = self.point();
                Self::move_axis(&mut pt1, horizontal, self.arg(i));
                let mut pt2 = pt1;
                pt2.move_by(self.arg(i + 1), self.arg(i + 2));
                let mut pt3 = pt2;
                Self::move_axis(&mut pt3, !horizontal, self.arg(i + 3));
                self.emit_curve(handler, pt1, pt2, pt3);

                pt1 = pt3;
                Self::move_axis(&mut pt1, !horizontal, self.arg(i + 4));
                pt2 = pt1;
                pt2.move_by(self.arg(i + 5), self.arg(i + 6));
                pt3 = pt2;
                Self::move_axis(&mut pt3, horizontal, self.arg(i + 7));
                // The trailing operand belongs to the last pair of curves only.
                if len - i < 16 && len % 2 != 0 {
                    Self::move_axis(&mut pt3, !horizontal, self.arg(i + 8));
                }

                self.emit_curve(handler, pt1, pt2, pt3);
                i += 8;
            }
        }
    }

    fn emit_curve2<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
        pts: [Point<N>; 6],
    ) {
        self.emit_curve(handler, pts[0], pts[1], pts[2]);
        self.emit_curve(handler, pts[3], pts[4], pts[5]);
    }

    fn expect_args(&self, len: usize) -> Result<(), CFFError> {
        if self.stack.len() == len {
            Ok(())
        } else {
            Err(CFFError::InvalidArgumentsStackLength)
        }
    }

    // dx1 dx2 dy2 dx3 dx4 dx5 dx6 hflex
    pub(crate) fn hflex<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        self.expect_args(7)?;

        let mut pt1 = self.point();
        pt1.move_x(self.arg(0));
        let mut pt2 = pt1;
        pt2.move_by(self.arg(1), self.arg(2));
        let mut pt3 = pt2;
        pt3.move_x(self.arg(3));
        let mut pt4 = pt3;
        pt4.move_x(self.arg(4));
        let mut pt5 = pt4;
        pt5.move_x(self.arg(5));
        pt5.y = pt1.y;
        let mut pt6 = pt5;
        pt6.move_x(self.arg(6));

        self.emit_curve2(handler, [pt1, pt2, pt3, pt4, pt5, pt6]);
        Ok(())
    }

    // dx1 dy1 dx2 dy2 dx3 dy3 dx4 dy4 dx5 dy5 dx6 dy6 fd flex
    //
    // The flex depth is a hinting parameter and isn't used.
    pub(crate) fn flex<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        self.expect_args(13)?;

        let mut pts = [self.point(); 6];
        let mut prev = self.point();
        for (n, pt) in pts.iter_mut().enumerate() {
            prev.move_by(self.arg(n * 2), self.arg(n * 2 + 1));
            *pt = prev;
        }

        self.emit_curve2(handler, pts);
        Ok(())
    }

    // dx1 dy1 dx2 dy2 dx3 dx4 dx5 dy5 dx6 hflex1
    pub(crate) fn hflex1<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        self.expect_args(9)?;

        let mut pt1 = self.point();
        pt1.move_by(self.arg(0), self.arg(1));
        let mut pt2 = pt1;
        pt2.move_by(self.arg(2), self.arg(3));
        let mut pt3 = pt2;
        pt3.move_x(self.arg(4));
        let mut pt4 = pt3;
        pt4.move_x(self.arg(5));
        let mut pt5 = pt4;
        pt5.move_by(self.arg(6), self.arg(7));
        let mut pt6 = pt5;
        pt6.move_x(self.arg(8));
        pt6.y = self.point().y;

        self.emit_curve2(handler, [pt1, pt2, pt3, pt4, pt5, pt6]);
        Ok(())
    }

    // dx1 dy1 dx2 dy2 dx3 dy3 dx4 dy4 dx5 dy5 d6 flex1
    pub(crate) fn flex1<H: CharStringHandler<N> + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), CFFError> {
        self.expect_args(11)?;

        let mut d = Point::<N>::default();
        for i in (0..10).step_by(2) {
            d.move_by(self.arg(i), self.arg(i + 1));
        }

        let start = self.point();
        let mut pts = [start; 6];
        let mut prev = start;
        for (n, pt) in pts.iter_mut().take(5).enumerate() {
            prev.move_by(self.arg(n * 2), self.arg(n * 2 + 1));
            *pt = prev;
        }

        // The last point stays on the start line of the dominant axis.
        let mut pt6 = prev;
        if f32_abs(d.x.to_f32()) > f32_abs(d.y.to_f32()) {
            pt6.move_x(self.arg(10));
            pt6.y = start.y;
        } else {
            pt6.x = start.x;
            pt6.move_y(self.arg(10));
        }
        pts[5] = pt6;

        self.emit_curve2(handler, pts);
        Ok(())
    }
}
