use log::warn;

use crate::type2::{
    operator, ArgumentsStack, CFFError, CharStringHandler, CharStringInterpreter, Operator, Point, Subroutines,
};

/// A trait for glyph outline construction.
pub trait OutlineBuilder {
    /// Appends a MoveTo segment.
    ///
    /// Start of a contour.
    fn move_to(&mut self, x: f32, y: f32);

    /// Appends a LineTo segment.
    fn line_to(&mut self, x: f32, y: f32);

    /// Appends a CurveTo segment.
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);

    /// Appends a ClosePath segment.
    ///
    /// End of a contour.
    fn close(&mut self);
}

/// A rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// An outlined glyph.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Glyph {
    pub bbox: Rect,
    /// The advance width stored in the charstring, if any.
    ///
    /// It's a difference to the nominal width from the Private DICT.
    pub width: Option<f32>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BBox {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

impl BBox {
    #[inline]
    pub fn new() -> Self {
        BBox {
            x_min: f32::MAX,
            y_min: f32::MAX,
            x_max: f32::MIN,
            y_max: f32::MIN,
        }
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.x_min == f32::MAX && self.y_min == f32::MAX && self.x_max == f32::MIN && self.y_max == f32::MIN
    }

    #[inline]
    pub fn extend_by(&mut self, pt: Point<f32>) {
        self.x_min = self.x_min.min(pt.x);
        self.y_min = self.y_min.min(pt.y);
        self.x_max = self.x_max.max(pt.x);
        self.y_max = self.y_max.max(pt.y);
    }

    pub fn to_rect(&self) -> Result<Rect, CFFError> {
        if self.is_default() {
            return Err(CFFError::ZeroBBox);
        }

        Ok(Rect {
            x_min: f32_to_i16(self.x_min).ok_or(CFFError::BboxOverflow)?,
            y_min: f32_to_i16(self.y_min).ok_or(CFFError::BboxOverflow)?,
            x_max: f32_to_i16(self.x_max).ok_or(CFFError::BboxOverflow)?,
            y_max: f32_to_i16(self.y_max).ok_or(CFFError::BboxOverflow)?,
        })
    }
}

#[inline]
fn f32_to_i16(n: f32) -> Option<i16> {
    if n >= f32::from(i16::MIN) && n <= f32::from(i16::MAX) {
        Some(n as i16)
    } else {
        None
    }
}

struct Builder<'a> {
    builder: &'a mut dyn OutlineBuilder,
    bbox: BBox,
    width: Option<f32>,
    width_processed: bool,
    is_first_move_to: bool,
}

impl CharStringHandler<f32> for Builder<'_> {
    fn check_width(&mut self, op: Operator, stack: &mut ArgumentsStack<f32>) {
        if self.width_processed {
            return;
        }

        // Only the first stack-clearing operator can carry a width,
        // as an extra leading operand.
        let has_width = match op.get() {
            operator::ENDCHAR
            | operator::HORIZONTAL_STEM
            | operator::HORIZONTAL_STEM_HINT_MASK
            | operator::VERTICAL_STEM
            | operator::VERTICAL_STEM_HINT_MASK
            | operator::HINT_MASK
            | operator::COUNTER_MASK => stack.len() % 2 != 0,
            operator::HORIZONTAL_MOVE_TO | operator::VERTICAL_MOVE_TO => stack.len() > 1,
            operator::MOVE_TO => stack.len() > 2,
            _ => return,
        };

        self.width_processed = true;
        if has_width {
            self.width = stack.skip_first();
        }
    }

    fn move_to(&mut self, pt: Point<f32>) {
        if !self.is_first_move_to {
            self.builder.close();
        }

        self.is_first_move_to = false;
        self.bbox.extend_by(pt);
        self.builder.move_to(pt.x, pt.y);
    }

    fn line_to(&mut self, pt: Point<f32>) {
        self.bbox.extend_by(pt);
        self.builder.line_to(pt.x, pt.y);
    }

    fn curve_to(&mut self, pt1: Point<f32>, pt2: Point<f32>, pt3: Point<f32>) {
        self.bbox.extend_by(pt1);
        self.bbox.extend_by(pt2);
        self.bbox.extend_by(pt3);
        self.builder.curve_to(pt1.x, pt1.y, pt2.x, pt2.y, pt3.x, pt3.y);
    }

    fn flush_op(&mut self, op: Operator, _: &[f32]) {
        if op.get() == operator::ENDCHAR && !self.is_first_move_to {
            self.is_first_move_to = true;
            self.builder.close();
        }
    }
}

/// Outlines a glyph.
///
/// Subpaths are closed explicitly, before each new move and at `endchar`.
/// Accented `endchar` operands are ignored.
pub fn outline<'a, S>(
    char_string: &'a [u8],
    global_subrs: &S,
    local_subrs: &S,
    builder: &mut dyn OutlineBuilder,
) -> Result<Glyph, CFFError>
where
    S: Subroutines<'a> + ?Sized,
{
    let mut inner = Builder {
        builder,
        bbox: BBox::new(),
        width: None,
        width_processed: false,
        is_first_move_to: true,
    };

    let mut interpreter = CharStringInterpreter::<f32, S>::new(char_string, global_subrs, local_subrs);
    if let Err(e) = interpreter.interpret(&mut inner) {
        warn!("failed to outline a charstring: {}", e);
        return Err(e);
    }

    Ok(Glyph {
        bbox: inner.bbox.to_rect()?,
        width: inner.width,
    })
}

#[derive(Default)]
struct Bounds {
    bbox: Option<BBox>,
}

impl Bounds {
    fn extend_by(&mut self, pt: Point<f32>) {
        self.bbox.get_or_insert_with(BBox::new).extend_by(pt);
    }
}

impl CharStringHandler<f32> for Bounds {
    fn move_to(&mut self, pt: Point<f32>) {
        self.extend_by(pt);
    }

    fn line_to(&mut self, pt: Point<f32>) {
        self.extend_by(pt);
    }

    fn curve_to(&mut self, pt1: Point<f32>, pt2: Point<f32>, pt3: Point<f32>) {
        self.extend_by(pt1);
        self.extend_by(pt2);
        self.extend_by(pt3);
    }
}

/// Calculates a glyph bounding box without building its outline.
pub fn bounds<'a, S>(
    char_string: &'a [u8],
    global_subrs: &S,
    local_subrs: &S,
) -> Result<Rect, CFFError>
where
    S: Subroutines<'a> + ?Sized,
{
    let mut bounds = Bounds::default();
    let mut interpreter = CharStringInterpreter::<f32, S>::new(char_string, global_subrs, local_subrs);
    if let Err(e) = interpreter.interpret(&mut bounds) {
        warn!("failed to measure a charstring: {}", e);
        return Err(e);
    }

    bounds.bbox.ok_or(CFFError::ZeroBBox)?.to_rect()
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;
    use std::string::String;
    use std::vec::Vec;

    use super::*;
    use crate::writer::{self, Value::*};

    struct Builder(String);
    impl OutlineBuilder for Builder {
        fn move_to(&mut self, x: f32, y: f32) {
            write!(&mut self.0, "M {} {} ", x, y).unwrap();
        }

        fn line_to(&mut self, x: f32, y: f32) {
            write!(&mut self.0, "L {} {} ", x, y).unwrap();
        }

        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            write!(&mut self.0, "C {} {} {} {} {} {} ", x1, y1, x2, y2, x, y).unwrap();
        }

        fn close(&mut self) {
            write!(&mut self.0, "Z ").unwrap();
        }
    }

    fn rect(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Rect {
        Rect { x_min, y_min, x_max, y_max }
    }

    fn parse_char_string(
        global: &[&[writer::Value]],
        local: &[&[writer::Value]],
        values: &[writer::Value],
        builder: &mut Builder,
    ) -> Result<Glyph, CFFError> {
        let global: Vec<Vec<u8>> = global.iter().map(|v| writer::convert(v)).collect();
        let local: Vec<Vec<u8>> = local.iter().map(|v| writer::convert(v)).collect();
        let global: Vec<&[u8]> = global.iter().map(|v| v.as_slice()).collect();
        let local: Vec<&[u8]> = local.iter().map(|v| v.as_slice()).collect();
        let data = writer::convert(values);
        outline(&data, &global[..], &local[..], builder)
    }

    macro_rules! test_cs_with_subrs {
        ($name:ident, $glob:expr, $loc:expr, $values:expr, $path:expr, $rect_res:expr) => {
            #[test]
            fn $name() {
                let mut builder = Builder(String::new());
                let glyph = parse_char_string($glob, $loc, $values, &mut builder).unwrap();

                assert_eq!(builder.0, $path);
                assert_eq!(glyph.bbox, $rect_res);
            }
        };
    }

    macro_rules! test_cs {
        ($name:ident, $values:expr, $path:expr, $rect_res:expr) => {
            test_cs_with_subrs!($name, &[], &[], $values, $path, $rect_res);
        };
    }

    macro_rules! test_cs_err {
        ($name:ident, $values:expr, $err:expr) => {
            #[test]
            fn $name() {
                let mut builder = Builder(String::new());
                let res = parse_char_string(&[], &[], $values, &mut builder);

                assert_eq!(res.unwrap_err().to_string(), $err);
            }
        };
    }

    const ENDCHAR: writer::Value = UInt8(operator::ENDCHAR as u8);
    const MOVE_TO: writer::Value = UInt8(operator::MOVE_TO as u8);
    const HMOVE_TO: writer::Value = UInt8(operator::HORIZONTAL_MOVE_TO as u8);
    const VMOVE_TO: writer::Value = UInt8(operator::VERTICAL_MOVE_TO as u8);
    const LINE_TO: writer::Value = UInt8(operator::LINE_TO as u8);
    const CURVE_TO: writer::Value = UInt8(operator::CURVE_TO as u8);
    const HSTEM: writer::Value = UInt8(operator::HORIZONTAL_STEM as u8);
    const HINT_MASK: writer::Value = UInt8(operator::HINT_MASK as u8);
    const CALL_LOCAL: writer::Value = UInt8(operator::CALL_LOCAL_SUBROUTINE as u8);
    const RETURN: writer::Value = UInt8(operator::RETURN as u8);

    test_cs!(move_to, &[
        CFFInt(10), CFFInt(20), MOVE_TO,
        ENDCHAR,
    ], "M 10 20 Z ",
        rect(10, 20, 10, 20)
    );

    test_cs!(move_to_with_width, &[
        CFFInt(5), CFFInt(10), CFFInt(20), MOVE_TO,
        ENDCHAR,
    ], "M 10 20 Z ",
        rect(10, 20, 10, 20)
    );

    test_cs!(hmove_to_with_width, &[
        CFFInt(10), CFFInt(20), HMOVE_TO,
        ENDCHAR,
    ], "M 20 0 Z ",
        rect(20, 0, 20, 0)
    );

    test_cs!(vmove_to_with_width, &[
        CFFInt(10), CFFInt(20), VMOVE_TO,
        ENDCHAR,
    ], "M 0 20 Z ",
        rect(0, 20, 0, 20)
    );

    test_cs!(line_to_with_multiple_pairs, &[
        CFFInt(10), CFFInt(20), MOVE_TO,
        CFFInt(30), CFFInt(40), CFFInt(50), CFFInt(60), LINE_TO,
        ENDCHAR,
    ], "M 10 20 L 40 60 L 90 120 Z ",
        rect(10, 20, 90, 120)
    );

    test_cs!(curve_to, &[
        CFFInt(10), CFFInt(20), MOVE_TO,
        CFFInt(30), CFFInt(40), CFFInt(50), CFFInt(60), CFFInt(70), CFFInt(80),
        CURVE_TO,
        ENDCHAR,
    ], "M 10 20 C 40 60 90 120 160 200 Z ",
        rect(10, 20, 160, 200)
    );

    test_cs!(two_contours, &[
        CFFInt(10), HMOVE_TO,
        CFFInt(10), CFFInt(10), LINE_TO,
        CFFInt(10), HMOVE_TO,
        CFFInt(-10), CFFInt(-10), LINE_TO,
        ENDCHAR,
    ], "M 10 0 L 20 10 Z M 30 10 L 20 0 Z ",
        rect(10, 0, 30, 10)
    );

    test_cs!(hints_before_move, &[
        CFFInt(0), CFFInt(50), HSTEM,
        CFFInt(10), CFFInt(20), HINT_MASK, UInt8(0b1100_0000),
        CFFInt(10), HMOVE_TO,
        CFFInt(10), CFFInt(10), LINE_TO,
        ENDCHAR,
    ], "M 10 0 L 20 10 Z ",
        rect(10, 0, 20, 10)
    );

    test_cs_with_subrs!(local_subr,
        &[],
        &[&[
            CFFInt(30),
            CFFInt(40),
            LINE_TO,
            RETURN,
        ]],
        &[
            CFFInt(10),
            HMOVE_TO,
            CFFInt(0 - 107), // subr index - subr bias
            CALL_LOCAL,
            ENDCHAR,
        ],
        "M 10 0 L 40 40 Z ",
        rect(10, 0, 40, 40)
    );

    test_cs_err!(only_endchar, &[ENDCHAR], "zero bbox");

    test_cs_err!(missing_endchar, &[
        CFFInt(10), HMOVE_TO,
    ], "the 'endchar' operator is missing");

    test_cs_err!(bbox_overflow, &[
        CFFInt(32767), HMOVE_TO,
        CFFInt(32767), UInt8(operator::HORIZONTAL_LINE_TO as u8),
        ENDCHAR,
    ], "outline's bounding box is too large");

    test_cs_err!(invalid_hflex, &[
        CFFInt(10), HMOVE_TO,
        CFFInt(1), CFFInt(1), CFFInt(1), CFFInt(1), CFFInt(1), CFFInt(1),
        UInt8(12), UInt8(34),
        ENDCHAR,
    ], "an invalid amount of items are in an arguments stack");

    fn width_of(values: &[writer::Value]) -> Option<f32> {
        let mut builder = Builder(String::new());
        parse_char_string(&[], &[], values, &mut builder).unwrap().width
    }

    #[test]
    fn width_detection() {
        assert_eq!(width_of(&[CFFInt(500), CFFInt(0), CFFInt(50), HSTEM, CFFInt(10), HMOVE_TO, ENDCHAR]), Some(500.0));
        assert_eq!(width_of(&[CFFInt(0), CFFInt(50), HSTEM, CFFInt(10), CFFInt(20), HMOVE_TO, ENDCHAR]), None);
        assert_eq!(width_of(&[CFFInt(300), CFFInt(10), CFFInt(20), MOVE_TO, ENDCHAR]), Some(300.0));
        assert_eq!(width_of(&[CFFInt(10), CFFInt(20), MOVE_TO, ENDCHAR]), None);
    }

    #[test]
    fn width_only_glyph() {
        let mut builder = Builder(String::new());
        let res = parse_char_string(&[], &[], &[CFFInt(250), ENDCHAR], &mut builder);
        assert_eq!(res, Err(CFFError::ZeroBBox));
        assert!(builder.0.is_empty());
    }

    #[test]
    fn bounds_match_outline() {
        let data = writer::convert(&[
            CFFInt(10), CFFInt(20), MOVE_TO,
            CFFInt(30), CFFInt(40), CFFInt(50), CFFInt(60), CFFInt(70), CFFInt(80),
            CURVE_TO,
            ENDCHAR,
        ]);
        let subrs: &[&[u8]] = &[];
        assert_eq!(bounds(&data, subrs, subrs), Ok(rect(10, 20, 160, 200)));

        let data = writer::convert(&[ENDCHAR]);
        assert_eq!(bounds(&data, subrs, subrs), Err(CFFError::ZeroBBox));
    }
}
