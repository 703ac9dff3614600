use core::convert::TryInto;

/// A trait for parsing raw binary data.
///
/// All values are stored in big-endian order.
pub trait FromData: Sized {
    /// Stores an object size in raw data.
    const SIZE: usize;

    /// Parses an object from a raw data.
    ///
    /// `data` is guaranteed to be exactly `SIZE` bytes long.
    fn parse(data: &[u8]) -> Option<Self>;
}

impl FromData for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.first().copied()
    }
}

impl FromData for i16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(i16::from_be_bytes)
    }
}

impl FromData for i32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(i32::from_be_bytes)
    }
}

/// A 16.16 signed fixed-point number.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Fixed(pub i32);

impl Fixed {
    /// Creates a fixed-point value from an integer, wrapping on overflow.
    #[inline]
    pub fn from_i32(n: i32) -> Self {
        Fixed(n.wrapping_shl(16))
    }

    /// Truncates towards negative infinity.
    #[inline]
    pub fn to_i32(self) -> i32 {
        self.0 >> 16
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }
}

impl FromData for Fixed {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        i32::parse(data).map(Fixed)
    }
}

/// A streaming binary parser.
///
/// Copying a `Stream` copies the read position, so a saved copy can be
/// resumed later without affecting the original.
#[derive(Clone, Copy, Default, Debug)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the unread part of the data.
    #[inline]
    pub fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    /// Checks that at least `len` more bytes can be read.
    #[inline]
    pub fn available(&self, len: usize) -> bool {
        self.data.len().saturating_sub(self.offset) >= len
    }

    /// Moves the read position forward.
    ///
    /// Returns `None` without moving when fewer than `len` bytes are left.
    #[inline]
    pub fn advance(&mut self, len: usize) -> Option<()> {
        if self.available(len) {
            self.offset += len;
            Some(())
        } else {
            None
        }
    }

    #[inline]
    pub fn read<T: FromData>(&mut self) -> Option<T> {
        self.read_bytes(T::SIZE).and_then(T::parse)
    }

    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let v = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_big_endian() {
        let mut s = Stream::new(&[0x01, 0xff, 0xfe, 0x00, 0x01, 0x80, 0x00]);
        assert_eq!(s.read::<u8>(), Some(0x01));
        assert_eq!(s.read::<i16>(), Some(-2));
        assert_eq!(s.read::<Fixed>(), Some(Fixed(0x0001_8000)));
        assert!(s.at_end());
        assert_eq!(s.read::<u8>(), None);
    }

    #[test]
    fn over_read_keeps_position() {
        let mut s = Stream::new(&[1, 2, 3]);
        s.read::<u8>();
        assert_eq!(s.read::<i32>(), None);
        assert_eq!(s.offset(), 1);
        assert!(s.advance(3).is_none());
        assert!(s.advance(2).is_some());
        assert!(s.at_end());
    }

    #[test]
    fn copies_are_independent() {
        let mut s = Stream::new(&[1, 2, 3]);
        let saved = s;
        s.read::<i16>();
        assert_eq!(saved.offset(), 0);
        assert_eq!(s.tail(), Some(&[3][..]));
    }

    #[test]
    fn fixed_conversions() {
        assert_eq!(Fixed::from_i32(3).to_i32(), 3);
        assert_eq!(Fixed::from_i32(-3).to_i32(), -3);
        assert_eq!(Fixed(0x0001_8000).to_f32(), 1.5);
        assert_eq!(Fixed(-0x0001_8000).to_i32(), -2);
    }
}
