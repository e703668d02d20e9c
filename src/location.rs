use serde::*;

/// A world tile coordinate packed into 16 bits (x in the high byte).
///
/// The widest configurable world is well under 256 columns and the height is
/// fixed at 7 rows, so both axes fit in a byte.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x << 8) | y) as u16,
        }
    }

    #[inline]
    pub fn from_xy(x: u8, y: u8) -> Self {
        Location {
            packed: ((x as u16) << 8) | y as u16,
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Offset by a signed delta, or `None` when either axis would go negative
    /// or past `u8::MAX`.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let nx = self.x() as i16 + dx as i16;
        let ny = self.y() as i16 + dy as i16;
        if (0..=u8::MAX as i16).contains(&nx) && (0..=u8::MAX as i16).contains(&ny) {
            Some(Location::from_xy(nx as u8, ny as u8))
        } else {
            None
        }
    }

    /// 4-connected (taxicab) distance, the only distance agents can sense.
    pub fn manhattan_to(self, other: Self) -> u32 {
        let dx = (self.x() as i32 - other.x() as i32).unsigned_abs();
        let dy = (self.y() as i32 - other.y() as i32).unsigned_abs();
        dx + dy
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_both_axes() {
        let loc = Location::from_coords(183, 6);
        assert_eq!(loc.x(), 183);
        assert_eq!(loc.y(), 6);
        assert_eq!(Location::from_packed(loc.packed_repr()), loc);
    }

    #[test]
    fn manhattan_is_symmetric() {
        let a = Location::from_xy(0, 3);
        let b = Location::from_xy(16, 5);
        assert_eq!(a.manhattan_to(b), 18);
        assert_eq!(b.manhattan_to(a), 18);
        assert_eq!(a.manhattan_to(a), 0);
    }

    #[test]
    fn offset_rejects_negative_coordinates() {
        let origin = Location::from_xy(0, 0);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(0, -1), None);
        assert_eq!(origin.offset(1, 2), Some(Location::from_xy(1, 2)));
    }
}
