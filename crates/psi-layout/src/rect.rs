//! Packed floating rectangle.
//!
//! Extended toolbar records store the geometry of a floating toolbar in two
//! 32-bit words:
//!
//! | Word | Bits   | Field                           |
//! |------|--------|---------------------------------|
//! | 0    | 0      | floating flag                   |
//! | 0    | 1-16   | x + 0x7FFF                      |
//! | 0    | 17-31  | width (15 bits)                 |
//! | 1    | 0-15   | y + 0x7FFF                      |
//! | 1    | 16-31  | height                          |
//!
//! When the floating flag is clear both words are zero and the rectangle is
//! empty.

use std::fmt;

/// Bias added to x/y so negative coordinates (multi-monitor setups) fit in 16 bits.
pub const COORD_BIAS: i32 = 0x7FFF;

/// Geometry of a toolbar that may float outside the main window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatingRect {
    /// Whether the toolbar is floating.
    pub floating: bool,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FloatingRect {
    /// A floating rectangle with the given geometry.
    #[must_use]
    pub fn floating(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            floating: true,
            x,
            y,
            width,
            height,
        }
    }

    /// Decode the two packed words.
    #[must_use]
    pub fn unpack(geom0: u32, geom1: u32) -> Self {
        if geom0 & 1 == 0 {
            return Self::default();
        }
        let geom0 = geom0 >> 1;
        Self {
            floating: true,
            x: (geom0 & 0xFFFF) as i32 - COORD_BIAS,
            y: (geom1 & 0xFFFF) as i32 - COORD_BIAS,
            width: ((geom0 >> 16) & 0xFFFF) as i32,
            height: ((geom1 >> 16) & 0xFFFF) as i32,
        }
    }

    /// Encode into the two packed words.
    ///
    /// Width and height are clamped at zero and truncated to 15 bits, and
    /// biased coordinates below zero are clamped, matching the layout writer.
    #[must_use]
    pub fn pack(&self) -> (u32, u32) {
        if !self.floating {
            return (0, 0);
        }
        let mut geom0 = (self.width.max(0) as u32) & 0x7FFF;
        let mut geom1 = (self.height.max(0) as u32) & 0x7FFF;
        geom0 <<= 16;
        geom1 <<= 16;
        geom0 |= (self.x.saturating_add(COORD_BIAS).max(0) as u32) & 0xFFFF;
        geom1 |= (self.y.saturating_add(COORD_BIAS).max(0) as u32) & 0xFFFF;
        geom0 <<= 1;
        geom0 |= 1;
        (geom0, geom1)
    }
}

impl fmt::Display for FloatingRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "floating:{} x:{} y:{} w:{} h:{}",
            self.floating, self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_floating_is_empty() {
        let rect = FloatingRect::unpack(0xFFFF_FFFE, 0xFFFF_FFFF);
        assert_eq!(rect, FloatingRect::default());
        assert_eq!(rect.to_string(), "floating:false x:0 y:0 w:0 h:0");
    }

    #[test]
    fn test_unpack_known_words() {
        // x = 10, y = -20, w = 300, h = 40
        let geom0 = (((300u32 << 16) | (10 + 0x7FFF) as u32) << 1) | 1;
        let geom1 = (40u32 << 16) | (0x7FFF - 20) as u32;
        let rect = FloatingRect::unpack(geom0, geom1);
        assert_eq!(rect, FloatingRect::floating(10, -20, 300, 40));
        assert_eq!(rect.to_string(), "floating:true x:10 y:-20 w:300 h:40");
    }

    #[test]
    fn test_pack_round_trip() {
        let rect = FloatingRect::floating(-1200, 35, 640, 32);
        let (geom0, geom1) = rect.pack();
        assert_eq!(FloatingRect::unpack(geom0, geom1), rect);
    }

    #[test]
    fn test_pack_clamps_negative_extent() {
        let rect = FloatingRect::floating(0, 0, -5, -1);
        let (geom0, geom1) = rect.pack();
        let back = FloatingRect::unpack(geom0, geom1);
        assert_eq!((back.width, back.height), (0, 0));
    }
}
