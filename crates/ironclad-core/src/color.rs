//! Hex RGB color newtype used for all render output.

use serde::{Deserialize, Serialize};

/// 24-bit RGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const GRAY: Color = Color(0x808080);
    pub const GOLD: Color = Color(0xFFD700);
    pub const YELLOW: Color = Color(0xFFFF00);
    pub const LIME: Color = Color(0x00FF00);
    pub const CYAN: Color = Color(0x00FFFF);
    pub const MAGENTA: Color = Color(0xFF00FF);
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x008000);
    pub const BLUE: Color = Color(0x0000FF);
    pub const BROWN: Color = Color(0xA52A2A);

    /// Split into `[r, g, b]` bytes.
    pub fn rgb(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }
}
