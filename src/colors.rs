//! Shared RGB palette

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BLACK: Color = Color(0, 0, 0);
    pub const RED: Color = Color(255, 0, 0);
    pub const GREEN: Color = Color(0, 255, 0);
    pub const BLUE: Color = Color(0, 0, 255);
    pub const CYAN: Color = Color(0, 255, 255);
    pub const MAGENTA: Color = Color(255, 0, 255);
    pub const YELLOW: Color = Color(255, 255, 0);

    pub const THRUST: Color = Color(40, 20, 0);
    pub const DAMAGE_FLASH: Color = Color(40, 0, 0);

    /// Linear blend toward `other` (t clamped to 0..=1)
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Additive tint, saturating per channel
    pub fn tint(self, add: Color) -> Color {
        Color(
            self.0.saturating_add(add.0),
            self.1.saturating_add(add.1),
            self.2.saturating_add(add.2),
        )
    }

    /// Darken toward black by `amount`
    pub fn darken(self, amount: f32) -> Color {
        self.lerp(Color::BLACK, amount)
    }
}
