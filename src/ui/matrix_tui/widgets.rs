use ratatui::style::Color;

use crate::core::dashboard::{Accent, Tint};

/// Terminal color for a palette accent.
pub fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Red => Color::Red,
        Accent::Orange => Color::LightRed,
        Accent::Yellow => Color::Yellow,
        Accent::Green => Color::Green,
        Accent::Cyan => Color::Cyan,
        Accent::Blue => Color::Blue,
        Accent::Magenta => Color::Magenta,
        Accent::White => Color::White,
        Accent::Lime => Color::LightGreen,
    }
}

/// Terminal color for a rain glyph.
pub fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Shadow => Color::Green,
        Tint::Highlight => Color::LightGreen,
        Tint::Accent(accent) => accent_color(accent),
    }
}

pub const DOWNLOAD_COLOR: Color = Color::Cyan;
pub const UPLOAD_COLOR: Color = Color::Magenta;
pub const TICKER_COLOR: Color = Color::Yellow;
