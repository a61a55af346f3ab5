//! The foreground color palette.
//!
//! Styles pick from the sixteen colors every color terminal agrees on: the
//! eight base colors and their light variants. Names follow the terminfo
//! `setaf` numbering:
//!
//! | Index | Name | Index | Name |
//! |-------|------|-------|------|
//! | 0 | `black` | 8 | `light_black` |
//! | 1 | `red` | 9 | `light_red` |
//! | 2 | `green` | 10 | `light_green` |
//! | 3 | `yellow` | 11 | `light_yellow` |
//! | 4 | `blue` | 12 | `light_blue` |
//! | 5 | `purple` | 13 | `light_purple` |
//! | 6 | `cyan` | 14 | `light_cyan` |
//! | 7 | `gray` | 15 | `white` |
//!
//! Parsing also accepts `magenta` for purple, `grey` for gray and a
//! `bright_` prefix in place of `light_`.

use std::fmt;
use std::str::FromStr;

/// One of the sixteen palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    Gray,
    LightBlack,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightPurple,
    LightCyan,
    White,
}

impl Color {
    /// All colors in palette index order.
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Purple,
        Color::Cyan,
        Color::Gray,
        Color::LightBlack,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightPurple,
        Color::LightCyan,
        Color::White,
    ];

    /// Palette index (0–15), as used by terminfo `setaf`.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a color by palette index.
    pub fn from_index(index: u8) -> Option<Color> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Cyan => "cyan",
            Color::Gray => "gray",
            Color::LightBlack => "light_black",
            Color::LightRed => "light_red",
            Color::LightGreen => "light_green",
            Color::LightYellow => "light_yellow",
            Color::LightBlue => "light_blue",
            Color::LightPurple => "light_purple",
            Color::LightCyan => "light_cyan",
            Color::White => "white",
        }
    }

    /// SGR parameter selecting this color as foreground.
    ///
    /// Base colors use `30–37`, light colors the aixterm range `90–97`.
    pub fn sgr(self) -> u8 {
        let index = self.index();
        if index < 8 {
            30 + index
        } else {
            90 + (index - 8)
        }
    }

    /// Parses a color name.
    ///
    /// Supports:
    /// - Base names: `red`, `green`, `purple`, …
    /// - Light variants: `light_red` or `bright_red`
    /// - Aliases: `magenta`, `grey`, `light_magenta`, …
    pub fn parse(name: &str) -> Result<Color, String> {
        let lower = name.trim().to_lowercase();

        if let Some(base) = lower
            .strip_prefix("light_")
            .or_else(|| lower.strip_prefix("bright_"))
        {
            return Self::parse_base(base)
                .filter(|c| *c != Color::Gray)
                .map(|c| Color::from_index(c.index() + 8).unwrap_or(c))
                .ok_or_else(|| format!("Unknown light color: {}", name));
        }

        match lower.as_str() {
            "white" => Ok(Color::White),
            _ => Self::parse_base(&lower).ok_or_else(|| format!("Unknown color name: {}", name)),
        }
    }

    fn parse_base(name: &str) -> Option<Color> {
        let color = match name {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "purple" | "magenta" => Color::Purple,
            "cyan" => Color::Cyan,
            "gray" | "grey" => Color::Gray,
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}
