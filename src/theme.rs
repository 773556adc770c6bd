//! Zone palette and map styling constants

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PaletteError;

/// 24-bit RGB color, serialized as `#RRGGBB`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || PaletteError::InvalidHex(hex.to_string());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Zone colors, in zone order
pub mod colors {
    use super::Color;

    pub const RED: Color = Color::from_rgb(0xFF, 0x00, 0x00);     // #FF0000
    pub const LIME: Color = Color::from_rgb(0x00, 0xFF, 0x00);    // #00FF00
    pub const BLUE: Color = Color::from_rgb(0x00, 0x00, 0xFF);    // #0000FF
    pub const YELLOW: Color = Color::from_rgb(0xFF, 0xFF, 0x00);  // #FFFF00
    pub const MAGENTA: Color = Color::from_rgb(0xFF, 0x00, 0xFF); // #FF00FF
    pub const CYAN: Color = Color::from_rgb(0x00, 0xFF, 0xFF);    // #00FFFF
    pub const ORANGE: Color = Color::from_rgb(0xFF, 0xA5, 0x00);  // #FFA500
    pub const PURPLE: Color = Color::from_rgb(0x80, 0x00, 0x80);  // #800080
    pub const GREEN: Color = Color::from_rgb(0x00, 0x80, 0x00);   // #008000
    pub const MAROON: Color = Color::from_rgb(0x80, 0x00, 0x00);  // #800000

    pub const ZONE_COLORS: [Color; 10] = [
        RED, LIME, BLUE, YELLOW, MAGENTA, CYAN, ORANGE, PURPLE, GREEN, MAROON,
    ];
}

/// Map presentation defaults
pub mod style {
    /// Marker fill opacity
    pub const FILL_OPACITY: f64 = 0.7;
    /// Initial map center (lat, lon), over the Indonesian archipelago
    pub const MAP_CENTER: [f64; 2] = [-2.5, 118.0];
    pub const MAP_ZOOM: u8 = 5;
    pub const MAP_TILES: &str = "CartoDB dark_matter";
}

/// Ordered zone colors; zone `z` gets `colors[z mod len]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: colors::ZONE_COLORS.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Color of a zone. Wraps around, so any zone id has a color.
    #[inline]
    pub fn color_for(&self, zone: usize) -> Color {
        self.colors[zone % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true for a constructed palette
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
