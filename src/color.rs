//! Color selection for chart series: a fixed ordered palette with
//! round-robin cycling, explicit-color seating, and a derived darker
//! "line" color used for marker borders and error bars.
//!
//! Allocator state is scoped to one chart build. Concurrent builds each
//! instantiate their own [`ColorAllocator`] so color sequences stay
//! deterministic.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Engine chart palette, in rotation order. The first entry doubles as the
/// default color for charts with no explicit selection.
pub const PALETTE: [u32; 22] = [
    0x1199FF, // azure
    0xDB4230, // red
    0x4E665D, // slate green
    0xF4A221, // amber
    0x187F53, // green
    0x8C3E8C, // plum
    0x5B9BD5, // light blue
    0x70AD47, // leaf
    0xFFC000, // gold
    0x264478, // dark blue
    0x9E480E, // dark orange
    0x636363, // dark gray
    0x997300, // brown
    0x255E91, // steel
    0x43682B, // olive
    0x7CAFDD, // sky
    0xF1975A, // salmon
    0xB7B7B7, // gray
    0xFFCD33, // light gold
    0x698ED0, // periwinkle
    0xEA7A57, // coral
    0x327DA0, // teal
];

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse `"#1199ff"` or `"1199FF"`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(format!("expected 6 hex digits, got {s:?}"));
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_u32)
            .map_err(|e| format!("bad color {s:?}: {e}"))
    }

    /// Lowercase `#rrggbb` form used in serialized chart output.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct RgbVisitor;

        impl<'de> Visitor<'de> for RgbVisitor {
            type Value = Rgb;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a hex color string or integer RGB value")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rgb, E> {
                Ok(Rgb::from_u32(v as u32))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Rgb, E> {
                Rgb::parse(s).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RgbVisitor)
    }
}

/// A descriptor's color selection. Persisted configurations encode colors as
/// `"auto"`, a hex string (with or without `#`), or a raw integer; all forms
/// are accepted. The legacy `FFFFFF` sentinel also means "auto".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Explicit(Rgb),
}

impl Serialize for ColorChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ColorChoice::Auto => serializer.serialize_str("auto"),
            ColorChoice::Explicit(rgb) => serializer.serialize_str(&rgb.hex()),
        }
    }
}

impl<'de> Deserialize<'de> for ColorChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct ChoiceVisitor;

        impl<'de> Visitor<'de> for ChoiceVisitor {
            type Value = ColorChoice;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "\"auto\", a hex color string, or an integer RGB value")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ColorChoice, E> {
                Ok(ColorChoice::Explicit(Rgb::from_u32(v as u32)))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<ColorChoice, E> {
                if s.eq_ignore_ascii_case("auto") {
                    Ok(ColorChoice::Auto)
                } else {
                    Rgb::parse(s).map(ColorChoice::Explicit).map_err(E::custom)
                }
            }
        }

        deserializer.deserialize_any(ChoiceVisitor)
    }
}

/// Darken (negative percent) or lighten a color by scaling each channel.
/// Line/border colors use `alter_brightness(color, -70.0)`.
pub fn alter_brightness(color: Rgb, percent: f64) -> Rgb {
    let factor = 1.0 + percent / 100.0;
    let scale = |c: u8| -> u8 { ((c as f64) * factor).clamp(0.0, 255.0).round() as u8 };
    Rgb::new(scale(color.r), scale(color.g), scale(color.b))
}

/// Round-robin color source for one chart build.
///
/// The cursor increments on every draw and wraps modulo the palette length.
/// Never share an allocator across builds: later series' colors depend on
/// the cursor position left by earlier ones.
#[derive(Debug, Default)]
pub struct ColorAllocator {
    cursor: usize,
}

impl ColorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next palette color and advance the cursor.
    pub fn next_color(&mut self) -> Rgb {
        let color = Rgb::from_u32(PALETTE[self.cursor % PALETTE.len()]);
        self.cursor += 1;
        color
    }

    /// Seat the rotation at a user-selected color. If `value` is in the
    /// palette the cursor continues from just past it; otherwise the
    /// rotation restarts from the beginning of the palette.
    pub fn config_color(&mut self, value: Rgb) -> Rgb {
        self.cursor = PALETTE
            .iter()
            .position(|&c| Rgb::from_u32(c) == value)
            .unwrap_or(0);
        self.next_color()
    }

    /// Resolve a descriptor's color choice to (series color, line color).
    pub fn for_choice(&mut self, choice: ColorChoice) -> (Rgb, Rgb) {
        let color = match choice {
            ColorChoice::Auto => self.next_color(),
            // Legacy configurations used white as the "auto" sentinel.
            ColorChoice::Explicit(rgb) if rgb == Rgb::new(0xFF, 0xFF, 0xFF) => self.next_color(),
            ColorChoice::Explicit(rgb) => self.config_color(rgb),
        };
        (color, alter_brightness(color, -70.0))
    }
}
