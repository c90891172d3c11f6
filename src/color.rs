//! Color values, parsing and 256-color reduction.
//!
//! This module provides:
//! - The `Color` RGB value type used by flags and the palette
//! - Parsing of the color notations accepted in flag catalogues
//! - Reduction of 24-bit colors onto the 6×6×6 cube of 256-color terminals

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use regex::Regex;

/// Offset of the 6×6×6 color cube within the 256-color palette.
///
/// Indices 0-15 are the standard and high intensity colors, 232-255 the
/// grayscale ramp. Reduction never produces either range.
const CUBE_OFFSET: u8 = 16;

/// Number of steps per channel in the color cube.
const CUBE_STEPS: u16 = 6;

static RGB_FUNCTION: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^rgb\((\d+),\s*(\d+),\s*(\d+)\)$"));

/// An RGB color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Color {
    /// Create a new color from individual components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` integer.
    ///
    /// Bits above the low 24 are ignored.
    ///
    /// ```
    /// # use pridecat::color::Color;
    /// assert_eq!(Color::from_packed(0xE4_03_03), Color::new(0xE4, 0x03, 0x03));
    /// ```
    #[must_use]
    pub const fn from_packed(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Index of the nearest color cube entry in the 256-color palette.
    ///
    /// Each channel is bucketed with `channel * 6 / 256`, so the six
    /// buckets have equal width. This is a bucketing transform, not a
    /// nearest-distance search, and it never maps onto the base colors
    /// (0-15) or the grayscale ramp (232-255).
    ///
    /// ```
    /// # use pridecat::color::Color;
    /// assert_eq!(Color::new(0, 0, 0).to_ansi256(), 16);
    /// assert_eq!(Color::new(255, 255, 255).to_ansi256(), 231);
    /// ```
    #[must_use]
    pub fn to_ansi256(self) -> u8 {
        // 255 * 6 / 256 = 5, so every bucket fits in a u8
        #[allow(clippy::cast_possible_truncation)]
        let bucket = |channel: u8| (u16::from(channel) * CUBE_STEPS / 256) as u8;

        CUBE_OFFSET + 36 * bucket(self.r) + 6 * bucket(self.g) + bucket(self.b)
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Self::from_packed(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Parse a color string into a `Color`.
///
/// Supported notations:
/// - `#RRGGBB` - Standard hex color format
/// - `#RRGGBBAA` - Hex color with alpha (alpha ignored)
/// - `rgb:RR/GG/BB` or `rgb:RRRR/GGGG/BBBB` - X11 format
/// - `rgb(R, G, B)` - CSS-style RGB function
///
/// # Errors
///
/// Returns an error if the string is not in one of the notations above or
/// if a component is out of range.
///
/// # Examples
///
/// ```
/// # use pridecat::color::{Color, parse_color};
/// assert_eq!(parse_color("#ff8c00").unwrap(), Color::new(255, 140, 0));
/// assert_eq!(parse_color("rgb(255, 140, 0)").unwrap(), Color::new(255, 140, 0));
/// assert_eq!(parse_color("rgb:ff/8c/00").unwrap(), Color::new(255, 140, 0));
/// ```
pub fn parse_color(s: &str) -> Result<Color> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 && hex.len() != 8 {
            return Err(anyhow!(
                "Invalid hex color length: expected 6 or 8 digits, got {}",
                hex.len()
            ));
        }
        let channel = |range: std::ops::Range<usize>| -> Result<u8> {
            let digits = hex
                .get(range)
                .ok_or_else(|| anyhow!("Invalid hex color: {s}"))?;
            u8::from_str_radix(digits, 16)
                .with_context(|| format!("Failed to parse hex component: {digits}"))
        };
        return Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
    }

    if let Some(color_part) = s.strip_prefix("rgb:") {
        let parts: Vec<&str> = color_part.split('/').collect();
        if parts.len() != 3 {
            return Err(anyhow!(
                "Invalid rgb: format - expected 3 components, got {}",
                parts.len()
            ));
        }
        let r = hex_to_u8(parts[0])
            .with_context(|| format!("Failed to parse red component: {}", parts[0]))?;
        let g = hex_to_u8(parts[1])
            .with_context(|| format!("Failed to parse green component: {}", parts[1]))?;
        let b = hex_to_u8(parts[2])
            .with_context(|| format!("Failed to parse blue component: {}", parts[2]))?;
        return Ok(Color::new(r, g, b));
    }

    let re = RGB_FUNCTION
        .as_ref()
        .map_err(|err| anyhow!("Failed to compile RGB regex: {err}"))?;
    if let Some(caps) = re.captures(s) {
        let r = caps[1]
            .parse::<u8>()
            .with_context(|| format!("Failed to parse red component: {}", &caps[1]))?;
        let g = caps[2]
            .parse::<u8>()
            .with_context(|| format!("Failed to parse green component: {}", &caps[2]))?;
        let b = caps[3]
            .parse::<u8>()
            .with_context(|| format!("Failed to parse blue component: {}", &caps[3]))?;
        return Ok(Color::new(r, g, b));
    }

    Err(anyhow!("Unrecognized color format: {s}"))
}

/// Convert an X11 hex component to u8.
///
/// Two digit components are taken as is, four digit components are scaled
/// down from the 16-bit range.
fn hex_to_u8(hex: &str) -> Result<u8> {
    let n = u32::from_str_radix(hex, 16).with_context(|| format!("Invalid hex string: {hex}"))?;

    match hex.len() {
        2 => {
            #[allow(clippy::cast_possible_truncation)]
            Ok(n as u8)
        }
        4 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(((f64::from(n) / 65535.0) * 255.0).round() as u8)
        }
        _ => Err(anyhow!(
            "Invalid hex length: expected 2 or 4 characters, got {}",
            hex.len()
        )),
    }
}
