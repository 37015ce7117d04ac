use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::display::PIXEL_ON;

pub const DEFAULT_BACKGROUND_COLOR: Chip8Color = Chip8Color::new(0, 0, 0);
pub const DEFAULT_FOREGROUND_COLOR: Chip8Color = Chip8Color::new(255, 255, 255);

/// A pixel color laid out as one RGBX8888 texel on little-endian hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C, packed)]
pub struct Chip8Color {
    padding: u8,
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Chip8Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Chip8Color {
        Chip8Color { r, g, b, padding: 0 }
    }
}

/// Paints a screen of on/off pixel words with the given colors.
pub fn colorize(pixels: &[u32], foreground: Chip8Color, background: Chip8Color) -> Vec<Chip8Color> {
    pixels
        .iter()
        .map(|p| if *p == PIXEL_ON { foreground } else { background })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse hex color {0:?}, expected RRGGBB or 0xRRGGBB")]
pub struct Chip8ColorParseError(String);

impl FromStr for Chip8Color {
    type Err = Chip8ColorParseError;

    fn from_str(s: &str) -> Result<Chip8Color, Chip8ColorParseError> {
        let err = || Chip8ColorParseError(s.to_string());
        let hex = s.strip_prefix("0x").unwrap_or(s);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());

        Ok(Chip8Color::new(channel(0)?, channel(2)?, channel(4)?))
    }
}
