//! Color specifications for the two split halves
//!
//! Accepts the short matplotlib-style strings analysis scripts commonly pass
//! around: single-letter codes (mapped to seaborn's "deep" palette), grey
//! levels written as a number in `[0, 1]`, and `#rrggbb` hex.

use crate::error::{AnalysisError, Result};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PlotColor {
    pub const SEABORN_BLUE: PlotColor = PlotColor::rgb(0x4C, 0x72, 0xB0);
    pub const SEABORN_GREEN: PlotColor = PlotColor::rgb(0x55, 0xA8, 0x68);
    pub const SEABORN_RED: PlotColor = PlotColor::rgb(0xC4, 0x4E, 0x52);
    pub const SEABORN_PURPLE: PlotColor = PlotColor::rgb(0x81, 0x72, 0xB2);
    pub const SEABORN_YELLOW: PlotColor = PlotColor::rgb(0xCC, 0xB9, 0x74);
    pub const SEABORN_CYAN: PlotColor = PlotColor::rgb(0x64, 0xB5, 0xCD);
    pub const NEAR_BLACK: PlotColor = PlotColor::rgb(0x1A, 0x1A, 0x1A);
    pub const WHITE: PlotColor = PlotColor::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey at `level` (0 = black, 1 = white); out-of-range levels are clamped
    pub fn grey(level: f32) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(v, v, v)
    }

    /// Parse a color string
    ///
    /// # Example
    /// ```
    /// use pplstat::color::PlotColor;
    ///
    /// assert_eq!(PlotColor::parse("b").unwrap(), PlotColor::SEABORN_BLUE);
    /// assert_eq!(PlotColor::parse(".35").unwrap(), PlotColor::rgb(89, 89, 89));
    /// assert_eq!(PlotColor::parse("#ff8000").unwrap(), PlotColor::rgb(255, 128, 0));
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let invalid = || AnalysisError::InvalidColor(spec.to_string());

        match spec {
            "b" => return Ok(Self::SEABORN_BLUE),
            "g" => return Ok(Self::SEABORN_GREEN),
            "r" => return Ok(Self::SEABORN_RED),
            "m" => return Ok(Self::SEABORN_PURPLE),
            "y" => return Ok(Self::SEABORN_YELLOW),
            "c" => return Ok(Self::SEABORN_CYAN),
            "k" => return Ok(Self::NEAR_BLACK),
            "w" => return Ok(Self::WHITE),
            _ => {}
        }

        if let Some(hex) = spec.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let level: f32 = spec.parse().map_err(|_| invalid())?;
        if !(0.0..=1.0).contains(&level) {
            return Err(invalid());
        }
        Ok(Self::grey(level))
    }
}

impl FromStr for PlotColor {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<PlotColor> for RGBColor {
    fn from(c: PlotColor) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_codes() {
        assert_eq!(PlotColor::parse("b").unwrap(), PlotColor::SEABORN_BLUE);
        assert_eq!(PlotColor::parse("r").unwrap(), PlotColor::SEABORN_RED);
        assert_eq!(PlotColor::parse("w").unwrap(), PlotColor::WHITE);
    }

    #[test]
    fn test_grey_levels() {
        assert_eq!(PlotColor::parse("0").unwrap(), PlotColor::rgb(0, 0, 0));
        assert_eq!(PlotColor::parse("1.0").unwrap(), PlotColor::rgb(255, 255, 255));
        assert_eq!(PlotColor::parse("0.5").unwrap(), PlotColor::rgb(128, 128, 128));
    }

    #[test]
    fn test_hex() {
        assert_eq!(
            PlotColor::parse("#4c72b0").unwrap(),
            PlotColor::SEABORN_BLUE
        );
    }

    #[test]
    fn test_invalid_specs() {
        for spec in ["", "blue-ish", "#12345", "#gg0000", "1.5", "-0.2", "#ffé000"] {
            assert!(
                matches!(PlotColor::parse(spec), Err(AnalysisError::InvalidColor(_))),
                "{:?} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_into_plotters_color() {
        let c: RGBColor = PlotColor::rgb(1, 2, 3).into();
        assert_eq!((c.0, c.1, c.2), (1, 2, 3));
    }
}
