//! Visual style presets
//!
//! The five presets mirror the familiar seaborn style names. A theme is a
//! value passed with each render call, never process-wide state.

use crate::color::PlotColor;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Grey background with white grid lines
    Darkgrid,
    /// White background with grey grid lines
    Whitegrid,
    /// Grey background, no grid
    #[default]
    Dark,
    /// White background, no grid
    White,
    /// White background, no grid, outward tick marks
    Ticks,
}

const SEABORN_GREY: PlotColor = PlotColor::rgb(0xEA, 0xEA, 0xF2);
const LIGHT_GRID: PlotColor = PlotColor::rgb(0xCC, 0xCC, 0xCC);

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Darkgrid,
        Theme::Whitegrid,
        Theme::Dark,
        Theme::White,
        Theme::Ticks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Darkgrid => "darkgrid",
            Theme::Whitegrid => "whitegrid",
            Theme::Dark => "dark",
            Theme::White => "white",
            Theme::Ticks => "ticks",
        }
    }

    /// Plot-area background
    pub fn background(self) -> PlotColor {
        match self {
            Theme::Darkgrid | Theme::Dark => SEABORN_GREY,
            Theme::Whitegrid | Theme::White | Theme::Ticks => PlotColor::WHITE,
        }
    }

    /// Horizontal grid line color, if the preset draws a grid
    pub fn grid(self) -> Option<PlotColor> {
        match self {
            Theme::Darkgrid => Some(PlotColor::WHITE),
            Theme::Whitegrid => Some(LIGHT_GRID),
            Theme::Dark | Theme::White | Theme::Ticks => None,
        }
    }

    /// Length of the axis tick marks in pixels
    pub fn tick_size(self) -> i32 {
        match self {
            Theme::Ticks => 6,
            _ => 0,
        }
    }

    /// Color for axes, labels, and quartile lines
    pub fn foreground(self) -> PlotColor {
        PlotColor::rgb(0x26, 0x26, 0x26)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| AnalysisError::UnknownTheme(s.to_string()))
    }
}
