//! Split violin plot rendering with plotters
//!
//! `plot_groups` trims outliers, estimates the split violins, and returns a
//! [`ViolinFigure`]. The figure can be saved on its own or drawn onto any
//! caller-owned drawing area, so it composes with larger plotters layouts.

use crate::color::PlotColor;
use crate::config::PlotConfig;
use crate::error::{AnalysisError, Result};
use crate::theme::Theme;
use crate::tidy::{TidyTable, GROUP_COLUMN, PERPLEXITY_COLUMN};
use crate::violin::{global_peak_density, split_violins, Side, SplitViolin, VIOLIN_WIDTH};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs::OpenOptions;
use std::path::Path;

/// Output encoding, chosen from the save path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Bitmap,
}

impl ImageFormat {
    /// Resolve the encoding for `path`
    ///
    /// # Errors
    /// `UnsupportedFormat` unless the extension is svg, png, jpg, jpeg or bmp.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("svg") => Ok(ImageFormat::Svg),
            Some("png" | "jpg" | "jpeg" | "bmp") => Ok(ImageFormat::Bitmap),
            _ => Err(AnalysisError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A rendered-ready split violin figure
#[derive(Debug, Clone)]
pub struct ViolinFigure {
    /// One split violin per group
    pub violins: Vec<SplitViolin>,
    /// Rows that survived outlier trimming
    pub data: TidyTable,
    /// Number of rows removed as outliers
    pub excluded: usize,
    pub theme: Theme,
    pub filling: bool,
    /// (with attribute, no attribute) colors
    pub colors: (PlotColor, PlotColor),
    /// Pixel size used by [`ViolinFigure::save`]
    pub size: (u32, u32),
}

/// Render perplexities as split violins, one per group
///
/// Rows with `|z| >= max_z` are excluded first (see [`PlotConfig::max_z`]).
/// When `savepath` is set the figure is written there before returning.
///
/// # Errors
/// * `InvalidConfig` for an invalid `PlotConfig`
/// * `UnsupportedFormat` if the save path has no supported image extension
/// * `Io` if the save path cannot be opened for writing
/// * `Plot` if the drawing backend fails
pub fn plot_groups(table: &TidyTable, config: &PlotConfig) -> Result<ViolinFigure> {
    config.validate().map_err(AnalysisError::InvalidConfig)?;

    let figure = ViolinFigure::build(table, config)?;
    if let Some(path) = &config.savepath {
        figure.save(path)?;
        tracing::info!(path = %path.display(), "saved violin plot");
    }

    Ok(figure)
}

impl ViolinFigure {
    /// Trim outliers and estimate the violins without drawing anything
    pub fn build(table: &TidyTable, config: &PlotConfig) -> Result<Self> {
        let data = table.without_outliers(config.outlier_cutoff());
        let excluded = table.len() - data.len();
        let violins = split_violins(&data)?;

        Ok(Self {
            violins,
            data,
            excluded,
            theme: config.theme,
            filling: config.filling,
            colors: config.colors,
            size: (config.width, config.height),
        })
    }

    pub fn color_for(&self, side: Side) -> PlotColor {
        match side {
            Side::Left => self.colors.0,
            Side::Right => self.colors.1,
        }
    }

    /// Perplexity axis range covering every violin, with 5% padding
    pub fn y_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .violins
            .iter()
            .flat_map(SplitViolin::halves)
            .flat_map(|h| h.support.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            });

        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        let pad = ((hi - lo) * 0.05).max(0.5);
        (lo - pad, hi + pad)
    }

    /// Write the figure to `path`; `.svg` selects SVG, png/jpg/jpeg/bmp a bitmap
    ///
    /// Nothing at `path` is touched unless the format is supported.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)?;

        // Surface unwritable paths as IO errors without truncating
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match format {
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                self.draw_on(&root)?;
                root.present().map_err(plot_err)?;
            }
            ImageFormat::Bitmap => {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                self.draw_on(&root)?;
                root.present().map_err(plot_err)?;
            }
        }
        Ok(())
    }

    /// Draw the figure onto a caller-supplied drawing area
    pub fn draw_on<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let background: RGBColor = self.theme.background().into();
        let foreground: RGBColor = self.theme.foreground().into();

        area.fill(&WHITE).map_err(plot_err)?;

        let categories = self.violins.len().max(1);
        let (y_lo, y_hi) = self.y_range();

        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(categories as f64 - 0.5), y_lo..y_hi)
            .map_err(plot_err)?;

        chart.plotting_area().fill(&background).map_err(plot_err)?;

        let labels: Vec<&str> = self.violins.iter().map(|v| v.group.as_str()).collect();
        let x_formatter = |x: &f64| {
            let nearest = x.round();
            if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
                return String::new();
            }
            labels
                .get(nearest as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        };

        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .x_labels(categories * 2 + 1)
                .x_label_formatter(&x_formatter)
                .x_desc(GROUP_COLUMN)
                .y_desc(PERPLEXITY_COLUMN)
                .axis_style(foreground)
                .label_style(("sans-serif", 14).into_font().color(&foreground))
                .axis_desc_style(("sans-serif", 16).into_font().color(&foreground))
                .set_all_tick_mark_size(self.theme.tick_size());
            match self.theme.grid() {
                Some(grid) => {
                    let grid: RGBColor = grid.into();
                    mesh.bold_line_style(grid.stroke_width(1))
                        .light_line_style(TRANSPARENT);
                }
                None => {
                    mesh.disable_mesh();
                }
            }
            mesh.draw().map_err(plot_err)?;
        }

        let peak = global_peak_density(&self.violins);
        let scale = if peak > 0.0 {
            VIOLIN_WIDTH / 2.0 / peak
        } else {
            0.0
        };

        for violin in &self.violins {
            let center = violin.position as f64;
            for half in violin.halves() {
                let color: RGBColor = self.color_for(half.side).into();
                let edge = if self.filling { foreground } else { color };
                let outline = half.outline(center, scale);

                if self.filling {
                    chart
                        .draw_series(std::iter::once(Polygon::new(
                            outline.clone(),
                            color.mix(0.9).filled(),
                        )))
                        .map_err(plot_err)?;
                }

                let mut closed = outline;
                closed.push(closed[0]);
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        closed,
                        edge.stroke_width(2),
                    )))
                    .map_err(plot_err)?;

                // inner="quart": thin quartiles, thicker median
                let quartiles = half.quartile_lines(center, scale);
                for (i, (x0, x1, y)) in quartiles.into_iter().enumerate() {
                    let width = if i == 1 { 2 } else { 1 };
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            vec![(x0, y), (x1, y)],
                            edge.stroke_width(width),
                        )))
                        .map_err(plot_err)?;
                }
            }
        }

        for side in [Side::Left, Side::Right] {
            let color: RGBColor = self.color_for(side).into();
            let filling = self.filling;
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
                .map_err(plot_err)?
                .label(side.label())
                .legend(move |(x, y)| {
                    let style = if filling {
                        color.filled()
                    } else {
                        color.stroke_width(2)
                    };
                    Rectangle::new([(x, y - 6), (x + 14, y + 6)], style)
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(foreground)
            .label_font(("sans-serif", 14).into_font().color(&foreground))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(plot_err)?;

        Ok(())
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::Plot(e.to_string())
}
