use anyhow::{Context, Result};
use clap::Parser;
use pplstat::cli::{Cli, OutputFormat};
use pplstat::report::{format_text, JsonPlotSummary, JsonReport};
use pplstat::{compare_dict, input, plot_groups, tidy_table};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber
///
/// Warnings always reach stderr so the normality advisory is never lost;
/// `--debug` opens everything up to TRACE.
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let document = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let dict = input::parse_document(&document)
        .with_context(|| format!("Failed to parse {}", cli.input.display()))?;

    let significance = cli.significance_config();
    let comparison =
        compare_dict(&dict, &significance).context("Failed to compare perplexity groups")?;

    let plot = match &cli.plot {
        Some(path) => {
            let figure = plot_groups(&tidy_table(&dict), &cli.plot_config())
                .with_context(|| format!("Failed to render plot to {}", path.display()))?;
            Some(JsonPlotSummary {
                path: path.display().to_string(),
                plotted_rows: figure.data.len(),
                excluded_outliers: figure.excluded,
            })
        }
        None => None,
    };

    match cli.format {
        OutputFormat::Text => {
            print!("{}", format_text(&comparison, significance.significance_level));
            if let Some(plot) = &plot {
                println!(
                    "Plot saved to {} ({} rows, {} outliers excluded)",
                    plot.path, plot.plotted_rows, plot.excluded_outliers
                );
            }
        }
        OutputFormat::Json => {
            let report = JsonReport {
                comparison,
                significance_level: significance.significance_level,
                plot,
            };
            println!("{}", report.to_json().context("Failed to serialize report")?);
        }
    }

    Ok(())
}
