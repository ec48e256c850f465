//! `lsystem-render`: expands a preset and prints its polylines as JSON or SVG.

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use lindenmayer_turtle::{Configuration, InterpreterConfig, LSystemSession, LineDrawing};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Svg,
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Preset line, e.g. "n=4; axiom=F; rules={F: F[+F]F[-F]F}; ..."
    #[arg(required_unless_present = "file")]
    preset: Option<String>,

    /// Read presets from a file, one per line
    #[arg(short, long, conflicts_with = "preset")]
    file: Option<PathBuf>,

    /// Zero-based preset line to use with --file
    #[arg(short, long, default_value_t = 0)]
    line: usize,

    /// Override the preset's generation
    #[arg(short = 'n', long)]
    generation: Option<i64>,

    /// Refuse generations above this
    #[arg(long, default_value_t = 12)]
    max_generation: i64,

    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let line = match (&cli.preset, &cli.file) {
        (Some(preset), _) => preset.clone(),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            text.lines()
                .nth(cli.line)
                .with_context(|| format!("{} has no line {}", path.display(), cli.line))?
                .to_owned()
        }
        (None, None) => bail!("no preset given"),
    };

    let mut config: Configuration = line.parse().context("parsing preset")?;
    let generation = cli.generation.unwrap_or(config.generation as i64);
    if generation > cli.max_generation {
        bail!(
            "generation {generation} exceeds --max-generation {}",
            cli.max_generation
        );
    }
    config.generation = usize::try_from(generation)
        .with_context(|| format!("generation {generation} is negative"))?;

    let mut session = LSystemSession::new(InterpreterConfig::default());
    session.configure(config)?;
    log::info!(
        "generation {} expanded to {} symbols",
        session.generation()?,
        session.text()?.chars().count()
    );

    let drawing = session.finish().context("no interpretation in flight")?;
    log::info!(
        "{} polylines, {} points",
        drawing.polylines().len(),
        drawing.point_count()
    );

    let output = match cli.format {
        Format::Json => serde_json::to_string_pretty(&drawing)?,
        Format::Svg => to_svg(&drawing)?,
    };
    println!("{output}");
    Ok(())
}

fn to_svg(drawing: &LineDrawing) -> Result<String, std::fmt::Error> {
    let (min, max) = drawing.bounds().unwrap_or_default();
    let size = (max - min).max(glam::Vec2::ONE);
    let margin = size.max_element() * 0.02;

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        min.x - margin,
        -max.y - margin,
        size.x + 2.0 * margin,
        size.y + 2.0 * margin
    )?;
    // Turtle space is y-up; SVG is y-down.
    for stroke in drawing.strokes() {
        let points: Vec<String> = stroke
            .iter()
            .map(|p| format!("{:.3},{:.3}", p.x, -p.y))
            .collect();
        writeln!(
            svg,
            r#"  <polyline fill="none" stroke="black" stroke-width="{:.3}" points="{}"/>"#,
            margin / 4.0,
            points.join(" ")
        )?;
    }
    svg.push_str("</svg>");
    Ok(svg)
}
