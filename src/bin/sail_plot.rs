use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a propagated sail trajectory CSV as a top-down PNG"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/sail.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 1000)]
    height: u32,
    /// Skip the planet reference orbits
    #[arg(long, default_value_t = false)]
    no_planets: bool,
    /// Draw shapes only: no caption, axes, or legend
    #[arg(long, default_value_t = false)]
    no_annotations: bool,
}

const SEGMENT_COLORS: [u32; 10] = [
    0x750787, 0x004dff, 0x008026, 0xffed00, 0xff8c00, 0xe40303, 0xffffff, 0xffafc8, 0x74d7ee,
    0x613915,
];

/// Planet name and semi-major axis in AU.
const PLANETS: [(&str, f64); 10] = [
    ("Mercury", 0.387),
    ("Venus", 0.723),
    ("Earth", 1.0),
    ("Mars", 1.5),
    ("Ceres", 2.77),
    ("Jupiter", 5.2),
    ("Saturn", 9.58),
    ("Uranus", 19.22),
    ("Neptune", 30.07),
    ("Pluto", 39.48),
];

fn main() -> anyhow::Result<()> {
    solar_sail_calculator::init_tracing();
    let cli = Cli::parse();
    let segments = read_segments(&cli.input)?;
    if segments.is_empty() {
        return Err(anyhow::anyhow!("No trajectory samples in the provided CSV"));
    }

    let rmax = segments
        .values()
        .flatten()
        .map(|(x, y)| x.hypot(*y))
        .fold(0.0_f64, f64::max);
    if !rmax.is_finite() || rmax <= 0.0 {
        return Err(anyhow::anyhow!("Trajectory radius is not finite and positive"));
    }
    let extent = 1.1 * rmax;
    tracing::info!(
        segments = segments.len(),
        rmax,
        output = %cli.output.display(),
        "rendering trajectory"
    );

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&BLACK)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold).color(&WHITE);
    let label_font = FontDesc::new(font_family, 16.0, FontStyle::Normal).color(&WHITE);

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if !cli.no_annotations {
        builder
            .caption("Solar sail trajectory", caption_font)
            .x_label_area_size(50)
            .y_label_area_size(70);
    }
    let mut chart = builder.build_cartesian_2d(-extent..extent, -extent..extent)?;

    if !cli.no_annotations {
        chart
            .configure_mesh()
            .x_desc("x (AU)")
            .y_desc("y (AU)")
            .label_style(label_font.clone())
            .axis_desc_style(label_font.clone())
            .axis_style(&WHITE.mix(0.6))
            .bold_line_style(&WHITE.mix(0.12))
            .light_line_style(&WHITE.mix(0.04))
            .x_labels(6)
            .y_labels(6)
            .draw()?;
    }

    if !cli.no_planets {
        for (index, (_, semi_major_axis)) in PLANETS.iter().enumerate() {
            if *semi_major_axis > extent {
                continue;
            }
            let color = hex_color(SEGMENT_COLORS[index % SEGMENT_COLORS.len()]);
            chart.draw_series(LineSeries::new(
                circle_points(*semi_major_axis, 360),
                &color.mix(0.35),
            ))?;
        }
    }

    chart.draw_series(std::iter::once(Circle::new(
        (0.0, 0.0),
        4,
        RGBColor(0xf9, 0xff, 0xd9).filled(),
    )))?;

    for (index, points) in &segments {
        let color = hex_color(SEGMENT_COLORS[index % SEGMENT_COLORS.len()]);
        let series = chart.draw_series(LineSeries::new(
            points.iter().copied(),
            ShapeStyle::from(&color).stroke_width(2),
        ))?;
        if !cli.no_annotations {
            series
                .label(format!("segment {index}"))
                .legend(move |(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + 16, y)],
                        ShapeStyle::from(&color).stroke_width(2),
                    )
                });
        }
    }

    if !cli.no_annotations {
        chart
            .configure_series_labels()
            .background_style(&BLACK.mix(0.8))
            .border_style(&WHITE.mix(0.5))
            .label_font(label_font.clone())
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn hex_color(hex: u32) -> RGBColor {
    RGBColor((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

fn circle_points(radius: f64, segments: usize) -> impl Iterator<Item = (f64, f64)> {
    (0..=segments).map(move |i| {
        let theta = i as f64 / segments as f64 * TAU;
        (radius * theta.cos(), radius * theta.sin())
    })
}

/// Group projected `(x, y)` samples by segment index.
fn read_segments(path: &str) -> anyhow::Result<BTreeMap<usize, Vec<(f64, f64)>>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("CSV missing '{}' column", name))
    };
    let segment_idx = column("segment")?;
    let x_idx = column("x")?;
    let y_idx = column("y")?;

    let mut segments: BTreeMap<usize, Vec<(f64, f64)>> = BTreeMap::new();
    for rec in rdr.records() {
        let r = rec?;
        let segment: usize = match r.get(segment_idx).and_then(|s| s.parse().ok()) {
            Some(segment) => segment,
            None => continue,
        };
        let x: f64 = r.get(x_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        let y: f64 = r.get(y_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        if x.is_finite() && y.is_finite() {
            segments.entry(segment).or_default().push((x, y));
        }
    }
    Ok(segments)
}
