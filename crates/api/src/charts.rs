//! SVG Charts
//!
//! Bar charts for the feature importances and the hourly accident counts,
//! rendered in memory with plotters.

use dataset::HourlyCounts;
use inference_engine::FeatureImportance;
use plotters::prelude::*;
use thiserror::Error;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 480;

/// Viridis stops, one per model feature
const VIRIDIS: [RGBColor; 6] = [
    RGBColor(68, 1, 84),
    RGBColor(65, 68, 135),
    RGBColor(42, 120, 142),
    RGBColor(34, 168, 132),
    RGBColor(122, 209, 81),
    RGBColor(253, 231, 37),
];

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("Nothing to chart")]
    Empty,
}

struct BarChart<'a> {
    title: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    labels: Vec<String>,
    values: Vec<f64>,
    colors: Vec<RGBColor>,
}

/// Feature importance bar chart
pub fn feature_importance_svg(importances: &[FeatureImportance]) -> Result<String, ChartError> {
    render_bars(&BarChart {
        title: "Importancia de Variables",
        x_desc: "Características",
        y_desc: "Importancia",
        labels: importances.iter().map(|i| i.feature.to_string()).collect(),
        values: importances.iter().map(|i| i.importance).collect(),
        colors: (0..importances.len())
            .map(|i| VIRIDIS[i % VIRIDIS.len()])
            .collect(),
    })
}

/// Accidents per hour of day
pub fn hourly_svg(hourly: &HourlyCounts) -> Result<String, ChartError> {
    let counts = hourly.counts();
    let last = (counts.len() - 1) as f64;
    render_bars(&BarChart {
        title: "Accidentes por Hora del Día",
        x_desc: "Hora del Día",
        y_desc: "Cantidad de Accidentes",
        labels: (0..counts.len()).map(|h| h.to_string()).collect(),
        values: counts.iter().map(|&c| c as f64).collect(),
        colors: (0..counts.len()).map(|h| coolwarm(h as f64 / last)).collect(),
    })
}

/// Diverging blue-to-red palette, `t` in [0, 1]
fn coolwarm(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let (from, to, s) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * s).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn render_bars(spec: &BarChart<'_>) -> Result<String, ChartError> {
    let n = spec.values.len();
    if n == 0 {
        return Err(ChartError::Empty);
    }

    let peak = spec.values.iter().cloned().fold(0.0, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)
            .map_err(render_err)?;

        let labels = &spec.labels;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(spec.x_desc)
            .y_desc(spec.y_desc)
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                spec.values
                    .iter()
                    .zip(&spec.colors)
                    .enumerate()
                    .map(|(i, (&value, color))| {
                        let mut bar = Rectangle::new(
                            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
                            color.filled(),
                        );
                        bar.set_margin(0, 0, 4, 4);
                        bar
                    }),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}
