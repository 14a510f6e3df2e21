use crate::domain::model::{Chart, ChartKind};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::{EtlError, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const CHART_SIZE: (u32, u32) = (800, 500);
const BAR_COLOR: RGBColor = RGBColor(255, 165, 0);

fn chart_error<E: std::fmt::Display>(e: E) -> EtlError {
    EtlError::ChartError {
        message: e.to_string(),
    }
}

/// 以 plotters 的 SVG backend 將圖表寫成 `<name>.svg`
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    output_dir: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn draw(&self, chart: &Chart, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let slots = chart.points.len().max(1) as i32;
        let max_value = chart
            .points
            .iter()
            .map(|(_, value)| *value)
            .fold(0.0_f64, f64::max);
        let y_top = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.title.as_str(), ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_top)
            .map_err(chart_error)?;

        let labels: Vec<&str> = chart.points.iter().map(|(label, _)| label.as_str()).collect();
        let label_formatter = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|label| label.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&label_formatter)
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(chart_error)?;

        match chart.kind {
            ChartKind::Line => {
                let points: Vec<(SegmentValue<i32>, f64)> = chart
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, (_, value))| (SegmentValue::CenterOf(i as i32), *value))
                    .collect();

                ctx.draw_series(LineSeries::new(points.clone(), &BLUE))
                    .map_err(chart_error)?;
                ctx.draw_series(
                    points
                        .into_iter()
                        .map(|point| Circle::new(point, 4, BLUE.filled())),
                )
                .map_err(chart_error)?;
            }
            ChartKind::Bar => {
                ctx.draw_series(chart.points.iter().enumerate().map(|(i, (_, value))| {
                    let i = i as i32;
                    let mut bar = Rectangle::new(
                        [
                            (SegmentValue::Exact(i), 0.0),
                            (SegmentValue::Exact(i + 1), *value),
                        ],
                        BAR_COLOR.filled(),
                    );
                    bar.set_margin(0, 0, 8, 8);
                    bar
                }))
                .map_err(chart_error)?;
            }
        }

        root.present().map_err(chart_error)?;
        Ok(())
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &Chart) -> Result<String> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.svg", chart.name));

        tracing::debug!("Rendering {} chart to {}", chart.name, path.display());
        self.draw(chart, &path)?;

        Ok(path.to_string_lossy().into_owned())
    }
}

/// `--no-charts` 時使用
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChartRenderer;

impl ChartRenderer for NoopChartRenderer {
    fn render(&self, chart: &Chart) -> Result<String> {
        tracing::debug!("Skipping {} chart", chart.name);
        Ok(String::new())
    }
}
