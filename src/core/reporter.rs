use crate::core::{Histogram, PriceReport, Storage};
use crate::utils::error::{EtlError, Result};
use plotters::prelude::*;
use std::io::{IsTerminal, Write};
use tokio::io::AsyncBufReadExt;

pub const DEFAULT_BIN_COUNT: usize = 20;
pub const DEFAULT_CURRENCY_UNIT: &str = "руб.";

const CHART_SIZE: (u32, u32) = (1000, 600);
const BAR_FILL: RGBColor = RGBColor(135, 206, 235);
const TEXT_BAR_WIDTH: usize = 50;

/// 圖表輸出方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartTarget {
    /// 在終端畫出長條圖，互動模式下等待 Enter
    Terminal,
    /// 匯出成 SVG，路徑相對於輸出目錄
    Svg(String),
}

impl ChartTarget {
    pub fn from_option(path: Option<&str>) -> Self {
        match path {
            Some(path) => ChartTarget::Svg(path.to_string()),
            None => ChartTarget::Terminal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    pub fn for_currency(currency_unit: &str) -> Self {
        Self {
            title: "Sofa price histogram".to_string(),
            x_label: format!("Price ({})", currency_unit),
            y_label: "Number of sofas".to_string(),
        }
    }
}

/// Arithmetic mean; zero for an empty series.
pub fn mean(prices: &[i64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let sum: i128 = prices.iter().map(|&p| p as i128).sum();
    sum as f64 / prices.len() as f64
}

pub struct Reporter {
    bin_count: usize,
    currency_unit: String,
    target: ChartTarget,
    labels: ChartLabels,
}

impl Reporter {
    pub fn new(bin_count: usize, currency_unit: impl Into<String>, target: ChartTarget) -> Self {
        let currency_unit = currency_unit.into();
        Self {
            bin_count,
            labels: ChartLabels::for_currency(&currency_unit),
            currency_unit,
            target,
        }
    }

    pub async fn report<S: Storage>(&self, storage: &S, prices: &[i64]) -> Result<PriceReport> {
        let mean = mean(prices);
        let histogram = Histogram::from_prices(prices, self.bin_count);
        tracing::info!(
            "Average price {:.2} {} over {} listings",
            mean,
            self.currency_unit,
            prices.len()
        );

        let mut report = PriceReport {
            mean,
            count: prices.len(),
            currency_unit: self.currency_unit.clone(),
            histogram,
            chart_path: None,
        };

        if report.histogram.is_empty() {
            println!("{}", report);
            tracing::warn!("⚠️ No valid prices, skipping histogram");
            return Ok(report);
        }

        match &self.target {
            ChartTarget::Svg(path) => {
                println!("{}", report);
                let svg = render_svg(&report.histogram, &self.labels)?;
                storage.write_file(path, svg.as_bytes()).await?;
                tracing::info!("📈 Histogram exported to {}", path);
                report.chart_path = Some(path.clone());
            }
            ChartTarget::Terminal => {
                {
                    let mut stdout = std::io::stdout().lock();
                    render_terminal(&report, &self.labels, &mut stdout)?;
                    stdout.flush()?;
                }
                wait_for_dismissal().await?;
            }
        }

        Ok(report)
    }
}

fn chart_error<E: std::fmt::Display>(e: E) -> EtlError {
    EtlError::ChartError {
        message: e.to_string(),
    }
}

pub fn render_svg(histogram: &Histogram, labels: &ChartLabels) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let y_max = histogram.max_count() + 1;
        let mut chart = ChartBuilder::on(&root)
            .caption(&labels.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(histogram.lower()..histogram.upper(), 0usize..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(TRANSPARENT)
            .x_desc(labels.x_label.as_str())
            .y_desc(labels.y_label.as_str())
            .x_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(histogram.bins.iter().map(|bin| {
                Rectangle::new([(bin.lower, 0), (bin.upper, bin.count)], BAR_FILL.filled())
            }))
            .map_err(chart_error)?;
        chart
            .draw_series(histogram.bins.iter().map(|bin| {
                Rectangle::new([(bin.lower, 0), (bin.upper, bin.count)], BLACK.stroke_width(1))
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

pub fn render_text<W: Write>(histogram: &Histogram, labels: &ChartLabels, out: &mut W) -> Result<()> {
    let max_count = histogram.max_count().max(1);

    writeln!(out, "{}", labels.title)?;
    writeln!(out, "{} / {}", labels.x_label, labels.y_label)?;
    for bin in &histogram.bins {
        let width = bin.count * TEXT_BAR_WIDTH / max_count;
        writeln!(
            out,
            "{:>12.0} - {:>12.0} | {:<bar$} {}",
            bin.lower,
            bin.upper,
            "#".repeat(width),
            bin.count,
            bar = TEXT_BAR_WIDTH
        )?;
    }
    Ok(())
}

/// 先輸出平均價格，再畫長條圖
pub fn render_terminal<W: Write>(report: &PriceReport, labels: &ChartLabels, out: &mut W) -> Result<()> {
    writeln!(out, "{}", report)?;
    render_text(&report.histogram, labels, out)
}

// 只有在互動終端才阻塞，管線或測試環境直接返回
async fn wait_for_dismissal() -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return Ok(());
    }

    println!("Press Enter to close the chart...");
    let mut line = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(())
}
