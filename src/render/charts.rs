use crate::domain::model::{CustomerRecord, CustomerTable};
use crate::utils::error::{DashboardError, Result};
use plotters::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

const KDE_GRID_POINTS: usize = 200;
const DASH_COUNT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn to_plotters(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

const REFERENCE_GREEN: Rgb = Rgb(0, 128, 0);
const REFERENCE_RED: Rgb = Rgb(214, 39, 40);
const SKY_BLUE: Rgb = Rgb(135, 206, 235);
const KDE_BLUE: Rgb = Rgb(70, 130, 180);

/// Diverging blue-grey-red palette, `t` in [0, 1].
pub fn coolwarm(t: f64) -> Rgb {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let (from, to, local) = if t <= 0.5 {
        (COLD, MID, t * 2.0)
    } else {
        (MID, WARM, (t - 0.5) * 2.0)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * local).round() as u8;
    Rgb(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub num_products: u32,
}

/// Cross-sell scores of every customer, hue by product count, with the
/// selected customer marked by a vertical and a horizontal reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub hue_levels: Vec<(u32, Rgb)>,
    pub x_ref: f64,
    pub y_ref: f64,
}

impl ScatterChart {
    pub fn build(table: &CustomerTable, selected: &CustomerRecord) -> Self {
        let points: Vec<ScatterPoint> = table
            .records()
            .iter()
            .map(|r| ScatterPoint {
                x: r.cross_sell_motor,
                y: r.cross_sell_haushalt,
                num_products: r.num_products,
            })
            .collect();

        Self {
            title: "Cross-Sell Motor vs. Haushalt".to_string(),
            x_label: "Cross-Sell Motor".to_string(),
            y_label: "Cross-Sell Haushalt".to_string(),
            hue_levels: hue_levels(&points),
            points,
            x_ref: selected.cross_sell_motor,
            y_ref: selected.cross_sell_haushalt,
        }
    }

    pub fn color_for(&self, num_products: u32) -> Rgb {
        self.hue_levels
            .iter()
            .find(|(level, _)| *level == num_products)
            .map(|(_, color)| *color)
            .unwrap_or_else(|| coolwarm(0.5))
    }

    pub fn to_svg(&self, (width, height): (u32, u32)) -> Result<String> {
        let (x0, x1) = padded_range(self.points.iter().map(|p| p.x).chain([self.x_ref]));
        let (y0, y1) = padded_range(self.points.iter().map(|p| p.y).chain([self.y_ref]));

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&self.title, ("sans-serif", 20))
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(axis_range(x0, x1)?, axis_range(y0, y1)?)
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .x_desc(&self.x_label)
                .y_desc(&self.y_label)
                .draw()
                .map_err(chart_err)?;

            for &(level, color) in &self.hue_levels {
                let color = color.to_plotters();
                chart
                    .draw_series(
                        self.points
                            .iter()
                            .filter(|p| p.num_products == level)
                            .map(|p| Circle::new((p.x, p.y), 5, color.filled())),
                    )
                    .map_err(chart_err)?
                    .label(level.to_string())
                    .legend(move |(x, y)| Rectangle::new([(x - 4, y - 4), (x + 4, y + 4)], color.filled()));
            }

            let green = REFERENCE_GREEN.to_plotters();
            chart
                .draw_series(
                    dash_segments(y0, y1)
                        .into_iter()
                        .map(|(a, b)| PathElement::new(vec![(self.x_ref, a), (self.x_ref, b)], green.stroke_width(2))),
                )
                .map_err(chart_err)?;
            chart
                .draw_series(
                    dash_segments(x0, x1)
                        .into_iter()
                        .map(|(a, b)| PathElement::new(vec![(a, self.y_ref), (b, self.y_ref)], green.stroke_width(2))),
                )
                .map_err(chart_err)?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }
        Ok(svg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Tenure distribution of the whole table with the selected tenure marked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: Vec<HistogramBin>,
    /// Density estimate in count units, when enabled and defined.
    pub kde: Option<Vec<(f64, f64)>>,
    pub reference: f64,
}

impl HistogramChart {
    pub fn build(table: &CustomerTable, selected: &CustomerRecord, bins: usize, kde: bool) -> Self {
        let values: Vec<f64> = table.records().iter().map(|r| r.tenure).collect();
        let histogram = histogram_bins(&values, bins);
        let kde = if kde {
            let bin_width = histogram.first().map(|b| b.end - b.start).unwrap_or(1.0);
            gaussian_kde(&values, bin_width)
        } else {
            None
        };

        Self {
            title: "Customer Tenure Distribution".to_string(),
            x_label: "Tenure (Years)".to_string(),
            y_label: "Frequency".to_string(),
            bins: histogram,
            kde,
            reference: selected.tenure,
        }
    }

    pub fn to_svg(&self, (width, height): (u32, u32)) -> Result<String> {
        let x0 = self.bins.first().map(|b| b.start).unwrap_or(0.0).min(self.reference);
        let x1 = self.bins.last().map(|b| b.end).unwrap_or(1.0).max(self.reference);
        let peak_count = self.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
        let peak_kde = self
            .kde
            .iter()
            .flatten()
            .map(|&(_, y)| y)
            .fold(0.0_f64, f64::max);
        let y1 = (peak_count.max(peak_kde) * 1.1).max(1.0);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&self.title, ("sans-serif", 20))
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(axis_range(x0, x1)?, axis_range(0.0, y1)?)
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .x_desc(&self.x_label)
                .y_desc(&self.y_label)
                .draw()
                .map_err(chart_err)?;

            let bar = SKY_BLUE.to_plotters();
            chart
                .draw_series(self.bins.iter().map(|b| {
                    Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], bar.mix(0.7).filled())
                }))
                .map_err(chart_err)?;

            if let Some(curve) = &self.kde {
                chart
                    .draw_series(LineSeries::new(curve.iter().copied(), KDE_BLUE.to_plotters().stroke_width(2)))
                    .map_err(chart_err)?;
            }

            let red = REFERENCE_RED.to_plotters();
            chart
                .draw_series(
                    dash_segments(0.0, y1)
                        .into_iter()
                        .map(|(a, b)| PathElement::new(vec![(self.reference, a), (self.reference, b)], red.stroke_width(2))),
                )
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }
        Ok(svg)
    }
}

/// Equal-width bins over `[min, max]`; the last bin also holds `max`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let mut width = (max - min) / bins as f64;
    if !width.is_finite() {
        // 跨度超出 f64 範圍時先縮再減
        width = max / bins as f64 - min / bins as f64;
    }

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for value in finite {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}

/// Gaussian KDE with Scott's bandwidth, scaled by `n * bin_width` so it
/// overlays a count histogram.
pub fn gaussian_kde(values: &[f64], bin_width: f64) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if !std_dev.is_finite() || std_dev == 0.0 {
        return None;
    }

    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    let step = (max - min) / (KDE_GRID_POINTS - 1) as f64;
    let curve = (0..KDE_GRID_POINTS)
        .map(|i| {
            let x = min + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect();

    Some(curve)
}

fn hue_levels(points: &[ScatterPoint]) -> Vec<(u32, Rgb)> {
    let levels: BTreeSet<u32> = points.iter().map(|p| p.num_products).collect();
    let (Some(&low), Some(&high)) = (levels.first(), levels.last()) else {
        return Vec::new();
    };

    levels
        .iter()
        .map(|&level| {
            let t = if high == low {
                0.5
            } else {
                f64::from(level - low) / f64::from(high - low)
            };
            (level, coolwarm(t))
        })
        .collect()
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

// 在資料座標上切出虛線段
fn dash_segments(from: f64, to: f64) -> Vec<(f64, f64)> {
    let period = (to - from) / DASH_COUNT as f64;
    (0..DASH_COUNT)
        .map(|i| {
            let start = from + period * i as f64;
            (start, start + period * 0.6)
        })
        .collect()
}

/// Plotters cannot lay out an axis whose span is not a finite positive number.
fn axis_range(lo: f64, hi: f64) -> Result<std::ops::Range<f64>> {
    if lo.is_finite() && hi.is_finite() && (hi - lo).is_finite() && hi > lo {
        Ok(lo..hi)
    } else {
        Err(DashboardError::ChartError {
            message: format!("Cannot draw an axis over [{}, {}]", lo, hi),
        })
    }
}

fn chart_err<E: std::fmt::Display>(err: E) -> DashboardError {
    DashboardError::ChartError {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::{record, sample_table};
    use crate::domain::model::CustomerId;

    #[test]
    fn test_histogram_counts_and_edges() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let bins = histogram_bins(&values, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[9].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        // 最後一個 bin 包含最大值
        assert_eq!(bins[9].count, 2);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let bins = histogram_bins(&[3.0, 3.0, 3.0], 10);
        assert_eq!(bins[0].start, 2.5);
        assert_eq!(bins[9].end, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins.iter().filter(|b| b.count == 3).count(), 1);
    }

    #[test]
    fn test_kde_undefined_for_constant_or_single_values() {
        assert!(gaussian_kde(&[4.0], 1.0).is_none());
        assert!(gaussian_kde(&[4.0, 4.0, 4.0], 1.0).is_none());
    }

    #[test]
    fn test_kde_area_matches_counts() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 6.0, 7.5, 9.0];
        let bin_width = 0.8;
        let curve = gaussian_kde(&values, bin_width).unwrap();
        assert_eq!(curve.len(), KDE_GRID_POINTS);
        assert_eq!(curve[0].0, 1.0);
        assert!((curve[KDE_GRID_POINTS - 1].0 - 9.0).abs() < 1e-9);

        // Integral over the data range is a bit below n * bin_width since tails are cut.
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        let expected = values.len() as f64 * bin_width;
        assert!(area < expected);
        assert!(area > expected * 0.6, "area {} expected near {}", area, expected);
    }

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(0.0), Rgb(59, 76, 192));
        assert_eq!(coolwarm(0.5), Rgb(221, 221, 221));
        assert_eq!(coolwarm(1.0), Rgb(180, 4, 38));
        assert_eq!(coolwarm(7.0), Rgb(180, 4, 38));
    }

    #[test]
    fn test_scatter_reference_lines_follow_selection() {
        let table = sample_table();
        let selected = table.get(&CustomerId::from("C003")).unwrap();
        let chart = ScatterChart::build(&table, selected);

        assert_eq!(chart.x_ref, 0.55);
        assert_eq!(chart.y_ref, 0.63);
        assert_eq!(chart.points.len(), table.len());
    }

    #[test]
    fn test_scatter_hue_spans_product_range() {
        let table = sample_table();
        let chart = ScatterChart::build(&table, &table.records()[0]);

        let levels: Vec<u32> = chart.hue_levels.iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert_eq!(chart.color_for(1), coolwarm(0.0));
        assert_eq!(chart.color_for(4), coolwarm(1.0));
    }

    #[test]
    fn test_histogram_reference_line_is_selected_tenure() {
        let table = sample_table();
        let selected = table.get(&CustomerId::from("C002")).unwrap();
        let chart = HistogramChart::build(&table, selected, 10, true);

        assert_eq!(chart.reference, 1.5);
        assert_eq!(chart.bins.len(), 10);
        assert!(chart.kde.is_some());

        let no_kde = HistogramChart::build(&table, selected, 10, false);
        assert!(no_kde.kde.is_none());
    }

    #[test]
    fn test_charts_render_svg() {
        let table = sample_table();
        let selected = record("C001", 5.0, 2, 0.72, 0.41);

        let scatter = ScatterChart::build(&table, &selected).to_svg((640, 480)).unwrap();
        assert!(scatter.starts_with("<svg"));
        assert!(scatter.contains("Cross-Sell Motor vs. Haushalt"));
        assert!(scatter.contains("circle"));

        let histogram = HistogramChart::build(&table, &selected, 10, true)
            .to_svg((640, 480))
            .unwrap();
        assert!(histogram.contains("Customer Tenure Distribution"));
        assert!(histogram.contains("rect"));
    }

    #[test]
    fn test_histogram_bins_stay_finite_for_huge_span() {
        let bins = histogram_bins(&[1e308, -1e308], 10);

        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[9].count, 1);
    }

    #[test]
    fn test_unplottable_tenure_span_is_chart_error() {
        let table = CustomerTable::new(vec![
            record("A", 1e308, 1, 0.2, 0.3),
            record("B", -1e308, 2, 0.4, 0.5),
        ])
        .unwrap();
        let selected = table.get(&CustomerId::from("A")).unwrap();

        let result = HistogramChart::build(&table, selected, 10, true).to_svg((640, 480));

        assert!(matches!(result, Err(DashboardError::ChartError { .. })));
    }

    #[test]
    fn test_axis_range_rejects_empty_or_infinite_spans() {
        assert_eq!(axis_range(0.0, 1.0).unwrap(), 0.0..1.0);
        assert!(axis_range(1.0, 1.0).is_err());
        assert!(axis_range(-f64::MAX, f64::MAX).is_err());
        assert!(axis_range(f64::NAN, 1.0).is_err());
    }
}
