pub mod charts;
pub mod html;
pub mod metrics;
pub mod narrative;
pub mod text;

use crate::domain::model::{CustomerId, CustomerRecord, CustomerTable, MetricGroup};
use crate::domain::ports::ConfigProvider;
use charts::{HistogramChart, ScatterChart};
use chrono::{DateTime, Utc};
use narrative::BottomLine;
use serde::Serialize;

pub const DEFAULT_TITLE: &str = "Customer 360 Dashboard";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub title: String,
    pub histogram_bins: usize,
    pub kde: bool,
    pub chart_size: (u32, u32),
}

impl DashboardOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            title: config.title().to_string(),
            histogram_bins: config.histogram_bins(),
            kde: config.kde_enabled(),
            chart_size: config.chart_size(),
        }
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            histogram_bins: 10,
            kde: true,
            chart_size: (640, 480),
        }
    }
}

/// Everything shown for one selected customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub customer_id: CustomerId,
    pub customer_ids: Vec<CustomerId>,
    pub info_columns: [MetricGroup; 2],
    pub scatter: ScatterChart,
    pub histogram: HistogramChart,
    pub bottom_line: BottomLine,
    pub chart_size: (u32, u32),
    pub generated_at: DateTime<Utc>,
}

pub fn build_dashboard(
    table: &CustomerTable,
    selected: &CustomerRecord,
    options: &DashboardOptions,
) -> Dashboard {
    Dashboard {
        title: options.title.clone(),
        customer_id: selected.customer_id.clone(),
        customer_ids: table.customer_ids(),
        info_columns: metrics::customer_info_columns(selected),
        scatter: ScatterChart::build(table, selected),
        histogram: HistogramChart::build(table, selected, options.histogram_bins, options.kde),
        bottom_line: BottomLine::for_customer(selected),
        chart_size: options.chart_size,
        generated_at: Utc::now(),
    }
}
