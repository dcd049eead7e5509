use crate::domain::model::{CustomerRecord, Metric, MetricGroup};

/// Scores are always shown with two decimals.
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Tenure keeps its float form, so whole years read `3.0`.
pub fn format_tenure(years: f64) -> String {
    format!("{:?}", years)
}

/// The two "Customer Information" columns: profile on the left, products and scores on the right.
pub fn customer_info_columns(record: &CustomerRecord) -> [MetricGroup; 2] {
    let profile = MetricGroup {
        metrics: vec![
            Metric::new("Age", record.age.to_string()),
            Metric::new("Location", record.location.clone()),
            Metric::new("Tenure (Years)", format_tenure(record.tenure)),
        ],
    };

    let scores = MetricGroup {
        metrics: vec![
            Metric::new("Number of Products", record.num_products.to_string()),
            Metric::new("Cross-Sell Motor Score", format_score(record.cross_sell_motor)),
            Metric::new(
                "Cross-Sell Haushalt Score",
                format_score(record.cross_sell_haushalt),
            ),
            Metric::new("Storno Score", format_score(record.storno)),
        ],
    };

    [profile, scores]
}
