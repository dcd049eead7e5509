use crate::render::metrics::format_tenure;
use crate::render::Dashboard;

/// Terminal rendering of the dashboard: metrics and bottom line, charts summarized.
pub fn render_summary(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", dashboard.title));
    out.push_str(&format!("## Customer Information - {}\n\n", dashboard.customer_id));

    for metric in dashboard.info_columns.iter().flat_map(|g| g.metrics.iter()) {
        out.push_str(&format!("{:<28}{}\n", metric.label, metric.value));
    }

    out.push_str("\n## Customer Scores Overview\n\n");
    out.push_str(&format!(
        "{}: {} customers, selected at ({:.2}, {:.2})\n",
        dashboard.scatter.title,
        dashboard.scatter.points.len(),
        dashboard.scatter.x_ref,
        dashboard.scatter.y_ref
    ));
    out.push_str(&format!(
        "{}: {} bins, selected tenure {}\n",
        dashboard.histogram.title,
        dashboard.histogram.bins.len(),
        format_tenure(dashboard.histogram.reference)
    ));

    out.push_str("\n## Bottom Line\n\n");
    out.push_str(&dashboard.bottom_line.to_markdown());
    out
}
