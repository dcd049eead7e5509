use crate::domain::model::MetricGroup;
use crate::render::Dashboard;
use crate::utils::error::Result;
use std::fmt::Write as _;

const STYLE: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", sans-serif; color: #31333f; display: flex; }
aside { width: 260px; min-height: 100vh; background: #f0f2f6; padding: 24px; box-sizing: border-box; }
aside ul { list-style: none; padding: 0; }
aside li { padding: 4px 8px; border-radius: 4px; }
aside li.selected { background: #ff4b4b; color: white; font-weight: 600; }
main { flex: 1; padding: 24px 48px; }
.columns { display: flex; gap: 32px; }
.column { flex: 1; min-width: 0; }
.metric { margin-bottom: 16px; }
.metric-label { font-size: 14px; color: #6b6f7b; }
.metric-value { font-size: 32px; }
.chart svg { width: 100%; height: auto; }
footer { margin-top: 32px; font-size: 12px; color: #9a9ca5; }
"#;

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the full dashboard page: sidebar, metric columns, charts, bottom line.
pub fn render_page(dashboard: &Dashboard) -> Result<String> {
    let scatter_svg = dashboard.scatter.to_svg(dashboard.chart_size)?;
    let histogram_svg = dashboard.histogram.to_svg(dashboard.chart_size)?;
    let id = escape_html(dashboard.customer_id.as_str());

    let mut page = String::new();
    // write! 到 String 不會失敗
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n",
        title = escape_html(&dashboard.title),
        style = STYLE,
    );

    page.push_str("<aside>\n<h2>Select a Customer</h2>\n<label>Customer ID</label>\n<ul>\n");
    for customer_id in &dashboard.customer_ids {
        let class = if *customer_id == dashboard.customer_id {
            " class=\"selected\""
        } else {
            ""
        };
        let _ = writeln!(page, "<li{}>{}</li>", class, escape_html(customer_id.as_str()));
    }
    page.push_str("</ul>\n</aside>\n<main>\n");

    let _ = writeln!(page, "<h1>{}</h1>", escape_html(&dashboard.title));
    let _ = writeln!(page, "<h2>Customer Information - {}</h2>", id);
    page.push_str("<div class=\"columns\">\n");
    for group in &dashboard.info_columns {
        render_metric_column(&mut page, group);
    }
    page.push_str("</div>\n");

    page.push_str("<h2>Customer Scores Overview</h2>\n<div class=\"columns\">\n");
    let _ = writeln!(page, "<div class=\"column chart\">{}</div>", scatter_svg);
    let _ = writeln!(page, "<div class=\"column chart\">{}</div>", histogram_svg);
    page.push_str("</div>\n");

    let bottom_line = &dashboard.bottom_line;
    page.push_str("<h2>Bottom Line</h2>\n");
    let _ = writeln!(
        page,
        "<p><strong>{}</strong> {}<br>Based on their scores:</p>\n<ul>",
        escape_html(&bottom_line.subject),
        escape_html(&bottom_line.profile)
    );
    for score in &bottom_line.scores {
        let _ = writeln!(
            page,
            "<li><strong>{}</strong>: {}</li>",
            escape_html(&score.label),
            escape_html(&score.value)
        );
    }
    page.push_str("</ul>\n<p><strong>Actionable Insights:</strong><br>\n");
    let insights: Vec<String> = bottom_line.insights.iter().map(|s| escape_html(s)).collect();
    page.push_str(&insights.join("<br>\n"));
    page.push_str("</p>\n");

    let _ = writeln!(
        page,
        "<footer>Generated {}</footer>",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    page.push_str("</main>\n</body>\n</html>\n");

    Ok(page)
}

fn render_metric_column(page: &mut String, group: &MetricGroup) {
    page.push_str("<div class=\"column\">\n");
    for metric in &group.metrics {
        let _ = writeln!(
            page,
            "<div class=\"metric\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div></div>",
            escape_html(&metric.label),
            escape_html(&metric.value)
        );
    }
    page.push_str("</div>\n");
}
