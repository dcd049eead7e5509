use crate::domain::model::{CustomerRecord, Metric};
use crate::render::metrics::{format_score, format_tenure};
use serde::Serialize;

/// Placeholder recommendation copy. It is the same for every customer and is
/// not derived from the scores.
pub const ACTIONABLE_INSIGHTS: [&str; 2] = [
    "You might consider focusing on cross-selling motor products to this customer, given their score is slightly above average.",
    "Their tenure suggests they are a loyal customer, but the storno score indicates there may be a risk of churn that should be addressed.",
];

/// The "Bottom Line" paragraph for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottomLine {
    pub subject: String,
    pub profile: String,
    pub scores: Vec<Metric>,
    pub insights: Vec<String>,
}

impl BottomLine {
    pub fn for_customer(record: &CustomerRecord) -> Self {
        Self {
            subject: format!("Customer {}", record.customer_id),
            profile: format!(
                "is a {} year old customer from {}. They have been with us for {} years and currently hold {} products.",
                record.age,
                record.location,
                format_tenure(record.tenure),
                record.num_products
            ),
            scores: vec![
                Metric::new("Cross-Sell Motor", format_score(record.cross_sell_motor)),
                Metric::new("Cross-Sell Haushalt", format_score(record.cross_sell_haushalt)),
                Metric::new("Storno", format_score(record.storno)),
            ],
            insights: ACTIONABLE_INSIGHTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!("**{}** {}\nBased on their scores:\n", self.subject, self.profile);
        for score in &self.scores {
            out.push_str(&format!("- **{}**: {}\n", score.label, score.value));
        }
        out.push_str("\n**Actionable Insights:**\n");
        out.push_str(&self.insights.join("\n"));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::record;

    #[test]
    fn test_bottom_line_interpolates_record() {
        let mut customer = record("C042", 7.5, 3, 0.6789, 0.1);
        customer.age = 52;
        customer.location = "Bern".to_string();
        customer.storno = 0.333;

        let text = BottomLine::for_customer(&customer).to_markdown();

        assert!(text.starts_with("**Customer C042** is a 52 year old customer from Bern."));
        assert!(text.contains("They have been with us for 7.5 years and currently hold 3 products."));
        assert!(text.contains("- **Cross-Sell Motor**: 0.68\n"));
        assert!(text.contains("- **Cross-Sell Haushalt**: 0.10\n"));
        assert!(text.contains("- **Storno**: 0.33\n"));
        assert!(text.contains("**Actionable Insights:**"));
    }

    #[test]
    fn test_insights_do_not_depend_on_scores() {
        let low = BottomLine::for_customer(&record("C1", 1.0, 1, 0.01, 0.01));
        let high = BottomLine::for_customer(&record("C2", 30.0, 6, 0.99, 0.99));
        assert_eq!(low.insights, high.insights);
        assert_eq!(low.insights.len(), ACTIONABLE_INSIGHTS.len());
    }

    #[test]
    fn test_whole_year_tenure_reads_as_float() {
        let text = BottomLine::for_customer(&record("C7", 3.0, 2, 0.5, 0.5)).to_markdown();
        assert!(text.contains("with us for 3.0 years"));
    }
}
