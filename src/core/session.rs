use crate::core::projection::project;
use crate::domain::model::{CustomerId, CustomerTable};
use crate::render::{build_dashboard, Dashboard, DashboardOptions};
use crate::utils::error::Result;

/// Dataset loaded once at session start; every render reads from it.
#[derive(Debug, Clone)]
pub struct Session {
    table: CustomerTable,
    source: String,
}

impl Session {
    pub fn new(table: CustomerTable, source: impl Into<String>) -> Self {
        Self {
            table,
            source: source.into(),
        }
    }

    pub fn table(&self) -> &CustomerTable {
        &self.table
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn customer_ids(&self) -> Vec<CustomerId> {
        self.table.customer_ids()
    }

    pub fn dashboard(&self, customer_id: &CustomerId, options: &DashboardOptions) -> Result<Dashboard> {
        let record = project(&self.table, customer_id)?;
        Ok(build_dashboard(&self.table, record, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::sample_table;
    use crate::utils::error::DashboardError;

    #[test]
    fn test_switching_customer_keeps_distributions() {
        let session = Session::new(sample_table(), "fixture");
        let options = DashboardOptions::default();

        let first = session.dashboard(&CustomerId::from("C001"), &options).unwrap();
        let second = session.dashboard(&CustomerId::from("C004"), &options).unwrap();

        assert_ne!(first.info_columns, second.info_columns);
        assert_ne!(first.scatter.x_ref, second.scatter.x_ref);
        assert_ne!(first.scatter.y_ref, second.scatter.y_ref);
        assert_ne!(first.histogram.reference, second.histogram.reference);

        assert_eq!(first.scatter.points, second.scatter.points);
        assert_eq!(first.scatter.hue_levels, second.scatter.hue_levels);
        assert_eq!(first.histogram.bins, second.histogram.bins);
        assert_eq!(first.histogram.kde, second.histogram.kde);
    }

    #[test]
    fn test_reference_lines_match_selected_record() {
        let session = Session::new(sample_table(), "fixture");
        let options = DashboardOptions::default();

        for id in session.customer_ids() {
            let dashboard = session.dashboard(&id, &options).unwrap();
            let record = session.table().get(&id).unwrap();
            assert_eq!(dashboard.scatter.x_ref, record.cross_sell_motor);
            assert_eq!(dashboard.scatter.y_ref, record.cross_sell_haushalt);
            assert_eq!(dashboard.histogram.reference, record.tenure);
        }
    }

    #[test]
    fn test_unknown_customer() {
        let session = Session::new(sample_table(), "fixture");
        let result = session.dashboard(&CustomerId::from("nope"), &DashboardOptions::default());
        assert!(matches!(result, Err(DashboardError::CustomerNotFound { .. })));
    }
}
