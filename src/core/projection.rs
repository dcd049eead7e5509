use crate::domain::model::{CustomerId, CustomerRecord, CustomerTable};
use crate::utils::error::{DashboardError, Result};

/// Resolves the selected ID to its single record.
pub fn project<'a>(table: &'a CustomerTable, customer_id: &CustomerId) -> Result<&'a CustomerRecord> {
    table
        .get(customer_id)
        .ok_or_else(|| DashboardError::CustomerNotFound {
            customer_id: customer_id.to_string(),
        })
}
