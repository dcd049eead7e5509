use crate::utils::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CustomerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One row of the customer dataset. Column names follow the catalog export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Tenure")]
    pub tenure: f64,
    #[serde(rename = "NumProducts")]
    pub num_products: u32,
    #[serde(rename = "CrossSell_Motor")]
    pub cross_sell_motor: f64,
    #[serde(rename = "CrossSell_Haushalt")]
    pub cross_sell_haushalt: f64,
    #[serde(rename = "Storno")]
    pub storno: f64,
}

/// Read-only customer table, indexed by ID. IDs are unique.
#[derive(Debug, Clone)]
pub struct CustomerTable {
    records: Vec<CustomerRecord>,
    index: HashMap<CustomerId, usize>,
}

impl CustomerTable {
    pub fn new(records: Vec<CustomerRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(DashboardError::EmptyDataset);
        }

        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.customer_id.clone(), position).is_some() {
                return Err(DashboardError::DuplicateCustomerId {
                    customer_id: record.customer_id.to_string(),
                });
            }
        }

        Ok(Self { records, index })
    }

    /// Parses CSV with a header row. Surrounding whitespace in fields is ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = csv_reader
            .deserialize::<CustomerRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!("Parsed {} customer rows from CSV", records.len());
        Self::new(records)
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique IDs in the order they first appear in the dataset.
    pub fn customer_ids(&self) -> Vec<CustomerId> {
        self.records.iter().map(|r| r.customer_id.clone()).collect()
    }

    pub fn get(&self, customer_id: &CustomerId) -> Option<&CustomerRecord> {
        self.index.get(customer_id).map(|&position| &self.records[position])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub metrics: Vec<Metric>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(id: &str, tenure: f64, num_products: u32, motor: f64, haushalt: f64) -> CustomerRecord {
        CustomerRecord {
            customer_id: CustomerId::from(id),
            age: 40,
            location: "Zürich".to_string(),
            tenure,
            num_products,
            cross_sell_motor: motor,
            cross_sell_haushalt: haushalt,
            storno: 0.25,
        }
    }

    pub fn sample_table() -> CustomerTable {
        CustomerTable::new(vec![
            record("C001", 5.0, 2, 0.72, 0.41),
            record("C002", 1.5, 1, 0.15, 0.88),
            record("C003", 12.0, 4, 0.55, 0.63),
            record("C004", 8.0, 3, 0.91, 0.12),
        ])
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    const CSV_DATA: &str = "\
CustomerID,Age,Location,Tenure,NumProducts,CrossSell_Motor,CrossSell_Haushalt,Storno,Segment
C001,45,Berlin,5,2,0.723,0.41,0.1,A
C002, 31 ,Hamburg,1.5,1,0.15,0.88,0.67,B
";

    #[test]
    fn test_parse_csv_ignores_extra_columns_and_whitespace() {
        let table = CustomerTable::from_csv_reader(CSV_DATA.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let second = table.get(&CustomerId::from("C002")).unwrap();
        assert_eq!(second.age, 31);
        assert_eq!(second.location, "Hamburg");
        assert_eq!(second.tenure, 1.5);
    }

    #[test]
    fn test_missing_column_is_a_csv_error() {
        let csv = "CustomerID,Age,Location\nC001,45,Berlin\n";
        let err = CustomerTable::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::CsvError(_)));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = CustomerTable::new(vec![
            record("C001", 1.0, 1, 0.1, 0.2),
            record("C001", 2.0, 2, 0.3, 0.4),
        ])
        .unwrap_err();

        assert!(
            matches!(err, DashboardError::DuplicateCustomerId { customer_id } if customer_id == "C001")
        );
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(
            CustomerTable::new(vec![]),
            Err(DashboardError::EmptyDataset)
        ));
        let header_only = "CustomerID,Age,Location,Tenure,NumProducts,CrossSell_Motor,CrossSell_Haushalt,Storno\n";
        assert!(matches!(
            CustomerTable::from_csv_reader(header_only.as_bytes()),
            Err(DashboardError::EmptyDataset)
        ));
    }

    #[test]
    fn test_customer_ids_keep_dataset_order() {
        let table = sample_table();
        let ids: Vec<String> = table.customer_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["C001", "C002", "C003", "C004"]);
    }
}
