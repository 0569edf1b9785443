//! Merges findings into one record per product.

use std::collections::HashMap;

use qm_core::{Finding, IssueRecord, ProductRecord};

/// Id-keyed store of issue records, kept in first-creation order.
#[derive(Debug, Default)]
pub struct IssueAggregator {
    index: HashMap<String, usize>,
    records: Vec<IssueRecord>,
}

impl IssueAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `findings` to the record for `product`, creating it if needed.
    ///
    /// Findings are appended after any already present; nothing is
    /// de-duplicated. Returns `None` (and creates nothing) when `findings` is
    /// empty.
    pub fn add(&mut self, product: &ProductRecord, findings: Vec<Finding>) -> Option<&IssueRecord> {
        if findings.is_empty() {
            return None;
        }

        let position = match self.index.get(&product.id) {
            Some(&position) => {
                self.records[position].findings.extend(findings);
                position
            }
            None => {
                let position = self.records.len();
                self.records.push(IssueRecord::open(product, findings));
                self.index.insert(product.id.clone(), position);
                position
            }
        };
        self.records.get(position)
    }

    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&IssueRecord> {
        self.index
            .get(product_id)
            .and_then(|&position| self.records.get(position))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<IssueRecord> {
        self.records
    }
}
