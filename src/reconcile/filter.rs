//! Narrow a zone's record set to the records of one domain.

use super::classify::Classification;
use crate::providers::Record;

/// Records whose name belongs to the classified domain. Types are not filtered.
pub fn filter_records(records: &[Record], rule: &Classification) -> Vec<Record> {
    records
        .iter()
        .filter(|record| rule.accepts(record.name.as_deref()))
        .cloned()
        .collect()
}
