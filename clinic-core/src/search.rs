//! Free-text candidate filter.

use crate::LocatableRecord;

/// Keep the records whose search text contains `query`, ignoring case.
///
/// A blank query keeps everything in input order.
pub fn filter_records(records: &[LocatableRecord], query: &str) -> Vec<LocatableRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| record.search_text().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
