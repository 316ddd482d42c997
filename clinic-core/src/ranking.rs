//! Proximity ordering of directory records.

use tracing::debug;

use crate::{distance_km, filter_records, GeoPoint, LocatableRecord, RankedRecord, RecordKind};

/// Attach distances to `reference` and order records nearest first.
///
/// Without a reference every record is returned in input order and without
/// a distance. With one, records lacking valid coordinates are left out and
/// equal distances keep their input order.
pub fn rank_records(
    records: &[LocatableRecord],
    reference: Option<GeoPoint>,
) -> Vec<RankedRecord> {
    let Some(reference) = reference else {
        return records
            .iter()
            .cloned()
            .map(|record| RankedRecord {
                record,
                distance_km: None,
            })
            .collect();
    };

    let mut ranked: Vec<RankedRecord> = records
        .iter()
        .filter_map(|record| {
            let Some(location) = record.location.filter(GeoPoint::is_valid) else {
                debug!(id = %record.id, "skipping record without usable coordinates");
                return None;
            };
            Some(RankedRecord {
                record: record.clone(),
                distance_km: Some(distance_km(reference, location)),
            })
        })
        .collect();

    // `sort_by` is stable, ties stay in input order.
    ranked.sort_by(|a, b| {
        let left = a.distance_km.unwrap_or_default();
        let right = b.distance_km.unwrap_or_default();
        left.total_cmp(&right)
    });

    ranked
}

/// Restrict by kind, filter by `query`, then rank around `reference`.
pub fn search_directory(
    records: &[LocatableRecord],
    query: &str,
    reference: Option<GeoPoint>,
    kind: Option<RecordKind>,
) -> Vec<RankedRecord> {
    let candidates = match kind {
        Some(kind) => {
            let scoped: Vec<LocatableRecord> = records
                .iter()
                .filter(|record| record.kind == kind)
                .cloned()
                .collect();
            filter_records(&scoped, query)
        }
        None => filter_records(records, query),
    };

    rank_records(&candidates, reference)
}
