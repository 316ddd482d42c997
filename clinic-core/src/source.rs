//! Data access seam between the directory store and the pure lookups.

use chrono::NaiveDate;

use crate::{available_slots, Booking, LocatableRecord, WeeklyAvailability};

/// Snapshot of directory data handed to the lookups.
///
/// Implementations own the records; lookups only borrow them for one call
/// and never write back.
pub trait DirectorySource {
    /// Every location-bearing record known to the source.
    fn records(&self) -> &[LocatableRecord];

    /// Weekly template of `provider_id`, if the provider has one.
    fn weekly_availability(&self, provider_id: &str) -> Option<&WeeklyAvailability>;

    /// Known appointments, any provider and status.
    fn bookings(&self) -> &[Booking];
}

/// Open slots of `provider_id` on `date`, read from `source`.
///
/// A provider without a template has no open slots.
pub fn open_slots<S: DirectorySource + ?Sized>(
    source: &S,
    provider_id: &str,
    date: NaiveDate,
) -> Vec<String> {
    match source.weekly_availability(provider_id) {
        Some(weekly) => available_slots(weekly, provider_id, date, source.bookings()),
        None => Vec::new(),
    }
}
