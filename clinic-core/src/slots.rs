//! Open-slot lookup and appointment grouping for the booking flow.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Booking, BookingStatus, WeeklyAvailability};

/// Slots of the weekly template for `date` not held by an active booking.
///
/// A weekday without a template entry yields no slots. Remaining slots keep
/// their template order. Nothing is reserved: two callers may both see the
/// same slot as open.
pub fn available_slots(
    weekly: &WeeklyAvailability,
    provider_id: &str,
    date: NaiveDate,
    bookings: &[Booking],
) -> Vec<String> {
    let Some(template) = weekly.slots_for(date.weekday()) else {
        return Vec::new();
    };

    template
        .iter()
        .filter(|slot| {
            !bookings
                .iter()
                .any(|booking| booking.holds(provider_id, date, slot))
        })
        .cloned()
        .collect()
}

/// Calendar days offered for booking, starting with `today`.
pub fn bookable_dates(today: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    (0..u64::from(horizon_days))
        .map_while(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

/// Appointments grouped the way the agenda shows them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BookingBuckets {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

/// Split bookings into upcoming, past and cancelled relative to `today`.
///
/// `provider_id` narrows the agenda to one provider. A cancelled booking
/// dated before today shows up in both `past` and `cancelled`.
pub fn partition_bookings(
    bookings: &[Booking],
    today: NaiveDate,
    provider_id: Option<&str>,
) -> BookingBuckets {
    let mut buckets = BookingBuckets::default();

    let scoped = bookings
        .iter()
        .filter(|booking| provider_id.map_or(true, |id| booking.provider_id == id));

    for booking in scoped {
        let closed = matches!(
            booking.status,
            BookingStatus::Completed | BookingStatus::Cancelled
        );

        if !closed && booking.date >= today {
            buckets.upcoming.push(booking.clone());
        }
        if booking.status == BookingStatus::Completed || booking.date < today {
            buckets.past.push(booking.clone());
        }
        if booking.status == BookingStatus::Cancelled {
            buckets.cancelled.push(booking.clone());
        }
    }

    buckets
}
