//! Core types and pure lookups for the clinic directory: proximity ranking of
//! pharmacies/doctors/facilities and open-slot computation for bookings.

use std::collections::HashMap;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub mod geo;
pub mod ranking;
pub mod search;
pub mod slots;
pub mod source;

pub use geo::{distance_km, format_distance, EARTH_RADIUS_KM};
pub use ranking::{rank_records, search_directory};
pub use search::filter_records;
pub use slots::{available_slots, bookable_dates, partition_bookings, BookingBuckets};
pub use source::{open_slots, DirectorySource};

/// Settings shared by the boundary crates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Language used when naming weekdays back to the caller.
    pub weekday_locale: WeekdayLocale,
    /// Number of days, starting today, offered by the booking form.
    pub booking_horizon_days: u32,
    /// Decimals shown when a distance is rendered.
    pub distance_decimals: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            weekday_locale: WeekdayLocale::French,
            booking_horizon_days: 30,
            distance_decimals: 2,
        }
    }
}

/// Weekday naming used by availability templates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayLocale {
    #[default]
    French,
    English,
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const FRENCH_WEEKDAYS: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

const ENGLISH_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

impl WeekdayLocale {
    /// Display name of `day` in this locale.
    pub fn name(self, day: Weekday) -> &'static str {
        let index = day.num_days_from_monday() as usize;
        match self {
            WeekdayLocale::French => FRENCH_WEEKDAYS[index],
            WeekdayLocale::English => ENGLISH_WEEKDAYS[index],
        }
    }

    /// Resolve a weekday name written in any supported locale.
    ///
    /// Matching ignores case and surrounding whitespace, so `"lundi"`,
    /// `"LUNDI "` and `"Monday"` all resolve.
    pub fn parse_any(name: &str) -> Option<Weekday> {
        let needle = name.trim().to_lowercase();
        FRENCH_WEEKDAYS
            .iter()
            .chain(ENGLISH_WEEKDAYS.iter())
            .position(|candidate| candidate.to_lowercase() == needle)
            .map(|index| WEEKDAYS[index % 7])
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Directory entity category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Pharmacy,
    Doctor,
    Facility,
}

/// Normalized directory entry with an optional position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocatableRecord {
    pub id: String,
    pub kind: RecordKind,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Medical specialty, only meaningful for providers.
    pub specialty: Option<String>,
    pub location: Option<GeoPoint>,
}

impl LocatableRecord {
    pub fn new(id: impl Into<String>, kind: RecordKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            address: None,
            city: None,
            specialty: None,
            location: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// Text matched by the candidate filter.
    ///
    /// Doctors are searched by name and specialty, everything else by name
    /// and city. A doctor without a specialty falls back to the city.
    pub fn search_text(&self) -> String {
        let secondary = match self.kind {
            RecordKind::Doctor => self.specialty.as_deref().or(self.city.as_deref()),
            RecordKind::Pharmacy | RecordKind::Facility => self.city.as_deref(),
        };

        match secondary {
            Some(extra) => format!("{} {}", self.name, extra),
            None => self.name.clone(),
        }
    }
}

/// A record with its distance to the reference point of one ranking call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: LocatableRecord,
    /// `None` when no reference point was supplied.
    pub distance_km: Option<f64>,
}

impl RankedRecord {
    /// Rendered distance, e.g. `"2.10 km"`.
    pub fn distance_label(&self, decimals: usize) -> Option<String> {
        self.distance_km.map(|km| format_distance(km, decimals))
    }
}

/// Recurring weekly template of bookable slots for one provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WeeklyAvailability {
    days: HashMap<Weekday, Vec<String>>,
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slots for `day`, dropping duplicates while keeping order.
    pub fn set_day<I, S>(&mut self, day: Weekday, slots: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for slot in slots {
            let slot = slot.into();
            if !unique.contains(&slot) {
                unique.push(slot);
            }
        }
        self.days.insert(day, unique);
    }

    pub fn with_day<I, S>(mut self, day: Weekday, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_day(day, slots);
        self
    }

    /// Nominal slots for `day`, in template order.
    pub fn slots_for(&self, day: Weekday) -> Option<&[String]> {
        self.days.get(&day).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this state holds its slot.
    pub fn consumes_slot(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "scheduled" => Some(Self::Scheduled),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// An appointment as seen by the slot filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Option<String>,
    pub provider_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new(
        provider_id: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: None,
            provider_id: provider_id.into(),
            date,
            time: time.into(),
            status,
        }
    }

    /// True when this booking holds `time` on `date` for `provider_id`.
    pub fn holds(&self, provider_id: &str, date: NaiveDate, time: &str) -> bool {
        self.status.consumes_slot()
            && self.provider_id == provider_id
            && self.date == date
            && self.time == time
    }
}

/// Errors raised while building directory data at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("input is missing the minimum directory data")]
    MissingData,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("could not read input: {0}")]
    Parse(String),
}
