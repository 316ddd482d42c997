//! Directory JSON to normalized `clinic-core` records.
//!
//! The application store keeps pharmacies, doctors and appointments in
//! loosely shaped documents: coordinates live either at `coordinates` or
//! under `location.coordinates`, weekly templates come as lists or maps, and
//! numbers are sometimes strings. Everything is normalized here, once, so
//! the lookups in `clinic-core` only see `LocatableRecord`, `Booking` and
//! `WeeklyAvailability`.

use std::collections::HashMap;

use chrono::NaiveDate;
use clinic_core::{
    Booking, BookingStatus, DirectoryError, DirectorySource, GeoPoint, LocatableRecord,
    RecordKind, WeekdayLocale, WeeklyAvailability,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Normalized snapshot of the directory store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub records: Vec<LocatableRecord>,
    pub availability: HashMap<String, WeeklyAvailability>,
    pub bookings: Vec<Booking>,
}

impl DirectorySource for Directory {
    fn records(&self) -> &[LocatableRecord] {
        &self.records
    }

    fn weekly_availability(&self, provider_id: &str) -> Option<&WeeklyAvailability> {
        self.availability.get(provider_id)
    }

    fn bookings(&self) -> &[Booking] {
        &self.bookings
    }
}

/// Parse a directory snapshot from a JSON string.
pub fn parse_directory_str(json: &str) -> Result<Directory, DirectoryError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| DirectoryError::Parse(err.to_string()))?;
    parse_directory_value(&value)
}

/// Parse a directory snapshot from a `serde_json::Value`.
pub fn parse_directory_value(document: &Value) -> Result<Directory, DirectoryError> {
    let root = document.as_object().ok_or_else(|| {
        DirectoryError::InvalidInput("expected a JSON object at the root".to_string())
    })?;

    let collections = [
        ("pharmacies", RecordKind::Pharmacy),
        ("doctors", RecordKind::Doctor),
        ("facilities", RecordKind::Facility),
    ];

    let has_any = collections
        .iter()
        .map(|(key, _)| *key)
        .chain(["appointments"])
        .any(|key| root.get(key).is_some_and(Value::is_array));
    if !has_any {
        return Err(DirectoryError::MissingData);
    }

    let mut builder = DirectoryBuilder::default();

    for (key, kind) in collections {
        let Some(entries) = root.get(key).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            match kind {
                RecordKind::Doctor => builder.handle_doctor(entry),
                RecordKind::Pharmacy | RecordKind::Facility => builder.handle_site(entry, kind),
            }
        }
    }

    if let Some(appointments) = root.get("appointments").and_then(Value::as_array) {
        for entry in appointments {
            builder.handle_appointment(entry);
        }
    }

    Ok(builder.finish())
}

#[derive(Default)]
struct DirectoryBuilder {
    records: Vec<LocatableRecord>,
    availability: HashMap<String, WeeklyAvailability>,
    bookings: Vec<Booking>,
}

impl DirectoryBuilder {
    fn handle_site(&mut self, entry: &Value, kind: RecordKind) {
        let Some(id) = extract_id(entry) else {
            warn!(?kind, "skipping directory entry without id");
            return;
        };
        let Some(name) = string_field(entry, "name") else {
            warn!(%id, ?kind, "skipping directory entry without name");
            return;
        };

        let location_block = entry.get("location");

        self.records.push(LocatableRecord {
            id,
            kind,
            name,
            address: string_field(entry, "address")
                .or_else(|| location_block.and_then(|loc| string_field(loc, "address"))),
            city: string_field(entry, "city")
                .or_else(|| location_block.and_then(|loc| string_field(loc, "city"))),
            specialty: None,
            location: extract_location(entry),
        });
    }

    fn handle_doctor(&mut self, entry: &Value) {
        let Some(id) = extract_id(entry) else {
            warn!("skipping doctor without id");
            return;
        };
        let Some(name) = doctor_name(entry) else {
            warn!(%id, "skipping doctor without name");
            return;
        };

        let location_block = entry.get("location");

        if let Some(weekly) = entry.get("availability").and_then(parse_availability) {
            self.availability.insert(id.clone(), weekly);
        }

        self.records.push(LocatableRecord {
            id,
            kind: RecordKind::Doctor,
            name,
            address: location_block
                .and_then(|loc| string_field(loc, "address"))
                .or_else(|| string_field(entry, "address")),
            city: location_block
                .and_then(|loc| string_field(loc, "city"))
                .or_else(|| string_field(entry, "city")),
            specialty: string_field(entry, "specialty"),
            location: extract_location(entry),
        });
    }

    fn handle_appointment(&mut self, entry: &Value) {
        let id = extract_id(entry);

        let Some(provider_id) = ["doctorId", "providerId", "doctor"]
            .iter()
            .find_map(|key| scalar_text(entry.get(*key)?))
        else {
            warn!(?id, "skipping appointment without provider");
            return;
        };

        let Some(date) = string_field(entry, "date").and_then(|raw| parse_date(&raw)) else {
            warn!(?id, "skipping appointment with missing or invalid date");
            return;
        };

        let Some(time) = string_field(entry, "time") else {
            warn!(?id, "skipping appointment without time");
            return;
        };

        let status = match string_field(entry, "status") {
            Some(raw) => match BookingStatus::parse(&raw) {
                Some(status) => status,
                None => {
                    warn!(?id, status = %raw, "skipping appointment with unknown status");
                    return;
                }
            },
            // The store defaults new appointments to pending.
            None => BookingStatus::Pending,
        };

        self.bookings.push(Booking {
            id,
            provider_id,
            date,
            time,
            status,
        });
    }

    fn finish(self) -> Directory {
        debug!(
            records = self.records.len(),
            templates = self.availability.len(),
            bookings = self.bookings.len(),
            "directory snapshot normalized"
        );
        Directory {
            records: self.records,
            availability: self.availability,
            bookings: self.bookings,
        }
    }
}

fn extract_id(entry: &Value) -> Option<String> {
    ["id", "_id"]
        .iter()
        .find_map(|key| entry.get(*key).and_then(scalar_text))
        .or_else(|| {
            // Mongo extended JSON: { "_id": { "$oid": "..." } }
            entry
                .get("_id")
                .and_then(|oid| oid.get("$oid"))
                .and_then(scalar_text)
        })
}

fn doctor_name(entry: &Value) -> Option<String> {
    let parts: Vec<String> = ["firstName", "lastName"]
        .iter()
        .filter_map(|key| string_field(entry, key))
        .collect();

    if parts.is_empty() {
        string_field(entry, "name")
    } else {
        Some(parts.join(" "))
    }
}

/// Non-empty, trimmed string at `key`.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Strings and numbers rendered as text, for identifiers.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Accept full timestamps by keeping the calendar part.
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn extract_location(entry: &Value) -> Option<GeoPoint> {
    entry
        .get("coordinates")
        .and_then(parse_point)
        .or_else(|| {
            entry
                .get("location")
                .and_then(|loc| loc.get("coordinates"))
                .and_then(parse_point)
        })
        .or_else(|| parse_point(entry.get("location")?))
}

fn parse_point(value: &Value) -> Option<GeoPoint> {
    if let Some(pair) = value.as_array() {
        // GeoJSON order: [longitude, latitude].
        if let [lng, lat] = pair.as_slice() {
            return Some(GeoPoint::new(number(lat)?, number(lng)?));
        }
        return None;
    }

    if value.get("type").and_then(Value::as_str) == Some("Point") {
        return value.get("coordinates").and_then(parse_point);
    }

    let latitude = ["lat", "latitude"]
        .iter()
        .find_map(|key| value.get(*key).and_then(number))?;
    let longitude = ["lng", "lon", "longitude"]
        .iter()
        .find_map(|key| value.get(*key).and_then(number))?;

    Some(GeoPoint::new(latitude, longitude))
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn parse_availability(value: &Value) -> Option<WeeklyAvailability> {
    let mut weekly = WeeklyAvailability::new();

    match value {
        Value::Array(days) => {
            for day in days {
                let Some(name) = day.get("day").and_then(Value::as_str) else {
                    warn!("skipping availability entry without day");
                    continue;
                };
                add_day(&mut weekly, name, day.get("slots"));
            }
        }
        Value::Object(days) => {
            for (name, slots) in days {
                add_day(&mut weekly, name, Some(slots));
            }
        }
        _ => return None,
    }

    (!weekly.is_empty()).then_some(weekly)
}

fn add_day(weekly: &mut WeeklyAvailability, name: &str, slots: Option<&Value>) {
    let Some(day) = WeekdayLocale::parse_any(name) else {
        warn!(day = %name, "skipping availability for unknown weekday");
        return;
    };

    let slots: Vec<String> = slots
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|slot| !slot.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    weekly.set_day(day, slots);
}
