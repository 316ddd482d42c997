use chrono::NaiveDate;
use clinic_core::{
    open_slots, BookingStatus, DirectoryError, DirectorySource, GeoPoint, LocatableRecord,
    RecordKind,
};
use clinic_json::{parse_directory_str, parse_directory_value, Directory};
use serde_json::json;

fn fixture() -> Directory {
    let input = include_str!("data/libreville_directory.json");
    parse_directory_str(input).expect("fixture parses")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn record<'a>(directory: &'a Directory, kind: RecordKind, id: &str) -> &'a LocatableRecord {
    directory
        .records
        .iter()
        .find(|r| r.kind == kind && r.id == id)
        .expect("record present")
}

#[test]
fn entries_without_id_are_dropped() {
    let directory = fixture();
    assert_eq!(directory.records.len(), 9);
    assert!(directory
        .records
        .iter()
        .all(|r| r.name != "Pharmacie sans identifiant"));
}

#[test]
fn coordinates_are_read_from_every_known_shape() {
    let directory = fixture();

    assert_eq!(
        record(&directory, RecordKind::Pharmacy, "3").location,
        Some(GeoPoint::new(0.3875, 9.4425))
    );
    assert_eq!(
        record(&directory, RecordKind::Pharmacy, "4").location,
        Some(GeoPoint::new(0.3475, 9.5025))
    );
    assert_eq!(
        record(&directory, RecordKind::Facility, "65a1f0c2e4b0a1b2c3d4e5f6").location,
        Some(GeoPoint::new(0.3920, 9.4540))
    );
    assert_eq!(record(&directory, RecordKind::Pharmacy, "5").location, None);
}

#[test]
fn doctors_are_flattened_from_nested_location() {
    let directory = fixture();
    let doctor = record(&directory, RecordKind::Doctor, "3");

    assert_eq!(doctor.name, "Dr. Françoise Minko");
    assert_eq!(doctor.city.as_deref(), Some("Libreville"));
    assert_eq!(doctor.address.as_deref(), Some("Owendo, Libreville"));
    assert_eq!(doctor.specialty.as_deref(), Some("Pédiatrie"));
}

#[test]
fn malformed_appointments_are_skipped() {
    let directory = fixture();
    let ids: Vec<&str> = directory
        .bookings
        .iter()
        .filter_map(|b| b.id.as_deref())
        .collect();

    assert_eq!(ids, vec!["1", "2", "3", "4", "7"]);
    assert_eq!(directory.bookings[2].date, date(2025, 1, 13));
    assert_eq!(directory.bookings[3].status, BookingStatus::Pending);
}

#[test]
fn open_slots_follow_the_snapshot() {
    let directory = fixture();
    let monday = date(2025, 1, 13);

    assert_eq!(open_slots(&directory, "1", monday), vec!["08:00", "10:00", "15:00"]);
    assert_eq!(open_slots(&directory, "2", monday), vec!["07:30", "09:30"]);
    assert_eq!(
        open_slots(&directory, "2", date(2025, 1, 18)),
        vec!["08:00", "09:00", "10:00"]
    );
    assert!(open_slots(&directory, "2", date(2025, 1, 14)).is_empty());
    assert!(open_slots(&directory, "3", monday).is_empty());
}

#[test]
fn unknown_weekday_keys_are_ignored() {
    let directory = fixture();
    let weekly = directory
        .weekly_availability("2")
        .expect("doctor 2 has a template");

    assert!(weekly.slots_for(chrono::Weekday::Sun).is_none());
    assert!(weekly.slots_for(chrono::Weekday::Mon).is_some());
}

#[test]
fn numeric_ids_and_geojson_arrays_are_accepted() {
    let directory = parse_directory_value(&json!({
        "pharmacies": [
            { "id": 12, "name": "Pharmacie Nzeng-Ayong", "coordinates": [9.49, 0.43] }
        ]
    }))
    .expect("parses");

    let pharmacy = &directory.records[0];
    assert_eq!(pharmacy.id, "12");
    assert_eq!(pharmacy.location, Some(GeoPoint::new(0.43, 9.49)));
    assert!(directory.bookings.is_empty());
}

#[test]
fn rejects_documents_without_collections() {
    assert!(matches!(
        parse_directory_value(&json!({ "user": {} })),
        Err(DirectoryError::MissingData)
    ));
    assert!(matches!(
        parse_directory_value(&json!([1, 2, 3])),
        Err(DirectoryError::InvalidInput(_))
    ));
    assert!(matches!(
        parse_directory_str("{ not json"),
        Err(DirectoryError::Parse(_))
    ));
}
