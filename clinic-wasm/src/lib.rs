//! Framework-neutral WASM <-> JavaScript bridge for the directory lookups.

use chrono::NaiveDate;
use clinic_core::{
    DirectoryConfig, DirectoryError, DirectorySource, GeoPoint, RecordKind, WeekdayLocale,
};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsDirectoryConfig {
    #[serde(default)]
    weekday_locale: Option<WeekdayLocale>,
    #[serde(default)]
    booking_horizon_days: Option<u32>,
    #[serde(default)]
    distance_decimals: Option<usize>,
}

impl From<JsDirectoryConfig> for DirectoryConfig {
    fn from(cfg: JsDirectoryConfig) -> Self {
        let mut base = DirectoryConfig::default();
        if let Some(locale) = cfg.weekday_locale {
            base.weekday_locale = locale;
        }
        if let Some(days) = cfg.booking_horizon_days {
            base.booking_horizon_days = days;
        }
        if let Some(decimals) = cfg.distance_decimals {
            base.distance_decimals = decimals;
        }
        base
    }
}

/// Reference point as sent by the browser geolocation API.
#[derive(Deserialize)]
struct JsPoint {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude", alias = "lon")]
    lng: f64,
}

#[derive(Serialize)]
struct JsRankedRecord {
    #[serde(flatten)]
    ranked: clinic_core::RankedRecord,
    distance_label: Option<String>,
}

#[derive(Serialize)]
struct JsBookableDate {
    date: NaiveDate,
    weekday: &'static str,
}

#[wasm_bindgen]
pub fn search_directory(
    input_directory: JsValue,
    query: Option<String>,
    reference: Option<JsValue>,
    kind: Option<String>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    install_panic_hook();

    let directory = read_directory(input_directory)?;
    let cfg = read_config(config)?;

    let reference = match reference {
        Some(js_point) if !js_point.is_null() && !js_point.is_undefined() => {
            let point: JsPoint = from_value(js_point).map_err(|err| {
                JsValue::from_str(&format!("Could not read reference point: {err}"))
            })?;
            Some(GeoPoint::new(point.lat, point.lng))
        }
        _ => None,
    };

    let kind = kind.as_deref().map(parse_kind).transpose().map_err(to_js_error)?;

    let rows = ranked_rows(
        &directory,
        query.as_deref().unwrap_or_default(),
        reference,
        kind,
        &cfg,
    );

    to_js(&rows)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize ranking: {err}")))
}

#[wasm_bindgen]
pub fn available_slots(
    input_directory: JsValue,
    provider_id: &str,
    date: &str,
) -> Result<JsValue, JsValue> {
    install_panic_hook();

    let directory = read_directory(input_directory)?;
    let date = parse_iso_date(date).map_err(to_js_error)?;
    let slots = clinic_core::open_slots(&directory, provider_id, date);

    to_js(&slots)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize slots: {err}")))
}

#[wasm_bindgen]
pub fn bookable_dates(today: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    install_panic_hook();

    let cfg = read_config(config)?;
    let today = parse_iso_date(today).map_err(to_js_error)?;

    let rows = describe_dates(today, &cfg);
    to_js(&rows)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize dates: {err}")))
}

/// Serialize as plain JS objects; flattened rows would otherwise become `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::json_compatible())
}

fn ranked_rows<S: DirectorySource + ?Sized>(
    source: &S,
    query: &str,
    reference: Option<GeoPoint>,
    kind: Option<RecordKind>,
    cfg: &DirectoryConfig,
) -> Vec<JsRankedRecord> {
    clinic_core::search_directory(source.records(), query, reference, kind)
        .into_iter()
        .map(|ranked| JsRankedRecord {
            distance_label: ranked.distance_label(cfg.distance_decimals),
            ranked,
        })
        .collect()
}

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn read_directory(input: JsValue) -> Result<clinic_json::Directory, JsValue> {
    let value = from_value::<serde_json::Value>(input)
        .map_err(|err| JsValue::from_str(&format!("Could not read directory JSON: {err}")))?;
    clinic_json::parse_directory_value(&value).map_err(to_js_error)
}

fn read_config(config: Option<JsValue>) -> Result<DirectoryConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_null() && !js_cfg.is_undefined() => {
            let cfg: JsDirectoryConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            Ok(DirectoryConfig::from(cfg))
        }
        _ => Ok(DirectoryConfig::default()),
    }
}

fn describe_dates(today: NaiveDate, cfg: &DirectoryConfig) -> Vec<JsBookableDate> {
    use chrono::Datelike;

    clinic_core::bookable_dates(today, cfg.booking_horizon_days)
        .into_iter()
        .map(|date| JsBookableDate {
            date,
            weekday: cfg.weekday_locale.name(date.weekday()),
        })
        .collect()
}

fn parse_kind(raw: &str) -> Result<RecordKind, DirectoryError> {
    match raw.trim().to_lowercase().as_str() {
        "pharmacy" | "pharmacies" => Ok(RecordKind::Pharmacy),
        "doctor" | "doctors" => Ok(RecordKind::Doctor),
        "facility" | "facilities" => Ok(RecordKind::Facility),
        other => Err(DirectoryError::InvalidInput(format!(
            "unknown record kind {other}"
        ))),
    }
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, DirectoryError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| DirectoryError::InvalidInput(format!("invalid date {raw}: {err}")))
}

fn to_js_error(err: DirectoryError) -> JsValue {
    JsValue::from_str(&format_directory_error(err))
}

fn format_directory_error(err: DirectoryError) -> String {
    format!("Directory error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_overlays_defaults() {
        let cfg = DirectoryConfig::from(JsDirectoryConfig {
            distance_decimals: Some(1),
            ..JsDirectoryConfig::default()
        });

        assert_eq!(cfg.distance_decimals, 1);
        assert_eq!(cfg.booking_horizon_days, 30);
        assert_eq!(cfg.weekday_locale, WeekdayLocale::French);
    }

    #[test]
    fn dates_are_named_in_the_configured_locale() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 13).expect("valid date");
        let cfg = DirectoryConfig {
            booking_horizon_days: 2,
            ..DirectoryConfig::default()
        };

        let rows = describe_dates(today, &cfg);
        let names: Vec<&str> = rows.iter().map(|row| row.weekday).collect();
        assert_eq!(names, vec!["Lundi", "Mardi"]);
    }

    #[test]
    fn ranked_rows_serialize_flat() {
        let directory = clinic_json::parse_directory_value(&serde_json::json!({
            "pharmacies": [
                {
                    "id": "2",
                    "name": "Pharmacie de la Baie",
                    "city": "Libreville",
                    "coordinates": { "lat": 0.4037, "lng": 9.4531 }
                }
            ]
        }))
        .expect("directory parses");

        let rows = ranked_rows(
            &directory,
            "",
            Some(GeoPoint::new(0.4162, 9.4673)),
            None,
            &DirectoryConfig::default(),
        );
        let value = serde_json::to_value(&rows).expect("rows serialize");
        let row = value[0].as_object().expect("row is an object");

        assert_eq!(row["name"], "Pharmacie de la Baie");
        assert_eq!(row["kind"], "pharmacy");
        assert_eq!(row["distance_label"], "2.10 km");
        assert!(row["distance_km"].is_f64());
        assert!(!row.contains_key("ranked"));
        assert!(!row.contains_key("record"));
    }

    #[test]
    fn kinds_and_dates_are_validated() {
        assert_eq!(parse_kind("Pharmacies").ok(), Some(RecordKind::Pharmacy));
        assert!(matches!(
            parse_kind("hospital"),
            Err(DirectoryError::InvalidInput(_))
        ));
        assert!(parse_iso_date("2025-02-30").is_err());
        assert_eq!(
            format_directory_error(DirectoryError::MissingData),
            "Directory error: input is missing the minimum directory data"
        );
    }
}
