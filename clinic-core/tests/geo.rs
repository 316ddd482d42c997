use clinic_core::{distance_km, format_distance, GeoPoint};

fn chu_libreville() -> GeoPoint {
    GeoPoint::new(0.4162, 9.4673)
}

#[test]
fn distance_is_symmetric_and_zero_on_identity() {
    let points = [
        chu_libreville(),
        GeoPoint::new(0.4037, 9.4531),
        GeoPoint::new(-0.7193, 8.7815),
        GeoPoint::new(48.8566, 2.3522),
        GeoPoint::new(-33.8688, 151.2093),
    ];

    for a in points {
        assert_eq!(distance_km(a, a), 0.0);
        for b in points {
            assert_eq!(distance_km(a, b), distance_km(b, a));
            assert!(distance_km(a, b) >= 0.0);
        }
    }
}

#[test]
fn distance_matches_known_libreville_values() {
    let louis = GeoPoint::new(0.4037, 9.4531);
    let owendo = GeoPoint::new(0.3475, 9.5025);

    let near = distance_km(chu_libreville(), louis);
    let far = distance_km(chu_libreville(), owendo);

    assert!((near - 2.10).abs() < 0.01, "got {near}");
    assert!((far - 8.58).abs() < 0.01, "got {far}");
}

#[test]
fn one_degree_of_latitude_is_about_111_km() {
    let d = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
    assert!((d - 111.19).abs() < 0.01, "got {d}");
}

#[test]
fn triangle_inequality_holds_along_a_meridian() {
    let a = GeoPoint::new(-10.0, 9.0);
    let b = GeoPoint::new(0.5, 9.0);
    let c = GeoPoint::new(12.0, 9.0);

    let direct = distance_km(a, c);
    let via = distance_km(a, b) + distance_km(b, c);
    assert!(direct <= via + 1e-9);
}

#[test]
fn formats_with_requested_decimals() {
    assert_eq!(format_distance(2.103553, 2), "2.10 km");
    assert_eq!(format_distance(8.583409, 1), "8.6 km");
    assert_eq!(format_distance(0.0, 0), "0 km");
}

#[test]
fn validity_checks_ranges_and_finiteness() {
    assert!(chu_libreville().is_valid());
    assert!(GeoPoint::new(-90.0, 180.0).is_valid());
    assert!(!GeoPoint::new(90.5, 0.0).is_valid());
    assert!(!GeoPoint::new(0.0, -181.0).is_valid());
    assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
}
