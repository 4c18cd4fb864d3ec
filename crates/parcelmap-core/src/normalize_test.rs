use serde_json::{json, Value};

use super::*;
use crate::property::NOT_AVAILABLE;

fn attrs(value: Value) -> RawAttributes {
    value
        .as_object()
        .cloned()
        .expect("test attributes are an object")
}

fn lane_county_taxlot() -> RawAttributes {
    attrs(json!({
        "MAPTAXLOT": "1703253100400",
        "TAXLOT": "00400",
        "OWNNAME": "SMITH JOHN & JANE",
        "SITUS": "1234 OAK ST",
        "SITUS_CITY": "EUGENE",
        "SITUS_ZIP": "97401",
        "TOTALVAL": 312500,
        "LANDVAL": "120,000",
        "IMPVAL": 192500.0,
        "ACRES": 0.23,
        "ZONE": "R-1",
        "YEARBUILT": 1962,
        "PROP_CLASS": "101",
        "TWP": "17S",
        "RNG": "03W",
        "SEC": "25",
        "OBJECTID": 88121
    }))
}

// -----------------------------------------------------------------------
// normalize
// -----------------------------------------------------------------------

#[test]
fn normalize_maps_every_concept() {
    let p = normalize_default(&lane_county_taxlot());

    assert_eq!(p.source, PropertySource::Taxlot);
    assert_eq!(p.owner.as_deref(), Some("SMITH JOHN & JANE"));
    assert_eq!(p.situs_address.as_deref(), Some("1234 OAK ST"));
    assert_eq!(p.city.as_deref(), Some("EUGENE"));
    assert_eq!(p.state, "OR");
    assert_eq!(p.zip.as_deref(), Some("97401"));
    assert_eq!(p.assessed_value, Some(312_500.0));
    assert_eq!(p.land_value, Some(120_000.0));
    assert_eq!(p.improvement_value, Some(192_500.0));
    assert_eq!(p.acreage, Some(0.23));
    assert_eq!(p.zoning.as_deref(), Some("R-1"));
    assert_eq!(p.year_built.as_deref(), Some("1962"));
    assert_eq!(p.parcel_id.as_deref(), Some("1703253100400"));
    assert_eq!(p.taxlot_id.as_deref(), Some("00400"));
    assert_eq!(p.property_type.as_deref(), Some("101"));
    assert_eq!(p.trs_label(), "T17S R03W S25");
    assert_eq!(p.full_address(), "1234 OAK ST, EUGENE, OR, 97401");
    assert_eq!(p.lot_size_label(), "0.23 acres");
    assert_eq!(p.raw_attributes.get("OBJECTID"), Some(&json!(88121)));
}

#[test]
fn normalize_empty_bag_is_total() {
    let p = normalize_default(&RawAttributes::new());
    let view = p.view();

    assert_eq!(view.owner, "Unknown Owner");
    assert_eq!(view.state, "OR");
    assert_eq!(view.zoning, NOT_AVAILABLE);
    assert_eq!(view.year_built, NOT_AVAILABLE);
    assert_eq!(view.parcel_id, NOT_AVAILABLE);
    assert_eq!(view.taxlot_id, NOT_AVAILABLE);
    assert_eq!(view.property_type, NOT_AVAILABLE);
    assert_eq!(view.assessed_value, NOT_AVAILABLE);
    assert_eq!(view.land_value, NOT_AVAILABLE);
    assert_eq!(view.improvement_value, NOT_AVAILABLE);
    assert_eq!(view.lot_size, NOT_AVAILABLE);
    assert_eq!(view.trs, NOT_AVAILABLE);

    let rendered = serde_json::to_value(&view).expect("view serializes");
    for (field, value) in rendered.as_object().expect("view is an object") {
        if let Some(text) = value.as_str() {
            assert!(!text.is_empty(), "view field {field} is empty");
        }
    }
}

#[test]
fn normalize_is_idempotent() {
    let bag = lane_county_taxlot();
    let first = normalize_default(&bag);
    let second = normalize_default(&bag);
    assert_eq!(first, second);
    assert_eq!(first.uniqueness_key(), second.uniqueness_key());
}

#[test]
fn normalize_respects_custom_field_map() {
    let bag = attrs(json!({ "OWNER1": "PRIMARY", "CUSTOM_OWNER": "OVERRIDE" }));
    let fields = FieldMap {
        owner: vec!["CUSTOM_OWNER".to_string()],
        ..FieldMap::default()
    };
    assert_eq!(normalize(&bag, &fields).owner.as_deref(), Some("OVERRIDE"));
    assert_eq!(normalize_default(&bag).owner.as_deref(), Some("PRIMARY"));
}

#[test]
fn normalize_reads_state_from_attributes() {
    let bag = attrs(json!({ "SITUS_STATE": "WA" }));
    assert_eq!(normalize_default(&bag).state, "WA");
}

#[test]
fn blank_owner_falls_back_to_next_candidate() {
    let bag = attrs(json!({ "OWNER1": "", "owner_name": "COUNTY OF LANE" }));
    assert_eq!(
        normalize_default(&bag).owner.as_deref(),
        Some("COUNTY OF LANE")
    );
}

// -----------------------------------------------------------------------
// placeholders
// -----------------------------------------------------------------------

#[test]
fn coordinate_placeholder_renders_coordinates() {
    let p = Property::from_coordinates(LatLng::new(44.123_456, -123.654_321));
    let view = p.view();

    assert_eq!(p.source, PropertySource::Coordinates);
    assert_eq!(view.parcel_id, "N/A");
    assert_eq!(view.full_address, "Coordinates: 44.123456, -123.654321");
    assert_eq!(view.owner, "Owner not available");
    assert_eq!(view.situs_address, "Address not available");
}

#[test]
fn reverse_geocode_placeholder_uses_geocoder_fields() {
    let address = attrs(json!({
        "Match_addr": "1234 Oak St, Eugene, Oregon, 97401",
        "Address": "1234 Oak St",
        "City": "Eugene",
        "Region": "Oregon",
        "RegionAbbr": "OR",
        "Postal": "97401"
    }));
    let p = Property::from_reverse_geocode(LatLng::new(44.05, -123.09), &address);

    assert_eq!(p.source, PropertySource::ReverseGeocode);
    assert_eq!(p.situs_address.as_deref(), Some("1234 Oak St"));
    assert_eq!(p.city.as_deref(), Some("Eugene"));
    assert_eq!(p.state, "OR");
    assert_eq!(p.zip.as_deref(), Some("97401"));
    assert_eq!(p.owner_display(), "Owner not available");
    assert_eq!(p.full_address(), "1234 Oak St, Eugene, OR, 97401");
}

#[test]
fn reverse_geocode_placeholder_falls_back_to_match_addr() {
    let address = attrs(json!({ "Address": "", "Match_addr": "Rural Route 2", "Region": "Oregon" }));
    let p = Property::from_reverse_geocode(LatLng::new(44.0, -123.0), &address);
    assert_eq!(p.situs_address.as_deref(), Some("Rural Route 2"));
    assert_eq!(p.state, "Oregon");
}

#[test]
fn uniqueness_key_collides_for_identical_strings() {
    // Distinct parcels that share parcel id, situs and owner text produce the
    // same key; dedup treats them as one.
    let bag_a = attrs(json!({ "PARCEL_ID": "X1", "SITUS": "1 MAIN", "OWNER": "A", "ACRES": 1.0 }));
    let bag_b = attrs(json!({ "PARCEL_ID": "x1", "SITUS": "1 main", "OWNER": "a", "ACRES": 9.0 }));
    assert_eq!(
        normalize_default(&bag_a).uniqueness_key(),
        normalize_default(&bag_b).uniqueness_key()
    );
}

#[test]
fn padded_blank_owner_does_not_shadow_later_candidate() {
    let p = normalize_default(&attrs(json!({ "OWNER1": "   ", "OWNER": "JONES MARY" })));
    assert_eq!(p.owner.as_deref(), Some("JONES MARY"));
    assert_eq!(p.view().owner, "JONES MARY");
}

#[test]
fn coordinate_placeholders_share_one_uniqueness_key() {
    // Every bare-coordinate record displays the same parcel id, situs and
    // owner, so dedup cannot tell two clicked points apart.
    let a = Property::from_coordinates(LatLng::new(44.05, -123.09));
    let b = Property::from_coordinates(LatLng::new(45.52, -122.68));
    assert_ne!(a.view().full_address, b.view().full_address);
    assert_eq!(a.uniqueness_key(), b.uniqueness_key());
    assert_eq!(a.uniqueness_key(), "n/a|address not available|owner not available");
}
