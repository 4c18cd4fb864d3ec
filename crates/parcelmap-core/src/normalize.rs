//! Normalization from raw attribute bags to [`Property`].
//!
//! Field lookup is delegated to [`crate::resolve`]; this module only maps
//! canonical concepts to their candidate lists.

use crate::field_map::FieldMap;
use crate::property::{LatLng, Property, PropertySource, DEFAULT_STATE};
use crate::resolve::{resolve_number, resolve_text, RawAttributes};

const GEOCODER_SITUS_FIELDS: &[&str] = &["Address", "Match_addr", "LongLabel"];
const GEOCODER_CITY_FIELDS: &[&str] = &["City"];
const GEOCODER_STATE_FIELDS: &[&str] = &["RegionAbbr", "Region"];
const GEOCODER_ZIP_FIELDS: &[&str] = &["Postal"];

/// Normalizes a taxlot attribute bag using the given field map.
///
/// Total and pure: any bag, including an empty one, yields a record.
#[must_use]
pub fn normalize(attributes: &RawAttributes, fields: &FieldMap) -> Property {
    Property {
        source: PropertySource::Taxlot,
        owner: resolve_text(attributes, &fields.owner),
        situs_address: resolve_text(attributes, &fields.situs),
        city: resolve_text(attributes, &fields.city),
        state: resolve_text(attributes, &fields.state)
            .unwrap_or_else(|| DEFAULT_STATE.to_string()),
        zip: resolve_text(attributes, &fields.zip),
        assessed_value: resolve_number(attributes, &fields.assessed_value),
        land_value: resolve_number(attributes, &fields.land_value),
        improvement_value: resolve_number(attributes, &fields.improvement_value),
        acreage: resolve_number(attributes, &fields.acreage),
        zoning: resolve_text(attributes, &fields.zoning),
        year_built: resolve_text(attributes, &fields.year_built),
        parcel_id: resolve_text(attributes, &fields.parcel_id),
        taxlot_id: resolve_text(attributes, &fields.taxlot_id),
        property_type: resolve_text(attributes, &fields.property_type),
        township: resolve_text(attributes, &fields.township),
        range: resolve_text(attributes, &fields.range),
        section: resolve_text(attributes, &fields.section),
        coordinates: None,
        raw_attributes: attributes.clone(),
    }
}

/// [`normalize`] with the built-in [`FieldMap`].
#[must_use]
pub fn normalize_default(attributes: &RawAttributes) -> Property {
    normalize(attributes, &FieldMap::default())
}

impl Property {
    /// Placeholder for a point with no attribute source at all.
    #[must_use]
    pub fn from_coordinates(point: LatLng) -> Self {
        Self {
            coordinates: Some(point),
            ..Self::empty(PropertySource::Coordinates)
        }
    }

    /// Placeholder built from a reverse geocoder's `address` object.
    ///
    /// Owner stays unavailable; situs, city, state and zip come from the
    /// geocoder fields.
    #[must_use]
    pub fn from_reverse_geocode(point: LatLng, address: &RawAttributes) -> Self {
        Self {
            situs_address: resolve_text(address, GEOCODER_SITUS_FIELDS),
            city: resolve_text(address, GEOCODER_CITY_FIELDS),
            state: resolve_text(address, GEOCODER_STATE_FIELDS)
                .unwrap_or_else(|| DEFAULT_STATE.to_string()),
            zip: resolve_text(address, GEOCODER_ZIP_FIELDS),
            coordinates: Some(point),
            raw_attributes: address.clone(),
            ..Self::empty(PropertySource::ReverseGeocode)
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
