//! Canonical property record and its presentation view.
//!
//! [`Property`] keeps absence explicit with `Option`; the `"N/A"` sentinel
//! and the owner/address defaults only appear in [`PropertyView`].

use serde::{Deserialize, Serialize};

use crate::resolve::RawAttributes;

/// Presentation sentinel for a field with no value.
pub const NOT_AVAILABLE: &str = "N/A";

pub const DEFAULT_STATE: &str = "OR";

const UNKNOWN_OWNER: &str = "Unknown Owner";
const OWNER_NOT_AVAILABLE: &str = "Owner not available";
const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// A WGS84 coordinate, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both axes are finite and inside the WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Which resolution strategy produced a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySource {
    /// Attributes of an intersecting taxlot feature.
    Taxlot,
    /// Address from a reverse geocoder; no assessment data.
    ReverseGeocode,
    /// Nothing but the clicked coordinates.
    Coordinates,
}

impl std::fmt::Display for PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertySource::Taxlot => write!(f, "taxlot"),
            PropertySource::ReverseGeocode => write!(f, "reverse_geocode"),
            PropertySource::Coordinates => write!(f, "coordinates"),
        }
    }
}

/// Normalized parcel record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub source: PropertySource,
    pub owner: Option<String>,
    pub situs_address: Option<String>,
    pub city: Option<String>,
    pub state: String,
    pub zip: Option<String>,
    pub assessed_value: Option<f64>,
    pub land_value: Option<f64>,
    pub improvement_value: Option<f64>,
    pub acreage: Option<f64>,
    pub zoning: Option<String>,
    pub year_built: Option<String>,
    pub parcel_id: Option<String>,
    pub taxlot_id: Option<String>,
    pub property_type: Option<String>,
    pub township: Option<String>,
    pub range: Option<String>,
    pub section: Option<String>,
    /// Point the user identified, when known.
    pub coordinates: Option<LatLng>,
    /// Source attribute bag, kept for diagnostics only.
    #[serde(default)]
    pub raw_attributes: RawAttributes,
}

impl Property {
    /// An empty record of the given source with every optional field unset.
    #[must_use]
    pub fn empty(source: PropertySource) -> Self {
        Self {
            source,
            owner: None,
            situs_address: None,
            city: None,
            state: DEFAULT_STATE.to_string(),
            zip: None,
            assessed_value: None,
            land_value: None,
            improvement_value: None,
            acreage: None,
            zoning: None,
            year_built: None,
            parcel_id: None,
            taxlot_id: None,
            property_type: None,
            township: None,
            range: None,
            section: None,
            coordinates: None,
            raw_attributes: RawAttributes::new(),
        }
    }

    #[must_use]
    pub fn owner_display(&self) -> &str {
        match (&self.owner, self.source) {
            (Some(owner), _) => owner,
            (None, PropertySource::Taxlot) => UNKNOWN_OWNER,
            (None, _) => OWNER_NOT_AVAILABLE,
        }
    }

    #[must_use]
    pub fn situs_display(&self) -> &str {
        self.situs_address.as_deref().unwrap_or(ADDRESS_NOT_AVAILABLE)
    }

    /// Single-line address for display.
    ///
    /// Coordinate placeholders render as `Coordinates: <lat>, <lng>`.
    /// Otherwise the situs, `city, state` and zip parts that are present
    /// are joined with `", "`.
    #[must_use]
    pub fn full_address(&self) -> String {
        if self.source == PropertySource::Coordinates {
            if let Some(point) = self.coordinates {
                return format!("Coordinates: {point}");
            }
        }

        let mut parts: Vec<String> = Vec::new();
        if let Some(situs) = &self.situs_address {
            parts.push(situs.clone());
        }
        let locality: Vec<&str> = [self.city.as_deref(), Some(self.state.as_str())]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if !locality.is_empty() {
            parts.push(locality.join(", "));
        }
        if let Some(zip) = &self.zip {
            parts.push(zip.clone());
        }

        if parts.is_empty() {
            ADDRESS_NOT_AVAILABLE.to_string()
        } else {
            parts.join(", ")
        }
    }

    #[must_use]
    pub fn lot_size_label(&self) -> String {
        self.acreage
            .map_or_else(|| NOT_AVAILABLE.to_string(), |acres| format!("{acres:.2} acres"))
    }

    /// Township/Range/Section label, `?` for each missing part.
    #[must_use]
    pub fn trs_label(&self) -> String {
        if self.township.is_none() && self.range.is_none() && self.section.is_none() {
            return NOT_AVAILABLE.to_string();
        }
        let part = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".to_string());
        format!(
            "T{} R{} S{}",
            part(&self.township),
            part(&self.range),
            part(&self.section)
        )
    }

    /// Key used to reject duplicate saves.
    ///
    /// Built from the displayed parcel id, situs and owner, lowercased. Two
    /// distinct parcels with identical strings collide; that is accepted.
    /// Coordinate placeholders all share one key, so only the first of them
    /// can be saved.
    #[must_use]
    pub fn uniqueness_key(&self) -> String {
        format!(
            "{}|{}|{}",
            text_or_na(self.parcel_id.as_ref()),
            self.situs_display(),
            self.owner_display()
        )
        .to_lowercase()
    }

    /// Presentation view with every field populated.
    #[must_use]
    pub fn view(&self) -> PropertyView {
        PropertyView {
            source: self.source,
            owner: self.owner_display().to_string(),
            situs_address: self.situs_display().to_string(),
            city: text_or_na(self.city.as_ref()),
            state: self.state.clone(),
            zip: text_or_na(self.zip.as_ref()),
            full_address: self.full_address(),
            assessed_value: money_or_na(self.assessed_value),
            land_value: money_or_na(self.land_value),
            improvement_value: money_or_na(self.improvement_value),
            lot_size: self.lot_size_label(),
            zoning: text_or_na(self.zoning.as_ref()),
            year_built: text_or_na(self.year_built.as_ref()),
            parcel_id: text_or_na(self.parcel_id.as_ref()),
            taxlot_id: text_or_na(self.taxlot_id.as_ref()),
            property_type: text_or_na(self.property_type.as_ref()),
            township: text_or_na(self.township.as_ref()),
            range: text_or_na(self.range.as_ref()),
            section: text_or_na(self.section.as_ref()),
            trs: self.trs_label(),
            coordinates: self
                .coordinates
                .map_or_else(|| NOT_AVAILABLE.to_string(), |p| p.to_string()),
            uniqueness_key: self.uniqueness_key(),
        }
    }
}

/// Display-ready rendering of a [`Property`]; no field is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    pub source: PropertySource,
    pub owner: String,
    pub situs_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub full_address: String,
    pub assessed_value: String,
    pub land_value: String,
    pub improvement_value: String,
    pub lot_size: String,
    pub zoning: String,
    pub year_built: String,
    pub parcel_id: String,
    pub taxlot_id: String,
    pub property_type: String,
    pub township: String,
    pub range: String,
    pub section: String,
    pub trs: String,
    pub coordinates: String,
    pub uniqueness_key: String,
}

fn text_or_na(value: Option<&String>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), Clone::clone)
}

fn money_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_currency)
}

/// Formats a dollar amount as `$1,234,567`, rounded to whole dollars.
#[must_use]
pub fn format_currency(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(245_300.0), "$245,300");
        assert_eq!(format_currency(1_234_567.8), "$1,234,568");
        assert_eq!(format_currency(-1_500.0), "-$1,500");
    }

    #[test]
    fn trs_label_requires_at_least_one_part() {
        let mut p = Property::empty(PropertySource::Taxlot);
        assert_eq!(p.trs_label(), "N/A");
        p.township = Some("17S".to_string());
        assert_eq!(p.trs_label(), "T17S R? S?");
        p.range = Some("4W".to_string());
        p.section = Some("23".to_string());
        assert_eq!(p.trs_label(), "T17S R4W S23");
    }

    #[test]
    fn lot_size_uses_two_decimals() {
        let mut p = Property::empty(PropertySource::Taxlot);
        assert_eq!(p.lot_size_label(), "N/A");
        p.acreage = Some(0.5);
        assert_eq!(p.lot_size_label(), "0.50 acres");
    }

    #[test]
    fn full_address_joins_present_parts() {
        let mut p = Property::empty(PropertySource::Taxlot);
        p.situs_address = Some("123 Main St".to_string());
        p.city = Some("Eugene".to_string());
        p.zip = Some("97401".to_string());
        assert_eq!(p.full_address(), "123 Main St, Eugene, OR, 97401");

        p.city = None;
        p.zip = None;
        assert_eq!(p.full_address(), "123 Main St, OR");
    }

    #[test]
    fn owner_default_depends_on_source() {
        assert_eq!(
            Property::empty(PropertySource::Taxlot).owner_display(),
            "Unknown Owner"
        );
        assert_eq!(
            Property::empty(PropertySource::ReverseGeocode).owner_display(),
            "Owner not available"
        );
    }

    #[test]
    fn uniqueness_key_is_lowercase_composite() {
        let mut p = Property::empty(PropertySource::Taxlot);
        p.parcel_id = Some("17-04-23-00-01200".to_string());
        p.situs_address = Some("123 MAIN ST".to_string());
        p.owner = Some("SMITH JOHN".to_string());
        assert_eq!(p.uniqueness_key(), "17-04-23-00-01200|123 main st|smith john");
    }

    #[test]
    fn coordinate_validation() {
        assert!(LatLng::new(44.05, -123.09).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, f64::NAN).is_valid());
    }
}
