//! Plain-text report of saved properties.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::saved::SavedProperty;

const RULE: &str = "==================================================";
const SECTION_RULE: &str = "--------------------------------------------------";
const LABEL_WIDTH: usize = 22;

/// Renders saved properties as a fixed-layout text report.
///
/// Header (generation time, total), one section per property, footer.
#[must_use]
pub fn render_report<'a, I>(entries: I, generated_at: DateTime<Utc>) -> String
where
    I: IntoIterator<Item = &'a SavedProperty>,
{
    let entries: Vec<&SavedProperty> = entries.into_iter().collect();
    let total = entries.len();
    let mut out = String::new();

    let _ = writeln!(out, "PROPERTY REPORT");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "Total Properties: {total}");
    let _ = writeln!(out, "{RULE}");

    for (index, saved) in entries.iter().enumerate() {
        let view = saved.property.view();
        let saved_at = saved_label(saved);
        let id = saved.id.to_string();
        let _ = writeln!(out);
        let _ = writeln!(out, "Property {} of {total}", index + 1);
        let _ = writeln!(out, "{SECTION_RULE}");

        let rows: [(&str, &str); 16] = [
            ("Owner", view.owner.as_str()),
            ("Address", view.full_address.as_str()),
            ("Parcel ID", view.parcel_id.as_str()),
            ("Tax Lot", view.taxlot_id.as_str()),
            ("Property Type", view.property_type.as_str()),
            ("Zoning", view.zoning.as_str()),
            ("Year Built", view.year_built.as_str()),
            ("Lot Size", view.lot_size.as_str()),
            ("Assessed Value", view.assessed_value.as_str()),
            ("Land Value", view.land_value.as_str()),
            ("Improvement Value", view.improvement_value.as_str()),
            ("Township/Range/Sec", view.trs.as_str()),
            ("Coordinates", view.coordinates.as_str()),
            ("Data Source", source_label(saved)),
            ("Saved", saved_at.as_str()),
            ("ID", id.as_str()),
        ];
        for (label, value) in rows {
            let _ = writeln!(out, "{label:<LABEL_WIDTH$}: {value}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "End of Report");
    out
}

fn source_label(saved: &SavedProperty) -> &'static str {
    use crate::property::PropertySource;
    match saved.property.source {
        PropertySource::Taxlot => "County taxlot record",
        PropertySource::ReverseGeocode => "Reverse geocode (limited)",
        PropertySource::Coordinates => "Coordinates only (limited)",
    }
}

fn saved_label(saved: &SavedProperty) -> String {
    saved.saved_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
