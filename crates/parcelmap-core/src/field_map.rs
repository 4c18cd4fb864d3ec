//! Candidate source-field names per canonical property concept.

use serde::{Deserialize, Serialize};

/// Ordered candidate field names for every canonical concept.
///
/// Earlier names win when several are present. Deserializing a partial map
/// (e.g. from `config/sources.yaml`) replaces only the listed concepts and
/// keeps the built-in lists for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub owner: Vec<String>,
    pub situs: Vec<String>,
    pub city: Vec<String>,
    pub state: Vec<String>,
    pub zip: Vec<String>,
    pub assessed_value: Vec<String>,
    pub land_value: Vec<String>,
    pub improvement_value: Vec<String>,
    pub acreage: Vec<String>,
    pub zoning: Vec<String>,
    pub year_built: Vec<String>,
    pub parcel_id: Vec<String>,
    pub taxlot_id: Vec<String>,
    pub property_type: Vec<String>,
    pub township: Vec<String>,
    pub range: Vec<String>,
    pub section: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            owner: names(&[
                "OWNER1",
                "OWNER",
                "OWNER_NAME",
                "OWNERNAME",
                "OWNNAME",
                "OWNER_1",
                "TAXPAYER",
            ]),
            situs: names(&[
                "SITUS",
                "SITUS_ADDR",
                "SITUSADDR",
                "SITE_ADDR",
                "SITEADDRESS",
                "PROP_ADDR",
                "ADDRESS",
            ]),
            city: names(&["SITUS_CITY", "SITUSCITY", "SITE_CITY", "CITY"]),
            state: names(&["SITUS_STATE", "SITUSSTATE", "STATE"]),
            zip: names(&["SITUS_ZIP", "SITUSZIP", "ZIP", "ZIPCODE", "ZIP_CODE"]),
            assessed_value: names(&[
                "TOTALVAL",
                "TOTAL_VALUE",
                "ASSESSED",
                "ASSESSEDVAL",
                "AV_TOTAL",
                "RMV_TOTAL",
            ]),
            land_value: names(&["LANDVAL", "LAND_VALUE", "RMV_LAND", "LNDVAL"]),
            improvement_value: names(&[
                "IMPVAL",
                "IMPROVEMENT_VALUE",
                "IMP_VALUE",
                "BLDGVAL",
                "RMV_IMPR",
            ]),
            acreage: names(&["ACRES", "ACREAGE", "GIS_ACRES", "CALC_ACRES", "TAXACRES"]),
            zoning: names(&["ZONE", "ZONING", "ZONE_CODE", "ZONECLASS"]),
            year_built: names(&["YEARBUILT", "YEAR_BUILT", "YR_BUILT", "YRBLT"]),
            parcel_id: names(&[
                "PARCEL_ID",
                "PARCELID",
                "MAPTAXLOT",
                "MAP_TAXLOT",
                "PIN",
                "APN",
                "ACCOUNT",
            ]),
            taxlot_id: names(&["TAXLOT", "TAX_LOT", "TAXLOT_ID", "TLNO", "MAPLOT"]),
            property_type: names(&[
                "PROP_CLASS",
                "PROPCLASS",
                "PROPERTY_TYPE",
                "PROP_TYPE",
                "LANDUSE",
                "USE_CODE",
            ]),
            township: names(&["TOWNSHIP", "TWP", "TOWN"]),
            range: names(&["RANGE", "RNG"]),
            section: names(&["SECTION", "SEC"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lists_are_non_empty() {
        let map = FieldMap::default();
        for list in [
            &map.owner,
            &map.situs,
            &map.city,
            &map.state,
            &map.zip,
            &map.assessed_value,
            &map.land_value,
            &map.improvement_value,
            &map.acreage,
            &map.zoning,
            &map.year_built,
            &map.parcel_id,
            &map.taxlot_id,
            &map.property_type,
            &map.township,
            &map.range,
            &map.section,
        ] {
            assert!(!list.is_empty());
        }
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "owner: [OWNER_FULL, OWNER1]\n";
        let map: FieldMap = serde_yaml::from_str(yaml).expect("partial field map parses");
        assert_eq!(map.owner, vec!["OWNER_FULL", "OWNER1"]);
        assert_eq!(map.zoning, FieldMap::default().zoning);
    }
}
