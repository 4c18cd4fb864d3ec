//! `identify` and `search` command handlers.

use parcelmap_core::{LatLng, PropertyView, SavedError, SavedStore};
use parcelmap_resolver::{DataQuality, ParcelResolution, ParcelResolver, ResolveError};

pub(crate) async fn run_identify(
    resolver: &ParcelResolver,
    store: Option<&mut SavedStore>,
    point: LatLng,
) -> anyhow::Result<()> {
    let resolution = resolver.identify(point).await;
    print_resolution(&resolution);

    if let Some(store) = store {
        match store.save(resolution.property) {
            Ok(saved) => println!("\nsaved as {}", saved.id),
            Err(SavedError::AlreadySaved { .. }) => println!("\nalready in the saved list"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

pub(crate) async fn run_search(resolver: &ParcelResolver, query: &str) -> anyhow::Result<()> {
    let candidates = match resolver.search(query).await {
        Ok(candidates) => candidates,
        Err(ResolveError::Unreachable { reasons }) => {
            anyhow::bail!(
                "address search is unavailable; check your network connection ({})",
                reasons.join("; ")
            );
        }
        Err(e) => return Err(e.into()),
    };

    if candidates.is_empty() {
        println!("no matches for \"{}\"", query.trim());
        return Ok(());
    }

    println!("{:>5}  {:<56}  LOCATION", "SCORE", "ADDRESS");
    for candidate in &candidates {
        println!(
            "{:>5.1}  {:<56}  {}",
            candidate.match_score, candidate.address, candidate.location
        );
    }
    Ok(())
}

fn print_resolution(resolution: &ParcelResolution) {
    match resolution.quality() {
        DataQuality::Full => {
            println!("Property information loaded from county records.\n");
        }
        DataQuality::Limited => {
            println!(
                "warning: county records unavailable; showing limited data ({})\n",
                resolution.property.source
            );
        }
    }

    print_view(&resolution.property.view());

    if let Some(endpoint) = &resolution.endpoint {
        println!("\nsource endpoint: {endpoint}");
    }
    if !resolution.failures.is_empty() {
        println!("\nattempts that returned nothing:");
        for failure in &resolution.failures {
            println!("  - {failure}");
        }
    }
}

pub(crate) fn print_view(view: &PropertyView) {
    let rows = [
        ("Owner", &view.owner),
        ("Address", &view.full_address),
        ("Assessed Value", &view.assessed_value),
        ("Land Value", &view.land_value),
        ("Improvement Value", &view.improvement_value),
        ("Lot Size", &view.lot_size),
        ("Zoning", &view.zoning),
        ("Year Built", &view.year_built),
        ("Parcel ID", &view.parcel_id),
        ("Taxlot ID", &view.taxlot_id),
        ("Property Type", &view.property_type),
        ("T/R/S", &view.trs),
        ("Coordinates", &view.coordinates),
    ];
    for (label, value) in rows {
        println!("{label:>18}: {value}");
    }
}
