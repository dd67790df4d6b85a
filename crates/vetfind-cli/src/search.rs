//! `search` command: narrow, rank and print the clinic table.

use chrono::NaiveTime;
use vetfind_core::{ClinicRecord, Location};
use vetfind_engine::{distance_from, ResultStore, SameDayWindow, SortContext, SortCriterion};

const NAME_WIDTH: usize = 32;

/// Options for one `search` invocation after config defaults are applied.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchArgs {
    pub query: Option<String>,
    pub service: Option<String>,
    pub open_at: Option<NaiveTime>,
    pub sort: Option<SortCriterion>,
    pub origin: Option<Location>,
    pub limit: usize,
}

/// Parses `HH:MM` or `HH:MM:SS` for `--open-at`.
pub(crate) fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("expected a time of day like 09:30, got '{value}'"))
}

/// Picks the reference location: explicit `--lat/--lng` first, then the
/// configured origin.
///
/// # Errors
///
/// Returns an error if the explicit pair is not finite or out of range.
pub(crate) fn resolve_origin(
    lat: Option<f64>,
    lng: Option<f64>,
    configured: Option<Location>,
) -> anyhow::Result<Option<Location>> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Ok(configured);
    };
    let location = Location::new(lat, lng);
    if !location.is_in_range() {
        anyhow::bail!(
            "--lat/--lng must be within [-90, 90] and [-180, 180], got ({lat}, {lng})"
        );
    }
    Ok(Some(location))
}

/// Applies the filters in order query, service, open-now, then the sort.
///
/// # Errors
///
/// Returns an error if a distance sort is requested without any location.
pub(crate) fn narrow(store: &mut ResultStore, args: &SearchArgs) -> anyhow::Result<()> {
    if let Some(query) = args.query.as_deref() {
        store.apply_filter(query);
    }
    if let Some(tag) = args.service.as_deref() {
        store.apply_service_filter(tag);
    }
    if let Some(at) = args.open_at {
        store.apply_open_filter(&SameDayWindow, at);
    }
    if let Some(criterion) = args.sort {
        if criterion == SortCriterion::Distance && args.origin.is_none() {
            anyhow::bail!(
                "distance sort needs a location; pass --lat/--lng or set \
                 VETFIND_ORIGIN_LAT/VETFIND_ORIGIN_LNG"
            );
        }
        let ctx = SortContext {
            reference: args.origin,
        };
        store.apply_sort(criterion, &ctx)?;
    }
    Ok(())
}

/// Runs `search` against an already loaded store and prints the result table.
///
/// # Errors
///
/// Returns an error if a distance sort is requested without any location.
pub(crate) fn run_search(mut store: ResultStore, args: &SearchArgs) -> anyhow::Result<()> {
    narrow(&mut store, args)?;

    let results = store.current();
    if results.is_empty() {
        println!("no clinics match; try a broader query");
        return Ok(());
    }

    let header = format!(
        "{:<width$}{:<8}{:<11}SERVICES",
        "NAME",
        "RATING",
        "DISTANCE",
        width = NAME_WIDTH
    );
    println!("{header}");
    for record in results.iter().take(args.limit) {
        println!("{}", format_row(record, args.origin.as_ref()));
    }
    if results.len() > args.limit {
        println!("showing {} of {} clinics", args.limit, results.len());
    }

    Ok(())
}

fn format_row(record: &ClinicRecord, origin: Option<&Location>) -> String {
    let name = if record.name.chars().count() > NAME_WIDTH - 2 {
        format!(
            "{}...",
            record.name.chars().take(NAME_WIDTH - 5).collect::<String>()
        )
    } else {
        record.name.clone()
    };
    let distance = origin
        .and_then(|o| distance_from(o, record))
        .map_or_else(|| "\u{2014}".to_string(), |km| format!("{km:.1} km"));
    let services = if record.services_offered.is_empty() {
        "\u{2014}".to_string()
    } else {
        record.services_offered.join(", ")
    };
    format!(
        "{:<width$}{:<8.1}{:<11}{}",
        name,
        record.rating,
        distance,
        services,
        width = NAME_WIDTH
    )
}
