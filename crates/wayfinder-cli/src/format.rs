//! Output formatting for locations, services and settings.

use anyhow::Result;
use tabled::{builder::Builder, settings::Style};

use wayfinder_core::{LocatedLocation, Settings};

/// Render the location view as a table, closest first.
pub fn format_locations_text(view: &[LocatedLocation]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Distance (km)", "Locale", "Address", "Services"]);
    for entry in view {
        let location = &entry.location;
        builder.push_record([
            entry.distance.clone(),
            location.locale.clone(),
            location.address.clone().unwrap_or_default(),
            location.services.join(", "),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn format_locations_json(view: &[LocatedLocation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// One service per line.
pub fn format_services_text(services: &[String]) -> String {
    services.join("\n")
}

pub fn format_settings_text(settings: &Settings) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Setting", "Value"]);
    builder.push_record(["lang", settings.lang.as_str()]);
    builder.push_record(["offline-mode", bool_str(settings.offline_mode)]);
    builder.push_record(["analytics-opt-in", bool_str(settings.analytics_opt_in)]);
    builder.push_record([
        "location-range".to_string(),
        format!("{} km", settings.location_range),
    ]);

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn bool_str(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
