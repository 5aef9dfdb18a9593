//! Locations command - the distance-sorted list of nearby sites.

use anyhow::Result;

use wayfinder_core::{SettingsService, assemble_view, resolve_current_location};
use wayfinder_types::ServiceType;

use super::{Context, current_app_data};
use crate::cli::{OutputFormat, PositionArgs};
use crate::format::{format_locations_json, format_locations_text};
use crate::position::StaticPosition;

pub async fn cmd_locations(
    ctx: &Context,
    search: &str,
    service_type: ServiceType,
    position: &PositionArgs,
    format: OutputFormat,
) -> Result<()> {
    let settings = SettingsService::load(&ctx.state)?.settings().clone();
    let app_data = current_app_data(ctx, &settings).await?;

    let provider = StaticPosition::from_args(position);
    let current = resolve_current_location(&provider, &ctx.state).await?;
    if current.is_none() && !ctx.quiet {
        eprintln!("Current location unknown. Set it with: wayfinder locate --lat <LAT> --lon <LON>");
    }

    let view = assemble_view(
        app_data.data.locations(service_type),
        current,
        f64::from(settings.location_range),
        search,
    );

    match format {
        OutputFormat::Json => println!("{}", format_locations_json(&view)?),
        OutputFormat::Text if view.is_empty() => {
            if current.is_some() && !ctx.quiet {
                println!(
                    "No {} locations within {} km.",
                    service_type, settings.location_range
                );
            }
        }
        OutputFormat::Text => println!("{}", format_locations_text(&view)),
    }

    Ok(())
}
