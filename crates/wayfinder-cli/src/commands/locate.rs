//! Locate command - set, clear or show the cached current location.

use anyhow::Result;

use wayfinder_core::{CURRENT_LOCATION_KEY, KeyValueStore, resolve_current_location};

use super::Context;
use crate::cli::PositionArgs;
use crate::position::StaticPosition;

pub async fn cmd_locate(ctx: &Context, position: &PositionArgs, clear: bool) -> Result<()> {
    if clear {
        ctx.state.remove(CURRENT_LOCATION_KEY)?;
        if !ctx.quiet {
            println!("Current location cleared.");
        }
        return Ok(());
    }

    let provider = StaticPosition::from_args(position);
    match resolve_current_location(&provider, &ctx.state).await? {
        Some(coordinate) => println!("{}", coordinate),
        None => {
            if !ctx.quiet {
                println!("Current location unknown.");
                println!();
                println!("Set it with: wayfinder locate --lat <LAT> --lon <LON>");
            }
        }
    }
    Ok(())
}
