//! Refresh, clear-cache and clear-storage commands.

use anyhow::Result;

use wayfinder_core::{AppDataCache, SettingsService, clear_cache, clear_local_storage, refresh};

use super::Context;

pub async fn cmd_refresh(ctx: &Context) -> Result<()> {
    let settings = SettingsService::load(&ctx.state)?.settings().clone();
    let client = ctx.client()?;
    let can_fetch = ctx.can_fetch(&client, &settings).await;

    let app_data = AppDataCache::new(&ctx.state, &client);
    let report = refresh(&app_data, &ctx.cache, can_fetch).await?;

    if !ctx.quiet {
        if report.reseeded {
            println!("Fetched fresh location data from {}", ctx.service_url);
        } else if let Some(reason) = &report.reseed_error {
            println!("Kept cached location data ({})", reason);
        } else {
            println!("Kept cached location data (offline)");
        }
        if report.caches_deleted.is_empty() {
            println!("No cached assets to delete");
        } else {
            println!("Deleted caches: {}", report.caches_deleted.join(", "));
        }
        if report.reloaded {
            println!("Reloaded");
        }
    }
    Ok(())
}

pub async fn cmd_clear_cache(ctx: &Context) -> Result<()> {
    let sent = clear_cache(&ctx.cache).await?;
    if !ctx.quiet {
        if sent {
            println!("Map tile cache cleared.");
        } else {
            println!("No active worker; nothing to clear.");
        }
    }
    Ok(())
}

pub fn cmd_clear_storage(ctx: &Context) -> Result<()> {
    clear_local_storage(&ctx.state)?;
    if !ctx.quiet {
        println!("Cleared saved settings, location and data.");
    }
    Ok(())
}
