//! Settings command.

use anyhow::Result;

use wayfinder_core::{SettingChange, SettingsService};

use super::Context;
use crate::analytics::TracingAnalytics;
use crate::cli::{OutputFormat, SettingArg, SettingsAction};
use crate::format::format_settings_text;

pub fn cmd_settings(ctx: &Context, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show { format } => {
            let service = SettingsService::load(&ctx.state)?;
            match format {
                OutputFormat::Text => println!("{}", format_settings_text(service.settings())),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(service.settings())?)
                }
            }
        }
        SettingsAction::Set { setting } => {
            let mut service =
                SettingsService::load(&ctx.state)?.with_analytics(Box::new(TracingAnalytics));
            let change = setting_change(setting);
            service.apply(change.clone())?;

            if !ctx.quiet {
                println!(
                    "Set {} = {}",
                    change_label(&change),
                    applied_value(&change, service.settings().location_range)
                );
            }
        }
    }
    Ok(())
}

/// Map a parsed setting to the core mutation.
pub fn setting_change(setting: SettingArg) -> SettingChange {
    match setting {
        SettingArg::Lang { value } => SettingChange::Lang(value),
        SettingArg::OfflineMode { enabled } => SettingChange::OfflineMode(enabled),
        SettingArg::AnalyticsOptIn { enabled } => SettingChange::AnalyticsOptIn(enabled),
        SettingArg::LocationRange { km } => SettingChange::LocationRange(km),
    }
}

/// Value echoed back after a change; the range shows its clamped result.
fn applied_value(change: &SettingChange, location_range: u32) -> String {
    match change {
        SettingChange::LocationRange(_) => format!("{} km", location_range),
        other => other.value(),
    }
}

fn change_label(change: &SettingChange) -> &'static str {
    match change {
        SettingChange::Lang(_) => "lang",
        SettingChange::OfflineMode(_) => "offline-mode",
        SettingChange::AnalyticsOptIn(_) => "analytics-opt-in",
        SettingChange::LocationRange(_) => "location-range",
    }
}
