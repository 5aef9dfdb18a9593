//! Services command.

use anyhow::Result;

use wayfinder_core::SettingsService;
use wayfinder_types::ServiceType;

use super::{Context, current_app_data};
use crate::cli::OutputFormat;
use crate::format::format_services_text;

pub async fn cmd_services(
    ctx: &Context,
    service_type: Option<ServiceType>,
    format: OutputFormat,
) -> Result<()> {
    let settings = SettingsService::load(&ctx.state)?.settings().clone();
    let app_data = current_app_data(ctx, &settings).await?;
    let data = &app_data.data;

    match (service_type, format) {
        (Some(service_type), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(data.services(service_type))?);
        }
        (Some(service_type), OutputFormat::Text) => {
            println!("{}", format_services_text(data.services(service_type)));
        }
        (None, OutputFormat::Json) => {
            let all = serde_json::json!({
                "serviceBCServices": data.services(ServiceType::ServiceBC),
                "healthBCServices": data.services(ServiceType::HealthBC),
            });
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        (None, OutputFormat::Text) => {
            for (i, service_type) in ServiceType::ALL.into_iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}:", service_type);
                for service in data.services(service_type) {
                    println!("  {}", service);
                }
            }
        }
    }

    Ok(())
}
