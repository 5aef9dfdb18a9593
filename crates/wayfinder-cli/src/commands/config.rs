//! Config command.

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::{ConfigAction, ConfigKey};
use crate::config::{Config, DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT_SECS};

pub fn cmd_config(ctx: &Context, action: ConfigAction) -> Result<()> {
    let mut config = ctx.config.clone();

    match action {
        ConfigAction::Show => {
            println!(
                "service_url = {}",
                config.service_url.as_deref().unwrap_or(DEFAULT_SERVICE_URL)
            );
            println!(
                "timeout     = {}s",
                config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
            );
        }
        ConfigAction::Path => println!("{}", Config::path().display()),
        ConfigAction::Set { key, value } => {
            apply_set(&mut config, key, &value)?;
            config.save()?;
            if !ctx.quiet {
                println!("Set {:?} = {}", key, value);
            }
        }
        ConfigAction::Unset { key } => {
            match key {
                ConfigKey::ServiceUrl => config.service_url = None,
                ConfigKey::Timeout => config.timeout = None,
            }
            config.save()?;
            if !ctx.quiet {
                println!("Unset {:?}", key);
            }
        }
    }
    Ok(())
}

fn apply_set(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::ServiceUrl => {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                anyhow::bail!("service URL must start with http:// or https://");
            }
            config.service_url = Some(value.to_string());
        }
        ConfigKey::Timeout => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("'{}' is not a number of seconds", value))?;
            config.timeout = Some(secs);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_set() {
        let mut config = Config::default();

        apply_set(&mut config, ConfigKey::ServiceUrl, "https://api.example").unwrap();
        apply_set(&mut config, ConfigKey::Timeout, "30").unwrap();
        assert_eq!(config.service_url.as_deref(), Some("https://api.example"));
        assert_eq!(config.timeout, Some(30));

        assert!(apply_set(&mut config, ConfigKey::ServiceUrl, "ftp://x").is_err());
        assert!(apply_set(&mut config, ConfigKey::Timeout, "soon").is_err());
        assert_eq!(config.timeout, Some(30));
    }
}
