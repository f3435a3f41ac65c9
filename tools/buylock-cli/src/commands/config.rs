//! Configuration management commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use reqwest::Url;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output
        .kv("data_dir", &ctx.config.storage.data_dir.display().to_string());
    if ctx.output.is_verbose() {
        ctx.output.kv("resolved", &ctx.data_dir().display().to_string());
    }

    ctx.output.info("");
    ctx.output.info("[rates]");
    ctx.output.kv("endpoint", &ctx.config.rates.endpoint);
    ctx.output.kv("ttl_secs", &ctx.config.rates.ttl_secs.to_string());
    ctx.output
        .kv("timeout_secs", &ctx.config.rates.timeout_secs.to_string());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = existing_config_file(ctx) else {
        bail!("No config file found. Run `buylock config init` to create one.");
    };

    let mut config = CliConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match Url::parse(&config.rates.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "rates.endpoint must use http or https, not '{}'",
            url.scheme()
        )),
        Err(e) => errors.push(format!("rates.endpoint is not a valid URL: {}", e)),
    }

    if config.rates.timeout_secs == 0 {
        errors.push("rates.timeout_secs must be greater than 0".to_string());
    }
    if config.rates.ttl_secs == 0 {
        warnings.push("rates.ttl_secs is 0; every run will request fresh rates".to_string());
    }
    if config.storage.data_dir.as_os_str().is_empty() {
        errors.push("storage.data_dir is required".to_string());
    }

    (errors, warnings)
}

fn existing_config_file(ctx: &Context) -> Option<PathBuf> {
    ctx.config_path.clone().or_else(|| {
        CONFIG_NAMES
            .iter()
            .map(|name| ctx.cwd.join(name))
            .find(|path| path.is_file())
    })
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "data_dir"] => Ok(config.storage.data_dir.display().to_string()),
        ["rates", "endpoint"] => Ok(config.rates.endpoint.clone()),
        ["rates", "ttl_secs"] => Ok(config.rates.ttl_secs.to_string()),
        ["rates", "timeout_secs"] => Ok(config.rates.timeout_secs.to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "data_dir"] => config.storage.data_dir = PathBuf::from(value),
        ["rates", "endpoint"] => config.rates.endpoint = value.to_string(),
        ["rates", "ttl_secs"] => config.rates.ttl_secs = value.parse()?,
        ["rates", "timeout_secs"] => config.rates.timeout_secs = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_values() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "rates.ttl_secs", "120").unwrap();
        set_config_value(&mut config, "storage.data_dir", "/tmp/buylock").unwrap();

        assert_eq!(get_config_value(&config, "rates.ttl_secs").unwrap(), "120");
        assert_eq!(
            get_config_value(&config, "storage.data_dir").unwrap(),
            "/tmp/buylock"
        );
        assert!(set_config_value(&mut config, "rates.ttl_secs", "soon").is_err());
        assert!(get_config_value(&config, "rates.currency").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let (errors, warnings) = check_config(&CliConfig::default());
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_check_config_flags_bad_values() {
        let mut config = CliConfig::default();
        config.rates.endpoint = "ftp://rates.example".to_string();
        config.rates.timeout_secs = 0;
        config.rates.ttl_secs = 0;

        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 1);
    }
}
