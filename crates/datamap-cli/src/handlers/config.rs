//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigShowArgs};
use crate::config::{Config, CONFIG_NAMESPACE};
use crate::error::Result;
use crate::output::OutputWriter;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, mut output: OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, &mut output),
        ConfigAction::Profiles => handle_config_profiles(config, &mut output),
        ConfigAction::Validate => handle_config_validate(config, &output),
    }
}

fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = render_config(config, args.format)?;
    output.write(&content)?;
    output.flush()
}

/// Serialize the effective configuration
pub fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let content = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => format!("{}\n", serde_json::to_string_pretty(config)?),
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(content)
}

fn handle_config_profiles(config: &Config, output: &mut OutputWriter) -> Result<()> {
    if config.profiles.is_empty() {
        output.info("No profiles configured");
        return Ok(());
    }

    let rows = config
        .profiles
        .iter()
        .map(|(name, profile)| {
            let marker = if config.default_profile.as_ref() == Some(name) {
                " (default)"
            } else {
                ""
            };
            let target = match (&profile.target, &profile.discriminator) {
                (Some(target), _) => target.clone(),
                (None, Some(key)) => format!("by '{}'", key),
                (None, None) => "-".to_string(),
            };
            vec![
                format!("{}{}", name, marker),
                profile.flatten.to_string(),
                target,
                profile.rename.len().to_string(),
                profile.remove.len().to_string(),
            ]
        })
        .collect();

    output.table(&["Profile", "Flatten", "Target", "Renames", "Removals"], rows)
}

fn handle_config_validate(config: &Config, output: &OutputWriter) -> Result<()> {
    output.info("Validating configuration...");

    if let Err(e) = config.validate() {
        output.warning(&format!("✗ Configuration validation failed: {}", e));
        return Err(e);
    }
    output.success("✓ Configuration is valid");

    output.info(&format!("Timezone: {}", config.timezone));
    if !config.types.is_empty() {
        output.info(&format!(
            "Types in namespace '{}': {}",
            CONFIG_NAMESPACE,
            config.types.keys().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    let sources = Config::default_config_paths()
        .into_iter()
        .filter(|path| path.exists())
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>();
    if sources.is_empty() {
        output.info("No configuration file found in the default locations");
    } else {
        output.info(&format!("Configuration files found: {}", sources.join(", ")));
    }

    let env_vars = ["DATAMAP_CONFIG", "DATAMAP_PROFILE", "DATAMAP_LOG_FORMAT", "DATAMAP_LOG_FILE", "DATAMAP_LOG_CONSOLE"];
    for var in env_vars {
        if let Ok(value) = std::env::var(var) {
            output.info(&format!("• {} = {}", var, value));
        }
    }

    Ok(())
}
