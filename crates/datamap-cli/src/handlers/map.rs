//! Map command handler

use super::input::Input;
use crate::cli::MapArgs;
use crate::config::{Config, CONFIG_NAMESPACE};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use datamap_core::{MaterializeOptions, Materialized, Materializer};
use tracing::{debug, info};

/// Handle the map command
pub fn handle_map(args: MapArgs, config: &Config, output: OutputWriter) -> Result<()> {
    let input = Input::from_arg(args.input.as_deref());
    if args.lines && input.is_yaml() {
        return Err(Error::invalid_args("--lines reads JSON Lines and cannot be used with a YAML input"));
    }
    let timer = Timer::with_details("map", &input.display_path().to_string_lossy());

    let options = build_options(&args, config)?;
    let materializer = build_materializer(config)?;
    let mut output = match &args.output_file {
        Some(path) => output.to_file(path)?,
        None => output,
    };

    let count = if args.lines {
        map_lines(&input, &materializer, &options, &mut output)?
    } else {
        let data = input.read_document()?;
        let result = materializer.materialize(&data, &options)?;
        output.data(&result.to_value())?;
        record_count(&result)
    };

    info!(records = count, "Mapped records");
    if let Some(path) = &args.output_file {
        output.success(&format!("✓ Wrote {} record(s) to {}", count, path.display()));
    }
    timer.finish();
    Ok(())
}

/// Stream JSON Lines through the lazy materializer, writing each result as it comes
fn map_lines(
    input: &Input,
    materializer: &Materializer,
    options: &MaterializeOptions,
    output: &mut OutputWriter,
) -> Result<usize> {
    let mut parse_error = None;
    let values = input.read_lines()?.map_while(|line| match line {
        Ok(value) => Some(value),
        Err(e) => {
            parse_error = Some(e);
            None
        }
    });

    let mut count = 0;
    for result in materializer.materialize_iter(values, options) {
        let result = result?;
        count += record_count(&result);
        output.item(&result.to_value())?;
    }
    output.flush()?;

    match parse_error {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

fn record_count(result: &Materialized) -> usize {
    match result {
        Materialized::Many(items) => items.len(),
        _ => 1,
    }
}

/// Combine the active profile with command-line overrides
///
/// Flags add to the profile: renames and removals are appended, and
/// `--flatten`/`--suppress-null` switch the setting on. `--type` and
/// `--discriminator` replace the profile's choice of target.
pub fn build_options(args: &MapArgs, config: &Config) -> Result<MaterializeOptions> {
    let profile = config.active_profile(args.profile.as_deref())?;
    let mut builder = profile.options_builder();

    if args.flatten {
        builder = builder.flatten(true);
    }
    if args.suppress_null {
        builder = builder.suppress_null(true);
    }
    builder = builder
        .renames(args.renames.iter().cloned())
        .removes(args.removes.iter().cloned());

    let target = match (&args.type_name, &args.discriminator) {
        (Some(name), _) => Some(name.as_str()),
        (None, Some(_)) => None,
        (None, None) => profile.target.as_deref(),
    };

    match target {
        Some(name) => {
            debug!(type_name = name, "Using configured target type");
            builder = builder.target_type(config.target_type(name)?);
        }
        None => {
            if let Some(key) = &args.discriminator {
                builder = builder.discriminator_key(key.as_str());
            }
            if args.discriminator.is_some() || profile.discriminator.is_some() || !config.types.is_empty() {
                builder = builder.namespace(CONFIG_NAMESPACE);
            }
        }
    }

    Ok(builder.build()?)
}

/// Engine set up with the configured converters and types
pub fn build_materializer(config: &Config) -> Result<Materializer> {
    Ok(Materializer::with_registry(config.registry()?).with_catalog(config.catalog()?))
}
