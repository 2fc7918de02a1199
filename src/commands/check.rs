use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::glucose_monitor::classify;
use crate::core::Config;
use crate::ui::status_formatters::format_classification;

/// Classify a single value against the configured thresholds
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let value = *matches
        .get_one::<f64>("value")
        .context("Value argument is required")?;

    let mut config = Config::load()?;
    if let Some(low) = matches.get_one::<f64>("low") {
        config.low_threshold = *low;
    }
    if let Some(high) = matches.get_one::<f64>("high") {
        config.high_threshold = *high;
    }

    let monitor_config = config.monitor_config();
    monitor_config.validate()?;

    println!(
        "{} mg/dL: {} (range {} - {})",
        value,
        format_classification(classify(value, &monitor_config)),
        monitor_config.low_threshold,
        monitor_config.high_threshold
    );

    Ok(())
}
