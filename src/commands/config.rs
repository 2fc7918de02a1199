use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("path", _)) => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        Some(("init", sub_matches)) => init(sub_matches.get_flag("force")),
        _ => {
            println!("Use 'glucose-watch config --help' for more information.");
            Ok(())
        }
    }
}

/// Print the effective configuration (file + environment)
fn show() -> Result<()> {
    let config = Config::load()?;
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}

/// Write a default config file
fn init(force: bool) -> Result<()> {
    let path = Config::get_config_path()?;

    if path.exists() && !force {
        println!(
            "{}",
            format!("⚠️  Config already exists at {}", path.display()).yellow()
        );
        println!("{}", "Use --force to overwrite it.".dimmed());
        return Ok(());
    }

    Config::default().save()?;
    println!(
        "{} {}",
        "✓ Default config written to:".green(),
        path.display().to_string().cyan()
    );

    Ok(())
}
