//! `run` command: start the monitor in the foreground until Ctrl+C.

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::sync::{mpsc, Arc};

use crate::core::glucose_monitor::{
    AlertSink, MonitorController, MonitorServices, SuggestionProvider,
};
use crate::core::integrations::{
    DisabledSuggestions, DryRunSink, FileAuditLog, HttpReadingSource, HttpSuggestionProvider,
    WebhookSink,
};
use crate::core::Config;
use crate::ui::status_formatters::format_status;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load()?;
    apply_cli_overrides(&mut config, matches);

    let dry_run = matches.get_flag("dry-run");
    let services = build_services(&config, dry_run)?;
    let controller = MonitorController::new(services);

    let outcome = controller
        .start(config.monitor_config())
        .context("Failed to start glucose monitor")?;

    println!("{}", format!("✓ {}", outcome.message).green());
    println!("{}", format_status(&outcome.status));
    println!();
    println!("{}", "Press Ctrl+C to stop.".dimmed());

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .context("Failed to install Ctrl+C handler")?;

    // Sender lives in the handler for the rest of the process
    let _ = rx.recv();

    println!();
    println!("{}", "Stopping glucose monitor...".cyan());
    let outcome = controller.stop();
    println!("{}", outcome.message.green());
    println!("{}", format_status(&outcome.status));

    Ok(())
}

/// CLI flags win over file and environment settings
pub fn apply_cli_overrides(config: &mut Config, matches: &ArgMatches) {
    if let Some(low) = matches.get_one::<f64>("low") {
        config.low_threshold = *low;
    }
    if let Some(high) = matches.get_one::<f64>("high") {
        config.high_threshold = *high;
    }
    if let Some(minutes) = matches.get_one::<u64>("interval-minutes") {
        config.interval_minutes = *minutes;
    }
    if let Some(minutes) = matches.get_one::<u64>("cooldown-minutes") {
        config.cooldown_minutes = *minutes;
    }
    if let Some(url) = matches.get_one::<String>("source-url") {
        config.source_url = Some(url.clone());
    }
    if let Some(url) = matches.get_one::<String>("webhook-url") {
        config.webhook_url = Some(url.clone());
    }
    if let Some(path) = matches.get_one::<String>("audit-log") {
        config.audit_log_path = Some(path.clone());
    }
}

/// Pick and construct the collaborators once, from configuration
pub fn build_services(config: &Config, dry_run: bool) -> Result<MonitorServices> {
    let timeout = config.request_timeout();

    let source_url = config.source_url.as_deref().ok_or_else(|| {
        anyhow!("No reading source configured. Use --source-url or set GLUCOSE_SOURCE_URL")
    })?;
    let source = HttpReadingSource::new(source_url, config.source_token.clone(), timeout)?;

    let suggestions: Arc<dyn SuggestionProvider> = match &config.suggestion_url {
        Some(url) => Arc::new(HttpSuggestionProvider::new(url.as_str(), timeout)?),
        None => Arc::new(DisabledSuggestions),
    };

    let sink: Arc<dyn AlertSink> = match (&config.webhook_url, dry_run) {
        (Some(url), false) => Arc::new(WebhookSink::new(url.as_str(), timeout)?),
        _ => {
            log::info!(
                "Alerts will be logged, not delivered ({} recipient(s))",
                config.recipients.len()
            );
            Arc::new(DryRunSink::new(config.recipients.clone()))
        }
    };

    Ok(MonitorServices {
        source: Arc::new(source),
        suggestions,
        sink,
        audit_log: Arc::new(FileAuditLog::new(config.audit_log_path())),
    })
}
