use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use glucose_watch::commands;

fn build_cli() -> Command {
    Command::new("glucose-watch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Background glucose monitor with threshold alerts")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Start monitoring in the foreground (Ctrl+C to stop)")
                .arg(
                    Arg::new("low")
                        .long("low")
                        .value_name("MG_DL")
                        .help("Low threshold; values below it alert")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("high")
                        .long("high")
                        .value_name("MG_DL")
                        .help("High threshold; values above it alert")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("interval-minutes")
                        .short('i')
                        .long("interval-minutes")
                        .value_name("MINUTES")
                        .help("Minutes between readings (minimum 1)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("cooldown-minutes")
                        .short('c')
                        .long("cooldown-minutes")
                        .value_name("MINUTES")
                        .help("Minimum minutes between repeated notifications of the same kind")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("source-url")
                        .long("source-url")
                        .value_name("URL")
                        .help("Endpoint returning the current reading as JSON"),
                )
                .arg(
                    Arg::new("webhook-url")
                        .long("webhook-url")
                        .value_name("URL")
                        .help("Webhook receiving alert notifications"),
                )
                .arg(
                    Arg::new("audit-log")
                        .long("audit-log")
                        .value_name("PATH")
                        .help("Audit log file (default: ./alerts.log)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Log notifications instead of delivering them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Classify a single glucose value")
                .arg(
                    Arg::new("value")
                        .help("Glucose value in mg/dL")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("low")
                        .long("low")
                        .value_name("MG_DL")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("high")
                        .long("high")
                        .value_name("MG_DL")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or initialize configuration")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(
                    Command::new("init").about("Write a default config file").arg(
                        Arg::new("force")
                            .long("force")
                            .help("Overwrite an existing file")
                            .action(ArgAction::SetTrue),
                    ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("bash, zsh, fish, powershell or elvish")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    glucose_watch::init_logging();

    let mut cli = build_cli();
    let matches = cli.clone().get_matches();

    if matches.get_flag("version") {
        return commands::version::execute();
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run::execute(sub_matches),
        Some(("check", sub_matches)) => commands::check::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        Some(("completions", sub_matches)) => commands::completions::execute(sub_matches, &mut cli),
        Some(("version", _)) => commands::version::execute(),
        _ => {
            println!("Welcome to glucose-watch!");
            println!("Use 'glucose-watch --help' for more information.");
            Ok(())
        }
    }
}
