use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use directive_lib::CoreConfig;
use tracing::debug;

use crate::{
    context::Context,
    logging::{LogLevel, Logger},
    report::Result,
};

mod context;
mod edit;
mod logging;
mod menu;
mod profile;
mod report;

#[derive(Parser, Debug)]
#[command(name = "directive")]
#[command(author, version, about = "Manage instruction profiles for your coding assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Use this config file instead of the default one
    #[arg(short, long, global = true, env = "DIRECTIVE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Write applied instructions to this settings file
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Pick an operation from a menu (the default)
    Menu,
    #[command(flatten)]
    Profile(profile::Command),
    #[command(flatten)]
    Edit(edit::Command),
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let logger = Logger::init(cli.log_level.unwrap_or_default());

    match run(cli, logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report::handle("directive", &err).into(),
    }
}

fn run(cli: Cli, mut logger: Logger) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => CoreConfig::path()?,
    };
    let mut cfg = CoreConfig::load_from(&config_path)?;

    if cli.log_level.is_none() {
        logger.set_level(LogLevel::from_config(&cfg.log_level));
    }
    if let Some(settings) = cli.settings {
        cfg.settings_path = Some(settings);
    }

    let mut ctx = Context::new(cfg, config_path, logger)?;
    debug!("Using config {}", ctx.config_path.display());

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&mut ctx),
        Command::Profile(cmd) => profile::handle(&mut ctx, &cmd),
        Command::Edit(cmd) => edit::handle(&mut ctx, &cmd),
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["directive"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from([
            "directive",
            "create",
            "Reviewer",
            "-d",
            "Reviews code",
            "--no-edit",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(
            cli.command,
            Some(Command::Profile(profile::Command::Create { ref name, no_edit: true, .. }))
                if name.as_deref() == Some("Reviewer")
        ));

        let cli = Cli::try_parse_from(["directive", "delete", "Reviewer", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Profile(profile::Command::Delete { yes: true, .. }))
        ));

        let cli = Cli::try_parse_from(["directive", "edit"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Edit(edit::Command::Edit { profile: None }))
        ));
    }
}
