use dialoguer::Select;
use strum::{EnumIter, IntoEnumIterator};

use crate::{
    context::Context,
    edit,
    logging::LogLevel,
    profile,
    report::{self, CliError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum Operation {
    Apply,
    Create,
    Edit,
    Delete,
    LogLevel,
    Quit,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Operation::Apply => "Apply Profile      Apply a saved profile to the assistant",
            Operation::Create => "Create Profile     Create a new profile",
            Operation::Edit => "Edit Profile       Modify an existing profile",
            Operation::Delete => "Delete Profile     Remove unwanted profiles",
            Operation::LogLevel => "Log Level          Change how much is logged",
            Operation::Quit => "Quit",
        }
    }

    fn run(self, ctx: &mut Context) -> Result<()> {
        match self {
            Operation::Apply => profile::apply(ctx, None),
            Operation::Create => profile::create(ctx, None, None, true),
            Operation::Edit => edit::handle(ctx, &edit::Command::Edit { profile: None }),
            Operation::Delete => profile::delete(ctx, None, false),
            Operation::LogLevel => change_log_level(ctx),
            Operation::Quit => Ok(()),
        }
    }
}

/// Show the operation menu until the user quits. A failed operation is reported and the menu
/// shown again.
pub fn run(ctx: &mut Context) -> Result<()> {
    let operations: Vec<Operation> = Operation::iter().collect();
    let labels: Vec<&str> = operations.iter().map(|op| op.label()).collect();

    loop {
        let picked = Select::new()
            .with_prompt("Select a profile operation")
            .items(labels.as_slice())
            .default(0)
            .interact_opt()?;

        let operation = picked
            .and_then(|index| operations.get(index).copied())
            .unwrap_or(Operation::Quit);
        if operation == Operation::Quit {
            return Ok(());
        }

        if let Err(err) = operation.run(ctx) {
            if matches!(err, CliError::Prompt(_)) {
                return Err(err);
            }
            report::show(&format!("{operation:?}"), &err);
        }
    }
}

fn change_log_level(ctx: &mut Context) -> Result<()> {
    let levels: Vec<LogLevel> = LogLevel::iter().collect();
    let current = levels
        .iter()
        .position(|level| *level == ctx.logger.level())
        .unwrap_or_default();

    let Some(level) = Select::new()
        .with_prompt("Log level")
        .items(levels.as_slice())
        .default(current)
        .interact_opt()?
        .and_then(|index| levels.get(index).copied())
    else {
        return Ok(());
    };

    ctx.logger.set_level(level);
    ctx.cfg.log_level = level.to_string();
    ctx.cfg.save_to(&ctx.config_path)?;
    report::success(&format!("Log level set to {level}"));

    Ok(())
}
