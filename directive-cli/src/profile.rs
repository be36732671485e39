use chrono::Local;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use directive_lib::{Error, Profile, ProfileId};
use tracing::debug;

use crate::{
    context::Context,
    edit,
    report::{self, Result},
};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List profiles
    List,
    /// Print a profile as an editable document
    Show { profile: String },
    /// Create a new profile and open it for editing
    Create {
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Don't open the editor after creating
        #[arg(long)]
        no_edit: bool,
    },
    /// Delete a profile
    Delete {
        profile: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Apply a profile's instructions to the assistant
    Apply { profile: Option<String> },
    /// Print the instructions currently applied
    Current,
}

pub fn handle(ctx: &mut Context, cmd: &Command) -> Result<()> {
    match cmd {
        Command::List => list(ctx),
        Command::Show { profile } => {
            let profile = find(ctx, profile)?;
            print!("{}", ctx.headings.serialize(&profile));
            Ok(())
        }
        Command::Create {
            name,
            description,
            no_edit,
        } => create(ctx, name.as_deref(), description.as_deref(), !no_edit),
        Command::Delete { profile, yes } => delete(ctx, profile.as_deref(), *yes),
        Command::Apply { profile } => apply(ctx, profile.as_deref()),
        Command::Current => {
            let instructions = ctx.repo.applied_instructions()?;
            if instructions.is_empty() {
                report::notice("No instructions are applied.");
            }
            for instruction in instructions {
                println!("* {}", instruction.text);
            }
            Ok(())
        }
    }
}

fn list(ctx: &Context) -> Result<()> {
    let profiles = ctx.repo.profiles()?;
    if profiles.is_empty() {
        report::notice("No saved profiles found. Please create a profile first.");
        return Ok(());
    }

    for profile in profiles {
        println!(
            "{}  {}  {}",
            profile.name.bold(),
            profile.description().dimmed(),
            format!("({})", last_updated(&profile)).dimmed()
        );
        println!("    id: {}, {} instruction(s)", profile.id, profile.instructions.len());
    }

    Ok(())
}

pub fn create(
    ctx: &mut Context,
    name: Option<&str>,
    description: Option<&str>,
    open_editor: bool,
) -> Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => Input::<String>::new()
            .with_prompt("Enter profile name (e.g. Code Reviewer, Documentation Writer)")
            .allow_empty(true)
            .interact_text()?,
    };
    if name.is_empty() {
        return Ok(());
    }

    let description = match description {
        Some(description) => description.to_string(),
        None => Input::<String>::new()
            .with_prompt("Enter profile description")
            .allow_empty(true)
            .interact_text()?,
    };

    let profile = ctx.repo.create_profile(&name, &description, Vec::new())?;
    report::success(&format!("Profile [{name}] has been created"));

    if open_editor {
        edit::run(ctx, profile)?;
    }

    Ok(())
}

pub fn delete(ctx: &mut Context, reference: Option<&str>, yes: bool) -> Result<()> {
    let Some(profile) = resolve(ctx, reference, "Select a profile to delete")? else {
        return Ok(());
    };

    if !yes
        && !Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete profile [{}]?",
                profile.name
            ))
            .default(false)
            .interact()?
    {
        debug!("Deletion of {} cancelled", profile.id);
        return Ok(());
    }

    ctx.repo.delete_profile(&profile.id)?;
    report::success(&format!("Profile [{}] has been deleted", profile.name));

    Ok(())
}

pub fn apply(ctx: &mut Context, reference: Option<&str>) -> Result<()> {
    let Some(profile) = resolve(ctx, reference, "Select a profile to apply")? else {
        return Ok(());
    };

    ctx.repo.apply_profile(&profile.id)?;
    report::success(&format!("Profile [{}] has been applied", profile.name));

    Ok(())
}

/// Resolve `reference` to a stored profile, or ask the user to pick one when it's absent.
///
/// Returns `None` when the user backs out or there is nothing to pick from.
pub fn resolve(ctx: &Context, reference: Option<&str>, prompt: &str) -> Result<Option<Profile>> {
    match reference {
        Some(reference) => Ok(Some(find(ctx, reference)?)),
        None => select(ctx, prompt),
    }
}

/// Find a profile by id, falling back to an exact name match.
fn find(ctx: &Context, reference: &str) -> Result<Profile> {
    let profiles = ctx.repo.profiles()?;
    let id = ProfileId::from(reference);

    profiles
        .iter()
        .find(|p| p.id == id)
        .or_else(|| profiles.iter().find(|p| p.name == reference))
        .cloned()
        .ok_or_else(|| Error::NotFound {
            id: reference.to_string(),
        })
        .map_err(Into::into)
}

/// Let the user pick a profile from a list.
fn select(ctx: &Context, prompt: &str) -> Result<Option<Profile>> {
    let profiles = ctx.repo.profiles()?;
    if profiles.is_empty() {
        report::notice("No saved profiles found. Please create a profile first.");
        return Ok(None);
    }

    let items: Vec<String> = profiles
        .iter()
        .map(|p| {
            format!(
                "{}  {}  (Last updated: {})",
                p.name,
                p.description(),
                last_updated(p)
            )
        })
        .collect();

    let picked = Select::new()
        .with_prompt(prompt)
        .items(items.as_slice())
        .default(0)
        .interact_opt()?;

    Ok(picked.and_then(|index| profiles.into_iter().nth(index)))
}

fn last_updated(profile: &Profile) -> String {
    profile
        .updated_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
