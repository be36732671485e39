//! The edit flow: open a profile as a document, let the user change it in their editor, then
//! save or apply what they wrote.

use clap::Subcommand;
use dialoguer::{Editor, Select};
use directive_lib::{
    DocumentId, Error, Profile,
    session::{apply_current_edit, save_current_edit},
};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::warn;

use crate::{
    context::Context,
    profile,
    report::{self, CliError, Result},
};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Edit a profile in $VISUAL or $EDITOR
    Edit { profile: Option<String> },
}

pub fn handle(ctx: &mut Context, cmd: &Command) -> Result<()> {
    match cmd {
        Command::Edit { profile: reference } => {
            let Some(profile) =
                profile::resolve(ctx, reference.as_deref(), "Select a profile to edit")?
            else {
                return Ok(());
            };
            run(ctx, profile)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
enum Action {
    #[strum(to_string = "Save profile")]
    Save,
    #[strum(to_string = "Apply profile")]
    Apply,
    #[strum(to_string = "Edit again")]
    EditAgain,
    #[strum(to_string = "Close")]
    Close,
}

/// Open `profile` for editing and stay in the edit loop until the user closes the document.
pub fn run(ctx: &mut Context, profile: Profile) -> Result<()> {
    let doc = ctx.sessions.open(profile, &ctx.headings);
    report::notice(
        "Edit content under each [#] heading. When finished, save and close the editor to \
         choose whether to save or apply the profile.",
    );
    report::notice(
        "Lines starting with \"# \" are read as headings; anything under an unknown heading \
         is dropped.",
    );

    let result = edit_loop(ctx, doc);
    ctx.sessions.close(doc);

    result
}

fn edit_loop(ctx: &mut Context, doc: DocumentId) -> Result<()> {
    loop {
        let Some(session) = ctx.sessions.get_mut(doc) else {
            warn!("No edit session found: {doc}");
            report::notice("No profile to save.");
            return Ok(());
        };

        match Editor::new().extension(".md").edit(session.text())? {
            Some(text) => session.set_text(text),
            None => report::notice("The editor was closed without saving; keeping previous text."),
        }

        let actions: Vec<Action> = Action::iter().collect();
        let picked = Select::new()
            .with_prompt("What do you want to do with this profile?")
            .items(actions.as_slice())
            .default(0)
            .interact_opt()?;

        let action = picked
            .and_then(|index| actions.get(index).copied())
            .unwrap_or(Action::Close);

        match action {
            Action::Save => save(ctx, doc),
            Action::Apply => apply(ctx, doc),
            Action::EditAgain => {}
            Action::Close => return Ok(()),
        }
    }
}

/// Save the document. Failures are reported and leave the document open.
fn save(ctx: &Context, doc: DocumentId) {
    let Some(session) = ctx.sessions.get(doc) else {
        report::notice("No profile to save.");
        return;
    };

    match save_current_edit(&ctx.repo, session, &ctx.headings) {
        Ok(profile) => report::success(&format!("Profile [{}] has been updated", profile.name)),
        Err(err @ Error::NotFound { .. }) => {
            report::show("SaveProfileCommand", &CliError::from(err));
            report::notice(&format!(
                "Profile [{}] not found. Please create a new one.",
                session.profile().name
            ));
        }
        Err(err) => report::show("SaveProfileCommand", &CliError::from(err)),
    }
}

/// Apply the document without saving it. Failures are reported and leave the document open.
fn apply(ctx: &Context, doc: DocumentId) {
    let Some(session) = ctx.sessions.get(doc) else {
        report::notice("No profile to save.");
        return;
    };

    match apply_current_edit(&ctx.repo, session, &ctx.headings) {
        Ok(draft) => report::success(&format!("Profile [{}] has been applied", draft.name)),
        Err(err) => report::show("ApplyEditCommand", &CliError::from(err)),
    }
}
