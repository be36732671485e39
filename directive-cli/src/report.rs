//! Turning failures into something the user can read.

use std::io;

use colored::Colorize;
use directive_lib::ErrorKind;
use sysexits::ExitCode;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Profile(#[from] directive_lib::Error),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CliError {
    pub fn user_message(&self) -> String {
        match self {
            CliError::Profile(err) => err.user_message(),
            other => format!("An unexpected error occurred: {other}"),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Profile(err) => match err.kind() {
                ErrorKind::Validation | ErrorKind::Format => ExitCode::DataErr,
                ErrorKind::NotFound => ExitCode::NoInput,
                ErrorKind::Save | ErrorKind::Storage => ExitCode::IoErr,
                ErrorKind::Application => ExitCode::CantCreat,
            },
            CliError::Prompt(_) => ExitCode::Software,
            CliError::Io(_) => ExitCode::IoErr,
        }
    }
}

/// Log `err` with the context it happened in and show the user what went wrong.
pub fn show(context: &str, err: &CliError) {
    error!("[{context}] Error occurred: {err}");
    eprintln!("{} {}", "error:".red().bold(), err.user_message());
}

/// Like [`show`], for failures that end the process.
pub fn handle(context: &str, err: &CliError) -> ExitCode {
    show(context, err);

    err.exit_code()
}

pub fn success(message: &str) {
    println!("{} {message}", "✓".green().bold());
}

pub fn notice(message: &str) {
    println!("{} {message}", "i".blue().bold());
}
