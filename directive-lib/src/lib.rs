//! Manage named instruction profiles for an AI coding assistant.
//!
//! Profiles live in a key-value [`Store`](repository::store::Store) and are applied by
//! overwriting the assistant's instruction list in the editor's settings. The
//! [`Repository`] is the entry point for both.

pub mod document;
pub mod error;
pub mod fs;
pub mod repository;
pub mod session;

pub use document::{Headings, ProfileDraft};
pub use error::{Error, ErrorKind, Result};
pub use repository::{
    Repository,
    config::CoreConfig,
    entities::{Instruction, Profile, ProfileId},
};
pub use session::{DocumentId, EditSession, EditSessions};
