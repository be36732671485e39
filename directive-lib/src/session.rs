//! Open editing documents and the profiles they were opened for.
//!
//! Whoever drives the editing UI owns an [`EditSessions`] registry. Opening a profile for
//! editing registers a document; saving or applying reads the document's text back through
//! the registry; closing the document drops the association and nothing else.

use std::collections::HashMap;

use derive_more::Display;
use getset::Getters;
use tracing::{debug, info, warn};

use crate::{
    Error, Repository, Result,
    document::{Headings, ProfileDraft},
    repository::entities::Profile,
};

/// Handle to one open editing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("document-{_0}")]
pub struct DocumentId(u64);

/// A profile opened for editing together with the document's current text.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct EditSession {
    /// Snapshot of the profile at the time the document was opened
    profile: Profile,
    /// Latest contents of the document
    text: String,
}

impl EditSession {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Parse the current text with `headings`.
    pub fn draft(&self, headings: &Headings) -> Result<ProfileDraft> {
        headings.parse(&self.text)
    }
}

#[derive(Debug, Default)]
pub struct EditSessions {
    sessions: HashMap<DocumentId, EditSession>,
    next_id: u64,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new document for `profile`, seeded with its serialized text.
    pub fn open(&mut self, profile: Profile, headings: &Headings) -> DocumentId {
        let doc = DocumentId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let text = headings.serialize(&profile);
        debug!("Opened {doc} for profile {}", profile.id);
        self.sessions.insert(doc, EditSession { profile, text });

        doc
    }

    pub fn get(&self, doc: DocumentId) -> Option<&EditSession> {
        let session = self.sessions.get(&doc);
        if session.is_none() {
            warn!("No edit session found: {doc}");
        }

        session
    }

    pub fn get_mut(&mut self, doc: DocumentId) -> Option<&mut EditSession> {
        self.sessions.get_mut(&doc)
    }

    pub fn contains(&self, doc: DocumentId) -> bool {
        self.sessions.contains_key(&doc)
    }

    /// Handle the document being closed. Returns the session if one was registered.
    pub fn close(&mut self, doc: DocumentId) -> Option<EditSession> {
        let session = self.sessions.remove(&doc);
        if session.is_some() {
            debug!("Closed {doc}");
        }

        session
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Persist the edits in `session` to the profile it was opened for.
///
/// The stored profile is re-read first, so a profile deleted while the document was open is
/// reported as [`Error::NotFound`] rather than recreated.
pub fn save_current_edit(
    repo: &Repository,
    session: &EditSession,
    headings: &Headings,
) -> Result<Profile> {
    let draft = session.draft(headings)?;
    let id = &session.profile().id;

    let Some(mut profile) = repo.profile(id)? else {
        warn!("Profile not found: {id}");
        return Err(Error::not_found(id));
    };

    draft.apply_to(&mut profile);
    repo.update_profile(&mut profile)?;

    Ok(profile)
}

/// Apply the instructions currently in `session` without saving them.
///
/// Returns the parsed draft so callers can report which profile was applied.
pub fn apply_current_edit(
    repo: &Repository,
    session: &EditSession,
    headings: &Headings,
) -> Result<ProfileDraft> {
    let draft = session.draft(headings)?;
    repo.apply_instructions(&draft.instructions)?;

    info!("Applied unsaved edits of \"{}\"", draft.name);

    Ok(draft)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ErrorKind, repository::entities::Instruction};

    #[test]
    fn test_open_seeds_text() {
        let repo = Repository::mock();
        let profile = repo
            .create_profile("Reviewer", "d", vec![Instruction::new("a")])
            .unwrap();
        let mut sessions = EditSessions::new();

        let doc = sessions.open(profile.clone(), &Headings::default());

        let session = sessions.get(doc).unwrap();
        assert_eq!(session.profile(), &profile);
        assert_eq!(session.text(), &Headings::default().serialize(&profile));
    }

    #[test]
    fn test_documents_are_distinct() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();

        let a = sessions.open(profile.clone(), &Headings::default());
        let b = sessions.open(profile, &Headings::default());

        assert_ne!(a, b);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_close_only_drops_association() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();
        let doc = sessions.open(profile.clone(), &Headings::default());

        assert!(sessions.close(doc).is_some());
        assert!(!sessions.contains(doc));
        assert!(sessions.get(doc).is_none());
        assert!(sessions.close(doc).is_none());
        assert_eq!(repo.profile(&profile.id).unwrap(), Some(profile));
    }

    #[test]
    fn test_clear() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();
        sessions.open(profile.clone(), &Headings::default());
        sessions.open(profile, &Headings::default());

        sessions.clear();

        assert!(sessions.is_empty());
    }

    #[test]
    fn test_save_current_edit() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();
        let doc = sessions.open(profile.clone(), &Headings::default());

        sessions.get_mut(doc).unwrap().set_text(
            "# Name\nStrict reviewer\n\n# Description\nNitpicks\n\n# Instructions\nFlag unwraps\n",
        );
        let saved =
            save_current_edit(&repo, sessions.get(doc).unwrap(), &Headings::default()).unwrap();

        let stored = repo.profile(&profile.id).unwrap().unwrap();
        assert_eq!(stored, saved);
        assert_eq!(stored.name, "Strict reviewer");
        assert_eq!(stored.description(), "Nitpicks");
        assert_eq!(stored.instruction_texts(), vec!["Flag unwraps"]);
        assert_eq!(stored.created_at, profile.created_at);
    }

    #[test]
    fn test_save_current_edit_after_delete() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();
        let doc = sessions.open(profile.clone(), &Headings::default());

        repo.delete_profile(&profile.id).unwrap();
        let err = save_current_edit(&repo, sessions.get(doc).unwrap(), &Headings::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(repo.profiles().unwrap().is_empty());
    }

    #[test]
    fn test_save_current_edit_bad_format() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();
        let doc = sessions.open(profile.clone(), &Headings::default());

        sessions.get_mut(doc).unwrap().set_text("# Name\nOnly a name\n");
        let err = save_current_edit(&repo, sessions.get(doc).unwrap(), &Headings::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(repo.profile(&profile.id).unwrap(), Some(profile));
    }

    #[test]
    fn test_apply_current_edit_does_not_save() {
        let repo = Repository::mock();
        let profile = repo.create_profile("Reviewer", "", vec![]).unwrap();
        let mut sessions = EditSessions::new();
        let doc = sessions.open(profile.clone(), &Headings::default());

        sessions.get_mut(doc).unwrap().set_text(
            "# Name\nReviewer\n# Description\n\n# Instructions\nOne\nTwo\n",
        );
        let draft =
            apply_current_edit(&repo, sessions.get(doc).unwrap(), &Headings::default()).unwrap();

        assert_eq!(draft.name, "Reviewer");
        assert_eq!(
            repo.applied_instructions().unwrap(),
            vec![Instruction::new("One"), Instruction::new("Two")]
        );
        assert!(repo.profile(&profile.id).unwrap().unwrap().instructions.is_empty());
    }
}
