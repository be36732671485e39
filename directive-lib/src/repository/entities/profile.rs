use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::entities::ProfileId;

/// A single free-text directive consumed by the assistant's code-generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub text: String,
}

impl Instruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for Instruction {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Represents a profile in the directive system.
///
/// A profile is a snapshot of what was read from the store. Mutating it has no effect until it
/// is handed back to [`Repository::update_profile`](crate::Repository::update_profile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    /// A human friendly display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Applied in order
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Build a brand new profile with a fresh id, stamped with the current time.
    pub(crate) fn new(name: &str, description: &str, instructions: Vec<Instruction>) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::generate(),
            name: name.to_string(),
            description: Some(description.to_string()),
            instructions,
            created_at: now,
            updated_at: now,
        }
    }

    /// The description, or an empty string when none was given.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// The text of every instruction, in order.
    pub fn instruction_texts(&self) -> Vec<&str> {
        self.instructions.iter().map(|i| i.text.as_str()).collect()
    }
}
