//! Core domain entities for directive.
//!
//! A [`Profile`] is a named bundle of [`Instruction`]s that can be applied as a unit to the
//! assistant's code-generation configuration.

mod profile;
mod profile_id;

pub use profile::{Instruction, Profile};
pub use profile_id::ProfileId;
