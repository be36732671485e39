//! Plain-text representation of a profile for editing.
//!
//! A profile is rendered as a markdown-like document with three headings, in order: name,
//! description and instructions. After the user edits it, the document is parsed back into a
//! [`ProfileDraft`]. Each instruction occupies one line.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    repository::entities::{Instruction, Profile},
};

const HEADING_MARKER: char = '#';

pub const MISSING_HEADINGS: &str =
    "The edited content is not formatted correctly. Do not remove headings.";
pub const NAME_REQUIRED: &str = "Profile name is required.";

/// The labels of the three section headings. They can be localized through the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub name: String,
    pub description: String,
    pub instructions: String,
}

impl Default for Headings {
    fn default() -> Self {
        Self {
            name: "Name".into(),
            description: "Description".into(),
            instructions: "Instructions".into(),
        }
    }
}

/// The editable fields of a profile as parsed from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub description: String,
    pub instructions: Vec<Instruction>,
}

impl ProfileDraft {
    /// Replace the editable fields of `profile` wholesale.
    pub fn apply_to(self, profile: &mut Profile) {
        profile.name = self.name;
        profile.description = Some(self.description);
        profile.instructions = self.instructions;
    }
}

struct Section<'a> {
    label: &'a str,
    lines: Vec<&'a str>,
}

impl Section<'_> {
    fn body(&self) -> String {
        self.lines.join("\n")
    }
}

impl Headings {
    /// Render `profile` as an editable document.
    pub fn serialize(&self, profile: &Profile) -> String {
        let instructions = profile
            .instructions
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{HEADING_MARKER} {}\n{}\n\n{HEADING_MARKER} {}\n{}\n\n{HEADING_MARKER} {}\n{}\n",
            self.name,
            profile.name,
            self.description,
            profile.description(),
            self.instructions,
            instructions,
        )
    }

    /// Parse an edited document back into its fields.
    ///
    /// Fails with [`Error::Format`] if any heading is missing or the name is blank.
    pub fn parse(&self, text: &str) -> Result<ProfileDraft> {
        let sections = split_sections(text);
        let find = |label: &str| sections.iter().find(|s| s.label == label.trim());

        let (Some(name), Some(description), Some(instructions)) = (
            find(&self.name),
            find(&self.description),
            find(&self.instructions),
        ) else {
            return Err(Error::format(MISSING_HEADINGS));
        };

        let name = name.body().trim().to_string();
        if name.is_empty() {
            return Err(Error::format(NAME_REQUIRED));
        }

        let instructions = instructions
            .lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(Instruction::new)
            .collect();

        Ok(ProfileDraft {
            name,
            description: description.body().trim().to_string(),
            instructions,
        })
    }
}

/// The label of `line` if it is a heading line: the marker followed by whitespace.
fn heading_label(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(HEADING_MARKER)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

/// Split `text` into heading-delimited sections. Anything before the first heading is dropped.
fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for line in text.lines() {
        if let Some(label) = heading_label(line) {
            sections.push(Section {
                label,
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line);
        }
    }

    sections
}

/// Render `profile` using the default headings.
pub fn serialize(profile: &Profile) -> String {
    Headings::default().serialize(profile)
}

/// Parse a document using the default headings.
pub fn parse(text: &str) -> Result<ProfileDraft> {
    Headings::default().parse(text)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;

    fn profile(name: &str, description: Option<&str>, instructions: &[&str]) -> Profile {
        let mut profile = Profile::new(
            name,
            "",
            instructions.iter().map(|t| Instruction::new(*t)).collect(),
        );
        profile.description = description.map(str::to_string);
        profile
    }

    #[test]
    fn test_serialize_layout() {
        let p = profile("Reviewer", Some("Checks code"), &["Be terse", "Cite lines"]);

        assert_eq!(
            serialize(&p),
            "# Name\nReviewer\n\n# Description\nChecks code\n\n# Instructions\nBe terse\nCite lines\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            profile("Reviewer", Some("Checks code"), &["Be terse", "Cite lines"]),
            profile("Empty", None, &[]),
            profile("One", Some(""), &["Only this"]),
        ];

        for p in cases {
            let draft = parse(&serialize(&p)).unwrap();
            assert_eq!(draft.name, p.name);
            assert_eq!(draft.description, p.description());
            assert_eq!(
                draft.instructions.iter().map(|i| i.text.as_str()).collect::<Vec<_>>(),
                p.instruction_texts()
            );
        }
    }

    #[test]
    fn test_round_trip_localized_headings() {
        let headings = Headings {
            name: "Nom".into(),
            description: "Description".into(),
            instructions: "Consignes".into(),
        };
        let p = profile("Relecteur", Some("Relit"), &["Sois bref"]);

        let draft = headings.parse(&headings.serialize(&p)).unwrap();

        assert_eq!(draft.name, "Relecteur");
        assert_eq!(draft.instructions, vec![Instruction::new("Sois bref")]);
    }

    #[test]
    fn test_parse_missing_instructions_heading() {
        let err = parse("# Name\nReviewer\n\n# Description\nChecks code\n").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.user_message(), MISSING_HEADINGS);
    }

    #[test]
    fn test_parse_blank_name() {
        let err = parse("# Name\n   \n# Description\n\n# Instructions\nx\n").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.user_message(), NAME_REQUIRED);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let text = "# Name\n  Reviewer  \n# Description\n  multi\n  line  \n# Instructions\n\n  first  \n\n\n\t\nsecond\n";

        let draft = parse(text).unwrap();

        assert_eq!(draft.name, "Reviewer");
        assert_eq!(draft.description, "multi\n  line");
        assert_eq!(
            draft.instructions,
            vec![Instruction::new("first"), Instruction::new("second")]
        );
    }

    #[test]
    fn test_parse_heading_order_does_not_matter() {
        let text = "# Instructions\na\n# Description\nd\n# Name\nn\n";

        let draft = parse(text).unwrap();

        assert_eq!(draft.name, "n");
        assert_eq!(draft.description, "d");
        assert_eq!(draft.instructions, vec![Instruction::new("a")]);
    }

    #[test]
    fn test_parse_matches_whole_heading_labels() {
        // "Names" is not the "Name" heading, and "#Name" lacks the separating whitespace
        let text = "# Names\nwrong\n#Name\nalso wrong\n# Description\n\n# Instructions\n";

        assert_eq!(parse(text).unwrap_err().user_message(), MISSING_HEADINGS);
    }

    #[test]
    fn test_parse_ignores_preamble() {
        let draft = parse("stray\n# Name\nA\n# Description\n\n# Instructions\nx\n").unwrap();

        assert_eq!(draft.name, "A");
        assert_eq!(draft.description, "");
        assert_eq!(draft.instructions, vec![Instruction::new("x")]);
    }

    #[test]
    fn test_parse_first_duplicate_heading_wins() {
        let text = "# Name\nfirst\n# Description\n\n# Name\nsecond\n# Instructions\nx\n";

        assert_eq!(parse(text).unwrap().name, "first");
    }

    #[test]
    fn test_parse_heading_line_ends_instructions() {
        // A marker followed by whitespace always opens a new section, so the rest is dropped.
        // Without the whitespace it is an ordinary instruction.
        let text = "# Name\nA\n# Description\n\n# Instructions\n#tag\n# not a heading?\nkeep\n";

        assert_eq!(parse(text).unwrap().instructions, vec![Instruction::new("#tag")]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let text = "# Name\r\nReviewer\r\n\r\n# Description\r\n\r\n# Instructions\r\na\r\nb\r\n";

        let draft = parse(text).unwrap();

        assert_eq!(draft.name, "Reviewer");
        assert_eq!(
            draft.instructions,
            vec![Instruction::new("a"), Instruction::new("b")]
        );
    }

    #[test]
    fn test_apply_to_replaces_fields() {
        let mut p = profile("Old", None, &["old"]);
        let id = p.id.clone();

        parse("# Name\nNew\n# Description\nDesc\n# Instructions\nnew\n")
            .unwrap()
            .apply_to(&mut p);

        assert_eq!(p.id, id);
        assert_eq!(p.name, "New");
        assert_eq!(p.description.as_deref(), Some("Desc"));
        assert_eq!(p.instruction_texts(), vec!["new"]);
    }
}
