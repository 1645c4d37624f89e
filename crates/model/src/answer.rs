use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Header line of the reference section appended to a grounded answer.
pub const REFERENCES_HEADER: &str = "# Referências";

/// A source that a grounded answer was derived from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    /// Title of the source page, if the provider reported one.
    pub title: Option<String>,
    /// Address of the source. Never empty.
    pub uri: String,
}

impl Display for Citation {
    /// Renders `[title](uri)`, or the bare `uri` if the title is missing
    /// or empty.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => {
                write!(f, "[{title}]({})", self.uri)
            }
            _ => f.write_str(&self.uri),
        }
    }
}

/// The answer of a search-grounded request together with its sources.
///
/// The `Display` output is the display-ready text: the answer, followed
/// by a markdown reference list when there are citations. Citations keep
/// the order in which the provider returned them and are never
/// deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundedAnswer {
    /// The generated answer text.
    pub answer_text: String,
    /// Sources, in order of appearance.
    pub citations: Vec<Citation>,
}

impl Display for GroundedAnswer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.answer_text)?;
        if self.citations.is_empty() {
            return Ok(());
        }
        write!(f, "\n\n{REFERENCES_HEADER}\n")?;
        for citation in &self.citations {
            writeln!(f, "- {citation}")?;
        }
        Ok(())
    }
}
