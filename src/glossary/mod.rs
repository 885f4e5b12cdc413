/*!
 * Name glossary and substitution engine.
 *
 * The glossary maps source-language proper nouns to their translated forms.
 * It is split into several submodules:
 *
 * - `store`: the two scoped collections (work-local and global) and their persistence
 * - `conflict`: classification of a pair against the global scope
 * - `substitution`: longest-match-first literal replacement before translation
 * - `extraction`: discovery of new pairs from an original/translated text pair
 * - `render`: conflict-colored annotation of translated text
 * - `commands`: curation commands driven by a user selection
 */

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod commands;
pub mod conflict;
pub mod extraction;
pub mod render;
pub mod store;
pub mod substitution;

// Re-export main types for easier usage
pub use self::commands::{CommandOutcome, CurationCommand, Curator};
pub use self::conflict::{classify, ConflictState};
pub use self::extraction::{parse_extracted_names, ExtractionOutcome, NameExtractor};
pub use self::render::{escape_markup, Renderer};
pub use self::store::GlossaryStore;
pub use self::substitution::{replace_literal, substitute};

/// A source-language name and its translated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePair {
    /// Name as it appears in the source text
    pub original: String,

    /// Name as it should appear in the translated text
    pub translated: String,

    /// Set by a curator once the translation has been reviewed
    #[serde(default)]
    pub checked: bool,
}

impl NamePair {
    /// Create an unchecked pair
    pub fn new(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
            checked: false,
        }
    }

    /// Whether both sides are non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.original.trim().is_empty() && !self.translated.trim().is_empty()
    }
}

impl fmt::Display for NamePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.original, self.translated)
    }
}

/// Which collection a pair lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Pairs discovered for one work
    Local,
    /// Pairs promoted to apply across all works
    Global,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Global => write!(f, "global"),
        }
    }
}
