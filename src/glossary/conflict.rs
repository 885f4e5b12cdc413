/*!
 * Conflict classification of a name pair against the global scope.
 *
 * A local name that is a substring of an already globalized name hints at a
 * future ambiguity. The result only drives presentation; nothing is rejected.
 */

use std::fmt;

use super::NamePair;

/// Relationship of a pair to the global scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictState {
    /// No relationship with any global name
    None,
    /// A global name contains both the original and the translated form
    ExactOverlap,
    /// A global name contains the original but not the translated form
    PartialOverlap,
    /// The pair itself is global
    Global,
    /// A curator has reviewed the pair
    ManuallyChecked,
}

impl ConflictState {
    /// Whether the pair still needs a curator's attention.
    pub fn is_unresolved_overlap(self) -> bool {
        matches!(self, Self::ExactOverlap | Self::PartialOverlap)
    }
}

impl fmt::Display for ConflictState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::ExactOverlap => "exact-overlap",
            Self::PartialOverlap => "partial-overlap",
            Self::Global => "global",
            Self::ManuallyChecked => "checked",
        };
        write!(f, "{}", label)
    }
}

/// Classify `pair` against `global_pairs`.
///
/// Order matters: checked beats global, global beats any overlap, and an exact
/// overlap anywhere in the global scope beats a partial one.
pub fn classify(pair: &NamePair, global_pairs: &[NamePair]) -> ConflictState {
    if pair.checked {
        return ConflictState::ManuallyChecked;
    }

    if global_pairs.iter().any(|global| global.original == pair.original) {
        return ConflictState::Global;
    }

    let mut partial = false;
    for global in global_pairs {
        if global.original.contains(&pair.original) {
            if global.translated.contains(&pair.translated) {
                return ConflictState::ExactOverlap;
            }
            partial = true;
        }
    }

    if partial {
        ConflictState::PartialOverlap
    } else {
        ConflictState::None
    }
}
