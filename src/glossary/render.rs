/*!
 * Conflict-colored annotation of translated text.
 *
 * Rendering always starts from the plain translated text, so running it again
 * with the same input produces the same markup and annotations never nest.
 */

use super::conflict::{classify, ConflictState};
use super::NamePair;

/// Glyph appended to names in an unresolved overlap state
pub const OVERLAP_MARKER: char = '*';

/// Background colors used for annotated names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Red,
    Green,
    Blue,
    Orange,
}

impl Highlight {
    /// Color for a conflict state.
    pub fn for_state(state: ConflictState) -> Self {
        match state {
            ConflictState::None => Self::Red,
            ConflictState::ExactOverlap | ConflictState::Global => Self::Green,
            ConflictState::PartialOverlap => Self::Orange,
            ConflictState::ManuallyChecked => Self::Blue,
        }
    }

    /// CSS hex value
    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#f8d7da",
            Self::Green => "#d4edda",
            Self::Blue => "#afcde9",
            Self::Orange => "#ffe5b4",
        }
    }
}

/// Piece of the translated text after name matching.
#[derive(Debug)]
enum Segment<'a> {
    Plain(String),
    Name(&'a NamePair),
}

/// Annotates translated text with the names of a glossary.
pub struct Renderer<'a> {
    global_pairs: &'a [NamePair],
}

impl<'a> Renderer<'a> {
    /// Create a renderer classifying names against `global_pairs`
    pub fn new(global_pairs: &'a [NamePair]) -> Self {
        Self { global_pairs }
    }

    /// Produce markup for `text` with every occurrence of each pair's `translated` form annotated.
    ///
    /// Pairs are matched longest `translated` first; text already claimed by an
    /// annotation is never matched again.
    pub fn render(&self, text: &str, pairs: &[NamePair]) -> String {
        let mut ordered: Vec<&NamePair> = pairs
            .iter()
            .filter(|pair| !pair.translated.is_empty())
            .collect();
        ordered.sort_by(|a, b| b.translated.chars().count().cmp(&a.translated.chars().count()));

        let mut segments = vec![Segment::Plain(text.to_string())];
        for pair in ordered {
            segments = split_segments(segments, pair);
        }

        let mut markup = String::with_capacity(text.len() * 2);
        for segment in &segments {
            match segment {
                Segment::Plain(plain) => markup.push_str(&escape_markup(plain)),
                Segment::Name(pair) => self.push_span(&mut markup, pair),
            }
        }
        markup
    }

    fn push_span(&self, markup: &mut String, pair: &NamePair) {
        let state = classify(pair, self.global_pairs);
        markup.push_str(&format!(
            "<span style=\"background-color: {}; user-select: all;\" data-original=\"{}\">",
            Highlight::for_state(state).hex(),
            escape_markup(&pair.original)
        ));
        markup.push_str(&escape_markup(&pair.translated));
        if state.is_unresolved_overlap() {
            markup.push(OVERLAP_MARKER);
        }
        markup.push_str("</span>");
    }
}

fn split_segments<'a>(segments: Vec<Segment<'a>>, pair: &'a NamePair) -> Vec<Segment<'a>> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Plain(plain) if plain.contains(pair.translated.as_str()) => {
                let mut pieces = plain.split(pair.translated.as_str()).peekable();
                while let Some(piece) = pieces.next() {
                    if !piece.is_empty() {
                        result.push(Segment::Plain(piece.to_string()));
                    }
                    if pieces.peek().is_some() {
                        result.push(Segment::Name(pair));
                    }
                }
            }
            other => result.push(other),
        }
    }
    result
}

/// Escape text for inclusion in markup; newlines become `<br>`.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("<br>"),
            _ => escaped.push(c),
        }
    }
    escaped
}
