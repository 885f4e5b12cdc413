/*!
 * Work identity derived from a page URL.
 *
 * Book pages look like `/book/<id>.htm`, chapter pages like `/txt/<id>/<chapter>`.
 */

use std::fmt;
use url::Url;

use crate::errors::AppError;

/// Identifier of a work; scopes local glossary entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkId(String);

impl WorkId {
    /// Wrap an already known identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the identifier from a book or chapter URL.
    pub fn from_url(url: &str) -> Result<Self, AppError> {
        let (_, id) = locate(url)?;
        Ok(Self(id))
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of page a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Work metadata page with title and synopsis
    Book,
    /// Chapter page with body text
    Chapter,
}

impl PageKind {
    /// Derive the page kind from a URL.
    pub fn from_url(url: &str) -> Result<Self, AppError> {
        let (kind, _) = locate(url)?;
        Ok(kind)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book => write!(f, "book"),
            Self::Chapter => write!(f, "chapter"),
        }
    }
}

fn locate(raw: &str) -> Result<(PageKind, String), AppError> {
    let url = Url::parse(raw).map_err(|e| AppError::Page(format!("Invalid URL '{}': {}", raw, e)))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    for (index, segment) in segments.iter().enumerate() {
        let kind = match *segment {
            "book" => PageKind::Book,
            "txt" => PageKind::Chapter,
            _ => continue,
        };

        let id = segments
            .get(index + 1)
            .map(|s| s.trim_end_matches(".html").trim_end_matches(".htm"))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Page(format!("No work id in URL '{}'", raw)))?;
        return Ok((kind, id.to_string()));
    }

    Err(AppError::Page(format!(
        "URL '{}' is neither a book nor a chapter page",
        raw
    )))
}
