/*!
 * Collaborators around the glossary engine: the page being translated, the
 * user's selection, and the prompts and clipboard used by curation commands.
 *
 * The traits are the seams; the implementations here back the CLI and tests.
 */

use log::info;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Read access to the text regions of a page and write access to replace them.
pub trait PageSource {
    /// Work title, if the page has one
    fn title(&self) -> Option<String>;

    /// Work synopsis, if the page has one
    fn synopsis(&self) -> Option<String>;

    /// Chapter body, if the page has one
    fn body(&self) -> Option<String>;

    /// Replace the title with plain text
    fn set_title(&mut self, text: &str);

    /// Replace the synopsis with plain text
    fn set_synopsis(&mut self, text: &str);

    /// Replace the body with markup
    fn set_body_markup(&mut self, markup: &str);
}

/// Resolves the current selection to the `original` of an annotated name.
pub trait SelectionResolver {
    /// `data-original` value of the first annotated span inside the selection
    fn selected_original(&self) -> Option<String>;
}

/// Free-text input from the user.
pub trait TextPrompt: Send + Sync {
    /// Ask `message`; `None` when the user cancels
    fn ask(&self, message: &str) -> Option<String>;
}

/// Hidden input from the user, used for credentials.
pub trait SecretPrompt: Send + Sync {
    /// Ask `message`; `None` when the user cancels
    fn secret(&self, message: &str) -> Option<String>;
}

/// Destination of copy actions.
pub trait ClipboardSink: Send + Sync {
    /// Place `text` on the clipboard
    fn copy(&self, text: &str);
}

/// Page held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticPage {
    pub title: Option<String>,
    pub synopsis: Option<String>,
    pub body: Option<String>,
    /// Markup written by the last render
    pub body_markup: Option<String>,
}

impl StaticPage {
    /// Metadata page with a title and synopsis
    pub fn book(title: impl Into<String>, synopsis: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            synopsis: Some(synopsis.into()),
            ..Default::default()
        }
    }

    /// Chapter page with a body
    pub fn chapter(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Default::default()
        }
    }
}

impl PageSource for StaticPage {
    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn synopsis(&self) -> Option<String> {
        self.synopsis.clone()
    }

    fn body(&self) -> Option<String> {
        self.body.clone()
    }

    fn set_title(&mut self, text: &str) {
        self.title = Some(text.to_string());
    }

    fn set_synopsis(&mut self, text: &str) {
        self.synopsis = Some(text.to_string());
    }

    fn set_body_markup(&mut self, markup: &str) {
        self.body_markup = Some(markup.to_string());
    }
}

/// Selection already resolved to an original name.
#[derive(Debug, Clone, Default)]
pub struct FixedSelection(pub Option<String>);

impl SelectionResolver for FixedSelection {
    fn selected_original(&self) -> Option<String> {
        self.0.clone()
    }
}

static DATA_ORIGINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<span[^>]*\bdata-original="([^"]*)""#).expect("valid data-original pattern")
});

/// Selection given as the markup fragment it covers.
#[derive(Debug, Clone)]
pub struct MarkupSelection {
    fragment: String,
}

impl MarkupSelection {
    /// Wrap a selected markup fragment
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }
}

impl SelectionResolver for MarkupSelection {
    fn selected_original(&self) -> Option<String> {
        DATA_ORIGINAL
            .captures(&self.fragment)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape_attribute(m.as_str()))
    }
}

fn unescape_attribute(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Prompt reading answers from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn read_answer(message: &str) -> Option<String> {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{}: ", message);
        let _ = stderr.flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl TextPrompt for TerminalPrompt {
    fn ask(&self, message: &str) -> Option<String> {
        Self::read_answer(message)
    }
}

impl SecretPrompt for TerminalPrompt {
    fn secret(&self, message: &str) -> Option<String> {
        Self::read_answer(message)
    }
}

/// Prompt returning a preset answer; counts how often it was asked.
#[derive(Debug, Clone)]
pub struct FixedPrompt {
    answer: Option<String>,
    asked: Arc<AtomicUsize>,
}

impl FixedPrompt {
    /// Prompt answering `answer` every time
    pub fn new(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of questions asked so far
    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Option<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

impl TextPrompt for FixedPrompt {
    fn ask(&self, _message: &str) -> Option<String> {
        self.answer()
    }
}

impl SecretPrompt for FixedPrompt {
    fn secret(&self, _message: &str) -> Option<String> {
        self.answer()
    }
}

/// Clipboard that prints copied text to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutClipboard;

impl ClipboardSink for StdoutClipboard {
    fn copy(&self, text: &str) {
        info!("Copied '{}'", text);
        println!("{}", text);
    }
}

/// Clipboard keeping every copied text in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent copy
    pub fn last(&self) -> Option<String> {
        self.copied.lock().last().cloned()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn copy(&self, text: &str) {
        self.copied.lock().push(text.to_string());
    }
}
