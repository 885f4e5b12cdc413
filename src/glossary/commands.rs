/*!
 * Curation commands: human feedback on the glossary.
 *
 * Each command takes the pair resolved from the user's selection, or `None`
 * when nothing annotated was selected, in which case it does nothing.
 */

use log::{debug, info};
use std::fmt;
use std::str::FromStr;

use super::store::GlossaryStore;
use super::substitution::replace_literal;
use super::NamePair;
use crate::database::KeyValueStore;
use crate::errors::StoreError;
use crate::page::{ClipboardSink, TextPrompt};

/// A user-triggered glossary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurationCommand {
    /// Move the pair from the local to the global scope
    Promote,
    /// Replace the translated form, also in the translated body
    Rename,
    /// Mark the pair as reviewed
    MarkChecked,
    /// Put the original form on the clipboard
    Copy,
    /// Remove the pair from its scope
    Delete,
}

impl CurationCommand {
    /// All commands, in menu order
    pub const ALL: [CurationCommand; 5] = [
        Self::Promote,
        Self::Rename,
        Self::MarkChecked,
        Self::Copy,
        Self::Delete,
    ];
}

impl fmt::Display for CurationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Promote => "promote",
            Self::Rename => "rename",
            Self::MarkChecked => "check",
            Self::Copy => "copy",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl FromStr for CurationCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "promote" | "global" => Ok(Self::Promote),
            "rename" | "edit" => Ok(Self::Rename),
            "check" | "checked" => Ok(Self::MarkChecked),
            "copy" => Ok(Self::Copy),
            "delete" | "remove" => Ok(Self::Delete),
            _ => Err(format!("Invalid curation command: {}", s)),
        }
    }
}

/// Result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// No pair was selected
    NoSelection,
    /// A pair was selected but nothing changed
    Unchanged,
    /// The original form was sent to the clipboard
    Copied(String),
    /// The glossary changed and was persisted; the body must be re-rendered
    Updated,
}

impl CommandOutcome {
    /// Whether the annotated body is stale after this outcome
    pub fn needs_render(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// Runs curation commands against a glossary.
pub struct Curator<'a, P: TextPrompt + ?Sized, C: ClipboardSink + ?Sized> {
    prompt: &'a P,
    clipboard: &'a C,
}

impl<'a, P: TextPrompt + ?Sized, C: ClipboardSink + ?Sized> Curator<'a, P, C> {
    /// Create a curator asking `prompt` for rename input and copying to `clipboard`
    pub fn new(prompt: &'a P, clipboard: &'a C) -> Self {
        Self { prompt, clipboard }
    }

    /// Run `command` on `selected`.
    ///
    /// `translated_body` is the plain translated text of the current page; a
    /// rename rewrites every occurrence of the old translated form in it.
    pub async fn execute<S: KeyValueStore>(
        &self,
        command: CurationCommand,
        selected: Option<&NamePair>,
        store: &mut GlossaryStore<S>,
        translated_body: &mut String,
    ) -> Result<CommandOutcome, StoreError> {
        let Some(pair) = selected else {
            debug!("No name selected for {}", command);
            return Ok(CommandOutcome::NoSelection);
        };

        match command {
            CurationCommand::Promote => Ok(changed(store.promote(&pair.original).await?)),
            CurationCommand::Rename => self.rename(pair, store, translated_body).await,
            CurationCommand::MarkChecked => Ok(changed(store.set_checked(&pair.original).await?)),
            CurationCommand::Copy => {
                self.clipboard.copy(&pair.original);
                Ok(CommandOutcome::Copied(pair.original.clone()))
            }
            CurationCommand::Delete => Ok(changed(store.remove(&pair.original).await?)),
        }
    }

    async fn rename<S: KeyValueStore>(
        &self,
        pair: &NamePair,
        store: &mut GlossaryStore<S>,
        translated_body: &mut String,
    ) -> Result<CommandOutcome, StoreError> {
        let new_translated = self
            .prompt
            .ask("Enter new name")
            .map(|answer| answer.trim().to_string())
            .unwrap_or_default();
        if new_translated.is_empty() {
            return Ok(CommandOutcome::Unchanged);
        }

        let old_translated = match store.lookup(&pair.original) {
            Some(current) => current.translated.clone(),
            None => return Ok(CommandOutcome::Unchanged),
        };

        store.set_translated(&pair.original, &new_translated).await?;
        *translated_body = replace_literal(translated_body, &old_translated, &new_translated);
        info!("Renamed '{}' to '{}'", old_translated, new_translated);
        Ok(CommandOutcome::Updated)
    }
}

fn changed(updated: bool) -> CommandOutcome {
    if updated {
        CommandOutcome::Updated
    } else {
        CommandOutcome::Unchanged
    }
}
