use log::{debug, error, info, warn};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::KeyValueStore;
use crate::errors::AppError;
use crate::glossary::extraction::ExtractionOutcome;
use crate::glossary::{
    substitute, CommandOutcome, CurationCommand, Curator, GlossaryStore, NameExtractor, Renderer,
};
use crate::page::{ClipboardSink, PageSource, SecretPrompt, SelectionResolver, TextPrompt};
use crate::providers::{CredentialedTranslator, Credentials, Provider, Translator};
use crate::work::{PageKind, WorkId};

// @module: Application controller for page translation sessions

/// Main application controller: one page load at a time
pub struct Controller<S: KeyValueStore, P: SecretPrompt> {
    // @field: App configuration
    config: Config,
    // @field: LLM client
    provider: Box<dyn Provider>,
    // @field: Shared key-value store
    store: Arc<S>,
    // @field: API key cache
    credentials: Credentials<Arc<S>, P>,
}

/// A translated chapter and the glossary it was rendered with.
///
/// The plain translated text is kept so curation commands can re-render
/// from it instead of from previous markup.
pub struct ChapterSession<S: KeyValueStore> {
    glossary: GlossaryStore<Arc<S>>,
    translated: String,
    extraction: Option<ExtractionOutcome>,
}

impl<S: KeyValueStore> fmt::Debug for ChapterSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChapterSession")
            .field("work_id", self.glossary.work_id())
            .field("translated_len", &self.translated.len())
            .field("extraction", &self.extraction)
            .finish()
    }
}

/// What a page load produced.
pub enum PageOutcome<S: KeyValueStore> {
    /// Title and synopsis were translated in place
    Book,
    /// The chapter body was translated and annotated
    Chapter(ChapterSession<S>),
}

impl<S: KeyValueStore> fmt::Debug for PageOutcome<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book => f.write_str("Book"),
            Self::Chapter(session) => f.debug_tuple("Chapter").field(session).finish(),
        }
    }
}

impl<S: KeyValueStore, P: SecretPrompt> Controller<S, P> {
    // @method: Create a controller with the given configuration and collaborators
    pub fn new(config: Config, provider: Box<dyn Provider>, store: Arc<S>, prompt: P) -> Self {
        let credentials = Credentials::new(store.clone(), prompt);
        Self {
            config,
            provider,
            store,
            credentials,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the glossary scoped to the work behind `url`
    pub async fn open_glossary(&self, url: &str) -> Result<GlossaryStore<Arc<S>>, AppError> {
        let work_id = WorkId::from_url(url)?;
        Ok(GlossaryStore::load(self.store.clone(), work_id).await?)
    }

    /// Translate the page behind `url`, dispatching on its kind
    pub async fn process_page<G: PageSource + ?Sized>(
        &self,
        url: &str,
        page: &mut G,
    ) -> Result<PageOutcome<S>, AppError> {
        match PageKind::from_url(url)? {
            PageKind::Book => {
                self.translate_book(url, page).await?;
                Ok(PageOutcome::Book)
            }
            PageKind::Chapter => Ok(PageOutcome::Chapter(self.translate_chapter(url, page).await?)),
        }
    }

    /// Translate a book page's title and synopsis using global names only
    pub async fn translate_book<G: PageSource + ?Sized>(
        &self,
        url: &str,
        page: &mut G,
    ) -> Result<(), AppError> {
        let glossary = self.open_glossary(url).await?;
        let title = required(page.title(), "title")?;
        let synopsis = required(page.synopsis(), "synopsis")?;

        let globals = glossary.global_pairs();
        let title = substitute(&title, globals);
        let synopsis = substitute(&synopsis, globals);

        self.ensure_credential().await?;
        let translator = CredentialedTranslator::new(self.provider.as_ref(), &self.credentials);
        let prompts = &self.config.translation.prompts;
        let title_instruction = self.config.instruction(&prompts.title);
        let synopsis_instruction = self.config.instruction(&prompts.synopsis);

        info!("Translating book {} with {}", glossary.work_id(), self.provider.name());
        let (title, synopsis) = futures::join!(
            translator.ask(&title_instruction, &title),
            translator.ask(&synopsis_instruction, &synopsis)
        );

        // Both translations must succeed before the page is touched
        let (title, synopsis) = (title?, synopsis?);
        page.set_title(title.trim());
        page.set_synopsis(synopsis.trim());
        Ok(())
    }

    /// Translate a chapter body, learn its names and annotate it
    pub async fn translate_chapter<G: PageSource + ?Sized>(
        &self,
        url: &str,
        page: &mut G,
    ) -> Result<ChapterSession<S>, AppError> {
        let mut glossary = self.open_glossary(url).await?;
        let original = required(page.body(), "chapter body")?;

        let substituted = substitute(&original, &glossary.effective_pairs());
        debug!(
            "Substituting with {} known names",
            glossary.local_pairs().len() + glossary.global_pairs().len()
        );

        let translator = CredentialedTranslator::new(self.provider.as_ref(), &self.credentials);
        let prompts = &self.config.translation.prompts;

        info!("Translating chapter of work {} with {}", glossary.work_id(), self.provider.name());
        let translated = translator
            .ask(&self.config.instruction(&prompts.chapter), &substituted)
            .await?;

        let extractor = NameExtractor::new(&translator, self.config.instruction(&prompts.extraction));
        let extraction = extractor
            .extract_into(&mut glossary, &original, &translated)
            .await?;
        if let ExtractionOutcome::Discarded(e) = &extraction {
            warn!("Rendering with the previous glossary: {}", e);
        }

        let session = ChapterSession {
            glossary,
            translated,
            extraction: Some(extraction),
        };
        page.set_body_markup(&session.render());
        Ok(session)
    }

    /// Reopen a chapter whose plain translation is already known
    pub async fn resume_chapter(
        &self,
        url: &str,
        translated: String,
    ) -> Result<ChapterSession<S>, AppError> {
        Ok(ChapterSession {
            glossary: self.open_glossary(url).await?,
            translated,
            extraction: None,
        })
    }

    async fn ensure_credential(&self) -> Result<(), AppError> {
        if self.provider.requires_api_key() {
            self.credentials.api_key().await?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore> ChapterSession<S> {
    /// Glossary of the chapter's work
    pub fn glossary(&self) -> &GlossaryStore<Arc<S>> {
        &self.glossary
    }

    /// Plain translated body
    pub fn translated_text(&self) -> &str {
        &self.translated
    }

    /// What happened to the name extraction, if this session ran one
    pub fn extraction(&self) -> Option<&ExtractionOutcome> {
        self.extraction.as_ref()
    }

    /// Annotated markup of the current translation
    pub fn render(&self) -> String {
        Renderer::new(self.glossary.global_pairs())
            .render(&self.translated, &self.glossary.effective_pairs())
    }

    /// Run a curation command on the selected name and re-render the page when needed
    pub async fn apply_command<R, T, C, G>(
        &mut self,
        command: CurationCommand,
        selection: &R,
        curator: &Curator<'_, T, C>,
        page: &mut G,
    ) -> Result<CommandOutcome, AppError>
    where
        R: SelectionResolver + ?Sized,
        T: TextPrompt + ?Sized,
        C: ClipboardSink + ?Sized,
        G: PageSource + ?Sized,
    {
        let selected = selection
            .selected_original()
            .and_then(|original| self.glossary.lookup(&original).cloned());

        let outcome = curator
            .execute(command, selected.as_ref(), &mut self.glossary, &mut self.translated)
            .await?;
        if outcome.needs_render() {
            page.set_body_markup(&self.render());
        }
        Ok(outcome)
    }
}

#[derive(Serialize)]
struct Diagnostic<'a> {
    name: &'a str,
    message: String,
    causes: Vec<String>,
}

/// Diagnostic block shown in place of the page output when a load fails
pub fn diagnostic_markup(err: &AppError) -> String {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }

    let diagnostic = Diagnostic {
        name: err.kind(),
        message: err.to_string(),
        causes,
    };

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    let json = match diagnostic.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(e) => {
            error!("Failed to serialize diagnostic: {}", e);
            err.to_string()
        }
    };

    let escaped = json
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<pre>{}</pre>", escaped)
}

fn required(region: Option<String>, name: &str) -> Result<String, AppError> {
    region
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AppError::Page(format!("The page has no {}", name)))
}
