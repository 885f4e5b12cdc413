/*!
 * Curation commands driven from rendered chapter markup
 */

use std::sync::Arc;

use translai::database::MemoryStore;
use translai::glossary::{CommandOutcome, CurationCommand, Curator};
use translai::page::{FixedPrompt, FixedSelection, MarkupSelection, MemoryClipboard, StaticPage};
use translai::{ChapterSession, NamePair, Scope};

use crate::common::{chapter_script, controller_with, CHAPTER_URL};

async fn translated_chapter(store: Arc<MemoryStore>) -> (ChapterSession<MemoryStore>, StaticPage) {
    let provider = chapter_script(
        "Zhao saw Li Ming. Li Ming smiled.",
        &[NamePair::new("赵", "Zhao"), NamePair::new("李明", "Li Ming")],
    );
    let controller = controller_with(provider, store);
    let mut page = StaticPage::chapter("赵看见李明。李明笑了。");
    let session = controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap();
    (session, page)
}

/// First annotated span of `markup` whose visible text starts with `visible`
fn span_of(markup: &str, visible: &str) -> String {
    let end = markup.find(&format!(">{}", visible)).unwrap_or(0);
    let start = markup[..end].rfind("<span").unwrap_or(0);
    markup[start..].to_string()
}

#[tokio::test]
async fn test_promote_fromMarkupSelection_shouldTurnSpanGreen() {
    let (mut session, mut page) = translated_chapter(Arc::new(MemoryStore::new())).await;
    let prompt = FixedPrompt::new(None);
    let clipboard = MemoryClipboard::new();
    let curator = Curator::new(&prompt, &clipboard);
    let selection = MarkupSelection::new(span_of(page.body_markup.as_deref().unwrap(), "Zhao"));

    let outcome = session
        .apply_command(CurationCommand::Promote, &selection, &curator, &mut page)
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Updated);
    assert_eq!(session.glossary().scope_of("赵"), Some(Scope::Global));
    let markup = page.body_markup.unwrap();
    assert!(markup.starts_with("<span style=\"background-color: #d4edda;"));
}

#[tokio::test]
async fn test_rename_shouldRewriteEveryOccurrenceAndPersist() {
    let store = Arc::new(MemoryStore::new());
    let (mut session, mut page) = translated_chapter(store.clone()).await;
    let prompt = FixedPrompt::new(Some("Lee Ming"));
    let clipboard = MemoryClipboard::new();
    let curator = Curator::new(&prompt, &clipboard);

    session
        .apply_command(
            CurationCommand::Rename,
            &FixedSelection(Some("李明".to_string())),
            &curator,
            &mut page,
        )
        .await
        .unwrap();

    assert_eq!(session.translated_text(), "Zhao saw Lee Ming. Lee Ming smiled.");
    let markup = page.body_markup.unwrap();
    assert_eq!(markup.matches("data-original=\"李明\">Lee Ming</span>").count(), 2);

    let controller = controller_with(chapter_script("", &[]), store);
    let reloaded = controller.open_glossary(CHAPTER_URL).await.unwrap();
    assert_eq!(reloaded.lookup("李明").unwrap().translated, "Lee Ming");
}

#[tokio::test]
async fn test_markChecked_shouldTurnSpanBlue() {
    let (mut session, mut page) = translated_chapter(Arc::new(MemoryStore::new())).await;
    let prompt = FixedPrompt::new(None);
    let clipboard = MemoryClipboard::new();
    let curator = Curator::new(&prompt, &clipboard);

    session
        .apply_command(
            CurationCommand::MarkChecked,
            &FixedSelection(Some("赵".to_string())),
            &curator,
            &mut page,
        )
        .await
        .unwrap();

    assert!(page.body_markup.unwrap().contains("#afcde9"));
}

#[tokio::test]
async fn test_delete_shouldRemoveAnnotation() {
    let (mut session, mut page) = translated_chapter(Arc::new(MemoryStore::new())).await;
    let prompt = FixedPrompt::new(None);
    let clipboard = MemoryClipboard::new();
    let curator = Curator::new(&prompt, &clipboard);

    session
        .apply_command(
            CurationCommand::Delete,
            &FixedSelection(Some("赵".to_string())),
            &curator,
            &mut page,
        )
        .await
        .unwrap();

    let markup = page.body_markup.unwrap();
    assert!(markup.starts_with("Zhao saw "));
    assert!(session.glossary().lookup("赵").is_none());
}

#[tokio::test]
async fn test_copy_shouldLeavePageUntouched() {
    let (mut session, mut page) = translated_chapter(Arc::new(MemoryStore::new())).await;
    let before = page.body_markup.clone();
    let prompt = FixedPrompt::new(None);
    let clipboard = MemoryClipboard::new();
    let curator = Curator::new(&prompt, &clipboard);

    let outcome = session
        .apply_command(
            CurationCommand::Copy,
            &FixedSelection(Some("李明".to_string())),
            &curator,
            &mut page,
        )
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Copied("李明".to_string()));
    assert_eq!(clipboard.last().as_deref(), Some("李明"));
    assert_eq!(page.body_markup, before);
}

#[tokio::test]
async fn test_commands_withPlainTextSelection_shouldDoNothing() {
    let (mut session, mut page) = translated_chapter(Arc::new(MemoryStore::new())).await;
    let before = page.body_markup.clone();
    let prompt = FixedPrompt::new(Some("x"));
    let clipboard = MemoryClipboard::new();
    let curator = Curator::new(&prompt, &clipboard);
    let selection = MarkupSelection::new(" saw ");

    for command in CurationCommand::ALL {
        let outcome = session
            .apply_command(command, &selection, &curator, &mut page)
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::NoSelection);
    }
    assert_eq!(page.body_markup, before);
    assert_eq!(prompt.times_asked(), 0);
}
