/*!
 * End-to-end chapter page flow with mock providers
 */

use std::sync::Arc;

use translai::database::{KeyValueStore, MemoryStore};
use translai::glossary::ExtractionOutcome;
use translai::page::StaticPage;
use translai::providers::mock::MockProvider;
use translai::providers::API_KEY_STORE_KEY;
use translai::{AppError, NamePair, PageOutcome};

use crate::common::{chapter_script, controller_with, CHAPTER_URL};

#[tokio::test]
async fn test_chapter_secondLoad_shouldSubstituteLearnedNames() {
    let store = Arc::new(MemoryStore::new());

    let first = chapter_script("Li Ming came.", &[NamePair::new("李明", "Li Ming")]);
    let controller = controller_with(first, store.clone());
    let mut page = StaticPage::chapter("李明来了。");
    controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap();

    let second = chapter_script("Li Ming left.", &[]);
    let controller = controller_with(second.clone(), store);
    let mut page = StaticPage::chapter("  李明走了。\n");
    controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap();

    let calls = second.calls();
    assert_eq!(calls[0].input, "Li Ming走了。");
    assert!(calls[0].instruction.contains("novel chapter"));
    assert_eq!(
        calls[1].input,
        "Original chapter:\n李明走了。\n\nTranslated chapter:\nLi Ming left."
    );
}

#[tokio::test]
async fn test_chapter_withFencedExtraction_shouldAnnotateNewNames() {
    let provider = MockProvider::scripted(vec![
        "Wang met Li Ming.\nThe end.".to_string(),
        "```json\n[{\"original\":\"王\",\"translated\":\"Wang\"},{\"original\":\"李明\",\"translated\":\"Li Ming\"}]\n```".to_string(),
    ]);
    let controller = controller_with(provider, Arc::new(MemoryStore::new()));
    let mut page = StaticPage::chapter("王见了李明。\n完。");

    let session = controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap();

    assert!(matches!(session.extraction(), Some(ExtractionOutcome::Merged(2))));
    let markup = page.body_markup.unwrap();
    assert_eq!(markup.matches("#f8d7da").count(), 2);
    assert!(markup.ends_with("</span>.<br>The end."));
}

#[tokio::test]
async fn test_chapter_withMalformedExtraction_shouldLeaveGlossaryUnchanged() {
    let store = Arc::new(MemoryStore::new());
    let provider = MockProvider::scripted(vec![
        "Li Ming came.".to_string(),
        r#"[{"original":"李明"}]"#.to_string(),
    ]);
    let controller = controller_with(provider, store.clone());
    let mut page = StaticPage::chapter("李明来了。");

    let session = controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap();

    assert!(matches!(session.extraction(), Some(ExtractionOutcome::Discarded(_))));
    assert!(session.glossary().effective_pairs().is_empty());
    assert_eq!(page.body_markup.as_deref(), Some("Li Ming came."));
    let reloaded = controller.open_glossary(CHAPTER_URL).await.unwrap();
    assert!(reloaded.local_pairs().is_empty());
}

#[tokio::test]
async fn test_chapter_withExtractionTransportFailure_shouldAbortLoad() {
    // One scripted answer: the extraction call finds the script exhausted
    let provider = MockProvider::scripted(vec!["Li Ming came.".to_string()]);
    let controller = controller_with(provider, Arc::new(MemoryStore::new()));
    let mut page = StaticPage::chapter("李明来了。");

    let err = controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap_err();

    assert_eq!(err.kind(), "TransportError");
    assert!(page.body_markup.is_none());
}

#[tokio::test]
async fn test_chapter_withRejectedKey_shouldInvalidateStoredKey() {
    let store = Arc::new(MemoryStore::new());
    store.set(API_KEY_STORE_KEY, "expired").await.unwrap();
    let controller = controller_with(MockProvider::rejecting_key(), store.clone());
    let mut page = StaticPage::chapter("李明来了。");

    let err = controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap_err();

    assert_eq!(err.kind(), "AuthError");
    assert!(store.get(API_KEY_STORE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_chapter_withoutStoredKey_shouldPromptOnceAndReuse() {
    let store = Arc::new(MemoryStore::new());
    let provider = chapter_script("Hello.", &[]);
    let controller = controller_with(provider.clone(), store.clone());
    let mut page = StaticPage::chapter("你好。");

    controller.translate_chapter(CHAPTER_URL, &mut page).await.unwrap();

    assert!(provider.calls().iter().all(|call| call.api_key == "test-key"));
    assert_eq!(store.get(API_KEY_STORE_KEY).await.unwrap().as_deref(), Some("test-key"));
}

#[tokio::test]
async fn test_processPage_withChapterUrl_shouldReturnSession() {
    let controller = controller_with(chapter_script("Hello.", &[]), Arc::new(MemoryStore::new()));
    let mut page = StaticPage::chapter("你好。");

    match controller.process_page(CHAPTER_URL, &mut page).await {
        Ok(PageOutcome::Chapter(session)) => assert_eq!(session.translated_text(), "Hello."),
        Ok(PageOutcome::Book) => panic!("chapter URL handled as a book page"),
        Err(e) => panic!("unexpected error: {}", e),
    }
}

#[tokio::test]
async fn test_chapter_withEmptyBody_shouldFailAsPageError() {
    let provider = MockProvider::working();
    let controller = controller_with(provider.clone(), Arc::new(MemoryStore::new()));
    let mut page = StaticPage::chapter("   ");

    let result = controller.translate_chapter(CHAPTER_URL, &mut page).await;

    assert!(matches!(result, Err(AppError::Page(_))));
    assert_eq!(provider.request_count(), 0);
}
