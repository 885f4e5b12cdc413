/*!
 * End-to-end book page flow
 */

use std::sync::Arc;

use translai::database::MemoryStore;
use translai::page::StaticPage;
use translai::providers::mock::MockProvider;
use translai::{NamePair, PageOutcome};

use crate::common::{controller_with, BOOK_URL, CHAPTER_URL};

fn tag_by_instruction(instruction: &str, input: &str) -> String {
    if instruction.contains("novel title") {
        format!("TITLE({})", input)
    } else {
        format!("SYNOPSIS({})", input)
    }
}

#[tokio::test]
async fn test_book_shouldTranslateTitleAndSynopsisSeparately() {
    let provider = MockProvider::working().with_custom_response(tag_by_instruction);
    let controller = controller_with(provider.clone(), Arc::new(MemoryStore::new()));
    let mut page = StaticPage::book("  剑来 ", "一个少年的故事。");

    let outcome = controller.process_page(BOOK_URL, &mut page).await.unwrap();

    assert!(matches!(outcome, PageOutcome::Book));
    assert_eq!(page.title.as_deref(), Some("TITLE(剑来)"));
    assert_eq!(page.synopsis.as_deref(), Some("SYNOPSIS(一个少年的故事。)"));
    assert_eq!(provider.request_count(), 2);
    assert!(page.body_markup.is_none());
}

#[tokio::test]
async fn test_book_shouldIgnoreLocalNamesOfTheWork() {
    let store = Arc::new(MemoryStore::new());
    let provider = MockProvider::working();
    let controller = controller_with(provider.clone(), store);

    let mut glossary = controller.open_glossary(CHAPTER_URL).await.unwrap();
    glossary
        .add_if_absent(vec![NamePair::new("陈平安", "Chen Ping'an"), NamePair::new("剑", "Sword")])
        .await
        .unwrap();
    glossary.promote("剑").await.unwrap();

    let mut page = StaticPage::book("陈平安的剑", "陈平安");
    controller.translate_book(BOOK_URL, &mut page).await.unwrap();

    let inputs: Vec<String> = provider.calls().into_iter().map(|call| call.input).collect();
    assert!(inputs.contains(&"陈平安的Sword".to_string()));
    assert!(inputs.contains(&"陈平安".to_string()));
}

#[tokio::test]
async fn test_book_withMissingSynopsis_shouldNotCallProvider() {
    let provider = MockProvider::working();
    let controller = controller_with(provider.clone(), Arc::new(MemoryStore::new()));
    let mut page = StaticPage {
        title: Some("剑来".to_string()),
        ..Default::default()
    };

    assert!(controller.translate_book(BOOK_URL, &mut page).await.is_err());
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_book_withSynopsisFailure_shouldLeavePageUntouched() {
    let provider = MockProvider::scripted(vec!["Sword Comes".to_string()]);
    let controller = controller_with(provider.clone(), Arc::new(MemoryStore::new()));
    let mut page = StaticPage::book("剑来", "一个少年的故事。");

    let result = controller.translate_book(BOOK_URL, &mut page).await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 2);
    assert_eq!(page.title.as_deref(), Some("剑来"));
    assert_eq!(page.synopsis.as_deref(), Some("一个少年的故事。"));
}
