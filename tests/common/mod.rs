/*!
 * Common test utilities for the translai test suite
 */

use std::sync::Arc;

use translai::database::MemoryStore;
use translai::page::FixedPrompt;
use translai::providers::mock::MockProvider;
use translai::{Config, Controller, NamePair};

pub const BOOK_URL: &str = "https://www.69shuba.com/book/58127.htm";
pub const CHAPTER_URL: &str = "https://www.69shuba.com/txt/58127/37485713";

/// Route library logs to the test output; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Controller over an in-memory store with a stored API key prompt answer
pub fn controller_with(
    provider: MockProvider,
    store: Arc<MemoryStore>,
) -> Controller<MemoryStore, FixedPrompt> {
    init_logging();
    Controller::new(
        Config::default(),
        Box::new(provider),
        store,
        FixedPrompt::new(Some("test-key")),
    )
}

/// Extractor answer listing `pairs`
pub fn extraction_json(pairs: &[NamePair]) -> String {
    serde_json::to_string(pairs).unwrap_or_default()
}

/// Scripted provider answering a chapter translation then an extraction
pub fn chapter_script(translation: &str, names: &[NamePair]) -> MockProvider {
    MockProvider::scripted(vec![translation.to_string(), extraction_json(names)])
}
