/*!
 * Tests for the glossary engine through its public API
 */

use translai::database::MemoryStore;
use translai::glossary::{
    classify, parse_extracted_names, substitute, ConflictState, GlossaryStore, NamePair, Renderer,
};
use translai::WorkId;

#[test]
fn test_substitute_withNestedNames_shouldReplaceLongestFirst() {
    let pairs = vec![NamePair::new("明", "Ming"), NamePair::new("李明", "Li Ming")];

    assert_eq!(substitute("李明来了", &pairs), "Li Ming来了");
    assert_eq!(substitute("明天李明来了", &pairs), "Ming天Li Ming来了");
}

#[test]
fn test_substitute_withMetacharacters_shouldMatchLiterally() {
    let pairs = vec![NamePair::new("a.b*", "X")];

    assert_eq!(substitute("a.b* aab", &pairs), "X aab");
}

#[test]
fn test_substitute_shouldReapplyShorterNamesToEarlierOutput() {
    // "王小明" becomes "Wang 王" first; the shorter "王" then still matches
    let pairs = vec![NamePair::new("王小明", "Wang 王"), NamePair::new("王", "Wang")];

    assert_eq!(substitute("王小明", &pairs), "Wang Wang");
}

#[test]
fn test_render_calledTwice_shouldBeByteIdentical() {
    let globals = vec![NamePair::new("王小明", "Wang Xiaoming")];
    let pairs = vec![
        NamePair::new("王", "Wang"),
        NamePair::new("王小明", "Wang Xiaoming"),
    ];
    let renderer = Renderer::new(&globals);
    let text = "Wang Xiaoming met Wang.\nThey left.";

    let first = renderer.render(text, &pairs);
    let second = renderer.render(text, &pairs);

    assert_eq!(first, second);
    assert_eq!(first.matches("<span").count(), 2);
    assert!(first.contains("<br>"));
}

#[test]
fn test_render_withNestedTranslation_shouldAnnotateLongestOnly() {
    let pairs = vec![
        NamePair::new("王", "Wang"),
        NamePair::new("王小明", "Wang Xiaoming"),
    ];

    let markup = Renderer::new(&[]).render("Wang Xiaoming", &pairs);

    assert_eq!(markup.matches("<span").count(), 1);
    assert!(markup.contains("data-original=\"王小明\""));
}

#[test]
fn test_classify_withSuperstringGlobal_shouldSplitExactAndPartial() {
    let pair = NamePair::new("王", "Wang");
    let globals = vec![NamePair::new("王小明", "Wang Xiaoming")];

    // "Wang Xiaoming" contains "Wang", so the translated side also overlaps
    assert_eq!(classify(&pair, &globals), ConflictState::ExactOverlap);

    let globals = vec![NamePair::new("王小明", "Xiaoming")];
    assert_eq!(classify(&pair, &globals), ConflictState::PartialOverlap);
}

#[test]
fn test_classify_withSamePairGlobal_shouldReportGlobal() {
    let pair = NamePair::new("王", "Wang");

    assert_eq!(classify(&pair, &[pair.clone()]), ConflictState::Global);
}

#[test]
fn test_parseExtractedNames_withProse_shouldFail() {
    let err = parse_extracted_names("Sure! Here are the names: none").unwrap_err();
    assert!(err.is_parse_error());
}

#[tokio::test]
async fn test_glossaryStore_promote_shouldLeaveExactlyOnePair() {
    let mut store = GlossaryStore::load(MemoryStore::new(), WorkId::new("58127"))
        .await
        .unwrap();
    store.add_if_absent(vec![NamePair::new("赵", "Zhao")]).await.unwrap();

    store.promote("赵").await.unwrap();

    let matches = store
        .effective_pairs()
        .into_iter()
        .filter(|pair| pair.original == "赵")
        .count();
    assert_eq!(matches, 1);
    assert!(store.local_pairs().is_empty());
    assert_eq!(store.global_pairs().len(), 1);
}

#[tokio::test]
async fn test_glossaryStore_addIfAbsent_manyCalls_shouldStayUnique() {
    let mut store = GlossaryStore::load(MemoryStore::new(), WorkId::new("58127"))
        .await
        .unwrap();
    let batch = vec![NamePair::new("李明", "Li Ming"), NamePair::new("王", "Wang")];

    for _ in 0..3 {
        store.add_if_absent(batch.clone()).await.unwrap();
    }
    store.promote("王").await.unwrap();
    store.add_if_absent(batch).await.unwrap();

    assert_eq!(store.effective_pairs().len(), 2);
}

#[test]
fn test_glossaryStore_addIfAbsent_afterPromote_shouldKeepGlobalPair() {
    let backend = MemoryStore::new();
    let work = WorkId::new("58127");

    let store = tokio_test::block_on(async {
        let mut store = GlossaryStore::load(backend.clone(), work.clone()).await.unwrap();
        store
            .add_if_absent(vec![NamePair::new("赵", "Zhao(global)")])
            .await
            .unwrap();
        store.promote("赵").await.unwrap();
        store
            .add_if_absent(vec![NamePair::new("赵", "Zhao(local)")])
            .await
            .unwrap();
        GlossaryStore::load(backend, work).await.unwrap()
    });

    // The second add is skipped because lookup already finds the global pair
    assert_eq!(store.lookup("赵").unwrap().translated, "Zhao(global)");
    assert!(store.local_pairs().is_empty());
}
