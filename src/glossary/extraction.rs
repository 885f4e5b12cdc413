/*!
 * Discovery of new name pairs from an original/translated text pair.
 *
 * The extractor is the same instruction-following model used for translation,
 * asked to return a JSON array of `{original, translated}` objects. A malformed
 * answer discards the extraction only; the translation it came from is kept.
 */

use log::{debug, info, warn};
use serde_json::Value;

use super::store::GlossaryStore;
use super::NamePair;
use crate::database::KeyValueStore;
use crate::errors::{AppError, ExtractionError};
use crate::providers::Translator;

/// What happened to an extraction result.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// The response was valid; this many new pairs were added to the local scope
    Merged(usize),
    /// The response was malformed and nothing was merged
    Discarded(ExtractionError),
}

/// Asks a translator for the proper nouns of a text pair.
pub struct NameExtractor<'a, T: Translator + ?Sized> {
    translator: &'a T,
    instruction: String,
}

impl<'a, T: Translator + ?Sized> NameExtractor<'a, T> {
    /// Create an extractor sending `instruction` with every request
    pub fn new(translator: &'a T, instruction: impl Into<String>) -> Self {
        Self {
            translator,
            instruction: instruction.into(),
        }
    }

    /// Request payload pairing both texts.
    pub fn build_input(original_text: &str, translated_text: &str) -> String {
        format!(
            "Original chapter:\n{}\n\nTranslated chapter:\n{}",
            original_text, translated_text
        )
    }

    /// Ask for and validate the name pairs found across both texts.
    pub async fn extract(
        &self,
        original_text: &str,
        translated_text: &str,
    ) -> Result<Vec<NamePair>, ExtractionError> {
        let input = Self::build_input(original_text, translated_text);
        let raw = self.translator.ask(&self.instruction, &input).await?;
        debug!("Extractor returned {} bytes", raw.len());
        parse_extracted_names(&raw)
    }

    /// Extract names and add the unknown ones to `store`.
    ///
    /// Provider and persistence failures propagate; a malformed response is
    /// logged and reported as `ExtractionOutcome::Discarded`.
    pub async fn extract_into<S: KeyValueStore>(
        &self,
        store: &mut GlossaryStore<S>,
        original_text: &str,
        translated_text: &str,
    ) -> Result<ExtractionOutcome, AppError> {
        match self.extract(original_text, translated_text).await {
            Ok(pairs) => {
                let found = pairs.len();
                let added = store.add_if_absent(pairs).await?;
                info!("Extracted {} names, {} new", found, added);
                Ok(ExtractionOutcome::Merged(added))
            }
            Err(ExtractionError::Provider(e)) => Err(AppError::Provider(e)),
            Err(e) => {
                warn!("Discarding extracted names: {}", e);
                Ok(ExtractionOutcome::Discarded(e))
            }
        }
    }
}

/// Remove markdown code-fence markers the model may wrap its answer in.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse an extractor response into validated name pairs.
///
/// The response must be a JSON array whose every element is an object with
/// non-empty `original` and `translated` strings. Both fields are trimmed.
pub fn parse_extracted_names(raw: &str) -> Result<Vec<NamePair>, ExtractionError> {
    let payload = strip_code_fences(raw);
    let value: Value =
        serde_json::from_str(&payload).map_err(|e| ExtractionError::Parse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ExtractionError::Parse("expected a JSON array".to_string()));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let field = |name: &str| -> Result<String, ExtractionError> {
                let text = item
                    .get(name)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .unwrap_or_default();
                if text.is_empty() {
                    return Err(ExtractionError::InvalidEntry {
                        index,
                        reason: format!("missing or empty '{}'", name),
                    });
                }
                Ok(text.to_string())
            };

            if !item.is_object() {
                return Err(ExtractionError::InvalidEntry {
                    index,
                    reason: "not an object".to_string(),
                });
            }
            Ok(NamePair::new(field("original")?, field("translated")?))
        })
        .collect()
}
