use std::path::Path;

use anyhow::{Context, Result};
use iap_core::{ActSet, RawActSet, ScoreResult, score_act_sets};
use iap_extract::{ActExtractor, ExtractionRequest};
use serde_json::Value;
use tracing::info;

/// One scored translation, with both sides as extracted and as normalized.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub original_text: String,
    pub translated_text: String,
    pub original_raw: RawActSet,
    pub translated_raw: RawActSet,
    pub original: ActSet,
    pub translated: ActSet,
    pub result: ScoreResult,
}

impl Evaluation {
    /// Normalize two raw act sets against their utterances and score them.
    pub fn from_raw(
        original_text: impl Into<String>,
        original_raw: RawActSet,
        translated_text: impl Into<String>,
        translated_raw: RawActSet,
    ) -> Result<Self> {
        let original_text = original_text.into();
        let translated_text = translated_text.into();
        let original = ActSet::from_raw(&original_raw, &original_text)
            .context("Original act set could not be normalized")?;
        let translated = ActSet::from_raw(&translated_raw, &translated_text)
            .context("Translated act set could not be normalized")?;
        let result = score_act_sets(&original, &translated);

        Ok(Evaluation {
            original_text,
            translated_text,
            original_raw,
            translated_raw,
            original,
            translated,
            result,
        })
    }
}

/// Extract both sides with `extractor` and score the pair.
pub async fn evaluate<E>(
    extractor: &E,
    original: &ExtractionRequest,
    translated: &ExtractionRequest,
) -> Result<Evaluation>
where
    E: ActExtractor + ?Sized,
{
    let (original_raw, translated_raw) =
        tokio::try_join!(extractor.extract(original), extractor.extract(translated))?;

    let evaluation = Evaluation::from_raw(
        original.text.clone(),
        original_raw,
        translated.text.clone(),
        translated_raw,
    )?;
    info!(
        model = extractor.model(),
        overall = evaluation.result.overall,
        "scored translation"
    );
    Ok(evaluation)
}

/// Read a stored act set. Accepts a bare act set or a cache record that
/// wraps one under `extracted`.
pub async fn load_raw_act_set(path: &Path) -> Result<RawActSet> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_raw_act_set(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_raw_act_set(contents: &str) -> Result<RawActSet> {
    let mut value: Value = serde_json::from_str(contents)?;
    if let Some(extracted) = value.get_mut("extracted") {
        value = extracted.take();
    }
    Ok(serde_json::from_value(value)?)
}
