use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use iap_core::{ActSet, AddressMode, ScoreResult};
use iap_extract::{ActExtractor, ExtractionRequest};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::{Evaluation, Report, evaluate};

/// A batch of evaluation cases, as read from YAML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub cache: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub tests: Vec<SuiteCase>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SuiteCase {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default, alias = "translated")]
    pub translation: Option<String>,
    #[serde(default)]
    pub meta: CaseMeta,
}

/// Per-case hints for the extractor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CaseMeta {
    #[serde(default)]
    pub lang_original: Option<String>,
    #[serde(default, alias = "lang_translated")]
    pub lang_translation: Option<String>,
    #[serde(default)]
    pub context_original: Option<String>,
    #[serde(default, alias = "context_translated")]
    pub context_translation: Option<String>,
}

impl SuiteConfig {
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: SuiteConfig = serde_yaml::from_str(yaml)?;
        if config.tests.is_empty() {
            bail!("Suite must contain a non-empty 'tests' list");
        }
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read suite {}", path.display()))?;
        Self::parse(&yaml).with_context(|| format!("Invalid suite {}", path.display()))
    }
}

impl SuiteCase {
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("(no-id)")
    }

    /// Both extraction requests, or `None` when either text is missing.
    pub fn requests(&self) -> Option<(ExtractionRequest, ExtractionRequest)> {
        let original = ExtractionRequest::new(self.original.clone()?)
            .with_language(self.meta.lang_original.clone())
            .with_context(self.meta.context_original.clone());
        let translated = ExtractionRequest::new(self.translation.clone()?)
            .with_language(self.meta.lang_translation.clone())
            .with_context(self.meta.context_translation.clone());
        Some((original, translated))
    }
}

/// The score fields of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub overall: f64,
    pub iap_set: f64,
    pub iap_force: f64,
    pub iap_target: f64,
    pub intensity_match: f64,
    pub no_critical_loss: bool,
    pub critical_loss_penalty: f64,
    pub address_mode_original: AddressMode,
    pub address_mode_translated: AddressMode,
    pub address_mode_penalty: f64,
}

impl From<&ScoreResult> for ScoreSummary {
    fn from(result: &ScoreResult) -> Self {
        ScoreSummary {
            overall: result.overall,
            iap_set: result.set_rate,
            iap_force: result.force_rate,
            iap_target: result.target_rate,
            intensity_match: result.intensity_match,
            no_critical_loss: result.no_critical_loss,
            critical_loss_penalty: result.critical_loss_penalty,
            address_mode_original: result.address_mode_original,
            address_mode_translated: result.address_mode_translated,
            address_mode_penalty: result.address_mode_penalty,
        }
    }
}

/// One line of suite output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteRecord {
    pub id: String,
    pub original: String,
    pub translation: String,
    pub original_extracted: ActSet,
    pub translation_extracted: ActSet,
    pub iap: ScoreSummary,
}

impl SuiteRecord {
    pub fn new(id: impl Into<String>, evaluation: &Evaluation) -> Self {
        SuiteRecord {
            id: id.into(),
            original: evaluation.original_text.clone(),
            translation: evaluation.translated_text.clone(),
            original_extracted: evaluation.original.clone(),
            translation_extracted: evaluation.translated.clone(),
            iap: ScoreSummary::from(&evaluation.result),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteOutcome {
    pub cases: usize,
    pub failures: usize,
}

/// Run every case of `config`, writing reports to `out`. A case that is
/// missing a text or fails to evaluate counts as a failure; the run goes
/// on.
pub async fn run_suite<E, W>(config: &SuiteConfig, extractor: &E, out: &mut W) -> Result<SuiteOutcome>
where
    E: ActExtractor + ?Sized,
    W: Write,
{
    let mut records = match &config.output {
        Some(path) => Some(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => None,
    };

    let mut outcome = SuiteOutcome::default();
    for case in &config.tests {
        outcome.cases += 1;
        let label = case.label();

        let Some((original, translated)) = case.requests() else {
            writeln!(out, "[SKIP] {label}: missing original/translation")?;
            outcome.failures += 1;
            continue;
        };

        writeln!(out, "\n\n### {label} ###")?;
        let evaluation = match evaluate(extractor, &original, &translated).await {
            Ok(evaluation) => evaluation,
            Err(error) => {
                warn!(case = label, error = %error, "suite case failed");
                writeln!(out, "[ERROR] {label}: {error:#}")?;
                outcome.failures += 1;
                continue;
            }
        };
        write!(out, "{}", Report::new(&evaluation))?;

        if let Some(file) = records.as_mut() {
            let mut line = serde_json::to_string(&SuiteRecord::new(label, &evaluation))?;
            line.push('\n');
            file.write_all(line.as_bytes()).await?;
        }
    }

    if let Some(mut file) = records {
        file.flush().await?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn it_reads_aliased_keys() -> Result<()> {
        let config = SuiteConfig::parse(
            r#"
cache: .cache/iap.jsonl
tests:
  - id: rem_core
    original: "レムは、スバルくんが好きです"
    translated: "Rem loves you, Subaru."
    meta:
      lang_original: ja
      lang_translated: en
      context_translated: "confession"
  - original: "only one side"
"#,
        )?;

        assert_eq!(config.cache, Some(PathBuf::from(".cache/iap.jsonl")));
        assert_eq!(config.output, None);
        assert_eq!(config.tests.len(), 2);

        let case = &config.tests[0];
        assert_eq!(case.label(), "rem_core");
        let (original, translated) = case.requests().expect("both texts present");
        assert_eq!(original.language_hint.as_deref(), Some("ja"));
        assert_eq!(original.context_hint, None);
        assert_eq!(translated.text, "Rem loves you, Subaru.");
        assert_eq!(translated.language_hint.as_deref(), Some("en"));
        assert_eq!(translated.context_hint.as_deref(), Some("confession"));

        assert_eq!(config.tests[1].label(), "(no-id)");
        assert_eq!(config.tests[1].requests(), None);
        Ok(())
    }

    #[test]
    fn it_requires_cases() {
        assert!(SuiteConfig::parse("cache: x.jsonl\n").is_err());
        assert!(SuiteConfig::parse("tests: []\n").is_err());
    }
}
