use async_trait::async_trait;
use iap_core::RawActSet;

use crate::ExtractError;

/// One utterance to extract acts from, with optional hints for the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub text: String,
    pub language_hint: Option<String>,
    pub context_hint: Option<String>,
}

impl ExtractionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        ExtractionRequest {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language_hint = language.filter(|hint| !hint.trim().is_empty());
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context_hint = context.filter(|hint| !hint.trim().is_empty());
        self
    }
}

/// An [ActExtractor] turns an utterance into a raw act set. Output is not
/// normalized; callers pass it through [`iap_core::ActSet::from_raw`].
#[async_trait]
pub trait ActExtractor: Send + Sync {
    /// Extract the act set performed by `request.text`
    async fn extract(&self, request: &ExtractionRequest) -> Result<RawActSet, ExtractError>;

    /// The model identifier; part of every cache key
    fn model(&self) -> &str;
}

#[async_trait]
impl<T> ActExtractor for std::sync::Arc<T>
where
    T: ActExtractor + ?Sized,
{
    async fn extract(&self, request: &ExtractionRequest) -> Result<RawActSet, ExtractError> {
        self.as_ref().extract(request).await
    }

    fn model(&self) -> &str {
        self.as_ref().model()
    }
}
