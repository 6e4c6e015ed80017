use async_trait::async_trait;
use iap_core::RawActSet;
use tracing::debug;

use crate::{ActExtractor, ExtractError, ExtractionCache, ExtractionRequest, cache_key};

/// A [CachedExtractor] consults an [ExtractionCache] before delegating to
/// an inner [ActExtractor], and stores whatever the inner extractor
/// returns.
pub struct CachedExtractor<E, C> {
    extractor: E,
    cache: C,
}

impl<E, C> CachedExtractor<E, C>
where
    E: ActExtractor,
    C: ExtractionCache,
{
    pub fn new(extractor: E, cache: C) -> Self {
        CachedExtractor { extractor, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn inner(&self) -> &E {
        &self.extractor
    }
}

#[async_trait]
impl<E, C> ActExtractor for CachedExtractor<E, C>
where
    E: ActExtractor,
    C: ExtractionCache,
{
    async fn extract(&self, request: &ExtractionRequest) -> Result<RawActSet, ExtractError> {
        let key = cache_key(self.extractor.model(), request);

        if let Some(hit) = self.cache.get(&key).await? {
            debug!(%key, "extraction cache hit");
            return Ok(hit);
        }

        debug!(%key, "extraction cache miss");
        let extracted = self.extractor.extract(request).await?;
        self.cache.set(key, extracted.clone()).await?;
        Ok(extracted)
    }

    fn model(&self) -> &str {
        self.extractor.model()
    }
}
