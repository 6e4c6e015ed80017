use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use iap_core::{RawAct, RawActSet, RawIntensity};
use iap_extract::{
    ActExtractor, CachedExtractor, ExtractError, ExtractionCache, ExtractionRequest, JsonlCache,
    MemoryCache, cache_key,
};
use pretty_assertions::assert_eq;

fn act_set(act_type: &str, intensity: f64) -> RawActSet {
    RawActSet {
        primary_act: act_type.to_string(),
        overall_force: "test".to_string(),
        acts: vec![RawAct {
            act_type: Some(act_type.to_string()),
            target_role: Some("LISTENER".to_string()),
            intensity: Some(RawIntensity::Number(intensity)),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Answers every request with a fixed act set and counts the calls.
struct CountingExtractor {
    model: String,
    calls: AtomicUsize,
}

impl CountingExtractor {
    fn new(model: &str) -> Self {
        CountingExtractor {
            model: model.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActExtractor for CountingExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<RawActSet, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut extracted = act_set("COMMIT", 0.9);
        extracted.overall_force = request.text.clone();
        Ok(extracted)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Fails every request.
struct FailingExtractor;

#[async_trait]
impl ActExtractor for FailingExtractor {
    async fn extract(&self, _request: &ExtractionRequest) -> Result<RawActSet, ExtractError> {
        Err(ExtractError::EmptyResponse)
    }

    fn model(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn it_treats_a_missing_file_as_an_empty_cache() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = JsonlCache::new(dir.path().join("absent.jsonl"));

    assert_eq!(cache.get("anything").await?, None);
    assert!(!cache.path().exists());
    Ok(())
}

#[tokio::test]
async fn it_persists_records_across_instances() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("cache.jsonl");

    let cache = JsonlCache::new(&path);
    cache.set("a".into(), act_set("COMMIT", 0.9)).await?;
    cache.set("b".into(), act_set("EXPRESS", 0.4)).await?;
    assert_eq!(cache.get("a").await?, Some(act_set("COMMIT", 0.9)));

    let reopened = JsonlCache::new(&path);
    assert_eq!(reopened.get("a").await?, Some(act_set("COMMIT", 0.9)));
    assert_eq!(reopened.get("b").await?, Some(act_set("EXPRESS", 0.4)));
    assert_eq!(reopened.get("c").await?, None);

    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents.lines().count(), 2);
    let first: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap_or(""))?;
    assert_eq!(first["key"], "a");
    assert!(first["ts"].as_str().is_some_and(|ts| ts.ends_with('Z')));
    assert_eq!(first["extracted"]["primary_act"], "COMMIT");
    Ok(())
}

#[tokio::test]
async fn it_skips_unreadable_lines() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cache.jsonl");
    let good = serde_json::json!({
        "key": "good",
        "ts": "2025-01-01T00:00:00Z",
        "extracted": { "primary_act": "DENY", "acts": [{ "type": "DENY" }] },
    });
    let lines = [
        "not json at all".to_string(),
        String::new(),
        good.to_string(),
        r#"{"key": "partial", "ts": "2025-01-01T00:00:00Z""#.to_string(),
        r#"{"ts": "2025-01-01T00:00:00Z", "extracted": {}}"#.to_string(),
        r#"{"key": "", "extracted": {}}"#.to_string(),
    ];
    std::fs::write(&path, lines.join("\n"))?;

    let cache = JsonlCache::new(&path);
    let hit = cache.get("good").await?.expect("good record is readable");
    assert_eq!(hit.primary_act, "DENY");
    assert_eq!(hit.address_mode, "direct");
    assert_eq!(cache.get("partial").await?, None);
    assert_eq!(cache.get("").await?, None);
    Ok(())
}

#[tokio::test]
async fn it_lets_the_last_record_for_a_key_win() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cache.jsonl");

    let cache = JsonlCache::new(&path);
    cache.set("k".into(), act_set("ASSERT", 0.3)).await?;
    cache.set("k".into(), act_set("ASSERT", 0.7)).await?;
    assert_eq!(cache.get("k").await?, Some(act_set("ASSERT", 0.7)));

    let reopened = JsonlCache::new(&path);
    assert_eq!(reopened.get("k").await?, Some(act_set("ASSERT", 0.7)));
    Ok(())
}

#[tokio::test]
async fn it_serves_repeated_requests_from_the_cache() -> Result<()> {
    let extractor = Arc::new(CountingExtractor::new("gpt-4.1-mini"));
    let cache = MemoryCache::default();
    let cached = CachedExtractor::new(extractor.clone(), cache.clone());
    let request = ExtractionRequest::new("約束する").with_language(Some("ja".into()));

    let first = cached.extract(&request).await?;
    let second = cached.extract(&request).await?;

    assert_eq!(first, second);
    assert_eq!(extractor.calls(), 1);
    assert_eq!(cached.model(), "gpt-4.1-mini");
    assert_eq!(
        cache.get(&cache_key("gpt-4.1-mini", &request)).await?,
        Some(first)
    );
    Ok(())
}

#[tokio::test]
async fn it_misses_when_hints_or_model_change() -> Result<()> {
    let cache = MemoryCache::default();
    let extractor = Arc::new(CountingExtractor::new("gpt-4.1-mini"));
    let cached = CachedExtractor::new(extractor.clone(), cache.clone());

    let bare = ExtractionRequest::new("I promise");
    cached.extract(&bare).await?;
    cached
        .extract(&bare.clone().with_language(Some("en".into())))
        .await?;
    cached
        .extract(&bare.clone().with_context(Some("a farewell".into())))
        .await?;
    assert_eq!(extractor.calls(), 3);

    // Blank hints are the same as no hints.
    cached
        .extract(&bare.clone().with_language(Some("  ".into())))
        .await?;
    assert_eq!(extractor.calls(), 3);

    let other = Arc::new(CountingExtractor::new("gpt-4o"));
    CachedExtractor::new(other.clone(), cache.clone())
        .extract(&bare)
        .await?;
    assert_eq!(other.calls(), 1);
    assert_eq!(cache.len().await, 4);
    Ok(())
}

#[tokio::test]
async fn it_caches_through_a_jsonl_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cache.jsonl");
    let request = ExtractionRequest::new("Choose me.");

    let extractor = Arc::new(CountingExtractor::new("m"));
    CachedExtractor::new(extractor.clone(), JsonlCache::new(&path))
        .extract(&request)
        .await?;
    CachedExtractor::new(extractor.clone(), JsonlCache::new(&path))
        .extract(&request)
        .await?;

    assert_eq!(extractor.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn it_does_not_cache_failures() -> Result<()> {
    let cache = MemoryCache::default();
    let cached = CachedExtractor::new(FailingExtractor, cache.clone());

    let result = cached.extract(&ExtractionRequest::new("...")).await;
    assert!(matches!(result, Err(ExtractError::EmptyResponse)));
    assert!(cache.is_empty().await);
    Ok(())
}
