//! Act-set extraction for the IAP evaluator.
//!
//! An [ActExtractor] turns one utterance into a [`RawActSet`](iap_core::RawActSet).
//! [OpenAiExtractor] does so against any OpenAI-compatible chat completions
//! endpoint; [CachedExtractor] wraps any extractor with an
//! [ExtractionCache] ([JsonlCache] on disk, [MemoryCache] in process) so
//! repeated evaluation of the same text costs one call.

mod cache;
mod cached;
mod error;
mod extractor;
pub mod json;
mod openai;
pub mod prompt;

pub use cache::*;
pub use cached::*;
pub use error::*;
pub use extractor::*;
pub use openai::*;
