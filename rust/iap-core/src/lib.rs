//! # IAP Core: Illocutionary Act Preservation scoring
//!
//! Grades whether a translated utterance still *does* what the original
//! did (chooses, refuses, promises, threatens), rather than whether it says
//! the same words. The input is two extracted act sets, one per utterance;
//! the output is a bounded, reproducible [`ScoreResult`](score::ScoreResult).
//!
//! Everything here is deterministic and rule-based: no network, no I/O, no
//! embeddings. Extraction and caching live in `iap-extract`.
//!
//! ## Pipeline
//!
//! ```text
//! RawActSet ─┬─ label / role normalization (cascades)
//!            ├─ entity trimming, intensity clipping
//!            └─ vocative correction            → ActSet
//! ActSet × ActSet → two-pass matching → type / force / target rates
//!   → gated aggregate − critical-loss − address-mode penalties
//! ```
//!
//! ```rust
//! use iap_core::{ActSet, RawActSet, score_act_sets};
//!
//! let raw: RawActSet = serde_json::from_str(r#"{
//!     "primary_act": "ASSERT_CHOICE",
//!     "acts": [{"type": "ASSERT_CHOICE", "target_role": "LISTENER",
//!               "target_entity": "Subaru-kun", "intensity": 0.9}]
//! }"#).unwrap();
//! let original = ActSet::from_raw(&raw, "スバルくんがいいんです").unwrap();
//! let result = score_act_sets(&original, &original.clone());
//! assert_eq!(result.overall, 1.0);
//! ```

pub mod act;
pub mod cascade;
pub mod entity;
pub mod equivalence;
pub mod error;
pub mod kana;
pub mod label;
pub mod matcher;
pub mod role;
pub mod score;
pub mod target;
pub mod taxonomy;
pub mod vocative;

pub use act::{Act, ActSet, RawAct, RawActSet, RawIntensity};
pub use error::IapError;
pub use score::{LostAct, ScoreResult, ScoredPair, Severity, score_act_sets};
pub use taxonomy::{ActType, AddressMode, TargetRole};
