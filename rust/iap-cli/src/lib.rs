//! # IAP command line
//!
//! The `iap` binary extracts the illocutionary acts of an original line and
//! its translation, scores how well the translation preserves them, and
//! prints a report.
//!
//! ```bash
//! iap eval -o "逃げないで" -t "Don't run away" --lang-original ja
//! iap suite cases.yaml
//! iap score original.json translated.json --original-text "逃げないで"
//! ```
//!
//! `eval` and `suite` call an OpenAI-compatible endpoint through an
//! extraction cache; `score` works offline on stored act sets.

mod cli;
pub use cli::*;

mod evaluate;
pub use evaluate::*;

mod report;
pub use report::*;

mod suite;
pub use suite::*;
