//! Two-pass partial matching of original acts onto translated acts.
//!
//! Pass 1 commits only near-identical types, so a truly preserved act can
//! never be taken by a merely related one. Pass 2 pairs what is left by
//! best available score. Used indices are tracked on both sides; the act
//! lists themselves are never mutated.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;

use crate::act::Act;
use crate::equivalence::type_equivalence;

/// Minimum type equivalence for a pass-1 commit.
pub const EXACT_THRESHOLD: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    Exact,
    BestEffort,
}

/// One committed pairing, by index into the original and translated lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchedPair {
    pub original: usize,
    pub translated: usize,
    pub type_similarity: f64,
    pub pass: MatchPass,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Matching {
    /// Pairs in order of commitment.
    pub pairs: Vec<MatchedPair>,
    /// Original indices with no counterpart.
    pub lost: Vec<usize>,
    /// Translated indices with no counterpart.
    pub added: Vec<usize>,
}

impl Matching {
    pub fn is_matched_original(&self, index: usize) -> bool {
        self.pairs.iter().any(|pair| pair.original == index)
    }
}

#[derive(Default)]
struct Ledger {
    original: BTreeSet<usize>,
    translated: BTreeSet<usize>,
    pairs: Vec<MatchedPair>,
}

impl Ledger {
    /// First unused translated act with the highest score for `act` among
    /// those `admit` accepts.
    fn best_candidate(
        &self,
        act: &Act,
        translated: &[Act],
        admit: impl Fn(f64) -> bool,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in translated.iter().enumerate() {
            if self.translated.contains(&index) {
                continue;
            }
            let score = type_equivalence(act.act_type, candidate.act_type);
            if !admit(score) {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        best
    }

    fn run_pass(
        &mut self,
        original: &[Act],
        translated: &[Act],
        pass: MatchPass,
        admit: impl Fn(f64) -> bool + Copy,
    ) {
        for (index, act) in original.iter().enumerate() {
            if self.original.contains(&index) {
                continue;
            }
            let Some((target, score)) = self.best_candidate(act, translated, admit) else {
                continue;
            };
            trace!(original = index, translated = target, score, ?pass, "matched act");
            self.original.insert(index);
            self.translated.insert(target);
            self.pairs.push(MatchedPair {
                original: index,
                translated: target,
                type_similarity: score,
                pass,
            });
        }
    }
}

/// Match `original` acts onto `translated` acts. Each index appears in at
/// most one pair.
pub fn match_acts(original: &[Act], translated: &[Act]) -> Matching {
    let mut ledger = Ledger::default();
    ledger.run_pass(original, translated, MatchPass::Exact, |score| {
        score >= EXACT_THRESHOLD
    });
    ledger.run_pass(original, translated, MatchPass::BestEffort, |score| score > 0.0);

    let lost = (0..original.len())
        .filter(|index| !ledger.original.contains(index))
        .collect();
    let added = (0..translated.len())
        .filter(|index| !ledger.translated.contains(index))
        .collect();

    Matching {
        pairs: ledger.pairs,
        lost,
        added,
    }
}
