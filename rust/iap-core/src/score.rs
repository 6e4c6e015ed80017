//! Aggregate act-preservation scoring.
//!
//! Three rates describe a translation:
//!
//! 1. **set**: fraction of original acts that found a counterpart
//! 2. **force**: force-weighted, intensity-weighted share of the original's
//!    rhetorical weight that survived, discounted by type similarity
//! 3. **target**: importance-weighted mean target similarity of the pairs
//!
//! The overall score is a weighted mean of the three, gated by the weakest
//! (`min^0.7`, so one collapsed dimension drags the score down without
//! zeroing it), minus flat penalties for lost critical acts and for a change
//! of address mode.

use serde::Serialize;
use tracing::debug;

use crate::act::{Act, ActSet, clip01};
use crate::equivalence::type_equivalence;
use crate::matcher::{MatchPass, match_acts};
use crate::target::{TargetSimilarity, target_similarity};
use crate::taxonomy::{ActType, AddressMode};

pub const SET_WEIGHT: f64 = 0.4;
pub const FORCE_WEIGHT: f64 = 0.35;
pub const TARGET_WEIGHT: f64 = 0.25;
pub const GATE_GAMMA: f64 = 0.7;

/// Intensity at or above which an act must be preserved.
pub const CRITICAL_INTENSITY: f64 = 0.8;
pub const CRITICAL_LOSS_PENALTY: f64 = 0.20;
pub const CRITICAL_LOSS_PENALTY_CAP: f64 = 0.40;

/// Floor for the weight-match denominator.
const WEIGHT_EPSILON: f64 = 0.01;

const ADDRESS_MODE_PENALTIES: &[(AddressMode, AddressMode, f64)] = &[
    (AddressMode::Direct, AddressMode::Reported, 0.35),
    (AddressMode::Direct, AddressMode::Monologue, 0.20),
    (AddressMode::Reported, AddressMode::Direct, 0.10),
    (AddressMode::Reported, AddressMode::Monologue, 0.10),
    (AddressMode::Monologue, AddressMode::Direct, 0.10),
    (AddressMode::Monologue, AddressMode::Reported, 0.15),
];

/// Penalty for moving from `original` to `translated` address mode.
/// Directional: turning direct speech into narration costs the most.
pub fn address_mode_penalty(original: AddressMode, translated: AddressMode) -> f64 {
    ADDRESS_MODE_PENALTIES
        .iter()
        .find(|(from, to, _)| *from == original && *to == translated)
        .map_or(0.0, |(_, _, penalty)| *penalty)
}

/// How bad losing an act is, by its intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn of(intensity: f64) -> Self {
        if intensity >= CRITICAL_INTENSITY {
            Severity::High
        } else if intensity >= 0.5 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A preserved act with everything computed about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPair {
    pub original_index: usize,
    pub translated_index: usize,
    pub original: Act,
    pub translated: Act,
    pub type_similarity: f64,
    pub target: TargetSimilarity,
    pub pass: MatchPass,
}

/// An original act with no counterpart in the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LostAct<'a> {
    pub act: &'a Act,
    pub severity: Severity,
    pub critical: bool,
    pub force_weight: f64,
}

/// Everything computed when scoring one translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub overall: f64,
    pub set_rate: f64,
    pub force_rate: f64,
    pub target_rate: f64,
    pub intensity_match: f64,
    pub no_critical_loss: bool,
    pub critical_loss_penalty: f64,
    pub address_mode_original: AddressMode,
    pub address_mode_translated: AddressMode,
    pub address_mode_penalty: f64,
    pub matched: Vec<ScoredPair>,
    pub lost: Vec<Act>,
    pub added: Vec<Act>,
}

impl ScoreResult {
    pub fn address_mode_match(&self) -> bool {
        self.address_mode_original == self.address_mode_translated
    }

    pub fn lost_acts(&self) -> impl Iterator<Item = LostAct<'_>> {
        self.lost.iter().map(|act| LostAct {
            act,
            severity: Severity::of(act.intensity),
            critical: act.act_type.is_critical(),
            force_weight: act.act_type.force_weight(),
        })
    }
}

fn weighted_intensity(act: &Act) -> f64 {
    act.act_type.force_weight() * act.intensity
}

fn force_rate(original: &[Act], matched: &[ScoredPair]) -> f64 {
    let total: f64 = original.iter().map(weighted_intensity).sum();
    if total <= 0.0 {
        return 1.0;
    }

    let preserved: f64 = matched
        .iter()
        .map(|pair| {
            let ow = weighted_intensity(&pair.original);
            let tw = weighted_intensity(&pair.translated);
            let weight_match = 1.0 - (ow - tw).abs() / ow.max(tw).max(WEIGHT_EPSILON);
            ow * pair.type_similarity * clip01(weight_match)
        })
        .sum();
    preserved / total
}

fn target_rate(matched: &[ScoredPair]) -> f64 {
    let (sum, total) = matched.iter().fold((0.0, 0.0), |(sum, total), pair| {
        let weight = pair.original.act_type.target_weight();
        (sum + pair.target.score * weight, total + weight)
    });
    if total > 0.0 { sum / total } else { 0.0 }
}

fn intensity_match(matched: &[ScoredPair]) -> f64 {
    if matched.is_empty() {
        return 0.0;
    }
    let diff: f64 = matched
        .iter()
        .map(|pair| (pair.original.intensity - pair.translated.intensity).abs())
        .sum();
    1.0 - diff / matched.len() as f64
}

fn primary_preserved(primary: ActType, translated_primary: ActType, matched: &[ScoredPair]) -> bool {
    matched.iter().any(|pair| {
        type_equivalence(primary, pair.original.act_type) > 0.0
            && type_equivalence(primary, pair.translated.act_type) > 0.0
    }) || type_equivalence(primary, translated_primary) > 0.0
}

/// Score how well `translated` preserves the acts of `original`.
///
/// Pure and total: any pair of act sets, including empty ones, yields a
/// result with every rate in `[0, 1]`.
pub fn score_act_sets(original: &ActSet, translated: &ActSet) -> ScoreResult {
    let o_acts = &original.acts;
    let t_acts = &translated.acts;
    let matching = match_acts(o_acts, t_acts);

    let matched: Vec<ScoredPair> = matching
        .pairs
        .iter()
        .map(|pair| {
            let o = &o_acts[pair.original];
            let t = &t_acts[pair.translated];
            ScoredPair {
                original_index: pair.original,
                translated_index: pair.translated,
                original: o.clone(),
                translated: t.clone(),
                type_similarity: pair.type_similarity,
                target: target_similarity(o, t),
                pass: pair.pass,
            }
        })
        .collect();
    let lost: Vec<Act> = matching.lost.iter().map(|i| o_acts[*i].clone()).collect();
    let added: Vec<Act> = matching.added.iter().map(|j| t_acts[*j].clone()).collect();

    let set_rate = if o_acts.is_empty() {
        1.0
    } else {
        matched.len() as f64 / o_acts.len() as f64
    };
    let force_rate = clip01(force_rate(o_acts, &matched));
    let target_rate = clip01(target_rate(&matched));
    let intensity_match = clip01(intensity_match(&matched));

    let critical_lost = lost.iter().filter(|act| act.act_type.is_critical()).count();
    let critical_loss_penalty =
        (critical_lost as f64 * CRITICAL_LOSS_PENALTY).min(CRITICAL_LOSS_PENALTY_CAP);

    let high_preserved = o_acts
        .iter()
        .enumerate()
        .filter(|(_, act)| act.intensity >= CRITICAL_INTENSITY)
        .all(|(index, _)| matching.is_matched_original(index));
    let no_critical_loss = critical_lost == 0
        && high_preserved
        && primary_preserved(original.primary_act, translated.primary_act, &matched);

    let address_mode_penalty = address_mode_penalty(original.address_mode, translated.address_mode);

    let base = SET_WEIGHT * set_rate + FORCE_WEIGHT * force_rate + TARGET_WEIGHT * target_rate;
    let gate = set_rate.min(force_rate).min(target_rate).powf(GATE_GAMMA);
    let overall = clip01(base * gate - critical_loss_penalty - address_mode_penalty);

    debug!(
        overall,
        set_rate,
        force_rate,
        target_rate,
        critical_loss_penalty,
        address_mode_penalty,
        "scored act sets"
    );

    ScoreResult {
        overall,
        set_rate,
        force_rate,
        target_rate,
        intensity_match,
        no_critical_loss,
        critical_loss_penalty,
        address_mode_original: original.address_mode,
        address_mode_translated: translated.address_mode,
        address_mode_penalty,
        matched,
        lost,
        added,
    }
}
