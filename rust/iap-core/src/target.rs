//! Target similarity: who an act is aimed at (role) and which referent
//! it names (entity).
//!
//! Some act types make certain role disagreements harmless. Closing off an
//! escape "to you" and closing off "that outcome" perform the same act, so
//! those types carry their own compatibility entries, consulted before the
//! generic role distances.

use serde::Serialize;

use crate::act::Act;
use crate::entity::entity_similarity;
use crate::taxonomy::ActType;
use crate::taxonomy::TargetRole::{self, *};

pub const ROLE_WEIGHT: f64 = 0.6;
pub const ENTITY_WEIGHT: f64 = 0.4;

/// Symmetric role-pair scores that apply only for one original act type.
const ACT_ROLE_COMPAT: &[(ActType, &[(TargetRole, TargetRole, f64)])] = &[
    (
        ActType::CloseEscape,
        &[
            (Listener, Situation, 0.90),
            (Listener, Proposition, 0.90),
            (Situation, Proposition, 0.95),
            (ThirdParty, Situation, 0.85),
            (ThirdParty, Proposition, 0.85),
        ],
    ),
    (
        ActType::Ultimatum,
        &[(Listener, Situation, 0.85), (Listener, Proposition, 0.80)],
    ),
    (
        ActType::DenyAssumption,
        &[(Proposition, Situation, 0.90), (Proposition, Listener, 0.75)],
    ),
];

/// Generic role distances between people.
const PERSON_PAIRS: &[(TargetRole, TargetRole, f64)] = &[
    (Listener, ThirdParty, 0.85),
    (Speaker, Listener, 0.70),
    (Speaker, ThirdParty, 0.50),
];

const BOTH_ABSTRACT: f64 = 0.80;
const CONCRETE_VS_ABSTRACT: f64 = 0.30;

/// Why a role pair scored what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleBasis {
    Exact,
    /// An act-specific compatibility entry for this act type applied.
    Compatible(ActType),
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoleSimilarity {
    pub score: f64,
    pub basis: RoleBasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetSimilarity {
    pub role: RoleSimilarity,
    pub entity: f64,
    pub score: f64,
}

fn lookup(pairs: &[(TargetRole, TargetRole, f64)], a: TargetRole, b: TargetRole) -> Option<f64> {
    pairs
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, score)| *score)
}

/// Role distance with no act-specific knowledge.
pub fn default_role_distance(a: TargetRole, b: TargetRole) -> f64 {
    if a == b {
        return 1.0;
    }
    if let Some(score) = lookup(PERSON_PAIRS, a, b) {
        return score;
    }
    match (a.is_abstract(), b.is_abstract()) {
        (true, true) => BOTH_ABSTRACT,
        (true, false) | (false, true) => CONCRETE_VS_ABSTRACT,
        (false, false) => 0.40,
    }
}

/// Role similarity for an act whose original type is `act_type`.
pub fn role_similarity(original: TargetRole, translated: TargetRole, act_type: ActType) -> RoleSimilarity {
    if original == translated {
        return RoleSimilarity {
            score: 1.0,
            basis: RoleBasis::Exact,
        };
    }

    let compat = ACT_ROLE_COMPAT
        .iter()
        .find(|(kind, _)| *kind == act_type)
        .and_then(|(_, pairs)| lookup(pairs, original, translated));

    match compat {
        Some(score) => RoleSimilarity {
            score,
            basis: RoleBasis::Compatible(act_type),
        },
        None => RoleSimilarity {
            score: default_role_distance(original, translated),
            basis: RoleBasis::Default,
        },
    }
}

/// Combined target similarity of a matched pair. Role compatibility is
/// keyed on the original act's type.
pub fn target_similarity(original: &Act, translated: &Act) -> TargetSimilarity {
    let role = role_similarity(original.target_role, translated.target_role, original.act_type);
    let entity = entity_similarity(&original.target_entity, &translated.target_entity);
    TargetSimilarity {
        role,
        entity,
        score: ROLE_WEIGHT * role.score + ENTITY_WEIGHT * entity,
    }
}
