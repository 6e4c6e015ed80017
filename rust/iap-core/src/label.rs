//! Act-type normalization.
//!
//! Extractors are told to use the fixed taxonomy but still produce
//! synonyms, invented labels ("PROCLAIM", "CONFESSION_OF_LOVE") and, under
//! uncertainty, the generic `ASSERT`. Normalization always terminates in a
//! canonical [`ActType`]:
//!
//! 1. exact synonym table
//! 2. canonical pass-through
//! 3. keyword cascade over the folded label
//! 4. fallback to `ASSERT`
//!
//! A separate promotion pass ([`promote_assert`]) then revisits `ASSERT`
//! using the act's force description and target entity.

use tracing::{debug, trace};

use crate::cascade::{KeywordRule, first_match, fold_label};
use crate::taxonomy::ActType;

/// Common variants mapped before anything else.
const SYNONYMS: &[(&str, ActType)] = &[
    ("ASSERTION", ActType::Assert),
    ("DECLARE", ActType::Assert),
    ("STATEMENT", ActType::Assert),
    ("STATE", ActType::Assert),
    ("DESCRIBE", ActType::Assert),
    ("CLAIM", ActType::Assert),
    ("PROMISE", ActType::Commit),
    ("VOW", ActType::Commit),
    ("PLEDGE", ActType::Commit),
    ("CHOICE", ActType::AssertChoice),
    ("EXPRESSION", ActType::Express),
    ("EMOTION", ActType::Express),
    ("EMOTE", ActType::Express),
    ("EXPRESSIVE", ActType::Express),
    ("ORDER", ActType::Command),
    ("DIRECTIVE", ActType::Direct),
    ("PRESSURE", ActType::Direct),
    ("DENIAL", ActType::Deny),
    ("REJECTION", ActType::Deny),
    ("REJECT", ActType::Deny),
    ("REFUSE", ActType::Deny),
    ("BLOCK", ActType::CloseEscape),
    ("SHUTDOWN", ActType::CloseEscape),
    ("EXCLUDE", ActType::CloseEscape),
];

/// Keyword families for labels outside the taxonomy, highest priority first.
pub const LABEL_RULES: &[KeywordRule<ActType>] = &[
    KeywordRule::new(
        &[
            "confess", "love", "like", "desire", "want", "feel", "emotion", "express",
            "romantic", "affection",
        ],
        ActType::Express,
    ),
    KeywordRule::new(
        &[
            "choice", "choose", "select", "prefer", "preference", "exclusive", "specific",
            "only", "sole",
        ],
        ActType::AssertChoice,
    ),
    KeywordRule::new(
        &[
            "refuse", "reject", "alternative", "escape", "block", "exclude", "close", "shut",
            "eliminate",
        ],
        ActType::CloseEscape,
    ),
    KeywordRule::new(&["deny", "negat", "reject", "refus"], ActType::Deny),
    KeywordRule::new(
        &["assumption", "presuppos", "correct", "wrong"],
        ActType::DenyAssumption,
    ),
    KeywordRule::new(
        &[
            "commit", "promise", "vow", "pledge", "resolve", "will_not", "won't", "swear",
        ],
        ActType::Commit,
    ),
    KeywordRule::new(
        &["direct", "pressure", "demand", "urge", "push"],
        ActType::Direct,
    ),
    KeywordRule::new(&["request", "ask", "beg", "plead"], ActType::Request),
    KeywordRule::new(&["command", "order", "instruct"], ActType::Command),
    KeywordRule::new(
        &["ultimatum", "condition", "if_not", "or_else"],
        ActType::Ultimatum,
    ),
    KeywordRule::new(
        &["assert", "state", "claim", "declar", "insist"],
        ActType::Assert,
    ),
];

const EXCLUSION_CUES: &[&str] = &[
    "close",
    "block",
    "reject",
    "refuse",
    "unacceptable",
    "won't have",
    "won't accept",
    "can't accept",
    "cannot accept",
    "no one else",
    "nothing else",
    "not acceptable",
    "alternative",
    "other option",
    "other choice",
    "eliminate",
    "exclude",
    "shut",
];

/// Secondary cues for a generic `ASSERT`, scanned over `force + entity`.
/// Each rule is guarded against the one before it: exclusivity only counts
/// when no exclusion language is present.
pub const PROMOTION_RULES: &[KeywordRule<ActType>] = &[
    KeywordRule::new(EXCLUSION_CUES, ActType::CloseEscape),
    KeywordRule::new(
        &[
            "only",
            "exclusive",
            "the one",
            "no other",
            "sole",
            "must be",
            "has to be",
            "none but",
            "just you",
            "specific",
            "particular choice",
            "selected",
            "acceptable",
            "desired",
            "preferred",
        ],
        ActType::AssertChoice,
    )
    .unless(&["reject", "refuse", "close", "block"]),
    KeywordRule::new(
        &[
            "want",
            "desire",
            "like",
            "love",
            "prefer",
            "feeling",
            "emotion",
            "affection",
            "longing",
            "attracted",
            "fond of",
            "care for",
        ],
        ActType::Express,
    ),
    KeywordRule::new(
        &[
            "assumption",
            "presupposition",
            "implied",
            "mistaken",
            "wrong",
            "incorrect",
            "not true",
            "misunderstand",
        ],
        ActType::DenyAssumption,
    ),
    KeywordRule::new(
        &[
            "will always",
            "will never",
            "promise",
            "vow",
            "swear",
            "commit",
            "pledge",
            "resolve",
        ],
        ActType::Commit,
    ),
];

/// Map a free-form act label onto the taxonomy. Never fails.
pub fn normalize_act_type(raw: &str) -> ActType {
    let folded = fold_label(raw);

    if let Some((_, act_type)) = SYNONYMS.iter().find(|(label, _)| *label == folded) {
        return *act_type;
    }
    if let Some(act_type) = ActType::from_label(&folded) {
        return act_type;
    }

    match first_match(LABEL_RULES, &folded.to_lowercase()) {
        Some(act_type) => {
            trace!(raw, %act_type, "act label matched keyword family");
            act_type
        }
        None => {
            debug!(raw, "unrecognized act label, falling back to ASSERT");
            ActType::Assert
        }
    }
}

/// Revisit a generic `ASSERT` using the act's force text and target
/// entity. Any other act type is returned unchanged.
pub fn promote_assert(act_type: ActType, force: &str, target_entity: &str) -> ActType {
    if act_type != ActType::Assert {
        return act_type;
    }

    let context = format!("{} {}", force.to_lowercase(), target_entity.to_lowercase());
    match first_match(PROMOTION_RULES, &context) {
        Some(promoted) => {
            debug!(%promoted, force, "promoted ASSERT from force cues");
            promoted
        }
        None => act_type,
    }
}

/// Normalize then promote: the full act-type pipeline for one act record.
pub fn classify_act(raw_type: &str, force: &str, target_entity: &str) -> ActType {
    promote_assert(normalize_act_type(raw_type), force, target_entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_exactly() {
        assert_eq!(normalize_act_type("assertion"), ActType::Assert);
        assert_eq!(normalize_act_type("Claim"), ActType::Assert);
        assert_eq!(normalize_act_type("pledge"), ActType::Commit);
        assert_eq!(normalize_act_type("refuse"), ActType::Deny);
        assert_eq!(normalize_act_type("shutdown"), ActType::CloseEscape);
    }

    #[test]
    fn canonical_labels_pass_through() {
        assert_eq!(normalize_act_type("deny assumption"), ActType::DenyAssumption);
        assert_eq!(normalize_act_type("close-escape"), ActType::CloseEscape);
        assert_eq!(normalize_act_type("ULTIMATUM"), ActType::Ultimatum);
    }

    #[test]
    fn vow_and_declare_fold_through_the_synonym_table() {
        assert_eq!(normalize_act_type("VOW"), ActType::Commit);
        assert_eq!(normalize_act_type("DECLARE"), ActType::Assert);
    }

    #[test]
    fn keyword_families_follow_priority() {
        assert_eq!(normalize_act_type("CONFESSION_OF_LOVE"), ActType::Express);
        assert_eq!(normalize_act_type("exclusive selection"), ActType::AssertChoice);
        assert_eq!(normalize_act_type("REJECT_ALTERNATIVES"), ActType::CloseEscape);
        assert_eq!(normalize_act_type("NEGATION"), ActType::Deny);
        assert_eq!(normalize_act_type("CORRECTION"), ActType::DenyAssumption);
        assert_eq!(normalize_act_type("SWEAR"), ActType::Commit);
        assert_eq!(normalize_act_type("URGE"), ActType::Direct);
        assert_eq!(normalize_act_type("PLEA"), ActType::Assert);
        assert_eq!(normalize_act_type("BEGGING"), ActType::Request);
        assert_eq!(normalize_act_type("INSTRUCTION"), ActType::Command);
        assert_eq!(normalize_act_type("CONDITIONAL_THREAT"), ActType::Ultimatum);
        assert_eq!(normalize_act_type("INSISTENCE"), ActType::Assert);
    }

    #[test]
    fn affect_outranks_exclusion_in_the_label_cascade() {
        // "want" (EXPRESS) is checked before "alternative" (CLOSE_ESCAPE).
        assert_eq!(normalize_act_type("WANT_NO_ALTERNATIVE"), ActType::Express);
    }

    #[test]
    fn unknown_labels_fall_back_to_assert() {
        assert_eq!(normalize_act_type("XYZZY"), ActType::Assert);
        assert_eq!(normalize_act_type(""), ActType::Assert);
    }

    #[test]
    fn promotion_only_touches_assert() {
        assert_eq!(
            promote_assert(ActType::Express, "closes off alternatives", ""),
            ActType::Express
        );
    }

    #[test]
    fn promotion_prefers_exclusion_over_exclusivity() {
        assert_eq!(
            promote_assert(ActType::Assert, "only Subaru; no one else will do", ""),
            ActType::CloseEscape
        );
        assert_eq!(
            promote_assert(ActType::Assert, "he is the one", ""),
            ActType::AssertChoice
        );
    }

    #[test]
    fn promotion_reads_the_target_entity_too() {
        assert_eq!(
            promote_assert(ActType::Assert, "quiet", "object of affection"),
            ActType::Express
        );
    }

    #[test]
    fn promotion_cascade_reaches_later_rules() {
        assert_eq!(
            promote_assert(ActType::Assert, "corrects a mistaken belief", ""),
            ActType::DenyAssumption
        );
        assert_eq!(
            promote_assert(ActType::Assert, "I will always be here", ""),
            ActType::Commit
        );
        assert_eq!(
            promote_assert(ActType::Assert, "plain report of the weather", ""),
            ActType::Assert
        );
    }

    #[test]
    fn invented_label_with_commitment_force_becomes_commit() {
        assert_eq!(
            classify_act("PROCLAIM", "promises to come back", ""),
            ActType::Commit
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for act_type in ActType::ALL {
            let once = normalize_act_type(act_type.as_str());
            assert_eq!(normalize_act_type(once.as_str()), once);
        }
    }
}
