//! Target-role normalization.
//!
//! The same cascade shape as act labels, over the six-way role taxonomy:
//! canonical pass-through, then a synonym table, then keyword families.
//! Anything left over is taken to be aimed at the listener, which is what
//! an utterance in dialogue is by default.

use tracing::debug;

use crate::cascade::{KeywordRule, first_match, fold_label};
use crate::taxonomy::TargetRole;

const SYNONYMS: &[(&str, TargetRole)] = &[
    ("SPEAKER", TargetRole::Speaker),
    ("MYSELF", TargetRole::Speaker),
    ("ADDRESSEE", TargetRole::Listener),
    ("HEARER", TargetRole::Listener),
    ("AUDIENCE", TargetRole::Listener),
    ("OTHER", TargetRole::ThirdParty),
    ("OTHERS", TargetRole::ThirdParty),
    ("SOMEONE", TargetRole::ThirdParty),
    ("CONDITION", TargetRole::Situation),
    ("EVENT", TargetRole::Situation),
    ("CIRCUMSTANCE", TargetRole::Situation),
    ("STATE", TargetRole::Situation),
    ("RESULT", TargetRole::Situation),
    ("CONCEPT", TargetRole::Abstract),
    ("IDEA", TargetRole::Abstract),
    ("VALUE", TargetRole::Abstract),
    ("IDEAL", TargetRole::Abstract),
    ("TRUTH", TargetRole::Proposition),
    ("ASSUMPTION", TargetRole::Proposition),
    ("PREMISE", TargetRole::Proposition),
];

pub const ROLE_RULES: &[KeywordRule<TargetRole>] = &[
    KeywordRule::new(&["self", "speaker", "myself", "own"], TargetRole::Speaker),
    KeywordRule::new(&["listen", "address", "you", "hearer"], TargetRole::Listener),
    KeywordRule::new(&["third", "other", "someone", "person"], TargetRole::ThirdParty),
    KeywordRule::new(
        &["situation", "condition", "event", "circumstance", "state", "result"],
        TargetRole::Situation,
    ),
    KeywordRule::new(
        &["proposition", "assumption", "premise", "claim", "that"],
        TargetRole::Proposition,
    ),
    KeywordRule::new(
        &["abstract", "value", "ideal", "meaning", "freedom", "justice", "concept"],
        TargetRole::Abstract,
    ),
];

/// Map a free-form target role onto the taxonomy. Never fails.
pub fn normalize_target_role(raw: &str) -> TargetRole {
    let folded = fold_label(raw);

    if let Some(role) = TargetRole::from_label(&folded) {
        return role;
    }
    if let Some((_, role)) = SYNONYMS.iter().find(|(label, _)| *label == folded) {
        return *role;
    }

    first_match(ROLE_RULES, &folded.to_lowercase()).unwrap_or_else(|| {
        debug!(raw, "unrecognized target role, defaulting to LISTENER");
        TargetRole::Listener
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_roles_are_fixed_points() {
        for role in TargetRole::ALL {
            assert_eq!(normalize_target_role(role.as_str()), role);
        }
        assert_eq!(normalize_target_role("third party"), TargetRole::ThirdParty);
    }

    #[test]
    fn synonyms_map_exactly() {
        assert_eq!(normalize_target_role("speaker"), TargetRole::Speaker);
        assert_eq!(normalize_target_role("Addressee"), TargetRole::Listener);
        assert_eq!(normalize_target_role("other"), TargetRole::ThirdParty);
        assert_eq!(normalize_target_role("event"), TargetRole::Situation);
        assert_eq!(normalize_target_role("premise"), TargetRole::Proposition);
        assert_eq!(normalize_target_role("ideal"), TargetRole::Abstract);
    }

    #[test]
    fn keyword_families_follow_priority() {
        assert_eq!(normalize_target_role("the speaker's own pride"), TargetRole::Speaker);
        assert_eq!(normalize_target_role("YOU_AND_ME"), TargetRole::Listener);
        assert_eq!(normalize_target_role("another person"), TargetRole::ThirdParty);
        assert_eq!(normalize_target_role("outcome state"), TargetRole::Situation);
        assert_eq!(normalize_target_role("the claim"), TargetRole::Proposition);
        assert_eq!(normalize_target_role("FREEDOM"), TargetRole::Abstract);
    }

    #[test]
    fn unknown_roles_default_to_listener() {
        assert_eq!(normalize_target_role("xyzzy"), TargetRole::Listener);
        assert_eq!(normalize_target_role(""), TargetRole::Listener);
    }
}
