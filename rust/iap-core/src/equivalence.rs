//! How interchangeable two act types are.

use crate::label::normalize_act_type;
use crate::taxonomy::ActType;
use crate::taxonomy::ActType::*;

pub const SAME_TYPE: f64 = 1.0;
pub const SAME_CLASS: f64 = 0.8;

/// Mutually equivalent groups.
const CLASSES: &[&[ActType]] = &[
    &[Assert, DenyAssumption],
    &[Direct, Request, Command],
    &[Express],
    &[AssertChoice, Commit, Vow],
    &[CloseEscape, Deny],
    &[Ultimatum],
];

/// Hand-tuned scores for related types outside a shared class. Symmetric.
/// Consulted after [`CLASSES`], so a pair present in both scores
/// [`SAME_CLASS`].
const CLOSE_PAIRS: &[(ActType, ActType, f64)] = &[
    (Assert, AssertChoice, 0.75),
    (Assert, CloseEscape, 0.70),
    (Assert, Express, 0.60),
    (Request, Direct, 0.70),
    (Deny, DenyAssumption, 0.75),
    (CloseEscape, Deny, 0.70),
    (Commit, Vow, 0.90),
    (AssertChoice, CloseEscape, 0.65),
    (Ultimatum, Commit, 0.60),
    (Express, AssertChoice, 0.50),
];

/// Type-equivalence score in `[0, 1]`.
pub fn type_equivalence(a: ActType, b: ActType) -> f64 {
    if a == b {
        return SAME_TYPE;
    }
    if CLASSES
        .iter()
        .any(|class| class.contains(&a) && class.contains(&b))
    {
        return SAME_CLASS;
    }
    CLOSE_PAIRS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map_or(0.0, |(_, _, score)| *score)
}

/// [`type_equivalence`] over raw labels, normalizing both first.
pub fn label_equivalence(a: &str, b: &str) -> f64 {
    type_equivalence(normalize_act_type(a), normalize_act_type(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_scores_one() {
        for act_type in ActType::ALL {
            assert_eq!(type_equivalence(act_type, act_type), SAME_TYPE);
        }
    }

    #[test]
    fn shared_class_scores_point_eight() {
        assert_eq!(type_equivalence(Request, Command), SAME_CLASS);
        assert_eq!(type_equivalence(Assert, DenyAssumption), SAME_CLASS);
        assert_eq!(type_equivalence(AssertChoice, Vow), SAME_CLASS);
    }

    #[test]
    fn class_membership_shadows_close_pairs() {
        assert_eq!(type_equivalence(Commit, Vow), SAME_CLASS);
        assert_eq!(type_equivalence(Deny, CloseEscape), SAME_CLASS);
        assert_eq!(type_equivalence(Direct, Request), SAME_CLASS);
    }

    #[test]
    fn close_pairs_are_symmetric() {
        assert_eq!(type_equivalence(Assert, AssertChoice), 0.75);
        assert_eq!(type_equivalence(AssertChoice, Assert), 0.75);
        assert_eq!(type_equivalence(CloseEscape, AssertChoice), 0.65);
        assert_eq!(type_equivalence(Commit, Ultimatum), 0.60);
        assert_eq!(type_equivalence(AssertChoice, Express), 0.50);
    }

    #[test]
    fn unrelated_types_score_zero() {
        assert_eq!(type_equivalence(Express, Ultimatum), 0.0);
        assert_eq!(type_equivalence(Declare, Assert), 0.0);
    }

    #[test]
    fn raw_labels_are_normalized_first() {
        assert_eq!(label_equivalence("promise", "COMMIT"), SAME_TYPE);
        assert_eq!(label_equivalence("order", "request"), SAME_CLASS);
    }

    #[test]
    fn scores_are_symmetric() {
        for a in ActType::ALL {
            for b in ActType::ALL {
                assert_eq!(type_equivalence(a, b), type_equivalence(b, a));
            }
        }
    }
}
