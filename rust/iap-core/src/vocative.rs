//! Vocative correction.
//!
//! Extractors often file a named addressee as `THIRD_PARTY` because the
//! name looks like a mention. When the utterance itself shows the name being
//! called out ("Subaru-kun, ..." / "スバルくんがいい"), the act is really aimed
//! at the listener. This pass only ever upgrades to `LISTENER`.

use tracing::debug;

use crate::act::Act;
use crate::entity::normalize_entity;
use crate::taxonomy::{ActType, TargetRole};

const JA_HONORIFICS: &[&str] = &["くん", "さん", "ちゃん", "先輩", "先生", "様"];
const EN_HONORIFICS: &[&str] = &["-kun", "-san", "-chan", "-senpai"];

/// What may directly follow a name when it is used to call someone.
const ADDRESS_CUES: &[&str] = &[",", "、", "—", "!", "！", ".", "。", "-kun", "-san"];

/// Exclusive-preference and affection markers.
const PREFERENCE_MARKERS: &[&str] = &[
    "がいい", "が良い", "じゃなきゃ", "でなきゃ", "しかない", "だけ", "好き", "嫌", "愛し", "大切",
];

/// Bare names an entity could be called by in the utterance.
fn name_candidates(entity: &str) -> Vec<String> {
    let lowered = entity.to_lowercase();
    let mut names = Vec::new();

    for honorific in JA_HONORIFICS.iter().chain(EN_HONORIFICS) {
        let Some(idx) = lowered.find(honorific) else {
            continue;
        };
        let before = &lowered[..idx];
        if let Some(name) = before.split_whitespace().last() {
            names.push(name.to_string());
        }
    }

    let normalized = normalize_entity(entity);
    if !normalized.is_empty() {
        names.push(normalized);
    }
    names
}

/// Whether `name` followed by `cue` occurs in `text` at the start of a
/// word. Only a preceding ASCII letter or digit breaks the word, so "i," in
/// "hi," is not the name "i" while "ねえスバルくん" still addresses スバル.
fn occurs_as_word(text: &str, name: &str, cue: &str) -> bool {
    let pattern = format!("{name}{cue}");
    text.match_indices(&pattern).any(|(start, _)| {
        !text[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

fn is_addressed(name: &str, text: &str) -> bool {
    JA_HONORIFICS
        .iter()
        .chain(ADDRESS_CUES)
        .any(|cue| occurs_as_word(text, name, cue))
}

/// Upgrade `act.target_role` to `LISTENER` when `utterance` addresses the
/// act's target entity by name. Returns whether the role changed.
pub fn apply_vocative(act: &mut Act, utterance: &str) -> bool {
    if act.target_role == TargetRole::Listener || utterance.is_empty() {
        return false;
    }

    let text = utterance.to_lowercase();
    let names = name_candidates(&act.target_entity);

    let addressed = names.iter().any(|name| is_addressed(name, &text));
    let preferred = !addressed
        && act.target_role == TargetRole::ThirdParty
        && matches!(
            act.act_type,
            ActType::AssertChoice | ActType::Express | ActType::Declare
        )
        && PREFERENCE_MARKERS.iter().any(|marker| text.contains(marker))
        && names.iter().any(|name| text.contains(name.as_str()));

    if addressed || preferred {
        debug!(
            entity = %act.target_entity,
            from = %act.target_role,
            "target addressed by name, reassigning to LISTENER"
        );
        act.target_role = TargetRole::Listener;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(act_type: ActType, role: TargetRole, entity: &str) -> Act {
        Act {
            act_type,
            target_role: role,
            target_entity: entity.to_string(),
            force: String::new(),
            intensity: 0.8,
        }
    }

    #[test]
    fn candidates_include_bare_and_normalized_names() {
        assert_eq!(
            name_candidates("Natsuki Subaru-kun"),
            vec!["subaru".to_string(), "natsukisubaru".to_string()]
        );
        assert_eq!(
            name_candidates("スバルくん"),
            vec!["スバル".to_string(), "スバル".to_string()]
        );
        assert!(name_candidates("").is_empty());
    }

    #[test]
    fn name_with_honorific_in_text_is_direct_address() {
        let mut a = act(ActType::AssertChoice, TargetRole::ThirdParty, "スバルくん");
        assert!(apply_vocative(&mut a, "スバルくんがいいの"));
        assert_eq!(a.target_role, TargetRole::Listener);
    }

    #[test]
    fn name_followed_by_punctuation_is_direct_address() {
        let mut a = act(ActType::Commit, TargetRole::Situation, "Subaru");
        assert!(apply_vocative(&mut a, "Subaru, I will wait for you."));
        assert_eq!(a.target_role, TargetRole::Listener);
    }

    #[test]
    fn plain_mention_is_left_alone() {
        let mut a = act(ActType::Assert, TargetRole::ThirdParty, "Subaru");
        assert!(!apply_vocative(&mut a, "I saw Subaru yesterday"));
        assert_eq!(a.target_role, TargetRole::ThirdParty);
    }

    #[test]
    fn preference_marker_rescues_a_mentioned_name() {
        let mut a = act(ActType::Express, TargetRole::ThirdParty, "レム");
        assert!(apply_vocative(&mut a, "私はレムが好き"));
        assert_eq!(a.target_role, TargetRole::Listener);

        let mut b = act(ActType::Commit, TargetRole::ThirdParty, "レム");
        assert!(!apply_vocative(&mut b, "私はレムが好き"));
    }

    #[test]
    fn name_must_start_a_word() {
        let mut a = act(ActType::Express, TargetRole::Speaker, "I");
        assert!(!apply_vocative(&mut a, "Oh hi, it's me."));
        assert_eq!(a.target_role, TargetRole::Speaker);

        let mut b = act(ActType::Commit, TargetRole::ThirdParty, "スバル");
        assert!(apply_vocative(&mut b, "ねえスバルくん、待ってて"));
        assert_eq!(b.target_role, TargetRole::Listener);
    }

    #[test]
    fn correction_is_idempotent() {
        let mut a = act(ActType::Express, TargetRole::ThirdParty, "Emilia");
        assert!(apply_vocative(&mut a, "Emilia! Wait!"));
        assert!(!apply_vocative(&mut a, "Emilia! Wait!"));
        assert_eq!(a.target_role, TargetRole::Listener);
    }
}
