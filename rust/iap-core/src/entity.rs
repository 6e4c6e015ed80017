//! Cross-script entity identity.
//!
//! Two mentions of the same referent ("Subaru-kun", "スバル", "Subaru")
//! should compare as equal without any dictionary. Canonicalization strips
//! honorifics and punctuation, transliterates kana, then folds the
//! remaining Latin text (`l`→`r`, runs collapsed) so that romanization
//! choices stop mattering.

use crate::kana::{is_kana, to_romaji};

/// Honorific suffixes removed before comparison. Matched case-insensitively.
pub const HONORIFICS: &[&str] = &[
    "くん", "さん", "ちゃん", "先輩", "先生", "様", "-kun", "-san", "-chan", "-senpai",
    "-sensei", "-sama",
];

const VOWELS: &[char] = &['a', 'i', 'u', 'e', 'o'];

/// Keyword families treated as the same generic referent.
const EQUIVALENT_REFERENTS: &[&[&str]] = &[
    &["listener", "addressee", "you", "hearer", "anata"],
    &["speaker", "self", "myself", "i", "watashi", "boku", "ore"],
    &["alternatives", "others", "anyone", "other", "else", "hoka", "betsu"],
    &["everyone", "all", "minna", "mina"],
];

pub const SCORE_EMPTY: f64 = 0.5;
pub const SCORE_EXACT: f64 = 1.0;
pub const SCORE_STEM: f64 = 0.95;
pub const SCORE_CONTAINS: f64 = 0.90;
pub const SCORE_STEM_CONTAINS: f64 = 0.88;
pub const SCORE_PREFIX: f64 = 0.85;
pub const SCORE_SHARED_RUN: f64 = 0.80;
pub const SCORE_EQUIVALENT: f64 = 0.75;
pub const SCORE_UNRELATED: f64 = 0.30;

fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Lowercase, drop honorifics, and keep only word and CJK characters.
/// Kana is left untransliterated.
pub fn normalize_entity(entity: &str) -> String {
    let mut normalized = entity.trim().to_lowercase();
    for honorific in HONORIFICS {
        normalized = normalized.replace(honorific, "");
    }
    normalized
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || is_kana(*c) || is_han(*c))
        .collect()
}

/// The comparison form of an entity: ASCII lowercase alphanumerics only,
/// with kana romanized, `l` folded onto `r` and repeated letters collapsed.
pub fn canonicalize_entity(entity: &str) -> String {
    let mut canonical = normalize_entity(entity);
    if canonical.chars().any(is_kana) {
        canonical = to_romaji(&canonical);
    }

    let mut out = String::with_capacity(canonical.len());
    for c in canonical.to_lowercase().chars() {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit()) {
            continue;
        }
        let c = if c == 'l' { 'r' } else { c };
        if out.ends_with(c) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Drop trailing vowels, so that `remu` and `rem` share a stem.
pub fn strip_trailing_vowels(s: &str) -> &str {
    s.trim_end_matches(VOWELS)
}

fn either_contains(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn shares_run_of_three(a: &str, b: &str) -> bool {
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    // Canonical forms are ASCII, so byte windows are char windows.
    longer
        .as_bytes()
        .windows(3)
        .filter_map(|window| std::str::from_utf8(window).ok())
        .any(|window| shorter.contains(window))
}

fn in_family(family: &[&str], canonical: &str) -> bool {
    family.iter().any(|keyword| {
        let keyword = canonicalize_entity(keyword);
        canonical == keyword || (keyword.len() >= 3 && canonical.contains(&keyword))
    })
}

/// Whether some referent family covers both canonical mentions. A mention
/// may belong to several families.
fn share_referent_family(a: &str, b: &str) -> bool {
    EQUIVALENT_REFERENTS
        .iter()
        .any(|family| in_family(family, a) && in_family(family, b))
}

/// Similarity of two entity mentions in `[0, 1]`. The first rule that
/// applies wins; later rules always score lower than earlier ones.
pub fn entity_similarity(original: &str, translated: &str) -> f64 {
    let a = canonicalize_entity(original);
    let b = canonicalize_entity(translated);

    if a.is_empty() || b.is_empty() {
        return SCORE_EMPTY;
    }
    if a == b {
        return SCORE_EXACT;
    }

    let a_stem = strip_trailing_vowels(&a);
    let b_stem = strip_trailing_vowels(&b);
    let stems = !a_stem.is_empty() && !b_stem.is_empty();
    if stems && a_stem == b_stem {
        return SCORE_STEM;
    }
    if either_contains(&a, &b) {
        return SCORE_CONTAINS;
    }
    if stems && either_contains(a_stem, b_stem) {
        return SCORE_STEM_CONTAINS;
    }
    if a.len() >= 3 && b.len() >= 3 && a[..3] == b[..3] {
        return SCORE_PREFIX;
    }
    if a.len() > 6 && b.len() > 6 && shares_run_of_three(&a, &b) {
        return SCORE_SHARED_RUN;
    }

    if share_referent_family(&a, &b) {
        return SCORE_EQUIVALENT;
    }

    SCORE_UNRELATED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honorifics_and_punctuation_are_removed() {
        assert_eq!(normalize_entity("  Subaru-kun! "), "subaru");
        assert_eq!(normalize_entity("レムさん"), "レム");
        assert_eq!(normalize_entity("先生"), "");
    }

    #[test]
    fn canonical_form_is_script_independent() {
        assert_eq!(canonicalize_entity("スバル"), "subaru");
        assert_eq!(canonicalize_entity("Subaru-kun"), "subaru");
        assert_eq!(canonicalize_entity("Luffy"), "rufy");
        assert_eq!(canonicalize_entity("ルフィ"), "rufi");
    }

    #[test]
    fn trailing_vowels_strip_to_a_stem() {
        assert_eq!(strip_trailing_vowels("remu"), "rem");
        assert_eq!(strip_trailing_vowels("aio"), "");
    }

    #[test]
    fn empty_side_is_neutral() {
        assert_eq!(entity_similarity("", "Subaru"), SCORE_EMPTY);
        assert_eq!(entity_similarity("!!", ""), SCORE_EMPTY);
    }

    #[test]
    fn cascade_levels() {
        assert_eq!(entity_similarity("スバルくん", "Subaru"), SCORE_EXACT);
        assert_eq!(entity_similarity("レム", "Rem"), SCORE_STEM);
        assert_eq!(entity_similarity("Subaru", "Subaru Natsuki"), SCORE_CONTAINS);
        assert_eq!(entity_similarity("Emilia", "Emi"), SCORE_CONTAINS);
        assert_eq!(entity_similarity("ベアトリス", "Beatrice"), SCORE_PREFIX);
        assert_eq!(
            entity_similarity("anyone but natsuki", "other than natsuki"),
            SCORE_SHARED_RUN
        );
        assert_eq!(entity_similarity("you", "the listener"), SCORE_EQUIVALENT);
        assert_eq!(entity_similarity("Rem", "Emilia"), SCORE_UNRELATED);
    }

    #[test]
    fn stem_containment_sits_between_containment_and_prefix() {
        // Stems "kag" and "kagam"; the raw forms do not contain each other.
        assert_eq!(entity_similarity("kago", "kagami"), SCORE_STEM_CONTAINS);
    }

    #[test]
    fn single_letter_keywords_need_an_exact_match() {
        assert_eq!(entity_similarity("I", "boku"), SCORE_EQUIVALENT);
        assert_eq!(entity_similarity("Rin", "boku"), SCORE_UNRELATED);
    }

    #[test]
    fn any_shared_family_counts_not_only_the_first() {
        // "you or anyone" belongs to the listener and the alternatives
        // families; "the others" only to the alternatives family.
        assert_eq!(entity_similarity("you or anyone", "the others"), SCORE_EQUIVALENT);
        assert_eq!(entity_similarity("the others", "you or anyone"), SCORE_EQUIVALENT);
        assert_eq!(entity_similarity("you or anyone", "minna"), SCORE_UNRELATED);
    }
}
