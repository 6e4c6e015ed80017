//! Ordered keyword rules.
//!
//! Label, role and promotion normalization are all the same shape: an
//! ordered list of `(cues, result)` rules where the first rule with a cue
//! present in the text wins. Keeping the rules as data means each one can
//! be inspected and tested on its own.

/// One rule of a cascade. Matches when any cue is a substring of the text,
/// unless one of the `unless` cues is also present.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub cues: &'static [&'static str],
    pub unless: &'static [&'static str],
    pub result: T,
}

impl<T: Copy> KeywordRule<T> {
    pub const fn new(cues: &'static [&'static str], result: T) -> Self {
        KeywordRule {
            cues,
            unless: &[],
            result,
        }
    }

    pub const fn unless(self, unless: &'static [&'static str]) -> Self {
        KeywordRule {
            cues: self.cues,
            unless,
            result: self.result,
        }
    }

    /// `text` is expected to be lowercased already.
    pub fn matches(&self, text: &str) -> bool {
        self.cues.iter().any(|cue| text.contains(cue))
            && !self.unless.iter().any(|cue| text.contains(cue))
    }
}

/// Evaluate `rules` in order and return the first match.
pub fn first_match<T: Copy>(rules: &[KeywordRule<T>], text: &str) -> Option<T> {
    rules
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.result)
}

/// Uppercase, trim, and fold spaces and hyphens to underscores.
pub(crate) fn fold_label(raw: &str) -> String {
    raw.trim().to_uppercase().replace([' ', '-'], "_")
}
