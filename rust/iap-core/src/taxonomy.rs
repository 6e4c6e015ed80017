//! The fixed label sets every comparison is drawn from.
//!
//! Extractors produce free-form strings; nothing downstream of
//! normalization ever sees one. Act types, target roles and address modes
//! are closed enums here, so a comparison against an invented label is a
//! type error rather than a silent mismatch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The illocutionary act an utterance (or part of it) performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActType {
    /// Plain statement of fact. The generic catch-all.
    Assert,
    /// Preference plus selection: "it has to be you".
    AssertChoice,
    /// Shuts off alternatives or escape routes: "if it isn't you, I won't".
    CloseEscape,
    /// Emotion or desire: "I love you", "I want this".
    Express,
    /// Pressure or urging toward an action.
    Direct,
    /// Self-binding to a future course: "I will always...".
    Commit,
    /// Negation or rejection.
    Deny,
    /// Rejects the listener's premise: "No, that's not it".
    DenyAssumption,
    /// Conditional threat: "if you don't, I'll leave".
    Ultimatum,
    /// Polite ask.
    Request,
    /// Order.
    Command,
    /// Solemn promise.
    Vow,
    /// Fixes a relationship or state: "this is over".
    Declare,
}

impl ActType {
    /// Every act type, in declaration order.
    pub const ALL: [ActType; 13] = [
        ActType::Assert,
        ActType::AssertChoice,
        ActType::CloseEscape,
        ActType::Express,
        ActType::Direct,
        ActType::Commit,
        ActType::Deny,
        ActType::DenyAssumption,
        ActType::Ultimatum,
        ActType::Request,
        ActType::Command,
        ActType::Vow,
        ActType::Declare,
    ];

    /// The canonical upper-snake label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assert => "ASSERT",
            Self::AssertChoice => "ASSERT_CHOICE",
            Self::CloseEscape => "CLOSE_ESCAPE",
            Self::Express => "EXPRESS",
            Self::Direct => "DIRECT",
            Self::Commit => "COMMIT",
            Self::Deny => "DENY",
            Self::DenyAssumption => "DENY_ASSUMPTION",
            Self::Ultimatum => "ULTIMATUM",
            Self::Request => "REQUEST",
            Self::Command => "COMMAND",
            Self::Vow => "VOW",
            Self::Declare => "DECLARE",
        }
    }

    /// Exact lookup of a canonical label. No normalization is applied; use
    /// [`normalize_act_type`](crate::label::normalize_act_type) for raw input.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|act_type| act_type.as_str() == label)
    }

    /// Acts whose loss is a severe failure on its own: they restructure the
    /// exchange rather than describe it.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::CloseEscape | Self::Ultimatum | Self::Declare | Self::DenyAssumption | Self::Commit
        )
    }

    /// How much of the utterance's force this act carries, before
    /// intensity. Never above [`MAX_FORCE_WEIGHT`].
    pub fn force_weight(&self) -> f64 {
        let weight: f64 = match self {
            Self::Assert | Self::Express => 1.0,
            Self::Deny | Self::DenyAssumption | Self::Direct | Self::Request | Self::Command => 1.2,
            Self::AssertChoice => 1.3,
            Self::Commit | Self::Vow => 1.4,
            Self::CloseEscape => 1.5,
            Self::Declare => 1.6,
            Self::Ultimatum => 1.8,
        };
        weight.min(MAX_FORCE_WEIGHT)
    }

    /// How much getting this act's target right matters.
    pub fn target_weight(&self) -> f64 {
        match self {
            Self::CloseEscape | Self::Ultimatum => 2.0,
            Self::Direct | Self::Declare => 1.5,
            Self::Deny | Self::DenyAssumption => 1.3,
            Self::Commit | Self::Vow => 1.2,
            _ => 1.0,
        }
    }
}

/// Ceiling on [`ActType::force_weight`].
pub const MAX_FORCE_WEIGHT: f64 = 2.0;

impl fmt::Display for ActType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who or what an act is directed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetRole {
    /// The speaker.
    #[serde(rename = "SELF")]
    Speaker,
    /// The addressee, including anyone addressed by name.
    Listener,
    /// Someone mentioned but not addressed.
    ThirdParty,
    /// A state, result or condition.
    Situation,
    /// A claim, premise or assumption.
    Proposition,
    /// A value or ideal.
    Abstract,
}

impl TargetRole {
    /// Every role, in declaration order.
    pub const ALL: [TargetRole; 6] = [
        TargetRole::Speaker,
        TargetRole::Listener,
        TargetRole::ThirdParty,
        TargetRole::Situation,
        TargetRole::Proposition,
        TargetRole::Abstract,
    ];

    /// The canonical label, as extractors write it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speaker => "SELF",
            Self::Listener => "LISTENER",
            Self::ThirdParty => "THIRD_PARTY",
            Self::Situation => "SITUATION",
            Self::Proposition => "PROPOSITION",
            Self::Abstract => "ABSTRACT",
        }
    }

    /// Exact lookup of a canonical label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == label)
    }

    /// People: the speaker, the listener, or a third party.
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Speaker | Self::Listener | Self::ThirdParty)
    }

    /// Non-persons: situations, propositions and abstractions.
    pub fn is_abstract(&self) -> bool {
        !self.is_concrete()
    }
}

impl fmt::Display for TargetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an utterance as a whole addresses its audience.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    /// Second person, spoken to the listener.
    #[default]
    Direct,
    /// Third-person narration of the speaker's acts.
    Reported,
    /// Self-talk with no addressee.
    Monologue,
}

impl AddressMode {
    /// Parse an extractor's address mode. Anything unrecognized is `Direct`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "reported" => Self::Reported,
            "monologue" => Self::Monologue,
            _ => Self::Direct,
        }
    }

    /// The lowercase wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Reported => "reported",
            Self::Monologue => "monologue",
        }
    }
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
