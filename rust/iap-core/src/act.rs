//! Act records, raw and normalized.
//!
//! [`RawAct`] and [`RawActSet`] are what an extractor returns and what a
//! cache stores: free-form strings, legacy key spellings, numbers that may
//! arrive as text. [`Act`] and [`ActSet`] are the normalized forms the
//! scorer reads. The only way from one to the other is `from_raw`, so
//! nothing downstream ever compares a raw label.

use serde::{Deserialize, Serialize};

use crate::error::IapError;
use crate::label::{classify_act, normalize_act_type};
use crate::role::normalize_target_role;
use crate::taxonomy::{ActType, AddressMode, TargetRole};
use crate::vocative::apply_vocative;

/// An intensity as found in extractor output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawIntensity {
    Number(f64),
    Text(String),
}

/// One act exactly as extracted. `target_type` and `target` are legacy
/// spellings of `target_role` and `target_entity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAct {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub act_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<RawIntensity>,
}

/// The act set of one utterance exactly as extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawActSet {
    #[serde(default)]
    pub primary_act: String,
    #[serde(default)]
    pub overall_force: String,
    #[serde(default = "default_address_mode")]
    pub address_mode: String,
    #[serde(default)]
    pub acts: Vec<RawAct>,
}

fn default_address_mode() -> String {
    AddressMode::Direct.as_str().to_string()
}

impl Default for RawActSet {
    fn default() -> Self {
        RawActSet {
            primary_act: String::new(),
            overall_force: String::new(),
            address_mode: default_address_mode(),
            acts: Vec::new(),
        }
    }
}

/// First non-empty value among a field and its legacy spelling.
fn first_present<'a>(primary: &'a Option<String>, legacy: &'a Option<String>) -> &'a str {
    [primary, legacy]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|value| !value.trim().is_empty())
        .unwrap_or("")
}

/// Clamp to `[0, 1]`; NaN becomes 0.
pub fn clip01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn parse_intensity(raw: Option<&RawIntensity>) -> Result<f64, IapError> {
    let value = match raw {
        None => 0.0,
        Some(RawIntensity::Number(value)) => *value,
        Some(RawIntensity::Text(text)) if text.trim().is_empty() => 0.0,
        Some(RawIntensity::Text(text)) => {
            text.trim()
                .parse::<f64>()
                .map_err(|_| IapError::InvalidField {
                    field: "intensity",
                    value: text.clone(),
                })?
        }
    };
    Ok(clip01(value))
}

/// A normalized act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub act_type: ActType,
    pub target_role: TargetRole,
    pub target_entity: String,
    pub force: String,
    pub intensity: f64,
}

impl Act {
    /// Build an act from already-canonical values. Intensity is clipped.
    pub fn new(
        act_type: ActType,
        target_role: TargetRole,
        target_entity: impl Into<String>,
        intensity: f64,
    ) -> Self {
        Act {
            act_type,
            target_role,
            target_entity: target_entity.into(),
            force: String::new(),
            intensity: clip01(intensity),
        }
    }

    pub fn with_force(mut self, force: impl Into<String>) -> Self {
        self.force = force.into();
        self
    }

    /// Normalize a raw act extracted from `utterance`.
    ///
    /// Fails only when the record has no `type` at all.
    pub fn from_raw(raw: &RawAct, utterance: &str) -> Result<Self, IapError> {
        let raw_type = raw
            .act_type
            .as_deref()
            .ok_or(IapError::MissingField { field: "type" })?;
        let force = raw.force.as_deref().unwrap_or("").trim().to_string();
        let target_entity = first_present(&raw.target_entity, &raw.target)
            .trim()
            .to_string();

        let mut act = Act {
            act_type: classify_act(raw_type, &force, &target_entity),
            target_role: normalize_target_role(first_present(&raw.target_role, &raw.target_type)),
            target_entity,
            force,
            intensity: parse_intensity(raw.intensity.as_ref())?,
        };
        apply_vocative(&mut act, utterance);
        Ok(act)
    }
}

/// The normalized act set of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActSet {
    pub primary_act: ActType,
    pub overall_force: String,
    pub address_mode: AddressMode,
    pub acts: Vec<Act>,
}

impl ActSet {
    pub fn new(primary_act: ActType, address_mode: AddressMode, acts: Vec<Act>) -> Self {
        ActSet {
            primary_act,
            overall_force: String::new(),
            address_mode,
            acts,
        }
    }

    /// Normalize every act of a raw set extracted from `utterance`.
    pub fn from_raw(raw: &RawActSet, utterance: &str) -> Result<Self, IapError> {
        let acts = raw
            .acts
            .iter()
            .map(|act| Act::from_raw(act, utterance))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ActSet {
            primary_act: normalize_act_type(&raw.primary_act),
            overall_force: raw.overall_force.trim().to_string(),
            address_mode: AddressMode::parse(&raw.address_mode),
            acts,
        })
    }
}
