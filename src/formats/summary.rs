// JSON summary of a patch, for librarians and scripts

use crate::core::effects::Effect;
use crate::core::schema::{FieldId, FieldKind};
use crate::patch::{FieldValue, Gp8Patch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decoded value of one sound parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Integer(u8),
    Boolean(bool),
    Bytes(Vec<u8>),
}

/// Human readable view of a patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSummary {
    /// "TEMP" or "group-bank-program"
    pub address: String,

    /// Name with trailing padding removed
    pub name: String,

    /// Effect on/off switches, keyed by effect name
    #[serde(default)]
    pub effects: BTreeMap<String, bool>,

    /// Sound parameters keyed by field id
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl PatchSummary {
    /// Summarize a patch. Framing, address, effect bytes, name and checksum
    /// are covered elsewhere and not listed as parameters.
    pub fn from_patch(patch: &Gp8Patch) -> Self {
        let effects = patch
            .effects()
            .into_iter()
            .map(|(effect, on)| (effect.label().to_string(), on))
            .collect();

        let parameters = FieldId::ALL
            .iter()
            .filter(|f| is_sound_parameter(**f))
            .filter_map(|&field| {
                let value = match patch.get(field) {
                    FieldValue::Integer(v) => ParameterValue::Integer(v),
                    FieldValue::Boolean(v) => ParameterValue::Boolean(v),
                    FieldValue::Bytes(v) => ParameterValue::Bytes(v),
                    FieldValue::Text(_) => return None,
                };
                Some((field.id().to_string(), value))
            })
            .collect();

        Self {
            address: patch.address().to_string(),
            name: patch.name().trim_end().to_string(),
            effects,
            parameters,
        }
    }

    /// Effects switched on, in panel order
    pub fn enabled_effects(&self) -> Vec<Effect> {
        Effect::ALL
            .iter()
            .copied()
            .filter(|e| self.effects.get(e.label()).copied().unwrap_or(false))
            .collect()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&Gp8Patch> for PatchSummary {
    fn from(patch: &Gp8Patch) -> Self {
        Self::from_patch(patch)
    }
}

fn is_sound_parameter(field: FieldId) -> bool {
    let desc = field.descriptor();
    matches!(
        desc.category,
        "Filter"
            | "Compressor"
            | "Overdrive"
            | "Distortion"
            | "Phaser"
            | "Equalizer"
            | "Delay"
            | "Chorus"
            | "Master"
    ) && desc.kind != FieldKind::AsciiString
}
