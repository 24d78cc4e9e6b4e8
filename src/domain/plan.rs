//! Typed workout plan records.
//!
//! Plans are produced by the external generator (or sent pre-generated by a
//! client) and are opaque to the session core except for two things: the
//! optional `timer` the plan carries, and each part's `duration_min`, which
//! drives the countdown auto-configuration. Everything else rides along in
//! the free-form `detail` map and is rendered by the clients.

use serde::{Deserialize, Serialize};

use super::session::TimerConfig;

/// A workout plan: a focus line, an optional timer preset, and an ordered
/// sequence of parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    #[serde(default)]
    pub focus: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerConfig>,
    #[serde(default)]
    pub parts: Vec<PlanPart>,
}

impl WorkoutPlan {
    /// Shape check for plan payloads arriving as raw JSON. Anything that is
    /// not plan-shaped is rejected so the caller can substitute a
    /// placeholder.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Common body of a plan part: the one field the core interprets plus
/// whatever free-form detail the generator produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartBody {
    /// Generators sometimes emit fractional minutes; truncated on the way
    /// in, the countdown works in whole minutes.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "whole_minutes"
    )]
    pub duration_min: Option<u32>,
    #[serde(flatten)]
    pub detail: serde_json::Map<String, serde_json::Value>,
}

fn whole_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    // Saturating cast: negative and non-finite values collapse to 0,
    // which `set_active_part` treats as "no duration"
    Ok(raw.map(|minutes| minutes as u32))
}

/// One part of a workout plan, tagged by its `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PlanPart {
    Warmup(PartBody),
    Strength(PartBody),
    Wod(PartBody),
    Error(PartBody),
}

impl PlanPart {
    pub fn body(&self) -> &PartBody {
        match self {
            PlanPart::Warmup(body)
            | PlanPart::Strength(body)
            | PlanPart::Wod(body)
            | PlanPart::Error(body) => body,
        }
    }

    /// The part duration in minutes, if the generator supplied one.
    pub fn duration_min(&self) -> Option<u32> {
        self.body().duration_min
    }
}

/// Minimal plan substituted when generation fails or a payload is not
/// plan-shaped, so the session stays usable.
pub fn placeholder_plan(message: &str) -> WorkoutPlan {
    let mut detail = serde_json::Map::new();
    detail.insert(
        "message".to_string(),
        serde_json::Value::String(message.to_string()),
    );
    WorkoutPlan {
        focus: "Error".to_string(),
        timer: None,
        parts: vec![PlanPart::Error(PartBody {
            duration_min: None,
            detail,
        })],
    }
}
