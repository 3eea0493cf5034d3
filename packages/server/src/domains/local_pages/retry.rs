//! Retry-with-escalation policy for content generation.
//!
//! Two states: a first `Normal` attempt and at most one `Strict` attempt.
//! Only the structural quality flags in [`RETRY_TRIGGERS`] escalate; anything
//! else (e.g. `prohibited_claims`) is kept and surfaces at publish time.

use serde::Serialize;

use super::types::SafetyFlag;

pub const RETRY_TRIGGERS: [SafetyFlag; 4] = [
    SafetyFlag::LowWordCount,
    SafetyFlag::InsufficientFaq,
    SafetyFlag::InsufficientSections,
    SafetyFlag::LowCityMentions,
];

const TOP_P: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Normal,
    Strict,
}

impl GenerationMode {
    /// Mode for the next attempt, or `None` when the last attempt is final.
    pub fn next(self, flags: &[SafetyFlag]) -> Option<GenerationMode> {
        match self {
            Self::Normal if triggers_retry(flags) => Some(Self::Strict),
            Self::Normal | Self::Strict => None,
        }
    }

    /// Lower temperature in strict mode: less creative, more rule-following.
    pub fn temperature(self) -> f32 {
        match self {
            Self::Normal => 0.8,
            Self::Strict => 0.6,
        }
    }

    pub fn top_p(self) -> f32 {
        TOP_P
    }
}

pub fn triggers_retry(flags: &[SafetyFlag]) -> bool {
    flags.iter().any(|flag| RETRY_TRIGGERS.contains(flag))
}
