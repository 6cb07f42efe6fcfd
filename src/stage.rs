use crate::config::SamplingParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the essay pipeline.
///
/// Variants are declared in execution order, so `Ord` follows the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Research,
    Brainstorm,
    Outline,
    Draft,
    Critique,
}

impl Stage {
    /// Every stage, in the order the pipeline runs them.
    pub const ALL: [Stage; 5] = [
        Stage::Research,
        Stage::Brainstorm,
        Stage::Outline,
        Stage::Draft,
        Stage::Critique,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Research => "research",
            Stage::Brainstorm => "brainstorm",
            Stage::Outline => "outline",
            Stage::Draft => "draft",
            Stage::Critique => "critique",
        }
    }

    /// Capitalized name for console output.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Research => "Research",
            Stage::Brainstorm => "Brainstorm",
            Stage::Outline => "Outline",
            Stage::Draft => "Draft",
            Stage::Critique => "Critique",
        }
    }

    /// Temperature and token budget used for this stage's completion call.
    pub fn sampling(self) -> SamplingParams {
        match self {
            Stage::Research => SamplingParams::new(0.5, 1500),
            Stage::Brainstorm => SamplingParams::new(0.85, 2000),
            Stage::Outline => SamplingParams::new(0.6, 1500),
            Stage::Draft => SamplingParams::new(0.75, 2500),
            Stage::Critique => SamplingParams::new(0.4, 2000),
        }
    }

    /// The stage after this one, or `None` after Critique.
    pub fn next(self) -> Option<Stage> {
        let idx = Stage::ALL.iter().position(|s| *s == self)?;
        Stage::ALL.get(idx + 1).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
