//! The record threaded through the pipeline and the partial updates stages return.
//!
//! Stages never touch [`EssayState`] directly. Each returns a [`StateUpdate`]
//! whose [`StageOutput`] variant carries exactly the fields that stage may
//! write, and the orchestrator folds it in with [`EssayState::merge`].

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which stage runs next, or that the run has finished. Bookkeeping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pending(Stage),
    Complete,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Pending(stage) => f.write_str(stage.name()),
            AgentStatus::Complete => f.write_str("complete"),
        }
    }
}

/// One observability note per completed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub stage: Stage,
    pub content: String,
}

/// Accumulated pipeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayState {
    pub prompt: String,

    /// Optional background about the student. Carried through, not yet read by any stage.
    pub user_context: Option<String>,

    pub research_analysis: String,
    pub brainstorm_ideas: Vec<String>,
    pub selected_idea: String,
    pub essay_outline: String,
    pub essay_draft: String,
    pub essay_critique: String,

    pub current_agent: AgentStatus,

    /// Seconds spent per completed stage, iterated in pipeline order.
    pub agent_times: BTreeMap<Stage, f64>,

    /// Completion notes, in completion order.
    pub messages: Vec<AgentMessage>,
}

impl EssayState {
    /// Fresh state: every output empty, Research pending.
    pub fn new(prompt: impl Into<String>, user_context: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            user_context,
            research_analysis: String::new(),
            brainstorm_ideas: Vec::new(),
            selected_idea: String::new(),
            essay_outline: String::new(),
            essay_draft: String::new(),
            essay_critique: String::new(),
            current_agent: AgentStatus::Pending(Stage::Research),
            agent_times: BTreeMap::new(),
            messages: Vec::new(),
        }
    }

    /// Fold a stage's update into a new state value.
    ///
    /// Only the fields named by the update's [`StageOutput`] change;
    /// `agent_times` and `messages` only grow.
    pub fn merge(mut self, update: StateUpdate) -> Self {
        let stage = update.output.stage();

        match update.output {
            StageOutput::Research { analysis } => self.research_analysis = analysis,
            StageOutput::Brainstorm { ideas, selected } => {
                self.brainstorm_ideas = ideas;
                self.selected_idea = selected;
            }
            StageOutput::Outline { outline } => self.essay_outline = outline,
            StageOutput::Draft { draft } => self.essay_draft = draft,
            StageOutput::Critique { critique } => self.essay_critique = critique,
        }

        self.current_agent = match stage.next() {
            Some(next) => AgentStatus::Pending(next),
            None => AgentStatus::Complete,
        };
        self.agent_times.insert(stage, update.elapsed_secs);
        self.messages.push(AgentMessage {
            stage,
            content: update.message,
        });
        self
    }

    /// Sum of all recorded stage times, in seconds.
    pub fn total_time(&self) -> f64 {
        self.agent_times.values().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.current_agent == AgentStatus::Complete
    }
}

/// The fields a single stage produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    Research { analysis: String },
    Brainstorm { ideas: Vec<String>, selected: String },
    Outline { outline: String },
    Draft { draft: String },
    Critique { critique: String },
}

impl StageOutput {
    pub fn stage(&self) -> Stage {
        match self {
            StageOutput::Research { .. } => Stage::Research,
            StageOutput::Brainstorm { .. } => Stage::Brainstorm,
            StageOutput::Outline { .. } => Stage::Outline,
            StageOutput::Draft { .. } => Stage::Draft,
            StageOutput::Critique { .. } => Stage::Critique,
        }
    }
}

/// Partial update returned by a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub output: StageOutput,
    pub elapsed_secs: f64,
    pub message: String,
}
