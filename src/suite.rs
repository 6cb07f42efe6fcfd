//! Evaluation suite: the pipeline over five fixed Common App prompts.

use crate::{
    client::CompletionClient,
    error::Result,
    parser::extract_score,
    pipeline::EssayPipeline,
    report::{preview, word_count, ReportWriter},
    stage::Stage,
    state::EssayState,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Characters of the essay kept as its "opening".
pub const OPENING_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitePrompt {
    pub id: &'static str,
    pub category: &'static str,
    pub prompt: &'static str,
}

pub const SUITE_PROMPTS: [SuitePrompt; 5] = [
    SuitePrompt {
        id: "prompt1",
        category: "growth",
        prompt: "Discuss an accomplishment, event, or realization that sparked a period of personal growth and a new understanding of yourself or others.",
    },
    SuitePrompt {
        id: "prompt2",
        category: "challenge",
        prompt: "The lessons we take from obstacles we encounter can be fundamental to later success. Recount a time when you faced a challenge, setback, or failure. How did it affect you, and what did you learn from the experience?",
    },
    SuitePrompt {
        id: "prompt3",
        category: "belief",
        prompt: "Reflect on a time when you questioned or challenged a belief or idea. What prompted your thinking? What was the outcome?",
    },
    SuitePrompt {
        id: "prompt4",
        category: "gratitude",
        prompt: "Reflect on something that someone has done for you that has made you happy or thankful in a surprising way. How has this gratitude affected or motivated you?",
    },
    SuitePrompt {
        id: "prompt5",
        category: "passion",
        prompt: "Describe a topic, idea, or concept you find so engaging that it makes you lose all track of time. Why does it captivate you? What or who do you turn to when you want to learn more?",
    },
];

/// Metrics from one successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub id: String,
    pub category: String,
    pub prompt: String,
    pub word_count: usize,
    pub opening: String,
    pub score: Option<u32>,
    pub total_time: f64,
    pub agent_times: BTreeMap<Stage, f64>,
    pub full_essay: String,
    pub critique: String,
}

impl SuiteResult {
    pub fn from_state(prompt: &SuitePrompt, state: &EssayState) -> Self {
        Self {
            id: prompt.id.to_string(),
            category: prompt.category.to_string(),
            prompt: prompt.prompt.to_string(),
            word_count: word_count(&state.essay_draft),
            opening: preview(&state.essay_draft, OPENING_CHARS).to_string(),
            score: extract_score(&state.essay_critique),
            total_time: state.total_time(),
            agent_times: state.agent_times.clone(),
            full_essay: state.essay_draft.clone(),
            critique: state.essay_critique.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteFailure {
    pub id: String,
    pub category: String,
    pub error: String,
}

/// Outcome for one suite prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuiteEntry {
    Passed(SuiteResult),
    Failed(SuiteFailure),
}

impl SuiteEntry {
    pub fn category(&self) -> &str {
        match self {
            SuiteEntry::Passed(r) => &r.category,
            SuiteEntry::Failed(f) => &f.category,
        }
    }

    pub fn as_passed(&self) -> Option<&SuiteResult> {
        match self {
            SuiteEntry::Passed(r) => Some(r),
            SuiteEntry::Failed(_) => None,
        }
    }
}

/// Run the pipeline over each prompt in turn.
///
/// A failed run is recorded and the suite moves on. `on_start` is called
/// with the 1-based index before each prompt.
pub async fn run_suite<C, F>(
    pipeline: &EssayPipeline<C>,
    prompts: &[SuitePrompt],
    mut on_start: F,
) -> Vec<SuiteEntry>
where
    C: CompletionClient,
    F: FnMut(usize, &SuitePrompt),
{
    let mut entries = Vec::with_capacity(prompts.len());

    for (i, prompt) in prompts.iter().enumerate() {
        on_start(i + 1, prompt);
        let entry = match pipeline.run(prompt.prompt, None).await {
            Ok(state) => SuiteEntry::Passed(SuiteResult::from_state(prompt, &state)),
            Err(err) => {
                tracing::warn!(id = prompt.id, error = %err, "suite prompt failed");
                SuiteEntry::Failed(SuiteFailure {
                    id: prompt.id.to_string(),
                    category: prompt.category.to_string(),
                    error: err.to_string(),
                })
            }
        };
        entries.push(entry);
    }

    entries
}

/// Aggregate counts and averages.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub avg_words: Option<f64>,
    pub avg_time: Option<f64>,
}

pub fn summarize(entries: &[SuiteEntry]) -> SuiteSummary {
    let passed: Vec<&SuiteResult> = entries.iter().filter_map(SuiteEntry::as_passed).collect();
    let n = passed.len();
    let avg = |f: fn(&SuiteResult) -> f64| -> Option<f64> {
        if n == 0 {
            None
        } else {
            Some(passed.iter().map(|r| f(r)).sum::<f64>() / n as f64)
        }
    };

    SuiteSummary {
        passed: n,
        failed: entries.len() - n,
        avg_words: avg(|r| r.word_count as f64),
        avg_time: avg(|r| r.total_time),
    }
}

pub fn suite_report(entries: &[SuiteEntry], at: DateTime<Local>) -> String {
    let mut out = String::from("# Test Suite Results\n\n");
    let _ = writeln!(out, "**Date:** {}", at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "**Tests Run:** {}\n", entries.len());
    out.push_str("---\n\n");

    for (i, entry) in entries.iter().enumerate() {
        match entry {
            SuiteEntry::Failed(f) => {
                let _ = writeln!(out, "## Test {}: {} - FAILED\n", i + 1, f.category);
                let _ = writeln!(out, "**Error:** {}\n", f.error);
            }
            SuiteEntry::Passed(r) => {
                let score = r
                    .score
                    .map_or_else(|| "N/A".to_string(), |s| s.to_string());
                let _ = writeln!(out, "## Test {}: {}\n", i + 1, r.category);
                let _ = writeln!(out, "**Prompt:** {}\n", r.prompt);
                out.push_str("**Metrics:**\n");
                let _ = writeln!(out, "- Word count: {}", r.word_count);
                let _ = writeln!(out, "- Score: {}/10", score);
                let _ = writeln!(out, "- Total time: {:.1}s\n", r.total_time);
                let _ = writeln!(out, "**Opening:**\n> {}\n", r.opening);
                out.push_str("---\n\n");
                let _ = writeln!(out, "### Full Essay\n\n{}\n", r.full_essay);
                let _ = writeln!(out, "### Critique\n\n{}\n", r.critique);
                out.push_str("---\n\n");
            }
        }
    }
    out
}

/// Write `test_suite_<ts>.json` and `test_report_<ts>.md`.
pub fn save_suite(
    writer: &ReportWriter,
    entries: &[SuiteEntry],
    at: DateTime<Local>,
) -> Result<(PathBuf, PathBuf)> {
    let json = serde_json::to_string_pretty(entries)?;
    let summary = writer.save_at("test_suite", "json", at, &json)?;
    let report = writer.save_at("test_report", "md", at, &suite_report(entries, at))?;
    Ok((summary, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed(words: usize, secs: f64) -> SuiteEntry {
        SuiteEntry::Passed(SuiteResult {
            id: "p".to_string(),
            category: "growth".to_string(),
            prompt: "prompt".to_string(),
            word_count: words,
            opening: "opening".to_string(),
            score: Some(7),
            total_time: secs,
            agent_times: BTreeMap::new(),
            full_essay: "essay".to_string(),
            critique: "critique".to_string(),
        })
    }

    fn failed() -> SuiteEntry {
        SuiteEntry::Failed(SuiteFailure {
            id: "q".to_string(),
            category: "belief".to_string(),
            error: "Ollama request timed out (180s). Is the model loaded?".to_string(),
        })
    }

    #[test]
    fn test_summary_counts_and_averages() {
        let summary = summarize(&[passed(600, 80.0), failed(), passed(700, 100.0)]);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.avg_words, Some(650.0));
        assert_eq!(summary.avg_time, Some(90.0));
    }

    #[test]
    fn test_summary_all_failed() {
        let summary = summarize(&[failed()]);
        assert_eq!(summary.passed, 0);
        assert!(summary.avg_words.is_none());
    }

    #[test]
    fn test_entries_round_trip_untagged() {
        let entries = vec![passed(650, 90.0), failed()];
        let json = serde_json::to_string(&entries).unwrap();
        let back: Vec<SuiteEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_report_marks_failures() {
        let at = Local::now();
        let report = suite_report(&[failed()], at);
        assert!(report.contains("## Test 1: belief - FAILED"));
        assert!(report.contains("timed out"));
    }

    #[test]
    fn test_prompt_ids_unique() {
        let mut ids: Vec<_> = SUITE_PROMPTS.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
