//! Markdown reports and their timestamped persistence.

use crate::{error::Result, state::EssayState};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const FILE_STAMP: &str = "%Y%m%d_%H%M%S";
const HUMAN_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The first `max_chars` characters, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Writes reports as `<kind>_<YYYYmmdd_HHMMSS>.<ext>` under one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writer for a subdirectory of this one.
    pub fn child(&self, name: &str) -> Self {
        Self::new(self.dir.join(name))
    }

    pub fn path_for(&self, kind: &str, ext: &str, at: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", kind, at.format(FILE_STAMP), ext))
    }

    /// Write `contents`, creating the directory if needed.
    pub fn save_at(
        &self,
        kind: &str,
        ext: &str,
        at: DateTime<Local>,
        contents: &str,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(kind, ext, at);
        std::fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), "report saved");
        Ok(path)
    }

    /// Write a markdown report stamped with the current local time.
    pub fn save(&self, kind: &str, contents: &str) -> Result<PathBuf> {
        self.save_at(kind, "md", Local::now(), contents)
    }
}

/// One-shot essay.
pub fn essay_report(
    prompt: &str,
    style: &str,
    target_words: u32,
    essay: &str,
    secs: f64,
    at: DateTime<Local>,
) -> String {
    let mut out = String::from("# Generated College Essay\n\n");
    let _ = writeln!(out, "**Prompt:** {}\n", prompt);
    let _ = writeln!(out, "**Style:** {}", style);
    let _ = writeln!(out, "**Target Words:** {}", target_words);
    let _ = writeln!(out, "**Actual Words:** {}", word_count(essay));
    let _ = writeln!(out, "**Generated:** {}", at.format(HUMAN_STAMP));
    let _ = writeln!(out, "**Generation Time:** {:.2}s\n", secs);
    let _ = writeln!(out, "---\n\n{}", essay);
    out
}

/// Stand-alone critique, with the essay it judged.
pub fn critique_report(essay: &str, critique: &str, secs: f64, at: DateTime<Local>) -> String {
    let mut out = String::from("# Essay Critique\n\n");
    let _ = writeln!(out, "**Analyzed:** {}", at.format(HUMAN_STAMP));
    let _ = writeln!(out, "**Analysis Time:** {:.2}s", secs);
    let _ = writeln!(out, "**Essay Word Count:** {}\n", word_count(essay));
    let _ = writeln!(out, "---\n\n## ORIGINAL ESSAY\n\n{}\n", essay);
    let _ = writeln!(out, "---\n\n## CRITIQUE\n\n{}", critique);
    out
}

/// One strategy's output in a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub name: String,
    pub guidance: String,
    pub essay: String,
    pub secs: f64,
}

pub fn comparison_report(prompt: &str, runs: &[StrategyRun], at: DateTime<Local>) -> String {
    let mut out = String::from("# Strategy Comparison Results\n\n");
    let _ = writeln!(out, "**Prompt:** {}", prompt);
    let _ = writeln!(out, "**Date:** {}\n", at.format(HUMAN_STAMP));
    out.push_str("---\n\n");

    for run in runs {
        let _ = writeln!(out, "## {}\n", run.name);
        let _ = writeln!(
            out,
            "**Time:** {:.2}s | **Words:** {}\n",
            run.secs,
            word_count(&run.essay)
        );
        let _ = writeln!(out, "**System Prompt:**\n{}\n", run.guidance);
        let _ = writeln!(out, "**Generated Essay:**\n\n{}\n", run.essay);
        out.push_str("---\n\n");
    }
    out
}

pub fn improvement_report(
    source: &Path,
    essay: &str,
    improvements: &str,
    at: DateTime<Local>,
) -> String {
    let mut out = String::from("# Essay Improvement Report\n\n");
    let _ = writeln!(out, "**Original File:** {}", source.display());
    let _ = writeln!(out, "**Date:** {}\n", at.format(HUMAN_STAMP));
    let _ = writeln!(out, "---\n\n## ORIGINAL ESSAY\n\n{}\n", essay);
    let _ = writeln!(out, "---\n\n{}", improvements);
    out
}

/// Everything a pipeline run produced.
pub fn pipeline_report(state: &EssayState, at: DateTime<Local>) -> String {
    let mut out = String::from("# Multi-Agent Essay Generation Result\n\n");
    let _ = writeln!(out, "**Date:** {}", at.format(HUMAN_STAMP));
    let _ = writeln!(out, "**Prompt:** {}\n", state.prompt);
    if let Some(context) = &state.user_context {
        let _ = writeln!(out, "**Context:** {}\n", context);
    }
    out.push_str("---\n\n## Agent Timings\n\n");
    for (stage, secs) in &state.agent_times {
        let _ = writeln!(out, "- {}: {:.1}s", stage.label(), secs);
    }
    let _ = writeln!(out, "\nTotal: {:.1}s\n", state.total_time());

    let _ = writeln!(out, "---\n\n## Research Analysis\n\n{}\n", state.research_analysis);
    out.push_str("---\n\n## Brainstorm Ideas\n\n");
    for (i, idea) in state.brainstorm_ideas.iter().enumerate() {
        let _ = writeln!(out, "### Idea {}\n{}\n", i + 1, idea);
    }
    let _ = writeln!(out, "**Selected:** {}\n", state.selected_idea);
    let _ = writeln!(out, "---\n\n## Essay Outline\n\n{}\n", state.essay_outline);
    let _ = writeln!(out, "---\n\n## Final Essay\n\n{}\n", state.essay_draft);
    let _ = writeln!(out, "---\n\n## Critique\n\n{}\n", state.essay_critique);
    out
}
