//! Weakness analysis over a saved suite run.
//!
//! Looks for recurring patterns across the essays and critiques of one
//! `test_suite_*.json` file: generic openings, concrete clock-time
//! openings, score and length spread, and which critique themes come up.

use crate::{
    error::{PipelineError, Result},
    suite::{SuiteEntry, SuiteResult},
};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const SUITE_PREFIX: &str = "test_suite_";

/// Openings containing any of these read as boilerplate.
pub const GENERIC_PHRASES: [&str; 8] = [
    "as i reflect",
    "ever since i was",
    "i have always",
    "growing up",
    "throughout my life",
    "from a young age",
    "as a computer science",
    "i've always thought",
];

/// Critique themes and the words that signal them.
pub const KEYWORD_CATEGORIES: [(&str, &[&str]); 6] = [
    ("generic", &["generic", "vague", "abstract", "broad"]),
    ("voice", &["authentic", "voice", "natural", "conversational"]),
    ("details", &["specific", "concrete", "detail", "vivid"]),
    ("showing", &["show", "tell", "demonstrate"]),
    ("structure", &["structure", "flow", "transition", "pacing"]),
    ("cliche", &["cliché", "clichéd", "familiar trope", "overly familiar"]),
];

pub const CRITIQUE_PHRASES: [&str; 7] = [
    "generic statements",
    "lacks depth",
    "overly familiar",
    "could be more specific",
    "voice feels generic",
    "lacks originality",
    "not distinctive",
];

/// The target band for word counts.
pub const WORD_TARGET: std::ops::RangeInclusive<usize> = 600..=700;

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("valid clock time regex"));

/// Mean and range of a set of numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Spread {
    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            count: values.len(),
            mean: values.iter().sum::<f64>() / values.len() as f64,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaknessAnalysis {
    /// Entries in the file, failures included.
    pub total: usize,
    pub generic_openings: Vec<String>,
    pub timed_openings: Vec<String>,
    pub scores: Option<Spread>,
    pub words: Option<Spread>,
    /// How many word counts fall inside [`WORD_TARGET`].
    pub on_target: usize,
    /// Non-zero mention counts per keyword category.
    pub keyword_mentions: Vec<(&'static str, usize)>,
    /// Non-zero counts per critique phrase.
    pub phrase_mentions: Vec<(&'static str, usize)>,
}

pub fn analyze(entries: &[SuiteEntry]) -> WeaknessAnalysis {
    let passed: Vec<&SuiteResult> = entries.iter().filter_map(SuiteEntry::as_passed).collect();

    let mut generic_openings = Vec::new();
    let mut timed_openings = Vec::new();
    for result in &passed {
        let opening = result.opening.to_lowercase();
        if GENERIC_PHRASES.iter().any(|p| opening.contains(p)) {
            generic_openings.push(result.opening.clone());
        }
        if CLOCK_TIME.is_match(&opening) {
            timed_openings.push(result.opening.clone());
        }
    }

    let critiques = passed
        .iter()
        .map(|r| r.critique.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let keyword_mentions = KEYWORD_CATEGORIES
        .iter()
        .map(|(category, words)| {
            let count = words.iter().map(|w| critiques.matches(w).count()).sum();
            (*category, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    let phrase_mentions = CRITIQUE_PHRASES
        .iter()
        .map(|phrase| (*phrase, critiques.matches(phrase).count()))
        .filter(|(_, count)| *count > 0)
        .collect();

    WeaknessAnalysis {
        total: entries.len(),
        generic_openings,
        timed_openings,
        scores: Spread::of(passed.iter().filter_map(|r| r.score).map(f64::from)),
        words: Spread::of(passed.iter().map(|r| r.word_count as f64)),
        on_target: passed
            .iter()
            .filter(|r| WORD_TARGET.contains(&r.word_count))
            .count(),
        keyword_mentions,
        phrase_mentions,
    }
}

/// The most recently modified `test_suite_*.json` in `dir`.
pub fn latest_suite_file(dir: &Path) -> Result<PathBuf> {
    let not_found = || PipelineError::NoSuiteResults {
        dir: dir.to_path_buf(),
    };
    if !dir.is_dir() {
        return Err(not_found());
    }

    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_suite = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SUITE_PREFIX) && n.ends_with(".json"));
        if !is_suite {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, path));
        }
    }

    latest.map(|(_, path)| path).ok_or_else(not_found)
}

pub fn load_entries(path: &Path) -> Result<Vec<SuiteEntry>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// `weakness_analysis_<stamp>.md` beside a `test_suite_<stamp>.json`.
pub fn analysis_path(suite_file: &Path) -> PathBuf {
    let stem = suite_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stamp = stem.strip_prefix(SUITE_PREFIX).unwrap_or(stem);
    suite_file.with_file_name(format!("weakness_analysis_{}.md", stamp))
}

pub fn render(analysis: &WeaknessAnalysis, source: &Path, at: DateTime<Local>) -> String {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = String::from("# Weakness Analysis\n\n");
    let _ = writeln!(out, "**Based on:** {}", name);
    let _ = writeln!(out, "**Essays analyzed:** {}", analysis.total);
    let _ = writeln!(out, "**Date:** {}\n", at.format("%Y-%m-%d %H:%M:%S"));

    out.push_str("## Summary Statistics\n\n");
    match analysis.words {
        Some(words) => {
            let _ = writeln!(out, "- Average word count: {:.0}", words.mean);
            let _ = writeln!(out, "- Word count range: {:.0}-{:.0}", words.min, words.max);
            let _ = writeln!(
                out,
                "- Within {}-{} words: {}/{}",
                WORD_TARGET.start(),
                WORD_TARGET.end(),
                analysis.on_target,
                words.count
            );
        }
        None => out.push_str("- Word counts: none recorded\n"),
    }
    match analysis.scores {
        Some(scores) => {
            let _ = writeln!(out, "- Average quality score: {:.1}/10", scores.mean);
            let _ = writeln!(out, "- Score range: {:.1}-{:.1}/10", scores.min, scores.max);
        }
        None => out.push_str("- Scores: Not consistently extracted\n"),
    }
    let _ = writeln!(
        out,
        "- Essays with specific time details: {}/{}",
        analysis.timed_openings.len(),
        analysis.total
    );
    let _ = writeln!(
        out,
        "- Essays with generic phrases: {}/{}\n",
        analysis.generic_openings.len(),
        analysis.total
    );

    if !analysis.generic_openings.is_empty() {
        out.push_str("## Generic Openings\n\n");
        for opening in &analysis.generic_openings {
            let _ = writeln!(out, "> {}\n", opening);
        }
    }

    out.push_str("## Critique Themes\n\n");
    if analysis.keyword_mentions.is_empty() {
        out.push_str("- none\n");
    }
    for (category, count) in &analysis.keyword_mentions {
        let _ = writeln!(out, "- {}: mentioned {} times", category, count);
    }

    out.push_str("\n## Recurring Critique Points\n\n");
    if analysis.phrase_mentions.is_empty() {
        out.push_str("- none\n");
    }
    for (phrase, count) in &analysis.phrase_mentions {
        let _ = writeln!(out, "- '{}': {} mentions", phrase, count);
    }
    out
}
