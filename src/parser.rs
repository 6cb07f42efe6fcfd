//! Best-effort extraction from free-text model output.
//!
//! Nothing here fails. Missing structure is an expected outcome of
//! free-text generation, so every function degrades to a fallback:
//! 1. `## IDEA <n>:` section markers → one block per marker
//! 2. No markers → the whole text is a single idea
//! 3. Selection: `## RECOMMENDATION` / `**Best Idea:**` line, else the
//!    first block, else the raw text

use once_cell::sync::Lazy;
use regex::Regex;

static IDEA_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"## IDEA \d+:").expect("valid idea marker regex"));

static RECOMMENDATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)## RECOMMENDATION\s+\*\*Best Idea:\*\*\s+(.*?)(?:\n|$)")
        .expect("valid recommendation regex")
});

static SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SCORE[:\s]+(\d+)/10").expect("valid score regex"));

const RECOMMENDATION_HEADER: &str = "## RECOMMENDATION";

/// Outcome of splitting brainstorm output into ideas.
#[derive(Debug, Clone, PartialEq)]
pub enum IdeaParse {
    /// One entry per `## IDEA <n>:` block, marker line included.
    Structured(Vec<String>),
    /// No markers were found; the raw output, untouched.
    Unstructured(String),
}

impl IdeaParse {
    /// The ideas as a list. Unstructured output is a single idea.
    pub fn into_ideas(self) -> Vec<String> {
        match self {
            IdeaParse::Structured(ideas) => ideas,
            IdeaParse::Unstructured(text) => vec![text],
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, IdeaParse::Structured(_))
    }
}

/// Where the selected idea came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Recommendation,
    FirstIdea,
    RawText,
}

/// Parsed ideas plus the one the next stage should develop.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaSelection {
    pub ideas: Vec<String>,
    pub selected: String,
    pub source: SelectionSource,
}

/// Split brainstorm output on `## IDEA <n>:` markers.
///
/// Each block runs from its marker to the next marker, the recommendation
/// header, or the end of the text, whichever comes first.
pub fn parse_ideas(text: &str) -> IdeaParse {
    let markers: Vec<_> = IDEA_MARKER.find_iter(text).collect();
    if markers.is_empty() {
        return IdeaParse::Unstructured(text.to_string());
    }

    let ideas = markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let body_start = marker.end();
            let next_marker = markers.get(i + 1).map_or(text.len(), |m| m.start());
            let recommendation = text[body_start..]
                .find(RECOMMENDATION_HEADER)
                .map_or(text.len(), |offset| body_start + offset);
            let end = next_marker.min(recommendation);
            text[marker.start()..end].trim_end().to_string()
        })
        .collect();

    IdeaParse::Structured(ideas)
}

/// The line after `**Best Idea:**` in a `## RECOMMENDATION` section, trimmed.
///
/// Returns `None` if the section is absent or the line is blank.
pub fn extract_recommendation(text: &str) -> Option<String> {
    let captures = RECOMMENDATION.captures(text)?;
    let picked = captures.get(1)?.as_str().trim();
    if picked.is_empty() {
        None
    } else {
        Some(picked.to_string())
    }
}

/// Parse ideas and pick one: recommendation, then first block, then raw text.
pub fn select_idea(text: &str) -> IdeaSelection {
    let parsed = parse_ideas(text);
    let structured = parsed.is_structured();
    let ideas = parsed.into_ideas();

    if let Some(recommended) = extract_recommendation(text) {
        return IdeaSelection {
            ideas,
            selected: recommended,
            source: SelectionSource::Recommendation,
        };
    }

    match ideas.first() {
        Some(first) if structured => IdeaSelection {
            selected: first.clone(),
            ideas,
            source: SelectionSource::FirstIdea,
        },
        _ => IdeaSelection {
            ideas,
            selected: text.to_string(),
            source: SelectionSource::RawText,
        },
    }
}

/// First `SCORE: N/10` figure in a critique, case-insensitive.
pub fn extract_score(critique: &str) -> Option<u32> {
    SCORE
        .captures(critique)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_ideas() -> String {
        let mut text = String::from("Here are your ideas.\n\n");
        for n in 1..=5 {
            text.push_str(&format!(
                "## IDEA {n}: Title {n}\n**Core Story:** Story {n}\n**Originality Score:** {n}\n\n"
            ));
        }
        text.push_str("## RECOMMENDATION\n**Best Idea:** Idea 3 because it is specific.\nIt also has a clear arc.\n");
        text
    }

    #[test]
    fn test_five_structured_ideas() {
        let parsed = parse_ideas(&five_ideas());
        let ideas = match parsed {
            IdeaParse::Structured(ideas) => ideas,
            other => panic!("Expected structured parse, got {:?}", other),
        };
        assert_eq!(ideas.len(), 5);
        assert!(ideas[0].starts_with("## IDEA 1: Title 1"));
        assert!(ideas[4].ends_with("**Originality Score:** 5"));
        assert!(ideas.iter().all(|i| !i.contains("RECOMMENDATION")));
    }

    #[test]
    fn test_recommendation_selected() {
        let selection = select_idea(&five_ideas());
        assert_eq!(selection.ideas.len(), 5);
        assert_eq!(selection.selected, "Idea 3 because it is specific.");
        assert_eq!(selection.source, SelectionSource::Recommendation);
    }

    #[test]
    fn test_no_markers_is_single_raw_idea() {
        let selection = select_idea("Idea X");
        assert_eq!(selection.ideas, vec!["Idea X"]);
        assert_eq!(selection.selected, "Idea X");
        assert_eq!(selection.source, SelectionSource::RawText);
    }

    #[test]
    fn test_unstructured_keeps_whitespace() {
        let raw = "  just some musings\n\n";
        assert_eq!(parse_ideas(raw), IdeaParse::Unstructured(raw.to_string()));
    }

    #[test]
    fn test_first_idea_without_recommendation() {
        let text = "## IDEA 1: Night shift\nbody one\n## IDEA 2: Garden\nbody two";
        let selection = select_idea(text);
        assert_eq!(selection.ideas.len(), 2);
        assert_eq!(selection.selected, "## IDEA 1: Night shift\nbody one");
        assert_eq!(selection.source, SelectionSource::FirstIdea);
    }

    #[test]
    fn test_recommendation_on_next_line() {
        let text = "## IDEA 1: A\nx\n## RECOMMENDATION\n**Best Idea:**\nIdea 1, clearly.";
        assert_eq!(
            extract_recommendation(text),
            Some("Idea 1, clearly.".to_string())
        );
    }

    #[test]
    fn test_blank_recommendation_falls_back() {
        let text = "## IDEA 1: A\nx\n## RECOMMENDATION\n**Best Idea:**   ";
        let selection = select_idea(text);
        assert_eq!(selection.source, SelectionSource::FirstIdea);
        assert_eq!(selection.selected, "## IDEA 1: A\nx");
    }

    #[test]
    fn test_recommendation_without_markers() {
        let text = "Some ideas...\n## RECOMMENDATION\n**Best Idea:** The bakery story";
        let selection = select_idea(text);
        assert_eq!(selection.ideas, vec![text.to_string()]);
        assert_eq!(selection.selected, "The bakery story");
    }

    #[test]
    fn test_ideas_after_recommendation_still_found() {
        let text = "## IDEA 1: A\na\n## RECOMMENDATION\n**Best Idea:** 1\n## IDEA 2: B\nb";
        let ideas = parse_ideas(text).into_ideas();
        assert_eq!(ideas, vec!["## IDEA 1: A\na", "## IDEA 2: B\nb"]);
    }

    #[test]
    fn test_empty_input_never_fails() {
        let selection = select_idea("");
        assert_eq!(selection.ideas, vec![String::new()]);
        assert_eq!(selection.selected, "");
    }

    #[test]
    fn test_malformed_marker_is_unstructured() {
        let text = "## IDEA one: missing number\n## IDEA: none";
        assert!(!parse_ideas(text).is_structured());
    }

    #[test]
    fn test_extract_score() {
        assert_eq!(extract_score("## OVERALL SCORE: 7/10\n..."), Some(7));
        assert_eq!(extract_score("- Score: 10/10"), Some(10));
        assert_eq!(extract_score("score 6/10"), Some(6));
        assert_eq!(extract_score("no numbers here"), None);
        assert_eq!(extract_score("SCORE: X/10"), None);
    }
}
