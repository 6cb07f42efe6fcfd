use crate::error::{PipelineError, Result};
use std::collections::BTreeMap;

/// A fixed system message paired with a `{placeholder}` template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Registry key, used in error messages.
    pub name: &'static str,
    /// System message sent ahead of the rendered prompt. May be empty.
    pub system: &'static str,
    /// Template text with `{name}` placeholders; `{{` and `}}` are literal braces.
    pub template: &'static str,
}

/// Named values for template placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptArgs {
    values: BTreeMap<String, String>,
}

impl PromptArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }
}

enum Piece<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal text and placeholder names.
///
/// Only `{identifier}` is a placeholder. Any other brace sequence is kept
/// as literal text.
fn pieces(template: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find(['{', '}']) {
        let (before, after) = rest.split_at(open);
        if !before.is_empty() {
            out.push(Piece::Text(before));
        }

        if after.starts_with("{{") {
            out.push(Piece::Text("{"));
            rest = &after[2..];
        } else if after.starts_with("}}") {
            out.push(Piece::Text("}"));
            rest = &after[2..];
        } else if after.starts_with('{') {
            match after[1..].find('}') {
                Some(close) if is_identifier(&after[1..1 + close]) => {
                    out.push(Piece::Placeholder(&after[1..1 + close]));
                    rest = &after[close + 2..];
                }
                _ => {
                    out.push(Piece::Text("{"));
                    rest = &after[1..];
                }
            }
        } else {
            out.push(Piece::Text("}"));
            rest = &after[1..];
        }
    }

    if !rest.is_empty() {
        out.push(Piece::Text(rest));
    }
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PromptTemplate {
    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for piece in pieces(self.template) {
            if let Piece::Placeholder(name) = piece {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder from `args`.
    ///
    /// Values are inserted verbatim and never re-scanned. Extra arguments
    /// are ignored; a missing one is a [`PipelineError::Template`].
    pub fn render(&self, args: &PromptArgs) -> Result<String> {
        let mut rendered = String::with_capacity(self.template.len());
        for piece in pieces(self.template) {
            match piece {
                Piece::Text(text) => rendered.push_str(text),
                Piece::Placeholder(name) => {
                    let value = args.get(name).ok_or_else(|| PipelineError::Template {
                        template: self.name.to_string(),
                        placeholder: name.to_string(),
                    })?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}
