#![allow(dead_code)]

use essay_mentor::{Completion, CompletionClient, CompletionRequest, PipelineError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// What the scripted client answers with, in call order.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Timeout,
    Unavailable,
    Fail(String),
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

/// Completion client that plays back canned replies and records requests.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Reply::text(t)))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Text(text)) => Ok(Completion {
                text,
                elapsed: Duration::from_millis(10),
            }),
            Some(Reply::Timeout) => Err(PipelineError::Timeout { seconds: 180 }),
            Some(Reply::Unavailable) => Err(PipelineError::ServiceUnavailable {
                endpoint: "http://localhost:11434".to_string(),
            }),
            Some(Reply::Fail(msg)) => Err(PipelineError::Completion(msg)),
            None => Err(PipelineError::Completion("script exhausted".to_string())),
        }
    }
}

/// Brainstorm output with five marked ideas and a recommendation.
pub fn five_idea_brainstorm() -> String {
    let mut text = String::new();
    for n in 1..=5 {
        text.push_str(&format!(
            "## IDEA {n}: Title {n}\n**Core Story:** Story {n}\n**Originality Score:** 7\n\n"
        ));
    }
    text.push_str("## RECOMMENDATION\n**Best Idea:** Idea 2, the night shift at the bakery\n");
    text
}
