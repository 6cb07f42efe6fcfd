//! The five stage functions.
//!
//! Every stage has the same shape: read fields from [`EssayState`], render
//! its template, make exactly one completion call with its own sampling
//! parameters, post-process, and return a [`StateUpdate`].

pub mod brainstorm;
pub mod critique;
pub mod draft;
pub mod outline;
pub mod research;

use crate::{
    client::{Completion, CompletionClient, CompletionRequest},
    config::SamplingParams,
    error::Result,
    prompt::{PromptArgs, PromptTemplate},
    stage::Stage,
    state::{EssayState, StateUpdate},
};

/// Render `template` and send it with its system message.
///
/// Rendering happens first, so a missing placeholder fails before any
/// request is made.
pub async fn invoke<C: CompletionClient>(
    client: &C,
    template: &PromptTemplate,
    args: &PromptArgs,
    sampling: SamplingParams,
) -> Result<Completion> {
    let prompt = template.render(args)?;
    let request = CompletionRequest::new(prompt)
        .with_system(template.system)
        .with_sampling(sampling);
    client.complete(&request).await
}

/// Run one stage against the current state.
pub async fn run_stage<C: CompletionClient>(
    stage: Stage,
    client: &C,
    state: &EssayState,
) -> Result<StateUpdate> {
    match stage {
        Stage::Research => research::run(client, state).await,
        Stage::Brainstorm => brainstorm::run(client, state).await,
        Stage::Outline => outline::run(client, state).await,
        Stage::Draft => draft::run(client, state).await,
        Stage::Critique => critique::run(client, state).await,
    }
}
