use super::invoke;
use crate::{
    client::CompletionClient,
    error::Result,
    prompt::PromptArgs,
    stage::Stage,
    state::{EssayState, StageOutput, StateUpdate},
    templates,
};
use std::time::Instant;

pub async fn run<C: CompletionClient>(client: &C, state: &EssayState) -> Result<StateUpdate> {
    let args = PromptArgs::new()
        .set("prompt", state.prompt.as_str())
        .set("essay", state.essay_draft.as_str());

    let start = Instant::now();
    let completion = invoke(client, &templates::CRITIQUE, &args, Stage::Critique.sampling()).await?;
    let elapsed = start.elapsed().as_secs_f64();

    tracing::info!(
        stage = "critique",
        generation_secs = completion.elapsed_secs(),
        "critique complete"
    );

    Ok(StateUpdate {
        output: StageOutput::Critique {
            critique: completion.text,
        },
        elapsed_secs: elapsed,
        message: "Critique Agent: Provided detailed feedback".to_string(),
    })
}
