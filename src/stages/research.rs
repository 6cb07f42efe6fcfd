use super::invoke;
use crate::{
    client::CompletionClient,
    error::Result,
    prompt::PromptArgs,
    report::word_count,
    stage::Stage,
    state::{EssayState, StageOutput, StateUpdate},
    templates,
};
use std::time::Instant;

/// Analyze what the prompt is really asking for. Output is kept verbatim.
pub async fn run<C: CompletionClient>(client: &C, state: &EssayState) -> Result<StateUpdate> {
    let args = PromptArgs::new().set("prompt", state.prompt.as_str());

    let start = Instant::now();
    let completion = invoke(client, &templates::RESEARCH, &args, Stage::Research.sampling()).await?;
    let elapsed = start.elapsed().as_secs_f64();

    tracing::info!(
        stage = "research",
        generation_secs = completion.elapsed_secs(),
        words = word_count(&completion.text),
        "research complete"
    );

    Ok(StateUpdate {
        output: StageOutput::Research {
            analysis: completion.text,
        },
        elapsed_secs: elapsed,
        message: "Research Agent: Analyzed prompt, found key insights".to_string(),
    })
}
