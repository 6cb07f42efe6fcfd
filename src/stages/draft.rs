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

/// Write the essay from the outline. The word count is only reported.
pub async fn run<C: CompletionClient>(client: &C, state: &EssayState) -> Result<StateUpdate> {
    let args = PromptArgs::new()
        .set("prompt", state.prompt.as_str())
        .set("outline", state.essay_outline.as_str())
        .set("research_analysis", state.research_analysis.as_str());

    let start = Instant::now();
    let completion = invoke(client, &templates::DRAFT, &args, Stage::Draft.sampling()).await?;
    let elapsed = start.elapsed().as_secs_f64();

    let words = word_count(&completion.text);
    tracing::info!(
        stage = "draft",
        generation_secs = completion.elapsed_secs(),
        words,
        "draft complete"
    );

    Ok(StateUpdate {
        output: StageOutput::Draft {
            draft: completion.text,
        },
        elapsed_secs: elapsed,
        message: format!("Draft Agent: Wrote {}-word essay", words),
    })
}
