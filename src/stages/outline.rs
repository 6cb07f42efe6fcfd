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

pub async fn run<C: CompletionClient>(client: &C, state: &EssayState) -> Result<StateUpdate> {
    let args = PromptArgs::new()
        .set("prompt", state.prompt.as_str())
        .set("research_analysis", state.research_analysis.as_str())
        .set("selected_idea", state.selected_idea.as_str());

    let start = Instant::now();
    let completion = invoke(client, &templates::OUTLINE, &args, Stage::Outline.sampling()).await?;
    let elapsed = start.elapsed().as_secs_f64();

    tracing::info!(
        stage = "outline",
        generation_secs = completion.elapsed_secs(),
        words = word_count(&completion.text),
        "outline complete"
    );

    Ok(StateUpdate {
        output: StageOutput::Outline {
            outline: completion.text,
        },
        elapsed_secs: elapsed,
        message: "Outline Agent: Created detailed essay structure".to_string(),
    })
}
