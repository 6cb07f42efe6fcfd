use super::invoke;
use crate::{
    client::CompletionClient,
    error::Result,
    parser::{self, SelectionSource},
    prompt::PromptArgs,
    stage::Stage,
    state::{EssayState, StageOutput, StateUpdate},
    templates,
};
use std::time::Instant;

/// Generate candidate ideas and pick the one the outline will develop.
///
/// Parsing never fails: unstructured output becomes a single idea.
pub async fn run<C: CompletionClient>(client: &C, state: &EssayState) -> Result<StateUpdate> {
    let args = PromptArgs::new()
        .set("prompt", state.prompt.as_str())
        .set("research_analysis", state.research_analysis.as_str());

    let start = Instant::now();
    let completion = invoke(
        client,
        &templates::BRAINSTORM,
        &args,
        Stage::Brainstorm.sampling(),
    )
    .await?;
    let elapsed = start.elapsed().as_secs_f64();

    let selection = parser::select_idea(&completion.text);
    if selection.source == SelectionSource::RawText {
        tracing::warn!(
            stage = "brainstorm",
            "no idea markers in model output; using the raw text as the only idea"
        );
    }

    let count = selection.ideas.len();
    tracing::info!(
        stage = "brainstorm",
        generation_secs = completion.elapsed_secs(),
        ideas = count,
        source = ?selection.source,
        "brainstorm complete"
    );

    Ok(StateUpdate {
        output: StageOutput::Brainstorm {
            ideas: selection.ideas,
            selected: selection.selected,
        },
        elapsed_secs: elapsed,
        message: format!("Brainstorm Agent: Generated {} essay ideas", count),
    })
}
