use crate::{
    client::CompletionClient,
    error::Result,
    stage::Stage,
    stages,
    state::EssayState,
};
use serde::{Deserialize, Serialize};

/// Progress update emitted at the start of each stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineProgress {
    /// Current stage index (0-based).
    pub stage_index: usize,

    /// Total number of stages in the pipeline.
    pub total_stages: usize,

    pub stage: Stage,
}

/// Runs Research → Brainstorm → Outline → Draft → Critique over one
/// [`EssayState`].
///
/// Stages run strictly in sequence; each one's update is merged before
/// the next begins. The first failure ends the run and is returned
/// unchanged. Nothing completed before it is handed back.
pub struct EssayPipeline<C> {
    client: C,
}

impl<C> std::fmt::Debug for EssayPipeline<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EssayPipeline")
            .field(
                "stages",
                &Stage::ALL.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<C: CompletionClient> EssayPipeline<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The completion client stages call through.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The fixed stage order.
    pub fn stages(&self) -> &'static [Stage] {
        &Stage::ALL
    }

    /// Run every stage and return the final state.
    pub async fn run(&self, prompt: &str, user_context: Option<&str>) -> Result<EssayState> {
        self.run_with_progress(prompt, user_context, |_| {}).await
    }

    /// Run every stage, invoking `on_progress` as each one starts.
    pub async fn run_with_progress<F>(
        &self,
        prompt: &str,
        user_context: Option<&str>,
        mut on_progress: F,
    ) -> Result<EssayState>
    where
        F: FnMut(PipelineProgress),
    {
        let mut state = EssayState::new(prompt, user_context.map(str::to_string));
        let total_stages = Stage::ALL.len();

        tracing::info!(total_stages, "starting essay pipeline");

        for (stage_index, stage) in Stage::ALL.into_iter().enumerate() {
            on_progress(PipelineProgress {
                stage_index,
                total_stages,
                stage,
            });

            let update = match stages::run_stage(stage, &self.client, &state).await {
                Ok(update) => update,
                Err(err) => {
                    tracing::error!(stage = stage.name(), error = %err, "stage failed");
                    return Err(err);
                }
            };
            state = state.merge(update);
        }

        tracing::info!(
            total_secs = state.total_time(),
            "essay pipeline complete"
        );
        Ok(state)
    }
}
