mod common;

use common::{five_idea_brainstorm, Reply, ScriptedClient};
use essay_mentor::*;

const PROMPT: &str = "Describe a challenge you overcame.";

fn full_script() -> Vec<Reply> {
    vec![
        Reply::text("Analysis text"),
        Reply::Text(five_idea_brainstorm()),
        Reply::text("## OPENING HOOK\nFlour on the floor."),
        Reply::text("The mixer died at 3:15 AM and I had forty loaves to shape."),
        Reply::text("## OVERALL SCORE: 8/10\nStrong opening."),
    ]
}

#[tokio::test]
async fn test_run_to_completion() {
    let pipeline = EssayPipeline::new(ScriptedClient::new(full_script()));
    let state = pipeline.run(PROMPT, None).await.unwrap();

    assert_eq!(state.prompt, PROMPT);
    assert_eq!(state.research_analysis, "Analysis text");
    assert_eq!(state.brainstorm_ideas.len(), 5);
    assert_eq!(state.selected_idea, "Idea 2, the night shift at the bakery");
    assert_eq!(state.essay_outline, "## OPENING HOOK\nFlour on the floor.");
    assert!(state.essay_draft.starts_with("The mixer died"));
    assert!(state.essay_critique.contains("8/10"));
    assert!(state.is_complete());

    assert_eq!(state.agent_times.len(), 5);
    let summed: f64 = state.agent_times.values().sum();
    assert_eq!(summed, state.total_time());

    let order: Vec<Stage> = state.messages.iter().map(|m| m.stage).collect();
    assert_eq!(order, Stage::ALL.to_vec());
    assert_eq!(pipeline.client().calls(), 5);
}

#[tokio::test]
async fn test_outputs_flow_forward() {
    let pipeline = EssayPipeline::new(ScriptedClient::new(full_script()));
    pipeline.run(PROMPT, None).await.unwrap();

    let requests = pipeline.client().requests();
    assert_eq!(requests.len(), 5);
    // outline sees the recommendation, draft sees the outline, critique sees the draft
    assert!(requests[2]
        .prompt
        .contains("Idea 2, the night shift at the bakery"));
    assert!(requests[3].prompt.contains("Flour on the floor."));
    assert!(requests[4].prompt.contains("The mixer died at 3:15 AM"));
    for request in &requests {
        assert!(request.prompt.contains(PROMPT));
    }
}

#[tokio::test]
async fn test_user_context_carried_through() {
    let pipeline = EssayPipeline::new(ScriptedClient::new(full_script()));
    let state = pipeline
        .run(PROMPT, Some("works weekends at a bakery"))
        .await
        .unwrap();
    assert_eq!(
        state.user_context.as_deref(),
        Some("works weekends at a bakery")
    );
}

#[tokio::test]
async fn test_draft_timeout_stops_run() {
    let mut script = full_script();
    script.truncate(3);
    script.push(Reply::Timeout);
    script.push(Reply::text("never reached"));

    let pipeline = EssayPipeline::new(ScriptedClient::new(script));
    let mut started = Vec::new();
    let err = pipeline
        .run_with_progress(PROMPT, None, |p| started.push(p.stage))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Timeout { seconds: 180 }));
    assert_eq!(started.last(), Some(&Stage::Draft));
    assert!(!started.contains(&Stage::Critique));
    assert_eq!(pipeline.client().calls(), 4);
}

#[tokio::test]
async fn test_unreachable_service_fails_first_stage() {
    let pipeline = EssayPipeline::new(ScriptedClient::new([Reply::Unavailable]));
    let err = pipeline.run(PROMPT, None).await.unwrap_err();

    assert!(matches!(err, PipelineError::ServiceUnavailable { .. }));
    assert_eq!(pipeline.client().calls(), 1);
}

#[tokio::test]
async fn test_completion_error_not_wrapped() {
    let mut script = full_script();
    script[1] = Reply::Fail("HTTP 500".to_string());

    let pipeline = EssayPipeline::new(ScriptedClient::new(script));
    match pipeline.run(PROMPT, None).await.unwrap_err() {
        PipelineError::Completion(msg) => assert_eq!(msg, "HTTP 500"),
        other => panic!("Expected completion error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_progress_counts() {
    let pipeline = EssayPipeline::new(ScriptedClient::new(full_script()));
    let mut seen = Vec::new();
    pipeline
        .run_with_progress(PROMPT, None, |p| {
            seen.push((p.stage_index, p.total_stages))
        })
        .await
        .unwrap();
    assert_eq!(seen, vec![(0, 5), (1, 5), (2, 5), (3, 5), (4, 5)]);
}
