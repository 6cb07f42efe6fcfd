mod common;

use common::{five_idea_brainstorm, Reply, ScriptedClient};
use essay_mentor::stages::{self, brainstorm, critique, draft, outline, research};
use essay_mentor::*;

const PROMPT: &str = "Describe a challenge you overcame.";

fn after_research() -> EssayState {
    EssayState::new(PROMPT, None).merge(StateUpdate {
        output: StageOutput::Research {
            analysis: "Analysis text".to_string(),
        },
        elapsed_secs: 1.0,
        message: "research".to_string(),
    })
}

fn ready_for(stage: Stage) -> EssayState {
    let mut state = after_research();
    state.brainstorm_ideas = vec!["Idea X".to_string()];
    state.selected_idea = "Idea X".to_string();
    if stage >= Stage::Draft {
        state.essay_outline = "## OPENING HOOK\nThe oven timer.".to_string();
    }
    if stage >= Stage::Critique {
        state.essay_draft = "The oven timer went off at 4:10 AM.".to_string();
    }
    state
}

// --- Research ---

#[tokio::test]
async fn test_research_keeps_output_verbatim() {
    let client = ScriptedClient::texts(&["  Analysis text\n"]);
    let state = EssayState::new(PROMPT, None);

    let update = research::run(&client, &state).await.unwrap();
    let state = state.merge(update);

    assert_eq!(state.research_analysis, "  Analysis text\n");
    assert_eq!(state.agent_times.len(), 1);
    assert!(state.agent_times.contains_key(&Stage::Research));
    assert_eq!(state.messages.len(), 1);
    assert_eq!(
        state.messages[0].content,
        "Research Agent: Analyzed prompt, found key insights"
    );
}

#[tokio::test]
async fn test_research_request_shape() {
    let client = ScriptedClient::texts(&["ok"]);
    research::run(&client, &EssayState::new(PROMPT, None))
        .await
        .unwrap();

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains(&format!("PROMPT: {}", PROMPT)));
    assert!(requests[0].system.is_some());
    assert_eq!(requests[0].sampling, SamplingParams::new(0.5, 1500));
}

// --- Brainstorm ---

#[tokio::test]
async fn test_brainstorm_unstructured_is_single_idea() {
    let client = ScriptedClient::texts(&["Idea X"]);
    let update = brainstorm::run(&client, &after_research()).await.unwrap();
    let state = after_research().merge(update);

    assert_eq!(state.selected_idea, "Idea X");
    assert_eq!(state.brainstorm_ideas, vec!["Idea X"]);
    assert_eq!(
        state.messages.last().unwrap().content,
        "Brainstorm Agent: Generated 1 essay ideas"
    );
}

#[tokio::test]
async fn test_brainstorm_five_ideas_with_recommendation() {
    let client = ScriptedClient::new([Reply::Text(five_idea_brainstorm())]);
    let update = brainstorm::run(&client, &after_research()).await.unwrap();

    match &update.output {
        StageOutput::Brainstorm { ideas, selected } => {
            assert_eq!(ideas.len(), 5);
            assert!(ideas[0].starts_with("## IDEA 1:"));
            assert_eq!(selected, "Idea 2, the night shift at the bakery");
        }
        other => panic!("Expected brainstorm output, got {:?}", other),
    }
    assert_eq!(update.message, "Brainstorm Agent: Generated 5 essay ideas");
}

#[tokio::test]
async fn test_brainstorm_reads_research() {
    let client = ScriptedClient::texts(&["Idea X"]);
    brainstorm::run(&client, &after_research()).await.unwrap();

    let request = &client.requests()[0];
    assert!(request.prompt.contains("Analysis text"));
    assert_eq!(request.sampling, SamplingParams::new(0.85, 2000));
}

// --- Outline / Draft / Critique ---

#[tokio::test]
async fn test_outline_uses_selected_idea() {
    let client = ScriptedClient::texts(&["## OPENING HOOK\n..."]);
    let update = outline::run(&client, &ready_for(Stage::Outline))
        .await
        .unwrap();

    assert_eq!(
        update.output,
        StageOutput::Outline {
            outline: "## OPENING HOOK\n...".to_string()
        }
    );
    let request = &client.requests()[0];
    assert!(request.prompt.contains("Idea X"));
    assert!(request.prompt.contains("Analysis text"));
    assert_eq!(request.sampling, SamplingParams::new(0.6, 1500));
}

#[tokio::test]
async fn test_draft_reports_word_count() {
    let client = ScriptedClient::texts(&["one two three four"]);
    let state = ready_for(Stage::Draft);
    let update = draft::run(&client, &state).await.unwrap();

    assert_eq!(update.message, "Draft Agent: Wrote 4-word essay");
    let state = state.merge(update);
    assert_eq!(state.essay_draft, "one two three four");
    assert!(client.requests()[0].prompt.contains("The oven timer."));
    assert_eq!(client.requests()[0].sampling, SamplingParams::new(0.75, 2500));
}

#[tokio::test]
async fn test_critique_reads_draft() {
    let client = ScriptedClient::texts(&["## OVERALL SCORE: 7/10"]);
    let state = ready_for(Stage::Critique);
    let state = state.clone().merge(critique::run(&client, &state).await.unwrap());

    assert_eq!(state.essay_critique, "## OVERALL SCORE: 7/10");
    assert!(state.is_complete());
    assert!(client.requests()[0].prompt.contains("4:10 AM"));
    assert_eq!(client.requests()[0].sampling, SamplingParams::new(0.4, 2000));
}

// --- Failures ---

#[tokio::test]
async fn test_stage_propagates_client_error() {
    let client = ScriptedClient::new([Reply::Timeout]);
    let err = research::run(&client, &EssayState::new(PROMPT, None))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Timeout { seconds: 180 }));
}

#[tokio::test]
async fn test_template_error_makes_no_call() {
    let client = ScriptedClient::texts(&["never used"]);
    let args = PromptArgs::new().set("prompt", PROMPT);

    let err = stages::invoke(
        &client,
        &templates::OUTLINE,
        &args,
        Stage::Outline.sampling(),
    )
    .await
    .unwrap_err();

    match err {
        PipelineError::Template {
            template,
            placeholder,
        } => {
            assert_eq!(template, "outline");
            assert_eq!(placeholder, "research_analysis");
        }
        other => panic!("Expected template error, got {:?}", other),
    }
    assert_eq!(client.calls(), 0);
}
