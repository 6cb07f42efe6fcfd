//! # Essay Mentor
//!
//! Five-stage personal-essay pipeline over a local Ollama model.
//!
//! A prompt goes through Research, Brainstorm, Outline, Draft and Critique in
//! that order. Each stage makes one completion call with its own temperature
//! and token budget, and writes only its own fields of the shared
//! [`EssayState`].
//!
//! ## Features
//!
//! - **Fixed stage order**: every stage sees everything produced before it
//! - **Per-stage sampling**: cooler for analysis, warmer for ideas and prose
//! - **Strict templates**: a missing placeholder fails before any request
//! - **Forgiving parsing**: brainstorm output without `## IDEA <n>:` markers
//!   still yields one idea
//! - **Pluggable client**: [`EssayPipeline`] is generic over
//!   [`CompletionClient`], so tests swap in a scripted one
//! - **Suite and analysis**: run five fixed prompts and mine the critiques
//!   for recurring weaknesses
//!
//! ## Quick Start
//!
//! ```no_run
//! use essay_mentor::{EssayPipeline, OllamaClient, OllamaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OllamaClient::new(OllamaConfig::default());
//!     let pipeline = EssayPipeline::new(client);
//!
//!     let state = pipeline
//!         .run("Describe a challenge you overcame.", None)
//!         .await?;
//!
//!     println!("{}", state.essay_draft);
//!     println!("Total: {:.1}s", state.total_time());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod stage;
pub mod stages;
pub mod state;
pub mod suite;
pub mod templates;

pub use client::{Completion, CompletionClient, CompletionRequest, OllamaClient};
pub use config::{AppConfig, OllamaConfig, SamplingParams};
pub use error::{PipelineError, Result};
pub use parser::{IdeaParse, IdeaSelection, SelectionSource};
pub use pipeline::{EssayPipeline, PipelineProgress};
pub use prompt::{PromptArgs, PromptTemplate};
pub use report::ReportWriter;
pub use stage::Stage;
pub use state::{AgentMessage, AgentStatus, EssayState, StageOutput, StateUpdate};
pub use templates::Style;
