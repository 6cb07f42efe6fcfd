use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use essay_mentor::{
    analysis,
    report::{self, preview, word_count, ReportWriter, StrategyRun},
    suite, templates, AppConfig, Completion, CompletionClient, CompletionRequest, EssayPipeline,
    OllamaClient, PromptArgs, PromptTemplate, SamplingParams, Style,
};

const ADHOC_MAX_TOKENS: u32 = 2000;
const BASELINE_MAX_TOKENS: u32 = 2500;
const TABLE_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Parser)]
#[command(
    name = "essay-mentor",
    version,
    about = "Research, brainstorm, outline, draft and critique personal essays with a local model"
)]
pub struct Cli {
    /// Config file (defaults to ~/.essay-mentor/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write an essay in a single call
    Generate(GenerateArgs),
    /// Critique an essay given as text or a file path
    Critique(CritiqueArgs),
    /// Compare four writing strategies on the same prompt
    Compare(CompareArgs),
    /// Diagnose and rewrite an essay file
    Improve(ImproveArgs),
    /// Run the five-stage pipeline
    Run(RunArgs),
    /// Single-call baseline against the full pipeline
    Versus(PromptOnly),
    /// Run the pipeline over the five evaluation prompts
    Suite,
    /// Find recurring weaknesses in the latest suite results
    Analyze,
    /// Check that Ollama is reachable and the model is pulled
    Status,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    prompt: String,
    #[arg(short, long, default_value_t = 650)]
    words: u32,
    /// vulnerable, technical, creative or balanced
    #[arg(short, long, default_value = "balanced")]
    style: String,
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Args)]
struct CritiqueArgs {
    /// Essay text, or a path to a file containing it
    essay: String,
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Args)]
struct CompareArgs {
    prompt: String,
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Args)]
struct PromptOnly {
    prompt: String,
}

#[derive(Debug, Args)]
struct ImproveArgs {
    path: PathBuf,
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Args)]
struct RunArgs {
    prompt: String,
    /// Background about the student
    #[arg(long)]
    context: Option<String>,
    #[arg(long)]
    no_save: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing(self.verbose);
        let config = AppConfig::load(self.config.as_deref())?;
        let writer = ReportWriter::new(&config.output_dir);

        match self.command {
            Command::Generate(args) => generate(&config, &writer, args).await,
            Command::Critique(args) => critique(&config, &writer, args).await,
            Command::Compare(args) => compare(&config, &writer, args).await,
            Command::Improve(args) => improve(&config, &writer, args).await,
            Command::Run(args) => run_pipeline(&config, &writer, args).await,
            Command::Versus(args) => versus(&config, &args.prompt).await,
            Command::Suite => run_suite(&config, &writer).await,
            Command::Analyze => analyze(&writer),
            Command::Status => {
                status(&config).await;
                Ok(())
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: impl Into<String>) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

/// Render `template`, then make one ad hoc call with `system` in front.
async fn ask<C: CompletionClient>(
    client: &C,
    template: &PromptTemplate,
    args: &PromptArgs,
    system: &str,
    sampling: SamplingParams,
) -> essay_mentor::Result<Completion> {
    let request = CompletionRequest::new(template.render(args)?)
        .with_system(system)
        .with_sampling(sampling);
    client.complete(&request).await
}

fn adhoc_client(config: &AppConfig) -> OllamaClient {
    OllamaClient::new(config.ollama.for_adhoc())
}

fn saved(path: &Path) {
    println!("\nSaved to: {}", path.display());
}

async fn generate(config: &AppConfig, writer: &ReportWriter, args: GenerateArgs) -> anyhow::Result<()> {
    let style = Style::parse_or_default(&args.style);
    let client = adhoc_client(config);
    let prompt_args = PromptArgs::new()
        .set("prompt", args.prompt.as_str())
        .set("words", args.words.to_string());

    let pb = spinner(format!("Generating {} essay", style))?;
    let completion = ask(
        &client,
        &templates::GENERATE,
        &prompt_args,
        style.guidance(),
        SamplingParams::new(0.75, ADHOC_MAX_TOKENS),
    )
    .await;
    pb.finish_and_clear();
    let completion = completion?;

    println!("{}\n", completion.text);
    println!(
        "Words: {} (target {}) | Time: {:.1}s",
        word_count(&completion.text),
        args.words,
        completion.elapsed_secs()
    );

    if !args.no_save {
        let path = writer.save(
            "essay",
            &report::essay_report(
                &args.prompt,
                style.name(),
                args.words,
                &completion.text,
                completion.elapsed_secs(),
                Local::now(),
            ),
        )?;
        saved(&path);
    }
    Ok(())
}

async fn critique(config: &AppConfig, writer: &ReportWriter, args: CritiqueArgs) -> anyhow::Result<()> {
    let candidate = Path::new(&args.essay);
    let essay = if candidate.is_file() {
        std::fs::read_to_string(candidate)
            .with_context(|| format!("reading {}", candidate.display()))?
    } else {
        args.essay.clone()
    };

    let client = adhoc_client(config);
    let pb = spinner("Critiquing essay")?;
    let completion = ask(
        &client,
        &templates::REVIEW,
        &PromptArgs::new().set("essay", essay.as_str()),
        "",
        SamplingParams::new(0.4, ADHOC_MAX_TOKENS),
    )
    .await;
    pb.finish_and_clear();
    let completion = completion?;

    println!("{}", completion.text);
    println!("\nAnalysis time: {:.1}s", completion.elapsed_secs());

    if !args.no_save {
        let path = writer.save(
            "critique",
            &report::critique_report(
                &essay,
                &completion.text,
                completion.elapsed_secs(),
                Local::now(),
            ),
        )?;
        saved(&path);
    }
    Ok(())
}

async fn compare(config: &AppConfig, writer: &ReportWriter, args: CompareArgs) -> anyhow::Result<()> {
    let client = adhoc_client(config);
    let prompt_args = PromptArgs::new().set("prompt", args.prompt.as_str());
    let mut runs = Vec::with_capacity(templates::STRATEGIES.len());

    for (i, strategy) in templates::STRATEGIES.iter().enumerate() {
        let pb = spinner(format!(
            "[{}/{}] {}",
            i + 1,
            templates::STRATEGIES.len(),
            strategy.name
        ))?;
        let completion = ask(
            &client,
            &templates::STRATEGY_OPENING,
            &prompt_args,
            strategy.guidance,
            SamplingParams::new(0.75, ADHOC_MAX_TOKENS),
        )
        .await;
        pb.finish_and_clear();
        let completion = completion?;

        runs.push(StrategyRun {
            name: strategy.name.to_string(),
            guidance: strategy.guidance.to_string(),
            secs: completion.elapsed_secs(),
            essay: completion.text,
        });
    }

    println!("{:<20} {:>8} {:>6}  Preview", "Strategy", "Time", "Words");
    for run in &runs {
        println!(
            "{:<20} {:>7.1}s {:>6}  {}",
            run.name,
            run.secs,
            word_count(&run.essay),
            preview(&run.essay, TABLE_PREVIEW_CHARS).replace('\n', " ")
        );
    }

    if !args.no_save {
        let path = writer.save(
            "comparison",
            &report::comparison_report(&args.prompt, &runs, Local::now()),
        )?;
        saved(&path);
    }
    Ok(())
}

async fn improve(config: &AppConfig, writer: &ReportWriter, args: ImproveArgs) -> anyhow::Result<()> {
    if !args.path.is_file() {
        anyhow::bail!("File not found: {}", args.path.display());
    }
    let essay = std::fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;

    let client = adhoc_client(config);
    let pb = spinner("Improving essay")?;
    let completion = ask(
        &client,
        &templates::IMPROVE,
        &PromptArgs::new().set("essay", essay.as_str()),
        "",
        SamplingParams::new(0.6, ADHOC_MAX_TOKENS),
    )
    .await;
    pb.finish_and_clear();
    let completion = completion?;

    println!("{}", completion.text);

    if !args.no_save {
        let path = writer.save(
            "improved",
            &report::improvement_report(&args.path, &essay, &completion.text, Local::now()),
        )?;
        saved(&path);
    }
    Ok(())
}

async fn run_pipeline(config: &AppConfig, writer: &ReportWriter, args: RunArgs) -> anyhow::Result<()> {
    let pipeline = EssayPipeline::new(OllamaClient::new(config.ollama.clone()));
    let pb = spinner("Starting pipeline")?;

    let state = pipeline
        .run_with_progress(&args.prompt, args.context.as_deref(), |p| {
            pb.set_message(format!(
                "[{}/{}] {} Agent",
                p.stage_index + 1,
                p.total_stages,
                p.stage.label()
            ));
        })
        .await;
    pb.finish_and_clear();
    let state = state?;

    println!("Agent timings:");
    for (stage, secs) in &state.agent_times {
        println!("  {:<12} {:>6.1}s", stage.label(), secs);
    }
    println!("  {:<12} {:>6.1}s", "Total", state.total_time());
    println!("\nEssay words: {}\n", word_count(&state.essay_draft));
    println!("{}\n", state.essay_draft);
    println!("{}", state.essay_critique);

    if !args.no_save {
        let path = writer.save(
            "multi_agent_run",
            &report::pipeline_report(&state, Local::now()),
        )?;
        saved(&path);
    }
    Ok(())
}

async fn versus(config: &AppConfig, prompt: &str) -> anyhow::Result<()> {
    let client = adhoc_client(config);
    let pb = spinner("Baseline: single call")?;
    let baseline = ask(
        &client,
        &templates::BASELINE,
        &PromptArgs::new().set("prompt", prompt),
        "",
        SamplingParams::new(0.75, BASELINE_MAX_TOKENS),
    )
    .await;
    pb.finish_and_clear();
    let baseline = baseline?;

    let pipeline = EssayPipeline::new(OllamaClient::new(config.ollama.clone()));
    let pb = spinner("Pipeline: five agents")?;
    let start = Instant::now();
    let state = pipeline
        .run_with_progress(prompt, None, |p| pb.set_message(format!("Pipeline: {}", p.stage.label())))
        .await;
    pb.finish_and_clear();
    let state = state?;
    let pipeline_secs = start.elapsed().as_secs_f64();

    let baseline_secs = baseline.elapsed_secs();
    println!("{:<12} {:>8} {:>6}", "Approach", "Time", "Words");
    println!(
        "{:<12} {:>7.1}s {:>6}",
        "Baseline",
        baseline_secs,
        word_count(&baseline.text)
    );
    println!(
        "{:<12} {:>7.1}s {:>6}",
        "Pipeline",
        pipeline_secs,
        word_count(&state.essay_draft)
    );
    if baseline_secs > 0.0 {
        println!("\nPipeline took {:.1}x as long", pipeline_secs / baseline_secs);
    }
    println!("\n--- Baseline ---\n\n{}", baseline.text);
    println!("\n--- Pipeline ---\n\n{}", state.essay_draft);
    Ok(())
}

async fn run_suite(config: &AppConfig, writer: &ReportWriter) -> anyhow::Result<()> {
    let pipeline = EssayPipeline::new(OllamaClient::new(config.ollama.clone()));
    let total = suite::SUITE_PROMPTS.len();

    let entries = suite::run_suite(&pipeline, &suite::SUITE_PROMPTS, |i, prompt| {
        println!("[{}/{}] {}: {}", i, total, prompt.category, prompt.prompt);
    })
    .await;

    let summary = suite::summarize(&entries);
    println!("\nPassed: {}/{}", summary.passed, entries.len());
    if summary.failed > 0 {
        println!("Failed: {}", summary.failed);
        for entry in &entries {
            if let suite::SuiteEntry::Failed(failure) = entry {
                println!("  {} ({}): {}", failure.id, failure.category, failure.error);
            }
        }
    }
    if let (Some(words), Some(secs)) = (summary.avg_words, summary.avg_time) {
        println!("Average words: {:.0}", words);
        println!("Average time: {:.1}s", secs);
    }

    let (json, md) = suite::save_suite(&writer.child("tests"), &entries, Local::now())?;
    println!("\nResults: {}", json.display());
    println!("Report: {}", md.display());
    Ok(())
}

fn analyze(writer: &ReportWriter) -> anyhow::Result<()> {
    let dir = writer.child("tests");
    let source = analysis::latest_suite_file(dir.dir())?;
    let entries = analysis::load_entries(&source)
        .with_context(|| format!("loading {}", source.display()))?;

    let result = analysis::analyze(&entries);
    let rendered = analysis::render(&result, &source, Local::now());
    println!("{}", rendered);

    let path = analysis::analysis_path(&source);
    std::fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?;
    saved(&path);
    Ok(())
}

async fn status(config: &AppConfig) {
    let client = OllamaClient::new(config.ollama.clone());
    let model = &config.ollama.model;

    match client.list_models().await {
        Ok(models) => {
            println!("Ollama is running at {}", config.ollama.endpoint);
            if models.iter().any(|m| m == model) {
                println!("Model {} is available", model);
            } else {
                println!("Model {} not found. Pull it with: ollama pull {}", model, model);
                if !models.is_empty() {
                    println!("Available models:");
                    for name in &models {
                        println!("  {}", name);
                    }
                }
            }
        }
        Err(err) => println!("{}", err),
    }
    println!("Output directory: {}", config.output_dir.display());
}
