//! CLI binary for edgequake-edudoc.
//!
//! A thin shim over the library crate: one subcommand per service
//! operation, results printed to stdout or saved into the output directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgequake_edudoc::client::{
    DEFAULT_AUDIENCE, DEFAULT_DIFFICULTY, DEFAULT_EXERCISE_COUNT, DEFAULT_IMPROVE_CONTEXT,
    DEFAULT_LESSON_DURATION, DEFAULT_OUTLINE_SLIDES, DEFAULT_PAGES_PER_CHUNK,
    DEFAULT_QUESTION_COUNT, DEFAULT_SUMMARY_MAX_WORDS, DEFAULT_TARGET_LANGUAGE,
};
use edgequake_edudoc::results::{
    DeckSlide, Exercise, ExtractedText, FileInfo, HealthReport, LessonPlan, OutlineSlide, Question,
};
use edgequake_edudoc::{
    normalize, Artifact, BinaryResult, Client, ClientConfig, DecodedResult, LifecycleObserver,
    Operation, OperationHandle, OperationOutcome, PresentationDirective, Slide,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner driven by the operation lifecycle ────────────────────────────────

struct CliSpinner {
    bar: ProgressBar,
}

impl CliSpinner {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        let style =
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }
}

impl LifecycleObserver for CliSpinner {
    fn on_dispatch(&self, handle: &OperationHandle) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_prefix(handle.operation().to_string());
        self.bar.set_message("Processando…");
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_settle(&self, _handle: &OperationHandle) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text (files over 5 MB use the large-document pathway)
  edudoc extract-text apostila.pdf

  # Merge in order, result saved as merged.pdf
  edudoc merge capa.pdf cap1.pdf cap2.pdf -o saida/

  # Keep pages 1, 3 and 5
  edudoc split prova.pdf --pages "1, 3, 5"

  # Cut a long book into 50-page chunks (zip)
  edudoc split-large livro.pdf --pages-per-chunk 50

  # New deck from slides given as TITLE=CONTENT
  edudoc deck-create --title "Aula 1" --slide "Capa=Fotossíntese" --slide "Objetivos=Entender a luz"

  # AI tools read text from the argument, or stdin with "-"
  edudoc summarize --max-words 80 - < capitulo.txt
  edudoc questions "A água ferve a 100 °C ao nível do mar." --count 3 --difficulty fácil

  # Raw decoded payload as JSON
  edudoc --json health

LIMITS:
  Files above 25 MB are rejected locally; nothing is sent.

ENVIRONMENT VARIABLES:
  EDUDOC_BASE_URL    Service root (default http://localhost:8000)
  EDUDOC_TIMEOUT     Per-request timeout in seconds (default: none)
  EDUDOC_OUTPUT_DIR  Where downloaded files are written (default: .)
  RUST_LOG           Override the log filter
"#;

/// Document and AI tools for teachers, run against the IA Pedagógico service.
#[derive(Parser, Debug)]
#[command(
    name = "edudoc",
    version,
    about = "PDF, PowerPoint and AI text tools backed by the IA Pedagógico service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Service root URL.
    #[arg(
        long,
        global = true,
        env = "EDUDOC_BASE_URL",
        default_value = edgequake_edudoc::DEFAULT_BASE_URL
    )]
    base_url: String,

    /// Per-request timeout in seconds. Unset means no client-side limit.
    #[arg(long, global = true, env = "EDUDOC_TIMEOUT")]
    timeout: Option<u64>,

    /// Directory downloaded files are written into.
    #[arg(short, long, global = true, env = "EDUDOC_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Print decoded payloads as JSON.
    #[arg(long, global = true, env = "EDUDOC_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, global = true, env = "EDUDOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "EDUDOC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long, global = true, env = "EDUDOC_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF.
    ExtractText { file: PathBuf },

    /// Merge PDFs, in the order given, into merged.pdf.
    Merge {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Keep only the listed pages of a PDF.
    Split {
        file: PathBuf,
        /// Pages to keep, e.g. "1, 3, 5".
        #[arg(long)]
        pages: String,
    },

    /// Cut a PDF into fixed-size chunks, downloaded as a zip.
    SplitLarge {
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_PAGES_PER_CHUNK)]
        pages_per_chunk: u32,
    },

    /// Stamp a text watermark on every page.
    Watermark {
        file: PathBuf,
        #[arg(long)]
        text: String,
    },

    /// Compress a PDF.
    Compress { file: PathBuf },

    /// Create a PowerPoint deck.
    DeckCreate {
        #[arg(long)]
        title: String,
        /// One slide as TITLE=CONTENT; repeat in order.
        #[arg(long = "slide", value_parser = parse_slide)]
        slides: Vec<Slide>,
    },

    /// Extract the text of a PowerPoint deck, slide by slide.
    DeckExtract { file: PathBuf },

    /// Append a slide to a PowerPoint deck.
    DeckAddSlide {
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },

    /// Rewrite a text for clarity. TEXT may be "-" for stdin.
    Improve {
        text: String,
        #[arg(long, default_value = DEFAULT_IMPROVE_CONTEXT)]
        context: String,
    },

    /// Summarise a text. TEXT may be "-" for stdin.
    Summarize {
        text: String,
        #[arg(long, default_value_t = DEFAULT_SUMMARY_MAX_WORDS)]
        max_words: u32,
    },

    /// Generate multiple-choice questions. TEXT may be "-" for stdin.
    Questions {
        text: String,
        #[arg(long, default_value_t = DEFAULT_QUESTION_COUNT)]
        count: u32,
        #[arg(long, default_value = DEFAULT_DIFFICULTY)]
        difficulty: String,
    },

    /// Translate a text. TEXT may be "-" for stdin.
    Translate {
        text: String,
        #[arg(long = "to", default_value = DEFAULT_TARGET_LANGUAGE)]
        target_language: String,
    },

    /// Generate a lesson plan.
    LessonPlan {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        grade: String,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = DEFAULT_LESSON_DURATION)]
        duration: String,
    },

    /// Generate exercises.
    Exercises {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value_t = DEFAULT_EXERCISE_COUNT)]
        count: u32,
        #[arg(long, default_value = DEFAULT_DIFFICULTY)]
        difficulty: String,
    },

    /// Generate a presentation outline.
    Outline {
        #[arg(long)]
        topic: String,
        #[arg(long, default_value_t = DEFAULT_OUTLINE_SLIDES)]
        slides: u32,
        #[arg(long, default_value = DEFAULT_AUDIENCE)]
        audience: String,
    },

    /// Check that the service is up.
    Health,

    /// Delete the service's temporary files.
    Cleanup,

    /// Size and readability of an uploaded file.
    FileInfo { filename: String },
}

/// Parse `--slide TITLE=CONTENT`.
fn parse_slide(s: &str) -> Result<Slide, String> {
    match s.split_once('=') {
        Some((title, content)) => Ok(Slide::new(title.trim(), content.trim())),
        None => Err(format!("expected TITLE=CONTENT, got '{s}'")),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client ─────────────────────────────────────────────────────
    let mut builder = ClientConfig::builder().base_url(&cli.base_url);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if show_progress {
        builder = builder.observer(CliSpinner::new() as Arc<dyn LifecycleObserver>);
    }
    let config = builder.build().context("Invalid configuration")?;
    let client = Client::new(&config).context("Failed to build HTTP client")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let outcome = run(&client, cli.command).await?;
    present(outcome, &cli.output_dir, cli.json, cli.quiet).await
}

async fn run(client: &Client, command: Command) -> Result<OperationOutcome> {
    let outcome = match command {
        Command::ExtractText { file } => client.extract_text(load(&file).await?).await,
        Command::Merge { files } => {
            let artifacts = Artifact::from_paths(&files)
                .await
                .context("Failed to read input files")?;
            client.merge(artifacts).await
        }
        Command::Split { file, pages } => client.split(load(&file).await?, &pages).await,
        Command::SplitLarge {
            file,
            pages_per_chunk,
        } => client.split_large(load(&file).await?, pages_per_chunk).await,
        Command::Watermark { file, text } => client.watermark(load(&file).await?, &text).await,
        Command::Compress { file } => client.compress(load(&file).await?).await,
        Command::DeckCreate { title, slides } => client.create_deck(&title, &slides).await,
        Command::DeckExtract { file } => client.extract_deck_text(load(&file).await?).await,
        Command::DeckAddSlide {
            file,
            title,
            content,
        } => {
            client
                .add_slide(load(&file).await?, &title, &content)
                .await
        }
        Command::Improve { text, context } => {
            client.improve_text(&read_text(text)?, &context).await
        }
        Command::Summarize { text, max_words } => {
            client.summarize(&read_text(text)?, max_words).await
        }
        Command::Questions {
            text,
            count,
            difficulty,
        } => {
            client
                .generate_questions(&read_text(text)?, count, &difficulty)
                .await
        }
        Command::Translate {
            text,
            target_language,
        } => client.translate(&read_text(text)?, &target_language).await,
        Command::LessonPlan {
            subject,
            grade,
            topic,
            duration,
        } => client.lesson_plan(&subject, &grade, &topic, &duration).await,
        Command::Exercises {
            subject,
            topic,
            count,
            difficulty,
        } => client.exercises(&subject, &topic, count, &difficulty).await,
        Command::Outline {
            topic,
            slides,
            audience,
        } => client.presentation_outline(&topic, slides, &audience).await,
        Command::Health => client.health().await,
        Command::Cleanup => client.cleanup().await,
        Command::FileInfo { filename } => client.file_info(&filename).await,
    };
    Ok(outcome)
}

async fn load(path: &Path) -> Result<Artifact> {
    Artifact::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// `-` reads the whole of stdin.
fn read_text(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read text from stdin")?;
    Ok(buf)
}

// ── Presentation ─────────────────────────────────────────────────────────────

async fn present(
    outcome: OperationOutcome,
    output_dir: &Path,
    json: bool,
    quiet: bool,
) -> Result<ExitCode> {
    if json && !matches!(outcome, OperationOutcome::Binary(_)) {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialise result")?
        );
    }
    match normalize(outcome) {
        PresentationDirective::Notify { message } => {
            if !json {
                eprintln!("{} {}", red("✘"), message);
            }
            Ok(ExitCode::FAILURE)
        }
        PresentationDirective::Display { operation, fields } => {
            if !json {
                print_decoded(operation, &DecodedResult { operation, fields });
                if !quiet {
                    eprintln!("{} {}", green("✔"), operation.success_message());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        PresentationDirective::Save {
            operation,
            filename,
            content_type,
            content,
        } => {
            let binary = BinaryResult {
                operation,
                filename,
                content_type,
                content,
            };
            save(&binary, output_dir, json, quiet).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn save(binary: &BinaryResult, output_dir: &Path, json: bool, quiet: bool) -> Result<()> {
    let path = binary
        .save_into(output_dir)
        .await
        .context("Failed to save result")?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "operation": binary.operation,
                "saved_to": path,
                "content_type": binary.content_type,
                "size": binary.content.len(),
            })
        );
    } else if !quiet {
        eprintln!(
            "{} {}  {}  →  {}",
            green("✔"),
            binary.operation.success_message(),
            dim(&format!("{} bytes", binary.content.len())),
            bold(&path.display().to_string()),
        );
    }
    Ok(())
}

fn print_decoded(operation: Operation, decoded: &DecodedResult) {
    match operation {
        Operation::ExtractText | Operation::ExtractTextLarge => {
            let text = ExtractedText::from_result(decoded).unwrap_or_default();
            println!("{}", text.display_text());
        }
        Operation::DeckExtractText => {
            for slide in decoded.parse::<Vec<DeckSlide>>("content").unwrap_or_default() {
                println!("{}", bold(&format!("Slide {}: {}", slide.slide_number, slide.title)));
                for line in slide.content {
                    println!("  {line}");
                }
            }
        }
        Operation::ImproveText => print_string(decoded, "improved_text"),
        Operation::Summarize => print_string(decoded, "summary"),
        Operation::Translate => print_string(decoded, "translation"),
        Operation::GenerateQuestions => {
            for (i, q) in decoded
                .parse::<Vec<Question>>("questions")
                .unwrap_or_default()
                .into_iter()
                .enumerate()
            {
                if let Some(err) = q.error {
                    println!("{} {}", red("✗"), err);
                    continue;
                }
                println!("{}", bold(&format!("{}. {}", i + 1, q.question)));
                for (letter, text) in &q.alternatives {
                    println!("   {letter}) {text}");
                }
                let answer = format!("Resposta: {} ({})", q.correct_answer, q.explanation);
                println!("   {}", dim(&answer));
            }
        }
        Operation::LessonPlan => {
            let plan: LessonPlan = decoded.parse("lesson_plan").unwrap_or_default();
            if let Some(err) = plan.error {
                println!("{} {}", red("✗"), err);
                return;
            }
            println!("{}", bold(&plan.title));
            print_list("Objetivos", &plan.objectives);
            println!("\n{}\n{}", bold("Conteúdo"), plan.content);
            println!("\n{}\n{}", bold("Metodologia"), plan.methodology);
            print_list("Recursos", &plan.resources);
            println!("\n{}", bold("Desenvolvimento"));
            for step in &plan.development {
                println!("  {} ({}): {}", step.step, step.duration, step.description);
            }
            println!("\n{}\n{}", bold("Avaliação"), plan.assessment);
            print_list("Referências", &plan.references);
        }
        Operation::Exercises => {
            for ex in decoded.parse::<Vec<Exercise>>("exercises").unwrap_or_default() {
                if let Some(err) = ex.error {
                    println!("{} {}", red("✗"), err);
                    continue;
                }
                println!("{}", bold(&format!("{}. [{}] {}", ex.number, ex.kind, ex.question)));
                for (letter, text) in ex.alternatives.iter().flatten() {
                    println!("   {letter}) {text}");
                }
                println!("   {}", dim(&format!("Resposta: {}", ex.answer)));
            }
        }
        Operation::PresentationOutline => {
            for slide in decoded.parse::<Vec<OutlineSlide>>("outline").unwrap_or_default() {
                if let Some(err) = slide.error {
                    println!("{} {}", red("✗"), err);
                    continue;
                }
                println!("{}", bold(&format!("Slide {}: {}", slide.slide_number, slide.title)));
                for line in &slide.content {
                    println!("  • {line}");
                }
                if !slide.visual_suggestions.is_empty() {
                    println!("  {}", dim(&slide.visual_suggestions));
                }
            }
        }
        Operation::Health => {
            let report: HealthReport = decoded.parse_all().unwrap_or_default();
            println!("{}", report.summary());
        }
        Operation::FileInfo => {
            let info: FileInfo = decoded.parse("info").unwrap_or_default();
            match info.error {
                Some(err) => println!("{} {}", red("✗"), err),
                None => println!(
                    "Size:      {} bytes ({:.2} MB)\nReadable:  {}",
                    info.size, info.size_mb, info.readable
                ),
            }
        }
        Operation::Cleanup => {}
        // Binary operations never reach here as Decoded unless the service
        // answered with JSON instead of a file.
        _ => {
            if let Some(msg) = decoded.get("message").and_then(|v| v.as_str()) {
                println!("{msg}");
            }
        }
    }
}

fn print_string(decoded: &DecodedResult, key: &str) {
    if let Some(s) = decoded.get(key).and_then(|v| v.as_str()) {
        println!("{s}");
    }
}

fn print_list(heading: &str, items: &[String]) {
    println!("\n{}", bold(heading));
    for item in items {
        println!("  • {item}");
    }
}
