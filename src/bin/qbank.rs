//! qbank CLI - question-bank solving, generation and formatting

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use qbank::core::latex::classify::matching_patterns;
use qbank::{
    generate, latex_document_to_plain, looks_like_math, render_screen, screen_to_markdown,
    segment, solve, translate_protected, CompletionProvider, Difficulty, GenerateParams,
    GoogleTranslateClient, Language, MathConvention, OpenAiClient, PipelineOutput, QbankConfig,
    QuestionBank, QuestionQueue, QuestionType, RequestContext, TranslationProvider,
};

#[derive(Parser)]
#[command(name = "qbank")]
#[command(version)]
#[command(about = "Solve, generate and format curriculum question-bank exercises", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercises, or the questions of one exercise
    List {
        /// Chapter JSON file
        bank: PathBuf,

        #[arg(short, long)]
        exercise: Option<String>,
    },

    /// Segment a model response and print it as screen markdown
    Format {
        /// Input file path (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Math delimiter convention of the input
        #[arg(short, long, default_value = "boxed")]
        convention: MathConvention,

        /// Print the segmented structure as JSON
        #[arg(long)]
        json: bool,
    },

    /// Segment a model response and export it as PDF
    Export {
        /// Input file path (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Document title stored in the PDF metadata
        #[arg(long)]
        title: Option<String>,
    },

    /// Convert `$..$`/`$$..$$` math to plain text
    Plain {
        /// Input file path (reads from stdin if not provided)
        input: Option<PathBuf>,
    },

    /// Print `math` or `prose` for every line
    Classify {
        /// Input file path (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Also print the patterns that matched
        #[arg(long)]
        explain: bool,
    },

    /// Translate text while keeping math spans intact
    Translate {
        /// Input file path (reads from stdin if not provided)
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = LangArg::Hindi)]
        lang: LangArg,
    },

    /// Ask for step-by-step solutions to selected questions
    Solve {
        #[command(flatten)]
        selection: Selection,

        /// Also write the answers as PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
    },

    /// Ask for new questions similar to the selected ones
    Generate {
        #[command(flatten)]
        selection: Selection,

        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// Number of questions to generate (1-10)
        #[arg(long, default_value_t = 5)]
        count: u32,

        #[arg(long, default_value = "short-answer")]
        question_type: QuestionType,

        /// Also write the questions as PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct Selection {
    /// Chapter JSON file
    #[arg(long)]
    bank: PathBuf,

    #[arg(short, long)]
    exercise: String,

    /// 1-based question numbers as listed by `qbank list`, e.g. 1,3
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<usize>,

    /// Select every question of the exercise
    #[arg(long, conflicts_with = "select")]
    all: bool,

    #[arg(short, long, value_enum, default_value_t = LangArg::English)]
    lang: LangArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LangArg {
    English,
    Hindi,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::English => Language::English,
            LangArg::Hindi => Language::Hindi,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = QbankConfig::resolve(cli.config.as_deref())?;
    let output = cli.output.as_deref();

    match cli.command {
        Commands::List { bank, exercise } => {
            let bank = load_bank(&bank)?;
            let listing = match exercise {
                Some(name) => bank
                    .questions_for(&name)?
                    .iter()
                    .enumerate()
                    .map(|(i, q)| format!("{:>3}  {}", i + 1, q))
                    .collect::<Vec<_>>(),
                None => bank.exercise_names().iter().map(|s| s.to_string()).collect(),
            };
            write_output(output, &listing.join("\n"))
        }
        Commands::Format {
            input,
            convention,
            json,
        } => {
            let text = read_input(input.as_deref())?;
            let doc = segment(&text);
            let blocks = render_screen(&doc, convention);
            if json {
                let value = serde_json::json!({ "document": doc, "blocks": blocks });
                write_output(output, &serde_json::to_string_pretty(&value)?)
            } else {
                write_output(output, &screen_to_markdown(&blocks))
            }
        }
        Commands::Export { input, title } => {
            let Some(path) = output else {
                bail!("export writes binary PDF data; pass --output <file>");
            };
            let text = read_input(input.as_deref())?;
            let mut options = config.export.clone();
            if title.is_some() {
                options.title = title;
            }
            let bytes = qbank::export_pdf(&segment(&text), &options)?;
            fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))
        }
        Commands::Plain { input } => {
            let text = read_input(input.as_deref())?;
            write_output(output, &latex_document_to_plain(&text))
        }
        Commands::Classify { input, explain } => {
            let text = read_input(input.as_deref())?;
            let mut lines = Vec::new();
            for line in text.lines() {
                let kind = if looks_like_math(line) { "math " } else { "prose" };
                if explain {
                    let patterns = matching_patterns(line).join("  ");
                    lines.push(format!("{}\t{}\t{}", kind, line, patterns));
                } else {
                    lines.push(format!("{}\t{}", kind, line));
                }
            }
            write_output(output, &lines.join("\n"))
        }
        Commands::Translate { input, lang } => {
            let text = read_input(input.as_deref())?;
            let client = GoogleTranslateClient::new(&config.translation)?;
            let translated = translate_protected(&client, &text, lang.into());
            report_warnings(&translated.warnings);
            write_output(output, &translated.content)
        }
        Commands::Solve { selection, pdf } => {
            let ctx = selection.context()?;
            let completion = OpenAiClient::new(&config.completion)?;
            let translator = match GoogleTranslateClient::new(&config.translation) {
                Ok(client) => Some(client),
                Err(err) => {
                    tracing::debug!(error = %err, "translation disabled");
                    None
                }
            };
            let result = solve(
                &ctx,
                &completion as &dyn CompletionProvider,
                translator.as_ref().map(|t| t as &dyn TranslationProvider),
                &config.completion,
            )?;
            finish(&result, output, pdf.as_deref(), &config)
        }
        Commands::Generate {
            selection,
            difficulty,
            count,
            question_type,
            pdf,
        } => {
            let ctx = selection.context()?;
            let completion = OpenAiClient::new(&config.completion)?;
            let params = GenerateParams {
                question_type,
                difficulty,
                count,
            };
            let result = generate(&ctx, &params, &completion, &config.completion)?;
            finish(&result, output, pdf.as_deref(), &config)
        }
    }
}

impl Selection {
    fn context(&self) -> Result<RequestContext> {
        let bank = load_bank(&self.bank)?;
        let questions = bank.questions_for(&self.exercise)?;
        let mut queue = QuestionQueue::new();
        if self.all {
            for question in &questions {
                queue.select(question.as_str());
            }
        }
        for &number in &self.select {
            let Some(question) = number.checked_sub(1).and_then(|i| questions.get(i)) else {
                bail!(
                    "exercise {} has {} questions, cannot select {}",
                    self.exercise,
                    questions.len(),
                    number
                );
            };
            queue.select(question.as_str());
        }
        Ok(RequestContext::from_queue(&queue, self.lang.into()))
    }
}

fn finish(
    result: &PipelineOutput,
    output: Option<&Path>,
    pdf: Option<&Path>,
    config: &QbankConfig,
) -> Result<()> {
    report_warnings(&result.warnings);
    write_output(output, &result.markdown())?;
    if let Some(path) = pdf {
        let bytes = result.pdf(&config.export)?;
        fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(())
}

fn report_warnings(warnings: &[qbank::PipelineWarning]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

fn load_bank(path: &Path) -> Result<QuestionBank> {
    QuestionBank::load(path).with_context(|| format!("cannot load question bank {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
