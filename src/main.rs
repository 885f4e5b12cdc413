// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use translai::app_config::{self, Config, TranslationProvider};
use translai::app_controller::{diagnostic_markup, Controller};
use translai::database::SqliteStore;
use translai::errors::AppError;
use translai::glossary::{classify, CommandOutcome, CurationCommand, Curator};
use translai::page::{FixedPrompt, FixedSelection, StaticPage, StdoutClipboard, TerminalPrompt, TextPrompt};
use translai::providers;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Anthropic,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for CurationCommand to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliCurationCommand {
    Promote,
    Check,
    Rename,
    Delete,
    Copy,
}

impl From<CliCurationCommand> for CurationCommand {
    fn from(cli_command: CliCurationCommand) -> Self {
        match cli_command {
            CliCurationCommand::Promote => CurationCommand::Promote,
            CliCurationCommand::Check => CurationCommand::MarkChecked,
            CliCurationCommand::Rename => CurationCommand::Rename,
            CliCurationCommand::Delete => CurationCommand::Delete,
            CliCurationCommand::Copy => CurationCommand::Copy,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a book page's title and synopsis
    Book(BookArgs),

    /// Translate a chapter and annotate the names it contains
    Chapter(ChapterArgs),

    /// List the glossary of a work with conflict states
    Names {
        /// Book or chapter URL of the work
        url: String,
    },

    /// Run a curation command on one name and re-render the chapter
    Curate(CurateArgs),

    /// Generate shell completions for translai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct BookArgs {
    /// Book page URL
    url: String,

    /// Untranslated title
    #[arg(long)]
    title: String,

    /// File holding the untranslated synopsis
    #[arg(long, value_name = "FILE")]
    synopsis: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ChapterArgs {
    /// Chapter page URL
    url: String,

    /// File holding the untranslated chapter body
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output base name; writes OUT.html and OUT.txt
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CurateArgs {
    /// Chapter page URL
    url: String,

    /// Command to run
    #[arg(value_enum)]
    command: CliCurationCommand,

    /// Original form of the selected name
    original: String,

    /// Plain translated chapter written by `translai chapter`
    #[arg(long, value_name = "TXT")]
    translated: PathBuf,

    /// New translated form for `rename` (prompted when omitted)
    #[arg(long, value_name = "NEW")]
    to: Option<String>,

    /// Output base name; defaults to the translated file without extension
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
}

/// TranslAI - name-aware web novel translation
#[derive(Parser, Debug)]
#[command(name = "translai")]
#[command(version)]
#[command(about = "LLM translation of web novels with a curated name glossary")]
#[command(long_about = "TranslAI translates web novel pages with an LLM and keeps a glossary of
proper nouns so names stay consistent across chapters.

EXAMPLES:
    translai chapter https://www.69shuba.com/txt/58127/1 ch1.txt
    translai names https://www.69shuba.com/book/58127.htm
    translai curate https://www.69shuba.com/txt/58127/1 promote 李明 --translated ch1.translated.txt
    translai curate https://www.69shuba.com/txt/58127/1 rename 李明 --to 'Lee Ming' --translated ch1.translated.txt
    translai book https://www.69shuba.com/book/58127.htm --title 书名 --synopsis synopsis.txt
    translai completions bash > translai.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation; filtering follows `log::max_level`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

type CliController = Controller<SqliteStore, TerminalPrompt>;

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "translai", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let store = open_store(&config)?;
    let provider = providers::from_config(&config.translation);
    info!("Using {} ({})", provider.name(), config.translation.get_model());
    let controller = Controller::new(config, provider, Arc::new(store), TerminalPrompt);

    match cli.command {
        Commands::Book(args) => run_book(&controller, args).await,
        Commands::Chapter(args) => run_chapter(&controller, args).await,
        Commands::Names { url } => run_names(&controller, &url).await,
        Commands::Curate(args) => run_curate(&controller, args).await,
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.translation.set_model(model);
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(LevelFilter::from(&config.log_level));
    Ok(config)
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = match &config.storage.path {
        Some(path) => path.clone(),
        None => SqliteStore::default_path()?,
    };
    info!("Glossary database: {:?}", path);
    SqliteStore::open(&path).with_context(|| format!("Failed to open database {:?}", path))
}

async fn run_book(controller: &CliController, args: BookArgs) -> Result<()> {
    let synopsis = read_text(&args.synopsis)?;
    let mut page = StaticPage::book(args.title, synopsis);

    let text = match controller.translate_book(&args.url, &mut page).await {
        Ok(()) => format!(
            "{}\n\n{}\n",
            page.title.unwrap_or_default(),
            page.synopsis.unwrap_or_default()
        ),
        Err(e) => return Err(report_failure(&e, args.output.as_deref())),
    };

    match args.output {
        Some(path) => write_text(&path, &text),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

async fn run_chapter(controller: &CliController, args: ChapterArgs) -> Result<()> {
    let body = read_text(&args.input)?;
    let base = args
        .output
        .unwrap_or_else(|| args.input.with_extension("translated"));
    let html = with_suffix(&base, "html");
    let mut page = StaticPage::chapter(body);

    let session = match controller.translate_chapter(&args.url, &mut page).await {
        Ok(session) => session,
        Err(e) => return Err(report_failure(&e, Some(&html))),
    };

    write_text(&html, page.body_markup.as_deref().unwrap_or_default())?;
    write_text(&with_suffix(&base, "txt"), session.translated_text())?;
    info!(
        "Wrote {:?} ({} local, {} global names)",
        html,
        session.glossary().local_pairs().len(),
        session.glossary().global_pairs().len()
    );
    Ok(())
}

async fn run_names(controller: &CliController, url: &str) -> Result<()> {
    let glossary = controller.open_glossary(url).await?;
    let globals = glossary.global_pairs();

    for pair in glossary.effective_pairs() {
        let scope = glossary
            .scope_of(&pair.original)
            .map(|scope| scope.to_string())
            .unwrap_or_default();
        let state = classify(&pair, globals).to_string();
        println!("{:<6} {:<16} {}", scope, state, pair);
    }
    Ok(())
}

async fn run_curate(controller: &CliController, args: CurateArgs) -> Result<()> {
    let translated = read_text(&args.translated)?;
    let base = args
        .output
        .unwrap_or_else(|| args.translated.with_extension(""));

    let prompt: Box<dyn TextPrompt> = match args.to.as_deref() {
        Some(answer) => Box::new(FixedPrompt::new(Some(answer))),
        None => Box::new(TerminalPrompt),
    };
    let clipboard = StdoutClipboard;
    let curator = Curator::new(prompt.as_ref(), &clipboard);

    let mut session = controller.resume_chapter(&args.url, translated).await?;
    let mut page = StaticPage::default();
    let selection = FixedSelection(Some(args.original.clone()));

    let outcome = session
        .apply_command(args.command.into(), &selection, &curator, &mut page)
        .await?;

    match outcome {
        CommandOutcome::NoSelection => {
            return Err(anyhow!("'{}' is not in the glossary", args.original));
        }
        CommandOutcome::Unchanged | CommandOutcome::Copied(_) => {}
        CommandOutcome::Updated => {
            write_text(&with_suffix(&base, "html"), page.body_markup.as_deref().unwrap_or_default())?;
            write_text(&with_suffix(&base, "txt"), session.translated_text())?;
        }
    }
    info!("{:?}", outcome);
    Ok(())
}

/// Log a failed page load and put the diagnostic where the output would go
fn report_failure(err: &AppError, target: Option<&Path>) -> anyhow::Error {
    error!("{}", err);
    let markup = diagnostic_markup(err);
    match target {
        Some(path) => {
            if let Err(write_error) = write_text(path, &markup) {
                error!("{:#}", write_error);
            }
        }
        None => println!("{}", markup),
    }
    anyhow!("Page load failed: {}", err)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
