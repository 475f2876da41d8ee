//! feedfilter 命令行入口
//!
//! 对保存下来的页面快照执行一次过滤，或读写设置存储（启用状态、关键词）。

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use feedfilter::config::{load_filter_config, ConfigManager, FilterConfig};
use feedfilter::env::EnvConfig;
use feedfilter::parsers::{html_to_dom, serialize_document, OutputOptions};
use feedfilter::pipeline::{
    format_keywords, parse_keywords, validate_keywords, FilterController, KeywordSet, Locator,
    NoopReporter,
};
use feedfilter::runtime::startup;
use feedfilter::storage::{JsonFileStore, MemoryStore, SettingsStore, StoredSettings};
use feedfilter::{EngineState, FilterError, FilterResult};

#[derive(Parser, Debug)]
#[command(
    name = "feedfilter",
    version,
    about = "Hide social-feed posts that don't match your keywords"
)]
struct Cli {
    /// Settings store path (JSON)
    #[arg(short, long, global = true)]
    settings: Option<String>,

    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one filter pass over a saved page and write the annotated HTML
    Filter {
        /// Input HTML file, or "-" for stdin
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Use keywords from this file (one per line) instead of the store
        #[arg(short, long)]
        keywords_file: Option<String>,

        /// Charset of the input document
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,

        /// Don't inject the stylesheet that hides filtered posts
        #[arg(long)]
        no_style: bool,
    },
    /// Print the stored filter status
    Status,
    /// Enable filtering
    Enable,
    /// Disable filtering
    Disable,
    /// Show or change the keyword list
    Keywords {
        #[command(subcommand)]
        action: KeywordAction,
    },
    /// Print documentation for environment variables
    EnvDocs,
    /// Write an example config file with the default settings
    InitConfig { path: String },
}

#[derive(Subcommand, Debug)]
enum KeywordAction {
    /// Print the keyword list, one per line
    Show,
    /// Replace the keyword list with the lines of a file ("-" for stdin)
    Set { file: String },
    /// Restore the built-in keyword list
    Reset,
}

fn main() {
    let cli = Cli::parse();
    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    init_tracing(&env_config);

    if let Err(e) = run(cli, &env_config) {
        eprintln!("Error: {}", e);
        process::exit(if e.is_user_error() { 2 } else { 1 });
    }
}

fn init_tracing(env_config: &EnvConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_config.effective_log_level()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, env_config: &EnvConfig) -> FilterResult<()> {
    let config = match &cli.config {
        Some(path) => ConfigManager::from_file(path, env_config)?.into_config(),
        None => load_filter_config(env_config),
    };

    let settings_path = cli.settings.clone().unwrap_or_else(|| config.settings_path());
    let store = JsonFileStore::new(&settings_path);

    match cli.command {
        Commands::Filter {
            input,
            output,
            keywords_file,
            encoding,
            no_style,
        } => filter_snapshot(
            &config,
            &store,
            env_config,
            &input,
            output.as_deref(),
            keywords_file.as_deref(),
            &encoding,
            no_style,
        ),
        Commands::Status => {
            let state = EngineState::from_settings(&store.load()?);
            println!("enabled: {}", state.enabled);
            println!("keywords: {}", state.keywords.len());
            println!("settings: {}", store.path().display());
            Ok(())
        }
        Commands::Enable => {
            store.update(|s| s.enabled = Some(true))?;
            println!("Filter enabled");
            Ok(())
        }
        Commands::Disable => {
            store.update(|s| s.enabled = Some(false))?;
            println!("Filter disabled");
            Ok(())
        }
        Commands::Keywords { action } => match action {
            KeywordAction::Show => {
                let state = EngineState::from_settings(&store.load()?);
                println!("{}", format_keywords(state.keywords.as_slice()));
                Ok(())
            }
            KeywordAction::Set { file } => {
                let keywords = parse_keywords(&read_text(&file)?);
                validate_keywords(&keywords)?;
                let count = keywords.len();
                store.update(|s| s.keywords = Some(keywords))?;
                println!("Keywords saved ({})", count);
                Ok(())
            }
            KeywordAction::Reset => {
                let defaults = KeywordSet::defaults();
                store.update(|s| s.keywords = Some(defaults.as_slice().to_vec()))?;
                println!("Keywords reset to default");
                Ok(())
            }
        },
        Commands::EnvDocs => {
            print!("{}", feedfilter::env::generate_env_docs());
            Ok(())
        }
        Commands::InitConfig { path } => {
            ConfigManager::generate_example_config(&path)?;
            println!("Example config written to {}", path);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn filter_snapshot(
    config: &FilterConfig,
    store: &JsonFileStore,
    env_config: &EnvConfig,
    input: &str,
    output: Option<&str>,
    keywords_file: Option<&str>,
    encoding: &str,
    no_style: bool,
) -> FilterResult<()> {
    let data = read_bytes(input)?;
    let dom = html_to_dom(&data, encoding)?;

    // 命令行和环境变量的覆盖只作用于本次运行，不写回存储
    let mut settings: StoredSettings = store.load()?;
    if let Some(path) = keywords_file {
        let keywords = parse_keywords(&read_text(path)?);
        validate_keywords(&keywords)?;
        settings.keywords = Some(keywords);
    }
    if let Some(enabled) = env_config.enabled {
        settings.enabled = Some(enabled);
    }

    let mut controller = FilterController::new(
        dom.document.clone(),
        Locator::new(config.locator.clone()),
        Box::new(NoopReporter),
    );
    let state = startup(&MemoryStore::new(settings), &mut controller);

    let options = OutputOptions {
        inject_hidden_style: !no_style,
        ..OutputOptions::default()
    };
    let result = serialize_document(&dom, encoding, &options)?;

    match output {
        Some(path) if path != "-" => fs::write(path, result)?,
        _ => io::stdout().write_all(&result)?,
    }

    let stats = controller.last_pass();
    eprintln!(
        "posts: {}, hidden: {}{}",
        stats.located,
        state.hidden_count,
        if state.enabled { "" } else { " (filter disabled)" }
    );
    Ok(())
}

fn read_bytes(path: &str) -> FilterResult<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read(path)?)
    }
}

fn read_text(path: &str) -> FilterResult<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| FilterError::ParseError(format!("{}: {}", path, e)))
}
