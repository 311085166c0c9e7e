//! Adventure Codex - Entry Point
//!
//! Generates a World State from adventure text, or browses, renders and
//! checks a World State that was exported earlier.

use adventure_codex::core::config::{api_key_from_env, GeneratorConfig, IntegrityPolicy};
use adventure_codex::core::error::{CodexError, Result};
use adventure_codex::export::{read_world_state, write_world_state, DEFAULT_EXPORT_FILE};
use adventure_codex::input::AdventureInput;
use adventure_codex::llm::LlmClient;
use adventure_codex::pipeline::{GenerationSession, Pipeline};
use adventure_codex::presenter::{markdown, Browser, BrowserOutcome};
use adventure_codex::validation::IntegrityValidator;
use adventure_codex::world::WorldState;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Adventure Codex - structured World States for tabletop adventures
#[derive(Parser, Debug)]
#[command(name = "adventure-codex")]
#[command(about = "Generate and browse cross-linked World States from adventure text")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run foundation and expansion over an adventure file
    Generate {
        /// Primary adventure text (.txt or .md)
        #[arg(long, short = 'a')]
        adventure: PathBuf,

        /// Supplementary lore files (.txt or .md), repeatable
        #[arg(long, short = 'l')]
        lore: Vec<PathBuf>,

        /// Where to write the World State JSON
        #[arg(long, short = 'o', default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,

        /// Also write a Markdown rendering here
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// TOML config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Override the model identifier
        #[arg(long)]
        model: Option<String>,

        /// Game system named in the prompts
        #[arg(long)]
        game_system: Option<String>,

        /// Send one corrective request on integrity violations
        #[arg(long)]
        reask: bool,

        /// Open the interactive browser when done
        #[arg(long)]
        browse: bool,
    },

    /// Navigate an exported World State interactively
    Browse {
        /// World State JSON file
        file: PathBuf,
    },

    /// Render an exported World State as Markdown
    Render {
        /// World State JSON file
        file: PathBuf,

        /// Output path; stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check an exported World State for integrity problems
    Validate {
        /// World State JSON file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("adventure_codex=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            adventure,
            lore,
            output,
            markdown: markdown_path,
            config,
            model,
            game_system,
            reask,
            browse,
        } => {
            let mut config = match config {
                Some(path) => GeneratorConfig::load(&path)?,
                None => GeneratorConfig::new(),
            }
            .with_env_overrides();
            if let Some(model) = model {
                config.model = model;
            }
            if game_system.is_some() {
                config.game_system = game_system;
            }
            if reask {
                config.integrity_policy = IntegrityPolicy::Reask;
            }

            // Fatal before any input is read
            let api_key = api_key_from_env()?;
            let client = LlmClient::new(api_key, &config)?;
            let input = AdventureInput::load(&adventure, &lore)?;
            for skipped in &input.skipped {
                println!("Skipped lore file: {}", skipped.display());
            }

            let world = generate(client, &config, &input)?;
            write_world_state(&output, &world)?;
            println!("World State ({}) written to {}", world.counts(), output.display());

            if let Some(path) = markdown_path {
                std::fs::write(&path, markdown::render_document(&world))?;
                println!("Markdown written to {}", path.display());
            }
            if browse {
                browse_loop(&world)?;
            }
            Ok(())
        }
        Command::Browse { file } => browse_loop(&load(&file)?),
        Command::Render { file, output } => {
            let document = markdown::render_document(&load(&file)?);
            match output {
                Some(path) => std::fs::write(path, document)?,
                None => print!("{}", document),
            }
            Ok(())
        }
        Command::Validate { file } => {
            let world = load(&file)?;
            let report = IntegrityValidator::validate(&world);
            println!("{}", world.counts());
            for violation in report.violations() {
                let level = if violation.is_hard() { "error" } else { "warning" };
                println!("{}: {}", level, violation);
            }
            if report.is_valid() {
                println!("OK");
                Ok(())
            } else {
                Err(CodexError::Integrity(report.hard_summary()))
            }
        }
    }
}

fn generate(
    client: LlmClient,
    config: &GeneratorConfig,
    input: &AdventureInput,
) -> Result<WorldState> {
    let rt = tokio::runtime::Runtime::new()?;
    let pipeline = Pipeline::from_config(client, config);
    let mut session = GenerationSession::new();

    println!("Generating world state with {}...", pipeline.generator().model());
    rt.block_on(session.run(&pipeline, input));
    session.into_result()
}

fn load(path: &Path) -> Result<WorldState> {
    let world = read_world_state(path)?;
    tracing::info!(path = %path.display(), counts = %world.counts(), "world state loaded");
    Ok(world)
}

fn browse_loop(world: &WorldState) -> Result<()> {
    let mut browser = Browser::new(world);

    println!("\n=== {} ===", world.counts());
    println!("{}", browser.current_view());
    println!("Type 'help' for commands.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match browser.execute_line(&line) {
            BrowserOutcome::Output(text) => println!("{}", text),
            BrowserOutcome::Quit => break,
        }
    }
    Ok(())
}
