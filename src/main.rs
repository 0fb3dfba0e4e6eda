use std::io::{self, BufRead, Write};

use clap::Parser;

use chatbridge::config::{load_config, AppConfig};
use chatbridge::models::ModelCatalog;
use chatbridge::observability::init_tracing;
use chatbridge::{LineParser, StreamProcessor};

const CONFIG_ENV: &str = "CHATBRIDGE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Normalize an OpenAI-compatible stream read from stdin into JSON chunks.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Treat lines as legacy completion responses.
    #[arg(long)]
    completion: bool,

    /// Model that produced the stream; completion models switch to completion mode.
    #[arg(long)]
    model: Option<String>,
}

fn main() {
    let args = CliArgs::parse();
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration from '{path}': {e}");
        eprintln!("Please copy 'config.example.yaml' to 'config.yaml' and modify as needed.");
        std::process::exit(1);
    });

    init_tracing(&config.features.log_level);

    if let Err(e) = run(&config, &args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &AppConfig, args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ModelCatalog::new(&config.models);
    let is_completion = args.completion
        || args
            .model
            .as_deref()
            .is_some_and(|model| catalog.is_completion_model(model));

    let mut processor = StreamProcessor::new(LineParser::new(&config.stream), is_completion);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        match processor.feed_line(&line) {
            Ok(Some(chunk)) => {
                serde_json::to_writer(&mut out, &chunk)?;
                out.write_all(b"\n")?;
            }
            Ok(None) => {}
            Err(err) if err.is_terminal() => return Err(err.into()),
            Err(err) => tracing::debug!(error = %err, "skipping undecodable stream line"),
        }
    }
    out.flush()?;

    let response = processor.finish();
    tracing::info!(
        chunks = response.chunks,
        skipped = response.skipped_lines,
        tool_calls = response.tool_calls.len(),
        content_len = response.content.len(),
        completion = is_completion,
        "stream complete"
    );
    Ok(())
}
