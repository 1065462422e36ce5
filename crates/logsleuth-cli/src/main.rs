use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use logsleuth_agent::{AgentConfig, LogAgent, SystemPromptSource};
use logsleuth_llm::GeminiProvider;
use logsleuth_tools::{log_tools, ops_tools};

/// AI-powered log analysis for operators.
#[derive(Debug, Parser)]
#[command(name = "logsleuth", version, about)]
struct Cli {
    /// Directory containing the .log files to analyze
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Gemini model to use
    #[arg(long)]
    model: Option<String>,

    /// File to read the system prompt from
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    /// Session identifier for conversation memory
    #[arg(long, default_value = "default")]
    session: String,

    /// Enable the Kubernetes restart tool
    #[arg(long)]
    with_k8s: bool,

    /// Maximum model/tool round-trips per question
    #[arg(long)]
    max_iterations: Option<u32>,
}

fn print_banner(with_k8s: bool) {
    println!("{}", "=".repeat(60));
    println!("logsleuth - AI Log Analyzer");
    println!("{}", "=".repeat(60));
    println!();
    println!("Capabilities:");
    println!("  - Read and analyze log files");
    println!("  - Answer questions about errors and patterns");
    println!("  - Maintain conversation context");
    if with_k8s {
        println!("  - Restart failed Kubernetes pods (asks for confirmation)");
    }
    println!();
    println!("Commands:");
    println!("  'quit' or 'exit' - Exit the program");
    println!("  'clear' - Clear conversation history");
    println!("  'help' - Show available commands");
    println!("{}", "=".repeat(60));
    println!();
}

fn print_help() {
    println!();
    println!("Available commands:");
    println!("  quit/exit  - Exit the program");
    println!("  clear      - Clear conversation history");
    println!("  help       - Show this help message");
    println!();
    println!("Example questions:");
    println!("  - What log files are available?");
    println!("  - Read the app.log file");
    println!("  - What errors are in app.log?");
    println!("  - Search for 'ERROR' in app.log");
    println!("  - When did the database connection fail?");
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "logsleuth=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AgentConfig::from_env().context("configuration failed")?;
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(path) = cli.prompt_file {
        config.system_prompt = SystemPromptSource::File(path);
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }
    config.validate().context("configuration failed")?;

    let tools = if cli.with_k8s {
        ops_tools(&config.log_dir, config.namespace.clone())
    } else {
        log_tools(&config.log_dir)
    };

    let llm = GeminiProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        config.temperature,
    );

    let agent = LogAgent::builder()
        .llm(Arc::new(llm))
        .tools(Arc::new(tools))
        .system_prompt(config.system_prompt.resolve()?)
        .max_iterations(config.max_iterations)
        .build()?;

    info!(model = %config.model, log_dir = %config.log_dir.display(), "Agent ready");

    print_banner(cli.with_k8s);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("\nGoodbye!");
                break;
            }
            "clear" => {
                agent.clear_session(&cli.session).await?;
                println!("\nConversation history cleared.\n");
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        let response = agent.process(input, &cli.session).await;
        println!("\nAgent: {}\n", response);
    }

    Ok(())
}
