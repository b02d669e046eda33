use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use portal_quiz::config::{Config, Overrides};
use portal_quiz::{HttpQuizApi, PortalError, QuizApi, format, logging};

#[derive(Parser, Debug)]
#[command(version, about = "Take student-portal quizzes from the terminal", long_about = None)]
struct Args {
    /// Base URL of the portal API (overrides PORTAL_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token of the signed-in student (overrides PORTAL_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Per-request timeout in seconds (overrides PORTAL_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Directory for log files (overrides PORTAL_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the quizzes available to the student
    List,
    /// Open the interactive quiz screen (default)
    Tui,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), PortalError> {
    let config = Config::from_env(Overrides {
        api_url: args.api_url,
        token: args.token,
        timeout_secs: args.timeout,
        log_dir: args.log_dir,
    })?;
    let _log_guard = logging::init(&config);
    tracing::info!(api_url = %config.api_url, timeout = ?config.timeout, "starting");

    let api = Arc::new(HttpQuizApi::from_config(&config)?);

    match args.command.unwrap_or(Command::Tui) {
        Command::List => print_catalog(api.as_ref()).await,
        Command::Tui => portal_quiz::run_tui(api).await,
    }
}

async fn print_catalog(api: &HttpQuizApi) -> Result<(), PortalError> {
    let quizzes = api.list_quizzes().await?;
    if quizzes.is_empty() {
        println!("No quizzes right now.");
        return Ok(());
    }

    for quiz in quizzes {
        println!(
            "{:<12} {:<40} {:<10} {:>3} min  {}  pass at {}",
            quiz.id,
            format::truncate(&quiz.title, 40),
            quiz.status.label(),
            quiz.duration,
            format::plural(quiz.question_count, "question", "questions"),
            format::percentage(f64::from(quiz.passing_score)),
        );
    }
    Ok(())
}
