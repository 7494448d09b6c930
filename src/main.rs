use std::sync::Arc;

use learning_intake::cli;
use learning_intake::config::IntakeConfig;
use learning_intake::intake::{IntakeSession, JsonProfileWriter, TranscriptLog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = IntakeConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    eprintln!("📚 Learning Intake v{}", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = config.transcript_log {
        eprintln!("   Transcript log: {}", path.display());
    }
    match config.profile_output {
        Some(ref path) => eprintln!("   Profile output: {}", path.display()),
        None => eprintln!("   Profile output: stdout"),
    }
    eprintln!("   Answer each question and press Enter. Ctrl-D to quit.");

    let handler = Arc::new(JsonProfileWriter::new(config.profile_output.clone()));
    let mut session = IntakeSession::new(handler);
    if let Some(path) = config.transcript_log.clone() {
        session = session.with_log(TranscriptLog::new(path));
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stderr = std::io::stderr();
    match cli::run(&session, stdin, &mut stderr).await? {
        Some(_) => {
            tracing::info!(session = %session.id(), "Intake finished");
        }
        None => {
            eprintln!("\nIntake ended before completion.");
        }
    }

    Ok(())
}
