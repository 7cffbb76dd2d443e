//! Interactive terminal client for a noochat webhook assistant.

use clap::Parser;
use noochat_core::ChatError;
use noochat_engine::{ChatEngine, EngineConfig, Typewriter};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "noochat", about = "noochat — terminal chat over an automation webhook")]
struct Cli {
    /// Webhook endpoint for text messages
    #[arg(long)]
    webhook_url: String,

    /// Stage tag identifying the conversational flow
    #[arg(long, default_value = "main_chat")]
    stage: String,

    /// Numeric agent id, for flows addressing a named agent
    #[arg(long)]
    agent_id: Option<i64>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 12_000)]
    timeout_ms: u64,

    /// Typewriter reveal delay per character in milliseconds (0 disables)
    #[arg(long, default_value_t = 15)]
    reveal_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::new(cli.webhook_url, cli.stage)
        .with_timeout(Duration::from_millis(cli.timeout_ms));
    if let Some(agent_id) = cli.agent_id {
        config = config.with_agent_id(agent_id);
    }

    let engine = ChatEngine::new(config);
    info!(session_id = %engine.session_id(), "session started");

    let mut typewriter = Typewriter::new(Duration::from_millis(cli.reveal_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let utterance = line.trim();
        if utterance.is_empty() || utterance == "/quit" {
            if utterance == "/quit" {
                break;
            }
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        match engine.send_text(utterance).await {
            Ok(reply) => {
                print_reply(&mut typewriter, &mut stdout, &reply.body, cli.reveal_ms).await?;
                let replies = engine.quick_replies();
                if !replies.is_empty() {
                    stdout.write_all(b"\n").await?;
                    for (i, chip) in replies.iter().enumerate() {
                        stdout
                            .write_all(format!("  [{}] {}\n", i + 1, chip.text).as_bytes())
                            .await?;
                    }
                }
            }
            Err(ChatError::Busy) => {
                stdout
                    .write_all("(ассистент ещё отвечает, подождите)\n".as_bytes())
                    .await?;
            }
            Err(e) => {
                stdout.write_all(format!("error: {e}\n").as_bytes()).await?;
            }
        }

        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Prints the reply, typewriter-revealed unless disabled.
async fn print_reply(
    typewriter: &mut Typewriter,
    stdout: &mut tokio::io::Stdout,
    body: &str,
    reveal_ms: u64,
) -> Result<(), ChatError> {
    if reveal_ms == 0 {
        stdout.write_all(body.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        return Ok(());
    }

    let mut rx = typewriter.reveal(body);
    let mut shown = 0usize;
    while let Some(prefix) = rx.recv().await {
        // Each prefix extends the previous one; print only the new tail.
        stdout.write_all(prefix[shown..].as_bytes()).await?;
        stdout.flush().await?;
        shown = prefix.len();
    }
    stdout.write_all(b"\n").await?;
    Ok(())
}
