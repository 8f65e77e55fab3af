mod command;
mod render;

use std::io::Write as _;
use std::sync::Arc;

use services::{OpenTdbClient, ProviderConfig, QuizSessionController, Transition};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use command::Command;

fn init_tracing() {
    // Logs go to stderr so they never interleave with the quiz on stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ProviderConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "using trivia provider");
    let provider = Arc::new(OpenTdbClient::new(config)?);
    let mut controller = QuizSessionController::new(provider);

    // A failed category load is non-fatal; the snapshot carries the error.
    let _ = controller.load_categories().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        let snapshot = controller.snapshot();
        write!(stdout, "\n{}> ", render::render(&snapshot))?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line, &snapshot) {
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };

        let transition = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(stdout, "{}", render::help(snapshot.phase))?;
                continue;
            }
            Command::Start => match controller.start().await {
                Ok(transition) => transition,
                // Recorded in the snapshot and rendered on the next pass.
                Err(_) => continue,
            },
            Command::Intent(intent) => controller.dispatch(intent),
        };

        if let Transition::Rejected(reason) = transition {
            writeln!(stdout, "{reason}")?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
