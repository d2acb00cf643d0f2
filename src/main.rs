use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use gemchat::app;
use gemchat::config::Config;

#[derive(Parser)]
#[command(name = "gemchat")]
#[command(version)]
#[command(about = "Terminal chat for the Gemini generative language API", long_about = None)]
struct Cli {
    /// Model to send prompts to (overrides config.toml)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    let _log_guard = init_logging(&config.home);

    app::run(config).await
}

/// Log to a file under the gemchat home directory; writing to the terminal
/// would corrupt the alternate screen.
fn init_logging(home: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(home, "gemchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gemchat=info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}
