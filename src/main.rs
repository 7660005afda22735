//! Query Chat terminal driver
//!
//! Each stdin line is one `Enter` keystroke in the widget's input. Bubbles
//! are streamed to stdout as HTML; logs go to stderr.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::io;

use clap::error::ErrorKind;
use dotenvy::dotenv;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use query_chat::client::HttpAskClient;
use query_chat::config::{AppConfig, cli_error};
use query_chat::render::{page_footer, page_header};
use query_chat::widget::{ChatWidget, ENTER, KeyPress, TextInput, TranscriptLog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // --help / --version print through clap and exit 0
            if let Some(cli) = cli_error(&e) {
                if matches!(cli.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                    cli.exit();
                }
            }
            return Err(e.into());
        }
    };
    let backend = HttpAskClient::from_config(&config.backend)?;
    let ask_url = backend.ask_url()?;

    info!(
        name: "backend.config.loaded",
        ask_url = %ask_url,
        timeout_secs = config.backend.timeout_secs,
        "Backend configuration loaded"
    );

    // Runs in the background; a silent backend must not delay the first keystroke.
    let health_client = backend.clone();
    tokio::spawn(async move {
        match health_client.health().await {
            Ok(status) => info!(name: "backend.health", status = %status, "Backend reachable"),
            Err(e) => warn!(name: "backend.health", error = %e, "Backend health check failed"),
        }
    });

    let widget = ChatWidget::new(TextInput::new(), TranscriptLog::new(io::stdout()), backend);
    if config.widget.page {
        widget.log().write_raw(&page_header(&config.widget.title))?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = FuturesUnordered::new();
    let mut stdin_open = true;

    // Keystrokes and replies interleave on this task; nothing waits for a
    // reply before accepting the next line.
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    widget.input().set_value(line);
                    let mut event = KeyPress::new(ENTER);
                    if let Some(dispatch) = widget.on_key_press(&mut event) {
                        in_flight.push(dispatch);
                    }
                }
                None => {
                    debug!(name: "input.closed", pending = in_flight.len(), "Input closed");
                    stdin_open = false;
                }
            },
            Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                // Failures are already rendered and logged by the widget.
                if let Ok(outcome) = result {
                    debug!(name: "dispatch.done", dispatch_id = outcome.dispatch_id, "Dispatch done");
                }
            }
            else => break,
        }
    }

    if config.widget.page {
        widget.log().write_raw(page_footer())?;
    }

    Ok(())
}
