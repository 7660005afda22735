use std::path::Path;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::client::DEFAULT_ASK_PATH;

/// Backend URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "query-chat.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the query backend
    #[arg(long, env = "ASK_BASE_URL")]
    pub base_url: Option<String>,

    /// Path of the query endpoint
    #[arg(long)]
    pub ask_path: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Wrap the transcript in a full HTML page
    #[arg(long)]
    pub page: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub ask_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub title: String,
    pub page: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Priority: CLI flag > CLI env var > `QUERY_CHAT_` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Foreign(Box::new(e)))?;

        let mut builder = Config::builder()
            .set_default("backend.base_url", DEFAULT_BASE_URL)?
            .set_default("backend.ask_path", DEFAULT_ASK_PATH)?
            .set_default("backend.timeout_secs", 60)?
            .set_default("widget.title", "Assistant")?
            .set_default("widget.page", false)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
        }

        // E.g. QUERY_CHAT_BACKEND__BASE_URL=http://backend:8080
        builder = builder.add_source(
            Environment::with_prefix("QUERY_CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = cli.base_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(path) = cli.ask_path {
            builder = builder.set_override("backend.ask_path", path)?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("backend.timeout_secs", secs)?;
        }
        if cli.page {
            builder = builder.set_override("widget.page", true)?;
        }

        builder.build()?.try_deserialize()
    }
}

/// The clap error behind a failed load, when argument parsing was the cause.
///
/// `--help` and `--version` surface here as `DisplayHelp` / `DisplayVersion`.
pub fn cli_error(err: &ConfigError) -> Option<&clap::Error> {
    match err {
        ConfigError::Foreign(e) => e.downcast_ref::<clap::Error>(),
        _ => None,
    }
}
