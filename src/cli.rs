//! Command-line interface definitions for the FlashPress News backend.
//!
//! All arguments can be provided via command-line flags or environment
//! variables. A `.env` file in the working directory is loaded before parsing.

use clap::Parser;

/// Command-line arguments for the server.
///
/// Flags override values from the YAML config file.
///
/// # Examples
///
/// ```sh
/// # Defaults, keys from the environment
/// flashpress_news
///
/// # Explicit config file and port
/// flashpress_news -c ./config.yaml -p 8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, env = "FLASHPRESS_CONFIG")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Hugging Face token used for summarization and chat
    #[arg(long, env = "HUGGINGFACE_API_KEY", hide_env_values = true)]
    pub huggingface_api_key: Option<String>,

    /// newsdata.io API key
    #[arg(long, env = "NEWSDATA_API_KEY", hide_env_values = true)]
    pub newsdata_api_key: Option<String>,

    /// YouTube Data API key, enables the metadata fallback for videos without transcripts
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,
}
