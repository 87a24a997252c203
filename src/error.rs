//! Error types for the Scrappey client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrappeyError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("command (cmd) is required, examples: request.get, request.post, sessions.create, sessions.destroy")]
    MissingCommand,

    #[error("failed to encode request envelope: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("request to Scrappey API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode Scrappey API response: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScrappeyError>;
