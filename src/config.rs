use std::env;

const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Runtime configuration, read from the environment after dotenv loading.
#[derive(Clone, Debug)]
pub struct Config {
    pub endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        let endpoint = env::var("PAPYRUS_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self { endpoint }
    }
}
