use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_SESSION_FILE: &str = ".desapega-session.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            api_url: env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE)),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
