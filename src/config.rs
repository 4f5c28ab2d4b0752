//! Command line and environment configuration for the server.

use std::time::Duration;

use clap::Parser;

use crate::api::DEFAULT_API_URL;

/// The web dashboard for the BMS financial records backend.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The base URL of the backend REST API.
    #[arg(long, env = "BMS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// The port to serve the dashboard from.
    #[arg(short, long, env = "BMS_PORT", default_value_t = 3000)]
    pub port: u16,

    /// The canonical name of the local timezone, e.g. "Asia/Kolkata".
    ///
    /// Used to pick the default date on the record forms.
    #[arg(long, env = "BMS_TIMEZONE", default_value = "Etc/UTC")]
    pub timezone: String,

    /// How long to wait for the backend before giving up on a request.
    #[arg(long, env = "BMS_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// How many records pages to keep table state for at once.
    #[arg(long, env = "BMS_MAX_VIEWS", default_value_t = 256)]
    pub max_views: usize,
}

impl Config {
    /// The backend request timeout as a [Duration].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::api::DEFAULT_API_URL;

    use super::Config;

    #[test]
    fn parses_arguments() {
        let config = Config::try_parse_from([
            "server",
            "--api-url",
            "http://backend:8000/api/v1",
            "--port",
            "8080",
            "--timezone",
            "Asia/Kolkata",
            "--max-views",
            "16",
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://backend:8000/api/v1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.timezone, "Asia/Kolkata");
        assert_eq!(config.max_views, 16);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn falls_back_to_defaults() {
        // Only valid when none of the BMS_* variables are set in the test environment.
        if std::env::vars().any(|(key, _)| key.starts_with("BMS_")) {
            return;
        }

        let config = Config::try_parse_from(["server"]).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.timezone, "Etc/UTC");
    }
}
