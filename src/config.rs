//! Environment-driven server configuration.

use std::env;

/// Server settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    #[allow(dead_code)]
    pub cors_origins: Vec<String>,
    /// Channel names clients are allowed to join, in display order.
    pub channels: Vec<String>,
    /// Upper bound on the session lookup at connect time.
    pub auth_timeout_ms: u64,
    /// `token:username` pairs seeding the session store.
    pub session_seeds: Vec<(String, String)>,
    pub log_level: String,
}

impl Config {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            channels: env::var("ALLOWED_CHANNELS")
                .unwrap_or_else(|_| "geral,musica".to_string())
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            auth_timeout_ms: env::var("AUTH_TIMEOUT_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            session_seeds: parse_session_seeds(
                &env::var("SESSION_TOKENS").unwrap_or_default(),
            ),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Whether `name` is one of the configured channel rooms.
    pub fn is_allowed_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c == name)
    }
}

/// Parse `token:username` pairs from a comma-separated list.
fn parse_session_seeds(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            pair.split_once(':')
                .map(|(token, user)| (token.trim().to_string(), user.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_channels(channels: &[&str]) -> Config {
        Config {
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_origins: vec![],
            channels: channels.iter().map(|s| s.to_string()).collect(),
            auth_timeout_ms: 1000,
            session_seeds: vec![],
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn allowed_channel_lookup() {
        let config = config_with_channels(&["geral", "musica"]);
        assert!(config.is_allowed_channel("geral"));
        assert!(config.is_allowed_channel("musica"));
        assert!(!config.is_allowed_channel("segredo"));
    }

    #[test]
    fn session_seed_parsing() {
        let seeds = parse_session_seeds("tok1:alice, tok2:bob");
        assert_eq!(
            seeds,
            vec![
                ("tok1".to_string(), "alice".to_string()),
                ("tok2".to_string(), "bob".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_session_seeds_are_skipped() {
        assert!(parse_session_seeds("").is_empty());
        assert_eq!(parse_session_seeds("no-colon,tok:carol").len(), 1);
    }
}
