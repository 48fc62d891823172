use std::net::SocketAddr;
use std::time::Duration;

/// Runtime configuration for the quiz server
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Base URL of the Open Trivia Database
    pub opentdb_base_url: String,
    /// Timeout for a single question fetch
    pub fetch_timeout: Duration,
    /// How long answer feedback stays on screen before advancing
    pub feedback_delay: Duration,
    /// Directory with the static frontend
    pub static_dir: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            opentdb_base_url: "https://opentdb.com".to_string(),
            fetch_timeout: Duration::from_secs(10),
            feedback_delay: Duration::from_millis(2000),
            static_dir: "static".to_string(),
        }
    }
}

/// Read a trimmed, non-empty env var
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl QuizConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match env_var("QUIZ_BIND_ADDR") {
            Some(addr) => addr.parse().unwrap_or_else(|e| {
                tracing::warn!("Invalid QUIZ_BIND_ADDR '{}': {}, using default", addr, e);
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        Self {
            bind_addr,
            opentdb_base_url: env_var("OPENTDB_BASE_URL").unwrap_or(defaults.opentdb_base_url),
            fetch_timeout: env_var("QUIZ_FETCH_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&secs: &u64| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            feedback_delay: env_var("QUIZ_FEEDBACK_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.feedback_delay),
            static_dir: env_var("QUIZ_STATIC_DIR").unwrap_or(defaults.static_dir),
        }
    }
}
