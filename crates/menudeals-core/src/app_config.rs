use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Requests each caller identity may make inside one limiter window.
    pub rate_limit_quota: usize,
    pub rate_limit_window_secs: u64,
    /// How often the server sweeps idle identities out of the limiter.
    pub rate_limit_cleanup_secs: u64,
    /// Prefixed onto coupon prices that arrive without a currency symbol.
    pub currency_symbol: String,
    pub max_payload_bytes: usize,
}

impl AppConfig {
    #[must_use]
    pub fn rate_limit_window(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.rate_limit_window_secs)
    }

    #[must_use]
    pub fn rate_limit_cleanup_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.rate_limit_cleanup_secs)
    }
}
