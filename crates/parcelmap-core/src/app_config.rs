use std::net::SocketAddr;
use std::path::PathBuf;

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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub sources_path: PathBuf,
    pub saved_path: PathBuf,
    /// Indirection prefix the percent-encoded target URL is appended to.
    /// `None` means requests go straight to the target service.
    pub proxy_url: Option<String>,
    pub user_agent: String,
    pub taxlot_timeout_ms: u64,
    pub reverse_geocode_timeout_ms: u64,
    pub search_timeout_ms: u64,
    pub search_max_results: usize,
    pub search_min_chars: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Proxy URLs sometimes embed an access key in the query string.
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("saved_path", &self.saved_path)
            .field(
                "proxy_url",
                &self.proxy_url.as_ref().map(|_| "[redacted]"),
            )
            .field("user_agent", &self.user_agent)
            .field("taxlot_timeout_ms", &self.taxlot_timeout_ms)
            .field(
                "reverse_geocode_timeout_ms",
                &self.reverse_geocode_timeout_ms,
            )
            .field("search_timeout_ms", &self.search_timeout_ms)
            .field("search_max_results", &self.search_max_results)
            .field("search_min_chars", &self.search_min_chars)
            .finish()
    }
}
