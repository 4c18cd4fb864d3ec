use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_timeout_ms = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "timeout must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PARCELMAP_ENV", "development"))?;

    let bind_addr = parse_addr("PARCELMAP_BIND_ADDR", "127.0.0.1:3000")?;
    let log_level = or_default("PARCELMAP_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "PARCELMAP_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let saved_path = PathBuf::from(or_default(
        "PARCELMAP_SAVED_PATH",
        "./data/saved_properties.json",
    ));
    let proxy_url = lookup("PARCELMAP_PROXY_URL")
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty());
    let user_agent = or_default("PARCELMAP_USER_AGENT", "parcelmap/0.1 (parcel-lookup)");

    let taxlot_timeout_ms = parse_timeout_ms("PARCELMAP_TAXLOT_TIMEOUT_MS", "8000")?;
    let reverse_geocode_timeout_ms = parse_timeout_ms("PARCELMAP_REVERSE_TIMEOUT_MS", "7000")?;
    let search_timeout_ms = parse_timeout_ms("PARCELMAP_SEARCH_TIMEOUT_MS", "8000")?;

    let search_max_results = parse_usize("PARCELMAP_SEARCH_MAX_RESULTS", "8")?;
    if search_max_results == 0 {
        return Err(invalid(
            "PARCELMAP_SEARCH_MAX_RESULTS",
            "must be at least 1".to_string(),
        ));
    }
    let search_min_chars = parse_usize("PARCELMAP_SEARCH_MIN_CHARS", "3")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sources_path,
        saved_path,
        proxy_url,
        user_agent,
        taxlot_timeout_ms,
        reverse_geocode_timeout_ms,
        search_timeout_ms,
        search_max_results,
        search_min_chars,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PARCELMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
