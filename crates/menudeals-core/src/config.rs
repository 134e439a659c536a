use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config. Decoupled from the process environment so tests can
/// drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("MENUDEALS_ENV", "development"))?;
    let bind_addr = parse_addr("MENUDEALS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MENUDEALS_LOG_LEVEL", "info");

    let rate_limit_quota = parse_usize("MENUDEALS_RATE_LIMIT_QUOTA", "5")?;
    if rate_limit_quota == 0 {
        return Err(invalid(
            "MENUDEALS_RATE_LIMIT_QUOTA",
            "quota must be at least 1".to_string(),
        ));
    }

    let rate_limit_window_secs = parse_u64("MENUDEALS_RATE_LIMIT_WINDOW_SECS", "600")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "MENUDEALS_RATE_LIMIT_WINDOW_SECS",
            "window must be at least 1 second".to_string(),
        ));
    }

    let rate_limit_cleanup_secs = parse_u64("MENUDEALS_RATE_LIMIT_CLEANUP_SECS", "60")?;
    if rate_limit_cleanup_secs == 0 {
        return Err(invalid(
            "MENUDEALS_RATE_LIMIT_CLEANUP_SECS",
            "cleanup interval must be at least 1 second".to_string(),
        ));
    }

    let currency_symbol = or_default("MENUDEALS_CURRENCY_SYMBOL", "$");
    if currency_symbol.trim().is_empty() {
        return Err(invalid(
            "MENUDEALS_CURRENCY_SYMBOL",
            "currency symbol must not be blank".to_string(),
        ));
    }

    let max_payload_bytes = parse_usize("MENUDEALS_MAX_PAYLOAD_BYTES", "2097152")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        rate_limit_quota,
        rate_limit_window_secs,
        rate_limit_cleanup_secs,
        currency_symbol,
        max_payload_bytes,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MENUDEALS_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
