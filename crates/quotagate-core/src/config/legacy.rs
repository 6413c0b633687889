//! Flat environment variables from earlier single-binary deployments.
//!
//! `LAL_API_ADDR`, `DEFAULT_QUOTA_SEC`, `APP_PORT`, `REDIS_ADDR`,
//! `REDIS_PASSWORD` and `REDIS_DB` are mapped onto the structured
//! configuration as overrides, so they win over files and `QUOTAGATE__*`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Value};
use tracing::warn;
use url::Url;

use crate::error::AppError;

/// Apply legacy overrides read from the process environment.
pub fn apply_overrides(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, AppError> {
    let mut builder = builder;
    for (key, value) in overrides_from(|name| std::env::var(name).ok()) {
        builder = builder.set_override(key, value)?;
    }
    Ok(builder)
}

/// Compute the overrides for a variable lookup function.
pub fn overrides_from<F>(lookup: F) -> Vec<(&'static str, Value)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut overrides = Vec::new();

    if let Some(addr) = non_empty(lookup("LAL_API_ADDR")) {
        overrides.push(("relay.control_api_addr", Value::from(addr)));
    }

    if let Some(raw) = non_empty(lookup("DEFAULT_QUOTA_SEC")) {
        match raw.parse::<i64>() {
            Ok(seconds) => overrides.push(("quota.default_seconds", Value::from(seconds))),
            Err(_) => warn!(value = %raw, "Ignoring unparseable DEFAULT_QUOTA_SEC"),
        }
    }

    if let Some(raw) = non_empty(lookup("APP_PORT")) {
        match raw.parse::<u16>() {
            Ok(port) => overrides.push(("server.port", Value::from(i64::from(port)))),
            Err(_) => warn!(value = %raw, "Ignoring unparseable APP_PORT"),
        }
    }

    let addr = non_empty(lookup("REDIS_ADDR"));
    let password = non_empty(lookup("REDIS_PASSWORD"));
    let db = non_empty(lookup("REDIS_DB"));
    if addr.is_some() || password.is_some() || db.is_some() {
        let addr = addr.as_deref().unwrap_or(DEFAULT_REDIS_ADDR);
        match compose_redis_url(addr, password.as_deref(), db.as_deref()) {
            Ok(url) => overrides.push(("store.redis.url", Value::from(url))),
            Err(e) => warn!(error = %e, "Ignoring legacy Redis variables"),
        }
    }

    overrides
}

/// Address used when only `REDIS_PASSWORD` or `REDIS_DB` is set.
pub const DEFAULT_REDIS_ADDR: &str = "localhost:6379";

/// Build a `redis://` URL from host/port, optional password and database.
///
/// The password is percent-encoded, so any character is allowed.
pub fn compose_redis_url(
    addr: &str,
    password: Option<&str>,
    db: Option<&str>,
) -> Result<String, AppError> {
    let mut url = Url::parse(&format!("redis://{addr}"))
        .map_err(|e| AppError::configuration(format!("Invalid REDIS_ADDR '{addr}': {e}")))?;
    if url.host_str().is_none_or(str::is_empty) || url.path().len() > 1 {
        return Err(AppError::configuration(format!(
            "Invalid REDIS_ADDR '{addr}': expected host:port"
        )));
    }

    if let Some(password) = password {
        url.set_password(Some(password))
            .map_err(|()| AppError::configuration("REDIS_PASSWORD cannot be applied"))?;
    }
    if let Some(db) = db {
        let index: u32 = db
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid REDIS_DB '{db}'")))?;
        url.set_path(&format!("/{index}"));
    }

    Ok(url.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
