use crate::app_config::{AppConfig, Environment};
use crate::clinics::Location;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_optional_f64 = |var: &str| -> Result<Option<f64>, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value.is_finite() {
            Ok(Some(value))
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be a finite number".to_string(),
            })
        }
    };

    let env = parse_environment(&or_default("VETFIND_ENV", "development"));
    let log_level = or_default("VETFIND_LOG_LEVEL", "info");
    let records_path = PathBuf::from(or_default("VETFIND_RECORDS_PATH", "./data/clinics.json"));

    let origin = parse_origin(
        parse_optional_f64("VETFIND_ORIGIN_LAT")?,
        parse_optional_f64("VETFIND_ORIGIN_LNG")?,
    )?;

    let hospital_tag = or_default("VETFIND_HOSPITAL_TAG", "health");
    if hospital_tag.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "VETFIND_HOSPITAL_TAG".to_string(),
            reason: "must be non-empty".to_string(),
        });
    }

    let max_results = parse_usize("VETFIND_MAX_RESULTS", "50")?;
    if max_results == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VETFIND_MAX_RESULTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        records_path,
        origin,
        hospital_tag,
        max_results,
    })
}

/// Combine the optional origin halves into a [`Location`].
///
/// Both halves must be present together, and the resulting point must be on
/// the globe; a misconfigured origin is rejected rather than clamped.
fn parse_origin(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Location>, ConfigError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::IncompleteOrigin {
            present: "VETFIND_ORIGIN_LAT".to_string(),
            missing: "VETFIND_ORIGIN_LNG".to_string(),
        }),
        (None, Some(_)) => Err(ConfigError::IncompleteOrigin {
            present: "VETFIND_ORIGIN_LNG".to_string(),
            missing: "VETFIND_ORIGIN_LAT".to_string(),
        }),
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(ConfigError::InvalidEnvVar {
                    var: "VETFIND_ORIGIN_LAT".to_string(),
                    reason: format!("{latitude} is outside [-90, 90]"),
                });
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(ConfigError::InvalidEnvVar {
                    var: "VETFIND_ORIGIN_LNG".to_string(),
                    reason: format!("{longitude} is outside [-180, 180]"),
                });
            }
            Ok(Some(Location::new(latitude, longitude)))
        }
    }
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
