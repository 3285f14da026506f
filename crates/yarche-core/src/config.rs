use crate::app_config::{AppConfig, DelayRange, SmtpConfig};
use crate::regions::Region;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_flag(&raw).ok_or_else(|| invalid(var, format!("expected true or false, got \"{raw}\"")))
    };

    let base_url = or_default("YARCHE_BASE_URL", "https://yarcheplus.ru")
        .trim_end_matches('/')
        .to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(invalid(
            "YARCHE_BASE_URL",
            format!("\"{base_url}\" is not an http(s) URL"),
        ));
    }

    let tt_ids = split_list(&or_default("YARCHE_TT_IDS", "Москва, Вересаева 10"), '|');
    if tt_ids.is_empty() {
        return Err(invalid("YARCHE_TT_IDS", "at least one store address is required".into()));
    }

    let region_code = or_default("YARCHE_TT_REGION", "msk");
    let tt_region = Region::from_code(&region_code)
        .ok_or_else(|| invalid("YARCHE_TT_REGION", format!("unknown region code \"{region_code}\"")))?;

    let delay_range = optional("YARCHE_DELAY_RANGE_S")
        .map(|raw| parse_delay_range(&raw).map_err(|reason| invalid("YARCHE_DELAY_RANGE_S", reason)))
        .transpose()?;

    let backoff_raw = or_default("YARCHE_BACKOFF_FACTOR", "1");
    let backoff_factor = backoff_raw
        .parse::<f64>()
        .map_err(|e| invalid("YARCHE_BACKOFF_FACTOR", e.to_string()))?;
    if !backoff_factor.is_finite() || backoff_factor < 1.0 {
        return Err(invalid(
            "YARCHE_BACKOFF_FACTOR",
            format!("must be a finite number >= 1, got {backoff_raw}"),
        ));
    }

    let max_retries = parse_u32("YARCHE_MAX_RETRIES", "5")?;
    if max_retries == 0 {
        return Err(invalid("YARCHE_MAX_RETRIES", "must allow at least one attempt".into()));
    }

    let smtp = match (
        optional("YARCHE_SMTP_HOST"),
        optional("YARCHE_SMTP_LOGIN"),
        optional("YARCHE_SMTP_PASSWORD"),
    ) {
        (Some(host), Some(login), Some(password)) => Some(SmtpConfig {
            host,
            login,
            password,
        }),
        (None, None, None) => None,
        _ => {
            return Err(ConfigError::Validation(
                "YARCHE_SMTP_HOST, YARCHE_SMTP_LOGIN and YARCHE_SMTP_PASSWORD must be set together"
                    .to_string(),
            ))
        }
    };

    Ok(AppConfig {
        base_url,
        tt_ids,
        tt_region,
        parser_id: or_default("YARCHE_PARSER_ID", "mc_test"),
        chain_id: or_default("YARCHE_CHAIN_ID", "113"),
        chain_name: or_default("YARCHE_CHAIN_NAME", "Ярче"),
        part_number: or_default("YARCHE_PART_NUMBER", "p1"),
        output_dir: PathBuf::from(or_default("YARCHE_OUTPUT_DIR", "out")),
        categories_path: optional("YARCHE_CATEGORIES_PATH").map(PathBuf::from),
        log_level: or_default("YARCHE_LOG_LEVEL", "info"),
        user_agent: or_default("YARCHE_USER_AGENT", DEFAULT_USER_AGENT),
        request_timeout_secs: parse_u64("YARCHE_REQUEST_TIMEOUT_SECS", "30")?,
        max_retries,
        delay_range,
        backoff_factor,
        sku_images_enabled: parse_bool("YARCHE_SKU_IMAGES_ENABLE", "true")?,
        sku_parameters_enabled: parse_bool("YARCHE_SKU_PARAMETERS_ENABLE", "true")?,
        promo_only: parse_bool("YARCHE_PROMO_ONLY", "false")?,
        smtp,
        emails_to: split_list(&or_default("YARCHE_EMAILS_TO", ""), ','),
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `"min-max"` seconds range such as `"1.5-3"`.
fn parse_delay_range(raw: &str) -> Result<DelayRange, String> {
    let (min, max) = raw
        .split_once('-')
        .ok_or_else(|| format!("expected \"min-max\", got \"{raw}\""))?;
    let min_secs = min
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad lower bound \"{min}\": {e}"))?;
    let max_secs = max
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad upper bound \"{max}\": {e}"))?;
    if !(min_secs.is_finite() && max_secs.is_finite()) || min_secs < 0.0 || min_secs > max_secs {
        return Err(format!("range \"{raw}\" must satisfy 0 <= min <= max"));
    }
    Ok(DelayRange { min_secs, max_secs })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
