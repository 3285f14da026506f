use std::path::PathBuf;

use crate::regions::Region;

/// Inclusive range of seconds the first retry delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

/// Outgoing mail account used to deliver product archives.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    pub base_url: String,
    pub tt_ids: Vec<String>,
    pub tt_region: Region,
    pub parser_id: String,
    pub chain_id: String,
    pub chain_name: String,
    pub part_number: String,
    pub output_dir: PathBuf,
    pub categories_path: Option<PathBuf>,
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub delay_range: Option<DelayRange>,
    pub backoff_factor: f64,
    pub sku_images_enabled: bool,
    pub sku_parameters_enabled: bool,
    pub promo_only: bool,
    pub smtp: Option<SmtpConfig>,
    pub emails_to: Vec<String>,
}

impl AppConfig {
    /// Mail is only sent when an account and at least one recipient exist.
    #[must_use]
    pub fn email_enabled(&self) -> bool {
        self.smtp.is_some() && !self.emails_to.is_empty()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("tt_ids", &self.tt_ids)
            .field("tt_region", &self.tt_region.code)
            .field("parser_id", &self.parser_id)
            .field("chain_id", &self.chain_id)
            .field("chain_name", &self.chain_name)
            .field("part_number", &self.part_number)
            .field("output_dir", &self.output_dir)
            .field("categories_path", &self.categories_path)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("delay_range", &self.delay_range)
            .field("backoff_factor", &self.backoff_factor)
            .field("sku_images_enabled", &self.sku_images_enabled)
            .field("sku_parameters_enabled", &self.sku_parameters_enabled)
            .field("promo_only", &self.promo_only)
            .field("smtp", &self.smtp)
            .field("emails_to", &self.emails_to)
            .finish()
    }
}
