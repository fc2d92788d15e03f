//! Configuration: built-in defaults, then `config.toml` in the data
//! directory, then `SPLITUI_*` environment variables.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::api::DateParams;
use crate::error::{Error, Result};
use crate::pipeline::PageSize;

pub(crate) const API_URL_ENV: &str = "SPLITUI_API_URL";
pub(crate) const PAGE_SIZE_ENV: &str = "SPLITUI_PAGE_SIZE";
pub(crate) const KEEP_EDITS_ENV: &str = "SPLITUI_KEEP_EDITS";

const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:3000"
transactions_path = "/fetch-transactions"
categories_path = "/fetch-categories"
update_path = "/update-transactions"
timeout_secs = 30

[review]
page_size = 10
default_status = "pending"
report_status = "reviewed"
report_start_param = "startDate"
report_end_param = "endDate"
keep_edits_on_refresh = true
id_display_len = 12
"#;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ApiConfig {
    pub(crate) base_url: String,
    pub(crate) transactions_path: String,
    pub(crate) categories_path: String,
    pub(crate) update_path: String,
    pub(crate) timeout_secs: u64,
}

impl ApiConfig {
    pub(crate) fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReviewConfig {
    pub(crate) page_size: PageSize,
    pub(crate) default_status: String,
    pub(crate) report_status: String,
    /// Date range parameter names sent with the report fetch.
    pub(crate) report_date_params: DateParams,
    /// Whether pending edits outlive a re-fetch of the transaction list.
    pub(crate) keep_edits_on_refresh: bool,
    /// Hash characters shown in tables. 0 shows the full hash.
    pub(crate) id_display_len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) api: ApiConfig,
    pub(crate) review: ReviewConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    review: Option<RawReview>,
}

#[derive(Debug, Default, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    transactions_path: Option<String>,
    categories_path: Option<String>,
    update_path: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawReview {
    page_size: Option<RawPageSize>,
    default_status: Option<String>,
    report_status: Option<String>,
    report_start_param: Option<String>,
    report_end_param: Option<String>,
    keep_edits_on_refresh: Option<bool>,
    id_display_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPageSize {
    Number(i64),
    Text(String),
}

impl RawPageSize {
    fn resolve(&self) -> Result<PageSize> {
        match self {
            Self::Number(n) => usize::try_from(*n)
                .map_err(|_| Error::InvalidPageSize(n.to_string()))
                .and_then(PageSize::fixed),
            Self::Text(s) => PageSize::parse(s),
        }
    }
}

impl Config {
    /// Load configuration, layering `path` (when it exists) over the defaults
    /// and then applying environment overrides.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default_config()?;
        if let Some(path) = path.filter(|p| p.exists()) {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {e}", path.display()))
            })?;
            config.merge(parse_raw(&content)?)?;
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub(crate) fn default_config() -> Result<Self> {
        let raw = parse_raw(DEFAULT_CONFIG)?;
        let api = raw.api.unwrap_or_default();
        let review = raw.review.unwrap_or_default();
        let missing = |field: &str| Error::Config(format!("default config is missing {field}"));

        Ok(Self {
            api: ApiConfig {
                base_url: api.base_url.ok_or_else(|| missing("api.base_url"))?,
                transactions_path: api
                    .transactions_path
                    .ok_or_else(|| missing("api.transactions_path"))?,
                categories_path: api
                    .categories_path
                    .ok_or_else(|| missing("api.categories_path"))?,
                update_path: api.update_path.ok_or_else(|| missing("api.update_path"))?,
                timeout_secs: api.timeout_secs.unwrap_or(30),
            },
            review: ReviewConfig {
                page_size: review
                    .page_size
                    .as_ref()
                    .map(RawPageSize::resolve)
                    .transpose()?
                    .unwrap_or_default(),
                default_status: review.default_status.unwrap_or_else(|| "pending".into()),
                report_status: review.report_status.unwrap_or_else(|| "reviewed".into()),
                report_date_params: {
                    let defaults = DateParams::default();
                    DateParams {
                        start: review.report_start_param.unwrap_or(defaults.start),
                        end: review.report_end_param.unwrap_or(defaults.end),
                    }
                },
                keep_edits_on_refresh: review.keep_edits_on_refresh.unwrap_or(true),
                id_display_len: review.id_display_len.unwrap_or(12),
            },
        })
    }

    fn merge(&mut self, raw: RawConfig) -> Result<()> {
        if let Some(api) = raw.api {
            if let Some(v) = api.base_url {
                self.api.base_url = v;
            }
            if let Some(v) = api.transactions_path {
                self.api.transactions_path = v;
            }
            if let Some(v) = api.categories_path {
                self.api.categories_path = v;
            }
            if let Some(v) = api.update_path {
                self.api.update_path = v;
            }
            if let Some(v) = api.timeout_secs {
                self.api.timeout_secs = v;
            }
        }
        if let Some(review) = raw.review {
            if let Some(v) = review.page_size {
                self.review.page_size = v.resolve()?;
            }
            if let Some(v) = review.default_status {
                self.review.default_status = v;
            }
            if let Some(v) = review.report_status {
                self.review.report_status = v;
            }
            if let Some(v) = review.report_start_param.filter(|v| !v.trim().is_empty()) {
                self.review.report_date_params.start = v;
            }
            if let Some(v) = review.report_end_param.filter(|v| !v.trim().is_empty()) {
                self.review.report_date_params.end = v;
            }
            if let Some(v) = review.keep_edits_on_refresh {
                self.review.keep_edits_on_refresh = v;
            }
            if let Some(v) = review.id_display_len {
                self.review.id_display_len = v;
            }
        }
        Ok(())
    }

    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(size) = lookup(PAGE_SIZE_ENV) {
            self.review.page_size = PageSize::parse(&size)?;
        }
        if let Some(keep) = lookup(KEEP_EDITS_ENV) {
            self.review.keep_edits_on_refresh = match keep.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::Config(format!(
                        "{KEEP_EDITS_ENV} must be true or false, got '{other}'"
                    )))
                }
            };
        }
        Ok(())
    }
}

fn parse_raw(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {e}")))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
