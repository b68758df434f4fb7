//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SelectorProfile;
use crate::utils::rate::DelayRange;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Target site and the category paths to walk
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP and pacing behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Per-run traversal limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Output artifact settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Extraction heuristics
    #[serde(default)]
    pub extraction: SelectorProfile,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::validation(format!("site.base_url is not a URL: {e}")))?;
        if self.site.categories.is_empty() {
            return Err(AppError::validation("No categories defined"));
        }
        for category in &self.site.categories {
            if !category.starts_with('/') {
                return Err(AppError::validation(format!(
                    "Category path must start with '/': {category}"
                )));
            }
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.limits.max_pages_per_category == 0 {
            return Err(AppError::validation(
                "limits.max_pages_per_category must be > 0",
            ));
        }
        if self.limits.max_items_per_page == 0 {
            return Err(AppError::validation(
                "limits.max_items_per_page must be > 0",
            ));
        }
        if self.output.file_prefix.trim().is_empty() {
            return Err(AppError::validation("output.file_prefix is empty"));
        }
        Ok(())
    }
}

/// Target site definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin all relative links resolve against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Category paths, walked in order; each shares the run-wide dedup set
    #[serde(default = "defaults::categories")]
    pub categories: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            categories: defaults::categories(),
        }
    }
}

/// HTTP client and pacing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Navigation timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay interval between catalog pages
    #[serde(default = "defaults::page_delay")]
    pub page_delay: DelayRange,

    /// Delay interval between detail-page visits
    #[serde(default = "defaults::detail_delay")]
    pub detail_delay: DelayRange,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_delay: defaults::page_delay(),
            detail_delay: defaults::detail_delay(),
        }
    }
}

/// Per-run traversal limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Pages walked per category before stopping
    #[serde(default = "defaults::max_pages_per_category")]
    pub max_pages_per_category: u32,

    /// Detail visits per page; discovery order, first N
    #[serde(default = "defaults::max_items_per_page")]
    pub max_items_per_page: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pages_per_category: defaults::max_pages_per_category(),
            max_items_per_page: defaults::max_items_per_page(),
        }
    }
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV artifacts land in
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    /// Artifact filename prefix
    #[serde(default = "defaults::file_prefix")]
    pub file_prefix: String,

    /// Write a timestamped partial artifact after each page batch
    #[serde(default = "defaults::checkpoint")]
    pub checkpoint: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            file_prefix: defaults::file_prefix(),
            checkpoint: defaults::checkpoint(),
        }
    }
}

mod defaults {
    use crate::utils::rate::DelayRange;

    // Site defaults
    pub fn base_url() -> String {
        "https://mogi.vn".into()
    }

    pub fn categories() -> Vec<String> {
        vec![
            "/ha-noi/mua-can-ho".into(),
            "/ha-noi/mua-nha-rieng".into(),
            "/ha-noi/mua-nha-mat-tien-pho".into(),
            "/ha-noi/mua-nha-biet-thu-lien-ke".into(),
            "/ha-noi/mua-dat-nen-du-an".into(),
            "/ha-noi/mua-mat-bang-cua-hang-shop".into(),
        ]
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn page_delay() -> DelayRange {
        DelayRange::new(3000, 5000)
    }

    pub fn detail_delay() -> DelayRange {
        DelayRange::new(2000, 3000)
    }

    // Limit defaults
    pub fn max_pages_per_category() -> u32 {
        50
    }

    pub fn max_items_per_page() -> usize {
        20
    }

    // Output defaults
    pub fn output_dir() -> String {
        "output".into()
    }

    pub fn file_prefix() -> String {
        "mogi_hanoi".into()
    }

    pub fn checkpoint() -> bool {
        true
    }
}
