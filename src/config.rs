use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::ListingMode;
use crate::fetchers::RetryPolicy;

/// Main scraper configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Root of the cooking website; relative links are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory that receives the JSON output files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Listing page traversal limits
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Markup coupling: selectors and URL templates for the site
    #[serde(default)]
    pub layout: SiteLayout,
    /// Recipe collections to build, in order
    #[serde(default = "default_jobs")]
    pub jobs: Vec<JobConfig>,
    /// Nutrition table scraping
    #[serde(default)]
    pub nutrition: NutritionConfig,
}

/// HTTP client behaviour
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum delay between two consecutive requests in milliseconds
    pub delay_ms: u64,
    /// Total attempts for a listing page before it is given up
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (doubled after each attempt)
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
            delay_ms: 1000,
            retry_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts.max(1),
            initial_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// Limits applied while walking listing pages
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Hard cap on the number of listing pages visited
    pub max_pages: Option<u32>,
    /// Consecutive failed pages tolerated once a page has succeeded
    pub max_skipped_pages: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            max_skipped_pages: 1,
        }
    }
}

/// Everything that depends on the site's markup and URL scheme.
///
/// Selectors are plain CSS strings; [`SiteLayout::compile`] parses them once.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SiteLayout {
    pub search_path: String,
    pub query_param: String,
    pub page_param: String,
    pub category_path: String,
    /// Anchors on listing pages that point to detail pages
    pub link_selector: String,
    /// Path fragment every detail-page URL contains
    pub detail_path_marker: String,
    pub pagination_selector: String,
    pub title_selector: String,
    pub rating_selector: String,
    /// Repeated block holding one ingredient
    pub ingredient_selector: String,
    pub ingredient_name_selector: String,
    pub quantity_selector: String,
    pub unit_selector: String,
    pub complement_selector: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            search_path: "/recettes/recherche.aspx".to_string(),
            query_param: "aqt".to_string(),
            page_param: "page".to_string(),
            category_path: "/recettes/index/categorie/".to_string(),
            link_selector: "a.card-content__title".to_string(),
            detail_path_marker: "/recettes/recette_".to_string(),
            pagination_selector: ".pagination__page-link".to_string(),
            title_selector: "h1".to_string(),
            rating_selector: ".recipe-header__rating-text".to_string(),
            ingredient_selector: ".card-ingredient-content".to_string(),
            ingredient_name_selector: ".ingredient-name".to_string(),
            quantity_selector: ".count".to_string(),
            unit_selector: ".unit".to_string(),
            complement_selector: ".ingredient-complement".to_string(),
        }
    }
}

/// One recipe collection: a listing source and the file it is written to
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct JobConfig {
    pub name: String,
    pub mode: ListingMode,
    /// Search term or category identifier, depending on `mode`
    pub selector: String,
    /// File name, relative to `output_dir`
    pub output: String,
    /// Maximum number of detail pages to collect
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Nutrition table job
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NutritionConfig {
    pub enabled: bool,
    pub url: String,
    pub output: String,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://www.fao.org/4/x9892f/x9892f0c.htm".to_string(),
            output: "fao_clean.json".to_string(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.marmiton.org".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_jobs() -> Vec<JobConfig> {
    vec![
        JobConfig {
            name: "vegetarian".to_string(),
            mode: ListingMode::Query,
            selector: "vege".to_string(),
            output: "recipes_vege.json".to_string(),
            limit: None,
        },
        JobConfig {
            name: "meat".to_string(),
            mode: ListingMode::Category,
            selector: "viande".to_string(),
            output: "recipes_non_vege.json".to_string(),
            limit: Some(2500),
        },
    ]
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output_dir: default_output_dir(),
            http: HttpConfig::default(),
            discovery: DiscoveryConfig::default(),
            layout: SiteLayout::default(),
            jobs: default_jobs(),
            nutrition: NutritionConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPER__HTTP__DELAY_MS
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_SCRAPER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Full path of an output file name
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
