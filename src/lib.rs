pub mod config;
pub mod discovery;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod layout;
pub mod model;
pub mod nutrition;
pub mod pipeline;

pub use config::{JobConfig, ScraperConfig, SiteLayout};
pub use discovery::{discover_links, LinkDiscovery, ListingMode};
pub use error::{Result, ScrapeError};
pub use extractors::{extract_recipe, ParsingContext, RecipeExtractor};
pub use fetchers::{Fetcher, PoliteFetcher, RequestFetcher};
pub use model::{FoodNutrition, IngredientEntry, RecipeRecord};
pub use pipeline::{RunSummary, Scraper};

/// Collect recipes for one listing into `output_path` over HTTP.
///
/// Shorthand for [`Scraper::from_config`] followed by [`Scraper::run`].
pub fn run(
    config: ScraperConfig,
    mode: ListingMode,
    selector: &str,
    limit: Option<usize>,
    output_path: &std::path::Path,
) -> Result<RunSummary> {
    Scraper::from_config(config)?.run(mode, selector, limit, output_path)
}
