use log::{debug, warn};
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::fetchers::Fetcher;
use crate::layout::{first_text, CompiledLayout};
use crate::model::{IngredientEntry, RecipeRecord};

mod quantity;

pub use quantity::{normalize_quantity, normalize_rating};

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// Turns a detail page into a [`RecipeRecord`].
///
/// Parsing never fails: missing fields fall back to their empty value.
pub struct RecipeExtractor<'a> {
    layout: &'a CompiledLayout,
}

impl<'a> RecipeExtractor<'a> {
    pub fn new(layout: &'a CompiledLayout) -> Self {
        Self { layout }
    }

    pub fn parse(&self, context: &ParsingContext) -> RecipeRecord {
        let root = context.document.root_element();

        let title = first_text(root, &self.layout.title).unwrap_or_else(|| {
            debug!("No title found on {}", context.url);
            String::new()
        });

        let rating = match first_text(root, &self.layout.rating) {
            Some(text) => {
                let rating = normalize_rating(&text);
                if rating.is_none() {
                    debug!("Ignoring non-numeric rating '{}' on {}", text, context.url);
                }
                rating
            }
            None => {
                debug!("No rating on {}", context.url);
                None
            }
        };

        let ingredients: Vec<IngredientEntry> = root
            .select(&self.layout.ingredient)
            .map(|block| self.parse_ingredient(block))
            .collect();

        debug!(
            "Parsed '{}' with {} ingredients from {}",
            title,
            ingredients.len(),
            context.url
        );

        RecipeRecord {
            title,
            url: context.url.clone(),
            rating,
            ingredients,
        }
    }

    fn parse_ingredient(&self, block: ElementRef<'_>) -> IngredientEntry {
        let raw_quantity = first_text(block, &self.layout.quantity).unwrap_or_default();

        IngredientEntry {
            ingredient_name: first_text(block, &self.layout.ingredient_name).unwrap_or_default(),
            quantity: normalize_quantity(&raw_quantity),
            unit: first_text(block, &self.layout.unit).unwrap_or_default(),
            complement: first_text(block, &self.layout.complement),
        }
    }
}

/// Fetch a detail page and extract its record.
///
/// Fetch failures are returned as-is and never retried here.
pub fn extract_recipe<F: Fetcher + ?Sized>(
    fetcher: &F,
    layout: &CompiledLayout,
    url: &Url,
) -> Result<RecipeRecord> {
    let html = fetcher.fetch(url).map_err(|e| {
        warn!("Could not fetch recipe {}: {}", url, e);
        e
    })?;

    let context = ParsingContext::new(url.as_str(), &html);
    Ok(RecipeExtractor::new(layout).parse(&context))
}
