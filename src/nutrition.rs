//! Food composition table scraper (kcal, protein and fat per food item).

use log::{info, warn};
use reqwest::Url;
use scraper::{Html, Selector};
use std::path::Path;

use crate::error::Result;
use crate::fetchers::Fetcher;
use crate::layout::clean_text;
use crate::model::FoodNutrition;
use crate::pipeline::write_json;

/// Cells of one food item: name, kcal, protein, fat
const ITEM_WIDTH: usize = 4;

/// The table lists values per 100 g
const GRAMS_PER_ROW: f64 = 100.0;

/// First numeric run of a cell, accepting a decimal comma
pub fn parse_numeric(cell: &str) -> Option<f64> {
    let text = cell.replace(',', ".");
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    run.parse().ok()
}

fn is_header(cells: &[String]) -> bool {
    cells
        .first()
        .is_some_and(|first| first.to_uppercase().contains("ARTICLE") || first.contains("Calories"))
}

fn per_gram(cell: &str) -> Option<f64> {
    parse_numeric(cell).map(|value| value / GRAMS_PER_ROW)
}

fn to_item(cells: &[String]) -> Option<FoodNutrition> {
    let food_name = cells[0].trim().to_lowercase();
    if food_name.chars().count() <= 2 {
        return None;
    }
    Some(FoodNutrition {
        food_name,
        kcal_per_g: per_gram(&cells[1])?,
        protein_per_g: per_gram(&cells[2]),
        fat_per_g: per_gram(&cells[3]),
    })
}

/// Parse every table of the page into food items.
///
/// Wide rows hold two items side by side; header rows and rows without a
/// calorie value are dropped.
pub fn parse_nutrition_table(html: &str) -> Vec<FoodNutrition> {
    let document = Html::parse_document(html);
    let (Ok(rows), Ok(cells)) = (Selector::parse("table tr"), Selector::parse("td, th")) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for row in document.select(&rows) {
        let texts: Vec<String> = row.select(&cells).map(clean_text).collect();
        if texts.is_empty() || is_header(&texts) {
            continue;
        }

        let groups: Vec<&[String]> = if texts.len() >= 2 * ITEM_WIDTH {
            vec![&texts[..ITEM_WIDTH], &texts[ITEM_WIDTH..2 * ITEM_WIDTH]]
        } else if texts.len() == ITEM_WIDTH {
            vec![&texts[..]]
        } else {
            Vec::new()
        };

        items.extend(groups.into_iter().filter_map(to_item));
    }
    items
}

/// Fetch the table at `url` and write the cleaned items to `output`
pub fn scrape_nutrition<F: Fetcher + ?Sized>(fetcher: &F, url: &Url, output: &Path) -> Result<usize> {
    info!("Downloading nutrition table {}", url);
    let html = fetcher.fetch(url)?;

    let items = parse_nutrition_table(&html);
    if items.is_empty() {
        warn!("No valid nutrition data extracted from {}", url);
    }

    write_json(output, &items)?;
    info!("Saved {} food items to '{}'", items.len(), output.display());
    Ok(items.len())
}
