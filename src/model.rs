use serde::{Deserialize, Serialize};

/// One recipe detail page, normalized.
///
/// Absent values follow a fixed convention: `title` is an empty string,
/// `rating` is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub title: String,
    /// Canonical source address, unique within a dataset
    pub url: String,
    pub rating: Option<String>,
    /// In page order
    pub ingredients: Vec<IngredientEntry>,
}

impl RecipeRecord {
    pub fn rating_value(&self) -> Option<f64> {
        self.rating.as_deref().and_then(|r| r.parse().ok())
    }
}

/// One ingredient line.
///
/// `ingredient_name`, `quantity` and `unit` are empty strings when absent;
/// `complement` is `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub ingredient_name: String,
    pub quantity: String,
    pub unit: String,
    pub complement: Option<String>,
}

impl IngredientEntry {
    pub fn quantity_value(&self) -> Option<f64> {
        self.quantity.parse().ok()
    }
}

/// One food item of the composition table, in values per gram.
///
/// `food_name` is lower-cased so ingredient names can be matched against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrition {
    pub food_name: String,
    pub kcal_per_g: f64,
    pub protein_per_g: Option<f64>,
    pub fat_per_g: Option<f64>,
}
