use scraper::{ElementRef, Selector};

use crate::config::SiteLayout;
use crate::error::{Result, ScrapeError};

/// [`SiteLayout`] with every selector parsed
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    pub search_path: String,
    pub query_param: String,
    pub page_param: String,
    pub category_path: String,
    pub detail_path_marker: String,
    pub link: Selector,
    pub pagination: Selector,
    pub title: Selector,
    pub rating: Selector,
    pub ingredient: Selector,
    pub ingredient_name: Selector,
    pub quantity: Selector,
    pub unit: Selector,
    pub complement: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

impl SiteLayout {
    pub fn compile(&self) -> Result<CompiledLayout> {
        Ok(CompiledLayout {
            search_path: self.search_path.clone(),
            query_param: self.query_param.clone(),
            page_param: self.page_param.clone(),
            category_path: self.category_path.clone(),
            detail_path_marker: self.detail_path_marker.clone(),
            link: selector(&self.link_selector)?,
            pagination: selector(&self.pagination_selector)?,
            title: selector(&self.title_selector)?,
            rating: selector(&self.rating_selector)?,
            ingredient: selector(&self.ingredient_selector)?,
            ingredient_name: selector(&self.ingredient_name_selector)?,
            quantity: selector(&self.quantity_selector)?,
            unit: selector(&self.unit_selector)?,
            complement: selector(&self.complement_selector)?,
        })
    }
}

/// Text content of an element with whitespace runs collapsed to single spaces.
///
/// Text nodes are joined as they appear, so inline markup never adds spaces.
pub fn clean_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleaned text of the first match of `selector` under `element`, if non-empty
pub fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(clean_text)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_default_layout_compiles() {
        assert!(SiteLayout::default().compile().is_ok());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let layout = SiteLayout {
            rating_selector: "div[".to_string(),
            ..SiteLayout::default()
        };

        match layout.compile() {
            Err(ScrapeError::InvalidSelector { selector, .. }) => assert_eq!(selector, "div["),
            other => panic!("expected invalid selector, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        let html = Html::parse_fragment("<p>  Tarte \n  aux <b>poireaux</b>\t </p>");
        let p = Selector::parse("p").unwrap();
        let element = html.select(&p).next().unwrap();
        assert_eq!(clean_text(element), "Tarte aux poireaux");
    }

    #[test]
    fn test_clean_text_keeps_inline_markup_glued() {
        let html = Html::parse_fragment(
            "<p><span class='count'>1<sup>/2</sup></span><span class='name'>p<i>oi</i>vron</span></p>",
        );
        let count = Selector::parse(".count").unwrap();
        let name = Selector::parse(".name").unwrap();
        let root = html.root_element();
        assert_eq!(first_text(root, &count).as_deref(), Some("1/2"));
        assert_eq!(first_text(root, &name).as_deref(), Some("poivron"));
    }

    #[test]
    fn test_first_text_skips_empty_match() {
        let html = Html::parse_fragment("<div><span class='unit'>   </span></div>");
        let div = Selector::parse("div").unwrap();
        let unit = Selector::parse(".unit").unwrap();
        let element = html.select(&div).next().unwrap();
        assert_eq!(first_text(element, &unit), None);
    }
}
