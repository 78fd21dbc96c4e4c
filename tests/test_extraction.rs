use recipe_scraper::{ListingMode, Scraper, ScrapeError, ScraperConfig};
use reqwest::Url;
use std::collections::HashSet;

fn config(base_url: String) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.base_url = base_url;
    config.http.delay_ms = 0;
    config.http.retry_delay_ms = 0;
    config
}

#[test]
fn test_detail_page_without_rating_or_complements() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/recettes/recette_taboule_9.aspx")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(
            r#"
            <html><body>
                <h1>Taboulé libanais</h1>
                <div class="card-ingredient-content"><span class="count">250</span><span class="unit">g</span><span class="ingredient-name">boulgour</span></div>
                <div class="card-ingredient-content"><span class="count">3</span><span class="ingredient-name">tomates</span></div>
                <div class="card-ingredient-content"><span class="count">1 à 2</span><span class="unit">bottes</span><span class="ingredient-name">persil</span></div>
                <div class="card-ingredient-content"><span class="ingredient-name">huile d'olive</span></div>
            </body></html>
            "#,
        )
        .create();

    let scraper = Scraper::from_config(config(server.url())).unwrap();
    let url = Url::parse(&format!("{}/recettes/recette_taboule_9.aspx", server.url())).unwrap();
    let recipe = scraper.extract_recipe(&url).unwrap();

    assert_eq!(recipe.title, "Taboulé libanais");
    assert_eq!(recipe.rating, None);
    assert_eq!(recipe.url, url.as_str());

    let quantities: Vec<_> = recipe.ingredients.iter().map(|i| i.quantity.as_str()).collect();
    assert_eq!(quantities, vec!["250", "3", "2", ""]);
    let units: Vec<_> = recipe.ingredients.iter().map(|i| i.unit.as_str()).collect();
    assert_eq!(units, vec!["g", "", "bottes", ""]);
    assert!(recipe.ingredients.iter().all(|i| i.complement.is_none()));

    let json = serde_json::to_value(&recipe).unwrap();
    assert!(json["rating"].is_null());
    assert!(json["ingredients"][3]["complement"].is_null());
}

#[test]
fn test_not_found_detail_page_is_an_error() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/recettes/recette_disparue_1.aspx")
        .with_status(404)
        .create();

    let scraper = Scraper::from_config(config(server.url())).unwrap();
    let url = Url::parse(&format!("{}/recettes/recette_disparue_1.aspx", server.url())).unwrap();

    match scraper.extract_recipe(&url) {
        Err(ScrapeError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[test]
fn test_discovery_over_http_is_lazy_and_unique() {
    let mut server = mockito::Server::new();
    let page_one = server
        .mock("GET", "/recettes/index/categorie/dessert")
        .with_status(200)
        .with_body(
            r#"<a class="card-content__title" href="/recettes/recette_tarte_1.aspx">Tarte</a>
               <a class="card-content__title" href="/recettes/recette_flan_2.aspx">Flan</a>
               <a class="card-content__title" href="/recettes/recette_tarte_1.aspx">Tarte</a>"#,
        )
        .expect(1)
        .create();
    let page_two = server
        .mock("GET", "/recettes/index/categorie/dessert/2")
        .with_status(200)
        .with_body(
            r#"<a class="card-content__title" href="/recettes/recette_flan_2.aspx">Flan</a>
               <a class="card-content__title" href="/recettes/recette_crumble_3.aspx">Crumble</a>"#,
        )
        .expect(1)
        .create();
    let page_three = server
        .mock("GET", "/recettes/index/categorie/dessert/3")
        .with_status(200)
        .with_body("<p>Aucun résultat</p>")
        .expect(1)
        .create();

    let scraper = Scraper::from_config(config(server.url())).unwrap();
    let mut links = scraper
        .discover_links(ListingMode::Category, "dessert", None)
        .unwrap();

    // nothing is requested before the first item is pulled
    assert!(!page_one.matched());
    let first = links.next().unwrap();
    assert!(first.path().ends_with("recette_tarte_1.aspx"));

    let rest: Vec<_> = links.collect();
    assert_eq!(rest.len(), 2);

    let mut all = vec![first];
    all.extend(rest);
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), 3);

    page_one.assert();
    page_two.assert();
    page_three.assert();
}
