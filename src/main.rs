use log::{error, info};
use recipe_scraper::{Scraper, ScraperConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ScraperConfig::load()?;
    let scraper = Scraper::from_config(config)?;

    info!("Recipe scraping started");
    let summaries = scraper.run_jobs()?;
    for summary in &summaries {
        println!(
            "{}: {} recipes written, {} skipped",
            summary.output.display(),
            summary.written,
            summary.skipped
        );
    }

    if scraper.config().nutrition.enabled {
        let rows = scraper.scrape_nutrition()?;
        println!(
            "{}: {} food items written",
            scraper
                .config()
                .output_path(&scraper.config().nutrition.output)
                .display(),
            rows
        );
    }

    info!("All scraping tasks completed");
    Ok(())
}
