use log::{debug, info, warn};
use reqwest::Url;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{JobConfig, ScraperConfig};
use crate::discovery::{discover_links, LinkDiscovery, ListingMode};
use crate::error::{Result, ScrapeError};
use crate::extractors::extract_recipe;
use crate::fetchers::{Fetcher, PoliteFetcher, RequestFetcher};
use crate::layout::CompiledLayout;
use crate::model::RecipeRecord;
use crate::nutrition;

/// Outcome of one collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub skipped_urls: Vec<String>,
}

/// Discovery, extraction and output for one site, over one fetcher.
pub struct Scraper<F> {
    fetcher: F,
    config: ScraperConfig,
    layout: CompiledLayout,
}

impl Scraper<PoliteFetcher<RequestFetcher>> {
    /// HTTP scraper honoring the configured timeout, user agent and delay
    pub fn from_config(config: ScraperConfig) -> Result<Self> {
        let fetcher = PoliteFetcher::new(RequestFetcher::new(&config.http)?, config.http.delay());
        Self::new(fetcher, config)
    }
}

impl<F: Fetcher> Scraper<F> {
    pub fn new(fetcher: F, config: ScraperConfig) -> Result<Self> {
        let layout = config.layout.compile()?;
        Ok(Self {
            fetcher,
            config,
            layout,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn discover_links(
        &self,
        mode: ListingMode,
        selector: &str,
        limit: Option<usize>,
    ) -> Result<LinkDiscovery<'_, F>> {
        discover_links(&self.fetcher, &self.config, &self.layout, mode, selector, limit)
    }

    pub fn extract_recipe(&self, url: &Url) -> Result<RecipeRecord> {
        extract_recipe(&self.fetcher, &self.layout, url)
    }

    /// Collect every recipe for `selector` into `output_path`.
    ///
    /// A detail page that cannot be fetched is logged and skipped. The output
    /// file is written once, after all pages have been processed, replacing
    /// any previous file.
    pub fn run(
        &self,
        mode: ListingMode,
        selector: &str,
        limit: Option<usize>,
        output_path: &Path,
    ) -> Result<RunSummary> {
        info!("Collecting recipes for {:?} '{}'", mode, selector);

        let mut records = Vec::new();
        let mut skipped_urls = Vec::new();

        for url in self.discover_links(mode, selector, limit)? {
            match self.extract_recipe(&url) {
                Ok(record) => {
                    debug!("[{}] {}", records.len() + 1, record.title);
                    records.push(record);
                }
                Err(e) => {
                    debug!("Skipping {}: {}", url, e);
                    skipped_urls.push(url.to_string());
                }
            }
        }

        write_json(output_path, &records)?;

        info!(
            "Saved {} recipes to '{}' ({} skipped)",
            records.len(),
            output_path.display(),
            skipped_urls.len()
        );
        if !skipped_urls.is_empty() {
            warn!("Skipped URLs:\n{}", skipped_urls.join("\n"));
        }

        Ok(RunSummary {
            output: output_path.to_path_buf(),
            written: records.len(),
            skipped: skipped_urls.len(),
            skipped_urls,
        })
    }

    pub fn run_job(&self, job: &JobConfig) -> Result<RunSummary> {
        info!("Running job '{}'", job.name);
        let output = self.config.output_path(&job.output);
        self.run(job.mode, &job.selector, job.limit, &output)
    }

    /// Run every configured job in order, stopping at the first hard failure
    pub fn run_jobs(&self) -> Result<Vec<RunSummary>> {
        self.config.jobs.iter().map(|job| self.run_job(job)).collect()
    }

    /// Scrape the nutrition table into its output file, returning the row count
    pub fn scrape_nutrition(&self) -> Result<usize> {
        let url = Url::parse(&self.config.nutrition.url).map_err(|e| ScrapeError::InvalidUrl {
            url: self.config.nutrition.url.clone(),
            reason: e.to_string(),
        })?;
        let output = self.config.output_path(&self.config.nutrition.output);
        nutrition::scrape_nutrition(&self.fetcher, &url, &output)
    }
}

/// Serialize `value` as pretty JSON into `path`.
///
/// The data goes to a sibling `.tmp` file first and is renamed over `path`,
/// so readers never observe a half-written file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let written = write_temp(&temp_path, value)
        .and_then(|()| fs::rename(&temp_path, path).map_err(ScrapeError::from));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            debug!("Could not remove {}: {}", temp_path.display(), cleanup);
        }
        return Err(e);
    }

    debug!("Wrote {}", path.display());
    Ok(())
}

fn write_temp<T: Serialize + ?Sized>(temp_path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(temp_path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read back a dataset written by [`write_json`]
pub fn read_records(path: &Path) -> Result<Vec<RecipeRecord>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
