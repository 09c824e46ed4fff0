use chrono::Local;
use reqwest::Client;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};

use crate::config::{Credentials, ScrapeConfig};
use crate::limiter::ScrapeLimiter;
use crate::request::{fetch_scopes, scopes_request};
use crate::sink::Sink;
use crate::{error_time, info_time, Error, Result};

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Programs whose response got recorded.
    pub scraped: usize,
    /// Blank input lines.
    pub skipped_blank: usize,
    /// Programs that failed while `keep_going` was on.
    pub failed: usize,
    /// Limiter permits taken, one per request attempted.
    pub permits: u64,
}

/// The resources one run owns: HTTP client, limiter and output sink.
#[derive(Debug)]
pub struct Scraper {
    client: Client,
    limiter: ScrapeLimiter,
    sink: Sink,
    credentials: Credentials,
    api_base: String,
}

impl Scraper {
    pub async fn new(config: &ScrapeConfig) -> Result<Self> {
        let sink = Sink::open(config.output_path()).await?;
        Ok(Self {
            client: Client::new(),
            limiter: ScrapeLimiter::per_minute(config.requests_per_minute()),
            sink,
            credentials: config.credentials().clone(),
            api_base: config.api_base().to_string(),
        })
    }

    /// Wait for a permit, fetch the program's scopes, record the body.
    pub async fn scrape_one(&mut self, identifier: &str) -> Result<()> {
        self.limiter.wait().await?;

        let request = scopes_request(&self.client, &self.api_base, identifier, &self.credentials)?;
        let body = fetch_scopes(&self.client, request, identifier).await?;
        self.sink.write_record(&body).await?;

        info_time!("[+] success scraping program: {}", identifier);
        Ok(())
    }

    pub fn permits(&self) -> u64 {
        self.limiter.permits()
    }

    /// Flushes and releases the output file.
    pub async fn finish(self) -> Result<()> {
        self.sink.close().await
    }
}

/// Scrapes every program handle in the input file, in file order.
///
/// The input is opened before anything else, so a missing file fails the run
/// before any request goes out. The first error ends the run unless
/// `keep_going` is set, in which case errors that only concern one program
/// are logged and counted.
pub async fn scrape(config: &ScrapeConfig) -> Result<ScrapeSummary> {
    let start_time = Local::now();
    let input_path = config.input_path();

    let input = File::open(input_path)
        .await
        .map_err(|source| Error::InputOpen {
            path: input_path.to_path_buf(),
            source,
        })?;
    let mut lines = BufReader::new(input).lines();

    let mut scraper = Scraper::new(config).await?;
    let mut summary = ScrapeSummary::default();

    info_time!(
        "Started scraping {} at {} requests/min",
        input_path.display(),
        config.requests_per_minute()
    );

    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|source| Error::InputRead {
                path: input_path.to_path_buf(),
                source,
            })?;
        let Some(line) = line else {
            break;
        };

        let identifier = line.trim();
        if identifier.is_empty() {
            summary.skipped_blank += 1;
            continue;
        }

        match scraper.scrape_one(identifier).await {
            Ok(()) => summary.scraped += 1,
            Err(e) if config.keep_going() && e.is_per_identifier() => {
                error_time!("{}", e);
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    summary.permits = scraper.permits();
    scraper.finish().await?;

    info_time!(
        start_time,
        "Finished scraping: {} scraped, {} failed, {} blank lines skipped.",
        summary.scraped,
        summary.failed,
        summary.skipped_blank
    );
    Ok(summary)
}
