//! HACKERONE STRUCTURED SCOPES SCRAPER
//! Reads program handles line by line and records each program's raw
//! `structured_scopes` response, one per line.

pub mod config;
mod error;
pub mod limiter;
mod macros;
pub mod process;
pub mod request;
pub mod sink;

pub use config::{Credentials, ScrapeConfig};
pub use error::{Error, Result};
pub use process::{scrape, ScrapeSummary, Scraper};

/// Host the program handles get scraped from.
pub const API_BASE: &str = "https://api.hackerone.com";
/// See https://api.hackerone.com/getting-started/#rate-limits
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 600;
