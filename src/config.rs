use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::{Error, Result, API_BASE};

/// HTTP Basic credentials in the `username:key` form HackerOne hands out.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    key: String,
}

impl Credentials {
    /// Splits `username:key`. Both halves must be non-empty and there must be exactly one `:`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (username, key) = raw.split_once(':').ok_or(Error::MalformedCredentials)?;
        if username.is_empty() || key.is_empty() || key.contains(':') {
            return Err(Error::MalformedCredentials);
        }
        Ok(Self {
            username: username.to_string(),
            key: key.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

// Keep the key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Everything a single scrape run needs.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    input_path: PathBuf,
    /// `None` sends response bodies to the log.
    output_path: Option<PathBuf>,
    requests_per_minute: NonZeroU32,
    credentials: Credentials,
    api_base: String,
    /// Log per-program failures and carry on instead of aborting.
    keep_going: bool,
}

impl ScrapeConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        credentials: Credentials,
        requests_per_minute: u32,
    ) -> Result<Self> {
        let requests_per_minute =
            NonZeroU32::new(requests_per_minute).ok_or(Error::InvalidRate(requests_per_minute))?;
        Ok(Self {
            input_path: input_path.into(),
            output_path: None,
            requests_per_minute,
            credentials,
            api_base: API_BASE.to_string(),
            keep_going: false,
        })
    }

    /// An empty path counts as no path.
    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn requests_per_minute(&self) -> NonZeroU32 {
        self.requests_per_minute
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn keep_going(&self) -> bool {
        self.keep_going
    }
}
